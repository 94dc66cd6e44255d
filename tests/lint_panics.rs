//! Lint: no `.unwrap()` or `.expect(` in library code.
//!
//! Engine operations report failure through `EngineError` and the session
//! treats every error as recoverable, so a panic path in non-test code is a
//! bug. Everything from the first inline `#[cfg(test)]` module onward is
//! test code and is skipped, as are comment lines and files compiled only
//! for tests.

use std::fs;
use std::path::Path;

/// Files declared behind `#[cfg(test)]` by their parent module.
const TEST_ONLY_FILES: &[&str] = &["simulator.rs"];

/// Scan one file's non-test section for panicking calls.
fn find_panics(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    let lines: Vec<&str> = source.lines().collect();

    for (line_num_0, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        // `#[cfg(test)] mod x;` only gates another file; an inline
        // `#[cfg(test)] mod tests {` starts the test section.
        if trimmed.starts_with("#[cfg(test)]") {
            let opens_block = lines
                .get(line_num_0 + 1)
                .is_some_and(|next| next.trim_end().ends_with('{'));
            if opens_block {
                break;
            }
            continue;
        }
        if trimmed.starts_with("//") {
            continue;
        }
        if line.contains(".unwrap()") || line.contains(".expect(") {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn no_panicking_calls_in_library_code() {
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut all_violations = Vec::new();

    visit_source_files(&src_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found .unwrap()/.expect( outside test code.\n\
             Propagate an EngineError or fall back to a default instead.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
            continue;
        }
        let is_rust = path.extension().is_some_and(|e| e == "rs");
        let test_only = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| TEST_ONLY_FILES.contains(&n));
        if !is_rust || test_only {
            continue;
        }
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        let display_path = path.display().to_string();
        for (line_num, line) in find_panics(&source) {
            violations.push((display_path.clone(), line_num, line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unwrap() {
        let source = "let x = parse(s).unwrap();";
        assert_eq!(find_panics(source).len(), 1);
    }

    #[test]
    fn detects_expect() {
        let source = r#"let x = parse(s).expect("valid");"#;
        assert_eq!(find_panics(source).len(), 1);
    }

    #[test]
    fn allows_unwrap_or_variants() {
        let source = "let x = a.unwrap_or(0);\nlet y = b.unwrap_or_default();\nlet z = c.unwrap_or_else(f);";
        assert!(find_panics(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = "// parse(s).unwrap();\n/// doc: call .expect( here";
        assert!(find_panics(source).is_empty());
    }

    #[test]
    fn keeps_scanning_past_gated_mod_declaration() {
        let source = "#[cfg(test)]\nmod simulator;\n\nfn f() { g().unwrap(); }";
        assert_eq!(find_panics(source).len(), 1);
    }

    #[test]
    fn stops_at_test_module() {
        let source = "fn f() {}\n#[cfg(test)]\nmod tests {\n    fn g() { h().unwrap(); }\n}";
        assert!(find_panics(source).is_empty());
    }
}
