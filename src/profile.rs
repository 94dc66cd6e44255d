//! Player identity from the login form.

use crate::error::EngineError;
use crate::verse::DEFAULT_NAME;

/// Who is playing. `player_id` keys the stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    /// Phone number reduced to its digits.
    pub player_id: String,
}

impl Profile {
    /// Validate login input.
    ///
    /// The name is trimmed and falls back to "Player" when blank. The phone
    /// must be 10 to 15 digits with an optional leading `+`.
    pub fn from_login(name: &str, phone: &str) -> Result<Self, EngineError> {
        let phone = phone.trim();
        if !is_valid_phone(phone) {
            return Err(EngineError::InvalidProfile(format!(
                "phone must be 10-15 digits, got {phone:?}"
            )));
        }
        let name = match name.trim() {
            "" => DEFAULT_NAME.to_string(),
            n => n.to_string(),
        };
        Ok(Self {
            name,
            player_id: phone.chars().filter(char::is_ascii_digit).collect(),
        })
    }

    pub fn leaderboard_key(&self) -> String {
        leaderboard_key(&self.player_id)
    }
}

/// Leaderboard entries are keyed by the id with everything but ASCII
/// letters and digits removed.
pub fn leaderboard_key(player_id: &str) -> String {
    player_id.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
