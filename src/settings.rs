//! Player settings and preferences
//!
//! Persisted through the store alongside the other records.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;

/// Longest player name kept on score records
pub const MAX_PLAYER_NAME_LEN: usize = 24;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name written on new score records
    pub player_name: String,

    // === Audio ===
    /// Sound effects on catches and hits
    pub sound_enabled: bool,
    /// Background music
    pub music_enabled: bool,

    // === Feedback ===
    /// Vibrate on catches and hits
    pub haptics_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            sound_enabled: true,
            music_enabled: true,
            haptics_enabled: true,
        }
    }
}

impl Settings {
    /// Set the player name (sanitized)
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = sanitize_player_name(name);
    }

    /// Repair values that may have been hand-edited on disk
    pub fn sanitized(mut self) -> Self {
        self.player_name = sanitize_player_name(&self.player_name);
        self
    }
}

/// Trim whitespace and cap the length; blank names become the default
pub fn sanitize_player_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_player_name() {
        assert_eq!(sanitize_player_name("  Chili  "), "Chili");
        assert_eq!(sanitize_player_name(""), "Player");
        assert_eq!(sanitize_player_name("   \t"), "Player");
        let long = "x".repeat(40);
        assert_eq!(sanitize_player_name(&long).len(), MAX_PLAYER_NAME_LEN);
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: Settings = serde_json::from_str(r#"{"sound_enabled": false}"#).unwrap();
        assert!(!settings.sound_enabled);
        assert!(settings.music_enabled);
        assert_eq!(settings.player_name, "Player");
    }

    #[test]
    fn test_sanitized_repairs_blank_name() {
        let settings = Settings {
            player_name: "  ".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.sanitized().player_name, "Player");
    }
}
