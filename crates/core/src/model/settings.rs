use serde::{Deserialize, Serialize};

/// Player preferences, persisted as `{"sound": true, "confirm": true}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "sound", alias = "soundEnabled")]
    sound_enabled: bool,
    #[serde(rename = "confirm", alias = "confirmDestructive")]
    confirm_destructive: bool,
}

impl Settings {
    #[must_use]
    pub fn new(sound_enabled: bool, confirm_destructive: bool) -> Self {
        Self {
            sound_enabled,
            confirm_destructive,
        }
    }

    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Whether destructive actions (clearing progress) ask before running.
    #[must_use]
    pub fn confirm_destructive(&self) -> bool {
        self.confirm_destructive
    }

    #[must_use]
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_confirm_destructive(mut self, enabled: bool) -> Self {
        self.confirm_destructive = enabled;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            confirm_destructive: true,
        }
    }
}
