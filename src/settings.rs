use serde::{Deserialize, Serialize};

use crate::{error::StoreResult, models::parse_patch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Friends,
    #[default]
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub notifications: bool,
    pub dark_mode: bool,
    pub sound: bool,
    pub privacy: Privacy,
    /// Display name.
    pub name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            dark_mode: false,
            sound: true,
            privacy: Privacy::Private,
            name: String::new(),
        }
    }
}

/// Field-by-field settings update. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub notifications: Option<bool>,
    pub dark_mode: Option<bool>,
    pub sound: Option<bool>,
    pub privacy: Option<Privacy>,
    pub name: Option<String>,
}

impl SettingsPatch {
    /// Parses a JSON patch such as `{"darkMode": true}`.
    pub fn from_json(raw: &str) -> StoreResult<Self> {
        parse_patch(raw)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Settings {
    /// Merges `patch` in place. Returns true if any field changed.
    pub fn merge(&mut self, patch: SettingsPatch) -> bool {
        let before = self.clone();
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(dark_mode) = patch.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(sound) = patch.sound {
            self.sound = sound;
        }
        if let Some(privacy) = patch.privacy {
            self.privacy = privacy;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn defaults_match_first_launch() {
        let settings = Settings::default();
        assert!(settings.notifications);
        assert!(!settings.dark_mode);
        assert!(settings.sound);
        assert_eq!(settings.privacy, Privacy::Private);
        assert!(settings.name.is_empty());
    }

    #[test]
    fn merge_is_partial() {
        let mut settings = Settings {
            name: "Ada".into(),
            sound: false,
            ..Settings::default()
        };

        let changed = settings.merge(SettingsPatch {
            dark_mode: Some(true),
            ..Default::default()
        });

        assert!(changed);
        assert!(settings.dark_mode);
        assert!(settings.notifications);
        assert!(!settings.sound);
        assert_eq!(settings.privacy, Privacy::Private);
        assert_eq!(settings.name, "Ada");
    }

    #[test]
    fn merge_reports_no_change_for_same_values() {
        let mut settings = Settings::default();
        assert!(!settings.merge(SettingsPatch {
            notifications: Some(true),
            ..Default::default()
        }));
    }

    #[test]
    fn json_patch_rejects_unknown_keys() {
        let err = SettingsPatch::from_json(r#"{"darkMode": true, "theme": "pink"}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatch(_)));
    }

    #[test]
    fn json_patch_rejects_unknown_privacy_level() {
        assert!(SettingsPatch::from_json(r#"{"privacy": "everyone"}"#).is_err());
    }

    #[test]
    fn json_patch_parses_known_keys() {
        let patch = SettingsPatch::from_json(r#"{"darkMode": true, "privacy": "friends"}"#).unwrap();
        assert_eq!(patch.dark_mode, Some(true));
        assert_eq!(patch.privacy, Some(Privacy::Friends));
        assert!(patch.name.is_none());
    }
}
