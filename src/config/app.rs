//! Persisted user preferences.
//!
//! Stored as a flat camelCase key/value record so the settings page and the
//! store file share the same field names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{MdCaptureError, MdCaptureResult};
use crate::hotkey::{self, HotkeyConfig};

/// Default filename template. `{HHmm}` is shorthand for `{HH}{mm}`.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{yyyy}-{MM}-{dd} {HHmm} {title}.md";

/// Folder created under the user's documents directory by default.
const DEFAULT_FOLDER_NAME: &str = "MarkdownCapture";

/// Application-wide user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/types/")]
pub struct AppSettings {
    /// Directory new notes are written to.
    pub save_folder: String,
    /// Modifier bit flags (bit0 Alt, bit1 Ctrl/Cmd, bit2 Shift, bit3 Super).
    pub hotkey_modifiers: u32,
    /// Key code; 32 is Space, anything else a character code point.
    pub hotkey_key: u32,
    /// Filename template with `{yyyy}` `{MM}` `{dd}` `{HH}` `{mm}` `{ss}` `{title}`.
    pub filename_template: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        let hotkey = HotkeyConfig::default();
        Self {
            save_folder: default_save_folder().to_string_lossy().to_string(),
            hotkey_modifiers: hotkey.modifier_bits,
            hotkey_key: hotkey.key_code,
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
        }
    }
}

impl AppSettings {
    pub fn hotkey_config(&self) -> HotkeyConfig {
        HotkeyConfig {
            modifier_bits: self.hotkey_modifiers,
            key_code: self.hotkey_key,
        }
    }

    /// Check the record is usable. Collects every problem, not just the first.
    pub fn validate(&self) -> MdCaptureResult<()> {
        let mut errors = Vec::new();

        if self.save_folder.trim().is_empty() {
            errors.push("Save folder is required".to_string());
        }

        if self.filename_template.trim().is_empty() {
            errors.push("Filename template is required".to_string());
        }

        if self.hotkey_key < 1 || hotkey::build(&self.hotkey_config()).is_err() {
            errors.push("Invalid hotkey configuration".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MdCaptureError::InvalidSettings(errors))
        }
    }
}

/// `<Documents>/MarkdownCapture`, falling back to `<home>/Documents`.
pub fn default_save_folder() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("Documents"))
        .join(DEFAULT_FOLDER_NAME)
}

/// Partial update sent by the settings page. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/types/")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey_modifiers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey_key: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_template: Option<String>,
}

impl SettingsPatch {
    /// Overlay the present fields onto `settings`.
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(folder) = &self.save_folder {
            settings.save_folder = folder.clone();
        }
        if let Some(modifiers) = self.hotkey_modifiers {
            settings.hotkey_modifiers = modifiers;
        }
        if let Some(key) = self.hotkey_key {
            settings.hotkey_key = key;
        }
        if let Some(template) = &self.filename_template {
            settings.filename_template = template.clone();
        }
    }

    /// Present fields as store entries, keyed by their camelCase names.
    pub fn entries(&self) -> MdCaptureResult<Vec<(String, serde_json::Value)>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.hotkey_modifiers, 6);
        assert_eq!(settings.hotkey_key, 32);
        assert_eq!(settings.filename_template, "{yyyy}-{MM}-{dd} {HHmm} {title}.md");
        assert!(settings.save_folder.ends_with("MarkdownCapture"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("saveFolder"));
        assert!(obj.contains_key("hotkeyModifiers"));
        assert!(obj.contains_key("hotkeyKey"));
        assert!(obj.contains_key("filenameTemplate"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let settings = AppSettings {
            save_folder: "  ".to_string(),
            hotkey_modifiers: 6,
            hotkey_key: 0,
            filename_template: String::new(),
        };

        match settings.validate() {
            Err(MdCaptureError::InvalidSettings(errors)) => assert_eq!(
                errors,
                vec![
                    "Save folder is required",
                    "Filename template is required",
                    "Invalid hotkey configuration",
                ]
            ),
            other => panic!("expected InvalidSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unbuildable_key() {
        let settings = AppSettings {
            hotkey_key: 9, // tab
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_patch_applies_present_fields_only() {
        let mut settings = AppSettings::default();
        let patch = SettingsPatch {
            filename_template: Some("{title}".to_string()),
            hotkey_key: Some('K' as u32),
            ..SettingsPatch::default()
        };

        patch.apply_to(&mut settings);

        assert_eq!(settings.filename_template, "{title}");
        assert_eq!(settings.hotkey_key, 'K' as u32);
        assert_eq!(settings.hotkey_modifiers, 6);
        assert!(settings.save_folder.ends_with("MarkdownCapture"));
    }

    #[test]
    fn test_patch_entries_skip_absent_fields() {
        let patch = SettingsPatch {
            save_folder: Some("/tmp/notes".to_string()),
            ..SettingsPatch::default()
        };

        let entries = patch.entries().unwrap();
        assert_eq!(
            entries,
            vec![("saveFolder".to_string(), serde_json::json!("/tmp/notes"))]
        );
        assert!(!patch.is_empty());
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"hotkeyModifiers": 3, "hotkeyKey": 75}"#).unwrap();
        assert_eq!(patch.hotkey_modifiers, Some(3));
        assert_eq!(patch.hotkey_key, Some(75));
        assert_eq!(patch.save_folder, None);
    }
}
