//! Accelerator builder.
//!
//! Turns the persisted `{modifier bits, key code}` pair into a platform
//! shortcut descriptor. Pure and deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MdCaptureError, MdCaptureResult};

/// Virtual key code for the space bar, the only special-cased key.
pub const KEY_CODE_SPACE: u32 = 32;

/// Modifier bit flags as stored in settings.
pub const MOD_ALT: u32 = 1 << 0;
pub const MOD_CONTROL: u32 = 1 << 1;
pub const MOD_SHIFT: u32 = 1 << 2;
pub const MOD_SUPER: u32 = 1 << 3;

/// Bit-flag encoded hotkey, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyConfig {
    pub modifier_bits: u32,
    pub key_code: u32,
}

impl Default for HotkeyConfig {
    /// Ctrl+Shift+Space.
    fn default() -> Self {
        Self {
            modifier_bits: MOD_CONTROL | MOD_SHIFT,
            key_code: KEY_CODE_SPACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Alt,
    CommandOrControl,
    Shift,
    Super,
}

impl Modifier {
    /// Decode order. Affects display only.
    const ORDERED: [(u32, Modifier); 4] = [
        (MOD_ALT, Modifier::Alt),
        (MOD_CONTROL, Modifier::CommandOrControl),
        (MOD_SHIFT, Modifier::Shift),
        (MOD_SUPER, Modifier::Super),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Alt => "Alt",
            Modifier::CommandOrControl => "CommandOrControl",
            Modifier::Shift => "Shift",
            Modifier::Super => "Super",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Space,
    Char(char),
}

impl KeyToken {
    /// Key name understood by the global-shortcut parser.
    ///
    /// Letters and digits pass through; punctuation is spelled out with the
    /// W3C `KeyboardEvent.code` names the parser expects.
    pub fn shortcut_name(&self) -> String {
        match self {
            KeyToken::Space => "Space".to_string(),
            KeyToken::Char(c) => match c {
                ',' => "Comma".to_string(),
                '.' => "Period".to_string(),
                '/' => "Slash".to_string(),
                '\\' => "Backslash".to_string(),
                ';' => "Semicolon".to_string(),
                '\'' => "Quote".to_string(),
                '`' => "Backquote".to_string(),
                '-' => "Minus".to_string(),
                '=' => "Equal".to_string(),
                '[' => "BracketLeft".to_string(),
                ']' => "BracketRight".to_string(),
                other => other.to_ascii_uppercase().to_string(),
            },
        }
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Space => f.write_str("Space"),
            KeyToken::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Platform shortcut descriptor, e.g. `CommandOrControl+Shift+Space`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accelerator {
    modifiers: Vec<Modifier>,
    key: KeyToken,
}

impl Accelerator {
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn key(&self) -> KeyToken {
        self.key
    }

    /// String form accepted by `tauri_plugin_global_shortcut::Shortcut::from_str`.
    pub fn to_shortcut_string(&self) -> String {
        self.modifiers
            .iter()
            .map(|m| m.as_str().to_string())
            .chain(std::iter::once(self.key.shortcut_name()))
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}

/// Build the accelerator for a hotkey configuration.
///
/// Bits above bit 3 are ignored. Fails when the key code does not decode to
/// a printable character.
pub fn build(config: &HotkeyConfig) -> MdCaptureResult<Accelerator> {
    let modifiers = Modifier::ORDERED
        .iter()
        .filter(|(bit, _)| config.modifier_bits & bit != 0)
        .map(|(_, modifier)| *modifier)
        .collect();

    let key = if config.key_code == KEY_CODE_SPACE {
        KeyToken::Space
    } else {
        let c = char::from_u32(config.key_code).ok_or_else(|| {
            MdCaptureError::InvalidHotkey(format!(
                "key code {} is not a character",
                config.key_code
            ))
        })?;
        if c.is_control() || c.is_whitespace() {
            return Err(MdCaptureError::InvalidHotkey(format!(
                "key code {} has no printable key",
                config.key_code
            )));
        }
        KeyToken::Char(c)
    };

    Ok(Accelerator { modifiers, key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(modifier_bits: u32, key_code: u32) -> HotkeyConfig {
        HotkeyConfig {
            modifier_bits,
            key_code,
        }
    }

    #[test]
    fn default_config_is_ctrl_shift_space() {
        let accel = build(&HotkeyConfig::default()).unwrap();
        assert_eq!(accel.to_string(), "CommandOrControl+Shift+Space");
    }

    #[test]
    fn space_ignores_modifiers() {
        for bits in 0..16 {
            let accel = build(&config(bits, KEY_CODE_SPACE)).unwrap();
            assert_eq!(accel.key(), KeyToken::Space, "bits={}", bits);
            assert!(accel.to_string().ends_with("Space"));
        }
    }

    #[test]
    fn modifiers_follow_fixed_order() {
        let accel = build(&config(MOD_SUPER | MOD_SHIFT | MOD_ALT | MOD_CONTROL, 'K' as u32)).unwrap();
        assert_eq!(
            accel.modifiers(),
            &[
                Modifier::Alt,
                Modifier::CommandOrControl,
                Modifier::Shift,
                Modifier::Super
            ]
        );
        assert_eq!(accel.to_string(), "Alt+CommandOrControl+Shift+Super+K");
    }

    #[test]
    fn high_bits_are_ignored() {
        let accel = build(&config(0xF0 | MOD_ALT, 'N' as u32)).unwrap();
        assert_eq!(accel.to_string(), "Alt+N");
    }

    #[test]
    fn no_modifiers_renders_bare_key() {
        let accel = build(&config(0, '7' as u32)).unwrap();
        assert_eq!(accel.to_string(), "7");
    }

    #[test]
    fn build_is_deterministic() {
        let cfg = config(MOD_CONTROL | MOD_ALT, 'M' as u32);
        assert_eq!(build(&cfg).unwrap(), build(&cfg).unwrap());
    }

    #[test]
    fn rejects_control_and_invalid_codes() {
        assert!(build(&config(MOD_CONTROL, 0)).is_err());
        assert!(build(&config(MOD_CONTROL, 9)).is_err()); // tab
        assert!(build(&config(MOD_CONTROL, 13)).is_err()); // enter
        assert!(build(&config(MOD_CONTROL, 0x7F)).is_err()); // delete
        assert!(build(&config(MOD_CONTROL, 0xA0)).is_err()); // nbsp
        assert!(build(&config(MOD_CONTROL, 0xD800)).is_err()); // surrogate
        assert!(build(&config(MOD_CONTROL, u32::MAX)).is_err());
    }

    #[test]
    fn shortcut_string_spells_out_punctuation() {
        let accel = build(&config(MOD_CONTROL, '/' as u32)).unwrap();
        assert_eq!(accel.to_string(), "CommandOrControl+/");
        assert_eq!(accel.to_shortcut_string(), "CommandOrControl+Slash");

        let accel = build(&config(MOD_SHIFT, 'q' as u32)).unwrap();
        assert_eq!(accel.to_shortcut_string(), "Shift+Q");
    }
}
