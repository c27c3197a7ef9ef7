mod device;

pub use device::*;
use crate::KeyCode;

/// Represents the keys on a standard numeric keypad, plus backspace.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NumpadKey {
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    /// The `.` key.
    KeyDot,
    KeyEnter,
    /// The `-` key.
    KeyMinus,
    /// The `+` key.
    KeyPlus,
    /// The `/` key.
    KeySlash,
    /// The `*` key.
    KeyAsterisk,
    KeyBackspace,
    KeyNumLock,
}

impl NumpadKey {
    /// The digit keys `1` to `9`, bottom-left to top-right.
    pub const GRID: [NumpadKey; 9] = {
        use NumpadKey::*;
        [Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9]
    };

    /// Gets the Linux input key code of the key.
    pub fn code(self) -> KeyCode {
        use NumpadKey::*;

        let code = match self {
            Key0 => 82,
            Key1 => 79,
            Key2 => 80,
            Key3 => 81,
            Key4 => 75,
            Key5 => 76,
            Key6 => 77,
            Key7 => 71,
            Key8 => 72,
            Key9 => 73,
            KeyDot => 83,
            KeyEnter => 96,
            KeyMinus => 74,
            KeyPlus => 78,
            KeySlash => 98,
            KeyAsterisk => 55,
            KeyBackspace => 14,
            KeyNumLock => 69,
        };
        KeyCode(code)
    }

    /// Converts a key code back to a [NumpadKey], if it is one.
    pub fn from_code(code: KeyCode) -> Option<NumpadKey> {
        use NumpadKey::*;

        const ALL: [NumpadKey; 18] = [
            Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,
            KeyDot, KeyEnter, KeyMinus, KeyPlus, KeySlash, KeyAsterisk,
            KeyBackspace, KeyNumLock,
        ];

        ALL.into_iter().find(|key| key.code() == code)
    }

    /// Gets a short human-readable name of the key.
    pub fn name(self) -> &'static str {
        use NumpadKey::*;

        match self {
            Key0 => "Num0",
            Key1 => "Num1",
            Key2 => "Num2",
            Key3 => "Num3",
            Key4 => "Num4",
            Key5 => "Num5",
            Key6 => "Num6",
            Key7 => "Num7",
            Key8 => "Num8",
            Key9 => "Num9",
            KeyDot => "NumDot",
            KeyEnter => "NumEnter",
            KeyMinus => "NumMinus",
            KeyPlus => "NumPlus",
            KeySlash => "NumDivide",
            KeyAsterisk => "NumMultiply",
            KeyBackspace => "Backspace",
            KeyNumLock => "NumLock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_grid() {
        for key in NumpadKey::GRID {
            assert_eq!(NumpadKey::from_code(key.code()), Some(key));
        }
    }

    #[test]
    fn codes_match_kernel_values() {
        assert_eq!(NumpadKey::Key1.code(), KeyCode(79));
        assert_eq!(NumpadKey::KeyEnter.code(), KeyCode(96));
        assert_eq!(NumpadKey::KeySlash.code(), KeyCode(98));
        assert_eq!(NumpadKey::KeyNumLock.code(), KeyCode(69));
        assert_eq!(NumpadKey::from_code(KeyCode(30)), None);
    }
}
