//! Protocol command definitions
//!
//! Each operation is identified by a `(sync, code)` byte pair rather than a
//! single global sync byte: one observed communication-mode encoding uses
//! sync 0x61 where every other command uses 0x62. The pair is matched as a
//! unit when validating responses.

use std::fmt;

/// Sync byte used by the main command table
pub const SYNC: u8 = 0x62;

/// Alternate sync byte used by one communication-mode encoding
pub const SYNC_ALT: u8 = 0x61;

/// Protocol commands
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Change the serial rate (payload: rate table index)
    SetBaudRate,

    /// Assign a new module address (payload: new address, big-endian)
    SetAddress,

    /// Query one distance measurement; also the frame type the module
    /// pushes unsolicited in auto-upload mode
    ReadDistance,

    /// Switch between manual (query) and auto-upload delivery
    SetUploadMode,

    /// Set the auto-upload push interval (payload: interval in 100 ms units)
    SetUploadInterval,

    /// Measurement indicator LED on/off
    SetLed,

    /// Threshold relay output on/off
    SetRelay,

    /// Reboot the module (payload selector: 0xFE hard, 0xFD soft)
    Reset,

    /// Communication mode, encoding observed as (0x61, 0x30)
    SetCommModeA,

    /// Communication mode, encoding observed as (0x62, 0x31)
    SetCommModeB,
}

impl Command {
    /// Sync byte this command's frames start with
    pub const fn sync(self) -> u8 {
        match self {
            Self::SetCommModeA => SYNC_ALT,
            _ => SYNC,
        }
    }

    /// Command code byte
    pub const fn code(self) -> u8 {
        match self {
            Self::SetBaudRate => 0x30,
            Self::SetCommModeA => 0x30,
            Self::SetCommModeB => 0x31,
            Self::SetAddress => 0x32,
            Self::ReadDistance => 0x33,
            Self::SetUploadMode => 0x34,
            Self::SetUploadInterval => 0x35,
            Self::SetLed => 0x37,
            Self::SetRelay => 0x38,
            Self::Reset => 0x39,
        }
    }

    /// The `(sync, code)` pair matched against response frames
    pub const fn pair(self) -> (u8, u8) {
        (self.sync(), self.code())
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::SetBaudRate => "SET_BAUD_RATE",
            Self::SetAddress => "SET_ADDRESS",
            Self::ReadDistance => "READ_DISTANCE",
            Self::SetUploadMode => "SET_UPLOAD_MODE",
            Self::SetUploadInterval => "SET_UPLOAD_INTERVAL",
            Self::SetLed => "SET_LED",
            Self::SetRelay => "SET_RELAY",
            Self::Reset => "RESET",
            Self::SetCommModeA => "SET_COMM_MODE_A",
            Self::SetCommModeB => "SET_COMM_MODE_B",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sync, code) = self.pair();
        write!(f, "{}(0x{:02X},0x{:02X})", self.name(), sync, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_pairs() {
        assert_eq!(Command::SetBaudRate.pair(), (0x62, 0x30));
        assert_eq!(Command::SetAddress.pair(), (0x62, 0x32));
        assert_eq!(Command::ReadDistance.pair(), (0x62, 0x33));
        assert_eq!(Command::SetUploadMode.pair(), (0x62, 0x34));
        assert_eq!(Command::SetUploadInterval.pair(), (0x62, 0x35));
        assert_eq!(Command::SetLed.pair(), (0x62, 0x37));
        assert_eq!(Command::SetRelay.pair(), (0x62, 0x38));
        assert_eq!(Command::Reset.pair(), (0x62, 0x39));
    }

    #[test]
    fn test_comm_mode_encodings_differ_in_both_bytes() {
        assert_eq!(Command::SetCommModeA.pair(), (0x61, 0x30));
        assert_eq!(Command::SetCommModeB.pair(), (0x62, 0x31));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Command::ReadDistance.to_string(),
            "READ_DISTANCE(0x62,0x33)"
        );
    }
}
