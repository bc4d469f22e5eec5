//! Configuration parameter types and their wire values

use std::fmt;

use crate::error::{Error, Result};

/// Serial rates the module supports, addressed by table index on the wire
///
/// The baud-change command carries the index, not the rate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BaudRate {
    B1200 = 0,
    B2400 = 1,
    B4800 = 2,
    B9600 = 3,
    B19200 = 4,
    B38400 = 5,
    B57600 = 6,
    B115200 = 7,
    B230400 = 8,
    B460800 = 9,
}

impl BaudRate {
    /// Table index sent on the wire
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Actual rate in bits per second
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::B1200 => 1_200,
            Self::B2400 => 2_400,
            Self::B4800 => 4_800,
            Self::B9600 => 9_600,
            Self::B19200 => 19_200,
            Self::B38400 => 38_400,
            Self::B57600 => 57_600,
            Self::B115200 => 115_200,
            Self::B230400 => 230_400,
            Self::B460800 => 460_800,
        }
    }
}

impl TryFrom<u8> for BaudRate {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Self::B1200),
            1 => Ok(Self::B2400),
            2 => Ok(Self::B4800),
            3 => Ok(Self::B9600),
            4 => Ok(Self::B19200),
            5 => Ok(Self::B38400),
            6 => Ok(Self::B57600),
            7 => Ok(Self::B115200),
            8 => Ok(Self::B230400),
            9 => Ok(Self::B460800),
            _ => Err(Error::InvalidBaudIndex(index)),
        }
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} baud", self.bits_per_second())
    }
}

/// How the module delivers distance readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UploadMode {
    /// Module answers on-demand queries only
    Manual = 0x00,

    /// Module pushes unsolicited distance frames at the configured interval
    Auto = 0x01,
}

/// Measurement indicator LED behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LedMode {
    Disabled = 0x00,
    Enabled = 0x01,
}

/// Threshold relay output behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RelayMode {
    Disabled = 0x00,
    Enabled = 0x01,
}

/// Reset selector byte carried in the reset command payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResetKind {
    /// Restore factory defaults and reboot
    Hard = 0xFE,

    /// Reboot, keeping stored configuration
    Soft = 0xFD,
}

/// Wire encoding used for the communication-mode command
///
/// Two incompatible encodings exist in the field and disagree on both the
/// sync and the command byte. Neither is known to be authoritative for a
/// given module; pick the one the target firmware answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommModeVariant {
    /// Encoded as sync 0x61, command 0x30
    VariantA,

    /// Encoded as sync 0x62, command 0x31
    VariantB,
}

impl Default for CommModeVariant {
    fn default() -> Self {
        // The encoding consistent with the rest of the 0x62 command table
        Self::VariantB
    }
}
