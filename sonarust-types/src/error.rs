pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 0xFFFF is the broadcast target and can never be assigned to a module
    #[error("Address 0x{0:04X} is reserved for broadcast (assignable range: 0x0000..=0xFFFE)")]
    AddressReserved(u16),

    /// Baud index outside the 10-entry rate table
    #[error("Baud rate index {0} out of range (valid: 0..=9)")]
    InvalidBaudIndex(u8),
}
