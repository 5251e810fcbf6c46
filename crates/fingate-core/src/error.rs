use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Link errors
    #[error("Link failure: {0}")]
    LinkFailure(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // Operation errors
    #[error("Sensor storage full: {count} of {capacity} slots in use")]
    CapacityExceeded { count: u16, capacity: u16 },

    #[error("Fingerprint already enrolled at slot {slot}")]
    DuplicateTemplate { slot: u16 },

    #[error("No matching template found")]
    NotFound,

    #[error("Device rejected the operation: {0}")]
    DeviceRejected(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a link failure error.
    pub fn link(message: impl Into<String>) -> Self {
        Self::LinkFailure(message.into())
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a device rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::DeviceRejected(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
