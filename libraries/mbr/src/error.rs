use std::fmt;
use std::io;

/// A general error thrown by the `mbr` crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MbrError {

    /// The cause of the error, including cause-specific metadata.
    pub cause: ErrorCause,
}

impl MbrError {
    /// Creates a new error from a particular cause.
    pub fn from_cause(cause: ErrorCause) -> MbrError {
        MbrError { cause }
    }
}

impl From<ErrorCause> for MbrError {
    fn from(cause: ErrorCause) -> MbrError {
        MbrError::from_cause(cause)
    }
}

/// The possible causes of an error.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorCause {

    /// A passed-in buffer held fewer bytes than the record it should contain.
    TruncatedInput {

        /// The size of the record the function expected
        expected: usize,

        /// The size of the buffer passed into the function
        actual: usize,
    },

    /// The byte source refused to seek to the start of a sector.
    SeekFailure {

        /// The absolute sector that was being sought
        sector: u32,

        kind: io::ErrorKind,
    },

    /// The byte source could not deliver a whole record at a sector.
    ReadFailure {

        /// The absolute sector that was being read
        sector: u32,

        kind: io::ErrorKind,
    },

    /// Sector 0 did not end in the `0x55 0xaa` boot signature.
    InvalidSignature {

        /// The final 2 bytes of the raw sector
        actual: [u8; 2],
    },

    /// An extended boot record pointed back at a sector already visited.
    CycleDetected {
        sector: u32,
    },

    /// An extended chain kept going past the number of links we follow.
    ChainTooLong {
        limit: usize,
    },
}

impl fmt::Display for MbrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause {
            ErrorCause::TruncatedInput { expected, actual } => {
                write!(f, "truncated input: expected {} bytes, got {}", expected, actual)
            }
            ErrorCause::SeekFailure { sector, kind } => {
                write!(f, "seek to sector {} failed: {}", sector, io::Error::from(kind))
            }
            ErrorCause::ReadFailure { sector, kind } => {
                write!(f, "read at sector {} failed: {}", sector, io::Error::from(kind))
            }
            ErrorCause::InvalidSignature { actual } => write!(
                f,
                "invalid MBR signature {:02x} {:02x} (expected 55 aa)",
                actual[0], actual[1]
            ),
            ErrorCause::CycleDetected { sector } => {
                write!(f, "extended partition chain loops back to sector {}", sector)
            }
            ErrorCause::ChainTooLong { limit } => {
                write!(f, "extended partition chain longer than {} links", limit)
            }
        }
    }
}

impl std::error::Error for MbrError {}
