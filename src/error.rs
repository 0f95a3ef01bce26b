//! Error types for packet construction and the wire codecs.
//!
//! Packet-level failures come in two kinds:
//!
//! - **Structural**: malformed input, a violated construction invariant or a
//!   decode failure. The caller can drop the input and carry on.
//! - **Implementation**: input the protocol logic does not cover yet, such as
//!   a frame message type with no direction tag.
//!
//! Failures are deterministic: decoding the same bytes twice fails the same
//! way both times.

use core::fmt;

use thiserror::Error;

/// Result type alias for packet operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Kind of a packet error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Malformed input or violated invariant
    Structural,
    /// Unsupported input
    Implementation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structural => f.write_str("structural"),
            ErrorKind::Implementation => f.write_str("implementation"),
        }
    }
}

/// Packet error.
#[derive(Error, Debug)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Structural error with a message
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Structural,
            message: message.into(),
            source: None,
        }
    }

    /// Implementation error with a message
    pub fn implementation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Implementation,
            message: message.into(),
            source: None,
        }
    }

    /// Structural error wrapping a lower-level cause
    pub fn structural_from<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::Structural,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether this is a structural error
    pub fn is_structural(&self) -> bool {
        self.kind == ErrorKind::Structural
    }

    /// Whether this is an implementation error
    pub fn is_implementation(&self) -> bool {
        self.kind == ErrorKind::Implementation
    }
}

/// Physical-layer codec error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhyError {
    /// Frame shorter than its fixed fields
    #[error("frame too short: need {expected} bytes, got {actual}")]
    TooShort {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },
    /// Join-accept payload length is neither 12 nor 28 bytes
    #[error("invalid join-accept length {0}")]
    InvalidJoinAcceptLength(usize),
    /// Unknown LoRaWAN major version
    #[error("unsupported major version {0}")]
    UnsupportedMajor(u8),
    /// Message type the codec does not handle
    #[error("unsupported message type {0:#04x}")]
    UnsupportedMType(u8),
    /// MAC command identifier unknown for the frame direction
    #[error("unknown MAC command {cid:#04x} (uplink: {uplink})")]
    UnknownCommand {
        /// Command identifier
        cid: u8,
        /// Frame direction
        uplink: bool,
    },
    /// MAC command payload cut short
    #[error("MAC command {cid:#04x} truncated")]
    TruncatedCommand {
        /// Command identifier
        cid: u8,
    },
    /// Encoded FOpts exceed 15 bytes
    #[error("FOpts exceed 15 bytes")]
    FOptsTooLong,
    /// FPort given without payload or payload without FPort
    #[error("FPort and FRMPayload mismatch")]
    PortMismatch,
    /// Opaque data and MAC commands mixed in one FRMPayload
    #[error("FRMPayload mixes data and MAC commands")]
    MixedPayload,
    /// Data block with no bytes
    #[error("FRMPayload data block is empty")]
    EmptyData,
    /// No MAC payload to operate on
    #[error("frame carries no MAC payload")]
    MissingMacPayload,
    /// MAC command placed in a frame travelling the other way
    #[error("MAC command {cid:#04x} does not belong in a frame with uplink: {uplink}")]
    CommandDirection {
        /// Command identifier
        cid: u8,
        /// Frame direction
        uplink: bool,
    },
    /// MAC command field does not fit its bits on the wire
    #[error("MAC command {cid:#04x} has a field out of range")]
    CommandFieldOutOfRange {
        /// Command identifier
        cid: u8,
    },
    /// Frame counter does not fit the 16 bits sent over the air
    #[error("frame counter {0} exceeds 16 bits")]
    FCntOverflow(u32),
    /// Frame longer than `MAX_FRAME_SIZE`
    #[error("frame of {0} bytes is too long")]
    FrameTooLong(usize),
}

/// Field framing error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// All fields consumed
    #[error("end of stream")]
    EndOfStream,
    /// Length prefix or field body cut short
    #[error("truncated field: need {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },
    /// Field longer than a 16-bit prefix can express
    #[error("field of {0} bytes exceeds the 16-bit length prefix")]
    FieldTooLong(usize),
}
