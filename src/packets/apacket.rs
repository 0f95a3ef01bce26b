use core::fmt;

use tracing::{debug, trace};

use super::{Hex, Packet};
use crate::error::{Error, FramingError, Result};
use crate::framing::{FieldReader, FieldWriter};
use crate::metadata::Metadata;

/// Application packet: payload plus one metadata entry per gateway that
/// observed the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct APacket {
    payload: Vec<u8>,
    metadata: Vec<Metadata>,
}

impl APacket {
    /// Construct an application packet. The payload must not be empty.
    pub fn new(payload: impl Into<Vec<u8>>, metadata: Vec<Metadata>) -> Result<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            debug!("rejecting application packet without payload");
            return Err(Error::structural("application packet must hold a payload"));
        }
        Ok(Self { payload, metadata })
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Metadata entries, in reception order
    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Inner level: each entry as its own length-prefixed JSON field
    fn encode_metadata(&self) -> Result<Vec<u8>> {
        let mut writer = FieldWriter::new();
        for entry in &self.metadata {
            writer.write(&entry.to_json()?);
        }
        writer.into_bytes()
    }

    /// Inner level: read fields until end of stream. Running out of bytes
    /// exactly on a field boundary ends the list; any other framing failure
    /// is malformed input.
    fn decode_metadata(data: &[u8]) -> Result<Vec<Metadata>> {
        let mut reader = FieldReader::new(data);
        let mut metadata = Vec::new();
        loop {
            match reader.read() {
                Ok(field) => metadata.push(Metadata::from_json(field)?),
                Err(FramingError::EndOfStream) => break,
                Err(err) => {
                    debug!(%err, read = metadata.len(), "malformed metadata list");
                    return Err(Error::structural_from("cannot read metadata entry", err));
                }
            }
        }
        Ok(metadata)
    }
}

impl Packet for APacket {
    /// `[payload][metadata list]`; the list field holds one length-prefixed
    /// JSON field per entry
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let metadata = self.encode_metadata()?;

        let mut writer = FieldWriter::new();
        writer.write(&self.payload);
        writer.write(&metadata);
        let data = writer.into_bytes()?;

        trace!(entries = self.metadata.len(), len = data.len(), "encoded application packet");
        Ok(data)
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);
        let payload = reader.read_required("payload")?;
        let metadata = reader.read_required("metadata")?;
        if !reader.remaining().is_empty() {
            return Err(Error::structural("unexpected bytes after application packet"));
        }

        let metadata = Self::decode_metadata(metadata)?;
        trace!(entries = metadata.len(), "decoded application packet");
        APacket::new(payload, metadata)
    }
}

impl fmt::Display for APacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "APacket {{ Payload: {}, Metadata: [", Hex(&self.payload))?;
        for (i, entry) in self.metadata.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str("] }")
    }
}
