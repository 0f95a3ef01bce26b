use core::fmt;

use tracing::trace;

use super::base::BaseHPacket;
use super::{Identity, Packet};
use crate::config::device::EUI64;
use crate::error::{Error, Result};
use crate::framing::{FieldReader, FieldWriter};
use crate::metadata::Metadata;

/// Handler packet: identifiers, raw application payload and metadata, with no
/// frame attached.
#[derive(Debug, Clone, PartialEq)]
pub struct HPacket {
    base: BaseHPacket,
    metadata: Metadata,
}

impl HPacket {
    /// Construct a handler packet. An empty payload is kept as an empty
    /// byte sequence.
    pub fn new(
        app_eui: EUI64,
        dev_eui: EUI64,
        payload: impl Into<Vec<u8>>,
        metadata: Metadata,
    ) -> Self {
        Self {
            base: BaseHPacket::new(app_eui, dev_eui, payload.into()),
            metadata,
        }
    }

    /// Metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Identity for HPacket {
    fn app_eui(&self) -> EUI64 {
        self.base.app_eui
    }

    fn dev_eui(&self) -> EUI64 {
        self.base.dev_eui
    }

    fn payload(&self) -> &[u8] {
        &self.base.payload
    }
}

impl Packet for HPacket {
    /// `[appEUI][devEUI][payload][metadata JSON]`, each field length-prefixed
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let metadata = self.metadata.to_json()?;

        let mut writer = FieldWriter::new();
        self.base.write_to(&mut writer);
        writer.write(&metadata);
        let data = writer.into_bytes()?;

        trace!(payload_len = self.base.payload.len(), len = data.len(), "encoded handler packet");
        Ok(data)
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);
        let base = BaseHPacket::read_from(&mut reader)?;
        let metadata = Metadata::from_json(reader.read_required("metadata")?)?;
        if !reader.remaining().is_empty() {
            return Err(Error::structural("unexpected bytes after handler packet"));
        }

        trace!(payload_len = base.payload.len(), "decoded handler packet");
        Ok(Self { base, metadata })
    }
}

impl fmt::Display for HPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HPacket {{ {}, {} }}", self.base, self.metadata)
    }
}
