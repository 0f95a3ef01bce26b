use core::fmt;

use tracing::debug;

use super::base::BaseHPacket;
use super::{Hex, Identity, Packet};
use crate::config::device::EUI64;
use crate::error::{Error, Result};
use crate::framing::{FieldReader, FieldWriter};
use crate::lorawan::{MacPayloadKind, PhyPayload};
use crate::metadata::Metadata;

/// Join request as seen by the session tier.
///
/// The device nonce is the carrier payload. Only the identity carrier goes on
/// the wire; metadata stays local and decodes as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPacket {
    base: BaseHPacket,
    metadata: Metadata,
}

impl JoinPacket {
    /// Construct a join packet
    pub fn new(app_eui: EUI64, dev_eui: EUI64, dev_nonce: [u8; 2], metadata: Metadata) -> Self {
        Self {
            base: BaseHPacket::new(app_eui, dev_eui, dev_nonce.to_vec()),
            metadata,
        }
    }

    /// Lift identifiers and nonce out of a join-request frame
    pub fn from_phy(payload: &PhyPayload, metadata: Metadata) -> Result<Self> {
        match &payload.mac_payload {
            Some(MacPayloadKind::JoinRequest(join)) => {
                Ok(Self::new(join.app_eui, join.dev_eui, join.dev_nonce, metadata))
            }
            _ => {
                debug!(mtype = ?payload.mhdr.mtype, "rejecting non join-request frame");
                Err(Error::structural("frame is not a join request"))
            }
        }
    }

    /// Device nonce
    pub fn dev_nonce(&self) -> [u8; 2] {
        [self.base.payload[0], self.base.payload[1]]
    }

    /// Metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Identity for JoinPacket {
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

impl Packet for JoinPacket {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = FieldWriter::new();
        self.base.write_to(&mut writer);
        writer.into_bytes()
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);
        let base = BaseHPacket::read_from(&mut reader)?;
        if !reader.remaining().is_empty() {
            return Err(Error::structural("unexpected bytes after join packet"));
        }
        if base.payload.len() != 2 {
            return Err(Error::structural(format!(
                "device nonce must be 2 bytes, got {}",
                base.payload.len()
            )));
        }
        Ok(Self {
            base,
            metadata: Metadata::default(),
        })
    }
}

impl fmt::Display for JoinPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JoinPacket {{ AppEUI: {}, DevEUI: {}, DevNonce: {}, {} }}",
            self.base.app_eui,
            self.base.dev_eui,
            Hex(&self.base.payload),
            self.metadata
        )
    }
}
