use core::fmt;

use tracing::{debug, trace};

use super::base::BaseHPacket;
use super::{Identity, Packet};
use crate::config::device::{AESKey, EUI64};
use crate::error::{Error, Result};
use crate::framing::{FieldReader, FieldWriter};
use crate::lorawan::{MType, PhyPayload};

/// Size of the network session key on the wire
const NWK_SKEY_SIZE: usize = 16;

/// Join accept on its way back to the device, with the network session key
/// the network side keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptPacket {
    base: BaseHPacket,
    nwk_skey: AESKey,
}

impl AcceptPacket {
    /// Construct an accept packet. The payload must not be empty.
    pub fn new(
        app_eui: EUI64,
        dev_eui: EUI64,
        payload: impl Into<Vec<u8>>,
        nwk_skey: AESKey,
    ) -> Result<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            debug!("rejecting accept packet without payload");
            return Err(Error::structural("payload cannot be empty"));
        }
        Ok(Self {
            base: BaseHPacket::new(app_eui, dev_eui, payload),
            nwk_skey,
        })
    }

    /// Wrap an encoded join-accept frame
    pub fn from_phy(
        app_eui: EUI64,
        dev_eui: EUI64,
        payload: &PhyPayload,
        nwk_skey: AESKey,
    ) -> Result<Self> {
        if payload.mhdr.mtype != MType::JoinAccept {
            debug!(mtype = ?payload.mhdr.mtype, "rejecting non join-accept frame");
            return Err(Error::structural("frame is not a join accept"));
        }
        let bytes = payload
            .to_bytes()
            .map_err(|err| Error::structural_from("cannot encode join accept", err))?;
        Self::new(app_eui, dev_eui, bytes, nwk_skey)
    }

    /// Network session key
    pub fn nwk_skey(&self) -> AESKey {
        self.nwk_skey
    }
}

impl Identity for AcceptPacket {
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

impl Packet for AcceptPacket {
    /// `[appEUI][devEUI][payload]` length-prefixed, then the 16 key bytes
    /// without a prefix
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = FieldWriter::new();
        self.base.write_to(&mut writer);
        writer.write_raw(self.nwk_skey.as_bytes());
        let data = writer.into_bytes()?;

        trace!(payload_len = self.base.payload.len(), len = data.len(), "encoded accept packet");
        Ok(data)
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);
        let base = BaseHPacket::read_from(&mut reader)?;

        let key: [u8; NWK_SKEY_SIZE] = reader.remaining().try_into().map_err(|_| {
            Error::structural(format!(
                "network session key must be {} bytes, got {}",
                NWK_SKEY_SIZE,
                reader.remaining().len()
            ))
        })?;

        Self::new(base.app_eui, base.dev_eui, base.payload, AESKey::new(key))
    }
}

impl fmt::Display for AcceptPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // nwk_skey omitted
        write!(f, "AcceptPacket {{ {} }}", self.base)
    }
}
