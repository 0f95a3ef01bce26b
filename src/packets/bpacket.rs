use core::fmt;

use tracing::debug;

use super::{Packet, RPacket};
use crate::config::device::{AESKey, EUI64};
use crate::error::{Error, Result};
use crate::lorawan::{FrmPayload, MacCommand, PhyPayload};
use crate::metadata::Metadata;

/// Broker packet: a router packet whose frame holds exactly one opaque data
/// payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BPacket {
    rpacket: RPacket,
}

impl BPacket {
    /// Construct a broker packet straight from a frame and its metadata
    pub fn new(payload: PhyPayload, metadata: Metadata) -> Result<Self> {
        let rpacket = RPacket::new(payload, metadata)?;
        Self::try_from(rpacket)
    }

    /// Frame counter from the frame header
    pub fn f_cnt(&self) -> u32 {
        self.rpacket.mac_payload().fhdr.f_cnt
    }

    /// MAC commands piggybacked in the frame header
    pub fn commands(&self) -> &[MacCommand] {
        &self.rpacket.mac_payload().fhdr.f_opts
    }

    /// Raw bytes of the data payload
    pub fn payload(&self) -> &[u8] {
        match self.rpacket.mac_payload().frm_payload.first() {
            Some(FrmPayload::Data(data)) => &data.bytes,
            _ => &[],
        }
    }

    /// Device EUI derived from the frame's device address
    pub fn dev_eui(&self) -> EUI64 {
        self.rpacket.dev_eui()
    }

    /// Metadata
    pub fn metadata(&self) -> &Metadata {
        self.rpacket.metadata()
    }

    /// Check the frame MIC against a network session key
    pub fn validate_mic(&self, key: &AESKey) -> Result<bool> {
        self.rpacket
            .payload()
            .validate_mic(key)
            .map_err(|err| Error::structural_from("cannot compute MIC", err))
    }

    /// Widen back to a router packet
    pub fn into_rpacket(self) -> RPacket {
        self.rpacket
    }

    /// Router view of this packet
    pub fn as_rpacket(&self) -> &RPacket {
        &self.rpacket
    }
}

impl TryFrom<RPacket> for BPacket {
    type Error = Error;

    fn try_from(rpacket: RPacket) -> Result<Self> {
        let mac_payload = rpacket.mac_payload();
        let frm_payload = &mac_payload.frm_payload;
        if frm_payload.len() != 1 {
            debug!(count = frm_payload.len(), "rejecting frame payload count");
            return Err(Error::structural("invalid frame payload, expected exactly 1"));
        }
        let FrmPayload::Data(data) = &frm_payload[0] else {
            debug!("rejecting frame payload made of MAC commands");
            return Err(Error::structural("invalid frame payload, expected only data"));
        };
        if data.bytes.is_empty() {
            debug!("rejecting empty data payload");
            return Err(Error::structural("invalid frame payload, data is empty"));
        }
        match mac_payload.f_port {
            Some(port) if port > 0 => Ok(Self { rpacket }),
            f_port => {
                debug!(?f_port, "rejecting data payload off an application port");
                Err(Error::structural("data payload needs an application port"))
            }
        }
    }
}

impl Packet for BPacket {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.rpacket.to_bytes()
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::try_from(RPacket::from_bytes(data)?)
    }
}

impl fmt::Display for BPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BPacket {{\n\tFCnt: {}\n\tCommands: {:?}\n\t{}\n}}",
            self.f_cnt(),
            self.commands(),
            self.rpacket
        )
    }
}
