use core::fmt;

use tracing::{debug, trace};

use super::Packet;
use crate::config::device::EUI64;
use crate::crypto::MIC_SIZE;
use crate::error::{Error, PhyError, Result};
use crate::framing::{FieldReader, FieldWriter};
use crate::lorawan::{MType, MacPayload, MacPayloadKind, PhyPayload, MHDR};
use crate::metadata::Metadata;

/// Direction tag written in front of an encoded router packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    /// Device to network
    Up = 1,
    /// Network to device
    Down = 2,
}

impl Direction {
    /// Tag for a frame message type
    pub fn from_mtype(mtype: MType) -> Result<Self> {
        match mtype {
            MType::JoinRequest | MType::UnconfirmedDataUp | MType::ConfirmedDataUp => {
                Ok(Direction::Up)
            }
            MType::JoinAccept | MType::UnconfirmedDataDown | MType::ConfirmedDataDown => {
                Ok(Direction::Down)
            }
            other => Err(Error::implementation(format!("unsupported mtype: {:?}", other))),
        }
    }

    /// Parse a tag byte
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(Direction::Up),
            2 => Ok(Direction::Down),
            other => Err(Error::structural(format!("invalid direction tag {}", other))),
        }
    }
}

/// Router packet: a data frame and the metadata it arrived or leaves with.
///
/// The frame is split into its parts at construction so the data MAC payload
/// is always at hand.
#[derive(Debug, Clone, PartialEq)]
pub struct RPacket {
    mhdr: MHDR,
    mac_payload: MacPayload,
    mic: [u8; MIC_SIZE],
    metadata: Metadata,
}

impl RPacket {
    /// Construct a router packet from a frame and its metadata.
    ///
    /// Fails when the frame carries no MAC payload, a join payload, or a data
    /// payload that would not decode back to itself: a join message type, a
    /// frame counter above 16 bits, or a body the frame codec refuses.
    /// Proprietary and rejoin headers are let through and fail at encode.
    pub fn new(payload: PhyPayload, metadata: Metadata) -> Result<Self> {
        if payload.mhdr.mtype.is_data() {
            payload.to_bytes().map_err(|err| {
                debug!(mtype = ?payload.mhdr.mtype, %err, "rejecting frame that cannot be encoded");
                Error::structural_from("frame cannot be encoded", err)
            })?;
        }

        let PhyPayload {
            mhdr,
            mac_payload,
            mic,
        } = payload;

        let mac_payload = match mac_payload {
            Some(MacPayloadKind::Data(mac_payload)) => mac_payload,
            None => {
                debug!(mtype = ?mhdr.mtype, "rejecting frame without MAC payload");
                return Err(Error::structural("MAC payload should not be empty"));
            }
            Some(_) => {
                debug!(mtype = ?mhdr.mtype, "rejecting frame without data MAC payload");
                return Err(Error::structural("packet does not carry a data MAC payload"));
            }
        };

        if matches!(mhdr.mtype, MType::JoinRequest | MType::JoinAccept) {
            debug!(mtype = ?mhdr.mtype, "rejecting data MAC payload under a join header");
            return Err(Error::structural(format!(
                "data MAC payload under {:?} header",
                mhdr.mtype
            )));
        }

        let f_cnt = mac_payload.fhdr.f_cnt;
        if f_cnt > u32::from(u16::MAX) {
            debug!(f_cnt, "rejecting frame counter wider than the wire field");
            return Err(Error::structural_from(
                "frame counter does not fit the frame",
                PhyError::FCntOverflow(f_cnt),
            ));
        }

        Ok(Self {
            mhdr,
            mac_payload,
            mic,
            metadata,
        })
    }

    /// Device EUI derived from the frame's device address
    pub fn dev_eui(&self) -> EUI64 {
        EUI64::from_dev_addr(self.mac_payload.fhdr.dev_addr)
    }

    /// Metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// MAC header of the frame
    pub fn mhdr(&self) -> MHDR {
        self.mhdr
    }

    /// Data MAC payload of the frame
    pub fn mac_payload(&self) -> &MacPayload {
        &self.mac_payload
    }

    /// Frame MIC
    pub fn mic(&self) -> [u8; MIC_SIZE] {
        self.mic
    }

    /// Rebuild the physical frame
    pub fn payload(&self) -> PhyPayload {
        PhyPayload {
            mhdr: self.mhdr,
            mac_payload: Some(MacPayloadKind::Data(self.mac_payload.clone())),
            mic: self.mic,
        }
    }

    /// Split back into frame and metadata
    pub fn into_parts(self) -> (PhyPayload, Metadata) {
        let payload = PhyPayload {
            mhdr: self.mhdr,
            mac_payload: Some(MacPayloadKind::Data(self.mac_payload)),
            mic: self.mic,
        };
        (payload, self.metadata)
    }
}

impl Packet for RPacket {
    /// `[direction][metadata JSON][frame]`, each field length-prefixed
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let direction = Direction::from_mtype(self.mhdr.mtype)?;
        let metadata = self.metadata.to_json()?;
        let frame = self
            .payload()
            .to_bytes()
            .map_err(|err| Error::structural_from("cannot encode frame", err))?;

        let mut writer = FieldWriter::new();
        writer.write(&[direction as u8]);
        writer.write(&metadata);
        writer.write(&frame);
        let data = writer.into_bytes()?;

        trace!(?direction, frame_len = frame.len(), len = data.len(), "encoded router packet");
        Ok(data)
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);
        let tag = reader.read_array::<1>("direction")?;
        let metadata = reader.read_required("metadata")?;
        let frame = reader.read_required("frame")?;
        if !reader.remaining().is_empty() {
            return Err(Error::structural("unexpected bytes after router packet"));
        }

        let direction = Direction::from_tag(tag[0])?;
        let metadata = Metadata::from_json(metadata)?;
        let payload = PhyPayload::from_bytes(frame, direction == Direction::Up).map_err(|err| {
            debug!(%err, "cannot decode router packet frame");
            Error::structural_from("cannot decode frame", err)
        })?;

        trace!(?direction, frame_len = frame.len(), "decoded router packet");
        RPacket::new(payload, metadata)
    }
}

impl fmt::Display for RPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RPacket {{\n\t{}\n\tDevEUI: {}\n\tPayload: {:?}\n}}",
            self.metadata,
            self.dev_eui(),
            self.payload()
        )
    }
}
