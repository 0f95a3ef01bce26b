use super::mac::{
    JoinAcceptPayload, JoinRequestPayload, MType, MacPayload, MacPayloadKind, MHDR,
};
use crate::config::device::AESKey;
use crate::crypto::{self, Direction, MIC_SIZE};
use crate::error::PhyError;

/// Largest PHYPayload a LoRa radio carries
pub const MAX_FRAME_SIZE: usize = 255;

/// Physical-layer frame: MHDR, MAC payload and MIC
#[derive(Debug, Clone, PartialEq)]
pub struct PhyPayload {
    /// MAC header
    pub mhdr: MHDR,
    /// MAC payload; `None` until one is attached
    pub mac_payload: Option<MacPayloadKind>,
    /// Message integrity code
    pub mic: [u8; MIC_SIZE],
}

impl PhyPayload {
    /// Frame with a header and nothing else
    pub fn new(mhdr: MHDR) -> Self {
        Self {
            mhdr,
            mac_payload: None,
            mic: [0; MIC_SIZE],
        }
    }

    /// Frame with a header and MAC payload, MIC unset
    pub fn with_payload(mhdr: MHDR, mac_payload: MacPayloadKind) -> Self {
        Self {
            mhdr,
            mac_payload: Some(mac_payload),
            mic: [0; MIC_SIZE],
        }
    }

    /// Direction implied by the message type
    pub fn is_uplink(&self) -> Option<bool> {
        self.mhdr.mtype.is_uplink()
    }

    /// Data frame payload, if the frame carries one
    pub fn data_payload(&self) -> Option<&MacPayload> {
        self.mac_payload.as_ref().and_then(MacPayloadKind::as_data)
    }

    /// Encode everything but the MIC
    fn mic_input(&self) -> Result<Vec<u8>, PhyError> {
        let mut out = vec![self.mhdr.to_byte()];
        if let Some(mac_payload) = &self.mac_payload {
            mac_payload.serialize(&mut out, self.mhdr.mtype)?;
        }
        if out.len() + MIC_SIZE > MAX_FRAME_SIZE {
            return Err(PhyError::FrameTooLong(out.len() + MIC_SIZE));
        }
        Ok(out)
    }

    /// Encode the frame as sent over the air.
    ///
    /// Fails rather than write a frame that would parse back differently.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PhyError> {
        let mut out = self.mic_input()?;
        out.extend_from_slice(&self.mic);
        Ok(out)
    }

    /// Decode a frame. `uplink` selects how MAC commands are read.
    pub fn from_bytes(data: &[u8], uplink: bool) -> Result<Self, PhyError> {
        if data.len() < 1 + MIC_SIZE {
            return Err(PhyError::TooShort {
                expected: 1 + MIC_SIZE,
                actual: data.len(),
            });
        }
        if data.len() > MAX_FRAME_SIZE {
            return Err(PhyError::FrameTooLong(data.len()));
        }

        let mhdr = MHDR::from_byte(data[0])?;
        let (body, mic) = data[1..].split_at(data.len() - 1 - MIC_SIZE);

        let mac_payload = match mhdr.mtype {
            MType::JoinRequest => MacPayloadKind::JoinRequest(JoinRequestPayload::parse(body)?),
            MType::JoinAccept => MacPayloadKind::JoinAccept(JoinAcceptPayload::parse(body)?),
            MType::UnconfirmedDataUp
            | MType::UnconfirmedDataDown
            | MType::ConfirmedDataUp
            | MType::ConfirmedDataDown => MacPayloadKind::Data(MacPayload::parse(body, uplink)?),
            MType::Proprietary => MacPayloadKind::Proprietary(body.to_vec()),
            MType::RejoinRequest => return Err(PhyError::UnsupportedMType(data[0] & 0xE0)),
        };

        Ok(Self {
            mhdr,
            mac_payload: Some(mac_payload),
            mic: [mic[0], mic[1], mic[2], mic[3]],
        })
    }

    /// Compute the MIC for the current contents
    pub fn compute_mic(&self, key: &AESKey) -> Result<[u8; MIC_SIZE], PhyError> {
        let msg = self.mic_input()?;
        match &self.mac_payload {
            None => Err(PhyError::MissingMacPayload),
            Some(MacPayloadKind::Data(payload)) => {
                let uplink = self
                    .is_uplink()
                    .ok_or(PhyError::UnsupportedMType(self.mhdr.mtype as u8))?;
                Ok(crypto::compute_mic(
                    key,
                    &msg,
                    payload.fhdr.dev_addr,
                    payload.fhdr.f_cnt,
                    Direction::from_uplink(uplink),
                ))
            }
            Some(MacPayloadKind::JoinRequest(_)) | Some(MacPayloadKind::JoinAccept(_)) => {
                Ok(crypto::compute_join_mic(key, &msg))
            }
            Some(MacPayloadKind::Proprietary(_)) => {
                Err(PhyError::UnsupportedMType(self.mhdr.mtype as u8))
            }
        }
    }

    /// Compute and store the MIC
    pub fn set_mic(&mut self, key: &AESKey) -> Result<(), PhyError> {
        self.mic = self.compute_mic(key)?;
        Ok(())
    }

    /// Check the stored MIC against `key`
    pub fn validate_mic(&self, key: &AESKey) -> Result<bool, PhyError> {
        Ok(self.compute_mic(key)? == self.mic)
    }
}
