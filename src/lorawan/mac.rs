use super::commands::{MacCommand, MAX_COMMAND_SIZE};
use crate::config::device::{DevAddr, EUI64};
use crate::error::PhyError;

/// Maximum encoded FOpts size
pub const MAX_FOPTS_SIZE: usize = 15;

/// Encoded FHDR size without FOpts
pub const FHDR_MIN_SIZE: usize = 7;

/// Join request payload size
pub const JOIN_REQUEST_SIZE: usize = 18;

/// Join accept payload size without CFList
pub const JOIN_ACCEPT_SIZE: usize = 12;

/// CFList size
pub const CF_LIST_SIZE: usize = 16;

/// MAC header types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MType {
    /// Join request (uplink)
    JoinRequest = 0x00,
    /// Join accept (downlink)
    JoinAccept = 0x20,
    /// Unconfirmed data uplink
    UnconfirmedDataUp = 0x40,
    /// Unconfirmed data downlink
    UnconfirmedDataDown = 0x60,
    /// Confirmed data uplink
    ConfirmedDataUp = 0x80,
    /// Confirmed data downlink
    ConfirmedDataDown = 0xA0,
    /// Rejoin request (LoRaWAN 1.1)
    RejoinRequest = 0xC0,
    /// Proprietary, non-standard format
    Proprietary = 0xE0,
}

impl MType {
    /// Message type from the top three bits of an MHDR byte
    pub fn from_byte(byte: u8) -> Self {
        match byte & 0xE0 {
            0x00 => MType::JoinRequest,
            0x20 => MType::JoinAccept,
            0x40 => MType::UnconfirmedDataUp,
            0x60 => MType::UnconfirmedDataDown,
            0x80 => MType::ConfirmedDataUp,
            0xA0 => MType::ConfirmedDataDown,
            0xC0 => MType::RejoinRequest,
            _ => MType::Proprietary,
        }
    }

    /// Frame direction, if this message type has a fixed one
    pub fn is_uplink(self) -> Option<bool> {
        match self {
            MType::JoinRequest | MType::UnconfirmedDataUp | MType::ConfirmedDataUp => Some(true),
            MType::JoinAccept | MType::UnconfirmedDataDown | MType::ConfirmedDataDown => {
                Some(false)
            }
            MType::RejoinRequest | MType::Proprietary => None,
        }
    }

    /// Whether the frame carries a FHDR and application data
    pub fn is_data(self) -> bool {
        matches!(
            self,
            MType::UnconfirmedDataUp
                | MType::UnconfirmedDataDown
                | MType::ConfirmedDataUp
                | MType::ConfirmedDataDown
        )
    }
}

/// LoRaWAN major version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Major {
    /// LoRaWAN R1
    #[default]
    LoRaWANR1 = 0x00,
}

/// MAC header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MHDR {
    /// Message type
    pub mtype: MType,
    /// Major version
    pub major: Major,
}

impl MHDR {
    /// Header for a message type, LoRaWAN R1
    pub fn new(mtype: MType) -> Self {
        Self {
            mtype,
            major: Major::LoRaWANR1,
        }
    }

    /// Encode as one byte
    pub fn to_byte(&self) -> u8 {
        self.mtype as u8 | self.major as u8
    }

    /// Decode from one byte
    pub fn from_byte(byte: u8) -> Result<Self, PhyError> {
        let major = match byte & 0x03 {
            0x00 => Major::LoRaWANR1,
            other => return Err(PhyError::UnsupportedMajor(other)),
        };
        Ok(Self {
            mtype: MType::from_byte(byte),
            major,
        })
    }
}

/// Frame header flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FCtrl {
    /// Adaptive data rate enabled
    pub adr: bool,
    /// ADR acknowledgment request (uplink)
    pub adr_ack_req: bool,
    /// Acknowledges the last confirmed frame
    pub ack: bool,
    /// Frame pending (downlink) or Class B enabled (uplink)
    pub f_pending: bool,
}

impl FCtrl {
    fn to_byte(self, f_opts_len: u8) -> u8 {
        let mut byte = f_opts_len & 0x0F;
        if self.adr {
            byte |= 0x80;
        }
        if self.adr_ack_req {
            byte |= 0x40;
        }
        if self.ack {
            byte |= 0x20;
        }
        if self.f_pending {
            byte |= 0x10;
        }
        byte
    }

    fn from_byte(byte: u8) -> Self {
        Self {
            adr: (byte & 0x80) != 0,
            adr_ack_req: (byte & 0x40) != 0,
            ack: (byte & 0x20) != 0,
            f_pending: (byte & 0x10) != 0,
        }
    }
}

/// Frame header
#[derive(Debug, Clone, PartialEq)]
pub struct FHDR {
    /// Device address
    pub dev_addr: DevAddr,
    /// Frame control flags
    pub f_ctrl: FCtrl,
    /// Full frame counter; only the low 16 bits go over the air
    pub f_cnt: u32,
    /// MAC commands piggybacked in the header
    pub f_opts: Vec<MacCommand>,
}

/// Encode a MAC command for a frame travelling in direction `uplink`
fn command_bytes(
    command: &MacCommand,
    uplink: bool,
) -> Result<heapless::Vec<u8, MAX_COMMAND_SIZE>, PhyError> {
    if command.is_uplink() != uplink {
        return Err(PhyError::CommandDirection {
            cid: command.cid() as u8,
            uplink,
        });
    }
    command.to_bytes()
}

impl FHDR {
    fn serialize(&self, out: &mut Vec<u8>, uplink: bool) -> Result<(), PhyError> {
        let mut f_opts: heapless::Vec<u8, MAX_FOPTS_SIZE> = heapless::Vec::new();
        for command in &self.f_opts {
            f_opts
                .extend_from_slice(&command_bytes(command, uplink)?)
                .map_err(|_| PhyError::FOptsTooLong)?;
        }

        out.extend_from_slice(&self.dev_addr.to_le_bytes());
        out.push(self.f_ctrl.to_byte(f_opts.len() as u8));
        out.extend_from_slice(&(self.f_cnt as u16).to_le_bytes());
        out.extend_from_slice(&f_opts);
        Ok(())
    }

    /// Parse a frame header, returning it with the bytes that follow
    fn parse(data: &[u8], uplink: bool) -> Result<(Self, &[u8]), PhyError> {
        if data.len() < FHDR_MIN_SIZE {
            return Err(PhyError::TooShort {
                expected: FHDR_MIN_SIZE,
                actual: data.len(),
            });
        }
        let f_opts_len = (data[4] & 0x0F) as usize;
        let end = FHDR_MIN_SIZE + f_opts_len;
        if data.len() < end {
            return Err(PhyError::TooShort {
                expected: end,
                actual: data.len(),
            });
        }

        let fhdr = FHDR {
            dev_addr: DevAddr::from_le_bytes([data[0], data[1], data[2], data[3]]),
            f_ctrl: FCtrl::from_byte(data[4]),
            f_cnt: u16::from_le_bytes([data[5], data[6]]) as u32,
            f_opts: MacCommand::parse_all(&data[FHDR_MIN_SIZE..end], uplink)?,
        };
        Ok((fhdr, &data[end..]))
    }
}

/// Opaque application data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPayload {
    /// Payload bytes, still encrypted with the session key
    pub bytes: Vec<u8>,
}

/// One element of an FRMPayload
#[derive(Debug, Clone, PartialEq)]
pub enum FrmPayload {
    /// Application data (FPort > 0)
    Data(DataPayload),
    /// MAC command (FPort 0)
    MacCommand(MacCommand),
}

/// MAC payload of a data frame
#[derive(Debug, Clone, PartialEq)]
pub struct MacPayload {
    /// Frame header
    pub fhdr: FHDR,
    /// Port; absent when there is no FRMPayload
    pub f_port: Option<u8>,
    /// MAC commands on port 0, otherwise a single data block
    pub frm_payload: Vec<FrmPayload>,
}

impl MacPayload {
    /// Data payload on an application port
    pub fn with_data(fhdr: FHDR, f_port: u8, bytes: Vec<u8>) -> Self {
        Self {
            fhdr,
            f_port: Some(f_port),
            frm_payload: vec![FrmPayload::Data(DataPayload { bytes })],
        }
    }

    /// Encode FHDR, FPort and FRMPayload for a frame travelling in
    /// direction `uplink`.
    ///
    /// Only layouts that parse back to the same value are accepted: MAC
    /// commands of the frame's direction on port 0, or at most one
    /// non-empty data block on any other port.
    pub fn serialize(&self, out: &mut Vec<u8>, uplink: bool) -> Result<(), PhyError> {
        self.fhdr.serialize(out, uplink)?;

        let Some(port) = self.f_port else {
            if self.frm_payload.is_empty() {
                return Ok(());
            }
            return Err(PhyError::PortMismatch);
        };
        out.push(port);

        if port > 0 {
            return match self.frm_payload.as_slice() {
                [] => Ok(()),
                [FrmPayload::Data(data)] if !data.bytes.is_empty() => {
                    out.extend_from_slice(&data.bytes);
                    Ok(())
                }
                [FrmPayload::Data(_)] => Err(PhyError::EmptyData),
                _ => Err(PhyError::MixedPayload),
            };
        }

        for item in &self.frm_payload {
            match item {
                FrmPayload::MacCommand(command) => {
                    out.extend_from_slice(&command_bytes(command, uplink)?)
                }
                FrmPayload::Data(_) => return Err(PhyError::MixedPayload),
            }
        }
        Ok(())
    }

    /// Decode FHDR, FPort and FRMPayload
    pub fn parse(data: &[u8], uplink: bool) -> Result<Self, PhyError> {
        let (fhdr, rest) = FHDR::parse(data, uplink)?;

        let Some((&port, body)) = rest.split_first() else {
            return Ok(Self {
                fhdr,
                f_port: None,
                frm_payload: Vec::new(),
            });
        };

        let frm_payload = if port == 0 {
            MacCommand::parse_all(body, uplink)?
                .into_iter()
                .map(FrmPayload::MacCommand)
                .collect()
        } else if body.is_empty() {
            Vec::new()
        } else {
            vec![FrmPayload::Data(DataPayload {
                bytes: body.to_vec(),
            })]
        };

        Ok(Self {
            fhdr,
            f_port: Some(port),
            frm_payload,
        })
    }
}

/// Join request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinRequestPayload {
    /// Application EUI
    pub app_eui: EUI64,
    /// Device EUI
    pub dev_eui: EUI64,
    /// Device nonce
    pub dev_nonce: [u8; 2],
}

fn reversed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out.reverse();
    out
}

impl JoinRequestPayload {
    /// Encode, EUIs little endian
    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&reversed::<8>(self.app_eui.as_bytes()));
        out.extend_from_slice(&reversed::<8>(self.dev_eui.as_bytes()));
        out.extend_from_slice(&self.dev_nonce);
    }

    /// Decode an 18-byte join request
    pub fn parse(data: &[u8]) -> Result<Self, PhyError> {
        if data.len() != JOIN_REQUEST_SIZE {
            return Err(PhyError::TooShort {
                expected: JOIN_REQUEST_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self {
            app_eui: EUI64::new(reversed(&data[0..8])),
            dev_eui: EUI64::new(reversed(&data[8..16])),
            dev_nonce: [data[16], data[17]],
        })
    }
}

/// Join accept payload, plaintext
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinAcceptPayload {
    /// Application nonce
    pub app_nonce: [u8; 3],
    /// Network identifier
    pub net_id: [u8; 3],
    /// Device address assigned by the network
    pub dev_addr: DevAddr,
    /// RX1 data rate offset and RX2 data rate
    pub dl_settings: u8,
    /// Delay before RX1, in seconds
    pub rx_delay: u8,
    /// Optional channel frequency list
    pub cf_list: Option<[u8; CF_LIST_SIZE]>,
}

impl JoinAcceptPayload {
    /// Encode the plaintext fields
    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.app_nonce);
        out.extend_from_slice(&self.net_id);
        out.extend_from_slice(&self.dev_addr.to_le_bytes());
        out.push(self.dl_settings);
        out.push(self.rx_delay);
        if let Some(cf_list) = &self.cf_list {
            out.extend_from_slice(cf_list);
        }
    }

    /// Decode a 12 or 28-byte join accept
    pub fn parse(data: &[u8]) -> Result<Self, PhyError> {
        let cf_list = match data.len() {
            JOIN_ACCEPT_SIZE => None,
            len if len == JOIN_ACCEPT_SIZE + CF_LIST_SIZE => {
                let mut cf_list = [0u8; CF_LIST_SIZE];
                cf_list.copy_from_slice(&data[JOIN_ACCEPT_SIZE..]);
                Some(cf_list)
            }
            len => return Err(PhyError::InvalidJoinAcceptLength(len)),
        };
        Ok(Self {
            app_nonce: [data[0], data[1], data[2]],
            net_id: [data[3], data[4], data[5]],
            dev_addr: DevAddr::from_le_bytes([data[6], data[7], data[8], data[9]]),
            dl_settings: data[10],
            rx_delay: data[11],
            cf_list,
        })
    }
}

/// MAC payload kinds, resolved once when a frame is parsed
#[derive(Debug, Clone, PartialEq)]
pub enum MacPayloadKind {
    /// Data frame: FHDR, optional FPort and FRMPayload
    Data(MacPayload),
    /// Join request
    JoinRequest(JoinRequestPayload),
    /// Join accept
    JoinAccept(JoinAcceptPayload),
    /// Proprietary frame body, uninterpreted
    Proprietary(Vec<u8>),
}

impl MacPayloadKind {
    /// Data frame payload, if this is one
    pub fn as_data(&self) -> Option<&MacPayload> {
        match self {
            MacPayloadKind::Data(payload) => Some(payload),
            _ => None,
        }
    }

    /// Encode the payload carried under message type `mtype`
    pub fn serialize(&self, out: &mut Vec<u8>, mtype: MType) -> Result<(), PhyError> {
        match self {
            MacPayloadKind::Data(payload) => {
                let uplink = mtype
                    .is_uplink()
                    .ok_or(PhyError::UnsupportedMType(mtype as u8))?;
                payload.serialize(out, uplink)?
            }
            MacPayloadKind::JoinRequest(payload) => payload.serialize(out),
            MacPayloadKind::JoinAccept(payload) => payload.serialize(out),
            MacPayloadKind::Proprietary(bytes) => out.extend_from_slice(bytes),
        }
        Ok(())
    }
}
