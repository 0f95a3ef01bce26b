//! LoRaWAN physical-layer frame codec
//!
//! This module contains the over-the-air frame format, including:
//! - MAC header and frame header
//! - Data, join-request and join-accept MAC payloads
//! - MAC commands
//! - Frame encoding, decoding and MIC checks

/// MAC command handling
pub mod commands;

/// MAC payload types
pub mod mac;

/// Physical-layer frame
pub mod phy;

pub use commands::MacCommand;
pub use mac::{
    DataPayload, FCtrl, FrmPayload, JoinAcceptPayload, JoinRequestPayload, MType, MacPayload,
    MacPayloadKind, Major, FHDR, MHDR,
};
pub use phy::{PhyPayload, MAX_FRAME_SIZE};
