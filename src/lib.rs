//! LoRaWAN packet model for multi-tier network servers
//!
//! This crate provides the packet shapes passed between the stages of a
//! LoRaWAN network server (router, broker, handler, application) and their
//! compact binary encoding.
//!
//! # Features
//! - Router, broker, handler, application, join and accept packets
//! - Construction-time checks so malformed frames stop at the first tier
//! - Length-prefixed binary encoding for inter-stage transport
//! - A LoRaWAN 1.0 frame codec with MAC commands and MIC checks
//!
//! # Example
//! ```
//! use lorawan_packets::{
//!     config::device::{DevAddr, EUI64},
//!     lorawan::{FCtrl, MType, MacPayload, MacPayloadKind, PhyPayload, FHDR, MHDR},
//!     metadata::Metadata,
//!     packets::{BPacket, Packet},
//! };
//!
//! let fhdr = FHDR {
//!     dev_addr: DevAddr::new([0x26, 0x01, 0x1B, 0xDA]),
//!     f_ctrl: FCtrl::default(),
//!     f_cnt: 42,
//!     f_opts: Vec::new(),
//! };
//! let frame = PhyPayload::with_payload(
//!     MHDR::new(MType::UnconfirmedDataUp),
//!     MacPayloadKind::Data(MacPayload::with_data(fhdr, 1, b"ping".to_vec())),
//! );
//!
//! let packet = BPacket::new(frame, Metadata::default()).unwrap();
//! assert_eq!(packet.f_cnt(), 42);
//!
//! let bytes = packet.to_bytes().unwrap();
//! assert_eq!(BPacket::from_bytes(&bytes).unwrap(), packet);
//! assert_eq!(packet.dev_eui(), EUI64::new([0, 0, 0, 0, 0x26, 0x01, 0x1B, 0xDA]));
//! ```

#![warn(missing_docs)]

/// Identifiers and keys
pub mod config;

/// Cryptographic functions
pub mod crypto;

/// Error types
pub mod error;

/// Length-prefixed field framing
pub mod framing;

/// LoRaWAN frame codec
pub mod lorawan;

/// Gateway and radio metadata
pub mod metadata;

/// Inter-tier packets
pub mod packets;

pub use error::{Error, ErrorKind, Result};
pub use metadata::Metadata;
pub use packets::{APacket, AcceptPacket, BPacket, HPacket, Identity, JoinPacket, Packet, RPacket};
