//! Packets exchanged between network server tiers
//!
//! Each tier sees the same radio frame through a different packet shape:
//! - [`RPacket`]: full frame plus metadata, at the gateway-facing router
//! - [`BPacket`]: a router packet narrowed to one opaque data payload, at the broker
//! - [`HPacket`]: identifiers, raw payload and metadata, between broker and handler
//! - [`APacket`]: payload and per-gateway metadata, for the end application
//! - [`JoinPacket`] and [`AcceptPacket`]: the join procedure
//!
//! Every shape encodes to a compact length-prefixed binary form through the
//! [`Packet`] trait.

use core::fmt;

use crate::config::device::EUI64;
use crate::error::Result;

mod accept;
mod apacket;
mod base;
mod bpacket;
mod hpacket;
mod join;
mod rpacket;

pub use accept::AcceptPacket;
pub use apacket::APacket;
pub use bpacket::BPacket;
pub use hpacket::HPacket;
pub use join::JoinPacket;
pub use rpacket::{Direction, RPacket};

/// Binary encoding shared by every packet shape
pub trait Packet: fmt::Display + Sized {
    /// Encode to bytes
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Decode from bytes, rejecting anything that would not pass construction
    fn from_bytes(data: &[u8]) -> Result<Self>;
}

/// Application and device identity plus raw payload
///
/// Implemented by the handler-side packets built on a common identity carrier.
pub trait Identity {
    /// Application EUI
    fn app_eui(&self) -> EUI64;

    /// Device EUI
    fn dev_eui(&self) -> EUI64;

    /// Raw payload bytes
    fn payload(&self) -> &[u8];
}

/// Upper-case hex view of a byte slice
pub(crate) struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
