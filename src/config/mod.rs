//! Device identity types
//!
//! This module contains the fixed-width identifiers carried by every packet:
//! - Device and application EUIs
//! - Device addresses
//! - AES-128 keys (carried as opaque values)

/// Identifier and key value types
pub mod device;

pub use device::{AESKey, DevAddr, EUI64};
