//! Gateway and radio metadata
//!
//! Telemetry that travels next to a frame: channel, data rate, signal
//! quality, timing and duty-cycle figures. Packets only ever move it around
//! as JSON; none of the values are checked here.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata attached to a received or scheduled frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Duty cycle of the RX1 window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty_rx1: Option<u32>,
    /// Duty cycle of the RX2 window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty_rx2: Option<u32>,
    /// Concentrator IF channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chan: Option<u32>,
    /// Coding rate, e.g. "4/5"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codr: Option<String>,
    /// Data rate identifier, e.g. "SF7BW125"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datr: Option<String>,
    /// FSK frequency deviation in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fdev: Option<u32>,
    /// Frequency in MHz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq: Option<f64>,
    /// Send immediately, ignoring the timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imme: Option<bool>,
    /// Inverted polarity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipol: Option<bool>,
    /// LoRa SNR in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsnr: Option<f64>,
    /// Modulation, "LORA" or "FSK"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modu: Option<String>,
    /// Disable CRC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ncrc: Option<bool>,
    /// TX output power in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powe: Option<u32>,
    /// Preamble size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prea: Option<u32>,
    /// Concentrator RF chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfch: Option<u32>,
    /// RSSI in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    /// Payload size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// CRC status (1 ok, -1 fail, 0 none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<i32>,
    /// UTC reception time, RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Concentrator internal timestamp in microseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmst: Option<u32>,
}

impl Metadata {
    /// Encode as JSON.
    ///
    /// NaN and infinities have no JSON form, so a non-finite `freq` or
    /// `lsnr` is refused instead of being written as `null`.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        for (name, value) in [("freq", self.freq), ("lsnr", self.lsnr)] {
            if value.is_some_and(|value| !value.is_finite()) {
                return Err(Error::structural(format!("metadata {} is not finite", name)));
            }
        }
        serde_json::to_vec(self).map_err(|err| Error::structural_from("cannot encode metadata", err))
    }

    /// Decode from JSON
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|err| Error::structural_from("cannot decode metadata", err))
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Compact form of the set fields, same keys as the JSON encoding.
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "Metadata {}", json),
            Err(_) => f.write_str("Metadata {?}"),
        }
    }
}
