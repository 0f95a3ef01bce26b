use crate::error::PhyError;

/// Longest encoded MAC command: CID plus a 5-byte NewChannelReq body
pub const MAX_COMMAND_SIZE: usize = 6;

/// MAC command identifiers
///
/// Requests and answers share an identifier; the frame direction tells them
/// apart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandIdentifier {
    /// Link check
    LinkCheck = 0x02,
    /// Adaptive data rate
    LinkADR = 0x03,
    /// Duty cycle limit
    DutyCycle = 0x04,
    /// RX window parameters
    RXParamSetup = 0x05,
    /// Device status
    DevStatus = 0x06,
    /// Channel creation or change
    NewChannel = 0x07,
    /// RX1 delay
    RXTimingSetup = 0x08,
    /// Dwell time and EIRP
    TxParamSetup = 0x09,
    /// Downlink frequency of a channel
    DlChannel = 0x0A,
}

impl CommandIdentifier {
    /// Look up a command identifier
    pub fn from_u8(cid: u8) -> Option<Self> {
        match cid {
            0x02 => Some(Self::LinkCheck),
            0x03 => Some(Self::LinkADR),
            0x04 => Some(Self::DutyCycle),
            0x05 => Some(Self::RXParamSetup),
            0x06 => Some(Self::DevStatus),
            0x07 => Some(Self::NewChannel),
            0x08 => Some(Self::RXTimingSetup),
            0x09 => Some(Self::TxParamSetup),
            0x0A => Some(Self::DlChannel),
            _ => None,
        }
    }

    /// Payload length of this command in the given direction
    pub fn payload_len(self, uplink: bool) -> usize {
        match (self, uplink) {
            (Self::LinkCheck, true) => 0,
            (Self::LinkCheck, false) => 2,
            (Self::LinkADR, true) => 1,
            (Self::LinkADR, false) => 4,
            (Self::DutyCycle, true) => 0,
            (Self::DutyCycle, false) => 1,
            (Self::RXParamSetup, true) => 1,
            (Self::RXParamSetup, false) => 4,
            (Self::DevStatus, true) => 2,
            (Self::DevStatus, false) => 0,
            (Self::NewChannel, true) => 1,
            (Self::NewChannel, false) => 5,
            (Self::RXTimingSetup, true) => 0,
            (Self::RXTimingSetup, false) => 1,
            (Self::TxParamSetup, true) => 0,
            (Self::TxParamSetup, false) => 1,
            (Self::DlChannel, true) => 1,
            (Self::DlChannel, false) => 4,
        }
    }
}

/// MAC command
#[derive(Debug, Clone, PartialEq)]
pub enum MacCommand {
    /// Link check request
    LinkCheckReq,
    /// Link check answer
    LinkCheckAns {
        /// Link margin in dB
        margin: u8,
        /// Number of gateways that received the request
        gateway_count: u8,
    },
    /// Link ADR request
    LinkADRReq {
        /// Data rate
        data_rate: u8,
        /// TX power
        tx_power: u8,
        /// Channel mask
        ch_mask: u16,
        /// Channel mask control
        ch_mask_cntl: u8,
        /// Number of transmissions
        nb_trans: u8,
    },
    /// Link ADR answer
    LinkADRAns {
        /// Power ACK
        power_ack: bool,
        /// Data rate ACK
        data_rate_ack: bool,
        /// Channel mask ACK
        channel_mask_ack: bool,
    },
    /// Duty cycle request
    DutyCycleReq {
        /// Maximum duty cycle
        max_duty_cycle: u8,
    },
    /// Duty cycle answer
    DutyCycleAns,
    /// RX parameter setup request
    RXParamSetupReq {
        /// RX1 data rate offset
        rx1_dr_offset: u8,
        /// RX2 data rate
        rx2_data_rate: u8,
        /// RX2 frequency in Hz (multiple of 100)
        freq: u32,
    },
    /// RX parameter setup answer
    RXParamSetupAns {
        /// RX1 data rate offset ACK
        rx1_dr_offset_ack: bool,
        /// RX2 data rate ACK
        rx2_data_rate_ack: bool,
        /// Channel ACK
        channel_ack: bool,
    },
    /// Device status request
    DevStatusReq,
    /// Device status answer
    DevStatusAns {
        /// Battery level (0 = external power, 1-254 = level, 255 = unknown)
        battery: u8,
        /// Demodulation margin in dB (-32..=31)
        margin: i8,
    },
    /// New channel request
    NewChannelReq {
        /// Channel index
        ch_index: u8,
        /// Frequency in Hz (multiple of 100)
        freq: u32,
        /// Maximum data rate
        max_dr: u8,
        /// Minimum data rate
        min_dr: u8,
    },
    /// New channel answer
    NewChannelAns {
        /// Channel frequency OK
        channel_freq_ok: bool,
        /// Data rate OK
        data_rate_ok: bool,
    },
    /// RX timing setup request
    RXTimingSetupReq {
        /// Delay (0-15)
        delay: u8,
    },
    /// RX timing setup answer
    RXTimingSetupAns,
    /// TX parameter setup request
    TxParamSetupReq {
        /// Downlink dwell time
        downlink_dwell_time: bool,
        /// Uplink dwell time
        uplink_dwell_time: bool,
        /// Maximum EIRP
        max_eirp: u8,
    },
    /// TX parameter setup answer
    TxParamSetupAns,
    /// Downlink channel request
    DlChannelReq {
        /// Channel index
        ch_index: u8,
        /// Frequency in Hz (multiple of 100)
        freq: u32,
    },
    /// Downlink channel answer
    DlChannelAns {
        /// Channel frequency OK
        channel_freq_ok: bool,
        /// Uplink frequency exists
        uplink_freq_exists: bool,
    },
}

fn freq_from_bytes(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]) * 100
}

fn freq_fits(freq: u32) -> bool {
    freq % 100 == 0 && freq / 100 < (1 << 24)
}

fn freq_to_bytes(freq: u32) -> [u8; 3] {
    let raw = (freq / 100).to_le_bytes();
    [raw[0], raw[1], raw[2]]
}

impl MacCommand {
    /// Parse one MAC command body. `payload` must hold exactly the body
    /// length for `cid` in this direction.
    fn from_parts(cid: CommandIdentifier, payload: &[u8], uplink: bool) -> Self {
        use CommandIdentifier as C;

        match (cid, uplink) {
            (C::LinkCheck, true) => MacCommand::LinkCheckReq,
            (C::LinkCheck, false) => MacCommand::LinkCheckAns {
                margin: payload[0],
                gateway_count: payload[1],
            },
            (C::LinkADR, true) => MacCommand::LinkADRAns {
                power_ack: (payload[0] & 0x04) != 0,
                data_rate_ack: (payload[0] & 0x02) != 0,
                channel_mask_ack: (payload[0] & 0x01) != 0,
            },
            (C::LinkADR, false) => MacCommand::LinkADRReq {
                data_rate: payload[0] >> 4,
                tx_power: payload[0] & 0x0F,
                ch_mask: u16::from_le_bytes([payload[1], payload[2]]),
                ch_mask_cntl: (payload[3] >> 4) & 0x07,
                nb_trans: payload[3] & 0x0F,
            },
            (C::DutyCycle, true) => MacCommand::DutyCycleAns,
            (C::DutyCycle, false) => MacCommand::DutyCycleReq {
                max_duty_cycle: payload[0] & 0x0F,
            },
            (C::RXParamSetup, true) => MacCommand::RXParamSetupAns {
                rx1_dr_offset_ack: (payload[0] & 0x04) != 0,
                rx2_data_rate_ack: (payload[0] & 0x02) != 0,
                channel_ack: (payload[0] & 0x01) != 0,
            },
            (C::RXParamSetup, false) => MacCommand::RXParamSetupReq {
                rx1_dr_offset: (payload[0] >> 4) & 0x07,
                rx2_data_rate: payload[0] & 0x0F,
                freq: freq_from_bytes(&payload[1..4]),
            },
            (C::DevStatus, true) => MacCommand::DevStatusAns {
                battery: payload[0],
                // 6-bit two's complement
                margin: ((payload[1] << 2) as i8) >> 2,
            },
            (C::DevStatus, false) => MacCommand::DevStatusReq,
            (C::NewChannel, true) => MacCommand::NewChannelAns {
                data_rate_ok: (payload[0] & 0x02) != 0,
                channel_freq_ok: (payload[0] & 0x01) != 0,
            },
            (C::NewChannel, false) => MacCommand::NewChannelReq {
                ch_index: payload[0],
                freq: freq_from_bytes(&payload[1..4]),
                max_dr: payload[4] >> 4,
                min_dr: payload[4] & 0x0F,
            },
            (C::RXTimingSetup, true) => MacCommand::RXTimingSetupAns,
            (C::RXTimingSetup, false) => MacCommand::RXTimingSetupReq {
                delay: payload[0] & 0x0F,
            },
            (C::TxParamSetup, true) => MacCommand::TxParamSetupAns,
            (C::TxParamSetup, false) => MacCommand::TxParamSetupReq {
                downlink_dwell_time: (payload[0] & 0x20) != 0,
                uplink_dwell_time: (payload[0] & 0x10) != 0,
                max_eirp: payload[0] & 0x0F,
            },
            (C::DlChannel, true) => MacCommand::DlChannelAns {
                uplink_freq_exists: (payload[0] & 0x02) != 0,
                channel_freq_ok: (payload[0] & 0x01) != 0,
            },
            (C::DlChannel, false) => MacCommand::DlChannelReq {
                ch_index: payload[0],
                freq: freq_from_bytes(&payload[1..4]),
            },
        }
    }

    /// Parse a sequence of MAC commands (FOpts, or an FRMPayload on port 0)
    pub fn parse_all(data: &[u8], uplink: bool) -> Result<Vec<Self>, PhyError> {
        let mut commands = Vec::new();
        let mut rest = data;
        while let Some((&cid, tail)) = rest.split_first() {
            let id = CommandIdentifier::from_u8(cid)
                .ok_or(PhyError::UnknownCommand { cid, uplink })?;
            let len = id.payload_len(uplink);
            if tail.len() < len {
                return Err(PhyError::TruncatedCommand { cid });
            }
            let (payload, next) = tail.split_at(len);
            commands.push(Self::from_parts(id, payload, uplink));
            rest = next;
        }
        Ok(commands)
    }

    /// Command identifier
    pub fn cid(&self) -> CommandIdentifier {
        use CommandIdentifier as C;

        match self {
            MacCommand::LinkCheckReq | MacCommand::LinkCheckAns { .. } => C::LinkCheck,
            MacCommand::LinkADRReq { .. } | MacCommand::LinkADRAns { .. } => C::LinkADR,
            MacCommand::DutyCycleReq { .. } | MacCommand::DutyCycleAns => C::DutyCycle,
            MacCommand::RXParamSetupReq { .. } | MacCommand::RXParamSetupAns { .. } => {
                C::RXParamSetup
            }
            MacCommand::DevStatusReq | MacCommand::DevStatusAns { .. } => C::DevStatus,
            MacCommand::NewChannelReq { .. } | MacCommand::NewChannelAns { .. } => C::NewChannel,
            MacCommand::RXTimingSetupReq { .. } | MacCommand::RXTimingSetupAns => {
                C::RXTimingSetup
            }
            MacCommand::TxParamSetupReq { .. } | MacCommand::TxParamSetupAns => C::TxParamSetup,
            MacCommand::DlChannelReq { .. } | MacCommand::DlChannelAns { .. } => C::DlChannel,
        }
    }

    /// Whether the command travels uplink (device to network)
    pub fn is_uplink(&self) -> bool {
        matches!(
            self,
            MacCommand::LinkCheckReq
                | MacCommand::LinkADRAns { .. }
                | MacCommand::DutyCycleAns
                | MacCommand::RXParamSetupAns { .. }
                | MacCommand::DevStatusAns { .. }
                | MacCommand::NewChannelAns { .. }
                | MacCommand::RXTimingSetupAns
                | MacCommand::TxParamSetupAns
                | MacCommand::DlChannelAns { .. }
        )
    }

    /// Get command payload length in bytes, CID excluded
    pub fn len(&self) -> usize {
        self.cid().payload_len(self.is_uplink())
    }

    /// Whether the command has no payload beyond its CID
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every field fits the bits it is given on the wire
    pub fn fields_in_range(&self) -> bool {
        match *self {
            MacCommand::LinkADRReq { data_rate, tx_power, ch_mask_cntl, nb_trans, .. } => {
                data_rate <= 0x0F && tx_power <= 0x0F && ch_mask_cntl <= 0x07 && nb_trans <= 0x0F
            }
            MacCommand::DutyCycleReq { max_duty_cycle } => max_duty_cycle <= 0x0F,
            MacCommand::RXParamSetupReq { rx1_dr_offset, rx2_data_rate, freq } => {
                rx1_dr_offset <= 0x07 && rx2_data_rate <= 0x0F && freq_fits(freq)
            }
            MacCommand::DevStatusAns { margin, .. } => (-32..=31).contains(&margin),
            MacCommand::NewChannelReq { freq, max_dr, min_dr, .. } => {
                freq_fits(freq) && max_dr <= 0x0F && min_dr <= 0x0F
            }
            MacCommand::RXTimingSetupReq { delay } => delay <= 0x0F,
            MacCommand::TxParamSetupReq { max_eirp, .. } => max_eirp <= 0x0F,
            MacCommand::DlChannelReq { freq, .. } => freq_fits(freq),
            _ => true,
        }
    }

    /// Encode the command, CID first.
    ///
    /// Fails when a field does not fit its bits on the wire.
    pub fn to_bytes(&self) -> Result<heapless::Vec<u8, MAX_COMMAND_SIZE>, PhyError> {
        let cid = self.cid() as u8;
        if !self.fields_in_range() {
            return Err(PhyError::CommandFieldOutOfRange { cid });
        }

        let mut raw = [0u8; MAX_COMMAND_SIZE];
        raw[0] = cid;
        let body = &mut raw[1..];

        match *self {
            MacCommand::LinkCheckReq
            | MacCommand::DutyCycleAns
            | MacCommand::DevStatusReq
            | MacCommand::RXTimingSetupAns
            | MacCommand::TxParamSetupAns => {}
            MacCommand::LinkCheckAns { margin, gateway_count } => {
                body[0] = margin;
                body[1] = gateway_count;
            }
            MacCommand::LinkADRReq { data_rate, tx_power, ch_mask, ch_mask_cntl, nb_trans } => {
                body[0] = (data_rate << 4) | (tx_power & 0x0F);
                body[1..3].copy_from_slice(&ch_mask.to_le_bytes());
                body[3] = ((ch_mask_cntl & 0x07) << 4) | (nb_trans & 0x0F);
            }
            MacCommand::LinkADRAns { power_ack, data_rate_ack, channel_mask_ack } => {
                body[0] = (u8::from(power_ack) << 2)
                    | (u8::from(data_rate_ack) << 1)
                    | u8::from(channel_mask_ack);
            }
            MacCommand::DutyCycleReq { max_duty_cycle } => {
                body[0] = max_duty_cycle & 0x0F;
            }
            MacCommand::RXParamSetupReq { rx1_dr_offset, rx2_data_rate, freq } => {
                body[0] = ((rx1_dr_offset & 0x07) << 4) | (rx2_data_rate & 0x0F);
                body[1..4].copy_from_slice(&freq_to_bytes(freq));
            }
            MacCommand::RXParamSetupAns { rx1_dr_offset_ack, rx2_data_rate_ack, channel_ack } => {
                body[0] = (u8::from(rx1_dr_offset_ack) << 2)
                    | (u8::from(rx2_data_rate_ack) << 1)
                    | u8::from(channel_ack);
            }
            MacCommand::DevStatusAns { battery, margin } => {
                body[0] = battery;
                body[1] = (margin as u8) & 0x3F;
            }
            MacCommand::NewChannelReq { ch_index, freq, max_dr, min_dr } => {
                body[0] = ch_index;
                body[1..4].copy_from_slice(&freq_to_bytes(freq));
                body[4] = (max_dr << 4) | (min_dr & 0x0F);
            }
            MacCommand::NewChannelAns { channel_freq_ok, data_rate_ok } => {
                body[0] = (u8::from(data_rate_ok) << 1) | u8::from(channel_freq_ok);
            }
            MacCommand::RXTimingSetupReq { delay } => {
                body[0] = delay & 0x0F;
            }
            MacCommand::TxParamSetupReq { downlink_dwell_time, uplink_dwell_time, max_eirp } => {
                body[0] = (u8::from(downlink_dwell_time) << 5)
                    | (u8::from(uplink_dwell_time) << 4)
                    | (max_eirp & 0x0F);
            }
            MacCommand::DlChannelReq { ch_index, freq } => {
                body[0] = ch_index;
                body[1..4].copy_from_slice(&freq_to_bytes(freq));
            }
            MacCommand::DlChannelAns { channel_freq_ok, uplink_freq_exists } => {
                body[0] = (u8::from(uplink_freq_exists) << 1) | u8::from(channel_freq_ok);
            }
        }

        let len = 1 + self.len();
        debug_assert!(len <= MAX_COMMAND_SIZE);
        Ok(raw[..len].iter().copied().collect())
    }
}
