use lorawan_packets::{
    config::device::{AESKey, DevAddr, EUI64},
    lorawan::{FCtrl, MType, MacCommand, MacPayload, MacPayloadKind, PhyPayload, FHDR, MHDR},
    metadata::Metadata,
    packets::{APacket, AcceptPacket, BPacket, HPacket, Identity, JoinPacket, Packet, RPacket},
};
use proptest::prelude::*;

fn uplink_command() -> impl Strategy<Value = MacCommand> {
    prop_oneof![
        Just(MacCommand::LinkCheckReq),
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(p, d, c)| {
            MacCommand::LinkADRAns {
                power_ack: p,
                data_rate_ack: d,
                channel_mask_ack: c,
            }
        }),
        Just(MacCommand::DutyCycleAns),
        (any::<u8>(), -32i8..=31)
            .prop_map(|(battery, margin)| MacCommand::DevStatusAns { battery, margin }),
        Just(MacCommand::RXTimingSetupAns),
    ]
}

fn downlink_command() -> impl Strategy<Value = MacCommand> {
    prop_oneof![
        (any::<u8>(), any::<u8>()).prop_map(|(margin, gateway_count)| {
            MacCommand::LinkCheckAns { margin, gateway_count }
        }),
        (0u8..16, 0u8..16, any::<u16>(), 0u8..8, 0u8..16).prop_map(
            |(data_rate, tx_power, ch_mask, ch_mask_cntl, nb_trans)| MacCommand::LinkADRReq {
                data_rate,
                tx_power,
                ch_mask,
                ch_mask_cntl,
                nb_trans,
            }
        ),
        (0u8..16).prop_map(|max_duty_cycle| MacCommand::DutyCycleReq { max_duty_cycle }),
        Just(MacCommand::DevStatusReq),
        (any::<u8>(), 0u32..(1 << 24), 0u8..16, 0u8..16).prop_map(
            |(ch_index, freq, max_dr, min_dr)| MacCommand::NewChannelReq {
                ch_index,
                freq: freq * 100,
                max_dr,
                min_dr,
            }
        ),
        (0u8..16).prop_map(|delay| MacCommand::RXTimingSetupReq { delay }),
    ]
}

/// Commands of either direction with unchecked field values
fn any_command() -> impl Strategy<Value = MacCommand> {
    prop_oneof![
        uplink_command(),
        downlink_command(),
        (any::<u8>(), any::<i8>())
            .prop_map(|(battery, margin)| MacCommand::DevStatusAns { battery, margin }),
        any::<u8>().prop_map(|max_duty_cycle| MacCommand::DutyCycleReq { max_duty_cycle }),
        (any::<u8>(), any::<u32>()).prop_map(|(ch_index, freq)| MacCommand::DlChannelReq {
            ch_index,
            freq
        }),
    ]
}

fn mtype(uplink: bool, confirmed: bool) -> MType {
    match (uplink, confirmed) {
        (true, false) => MType::UnconfirmedDataUp,
        (true, true) => MType::ConfirmedDataUp,
        (false, false) => MType::UnconfirmedDataDown,
        (false, true) => MType::ConfirmedDataDown,
    }
}

#[allow(clippy::too_many_arguments)]
fn data_frame(
    mtype: MType,
    dev_addr: [u8; 4],
    f_ctrl: [bool; 4],
    f_cnt: u32,
    f_opts: Vec<MacCommand>,
    f_port: u8,
    data: Vec<u8>,
    mic: [u8; 4],
) -> PhyPayload {
    let [adr, adr_ack_req, ack, f_pending] = f_ctrl;
    let fhdr = FHDR {
        dev_addr: DevAddr::new(dev_addr),
        f_ctrl: FCtrl { adr, adr_ack_req, ack, f_pending },
        f_cnt,
        f_opts,
    };
    let mut frame = PhyPayload::with_payload(
        MHDR::new(mtype),
        MacPayloadKind::Data(MacPayload::with_data(fhdr, f_port, data)),
    );
    frame.mic = mic;
    frame
}

/// Valid broker frames over both directions, the full 16-bit FCnt range,
/// FOpts and every application port
fn broker_frame() -> impl Strategy<Value = PhyPayload> {
    (
        any::<bool>(),
        any::<bool>(),
        proptest::collection::vec(uplink_command(), 0..=2),
        proptest::collection::vec(downlink_command(), 0..=2),
        0u32..=u32::from(u16::MAX),
        1u8..=255,
        proptest::collection::vec(any::<u8>(), 1..64),
        any::<[u8; 4]>(),
        any::<[bool; 4]>(),
        any::<[u8; 4]>(),
    )
        .prop_map(|(uplink, confirmed, up, down, f_cnt, f_port, data, dev_addr, f_ctrl, mic)| {
            let f_opts = if uplink { up } else { down };
            data_frame(mtype(uplink, confirmed), dev_addr, f_ctrl, f_cnt, f_opts, f_port, data, mic)
        })
}

fn metadata_strategy() -> impl Strategy<Value = Metadata> {
    (
        proptest::option::of(0u32..16),
        proptest::option::of(-140i32..0),
        proptest::option::of(any::<u32>()),
        proptest::option::of("SF(7|8|9|10|11|12)BW125"),
    )
        .prop_map(|(chan, rssi, tmst, datr)| Metadata {
            chan,
            rssi,
            tmst,
            datr,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn apacket_keeps_metadata_order(
        payload in proptest::collection::vec(any::<u8>(), 1..64),
        entries in proptest::collection::vec(metadata_strategy(), 0..8),
    ) {
        let packet = APacket::new(payload.clone(), entries.clone()).unwrap();
        let decoded = APacket::from_bytes(&packet.to_bytes().unwrap()).unwrap();

        prop_assert_eq!(decoded.payload(), &payload[..]);
        prop_assert_eq!(decoded.metadata(), &entries[..]);
    }

    #[test]
    fn hpacket_round_trip(
        app in any::<[u8; 8]>(),
        dev in any::<[u8; 8]>(),
        payload in proptest::collection::vec(any::<u8>(), 0..128),
        metadata in metadata_strategy(),
    ) {
        let packet = HPacket::new(EUI64::new(app), EUI64::new(dev), payload, metadata);
        let decoded = HPacket::from_bytes(&packet.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(decoded, packet);
    }

    #[test]
    fn accept_packet_round_trip(
        payload in proptest::collection::vec(any::<u8>(), 1..64),
        key in any::<[u8; 16]>(),
    ) {
        let packet = AcceptPacket::new(EUI64::default(), EUI64::default(), payload, AESKey::new(key))
            .unwrap();
        let decoded = AcceptPacket::from_bytes(&packet.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(decoded.payload(), packet.payload());
        prop_assert_eq!(decoded, packet);
    }

    #[test]
    fn bpacket_round_trip(frame in broker_frame(), metadata in metadata_strategy()) {
        let packet = BPacket::new(frame, metadata).unwrap();
        let decoded = BPacket::from_bytes(&packet.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(decoded.f_cnt(), packet.f_cnt());
        prop_assert_eq!(decoded.commands(), packet.commands());
        prop_assert_eq!(decoded, packet);
    }

    #[test]
    fn constructed_rpacket_round_trips(
        uplink in any::<bool>(),
        f_cnt in any::<u32>(),
        f_opts in proptest::collection::vec(any_command(), 0..=3),
        f_port in any::<u8>(),
        data in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let frame = data_frame(
            mtype(uplink, false),
            [1, 2, 3, 4],
            [false; 4],
            f_cnt,
            f_opts,
            f_port,
            data,
            [0; 4],
        );
        if let Ok(packet) = RPacket::new(frame, Metadata::default()) {
            let decoded = RPacket::from_bytes(&packet.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(decoded, packet);
        }
    }

    #[test]
    fn decoding_garbage_never_panics(data in proptest::collection::vec(any::<u8>(), 0..96)) {
        let _ = RPacket::from_bytes(&data);
        let _ = BPacket::from_bytes(&data);
        let _ = HPacket::from_bytes(&data);
        let _ = APacket::from_bytes(&data);
        let _ = JoinPacket::from_bytes(&data);
        let _ = AcceptPacket::from_bytes(&data);
    }

    #[test]
    fn decoding_mangled_frames_never_panics(
        frame in broker_frame(),
        index in any::<prop::sample::Index>(),
        byte in any::<u8>(),
    ) {
        let packet = BPacket::new(frame, Metadata::default()).unwrap();
        let mut bytes = packet.to_bytes().unwrap();
        let at = index.index(bytes.len());
        bytes[at] = byte;
        let _ = RPacket::from_bytes(&bytes);
        let _ = BPacket::from_bytes(&bytes);
    }
}
