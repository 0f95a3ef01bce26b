use lorawan_packets::{
    config::device::{AESKey, DevAddr},
    error::PhyError,
    lorawan::{FrmPayload, MType, MacCommand, MacPayloadKind, PhyPayload},
};

mod mock;
use mock::{data_frame, frame_with, join_accept_frame, join_request_frame, DEV_ADDR, NWK_SKEY};

#[test]
fn test_uplink_frame_decode() {
    // MHDR, DevAddr (LE), FCtrl, FCnt (LE), FPort, FRMPayload, MIC
    let bytes = [
        0x40, 0xDA, 0x1B, 0x01, 0x26, 0x00, 0x2A, 0x00, 0x01, b'p', b'i', b'n', b'g', 0x01, 0x02,
        0x03, 0x04,
    ];
    let frame = PhyPayload::from_bytes(&bytes, true).unwrap();
    assert_eq!(frame.mhdr.mtype, MType::UnconfirmedDataUp);
    assert_eq!(frame.mic, [0x01, 0x02, 0x03, 0x04]);

    let payload = frame.data_payload().unwrap();
    assert_eq!(payload.fhdr.dev_addr, DevAddr::new(DEV_ADDR));
    assert_eq!(payload.fhdr.f_cnt, 42);
    assert_eq!(payload.f_port, Some(1));
    assert_eq!(payload.frm_payload.len(), 1);

    assert_eq!(frame.to_bytes().unwrap(), bytes);
}

#[test]
fn test_frame_with_fopts() {
    // FOptsLen = 2, but an uplink DevStatusAns needs CID plus 2 bytes
    let bytes = [0x40, 0xDA, 0x1B, 0x01, 0x26, 0x02, 0x01, 0x00, 0x06, 0xFF, 0, 0, 0, 0];
    let err = PhyPayload::from_bytes(&bytes, true).unwrap_err();
    assert_eq!(err, PhyError::TruncatedCommand { cid: 0x06 });

    // Same bytes read as downlink: DevStatusReq has no body, 0xFF is unknown
    let err = PhyPayload::from_bytes(&bytes, false).unwrap_err();
    assert_eq!(err, PhyError::UnknownCommand { cid: 0xFF, uplink: false });
}

#[test]
fn test_port_zero_frame() {
    let frame = frame_with(
        MType::UnconfirmedDataDown,
        Some(0),
        vec![
            FrmPayload::MacCommand(MacCommand::DevStatusReq),
            FrmPayload::MacCommand(MacCommand::RXTimingSetupReq { delay: 1 }),
        ],
    );
    let bytes = frame.to_bytes().unwrap();
    assert_eq!(PhyPayload::from_bytes(&bytes, false).unwrap(), frame);
}

#[test]
fn test_commands_checked_against_direction() {
    let frame = frame_with(
        MType::UnconfirmedDataUp,
        Some(0),
        vec![FrmPayload::MacCommand(MacCommand::DevStatusReq)],
    );
    assert_eq!(
        frame.to_bytes(),
        Err(PhyError::CommandDirection { cid: 0x06, uplink: true })
    );
}

#[test]
fn test_fcnt_upper_bits_not_on_wire() {
    let frame = data_frame(MType::ConfirmedDataUp, 0x0001_0005, b"counter");
    let decoded = PhyPayload::from_bytes(&frame.to_bytes().unwrap(), true).unwrap();

    // Only the low 16 bits of FCnt are on the wire
    assert_eq!(decoded.data_payload().unwrap().fhdr.f_cnt, 5);
    assert!(frame.validate_mic(&NWK_SKEY).unwrap());
    assert!(!decoded.validate_mic(&NWK_SKEY).unwrap());
}

#[test]
fn test_tampered_frame_fails_mic() {
    let frame = data_frame(MType::UnconfirmedDataUp, 10, b"ping");
    let mut bytes = frame.to_bytes().unwrap();
    bytes[9] ^= 0x01;
    let decoded = PhyPayload::from_bytes(&bytes, true).unwrap();
    assert!(!decoded.validate_mic(&NWK_SKEY).unwrap());
}

#[test]
fn test_join_frames() {
    let app_key = AESKey::new([0x0A; 16]);

    let mut request = join_request_frame();
    request.set_mic(&app_key).unwrap();
    let decoded = PhyPayload::from_bytes(&request.to_bytes().unwrap(), true).unwrap();
    assert!(matches!(decoded.mac_payload, Some(MacPayloadKind::JoinRequest(_))));
    assert!(decoded.validate_mic(&app_key).unwrap());

    let mut accept = join_accept_frame();
    accept.set_mic(&app_key).unwrap();
    let decoded = PhyPayload::from_bytes(&accept.to_bytes().unwrap(), false).unwrap();
    assert_eq!(decoded, accept);
}

#[test]
fn test_proprietary_frame() {
    let bytes = [0xE0, 0xCA, 0xFE, 0, 0, 0, 0];
    let frame = PhyPayload::from_bytes(&bytes, true).unwrap();
    assert_eq!(frame.mac_payload, Some(MacPayloadKind::Proprietary(vec![0xCA, 0xFE])));
    assert_eq!(frame.to_bytes().unwrap(), bytes);
    assert!(frame.validate_mic(&NWK_SKEY).is_err());
}

#[test]
fn test_port_mismatch() {
    let frame = frame_with(
        MType::UnconfirmedDataUp,
        None,
        vec![FrmPayload::MacCommand(MacCommand::LinkCheckReq)],
    );
    assert_eq!(frame.to_bytes(), Err(PhyError::PortMismatch));
}
