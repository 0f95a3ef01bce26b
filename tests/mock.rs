#![allow(dead_code)]

use lorawan_packets::{
    config::device::{AESKey, DevAddr, EUI64},
    lorawan::{
        FCtrl, FrmPayload, JoinAcceptPayload, JoinRequestPayload, MType, MacCommand, MacPayload,
        MacPayloadKind, PhyPayload, FHDR, MHDR,
    },
    metadata::Metadata,
};

/// Device address used by the frame builders
pub const DEV_ADDR: [u8; 4] = [0x26, 0x01, 0x1B, 0xDA];

/// Network session key used by the frame builders
pub const NWK_SKEY: AESKey = AESKey::new([0x2B; 16]);

/// Frame header with the test device address
pub fn fhdr(f_cnt: u32, f_opts: Vec<MacCommand>) -> FHDR {
    FHDR {
        dev_addr: DevAddr::new(DEV_ADDR),
        f_ctrl: FCtrl::default(),
        f_cnt,
        f_opts,
    }
}

/// Data frame carrying one opaque payload, MIC set with `NWK_SKEY`
pub fn data_frame(mtype: MType, f_cnt: u32, data: &[u8]) -> PhyPayload {
    let mut frame = PhyPayload::with_payload(
        MHDR::new(mtype),
        MacPayloadKind::Data(MacPayload::with_data(fhdr(f_cnt, Vec::new()), 1, data.to_vec())),
    );
    frame.set_mic(&NWK_SKEY).unwrap();
    frame
}

/// Data frame with an arbitrary FRMPayload
pub fn frame_with(mtype: MType, f_port: Option<u8>, frm_payload: Vec<FrmPayload>) -> PhyPayload {
    PhyPayload::with_payload(
        MHDR::new(mtype),
        MacPayloadKind::Data(MacPayload {
            fhdr: fhdr(1, Vec::new()),
            f_port,
            frm_payload,
        }),
    )
}

/// Join-request frame
pub fn join_request_frame() -> PhyPayload {
    PhyPayload::with_payload(
        MHDR::new(MType::JoinRequest),
        MacPayloadKind::JoinRequest(JoinRequestPayload {
            app_eui: app_eui(),
            dev_eui: dev_eui(),
            dev_nonce: [0x2D, 0x10],
        }),
    )
}

/// Join-accept frame
pub fn join_accept_frame() -> PhyPayload {
    PhyPayload::with_payload(
        MHDR::new(MType::JoinAccept),
        MacPayloadKind::JoinAccept(JoinAcceptPayload {
            app_nonce: [0x01, 0x02, 0x03],
            net_id: [0x00, 0x00, 0x13],
            dev_addr: DevAddr::new(DEV_ADDR),
            dl_settings: 0,
            rx_delay: 1,
            cf_list: None,
        }),
    )
}

/// Application EUI 01..08
pub fn app_eui() -> EUI64 {
    EUI64::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08])
}

/// Device EUI 11..18
pub fn dev_eui() -> EUI64 {
    EUI64::new([0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18])
}

/// Gateway metadata with a few fields set
pub fn metadata(rssi: i32) -> Metadata {
    Metadata {
        chan: Some(2),
        datr: Some("SF7BW125".into()),
        freq: Some(868.5),
        lsnr: Some(5.25),
        rssi: Some(rssi),
        time: Some("2016-01-06T15:11:12.000Z".into()),
        tmst: Some(3_512_348_611),
        ..Default::default()
    }
}

/// Route library logs to the test output; filter with `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
