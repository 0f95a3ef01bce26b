use core::fmt;

use super::Hex;
use crate::config::device::EUI64;
use crate::error::Result;
use crate::framing::{FieldReader, FieldWriter};

/// Identity carrier embedded by handler, join and accept packets.
///
/// Wire form: `[appEUI][devEUI][payload]`, each field length-prefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BaseHPacket {
    pub(crate) app_eui: EUI64,
    pub(crate) dev_eui: EUI64,
    pub(crate) payload: Vec<u8>,
}

impl BaseHPacket {
    pub(crate) fn new(app_eui: EUI64, dev_eui: EUI64, payload: Vec<u8>) -> Self {
        Self {
            app_eui,
            dev_eui,
            payload,
        }
    }

    pub(crate) fn write_to(&self, writer: &mut FieldWriter) {
        writer.write(self.app_eui.as_bytes());
        writer.write(self.dev_eui.as_bytes());
        writer.write(&self.payload);
    }

    pub(crate) fn read_from(reader: &mut FieldReader<'_>) -> Result<Self> {
        let app_eui = EUI64::new(reader.read_array("appEUI")?);
        let dev_eui = EUI64::new(reader.read_array("devEUI")?);
        let payload = reader.read_required("payload")?.to_vec();
        Ok(Self::new(app_eui, dev_eui, payload))
    }
}

impl fmt::Display for BaseHPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AppEUI: {}, DevEUI: {}, Payload: {}",
            self.app_eui,
            self.dev_eui,
            Hex(&self.payload)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_wire_layout() {
        let base = BaseHPacket::new(EUI64::new([1; 8]), EUI64::new([2; 8]), vec![0xAA]);
        let mut writer = FieldWriter::new();
        base.write_to(&mut writer);
        let data = writer.into_bytes().unwrap();

        assert_eq!(data.len(), 2 + 8 + 2 + 8 + 2 + 1);
        assert_eq!(&data[..3], &[0, 8, 1]);

        let mut reader = FieldReader::new(&data);
        assert_eq!(BaseHPacket::read_from(&mut reader).unwrap(), base);
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn test_base_short_eui() {
        let mut writer = FieldWriter::new();
        writer.write(&[1, 2, 3]);
        writer.write(&[0; 8]);
        writer.write(b"");
        let data = writer.into_bytes().unwrap();

        let err = BaseHPacket::read_from(&mut FieldReader::new(&data)).unwrap_err();
        assert!(err.is_structural());
    }
}
