use core::fmt;

/// EUI-64 (8 bytes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EUI64([u8; 8]);

/// AES-128 key (16 bytes)
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct AESKey([u8; 16]);

/// Device Address (4 bytes, most significant byte first)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DevAddr([u8; 4]);

impl EUI64 {
    /// Create a new EUI-64
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Derive a device EUI from a device address.
    ///
    /// The address lands in the upper four bytes, the rest stays zero.
    pub fn from_dev_addr(dev_addr: DevAddr) -> Self {
        let mut eui = [0u8; 8];
        eui[4..].copy_from_slice(dev_addr.as_bytes());
        Self(eui)
    }
}

impl AESKey {
    /// Create a new AES key
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl DevAddr {
    /// Create a new device address
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Bytes in over-the-air order (little endian)
    pub fn to_le_bytes(&self) -> [u8; 4] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    /// Build from over-the-air (little endian) bytes
    pub fn from_le_bytes(mut bytes: [u8; 4]) -> Self {
        bytes.reverse();
        Self(bytes)
    }
}

impl From<[u8; 8]> for EUI64 {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 16]> for AESKey {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 4]> for DevAddr {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for b in bytes {
        write!(f, "{:02X}", b)?;
    }
    Ok(())
}

impl fmt::Display for EUI64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Display for DevAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Display for AESKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

// Keys stay out of debug logs.
impl fmt::Debug for AESKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AESKey(..)")
    }
}
