//! Length-prefixed field framing
//!
//! Each field is a 2-byte big-endian length followed by that many bytes.
//! Fields are read back in the order they were written. A reader that has
//! consumed every field reports [`FramingError::EndOfStream`]; anything else
//! that stops a read is a truncation.

use crate::error::{Error, FramingError, Result};

/// Size of the length prefix in bytes
pub const PREFIX_SIZE: usize = 2;

/// Sequential field writer
#[derive(Debug, Default)]
pub struct FieldWriter {
    buffer: Vec<u8>,
    err: Option<FramingError>,
}

impl FieldWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a length-prefixed field
    pub fn write(&mut self, data: &[u8]) {
        if self.err.is_some() {
            return;
        }
        let Ok(len) = u16::try_from(data.len()) else {
            self.err = Some(FramingError::FieldTooLong(data.len()));
            return;
        };
        self.buffer.extend_from_slice(&len.to_be_bytes());
        self.buffer.extend_from_slice(data);
    }

    /// Append bytes without a length prefix
    pub fn write_raw(&mut self, data: &[u8]) {
        if self.err.is_none() {
            self.buffer.extend_from_slice(data);
        }
    }

    /// Finish writing. The first failed write, if any, is returned.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self.err {
            Some(err) => Err(Error::structural_from("field framing failed", err)),
            None => Ok(self.buffer),
        }
    }
}

/// Sequential field reader
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    data: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Create a reader over encoded fields
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Read the next field
    pub fn read(&mut self) -> core::result::Result<&'a [u8], FramingError> {
        if self.data.is_empty() {
            return Err(FramingError::EndOfStream);
        }
        if self.data.len() < PREFIX_SIZE {
            return Err(FramingError::Truncated {
                expected: PREFIX_SIZE,
                actual: self.data.len(),
            });
        }
        let len = u16::from_be_bytes([self.data[0], self.data[1]]) as usize;
        let body = &self.data[PREFIX_SIZE..];
        if body.len() < len {
            return Err(FramingError::Truncated {
                expected: len,
                actual: body.len(),
            });
        }
        let (field, rest) = body.split_at(len);
        self.data = rest;
        Ok(field)
    }

    /// Read a field that must be present. End of stream counts as truncation.
    pub fn read_required(&mut self, name: &str) -> Result<&'a [u8]> {
        self.read()
            .map_err(|err| Error::structural_from(format!("cannot read {}", name), err))
    }

    /// Read a field of exactly `N` bytes
    pub fn read_array<const N: usize>(&mut self, name: &str) -> Result<[u8; N]> {
        let field = self.read_required(name)?;
        <[u8; N]>::try_from(field).map_err(|_| {
            Error::structural(format!(
                "{} must be {} bytes, got {}",
                name,
                N,
                field.len()
            ))
        })
    }

    /// Unread bytes
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }
}
