//! Identity keys
//!
//! Every interface and every instantiable class is named by a 128-bit
//! globally unique identifier:
//! - IID: Interface Identifier
//! - CLSID: Class Identifier
//!
//! Both are plain [`Guid`] values; the distinction is by convention only.

use bytes::{Buf, BufMut};
use std::fmt;
use std::str::FromStr;
use crate::types::ComError;

/// Globally unique identifier (16 bytes)
///
/// Field layout matches the binary GUID structure: one 32-bit, two 16-bit
/// and eight 8-bit components. Equality is bitwise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    /// Size of a GUID in bytes
    pub const SIZE: usize = 16;

    /// Nil GUID (all zeros)
    pub const NIL: Self = Self::from_u128(0);

    /// Build from the four GUID components
    pub const fn from_values(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }

    /// Build from a 128-bit value written in canonical text order
    ///
    /// `Guid::from_u128(0x00000000_0000_0000_c000_000000000046)` is IUnknown.
    pub const fn from_u128(value: u128) -> Self {
        let b = value.to_be_bytes();
        Self {
            data1: u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            data2: u16::from_be_bytes([b[4], b[5]]),
            data3: u16::from_be_bytes([b[6], b[7]]),
            data4: [b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]],
        }
    }

    /// Inverse of [`Guid::from_u128`]
    pub const fn to_u128(&self) -> u128 {
        let d1 = self.data1.to_be_bytes();
        let d2 = self.data2.to_be_bytes();
        let d3 = self.data3.to_be_bytes();
        let d4 = self.data4;
        u128::from_be_bytes([
            d1[0], d1[1], d1[2], d1[3], d2[0], d2[1], d3[0], d3[1],
            d4[0], d4[1], d4[2], d4[3], d4[4], d4[5], d4[6], d4[7],
        ])
    }

    /// Generate a random v4 GUID
    pub fn generate() -> Self {
        Self::from_u128(uuid::Uuid::new_v4().as_u128())
    }

    /// Parse from "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx", braces optional
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(s);
        // uuid also accepts the simple and URN forms; only the hyphenated one is valid here
        if s.len() != 36 {
            return None;
        }
        uuid::Uuid::parse_str(s).ok().map(|u| Self::from_u128(u.as_u128()))
    }

    /// Check if this is the nil GUID
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Encode in the in-memory GUID layout
    ///
    /// `data1..data3` follow the requested byte order, `data4` is a byte array.
    pub fn encode<B: BufMut>(&self, buf: &mut B, little_endian: bool) {
        if little_endian {
            buf.put_u32_le(self.data1);
            buf.put_u16_le(self.data2);
            buf.put_u16_le(self.data3);
        } else {
            buf.put_u32(self.data1);
            buf.put_u16(self.data2);
            buf.put_u16(self.data3);
        }
        buf.put_slice(&self.data4);
    }

    /// Decode from the in-memory GUID layout
    pub fn decode<B: Buf>(buf: &mut B, little_endian: bool) -> crate::types::Result<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(ComError::Status(crate::types::HResult::E_INVALIDARG));
        }
        let data1 = if little_endian { buf.get_u32_le() } else { buf.get_u32() };
        let data2 = if little_endian { buf.get_u16_le() } else { buf.get_u16() };
        let data3 = if little_endian { buf.get_u16_le() } else { buf.get_u16() };
        let mut data4 = [0u8; 8];
        buf.copy_to_slice(&mut data4);
        Ok(Self { data1, data2, data3, data4 })
    }

    /// The 16 bytes a little-endian host stores for this GUID
    pub fn to_bytes_le(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        let mut slice = &mut bytes[..];
        self.encode(&mut slice, true);
        bytes
    }
}

impl FromStr for Guid {
    type Err = ComError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(ComError::Status(crate::types::HResult::E_INVALIDARG))
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GUID({})", self)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}
