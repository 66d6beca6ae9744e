//! Byte order mark sniffing and endianness correction for UTF-16 and UTF-32
//!
//! Endianness is detected once from the first unit of a buffer and applied
//! uniformly to the whole buffer. Mixed-endianness buffers are not detected.

use std::borrow::Cow;

use serde::Serialize;

/// Byte order mark code point
pub const BYTE_ORDER_MARK: u16 = 0xFEFF;
/// Byte order mark as it reads with its bytes reversed
pub const REVERSED_BYTE_ORDER_MARK: u16 = 0xFFFE;
/// UTF-8 serialization of the byte order mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Byte order derived from a leading byte order mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    /// The buffer does not start with a byte order mark
    #[default]
    Unspecified,
    /// The buffer starts with a byte order mark in big-endian order
    BigEndian,
    /// The buffer starts with a byte order mark in little-endian order
    LittleEndian,
}

impl Endianness {
    /// Short human readable name
    pub fn name(self) -> &'static str {
        match self {
            Endianness::Unspecified => "unspecified",
            Endianness::BigEndian => "big-endian",
            Endianness::LittleEndian => "little-endian",
        }
    }
}

/// Check whether a UTF-8 buffer starts with `EF BB BF`
#[inline]
pub fn utf8_has_bom(units: &[u8]) -> bool {
    units.starts_with(&UTF8_BOM)
}

/// Classify a single UTF-16 unit against the byte order mark
#[inline]
pub const fn utf16_bom(unit: u16) -> Endianness {
    match unit {
        BYTE_ORDER_MARK => Endianness::BigEndian,
        REVERSED_BYTE_ORDER_MARK => Endianness::LittleEndian,
        _ => Endianness::Unspecified,
    }
}

/// Classify a single UTF-32 unit against the byte order mark
///
/// The upper and lower 16-bit halves are inspected separately: `{0, FEFF}`
/// is big-endian and `{FFFE, 0}` is little-endian.
#[inline]
pub const fn utf32_bom(unit: u32) -> Endianness {
    let upper = (unit >> 16) as u16;
    let lower = (unit & 0xFFFF) as u16;
    match (upper, lower) {
        (0, BYTE_ORDER_MARK) => Endianness::BigEndian,
        (REVERSED_BYTE_ORDER_MARK, 0) => Endianness::LittleEndian,
        _ => Endianness::Unspecified,
    }
}

/// Reverse the two bytes of a UTF-16 unit
#[inline]
pub const fn utf16_reverse_endianness(unit: u16) -> u16 {
    unit.swap_bytes()
}

/// Reverse the four bytes of a UTF-32 unit
#[inline]
pub const fn utf32_reverse_endianness(unit: u32) -> u32 {
    unit.swap_bytes()
}

/// Bring a UTF-16 buffer into canonical order
///
/// Only allocates when the first unit is a reversed byte order mark.
pub fn normalize_utf16(units: &[u16]) -> Cow<'_, [u16]> {
    match units.first().copied().map(utf16_bom) {
        Some(Endianness::LittleEndian) => units
            .iter()
            .map(|&unit| utf16_reverse_endianness(unit))
            .collect(),
        _ => Cow::Borrowed(units),
    }
}

/// Bring a UTF-32 buffer into canonical order
///
/// Only allocates when the first unit is a reversed byte order mark.
pub fn normalize_utf32(units: &[u32]) -> Cow<'_, [u32]> {
    match units.first().copied().map(utf32_bom) {
        Some(Endianness::LittleEndian) => units
            .iter()
            .map(|&unit| utf32_reverse_endianness(unit))
            .collect(),
        _ => Cow::Borrowed(units),
    }
}
