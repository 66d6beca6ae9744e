//! # utf-convert - Validating UTF-8 / UTF-16 / UTF-32 Conversion
//!
//! A small, allocation-predictable codec converting text between the three
//! Unicode transfer encodings in all six directions.
//!
//! ## Features
//!
//! - **Six conversions** between UTF-8, UTF-16 and UTF-32
//! - **Byte order mark handling** with endianness correction for UTF-16 and UTF-32
//! - **Precise status reporting** for malformed input
//! - **Standard-compliant mode** rejecting lone surrogates, overlong forms and
//!   surrogate-range code points
//! - **Byte-level translator** for raw buffers read from files
//!
//! ## Quick Start
//!
//! ```rust
//! use utf_convert::{Status, utf8_to_utf16, utf16_to_utf32};
//!
//! let mut utf16 = Vec::new();
//! let status = utf8_to_utf16("h\u{10348}".as_bytes(), &mut utf16, true);
//! assert_eq!(status, Status::Success);
//! assert_eq!(utf16, [0x0068, 0xD800, 0xDF48]);
//!
//! let mut code_points = Vec::new();
//! assert!(utf16_to_utf32(&utf16, &mut code_points, true).is_success());
//! assert_eq!(code_points, [0x68, 0x10348]);
//! ```
//!
//! Every conversion clears its output vector first and leaves it empty on
//! failure, so the output is only meaningful when the returned [`Status`] is
//! [`Status::Success`].

#![deny(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub mod detection;
pub mod endian;
mod multibyte;
mod utf16;
mod utf8;

pub use endian::Endianness;
pub use multibyte::{utf8_to_utf16, utf16_to_utf8};
pub use utf8::{utf8_to_utf32, utf32_to_utf8};
pub use utf16::{utf16_to_utf32, utf32_to_utf16};

/// Largest Unicode code point
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Result type for byte-level conversions
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of a conversion
///
/// Variants are ordered by severity: every failure compares less than
/// [`Status::Success`], and more negative codes are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i8)]
pub enum Status {
    /// A UTF-8 continuation byte appeared where a lead byte was expected
    TrailingWithoutLeading = -3,
    /// A lead unit's continuation units ran past the end of the buffer
    CharacterCutOff = -2,
    /// Decodable, but forbidden by the Unicode standard
    ///
    /// Only reported when standard compliance is requested.
    NonStandardEncoding = -1,
    /// The value cannot be represented in the target encoding
    UndefinedError = 0,
    /// The output holds the complete converted sequence
    Success = 1,
}

impl Status {
    /// Check whether the conversion succeeded
    #[inline]
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Signed status code, negative or zero for failures
    #[inline]
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Convert into a [`Result`] so the status can be propagated with `?`
    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::Conversion { status: self })
        }
    }

    /// Short description of the status
    pub fn description(self) -> &'static str {
        match self {
            Status::TrailingWithoutLeading => "continuation byte without a leading byte",
            Status::CharacterCutOff => "character cut off at end of input",
            Status::NonStandardEncoding => "encoding is not standard-compliant",
            Status::UndefinedError => "value cannot be represented in target encoding",
            Status::Success => "success",
        }
    }

    /// Map an internal conversion result onto a status, emptying the output on failure
    pub(crate) fn settle<T>(result: std::result::Result<(), Status>, output: &mut Vec<T>) -> Status {
        match result {
            Ok(()) => Status::Success,
            Err(status) => {
                output.clear();
                status
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors that can occur during byte-level conversions
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The input could not be converted
    Conversion {
        /// The failing status
        status: Status,
    },
    /// An encoding name was not recognized
    UnknownEncoding(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Conversion { status } => {
                write!(f, "Conversion failed: {} (status {})", status, status.code())
            }
            Error::UnknownEncoding(name) => write!(f, "Unknown encoding: {}", name),
        }
    }
}

impl std::error::Error for Error {}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Error::Conversion { status }
    }
}

/// Supported Unicode transfer encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Encoding {
    /// UTF-8 (variable length, 1-4 bytes)
    UTF8,
    /// UTF-16 (one or two 16-bit units)
    UTF16,
    /// UTF-32 (one 32-bit unit)
    UTF32,
}

impl Encoding {
    /// Every supported encoding
    pub const ALL: [Encoding; 3] = [Encoding::UTF8, Encoding::UTF16, Encoding::UTF32];

    /// Get the canonical name of this encoding
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UTF8 => "UTF-8",
            Encoding::UTF16 => "UTF-16",
            Encoding::UTF32 => "UTF-32",
        }
    }

    /// Width of one code unit in bytes
    pub fn unit_width(self) -> usize {
        match self {
            Encoding::UTF8 => 1,
            Encoding::UTF16 => 2,
            Encoding::UTF32 => 4,
        }
    }

    /// Maximum number of code units per code point
    pub fn max_units_per_code_point(self) -> usize {
        match self {
            Encoding::UTF8 => 4,
            Encoding::UTF16 => 2,
            Encoding::UTF32 => 1,
        }
    }

    /// Byte order mark as written by the [`Translator`] (big-endian)
    pub fn bom(self) -> &'static [u8] {
        match self {
            Encoding::UTF8 => &endian::UTF8_BOM,
            Encoding::UTF16 => &[0xFE, 0xFF],
            Encoding::UTF32 => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "UTF8" | "UTF-8" => Ok(Encoding::UTF8),
            "UTF16" | "UTF-16" | "UTF16BE" | "UTF-16BE" => Ok(Encoding::UTF16),
            "UTF32" | "UTF-32" | "UTF32BE" | "UTF-32BE" => Ok(Encoding::UTF32),
            _ => Err(Error::UnknownEncoding(s.to_string())),
        }
    }
}

/// Converter between raw byte buffers of two encodings
///
/// UTF-16 and UTF-32 input is read as big-endian units; a reversed byte
/// order mark at the start switches the whole buffer to little-endian.
/// Output is always written big-endian.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    from: Encoding,
    to: Encoding,
    comply_with_standard: bool,
}

impl Translator {
    /// Create a new permissive translator between two encodings
    pub fn new(from: Encoding, to: Encoding) -> Self {
        Self {
            from,
            to,
            comply_with_standard: false,
        }
    }

    /// Reject non-standard input instead of passing it through
    pub fn comply_with_standard(mut self, comply: bool) -> Self {
        self.comply_with_standard = comply;
        self
    }

    /// Get source encoding
    pub fn from_encoding(&self) -> Encoding {
        self.from
    }

    /// Get target encoding
    pub fn to_encoding(&self) -> Encoding {
        self.to
    }

    /// Whether standard compliance is enforced
    pub fn is_standard_compliant(&self) -> bool {
        self.comply_with_standard
    }

    /// Convert data from source to target encoding
    pub fn convert(&self, input: &[u8]) -> Result<Vec<u8>> {
        multibyte::MultiByte::new(self.from, self.to, self.comply_with_standard).convert(input)
    }
}
