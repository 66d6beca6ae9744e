//! Conversions composed through a UTF-32 intermediate, and the byte-level
//! dispatcher behind [`Translator`](crate::Translator).

use crate::utf8::{utf8_to_utf32, utf32_to_utf8};
use crate::utf16::{utf16_to_utf32, utf32_to_utf16};
use crate::{Encoding, Result, Status};

/// Convert UTF-8 to UTF-16 via UTF-32
///
/// The first failing stage's status is returned unchanged and the output is
/// left empty.
pub fn utf8_to_utf16(input: &[u8], output: &mut Vec<u16>, comply_with_standard: bool) -> Status {
    output.clear();

    let mut code_points = Vec::new();
    let status = utf8_to_utf32(input, &mut code_points, comply_with_standard);
    if status < Status::Success {
        return status;
    }

    utf32_to_utf16(&code_points, output, comply_with_standard)
}

/// Convert UTF-16 to UTF-8 via UTF-32
///
/// The first failing stage's status is returned unchanged and the output is
/// left empty.
pub fn utf16_to_utf8(input: &[u16], output: &mut Vec<u8>, comply_with_standard: bool) -> Status {
    output.clear();

    let mut code_points = Vec::new();
    let status = utf16_to_utf32(input, &mut code_points, comply_with_standard);
    if status < Status::Success {
        return status;
    }

    utf32_to_utf8(&code_points, output, comply_with_standard)
}

/// Unpack big-endian 16-bit units; a dangling byte is a cut-off character
fn bytes_to_utf16(input: &[u8]) -> Result<Vec<u16>> {
    let chunks = input.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(Status::CharacterCutOff.into());
    }
    Ok(chunks
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect())
}

/// Unpack big-endian 32-bit units; dangling bytes are a cut-off character
fn bytes_to_utf32(input: &[u8]) -> Result<Vec<u32>> {
    let chunks = input.chunks_exact(4);
    if !chunks.remainder().is_empty() {
        return Err(Status::CharacterCutOff.into());
    }
    Ok(chunks
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn utf16_to_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|unit| unit.to_be_bytes()).collect()
}

fn utf32_to_bytes(units: &[u32]) -> Vec<u8> {
    units.iter().flat_map(|unit| unit.to_be_bytes()).collect()
}

/// Byte-level converter between any two Unicode encodings
pub(crate) struct MultiByte {
    from: Encoding,
    to: Encoding,
    comply_with_standard: bool,
}

impl MultiByte {
    pub(crate) fn new(from: Encoding, to: Encoding, comply_with_standard: bool) -> Self {
        Self {
            from,
            to,
            comply_with_standard,
        }
    }

    /// Convert raw bytes of the source encoding into raw bytes of the target
    ///
    /// Same-encoding pairs are validated and re-canonicalized by a round trip
    /// through another encoding.
    pub(crate) fn convert(&self, input: &[u8]) -> Result<Vec<u8>> {
        let comply = self.comply_with_standard;

        match (self.from, self.to) {
            (Encoding::UTF8, Encoding::UTF16) => {
                let mut units = Vec::new();
                utf8_to_utf16(input, &mut units, comply).into_result()?;
                Ok(utf16_to_bytes(&units))
            }
            (Encoding::UTF8, Encoding::UTF32) => {
                let mut code_points = Vec::new();
                utf8_to_utf32(input, &mut code_points, comply).into_result()?;
                Ok(utf32_to_bytes(&code_points))
            }
            (Encoding::UTF16, Encoding::UTF8) => {
                let units = bytes_to_utf16(input)?;
                let mut output = Vec::new();
                utf16_to_utf8(&units, &mut output, comply).into_result()?;
                Ok(output)
            }
            (Encoding::UTF16, Encoding::UTF32) => {
                let units = bytes_to_utf16(input)?;
                let mut code_points = Vec::new();
                utf16_to_utf32(&units, &mut code_points, comply).into_result()?;
                Ok(utf32_to_bytes(&code_points))
            }
            (Encoding::UTF32, Encoding::UTF8) => {
                let code_points = bytes_to_utf32(input)?;
                let mut output = Vec::new();
                utf32_to_utf8(&code_points, &mut output, comply).into_result()?;
                Ok(output)
            }
            (Encoding::UTF32, Encoding::UTF16) => {
                let code_points = bytes_to_utf32(input)?;
                let mut units = Vec::new();
                utf32_to_utf16(&code_points, &mut units, comply).into_result()?;
                Ok(utf16_to_bytes(&units))
            }
            (Encoding::UTF8, Encoding::UTF8) => {
                let utf32 = MultiByte::new(Encoding::UTF8, Encoding::UTF32, comply).convert(input)?;
                MultiByte::new(Encoding::UTF32, Encoding::UTF8, comply).convert(&utf32)
            }
            (Encoding::UTF16, Encoding::UTF16) => {
                let utf32 = MultiByte::new(Encoding::UTF16, Encoding::UTF32, comply).convert(input)?;
                MultiByte::new(Encoding::UTF32, Encoding::UTF16, comply).convert(&utf32)
            }
            (Encoding::UTF32, Encoding::UTF32) => {
                let utf8 = MultiByte::new(Encoding::UTF32, Encoding::UTF8, comply).convert(input)?;
                MultiByte::new(Encoding::UTF8, Encoding::UTF32, comply).convert(&utf8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_utf8_to_utf16_composes() {
        let mut units = Vec::new();
        let status = utf8_to_utf16("\u{10348}a".as_bytes(), &mut units, true);
        assert_eq!(status, Status::Success);
        assert_eq!(units, [0xD800, 0xDF48, 0x0061]);
    }

    #[test]
    fn test_utf16_to_utf8_composes() {
        let mut bytes = Vec::new();
        let status = utf16_to_utf8(&[0xD800, 0xDF48, 0x0061], &mut bytes, true);
        assert_eq!(status, Status::Success);
        assert_eq!(bytes, "\u{10348}a".as_bytes());
    }

    #[test]
    fn test_first_stage_failure_is_propagated() {
        let mut units = vec![0x41];
        assert_eq!(
            utf8_to_utf16(&[0x80, b'a'], &mut units, false),
            Status::TrailingWithoutLeading
        );
        assert!(units.is_empty());

        let mut bytes = vec![0x41];
        assert_eq!(
            utf16_to_utf8(&[0xD800], &mut bytes, true),
            Status::NonStandardEncoding
        );
        assert!(bytes.is_empty());

        let mut units = Vec::new();
        assert_eq!(
            utf8_to_utf16(&[0xF0, 0x9F, 0x98, 0x80, 0xF0, 0x9F], &mut units, true),
            Status::CharacterCutOff
        );
        assert!(units.is_empty());
    }

    #[test]
    fn test_permissive_surrogates_pass_both_stages() {
        let mut bytes = Vec::new();
        assert!(utf16_to_utf8(&[0xDC00], &mut bytes, false).is_success());
        assert_eq!(bytes, [0xED, 0xB0, 0x80]);

        let mut units = Vec::new();
        assert!(utf8_to_utf16(&bytes, &mut units, false).is_success());
        assert_eq!(units, [0xDC00]);
    }

    #[test]
    fn test_utf8_bom_reaches_utf16() {
        let mut units = Vec::new();
        assert!(utf8_to_utf16(&[0xEF, 0xBB, 0xBF, b'x'], &mut units, true).is_success());
        assert_eq!(units, [0xFEFF, 0x0078]);
    }

    #[test]
    fn test_leading_noncharacter_breaks_round_trip() {
        let mut units = Vec::new();
        assert!(utf8_to_utf16("\u{FFFE}\u{D8}".as_bytes(), &mut units, true).is_success());
        assert_eq!(units, [0xFFFE, 0x00D8]);

        let mut bytes = vec![0x41];
        assert_eq!(utf16_to_utf8(&units, &mut bytes, true), Status::NonStandardEncoding);
        assert!(bytes.is_empty());

        // A real BOM in front keeps the noncharacter intact
        assert!(utf8_to_utf16("\u{FEFF}\u{FFFE}\u{D8}".as_bytes(), &mut units, true).is_success());
        assert!(utf16_to_utf8(&units, &mut bytes, true).is_success());
        assert_eq!(bytes, "\u{FEFF}\u{FFFE}\u{D8}".as_bytes());
    }

    #[test]
    fn test_byte_unpacking() {
        assert_eq!(bytes_to_utf16(&[0xD8, 0x00, 0xDF, 0x48]), Ok(vec![0xD800, 0xDF48]));
        assert_eq!(bytes_to_utf32(&[0x00, 0x01, 0x03, 0x48]), Ok(vec![0x10348]));
        assert_eq!(
            bytes_to_utf32(&[0x00, 0x01, 0x03, 0x48, 0x00]),
            Err(Error::Conversion {
                status: Status::CharacterCutOff
            })
        );
        assert_eq!(utf16_to_bytes(&[0xFEFF, 0x0041]), [0xFE, 0xFF, 0x00, 0x41]);
        assert_eq!(utf32_to_bytes(&[0x10348]), [0x00, 0x01, 0x03, 0x48]);
    }

    #[test]
    fn test_same_encoding_validates() {
        let strict = MultiByte::new(Encoding::UTF8, Encoding::UTF8, true);
        assert_eq!(strict.convert("ok \u{20AC}".as_bytes()), Ok("ok \u{20AC}".as_bytes().to_vec()));
        assert_eq!(
            strict.convert(&[0xC0, 0x80]),
            Err(Error::Conversion {
                status: Status::NonStandardEncoding
            })
        );

        let utf32 = MultiByte::new(Encoding::UTF32, Encoding::UTF32, false);
        assert_eq!(
            utf32.convert(&[0x00, 0x11, 0x00, 0x00]),
            Err(Error::Conversion {
                status: Status::UndefinedError
            })
        );
    }
}
