//! UTF-8 decoding into code points and encoding from code points
//!
//! Decoding walks the input with an explicit cursor, checking bounds before
//! every read. Encoding accepts UTF-32 input in either byte order.

use crate::endian::{BYTE_ORDER_MARK, UTF8_BOM, normalize_utf32, utf8_has_bom};
use crate::utf16::is_surrogate_code_point;
use crate::{MAX_CODE_POINT, Status};

const ONE_BYTE_BOUNDARY: u32 = 0x7F;
const TWO_BYTE_BOUNDARY: u32 = 0x7FF;
const THREE_BYTE_BOUNDARY: u32 = 0xFFFF;

const TRAILING_BYTE_MARKER: u8 = 0b10;
const DOUBLE_BYTE_MARKER: u8 = 0b110;
const TRIPLE_BYTE_MARKER: u8 = 0b1110;
const QUADRUPLE_BYTE_MARKER: u8 = 0b11110;

const PAYLOAD_MASK: u8 = 0x3F;

/// Convert UTF-8 to UTF-32 code points
///
/// A leading `EF BB BF` is decoded to `U+FEFF`. In standard-compliant mode,
/// malformed continuation bytes, overlong forms and surrogate code points
/// are rejected with [`Status::NonStandardEncoding`]; otherwise they are
/// decoded as-is. Values above `U+10FFFF` are always
/// [`Status::UndefinedError`].
pub fn utf8_to_utf32(input: &[u8], output: &mut Vec<u32>, comply_with_standard: bool) -> Status {
    output.clear();
    let result = decode(input, output, comply_with_standard);
    Status::settle(result, output)
}

/// Convert UTF-32 code points to UTF-8
///
/// If the first code point is a byte-reversed byte order mark, the whole
/// input is byte-swapped before encoding.
pub fn utf32_to_utf8(input: &[u32], output: &mut Vec<u8>, comply_with_standard: bool) -> Status {
    output.clear();
    let result = encode(input, output, comply_with_standard);
    Status::settle(result, output)
}

/// Position within a UTF-8 buffer
struct Cursor<'a> {
    units: &'a [u8],
    position: usize,
    comply_with_standard: bool,
}

impl<'a> Cursor<'a> {
    fn new(units: &'a [u8], comply_with_standard: bool) -> Self {
        Self {
            units,
            position: 0,
            comply_with_standard,
        }
    }

    fn next_unit(&mut self) -> Option<u8> {
        let unit = self.units.get(self.position).copied()?;
        self.position += 1;
        Some(unit)
    }

    /// Payload bits of the next continuation byte
    fn continuation(&mut self) -> Result<u32, Status> {
        let unit = self.next_unit().ok_or(Status::CharacterCutOff)?;
        if self.comply_with_standard && unit >> 6 != TRAILING_BYTE_MARKER {
            return Err(Status::NonStandardEncoding);
        }
        Ok(u32::from(unit & PAYLOAD_MASK))
    }

    /// Assemble a multi-byte sequence from the lead payload and its continuations
    ///
    /// `minimum` is the smallest code point that needs this many bytes.
    fn sequence(&mut self, lead_bits: u8, trailing: usize, minimum: u32) -> Result<u32, Status> {
        let mut code_point = u32::from(lead_bits);
        for _ in 0..trailing {
            code_point = (code_point << 6) | self.continuation()?;
        }

        if code_point > MAX_CODE_POINT {
            return Err(Status::UndefinedError);
        }
        if self.comply_with_standard
            && (code_point < minimum || is_surrogate_code_point(code_point))
        {
            return Err(Status::NonStandardEncoding);
        }
        Ok(code_point)
    }
}

fn decode(input: &[u8], output: &mut Vec<u32>, comply_with_standard: bool) -> Result<(), Status> {
    let mut cursor = Cursor::new(input, comply_with_standard);
    output.reserve(input.len());

    if utf8_has_bom(input) {
        output.push(u32::from(BYTE_ORDER_MARK));
        cursor.position = UTF8_BOM.len();
    }

    while let Some(lead) = cursor.next_unit() {
        let code_point = if lead >> 7 == 0 {
            u32::from(lead)
        } else if lead >> 6 == TRAILING_BYTE_MARKER {
            return Err(Status::TrailingWithoutLeading);
        } else if lead >> 5 == DOUBLE_BYTE_MARKER {
            cursor.sequence(lead & 0x1F, 1, ONE_BYTE_BOUNDARY + 1)?
        } else if lead >> 4 == TRIPLE_BYTE_MARKER {
            cursor.sequence(lead & 0x0F, 2, TWO_BYTE_BOUNDARY + 1)?
        } else if lead >> 3 == QUADRUPLE_BYTE_MARKER {
            cursor.sequence(lead & 0x07, 3, THREE_BYTE_BOUNDARY + 1)?
        } else {
            // 11111xxx leads no sequence in any form of UTF-8
            return Err(Status::UndefinedError);
        };
        output.push(code_point);
    }

    Ok(())
}

/// Continuation byte carrying the low six bits of `bits`
#[inline]
fn trailing_byte(bits: u32) -> u8 {
    (TRAILING_BYTE_MARKER << 6) | (bits as u8 & PAYLOAD_MASK)
}

fn encode(input: &[u32], output: &mut Vec<u8>, comply_with_standard: bool) -> Result<(), Status> {
    let code_points = normalize_utf32(input);
    output.reserve(code_points.len());

    for &code_point in code_points.iter() {
        if code_point > MAX_CODE_POINT {
            return Err(Status::UndefinedError);
        }

        if code_point <= ONE_BYTE_BOUNDARY {
            output.push(code_point as u8);
        } else if code_point <= TWO_BYTE_BOUNDARY {
            output.push((DOUBLE_BYTE_MARKER << 5) | (code_point >> 6) as u8);
            output.push(trailing_byte(code_point));
        } else if code_point <= THREE_BYTE_BOUNDARY {
            if comply_with_standard && is_surrogate_code_point(code_point) {
                return Err(Status::NonStandardEncoding);
            }
            output.push((TRIPLE_BYTE_MARKER << 4) | (code_point >> 12) as u8);
            output.push(trailing_byte(code_point >> 6));
            output.push(trailing_byte(code_point));
        } else {
            output.push((QUADRUPLE_BYTE_MARKER << 3) | (code_point >> 18) as u8);
            output.push(trailing_byte(code_point >> 12));
            output.push(trailing_byte(code_point >> 6));
            output.push(trailing_byte(code_point));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(input: &[u8], comply: bool) -> (Status, Vec<u32>) {
        let mut output = Vec::new();
        let status = utf8_to_utf32(input, &mut output, comply);
        (status, output)
    }

    fn encode_all(input: &[u32], comply: bool) -> (Status, Vec<u8>) {
        let mut output = Vec::new();
        let status = utf32_to_utf8(input, &mut output, comply);
        (status, output)
    }

    #[test]
    fn test_decode_matches_std() {
        let text = "Hello, \u{E9}\u{20AC}\u{10348}\u{1F600}!";
        let expected: Vec<u32> = text.chars().map(u32::from).collect();

        assert_eq!(decode_all(text.as_bytes(), false), (Status::Success, expected.clone()));
        assert_eq!(decode_all(text.as_bytes(), true), (Status::Success, expected));
    }

    #[test]
    fn test_encode_matches_std() {
        let text = "Hello, \u{E9}\u{20AC}\u{10348}\u{1F600}!";
        let code_points: Vec<u32> = text.chars().map(u32::from).collect();

        assert_eq!(encode_all(&code_points, true), (Status::Success, text.as_bytes().to_vec()));
    }

    #[test]
    fn test_boundary_widths() {
        let cases: [(u32, usize); 6] = [
            (0x7F, 1),
            (0x80, 2),
            (0x7FF, 2),
            (0x800, 3),
            (0xFFFF, 3),
            (0x10000, 4),
        ];

        for (code_point, width) in cases {
            let (status, bytes) = encode_all(&[code_point], true);
            assert_eq!(status, Status::Success);
            assert_eq!(bytes.len(), width, "U+{:04X}", code_point);

            let expected = char::from_u32(code_point).unwrap().len_utf8();
            assert_eq!(bytes.len(), expected);

            assert_eq!(decode_all(&bytes, true), (Status::Success, vec![code_point]));
        }
    }

    #[test]
    fn test_bom_becomes_code_point() {
        let (status, code_points) = decode_all(&[0xEF, 0xBB, 0xBF, b'a'], true);
        assert_eq!(status, Status::Success);
        assert_eq!(code_points, [0xFEFF, 0x61]);

        // Only the BOM itself
        assert_eq!(decode_all(&[0xEF, 0xBB, 0xBF], true), (Status::Success, vec![0xFEFF]));
    }

    #[test]
    fn test_truncated_sequences_are_cut_off() {
        for input in [
            &[0xF0][..],
            &[0xC3],
            &[0xE2, 0x82],
            &[0xF0, 0x9F, 0x98],
            &[b'a', b'b', 0xE2],
        ] {
            let (status, output) = decode_all(input, false);
            assert_eq!(status, Status::CharacterCutOff, "{:02X?}", input);
            assert!(output.is_empty());
        }
    }

    #[test]
    fn test_bare_continuation_byte() {
        assert_eq!(decode_all(&[0x80], false), (Status::TrailingWithoutLeading, vec![]));
        assert_eq!(
            decode_all(&[b'a', 0xBF, b'b'], true),
            (Status::TrailingWithoutLeading, vec![])
        );
    }

    #[test]
    fn test_malformed_continuation_shape() {
        // C3 followed by 'A' instead of a continuation byte
        let input = [0xC3, 0x41];

        let (status, code_points) = decode_all(&input, false);
        assert_eq!(status, Status::Success);
        assert_eq!(code_points, [0xC1]);

        assert_eq!(decode_all(&input, true), (Status::NonStandardEncoding, vec![]));
    }

    #[test]
    fn test_overlong_forms() {
        // U+0000 as two bytes, U+002F as three bytes
        for input in [&[0xC0, 0x80][..], &[0xE0, 0x80, 0xAF]] {
            let (status, code_points) = decode_all(input, false);
            assert_eq!(status, Status::Success);
            assert_eq!(code_points.len(), 1);

            assert_eq!(decode_all(input, true), (Status::NonStandardEncoding, vec![]));
        }
    }

    #[test]
    fn test_surrogate_code_points() {
        let encoded = [0xED, 0xA0, 0x80];

        assert_eq!(decode_all(&encoded, false), (Status::Success, vec![0xD800]));
        assert_eq!(decode_all(&encoded, true), (Status::NonStandardEncoding, vec![]));

        assert_eq!(encode_all(&[0xD800], false), (Status::Success, encoded.to_vec()));
        assert_eq!(encode_all(&[0xDFFF], true), (Status::NonStandardEncoding, vec![]));
        // Just outside the surrogate range
        assert_eq!(encode_all(&[0xD7FF, 0xE000], true).0, Status::Success);
    }

    #[test]
    fn test_out_of_range() {
        // F4 90 80 80 would be U+110000
        assert_eq!(decode_all(&[0xF4, 0x90, 0x80, 0x80], false), (Status::UndefinedError, vec![]));
        assert_eq!(decode_all(&[0xF8, 0x88, 0x80, 0x80, 0x80], false), (Status::UndefinedError, vec![]));
        assert_eq!(decode_all(&[0xFF], false), (Status::UndefinedError, vec![]));

        assert_eq!(encode_all(&[0x41, 0x110000], false), (Status::UndefinedError, vec![]));
        assert_eq!(encode_all(&[0x10FFFF], true), (Status::Success, vec![0xF4, 0x8F, 0xBF, 0xBF]));
    }

    #[test]
    fn test_little_endian_utf32_input() {
        let input = [0xFFFE_0000, 0x4803_0100, 0x4100_0000];
        let (status, bytes) = encode_all(&input, true);
        assert_eq!(status, Status::Success);
        assert_eq!(bytes, "\u{FEFF}\u{10348}A".as_bytes());
    }

    #[test]
    fn test_output_is_replaced() {
        let mut output = vec![1, 2, 3];
        assert!(utf8_to_utf32(b"x", &mut output, false).is_success());
        assert_eq!(output, [0x78]);

        let mut output = vec![0x41];
        assert_eq!(utf8_to_utf32(&[0xC3], &mut output, false), Status::CharacterCutOff);
        assert!(output.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_all(&[], true), (Status::Success, vec![]));
        assert_eq!(encode_all(&[], true), (Status::Success, vec![]));
    }
}
