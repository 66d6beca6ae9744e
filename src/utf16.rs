//! UTF-16 decoding into code points and encoding from code points

use crate::Status;
use crate::endian::{normalize_utf16, normalize_utf32};

const HIGH_SURROGATE_START: u16 = 0xD800;
const LOW_SURROGATE_START: u16 = 0xDC00;
const LOW_SURROGATE_END: u16 = 0xDFFF;
const HIGH_SURROGATE_MARKER: u16 = HIGH_SURROGATE_START >> 10;
const LOW_SURROGATE_MARKER: u16 = LOW_SURROGATE_START >> 10;

const SUPPLEMENTARY_PLANE_OFFSET: u32 = 0x10000;
const SUPPLEMENTARY_PLANE_END: u32 = 0x110000;
const SURROGATE_DATA_MASK: u32 = 0x3FF;

#[inline]
const fn is_high_surrogate(unit: u16) -> bool {
    unit >> 10 == HIGH_SURROGATE_MARKER
}

#[inline]
const fn is_low_surrogate(unit: u16) -> bool {
    unit >> 10 == LOW_SURROGATE_MARKER
}

/// Whether a code point lies in `D800..=DFFF`
#[inline]
pub(crate) const fn is_surrogate_code_point(code_point: u32) -> bool {
    code_point >= HIGH_SURROGATE_START as u32 && code_point <= LOW_SURROGATE_END as u32
}

/// Convert UTF-16 to UTF-32 code points
///
/// A leading `FFFE` unit marks the buffer as little-endian and every unit is
/// byte-swapped before decoding. Unpaired surrogates are passed through
/// unless `comply_with_standard` is set, in which case they are reported as
/// [`Status::NonStandardEncoding`].
pub fn utf16_to_utf32(input: &[u16], output: &mut Vec<u32>, comply_with_standard: bool) -> Status {
    output.clear();
    let result = decode(input, output, comply_with_standard);
    Status::settle(result, output)
}

/// Convert UTF-32 code points to UTF-16
///
/// Code points from `U+10000` are split into surrogate pairs. Values from
/// `0x110000` are [`Status::UndefinedError`].
pub fn utf32_to_utf16(input: &[u32], output: &mut Vec<u16>, comply_with_standard: bool) -> Status {
    output.clear();
    let result = encode(input, output, comply_with_standard);
    Status::settle(result, output)
}

fn decode(input: &[u16], output: &mut Vec<u32>, comply_with_standard: bool) -> Result<(), Status> {
    let units = normalize_utf16(input);
    output.reserve(units.len());

    let mut cursor = 0;
    while let Some(&unit) = units.get(cursor) {
        cursor += 1;

        if is_high_surrogate(unit) {
            match units.get(cursor) {
                Some(&next) if is_low_surrogate(next) => {
                    cursor += 1;
                    let high = u32::from(unit - HIGH_SURROGATE_START) << 10;
                    let low = u32::from(next - LOW_SURROGATE_START);
                    output.push(high + low + SUPPLEMENTARY_PLANE_OFFSET);
                }
                _ if comply_with_standard => return Err(Status::NonStandardEncoding),
                _ => output.push(u32::from(unit)),
            }
            continue;
        }

        if comply_with_standard && is_low_surrogate(unit) {
            return Err(Status::NonStandardEncoding);
        }
        output.push(u32::from(unit));
    }

    Ok(())
}

fn encode(input: &[u32], output: &mut Vec<u16>, comply_with_standard: bool) -> Result<(), Status> {
    let code_points = normalize_utf32(input);
    output.reserve(code_points.len());

    for &code_point in code_points.iter() {
        if code_point >= SUPPLEMENTARY_PLANE_END {
            return Err(Status::UndefinedError);
        }
        if comply_with_standard && is_surrogate_code_point(code_point) {
            return Err(Status::NonStandardEncoding);
        }

        if code_point >= SUPPLEMENTARY_PLANE_OFFSET {
            let data = code_point - SUPPLEMENTARY_PLANE_OFFSET;
            output.push(HIGH_SURROGATE_START + (data >> 10) as u16);
            output.push(LOW_SURROGATE_START + (data & SURROGATE_DATA_MASK) as u16);
        } else {
            output.push(code_point as u16);
        }
    }

    Ok(())
}
