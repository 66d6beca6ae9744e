//! Byte order mark sniffing over raw byte buffers
//!
//! Only the start of the buffer is inspected; there is no statistical
//! detection.

use serde::Serialize;

use crate::{Encoding, Endianness};

/// Byte order marks in the order they are checked
///
/// UTF-32LE must come before UTF-16LE since `FF FE` prefixes both.
const SIGNATURES: [(&[u8], Encoding, Endianness); 5] = [
    (&[0x00, 0x00, 0xFE, 0xFF], Encoding::UTF32, Endianness::BigEndian),
    (&[0xFF, 0xFE, 0x00, 0x00], Encoding::UTF32, Endianness::LittleEndian),
    (&[0xEF, 0xBB, 0xBF], Encoding::UTF8, Endianness::Unspecified),
    (&[0xFE, 0xFF], Encoding::UTF16, Endianness::BigEndian),
    (&[0xFF, 0xFE], Encoding::UTF16, Endianness::LittleEndian),
];

/// Result of byte order mark detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    /// Encoding announced by the byte order mark
    pub encoding: Encoding,
    /// Byte order announced by the mark, unspecified for UTF-8
    pub endianness: Endianness,
    /// Length of the byte order mark in bytes
    pub bom_length: usize,
}

/// Byte order mark detector
#[derive(Debug, Clone, Copy)]
pub struct EncodingDetector {
    /// Maximum bytes to analyze for detection
    max_sample_size: usize,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self {
            max_sample_size: 8192,
        }
    }
}

impl EncodingDetector {
    /// Create a new encoding detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create detector with custom sample size
    pub fn with_sample_size(max_sample_size: usize) -> Self {
        Self { max_sample_size }
    }

    /// Maximum bytes inspected per call
    pub fn sample_size(&self) -> usize {
        self.max_sample_size
    }

    /// Detect the encoding announced by a leading byte order mark
    pub fn detect(&self, data: &[u8]) -> Option<DetectionResult> {
        let sample = &data[..data.len().min(self.max_sample_size)];

        SIGNATURES
            .iter()
            .find(|(bom, _, _)| sample.starts_with(bom))
            .map(|&(bom, encoding, endianness)| DetectionResult {
                encoding,
                endianness,
                bom_length: bom.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_bom() {
        let detector = EncodingDetector::new();
        let result = detector.detect(&[0xEF, 0xBB, 0xBF, b'H', b'i']).unwrap();
        assert_eq!(result.encoding, Encoding::UTF8);
        assert_eq!(result.endianness, Endianness::Unspecified);
        assert_eq!(result.bom_length, 3);
    }

    #[test]
    fn test_detect_utf16_boms() {
        let detector = EncodingDetector::new();

        let result = detector.detect(&[0xFE, 0xFF, 0x00, b'H']).unwrap();
        assert_eq!(result.encoding, Encoding::UTF16);
        assert_eq!(result.endianness, Endianness::BigEndian);
        assert_eq!(result.bom_length, 2);

        let result = detector.detect(&[0xFF, 0xFE, b'H', 0x00]).unwrap();
        assert_eq!(result.encoding, Encoding::UTF16);
        assert_eq!(result.endianness, Endianness::LittleEndian);
    }

    #[test]
    fn test_detect_utf32_boms() {
        let detector = EncodingDetector::new();

        let result = detector.detect(&[0x00, 0x00, 0xFE, 0xFF]).unwrap();
        assert_eq!(result.encoding, Encoding::UTF32);
        assert_eq!(result.endianness, Endianness::BigEndian);

        let result = detector.detect(&[0xFF, 0xFE, 0x00, 0x00, b'H', 0, 0, 0]).unwrap();
        assert_eq!(result.encoding, Encoding::UTF32);
        assert_eq!(result.endianness, Endianness::LittleEndian);
        assert_eq!(result.bom_length, 4);
    }

    #[test]
    fn test_no_bom() {
        let detector = EncodingDetector::new();
        assert_eq!(detector.detect(b"Hello, World!"), None);
        assert_eq!(detector.detect(&[]), None);
        assert_eq!(detector.detect(&[0xEF, 0xBB]), None);
    }

    #[test]
    fn test_sample_size_limits_detection() {
        let detector = EncodingDetector::with_sample_size(2);
        assert_eq!(detector.sample_size(), 2);

        // The UTF-32LE mark is cut to its UTF-16LE prefix
        let result = detector.detect(&[0xFF, 0xFE, 0x00, 0x00]).unwrap();
        assert_eq!(result.encoding, Encoding::UTF16);
    }
}
