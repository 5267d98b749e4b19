//! Frame geometry: header pattern and expected frame length.

use bytes::Bytes;

use crate::CaptureError;

/// An immutable synchronization pattern prefixing each frame
///
/// Empty means "no synchronization required": capture starts on the first
/// byte that arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPattern(Bytes);

impl HeaderPattern {
    /// Create a pattern from raw bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Parse a pattern from a hex string, e.g. `"00112233"`
    ///
    /// Whitespace between byte pairs is tolerated (`"00 11 22 33"`).
    ///
    /// # Errors
    /// Odd digit count or a non-hex character yields
    /// [`CaptureError::ConfigParse`].
    pub fn from_hex(text: &str) -> Result<Self, CaptureError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() % 2 != 0 {
            return Err(CaptureError::config_parse(format!(
                "header hex string has odd length: '{text}'"
            )));
        }

        let mut bytes = Vec::with_capacity(compact.len() / 2);
        for pair in compact.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).expect("chunked from a str");
            let byte = u8::from_str_radix(pair, 16).map_err(|_| {
                CaptureError::config_parse(format!("invalid hex byte '{pair}' in header '{text}'"))
            })?;
            bytes.push(byte);
        }
        Ok(Self(Bytes::from(bytes)))
    }

    /// Render the pattern as lowercase hex
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for HeaderPattern {
    fn from(slice: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(slice))
    }
}

/// Geometry of one logical frame on the wire
#[derive(Debug, Clone, Default)]
pub struct FrameSpec {
    /// Synchronization pattern; empty disables header search
    pub header: HeaderPattern,

    /// Total frame length in bytes, header included
    pub total_length: usize,
}

impl FrameSpec {
    /// Create a spec, enforcing `total_length >= header.len()` for non-empty
    /// headers
    pub fn new(header: HeaderPattern, total_length: usize) -> Result<Self, CaptureError> {
        let spec = Self {
            header,
            total_length,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the header/length invariant
    pub fn validate(&self) -> Result<(), CaptureError> {
        if !self.header.is_empty() && self.total_length < self.header.len() {
            return Err(CaptureError::config_validation(
                "frame.total_length",
                format!(
                    "total_length ({}) is shorter than the header ({} bytes)",
                    self.total_length,
                    self.header.len()
                ),
            ));
        }
        Ok(())
    }

    /// Payload bytes expected after the header
    pub fn remainder_len(&self) -> usize {
        self.total_length.saturating_sub(self.header.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_plain() {
        let pattern = HeaderPattern::from_hex("00112233").unwrap();
        assert_eq!(pattern.as_slice(), &[0x00, 0x11, 0x22, 0x33]);
        assert_eq!(pattern.to_hex(), "00112233");
    }

    #[test]
    fn test_from_hex_spaced() {
        let pattern = HeaderPattern::from_hex("aa BB cc").unwrap();
        assert_eq!(pattern.as_slice(), &[0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn test_from_hex_odd_length() {
        let err = HeaderPattern::from_hex("001").unwrap_err();
        assert!(matches!(err, CaptureError::ConfigParse { .. }));
    }

    #[test]
    fn test_from_hex_bad_digit() {
        assert!(HeaderPattern::from_hex("zz").is_err());
    }

    #[test]
    fn test_frame_spec_invariant() {
        let header = HeaderPattern::from_hex("00112233").unwrap();
        assert!(FrameSpec::new(header.clone(), 3).is_err());
        assert!(FrameSpec::new(header.clone(), 4).is_ok());

        let spec = FrameSpec::new(header, 16).unwrap();
        assert_eq!(spec.remainder_len(), 12);
    }

    #[test]
    fn test_empty_header_any_length() {
        // No header configured: any length is valid, including zero
        assert!(FrameSpec::new(HeaderPattern::default(), 0).is_ok());
    }
}
