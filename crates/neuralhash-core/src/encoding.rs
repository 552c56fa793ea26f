//! Output formats for the hash descriptor and the conversions between them.
//!
//! The Vision framework hands the descriptor back as a base64 ASCII string.
//! Hex and bits output decode that string and re-encode the raw bytes;
//! base64 output returns the framework's string verbatim, without a decode
//! round trip and without the empty-descriptor check the other formats get.
//! That asymmetry is intentional and preserved from the observed behavior.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::warn;

use crate::error::{Error, Result};

/// Requested string representation of the hash descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lowercase hexadecimal, two characters per byte
    Hex,
    /// The framework's base64 descriptor, returned as-is
    Base64,
    /// One '0'/'1' character per bit, most-significant bit first
    Bits,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Hex, OutputFormat::Base64, OutputFormat::Bits];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Hex => "hex",
            OutputFormat::Base64 => "base64",
            OutputFormat::Bits => "bits",
        }
    }

    /// Parse a user-supplied format name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(OutputFormat::Hex),
            "base64" => Ok(OutputFormat::Base64),
            "bits" => Ok(OutputFormat::Bits),
            other => {
                let permitted: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                Err(Error::InvalidFormat(format!(
                    "'{}' is not a recognized output format; must be one of: {}",
                    other,
                    permitted.join(", ")
                )))
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::parse(s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode raw descriptor bytes in the requested format.
///
/// The format argument is a closed enum, so the "unrecognized format"
/// failure mode lives entirely in [`OutputFormat::parse`]; by the time
/// bytes reach this function the format is known-good.
pub fn encode_raw_hash(raw: &[u8], format: OutputFormat) -> String {
    match format {
        OutputFormat::Hex => raw.iter().map(|b| format!("{:02x}", b)).collect(),
        OutputFormat::Bits => raw.iter().map(|b| format!("{:08b}", b)).collect(),
        OutputFormat::Base64 => {
            // The descriptor is normally already base64 before it is ever
            // decoded to raw bytes, so landing here means a caller went the
            // long way around.
            warn!("encoding raw hash bytes back to base64");
            BASE64.encode(raw)
        }
    }
}

/// Decode the framework's base64 descriptor string into raw hash bytes.
pub fn decode_descriptor(descriptor: &str) -> Result<Vec<u8>> {
    BASE64.decode(descriptor).map_err(|e| {
        Error::Computation(format!(
            "failed to decode base64 hash descriptor '{}': {}",
            descriptor, e
        ))
    })
}

/// Turn the descriptor string obtained from the framework into the final
/// output string.
///
/// `Base64` short-circuits: the descriptor is returned unmodified, even
/// when it is empty. Every other format requires a non-empty, decodable
/// descriptor.
pub fn descriptor_to_output(descriptor: &str, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Base64 {
        return Ok(descriptor.to_owned());
    }
    if descriptor.is_empty() {
        return Err(Error::Computation(format!(
            "obtained an empty base64 hash descriptor; cannot derive {} output",
            format
        )));
    }
    let raw = decode_descriptor(descriptor)?;
    Ok(encode_raw_hash(&raw, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_formats_case_insensitively() {
        assert_eq!(OutputFormat::parse("hex").unwrap(), OutputFormat::Hex);
        assert_eq!(OutputFormat::parse("BASE64").unwrap(), OutputFormat::Base64);
        assert_eq!(OutputFormat::parse("Bits").unwrap(), OutputFormat::Bits);
    }

    #[test]
    fn parse_rejects_unknown_format_and_lists_permitted_values() {
        let err = OutputFormat::parse("zzz").unwrap_err();
        match err {
            Error::InvalidFormat(msg) => {
                assert!(msg.contains("zzz"));
                assert!(msg.contains("hex"));
                assert!(msg.contains("base64"));
                assert!(msg.contains("bits"));
            }
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn hex_encoding_is_lowercase_two_chars_per_byte() {
        assert_eq!(encode_raw_hash(&[0x00, 0xab, 0xff], OutputFormat::Hex), "00abff");
    }

    #[test]
    fn bits_encoding_is_eight_digits_per_byte_msb_first() {
        assert_eq!(encode_raw_hash(&[0b1000_0001], OutputFormat::Bits), "10000001");
        let bits = encode_raw_hash(&[0x12, 0x34, 0x56], OutputFormat::Bits);
        assert_eq!(bits.len(), 24);
        assert!(bits.chars().all(|c| c == '0' || c == '1'));
    }

    #[test]
    fn base64_pass_through_keeps_even_an_empty_descriptor() {
        assert_eq!(descriptor_to_output("", OutputFormat::Base64).unwrap(), "");
        assert_eq!(
            descriptor_to_output("QUJD", OutputFormat::Base64).unwrap(),
            "QUJD"
        );
    }

    #[test]
    fn empty_descriptor_is_fatal_for_hex_and_bits() {
        assert!(matches!(
            descriptor_to_output("", OutputFormat::Hex),
            Err(Error::Computation(_))
        ));
        assert!(matches!(
            descriptor_to_output("", OutputFormat::Bits),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn malformed_descriptor_is_fatal_for_hex_but_not_base64() {
        assert!(matches!(
            descriptor_to_output("not-base64!", OutputFormat::Hex),
            Err(Error::Computation(_))
        ));
        // base64 output never decodes, so a malformed descriptor survives
        assert_eq!(
            descriptor_to_output("not-base64!", OutputFormat::Base64).unwrap(),
            "not-base64!"
        );
    }
}
