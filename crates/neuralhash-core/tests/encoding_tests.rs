use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use neuralhash_core::encoding::{decode_descriptor, descriptor_to_output, encode_raw_hash};
use neuralhash_core::{Error, OutputFormat};

// Base64 of a hypothetical 12-byte (96-bit) descriptor, bytes "ABCDEFGHIJKL"
const DESCRIPTOR_B64: &str = "QUJDREVGR0hJSktM";
const DESCRIPTOR_HEX: &str = "4142434445464748494a4b4c";

#[test]
fn known_descriptor_converts_to_hex() {
    assert_eq!(
        descriptor_to_output(DESCRIPTOR_B64, OutputFormat::Hex).unwrap(),
        DESCRIPTOR_HEX
    );
}

#[test]
fn known_descriptor_converts_to_bits() {
    let bits = descriptor_to_output(DESCRIPTOR_B64, OutputFormat::Bits).unwrap();
    assert_eq!(bits.len(), 96);
    let expected: String = b"ABCDEFGHIJKL".iter().map(|b| format!("{:08b}", b)).collect();
    assert_eq!(bits, expected);
}

#[test]
fn known_descriptor_passes_through_as_base64() {
    assert_eq!(
        descriptor_to_output(DESCRIPTOR_B64, OutputFormat::Base64).unwrap(),
        DESCRIPTOR_B64
    );
}

#[test]
fn decode_descriptor_yields_the_raw_bytes() {
    assert_eq!(decode_descriptor(DESCRIPTOR_B64).unwrap(), b"ABCDEFGHIJKL");
}

#[test]
fn hex_round_trips_arbitrary_bytes() {
    let bytes: Vec<u8> = (0u8..=255).collect();
    let hex = encode_raw_hash(&bytes, OutputFormat::Hex);
    assert_eq!(hex.len(), 2 * bytes.len());
    let decoded: Vec<u8> = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect();
    assert_eq!(decoded, bytes);
}

#[test]
fn bits_output_is_eight_binary_digits_per_byte() {
    let bytes = [0u8, 1, 0x80, 0xff, 0x5a];
    let bits = encode_raw_hash(&bytes, OutputFormat::Bits);
    assert_eq!(bits.len(), 8 * bytes.len());
    assert!(bits.chars().all(|c| c == '0' || c == '1'));
    assert!(bits.starts_with("00000000"));
    assert!(bits.ends_with("01011010"));
}

#[test]
fn base64_encoding_round_trips_through_a_standard_decoder() {
    let bytes = b"ABCDEFGHIJKL";
    let b64 = encode_raw_hash(bytes, OutputFormat::Base64);
    assert_eq!(b64, DESCRIPTOR_B64);
    assert_eq!(STANDARD.decode(&b64).unwrap(), bytes);
}

#[test]
fn unknown_format_string_is_an_invalid_format_error() {
    let err = "zzz".parse::<OutputFormat>().unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
    assert!(err.to_string().contains("hex"));
    assert!(err.to_string().contains("base64"));
    assert!(err.to_string().contains("bits"));
}
