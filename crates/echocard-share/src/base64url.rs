use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// URL-safe alphabet, no padding on encode. Decoding accepts tokens with or
/// without `=` padding.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    TOKEN_ENGINE.encode(data)
}

/// Base64url decode a string to bytes.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    TOKEN_ENGINE.decode(s)
}
