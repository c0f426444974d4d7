// JCS (JSON Canonicalization Scheme) - RFC 8785

use serde::Serialize;

/// Canonicalizes a serializable value according to RFC 8785 (JCS) and returns the UTF-8 bytes.
///
/// Object keys are sorted and insignificant whitespace is dropped, so the same
/// document always encodes to the same bytes regardless of submission order.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let canonical = serde_jcs::to_string(value)?;
    Ok(canonical.into_bytes())
}
