// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `X-Hub-Signature-256` verification for inbound webhook bodies.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Checks a `sha256=<hex>` header against the HMAC-SHA256 of `body`.
///
/// The comparison is constant-time. Malformed headers never verify.
pub fn verify_signature(app_secret: &str, body: &[u8], header_value: &str) -> bool {
    let Some(hex_sig) = header_value.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Produces the header value the platform would send for `body`.
pub fn sign(app_secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length, so construction cannot fail.
    let mut mac = match Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_body_verifies() {
        let body = br#"{"entry":[]}"#;
        let header = sign("app-secret", body);
        assert!(header.starts_with("sha256="));
        assert!(verify_signature("app-secret", body, &header));
    }

    #[test]
    fn wrong_secret_or_body_fails() {
        let body = b"payload";
        let header = sign("app-secret", body);
        assert!(!verify_signature("other-secret", body, &header));
        assert!(!verify_signature("app-secret", b"tampered", &header));
    }

    #[test]
    fn malformed_headers_fail() {
        assert!(!verify_signature("s", b"x", ""));
        assert!(!verify_signature("s", b"x", "sha1=abcd"));
        assert!(!verify_signature("s", b"x", "sha256=not-hex"));
    }

    #[test]
    fn known_vector() {
        // HMAC-SHA256(key="key", "The quick brown fox jumps over the lazy dog")
        let header = "sha256=f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8";
        assert!(verify_signature(
            "key",
            b"The quick brown fox jumps over the lazy dog",
            header
        ));
    }
}
