//! HMAC-SHA1 verification of GitHub webhook signatures

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Header GitHub uses for the HMAC-SHA1 delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Checks a `sha1=<hex>` signature header against the raw request body.
///
/// A malformed header (missing `=`, wrong algorithm prefix, bad hex) fails
/// verification without panicking. The digest comparison is constant-time.
pub fn verify(secret: &[u8], payload: &[u8], signature_header: &str) -> bool {
    let Some(digest) = signature_header.strip_prefix("sha1=") else {
        return false;
    };

    let Ok(digest) = hex::decode(digest) else {
        return false;
    };

    let Ok(mut mac) = HmacSha1::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);

    mac.verify_slice(&digest).is_ok()
}
