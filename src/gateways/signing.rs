use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// `x-hash` header value: base64(HMAC-SHA512(message, key)).
pub fn x_hash(message: &str, hash_key: &str) -> String {
    let mut mac = match HmacSha512::new_from_slice(hash_key.as_bytes()) {
        Ok(mac) => mac,
        // HMAC takes keys of any length; unreachable for Sha512.
        Err(e) => {
            tracing::error!(error = %e, "x-hash signing key rejected");
            return String::new();
        }
    };
    mac.update(message.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
