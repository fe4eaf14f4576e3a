//! Anti-forgery tokens for multipart uploads.
//!
//! A token is `<nonce>.<hex hmac-sha256(nonce)>` keyed with the server
//! secret. Clients fetch one from the anonymous token endpoint and echo it
//! back in [`HEADER_NAME`] on the upload request.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

/// Header that must carry the token on protected requests.
pub const HEADER_NAME: &str = "X-XSRF-TOKEN";

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, nonce: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(nonce.as_bytes());
    Some(mac)
}

/// Issue a fresh token, or `None` if the secret cannot key the MAC.
pub fn issue_token(secret: &str) -> Option<String> {
    let nonce = hex::encode(rand::rng().random::<[u8; 16]>());
    let signature = hex::encode(keyed_mac(secret, &nonce)?.finalize().into_bytes());
    Some(format!("{nonce}.{signature}"))
}

/// Check a token presented by a client. The signature comparison runs in
/// constant time.
pub fn verify_token(secret: &str, token: &str) -> bool {
    let Some((nonce, signature)) = token.split_once('.') else {
        return false;
    };
    if nonce.is_empty() {
        return false;
    }
    let Ok(signature) = hex::decode(signature) else {
        return false;
    };
    keyed_mac(secret, nonce).is_some_and(|mac| mac.verify_slice(&signature).is_ok())
}
