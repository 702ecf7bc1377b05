//! HMAC-SHA256 signatures used by the gateway.
//!
//! Checkout confirmations sign `"{order_id}|{payment_id}"` with the API
//! secret. Webhooks sign the raw request body with the webhook secret. Both
//! are lowercase hex.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn sign(secret: &str, payload: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison of `signature` (hex) against the expected MAC.
pub fn verify(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&provided).is_ok()
}

pub fn payment_payload(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

pub fn verify_payment(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    verify(secret, payment_payload(order_id, payment_id).as_bytes(), signature)
}

pub fn verify_webhook(secret: &str, body: &[u8], signature: &str) -> bool {
    verify(secret, body, signature)
}
