//! 支付回调签名：`hex(HMAC_SHA256(secret, "{order_id}|{payment_id}"))`

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(mac)
}

pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    let digest = mac(secret, order_id, payment_id)?.finalize().into_bytes();
    Some(hex::encode(digest))
}

/// 常量时间比较
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let (Ok(expected), Some(mac)) = (
        hex::decode(signature.trim()),
        mac(secret, order_id, payment_id),
    ) else {
        return false;
    };
    mac.verify_slice(&expected).is_ok()
}
