//! Razorpay REST client plus the signature and share-token primitives.
//!
//! Order creation is a server-to-server call authenticated with Basic
//! `key_id:key_secret`. Verification recomputes an HMAC-SHA256 over
//! `orderId|paymentId` with the key secret and compares it to the
//! signature the checkout widget handed to the client.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::constants::SHARE_TOKEN_BYTES;
use crate::errors::PaymentError;

type HmacSha256 = Hmac<Sha256>;

const RAZORPAY_ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// Hex-encoded HMAC-SHA256 of `payload` under `secret`.
pub fn sign_payload(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of a hex signature against the recomputed MAC.
pub fn verify_payload_signature(secret: &str, payload: &str, signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).is_ok()
}

/// Single-use public identifier for a shared resume: 32 random bytes,
/// hex-encoded to 64 characters.
pub fn generate_share_token() -> String {
    let mut bytes = [0u8; SHARE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<serde_json::Value, PaymentError>;

    fn verify_signature(&self, payload: &str, signature: &str) -> bool;
}

pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    orders_url: String,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Self {
        RazorpayClient {
            http: reqwest::Client::new(),
            key_id,
            key_secret,
            orders_url: RAZORPAY_ORDERS_URL.to_string(),
        }
    }

    pub fn with_orders_url(key_id: String, key_secret: String, orders_url: String) -> Self {
        RazorpayClient {
            http: reqwest::Client::new(),
            key_id,
            key_secret,
            orders_url,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<serde_json::Value, PaymentError> {
        let body = serde_json::json!({
            "amount": amount,
            "currency": currency,
            "receipt": receipt,
        });

        let response = self
            .http
            .post(&self.orders_url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, "gateway rejected order creation: {}", detail);
            return Err(PaymentError::OrderCreation(format!(
                "gateway returned {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    fn verify_signature(&self, payload: &str, signature: &str) -> bool {
        verify_payload_signature(&self.key_secret, payload, signature)
    }
}
