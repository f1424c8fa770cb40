use chrono::Utc;
use uuid::Uuid;

use crate::constants::{ORDER_AMOUNT_PAISE, ORDER_CURRENCY};
use crate::entities::order::{OrderInsert, OrderStatus, VerifyPaymentRequest, VerifyPaymentResponse};
use crate::errors::PaymentError;
use crate::infrastructure::payment::{generate_share_token, PaymentGateway};
use crate::repositories::order::OrderRepository;
use crate::repositories::resume::ResumeRepository;
use crate::utils::valid_uuid::valid_uuid;

pub struct PaymentHandler<O, R, G>
where
    O: OrderRepository,
    R: ResumeRepository,
    G: PaymentGateway,
{
    pub order_repo: O,
    pub resume_repo: R,
    pub gateway: G,
}

impl<O, R, G> PaymentHandler<O, R, G>
where
    O: OrderRepository,
    R: ResumeRepository,
    G: PaymentGateway,
{
    pub fn new(order_repo: O, resume_repo: R, gateway: G) -> Self {
        PaymentHandler {
            order_repo,
            resume_repo,
            gateway,
        }
    }

    /// Creates a fixed-amount order at the gateway, records it, and hands
    /// the raw gateway order object back to the client widget.
    pub async fn create_order(&self, user_id: &Uuid) -> Result<serde_json::Value, PaymentError> {
        let receipt = format!("receipt_{}", Utc::now().timestamp_millis());
        let raw = self
            .gateway
            .create_order(ORDER_AMOUNT_PAISE, ORDER_CURRENCY, &receipt)
            .await?;

        let gateway_order_id = raw
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PaymentError::OrderCreation("gateway returned no order id".to_string()))?
            .to_string();

        let insert = OrderInsert {
            user_id: *user_id,
            gateway_order_id,
            amount: ORDER_AMOUNT_PAISE,
            receipt: raw
                .get("receipt")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .or(Some(receipt)),
            raw_response: raw.clone(),
        };
        self.order_repo.insert(&insert).await?;

        Ok(raw)
    }

    /// Recomputes the HMAC-SHA256 over `orderId|paymentId` and compares it
    /// with the gateway-supplied signature. A match marks the order paid
    /// and, when a resume id was supplied, mints a fresh share token onto
    /// that resume. A mismatch marks the order failed and leaves any prior
    /// share token untouched.
    pub async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, PaymentError> {
        let order = self
            .order_repo
            .find_by_gateway_order_id(&request.razorpay_order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)?;

        let payload = format!("{}|{}", request.razorpay_order_id, request.razorpay_payment_id);

        if !self.gateway.verify_signature(&payload, &request.razorpay_signature) {
            self.order_repo.set_status(&order.id, OrderStatus::Failed).await?;
            tracing::warn!(order_id = %order.gateway_order_id, "payment signature mismatch");
            return Err(PaymentError::SignatureMismatch);
        }

        let paid = self
            .order_repo
            .mark_paid(
                &order.id,
                &request.razorpay_payment_id,
                &request.razorpay_signature,
            )
            .await?;

        let mut share_token = None;
        if let Some(resume_id) = &request.resume_id {
            let resume_id =
                valid_uuid(resume_id).map_err(|_| PaymentError::InvalidInput("Invalid resume id".to_string()))?;
            let token = generate_share_token();
            let updated = self
                .resume_repo
                .set_share_token(&resume_id, &token, Utc::now())
                .await
                .map_err(|e| PaymentError::Internal(e.to_string()))?;
            if updated {
                share_token = Some(token);
            }
        }

        Ok(VerifyPaymentResponse {
            status: "success".to_string(),
            message: "Payment verified successfully".to_string(),
            share_token,
            data: paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::payment::{sign_payload, MockPaymentGateway};
    use crate::repositories::order::MockOrderRepository;
    use crate::repositories::resume::MockResumeRepository;
    use chrono::{DateTime, Utc};
    use sqlx::types::Json;

    fn order_record(id: Uuid, gateway_order_id: &str, status: OrderStatus) -> crate::entities::order::OrderRecord {
        crate::entities::order::OrderRecord {
            id,
            user_id: Uuid::new_v4(),
            gateway_order_id: gateway_order_id.to_string(),
            gateway_payment_id: None,
            gateway_signature: None,
            amount: ORDER_AMOUNT_PAISE,
            status,
            receipt: Some("receipt_1".to_string()),
            raw_response: Json(serde_json::json!({})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn verify_request(resume_id: Option<String>, signature: &str) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            razorpay_order_id: "order_abc".to_string(),
            razorpay_payment_id: "pay_xyz".to_string(),
            razorpay_signature: signature.to_string(),
            resume_id,
        }
    }

    #[actix_rt::test]
    async fn matching_signature_marks_paid_and_mints_a_token() {
        let secret = "gateway-secret";
        let signature = sign_payload(secret, "order_abc|pay_xyz");

        let order_id = Uuid::new_v4();
        let resume_id = Uuid::new_v4();

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_gateway_order_id()
            .returning(move |_| Ok(Some(order_record(order_id, "order_abc", OrderStatus::Created))));
        orders
            .expect_mark_paid()
            .returning(move |id, _, _| Ok(order_record(*id, "order_abc", OrderStatus::Paid)));

        let mut resumes = MockResumeRepository::new();
        resumes
            .expect_set_share_token()
            .withf(move |id, token, _at: &DateTime<Utc>| {
                *id == resume_id && token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit())
            })
            .returning(|_, _, _| Ok(true));

        let mut gateway = MockPaymentGateway::new();
        let secret_owned = secret.to_string();
        gateway
            .expect_verify_signature()
            .returning(move |payload, sig| sign_payload(&secret_owned, payload) == sig);

        let handler = PaymentHandler::new(orders, resumes, gateway);
        let response = handler
            .verify_payment(&verify_request(Some(resume_id.to_string()), &signature))
            .await
            .unwrap();

        assert_eq!(response.status, "success");
        let token = response.share_token.expect("share token expected");
        assert_eq!(token.len(), 64);
        assert_eq!(response.data.status, OrderStatus::Paid);
    }

    #[actix_rt::test]
    async fn wrong_signature_fails_the_order_and_leaves_resume_alone() {
        let order_id = Uuid::new_v4();

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_gateway_order_id()
            .returning(move |_| Ok(Some(order_record(order_id, "order_abc", OrderStatus::Created))));
        orders
            .expect_set_status()
            .withf(|_, status| *status == OrderStatus::Failed)
            .returning(|_, _| Ok(()));

        let mut resumes = MockResumeRepository::new();
        resumes.expect_set_share_token().never();

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_verify_signature().returning(|_, _| false);

        let handler = PaymentHandler::new(orders, resumes, gateway);
        let result = handler
            .verify_payment(&verify_request(Some(Uuid::new_v4().to_string()), "bad-signature"))
            .await;

        assert!(matches!(result, Err(PaymentError::SignatureMismatch)));
    }

    #[actix_rt::test]
    async fn unknown_order_is_a_404() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_gateway_order_id().returning(|_| Ok(None));

        let handler = PaymentHandler::new(
            orders,
            MockResumeRepository::new(),
            MockPaymentGateway::new(),
        );
        let result = handler.verify_payment(&verify_request(None, "sig")).await;
        assert!(matches!(result, Err(PaymentError::OrderNotFound)));
    }
}
