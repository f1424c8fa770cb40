use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::order::{OrderInsert, OrderRecord, OrderStatus},
    errors::PaymentError,
    repositories::sqlx_repo::SqlxOrderRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &OrderInsert) -> Result<OrderRecord, PaymentError>;

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, PaymentError>;

    /// Records the gateway payment id and signature and flips the order paid.
    async fn mark_paid(
        &self,
        id: &Uuid,
        gateway_payment_id: &str,
        gateway_signature: &str,
    ) -> Result<OrderRecord, PaymentError>;

    async fn set_status(&self, id: &Uuid, status: OrderStatus) -> Result<(), PaymentError>;
}

impl SqlxOrderRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxOrderRepo { pool }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, gateway_order_id, gateway_payment_id, gateway_signature, \
     amount, status, receipt, raw_response, created_at, updated_at";

#[async_trait]
impl OrderRepository for SqlxOrderRepo {
    async fn insert(&self, order: &OrderInsert) -> Result<OrderRecord, PaymentError> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            r#"INSERT INTO orders (user_id, gateway_order_id, amount, receipt, raw_response)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(order.user_id)
        .bind(&order.gateway_order_id)
        .bind(order.amount)
        .bind(&order.receipt)
        .bind(Json(&order.raw_response))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, PaymentError> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE gateway_order_id = $1",
        ))
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn mark_paid(
        &self,
        id: &Uuid,
        gateway_payment_id: &str,
        gateway_signature: &str,
    ) -> Result<OrderRecord, PaymentError> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            r#"UPDATE orders SET
                gateway_payment_id = $2,
                gateway_signature = $3,
                status = 'paid',
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(gateway_payment_id)
        .bind(gateway_signature)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn set_status(&self, id: &Uuid, status: OrderStatus) -> Result<(), PaymentError> {
        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
