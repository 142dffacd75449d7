use chrono::Utc;

use crate::domain::{Order, OrderCreate, OrderItem, OrderItemCreate, OrderPatch, PaymentStatus};
use crate::query::{FieldKind, FieldValue, Record};
use crate::store_framework::{Entity, StoreError};

impl Record for Order {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Str(self.id.clone())),
            "userId" => Some(FieldValue::Str(self.user_id.clone())),
            "amount" => Some(FieldValue::Float(self.amount)),
            "paymentStatus" => Some(FieldValue::Str(self.payment_status.to_string())),
            "paymentMethod" => Some(FieldValue::Str(self.payment_method.to_string())),
            "createdAt" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }

    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            "id" | "userId" | "paymentStatus" | "paymentMethod" => Some(FieldKind::Str),
            "amount" => Some(FieldKind::Float),
            "createdAt" => Some(FieldKind::DateTime),
            _ => None,
        }
    }
}

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, StoreError> {
        if !params.amount.is_finite() || params.amount < 0.0 {
            return Err(StoreError::Validation(format!(
                "invalid amount: {}",
                params.amount
            )));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            amount: params.amount,
            payment_status: PaymentStatus::Pending,
            payment_method: params.payment_method,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: OrderPatch) -> Result<(), StoreError> {
        if let Some(status) = patch.payment_status {
            self.payment_status = status;
        }
        Ok(())
    }
}

impl Record for OrderItem {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Str(self.id.clone())),
            "orderId" => Some(FieldValue::Str(self.order_id.clone())),
            "bookId" => Some(FieldValue::Str(self.book_id.clone())),
            "price" => Some(FieldValue::Float(self.price)),
            "quantity" => Some(FieldValue::Int(self.quantity as i64)),
            "createdAt" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }

    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            "id" | "orderId" | "bookId" => Some(FieldKind::Str),
            "price" => Some(FieldKind::Float),
            "quantity" => Some(FieldKind::Int),
            "createdAt" => Some(FieldKind::DateTime),
            _ => None,
        }
    }
}

impl Entity for OrderItem {
    type Id = String;
    type CreateParams = OrderItemCreate;
    // Items are immutable once written.
    type Patch = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: OrderItemCreate) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            order_id: params.order_id,
            book_id: params.book_id,
            price: params.price,
            quantity: params.quantity,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), StoreError> {
        Ok(())
    }
}
