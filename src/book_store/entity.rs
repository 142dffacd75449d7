use chrono::Utc;

use crate::domain::{Book, BookCreate, BookPatch};
use crate::query::{FieldKind, FieldValue, Record};
use crate::store_framework::{Entity, StoreError};

impl Record for Book {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Str(self.id.clone())),
            "name" => Some(FieldValue::Str(self.name.clone())),
            "price" => Some(FieldValue::Float(self.price)),
            "description" => self.description.clone().map(FieldValue::Str),
            "createdAt" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }

    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            "id" | "name" | "description" => Some(FieldKind::Str),
            "price" => Some(FieldKind::Float),
            "createdAt" => Some(FieldKind::DateTime),
            _ => None,
        }
    }
}

impl Entity for Book {
    type Id = String;
    type CreateParams = BookCreate;
    type Patch = BookPatch;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: BookCreate) -> Result<Self, StoreError> {
        if !params.price.is_finite() || params.price < 0.0 {
            return Err(StoreError::Validation(format!(
                "invalid price: {}",
                params.price
            )));
        }
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            description: params.description,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: BookPatch) -> Result<(), StoreError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        Ok(())
    }
}
