use chrono::Utc;

use crate::domain::{User, UserCreate, UserPatch};
use crate::query::{FieldKind, FieldValue, Record};
use crate::store_framework::{Entity, StoreError};

impl Record for User {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Str(self.id.clone())),
            "name" => Some(FieldValue::Str(self.name.clone())),
            "email" => Some(FieldValue::Str(self.email.clone())),
            "createdAt" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }

    fn field_kind(name: &str) -> Option<FieldKind> {
        match name {
            "id" | "name" | "email" => Some(FieldKind::Str),
            "createdAt" => Some(FieldKind::DateTime),
            _ => None,
        }
    }
}

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: UserCreate) -> Result<Self, StoreError> {
        if params.email.trim().is_empty() {
            return Err(StoreError::Validation("email required".to_string()));
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), StoreError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        Ok(())
    }
}
