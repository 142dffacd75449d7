use tracing::{debug, instrument};

use crate::domain::{User, UserCreate};
use crate::query::{Clause, FieldValue, PageWindow, QueryPlan};
use crate::store_framework::StoreClient;
use crate::user_store::UserError;

/// Client for interacting with the user store actor.
#[derive(Clone)]
pub struct UserClient {
    inner: StoreClient<User>,
}

impl UserClient {
    pub fn new(inner: StoreClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: String) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        self.inner
            .get(id)
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))
    }

    #[instrument(skip(self, params), fields(user_email = %params.email))]
    pub async fn create_user(&self, params: UserCreate) -> Result<String, UserError> {
        debug!("Sending request");
        self.inner
            .create(params)
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))
    }

    /// Looks a user up by exact email through the store's generic query
    /// surface.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let plan = QueryPlan {
            clauses: vec![Clause::Eq {
                field: "email".to_string(),
                value: FieldValue::Str(email.to_string()),
            }],
            window: Some(PageWindow { offset: 0, limit: 1 }),
            ..QueryPlan::default()
        };
        let mut found = self
            .inner
            .select(plan)
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))?;
        Ok(found.pop())
    }
}
