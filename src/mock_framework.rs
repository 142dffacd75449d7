//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_store`] (or [`create_mock_payment`]) to get a client
//! and a receiver, then use the `expect_*` helpers to assert the requests a
//! client sends and to script the actor's replies deterministically.

use tokio::sync::mpsc;

use crate::payment::{CheckoutRequest, CheckoutSession, PaymentClient, PaymentError, PaymentRequest};
use crate::query::QueryPlan;
use crate::store_framework::{Entity, StoreClient, StoreError, StoreRequest};

/// Creates a mock store client and a receiver for asserting requests.
///
/// Instead of spinning up a full `StoreActor`, tests inspect the messages a
/// client under test sends and answer them by hand (success, failure,
/// specific records), which keeps client logic tests deterministic.
pub fn create_mock_store<T: Entity>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Creates a mock payment client and a receiver for asserting requests.
pub fn create_mock_payment(
    buffer_size: usize,
) -> (PaymentClient, mpsc::Receiver<PaymentRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (PaymentClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    T::CreateParams,
    tokio::sync::oneshot::Sender<Result<T::Id, StoreError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a CreateMany request.
pub async fn expect_create_many<T: Entity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    Vec<T::CreateParams>,
    tokio::sync::oneshot::Sender<Result<Vec<T::Id>, StoreError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::CreateMany { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetMany request.
pub async fn expect_get_many<T: Entity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    Vec<T::Id>,
    tokio::sync::oneshot::Sender<Result<Vec<T>, StoreError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::GetMany { ids, respond_to }) => Some((ids, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Select request.
pub async fn expect_select<T: Entity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(
    QueryPlan,
    tokio::sync::oneshot::Sender<Result<Vec<T>, StoreError>>,
)> {
    match receiver.recv().await {
        Some(StoreRequest::Select { plan, respond_to }) => Some((plan, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a checkout-session request.
pub async fn expect_session(
    receiver: &mut mpsc::Receiver<PaymentRequest>,
) -> Option<(
    CheckoutRequest,
    tokio::sync::oneshot::Sender<Result<CheckoutSession, PaymentError>>,
)> {
    match receiver.recv().await {
        Some(PaymentRequest::CreateSession { request, respond_to }) => Some((request, respond_to)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::UserClient;
    use crate::domain::User;
    use crate::query::{Clause, FieldValue};
    use chrono::Utc;

    #[tokio::test]
    async fn test_mock_store_scripts_a_lookup() {
        let (client, mut receiver) = create_mock_store::<User>(10);
        let user_client = UserClient::new(client);

        let lookup = tokio::spawn(async move {
            user_client.find_by_email("alice@example.com").await
        });

        let (plan, responder) = expect_select(&mut receiver).await.expect("Expected Select");
        assert_eq!(
            plan.clauses,
            vec![Clause::Eq {
                field: "email".to_string(),
                value: FieldValue::Str("alice@example.com".to_string()),
            }]
        );

        let alice = User {
            id: "user_1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
        };
        responder.send(Ok(vec![alice.clone()])).unwrap();

        let found = lookup.await.unwrap().unwrap();
        assert_eq!(found, Some(alice));
    }
}
