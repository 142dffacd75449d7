use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::clients::{BookClient, OrderClient, UserClient};
use crate::config::Config;
use crate::domain::{Book, Order, OrderItem, User};
use crate::payment::{HostedCheckout, PaymentActor};
use crate::store_framework::{StoreActor, StoreClient};

fn prefixed_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        format!("{}_{}", prefix, id)
    }
}

/// The main application system that wires all actors together.
///
/// Responsible for starting the store and payment actors, injecting the
/// collaborator handles into the order client, and handling shutdown.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub user_client: UserClient,
    pub book_client: BookClient,
    /// Raw order store handle, for callers outside the checkout flow (the
    /// payment-reconciliation layer patches statuses through it).
    pub order_store: StoreClient<Order>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    pub fn new(config: Config) -> Self {
        // 1. Store actors, one per collection
        let (user_actor, user_store) = StoreActor::<User>::new(32, prefixed_ids("user"));
        let user_handle = tokio::spawn(user_actor.run());

        let (book_actor, book_store) = StoreActor::<Book>::new(32, prefixed_ids("book"));
        let book_handle = tokio::spawn(book_actor.run());

        let (order_actor, order_store) = StoreActor::<Order>::new(32, prefixed_ids("order"));
        let order_handle = tokio::spawn(order_actor.run());

        let (item_actor, item_store) = StoreActor::<OrderItem>::new(32, prefixed_ids("item"));
        let item_handle = tokio::spawn(item_actor.run());

        // 2. Payment actor in front of the checkout gateway
        let gateway = HostedCheckout::new(config.checkout_base_url.clone());
        let (payment_actor, payment_client) = PaymentActor::new(32, gateway);
        let payment_handle = tokio::spawn(payment_actor.run());

        // 3. Typed clients, collaborators injected
        let user_client = UserClient::new(user_store);
        let book_client = BookClient::new(book_store);
        let order_client = OrderClient::new(
            order_store.clone(),
            item_store,
            book_client.clone(),
            user_client.clone(),
            payment_client,
            config,
        );

        Self {
            order_client,
            user_client,
            book_client,
            order_store,
            handles: vec![
                user_handle,
                book_handle,
                order_handle,
                item_handle,
                payment_handle,
            ],
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // Actors stop when the last client handle drops and their channel
        // closes.
        drop(self.order_client);
        drop(self.user_client);
        drop(self.book_client);
        drop(self.order_store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
