mod domain;
mod clients;

mod app_system;
mod config;

#[cfg(test)]
mod mock_framework;

mod store_framework;
mod query;
mod payment;

mod user_store;
mod book_store;
mod order_store;

use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, OrderSystem};
use crate::config::Config;
use crate::domain::{BookCreate, OrderPatch, PaymentStatus, UserCreate};
use crate::query::QueryParams;

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting bookstore order system");

    let system = OrderSystem::new(Config::from_env());

    // Register a test customer
    let span = tracing::info_span!("user_registration");
    let user_id = async {
        info!("Creating test user");
        system
            .user_client
            .create_user(UserCreate {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(user_id = %user_id, "User created successfully");

    // Seed the catalog
    let span = tracing::info_span!("catalog_seeding");
    let book_ids = async {
        let mut ids = Vec::new();
        for (name, price, description) in [
            ("Systems Primer", 10.0, Some("Introductory text")),
            ("Rust in Practice", 15.0, None),
        ] {
            info!(book_name = name, "Creating book");
            let id = system
                .book_client
                .create_book(BookCreate {
                    name: name.to_string(),
                    price,
                    description: description.map(str::to_string),
                })
                .await
                .map_err(|e| e.to_string())?;
            ids.push(id);
        }
        Ok::<_, String>(ids)
    }
    .instrument(span)
    .await?;

    // Place an order - this flows through books, orders, items, and payment
    let span = tracing::info_span!("order_placement");
    let receipt = async {
        info!("Placing order through the order system");
        system
            .order_client
            .create_order(book_ids, user_id.clone())
            .await
    }
    .instrument(span)
    .await;

    let receipt = match receipt {
        Ok(receipt) => {
            info!(
                order_id = %receipt.order_id,
                payment_url = %receipt.payment_url,
                "Order placed successfully"
            );
            receipt
        }
        Err(e) => {
            error!(error = %e, "Order placement failed");
            return Err(e.to_string());
        }
    };

    // Stand in for the provider's reconciliation callback
    system
        .order_store
        .update(
            receipt.order_id.clone(),
            OrderPatch {
                payment_status: Some(PaymentStatus::Paid),
            },
        )
        .await
        .map_err(|e| e.to_string())?;
    info!(order_id = %receipt.order_id, "Payment reconciled");

    if let Some(order) = system
        .order_client
        .get_order(receipt.order_id.clone())
        .await
        .map_err(|e| e.to_string())?
    {
        info!(
            order_id = %order.id,
            amount = order.amount,
            status = %order.payment_status,
            "Order state after reconciliation"
        );
    }

    // List everything, then the customer's own paid orders
    let listing = system
        .order_client
        .list_all_orders(QueryParams::default())
        .await
        .map_err(|e| e.to_string())?;
    info!(
        total = listing.meta.total,
        page = listing.meta.page,
        "Listed all orders"
    );

    let mine = system
        .order_client
        .list_my_orders(QueryParams::default(), "alice@example.com")
        .await
        .map_err(|e| e.to_string())?;
    info!(total = mine.meta.total, "Listed customer's paid orders");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
