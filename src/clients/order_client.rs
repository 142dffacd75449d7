use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::clients::{BookClient, UserClient};
use crate::config::Config;
use crate::domain::{
    Book, Order, OrderCreate, OrderItem, OrderItemCreate, OrderReceipt, PaymentMethod,
    PaymentStatus,
};
use crate::order_store::OrderError;
use crate::payment::{CheckoutRequest, LineItem, PaymentClient};
use crate::query::{
    apply_projection, Clause, FieldValue, Page, PageMeta, Query, QueryOptions, QueryParams,
    QueryPlan, SortDirection, SortSpec,
};
use crate::store_framework::StoreClient;

/// Fallback line-item description when a book carries none.
const DEFAULT_ITEM_DESCRIPTION: &str = "Book purchase";
/// Checkout metadata discriminator for webhook reconciliation.
const ORDER_TYPE: &str = "BOOK";

/// Client for placing and listing orders.
///
/// This is the orchestration layer: it validates books against the catalog,
/// writes the order header and its items, requests the checkout session, and
/// serves listings through the query builder with user and book detail
/// embedded.
#[derive(Clone)]
pub struct OrderClient {
    orders: StoreClient<Order>,
    items: StoreClient<OrderItem>,
    book_client: BookClient,
    user_client: UserClient,
    payment_client: PaymentClient,
    config: Config,
}

impl OrderClient {
    pub fn new(
        orders: StoreClient<Order>,
        items: StoreClient<OrderItem>,
        book_client: BookClient,
        user_client: UserClient,
        payment_client: PaymentClient,
        config: Config,
    ) -> Self {
        Self {
            orders,
            items,
            book_client,
            user_client,
            payment_client,
            config,
        }
    }

    /// Places an order for the given book ids on behalf of a user.
    ///
    /// The total counts every resolved input occurrence; ids that resolve to
    /// nothing are skipped, and a list resolving to no books at all fails
    /// with `NotFound` before anything is written. The order header and its
    /// items are persisted first, then the checkout session is requested;
    /// a session failure leaves the pending order in place.
    #[instrument(skip(self, book_ids), fields(user_id = %user_id, book_count = book_ids.len()))]
    pub async fn create_order(
        &self,
        book_ids: Vec<String>,
        user_id: String,
    ) -> Result<OrderReceipt, OrderError> {
        info!("Processing create_order request");

        let books = self
            .book_client
            .find_by_ids(book_ids.clone())
            .await
            .map_err(|e| OrderError::StoreError(format!("Book lookup failed: {}", e)))?;
        let by_id: HashMap<&str, &Book> = books.iter().map(|b| (b.id.as_str(), b)).collect();

        // One entry per input occurrence, unresolved ids skipped.
        let resolved: Vec<&Book> = book_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect();
        if resolved.is_empty() {
            warn!("No requested books resolved");
            return Err(OrderError::NotFound(book_ids.join(", ")));
        }

        let total: f64 = resolved.iter().map(|b| b.price).sum();

        let order_id = self
            .orders
            .create(OrderCreate {
                user_id: user_id.clone(),
                amount: total,
                payment_method: PaymentMethod::Card,
            })
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;

        let item_params: Vec<OrderItemCreate> = resolved
            .iter()
            .map(|book| OrderItemCreate {
                order_id: order_id.clone(),
                book_id: book.id.clone(),
                price: book.price,
                quantity: 1,
            })
            .collect();
        self.items
            .create_many(item_params)
            .await
            .map_err(|e| OrderError::StoreError(format!("Item batch failed: {}", e)))?;

        let session = match self
            .payment_client
            .create_session(self.checkout_request(&order_id, &user_id, &resolved))
            .await
        {
            Ok(session) => session,
            // The pending order and its items stay behind; reconciliation
            // has nothing to complete them with.
            Err(e) => {
                error!(error = %e, order_id = %order_id, "Checkout session failed after writes");
                return Err(OrderError::PaymentFailed(e.to_string()));
            }
        };

        info!(order_id = %order_id, payment_url = %session.url, "Order created");
        Ok(OrderReceipt {
            order_id,
            payment_url: session.url,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: String) -> Result<Option<Order>, OrderError> {
        self.orders
            .get(id)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))
    }

    /// All orders, filtered/sorted/paginated by the request, with user and
    /// item→book detail embedded.
    #[instrument(skip(self, params))]
    pub async fn list_all_orders(&self, params: QueryParams) -> Result<Page<Value>, OrderError> {
        self.list_orders(params, QueryOptions::default()).await
    }

    /// The caller's own paid orders. The email is resolved through the user
    /// store; an unknown email yields an empty page.
    #[instrument(skip(self, params))]
    pub async fn list_my_orders(
        &self,
        params: QueryParams,
        user_email: &str,
    ) -> Result<Page<Value>, OrderError> {
        let user = self
            .user_client
            .find_by_email(user_email)
            .await
            .map_err(|e| OrderError::StoreError(format!("User lookup failed: {}", e)))?;

        let Some(user) = user else {
            return Ok(Page {
                meta: PageMeta::empty(params.page(), params.limit()),
                data: Vec::new(),
            });
        };

        let options = QueryOptions {
            clauses: vec![
                Clause::Eq {
                    field: "userId".to_string(),
                    value: FieldValue::Str(user.id),
                },
                Clause::Eq {
                    field: "paymentStatus".to_string(),
                    value: FieldValue::Str(PaymentStatus::Paid.to_string()),
                },
            ],
        };
        self.list_orders(params, options).await
    }

    async fn list_orders(
        &self,
        params: QueryParams,
        options: QueryOptions,
    ) -> Result<Page<Value>, OrderError> {
        let query = Query::new(self.orders.clone(), params)
            .range("amount")
            .search(&[])
            .filter()
            .sort()
            .paginate()
            .fields();

        let rows = query
            .execute(&options)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        let meta = query
            .count_total(&options)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;

        let data = self.render_orders(rows, query.projection()).await?;
        Ok(Page { meta, data })
    }

    fn checkout_request(
        &self,
        order_id: &str,
        user_id: &str,
        books: &[&Book],
    ) -> CheckoutRequest {
        let line_items = books
            .iter()
            .map(|book| LineItem {
                name: book.name.clone(),
                description: book
                    .description
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ITEM_DESCRIPTION.to_string()),
                unit_amount: (book.price * 100.0).round() as i64,
                quantity: 1,
            })
            .collect();

        let mut metadata = BTreeMap::new();
        metadata.insert("orderId".to_string(), order_id.to_string());
        metadata.insert("orderType".to_string(), ORDER_TYPE.to_string());
        metadata.insert("userId".to_string(), user_id.to_string());

        CheckoutRequest {
            currency: self.config.currency.clone(),
            line_items,
            success_url: self.config.success_url.clone(),
            cancel_url: self.config.cancel_url.clone(),
            metadata,
        }
    }

    /// Renders orders into response objects: projected order attributes plus
    /// the embedded `user` and `items` (with each item's `book`) detail.
    async fn render_orders(
        &self,
        orders: Vec<Order>,
        projection: Option<&[String]>,
    ) -> Result<Vec<Value>, OrderError> {
        let mut data = Vec::with_capacity(orders.len());
        for order in orders {
            let user = self
                .user_client
                .get_user(order.user_id.clone())
                .await
                .map_err(|e| OrderError::StoreError(format!("User lookup failed: {}", e)))?;

            let items = self.items_of(&order.id).await?;
            let book_ids = items.iter().map(|item| item.book_id.clone()).collect();
            let books = self
                .book_client
                .find_by_ids(book_ids)
                .await
                .map_err(|e| OrderError::StoreError(format!("Book lookup failed: {}", e)))?;
            let books_by_id: HashMap<&str, &Book> =
                books.iter().map(|b| (b.id.as_str(), b)).collect();

            let mut rendered = to_json(&order)?;
            if let Some(fields) = projection {
                rendered = apply_projection(rendered, fields);
            }

            let items_json = items
                .iter()
                .map(|item| {
                    let mut value = to_json(item)?;
                    if let Value::Object(map) = &mut value {
                        let book = books_by_id
                            .get(item.book_id.as_str())
                            .map(|b| to_json(*b))
                            .transpose()?
                            .unwrap_or(Value::Null);
                        map.insert("book".to_string(), book);
                    }
                    Ok(value)
                })
                .collect::<Result<Vec<Value>, OrderError>>()?;

            if let Value::Object(map) = &mut rendered {
                let user_json = user.as_ref().map(to_json).transpose()?.unwrap_or(Value::Null);
                map.insert("user".to_string(), user_json);
                map.insert("items".to_string(), Value::Array(items_json));
            }
            data.push(rendered);
        }
        Ok(data)
    }

    async fn items_of(&self, order_id: &str) -> Result<Vec<OrderItem>, OrderError> {
        let plan = QueryPlan {
            clauses: vec![Clause::Eq {
                field: "orderId".to_string(),
                value: FieldValue::Str(order_id.to_string()),
            }],
            sort: Some(SortSpec::new("createdAt", SortDirection::Ascending)),
            ..QueryPlan::default()
        };
        self.items
            .select(plan)
            .await
            .map_err(|e| OrderError::StoreError(format!("Item lookup failed: {}", e)))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, OrderError> {
    serde_json::to_value(value).map_err(|e| OrderError::StoreError(format!("render failed: {}", e)))
}
