use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::query::{QueryPlan, Record};

// =============================================================================
// 1. THE ABSTRACTION (Entity contract)
// =============================================================================

/// Trait that any domain entity must implement to be managed by a `StoreActor`.
///
/// The [`Record`] supertrait exposes the entity's fields to the generic query
/// plan, so every store answers the same filter/sort/paginate/count surface.
pub trait Entity: Record + Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    /// Get the ID of the entity.
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the generated ID and creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, StoreError>;

    /// Apply a partial update in place.
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), StoreError>;
}

/// Errors surfaced by the store framework itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("store channel closed")]
    ChannelClosed,
    #[error("store reply dropped")]
    ReplyDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type StoreResponse<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: StoreResponse<T::Id>,
    },
    CreateMany {
        params: Vec<T::CreateParams>,
        respond_to: StoreResponse<Vec<T::Id>>,
    },
    Get {
        id: T::Id,
        respond_to: StoreResponse<Option<T>>,
    },
    GetMany {
        ids: Vec<T::Id>,
        respond_to: StoreResponse<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: StoreResponse<T>,
    },
    Select {
        plan: QueryPlan,
        respond_to: StoreResponse<Vec<T>>,
    },
    Count {
        plan: QueryPlan,
        respond_to: StoreResponse<u64>,
    },
}

// =============================================================================
// 3. THE GENERIC STORE ACTOR
// =============================================================================

/// Owns one backing collection and serializes all access to it.
///
/// Exactly one logical request is processed at a time; clients communicate
/// through the channel, never by sharing the map.
pub struct StoreActor<T: Entity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> StoreActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = StoreClient { sender };
        (actor, client)
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.insert_one(params));
                }
                StoreRequest::CreateMany { params, respond_to } => {
                    let mut ids = Vec::with_capacity(params.len());
                    let mut result = Ok(());
                    for item in params {
                        match self.insert_one(item) {
                            Ok(id) => ids.push(id),
                            // Earlier inserts stay in place; there is no
                            // transaction around the batch.
                            Err(e) => {
                                result = Err(e);
                                break;
                            }
                        }
                    }
                    let _ = respond_to.send(result.map(|()| ids));
                }
                StoreRequest::Get { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::GetMany { ids, respond_to } => {
                    // One record per distinct requested id, in first-seen order.
                    let mut seen = HashSet::new();
                    let found = ids
                        .into_iter()
                        .filter(|id| seen.insert(id.clone()))
                        .filter_map(|id| self.records.get(&id).cloned())
                        .collect();
                    let _ = respond_to.send(Ok(found));
                }
                StoreRequest::Update { id, patch, respond_to } => {
                    let result = match self.records.get_mut(&id) {
                        Some(record) => record.on_update(patch).map(|()| record.clone()),
                        None => Err(StoreError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                StoreRequest::Select { plan, respond_to } => {
                    let rows = plan.select_from(self.records.values());
                    let _ = respond_to.send(Ok(rows));
                }
                StoreRequest::Count { plan, respond_to } => {
                    let total = plan.count_from(self.records.values());
                    let _ = respond_to.send(Ok(total));
                }
            }
        }
    }

    fn insert_one(&mut self, params: T::CreateParams) -> Result<T::Id, StoreError> {
        let id = (self.next_id_fn)();
        let record = T::from_create_params(id, params)?;
        let id = record.id().clone();
        self.records.insert(id.clone(), record);
        Ok(id)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct StoreClient<T: Entity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Entity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Create { params, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }

    pub async fn create_many(&self, params: Vec<T::CreateParams>) -> Result<Vec<T::Id>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::CreateMany { params, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Get { id, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }

    pub async fn get_many(&self, ids: Vec<T::Id>) -> Result<Vec<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::GetMany { ids, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update { id, patch, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }

    pub async fn select(&self, plan: QueryPlan) -> Result<Vec<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Select { plan, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }

    pub async fn count(&self, plan: QueryPlan) -> Result<u64, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Count { plan, respond_to })
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        response.await.map_err(|_| StoreError::ReplyDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
