use tracing::{debug, instrument};

use crate::book_store::BookError;
use crate::domain::{Book, BookCreate};
use crate::store_framework::StoreClient;

/// Client for interacting with the book catalog actor.
#[derive(Clone)]
pub struct BookClient {
    inner: StoreClient<Book>,
}

impl BookClient {
    pub fn new(inner: StoreClient<Book>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(book_name = %params.name))]
    pub async fn create_book(&self, params: BookCreate) -> Result<String, BookError> {
        debug!("Sending request");
        self.inner
            .create(params)
            .await
            .map_err(|e| BookError::ActorCommunicationError(e.to_string()))
    }

    /// Resolves a set of book ids. Unknown ids are simply absent from the
    /// result; duplicates resolve once.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn find_by_ids(&self, ids: Vec<String>) -> Result<Vec<Book>, BookError> {
        debug!("Sending request");
        self.inner
            .get_many(ids)
            .await
            .map_err(|e| BookError::ActorCommunicationError(e.to_string()))
    }
}
