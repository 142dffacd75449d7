//! Payment-provider collaborator: a checkout actor in front of a pluggable
//! [`CheckoutGateway`]. The rest of the system only ever talks to
//! [`PaymentClient`], so a real provider integration slots in behind the
//! gateway trait without touching the order flow.

pub mod error;
pub mod gateway;

pub use error::*;
pub use gateway::*;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

pub type PaymentResponse<T> = oneshot::Sender<Result<T, PaymentError>>;

#[derive(Debug)]
pub enum PaymentRequest {
    CreateSession {
        request: CheckoutRequest,
        respond_to: PaymentResponse<CheckoutSession>,
    },
}

/// Actor owning the gateway handle; serializes all session creation.
pub struct PaymentActor<G: CheckoutGateway> {
    receiver: mpsc::Receiver<PaymentRequest>,
    gateway: G,
}

impl<G: CheckoutGateway> PaymentActor<G> {
    pub fn new(buffer_size: usize, gateway: G) -> (Self, PaymentClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, gateway };
        let client = PaymentClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "payment_service", skip(self))]
    pub async fn run(mut self) {
        info!("PaymentService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                PaymentRequest::CreateSession { request, respond_to } => {
                    let result = self.gateway.create_session(&request);
                    match &result {
                        Ok(session) => info!(session_id = %session.id, "Checkout session created"),
                        Err(e) => info!(error = %e, "Checkout session rejected"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!("PaymentService stopped");
    }
}

/// Client for requesting hosted checkout sessions.
#[derive(Clone)]
pub struct PaymentClient {
    sender: mpsc::Sender<PaymentRequest>,
}

impl PaymentClient {
    pub fn new(sender: mpsc::Sender<PaymentRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, request), fields(line_items = request.line_items.len()))]
    pub async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PaymentRequest::CreateSession { request, respond_to })
            .await
            .map_err(|_| PaymentError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| PaymentError::ActorCommunicationError("Actor dropped".to_string()))?
    }
}
