use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Domain events emitted by services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderPlaced(Uuid),
    OrderPaymentConfirmed(Uuid),
    OrderAutoCanceled(Uuid),
    OrderDeliveryStatusChanged {
        order_id: Uuid,
        new_status: String,
    },
    SellerOrderDeliveryStatusChanged {
        seller_order_id: Uuid,
        new_status: String,
    },

    // Cart events
    CartItemAdded {
        customer_id: Uuid,
        product_id: Uuid,
    },
    CartItemRemoved {
        customer_id: Uuid,
        product_id: Uuid,
    },

    // Catalog events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),
    ReviewAdded {
        product_id: Uuid,
        rating: i32,
    },
    CategoryCreated(Uuid),
    BannerCreated(Uuid),

    // Account events
    CustomerRegistered(Uuid),
    SellerRegistered(Uuid),
    SellerStatusChanged {
        seller_id: Uuid,
        new_status: String,
    },
    SellerPaymentActivated(Uuid),

    // Payout events
    WithdrawalRequested {
        seller_id: Uuid,
        request_id: Uuid,
    },
    WithdrawalConfirmed(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, failing if the channel is closed or full.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event; a delivery failure is logged rather than propagated.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Dropping event: {}", e);
        }
    }
}

/// Consumes events from the channel until it closes.
///
/// The consumer only records events for observability today; integrations
/// (webhooks, notification fan-out) hook in here.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        debug!(?event, "Processing event");
    }
    debug!("Event channel closed; consumer exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_does_not_fail_when_consumer_is_gone() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        drop(rx);

        // Must not panic or return an error path to the caller.
        sender.send_or_log(Event::OrderPlaced(Uuid::new_v4())).await;
    }

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        let order_id = Uuid::new_v4();
        sender.send(Event::OrderPlaced(order_id)).await.unwrap();

        match rx.recv().await {
            Some(Event::OrderPlaced(id)) => assert_eq!(id, order_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
