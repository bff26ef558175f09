use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the service layer after a successful commit.
///
/// Delivery is best-effort: a full channel or a dropped receiver never fails
/// the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderRejected {
        order_id: Uuid,
        reason: String,
    },
    ProcessingStepRecorded {
        order_id: Uuid,
        step: String,
    },
    WeightAmended {
        order_id: Uuid,
        weight_kg: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes events from the channel and logs them. Runs until every sender
/// is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(
                    order_id = %order_id,
                    old_status = %old_status,
                    new_status = %new_status,
                    "order status changed"
                );
            }
            Event::OrderRejected { order_id, reason } => {
                info!(order_id = %order_id, reason = %reason, "order rejected");
            }
            Event::ProcessingStepRecorded { order_id, step } => {
                info!(order_id = %order_id, step = %step, "processing step recorded");
            }
            Event::WeightAmended {
                order_id,
                weight_kg,
            } => {
                info!(order_id = %order_id, weight_kg = %weight_kg, "order weight amended");
            }
        }
    }
    warn!("event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        let order_id = Uuid::new_v4();
        sender
            .send(Event::ProcessingStepRecorded {
                order_id,
                step: "Washed".into(),
            })
            .await
            .expect("send event");

        match rx.recv().await {
            Some(Event::ProcessingStepRecorded { order_id: got, .. }) => {
                assert_eq!(got, order_id)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::OrderRejected {
                order_id: Uuid::new_v4(),
                reason: "stained beyond saving".into(),
            })
            .await;
        assert!(result.is_err());
    }
}
