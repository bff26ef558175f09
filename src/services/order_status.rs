use crate::{
    db::DbPool,
    entities::{order, order_processing, order_status, rejected_order},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{OrderStatus, ProcessingStep},
    services::orders::current_status_row,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// A freshly appended status history row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusRecord {
    pub order_id: Uuid,
    pub status: String,
    pub sequence: i32,
    pub recorded_at: DateTime<Utc>,
    /// True when this transition also created a rejection record.
    pub rejection_recorded: bool,
}

/// A freshly appended processing trail row, plus the correlated status row
/// when the step was "Out for Delivery".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessingRecord {
    pub order_id: Uuid,
    pub step: String,
    pub sequence: i32,
    pub recorded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_record: Option<StatusRecord>,
}

/// Lifecycle writes: status transitions, rejections and the processing
/// trail. All multi-row writes here happen inside one transaction so a
/// failure can never leave the history and the trail disagreeing.
#[derive(Clone)]
pub struct OrderStatusService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderStatusService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Appends a status row for the order after checking the transition
    /// table. Re-asserting the current status appends a fresh row; repeated
    /// calls are never deduplicated.
    ///
    /// When the target is `Rejected` and a non-empty reason is supplied, the
    /// rejection record is inserted in the same transaction. Without a
    /// reason the status row still lands and no rejection record is created;
    /// requiring the reason stays a caller-side policy.
    #[instrument(skip(self, reason, note), fields(order_id = %order_id, target = %target))]
    pub async fn record_status(
        &self,
        order_id: Uuid,
        target: OrderStatus,
        reason: Option<String>,
        note: Option<String>,
    ) -> Result<StatusRecord, ServiceError> {
        let db = &*self.db_pool;

        order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let txn = db.begin().await?;

        let current_row = current_status_row(&txn, order_id).await?.ok_or_else(|| {
            ServiceError::InternalError(format!("order {} has no status history", order_id))
        })?;
        let current = OrderStatus::from_str(&current_row.status).map_err(|_| {
            ServiceError::InternalError(format!(
                "order {} carries unrecognized status label '{}'",
                order_id, current_row.status
            ))
        })?;

        if !current.can_transition_to(target) {
            return Err(ServiceError::InvalidStatus(format!(
                "cannot move order from \"{}\" to \"{}\"",
                current, target
            )));
        }

        let now = Utc::now();
        let sequence = current_row.sequence + 1;

        let status_row = order_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            status: Set(target.to_string()),
            sequence: Set(sequence),
            recorded_at: Set(now),
        };
        status_row.insert(&txn).await?;

        let reason = reason.filter(|r| !r.trim().is_empty());
        let mut rejection_recorded = false;
        if target == OrderStatus::Rejected {
            if let Some(reason_text) = reason.clone() {
                let existing = rejected_order::Entity::find()
                    .filter(rejected_order::Column::OrderId.eq(order_id))
                    .one(&txn)
                    .await?;
                // At most one rejection record per order; a repeated
                // rejection keeps the original reason.
                if existing.is_none() {
                    let rejection = rejected_order::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        order_id: Set(order_id),
                        reason: Set(reason_text),
                        note: Set(note.clone()),
                        recorded_at: Set(now),
                    };
                    rejection.insert(&txn).await?;
                    rejection_recorded = true;
                }
            }
        }

        txn.commit().await?;

        info!(
            order_id = %order_id,
            old_status = %current,
            new_status = %target,
            sequence,
            "order status recorded"
        );

        if let Some(events) = &self.event_sender {
            let _ = events
                .send(Event::OrderStatusChanged {
                    order_id,
                    old_status: current.to_string(),
                    new_status: target.to_string(),
                })
                .await
                .map_err(|e| warn!(error = %e, "failed to send status changed event"));

            if rejection_recorded {
                if let Some(reason_text) = reason {
                    let _ = events
                        .send(Event::OrderRejected {
                            order_id,
                            reason: reason_text,
                        })
                        .await
                        .map_err(|e| warn!(error = %e, "failed to send order rejected event"));
                }
            }
        }

        Ok(StatusRecord {
            order_id,
            status: target.to_string(),
            sequence,
            recorded_at: now,
            rejection_recorded,
        })
    }

    /// Appends a processing step for an order currently in "Processing",
    /// enforcing the wash → press → fold → dispatch sequence. Recording
    /// "Out for Delivery" also appends the top-level "For Delivery" status
    /// row; both rows commit in the same transaction or neither does.
    #[instrument(skip(self), fields(order_id = %order_id, step = %step))]
    pub async fn record_processing_step(
        &self,
        order_id: Uuid,
        step: ProcessingStep,
    ) -> Result<ProcessingRecord, ServiceError> {
        let db = &*self.db_pool;

        order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let txn = db.begin().await?;

        let current_row = current_status_row(&txn, order_id).await?.ok_or_else(|| {
            ServiceError::InternalError(format!("order {} has no status history", order_id))
        })?;
        let current = OrderStatus::from_str(&current_row.status).map_err(|_| {
            ServiceError::InternalError(format!(
                "order {} carries unrecognized status label '{}'",
                order_id, current_row.status
            ))
        })?;

        if current != OrderStatus::Processing {
            return Err(ServiceError::InvalidStatus(format!(
                "processing steps can only be recorded while an order is \"Processing\" \
                 (current status: \"{}\")",
                current
            )));
        }

        let latest_row = order_processing::Entity::find()
            .filter(order_processing::Column::OrderId.eq(order_id))
            .order_by_desc(order_processing::Column::Sequence)
            .one(&txn)
            .await?;

        let latest_step = latest_row
            .as_ref()
            .map(|row| {
                ProcessingStep::from_str(&row.step).map_err(|_| {
                    ServiceError::InternalError(format!(
                        "order {} carries unrecognized processing step '{}'",
                        order_id, row.step
                    ))
                })
            })
            .transpose()?;

        if !step.may_follow(latest_step) {
            return Err(ServiceError::InvalidStatus(match latest_step {
                Some(latest) => format!(
                    "cannot record \"{}\" while the latest step is \"{}\"",
                    step, latest
                ),
                None => format!("cannot record \"{}\" before \"Washed\"", step),
            }));
        }

        let now = Utc::now();
        let sequence = latest_row.map(|row| row.sequence + 1).unwrap_or(1);

        let processing_row = order_processing::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            step: Set(step.to_string()),
            sequence: Set(sequence),
            recorded_at: Set(now),
        };
        processing_row.insert(&txn).await?;

        // Dispatching the laundry promotes the order itself; the status row
        // rides the same transaction as the processing row.
        let status_record = if step == ProcessingStep::OutForDelivery {
            let status_sequence = current_row.sequence + 1;
            let status_row = order_status::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                status: Set(OrderStatus::ForDelivery.to_string()),
                sequence: Set(status_sequence),
                recorded_at: Set(now),
            };
            status_row.insert(&txn).await?;
            Some(StatusRecord {
                order_id,
                status: OrderStatus::ForDelivery.to_string(),
                sequence: status_sequence,
                recorded_at: now,
                rejection_recorded: false,
            })
        } else {
            None
        };

        txn.commit().await?;

        info!(order_id = %order_id, step = %step, sequence, "processing step recorded");

        if let Some(events) = &self.event_sender {
            let _ = events
                .send(Event::ProcessingStepRecorded {
                    order_id,
                    step: step.to_string(),
                })
                .await
                .map_err(|e| warn!(error = %e, "failed to send processing step event"));

            if status_record.is_some() {
                let _ = events
                    .send(Event::OrderStatusChanged {
                        order_id,
                        old_status: OrderStatus::Processing.to_string(),
                        new_status: OrderStatus::ForDelivery.to_string(),
                    })
                    .await
                    .map_err(|e| warn!(error = %e, "failed to send status changed event"));
            }
        }

        Ok(ProcessingRecord {
            order_id,
            step: step.to_string(),
            sequence,
            recorded_at: now,
            status_record,
        })
    }
}
