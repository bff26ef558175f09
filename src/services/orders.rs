use crate::{
    db::DbPool,
    entities::{
        customer, customer_address, delivery_option, laundry_detail, order, order_processing,
        order_status, rejected_order, shop_service,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Listing order for the order list endpoint; the caller picks the
/// direction, newest-first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Rejection reason and optional free-text note attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RejectionDetail {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One row of the order listing: the order joined with its customer name,
/// current status and, when present, the latest processing step and the
/// rejection detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Uuid,
    pub service_id: Uuid,
    pub laundry_detail_id: Uuid,
    pub delivery_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub status: String,
    pub status_updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressView {
    pub line1: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Denormalized single-order view backing the order detail screen.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<AddressView>,
    pub service_name: String,
    pub service_price: Decimal,
    pub weight_kg: Decimal,
    pub delivery_kind: String,
    pub delivery_fee: Decimal,
    pub status: String,
    pub status_updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeightAmendment {
    pub order_id: Uuid,
    pub weight_kg: Decimal,
}

/// Read side of the order domain plus the one destructive write (weight
/// amendment). Lifecycle writes live in [`crate::services::order_status`].
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists orders, optionally restricted to one shop, joined with customer
    /// name, current status, latest processing step and rejection detail.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        shop_id: Option<Uuid>,
        sort: SortDirection,
    ) -> Result<Vec<OrderSummary>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = order::Entity::find();
        if let Some(shop) = shop_id {
            query = query.filter(order::Column::ShopId.eq(shop));
        }
        let query = match sort {
            SortDirection::Asc => query.order_by_asc(order::Column::CreatedAt),
            SortDirection::Desc => query.order_by_desc(order::Column::CreatedAt),
        };

        let orders = query.all(db).await?;
        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

        let customer_names: HashMap<Uuid, String> = customer::Entity::find()
            .filter(customer::Column::Id.is_in(orders.iter().map(|o| o.customer_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let current_status = latest_status_by_order(db, &order_ids).await?;
        let latest_step = latest_processing_by_order(db, &order_ids).await?;

        let rejections: HashMap<Uuid, rejected_order::Model> = rejected_order::Entity::find()
            .filter(rejected_order::Column::OrderId.is_in(order_ids.iter().copied()))
            .all(db)
            .await?
            .into_iter()
            .map(|r| (r.order_id, r))
            .collect();

        let mut summaries = Vec::with_capacity(orders.len());
        for order in orders {
            // Every order is supposed to carry at least one status row; a row
            // without one would also be dropped by the inner join this listing
            // replaces, so skip it rather than invent a status.
            let Some(status_row) = current_status.get(&order.id) else {
                warn!(order_id = %order.id, "order has no status history; omitted from listing");
                continue;
            };

            let customer_name = customer_names
                .get(&order.customer_id)
                .cloned()
                .unwrap_or_default();

            summaries.push(OrderSummary {
                order_id: order.id,
                customer_id: order.customer_id,
                shop_id: order.shop_id,
                service_id: order.service_id,
                laundry_detail_id: order.laundry_detail_id,
                delivery_id: order.delivery_id,
                created_at: order.created_at,
                customer_name,
                status: status_row.status.clone(),
                status_updated_at: status_row.recorded_at,
                processing_step: latest_step.get(&order.id).map(|p| p.step.clone()),
                rejection: rejections.get(&order.id).map(|r| RejectionDetail {
                    reason: r.reason.clone(),
                    note: r.note.clone(),
                }),
            });
        }

        info!(
            count = summaries.len(),
            shop_id = ?shop_id,
            "orders listed"
        );

        Ok(summaries)
    }

    /// Fetches the denormalized detail view for one order.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_detail(&self, order_id: Uuid) -> Result<OrderDetail, ServiceError> {
        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let customer = customer::Entity::find_by_id(order.customer_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "order {} references missing customer {}",
                    order_id, order.customer_id
                ))
            })?;

        let address = customer_address::Entity::find()
            .filter(customer_address::Column::CustomerId.eq(customer.id))
            .one(db)
            .await?;

        let service = shop_service::Entity::find_by_id(order.service_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "order {} references missing service {}",
                    order_id, order.service_id
                ))
            })?;

        let detail = laundry_detail::Entity::find_by_id(order.laundry_detail_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "order {} references missing laundry detail {}",
                    order_id, order.laundry_detail_id
                ))
            })?;

        let delivery = delivery_option::Entity::find_by_id(order.delivery_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "order {} references missing delivery option {}",
                    order_id, order.delivery_id
                ))
            })?;

        let status_row = current_status_row(db, order_id)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("order {} has no status history", order_id))
            })?;

        let rejection = rejected_order::Entity::find()
            .filter(rejected_order::Column::OrderId.eq(order_id))
            .one(db)
            .await?
            .map(|r| RejectionDetail {
                reason: r.reason,
                note: r.note,
            });

        Ok(OrderDetail {
            order_id: order.id,
            created_at: order.created_at,
            customer_name: customer.name,
            customer_phone: customer.phone,
            customer_email: customer.email,
            customer_address: address.map(|a| AddressView {
                line1: a.line1,
                city: a.city,
                postal_code: a.postal_code,
            }),
            service_name: service.name,
            service_price: service.base_price,
            weight_kg: detail.weight_kg,
            delivery_kind: delivery.kind,
            delivery_fee: delivery.fee,
            status: status_row.status,
            status_updated_at: status_row.recorded_at,
            rejection,
        })
    }

    /// Overwrites the weight on the order's laundry detail. Destructive:
    /// no history of previous weights is kept.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn amend_weight(
        &self,
        order_id: Uuid,
        weight_kg: Decimal,
    ) -> Result<WeightAmendment, ServiceError> {
        if weight_kg <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "weight_kg must be greater than zero".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let detail = laundry_detail::Entity::find_by_id(order.laundry_detail_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Laundry detail for order {} not found", order_id))
            })?;

        let mut active: laundry_detail::ActiveModel = detail.into();
        active.weight_kg = Set(weight_kg);
        active.update(db).await?;

        info!(order_id = %order_id, weight_kg = %weight_kg, "order weight amended");

        if let Some(events) = &self.event_sender {
            if let Err(e) = events
                .send(Event::WeightAmended {
                    order_id,
                    weight_kg,
                })
                .await
            {
                warn!(error = %e, order_id = %order_id, "failed to send weight amended event");
            }
        }

        Ok(WeightAmendment {
            order_id,
            weight_kg,
        })
    }
}

/// Loads the current (highest-sequence) status row for one order.
pub(crate) async fn current_status_row<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<Option<order_status::Model>, ServiceError> {
    Ok(order_status::Entity::find()
        .filter(order_status::Column::OrderId.eq(order_id))
        .order_by_desc(order_status::Column::Sequence)
        .one(conn)
        .await?)
}

/// Current status row per order, for a batch of orders. The fold keeps the
/// highest sequence so same-instant timestamps cannot produce an ambiguous
/// winner.
async fn latest_status_by_order<C: ConnectionTrait>(
    conn: &C,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, order_status::Model>, ServiceError> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = order_status::Entity::find()
        .filter(order_status::Column::OrderId.is_in(order_ids.iter().copied()))
        .all(conn)
        .await?;

    let mut latest: HashMap<Uuid, order_status::Model> = HashMap::new();
    for row in rows {
        match latest.entry(row.order_id) {
            Entry::Occupied(mut slot) => {
                if row.sequence > slot.get().sequence {
                    slot.insert(row);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }
    Ok(latest)
}

/// Latest processing row per order, same shape as [`latest_status_by_order`].
async fn latest_processing_by_order<C: ConnectionTrait>(
    conn: &C,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, order_processing::Model>, ServiceError> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = order_processing::Entity::find()
        .filter(order_processing::Column::OrderId.is_in(order_ids.iter().copied()))
        .all(conn)
        .await?;

    let mut latest: HashMap<Uuid, order_processing::Model> = HashMap::new();
    for row in rows {
        match latest.entry(row.order_id) {
            Entry::Occupied(mut slot) => {
                if row.sequence > slot.get().sequence {
                    slot.insert(row);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }
    Ok(latest)
}
