use crate::{
    db::DbPool,
    entities::{customer, invoice, invoice_status, laundry_shop, order},
    errors::ServiceError,
    models::OrderStatus,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Invoice status label that counts towards revenue.
const INVOICE_PAID: &str = "Paid";

/// Coarse date-range selector for the dashboard. Windows are closed at the
/// current instant and open at a calendar boundary in UTC; weeks start on
/// Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ReportRange {
    Today,
    ThisWeek,
    ThisMonth,
}

impl ReportRange {
    /// Resolves the selector into a concrete `[start, now]` window.
    pub fn window(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let start_date = match self {
            ReportRange::Today => today,
            ReportRange::ThisWeek => {
                today - Duration::days(today.weekday().num_days_from_monday() as i64)
            }
            ReportRange::ThisMonth => today.with_day(1).expect("day 1 exists in every month"),
        };
        let start = start_date
            .and_hms_opt(0, 0, 0)
            .expect("midnight exists on every date")
            .and_utc();
        (start, now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeekdayRevenue {
    pub weekday: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentOrder {
    pub order_id: Uuid,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Dashboard aggregation for one shop and range. Recomputed from the
/// filtered set on every call; nothing is cached.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopSummaryReport {
    pub shop_id: Uuid,
    pub range: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_orders: u64,
    pub completed_orders: u64,
    pub pending_orders: u64,
    pub total_revenue: Decimal,
    pub revenue_by_weekday: Vec<WeekdayRevenue>,
    pub recent_orders: Vec<RecentOrder>,
}

const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const RECENT_ORDER_LIMIT: usize = 10;

#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Builds the dashboard summary for one shop over the selected range:
    /// order counts, paid-invoice revenue, a Monday-to-Sunday revenue series
    /// and the most recent orders with customer name and invoice amount.
    #[instrument(skip(self), fields(shop_id = %shop_id, range = %range))]
    pub async fn shop_summary(
        &self,
        shop_id: Uuid,
        range: ReportRange,
    ) -> Result<ShopSummaryReport, ServiceError> {
        let db = &*self.db_pool;

        laundry_shop::Entity::find_by_id(shop_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shop {} not found", shop_id)))?;

        let (window_start, window_end) = range.window(Utc::now());

        let orders = order::Entity::find()
            .filter(order::Column::ShopId.eq(shop_id))
            .filter(order::Column::CreatedAt.gte(window_start))
            .filter(order::Column::CreatedAt.lte(window_end))
            .order_by_desc(order::Column::CreatedAt)
            .all(db)
            .await?;

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

        let current_status = current_status_labels(db, &order_ids).await?;
        let completed_label = OrderStatus::Completed.to_string();
        let pending_label = OrderStatus::Pending.to_string();
        let completed_orders = current_status
            .values()
            .filter(|s| **s == completed_label)
            .count() as u64;
        let pending_orders = current_status
            .values()
            .filter(|s| **s == pending_label)
            .count() as u64;

        let (paid_amount_by_order, amount_by_order) = invoice_amounts(db, &order_ids).await?;

        let created_at_by_order: HashMap<Uuid, DateTime<Utc>> =
            orders.iter().map(|o| (o.id, o.created_at)).collect();

        let mut total_revenue = Decimal::ZERO;
        let mut weekday_buckets = [Decimal::ZERO; 7];
        for (order_id, amount) in &paid_amount_by_order {
            total_revenue += *amount;
            if let Some(created_at) = created_at_by_order.get(order_id) {
                let slot = created_at.date_naive().weekday().num_days_from_monday() as usize;
                weekday_buckets[slot] += *amount;
            }
        }

        let revenue_by_weekday = WEEKDAY_LABELS
            .iter()
            .zip(weekday_buckets)
            .map(|(label, revenue)| WeekdayRevenue {
                weekday: (*label).to_string(),
                revenue,
            })
            .collect();

        let customer_names: HashMap<Uuid, String> = customer::Entity::find()
            .filter(customer::Column::Id.is_in(orders.iter().map(|o| o.customer_id)))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let recent_orders = orders
            .iter()
            .take(RECENT_ORDER_LIMIT)
            .map(|o| RecentOrder {
                order_id: o.id,
                customer_name: customer_names
                    .get(&o.customer_id)
                    .cloned()
                    .unwrap_or_default(),
                amount: amount_by_order.get(&o.id).copied(),
                created_at: o.created_at,
            })
            .collect();

        info!(
            total_orders = orders.len(),
            completed_orders,
            pending_orders,
            revenue = %total_revenue,
            "shop summary computed"
        );

        Ok(ShopSummaryReport {
            shop_id,
            range: range.to_string(),
            window_start,
            window_end,
            total_orders: orders.len() as u64,
            completed_orders,
            pending_orders,
            total_revenue,
            revenue_by_weekday,
            recent_orders,
        })
    }
}

/// Current status label per order for a batch of orders.
async fn current_status_labels(
    db: &DbPool,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, String>, ServiceError> {
    use crate::entities::order_status;

    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = order_status::Entity::find()
        .filter(order_status::Column::OrderId.is_in(order_ids.iter().copied()))
        .all(db)
        .await?;

    let mut latest: HashMap<Uuid, (i32, String)> = HashMap::new();
    for row in rows {
        match latest.entry(row.order_id) {
            Entry::Occupied(mut slot) => {
                if row.sequence > slot.get().0 {
                    slot.insert((row.sequence, row.status));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert((row.sequence, row.status));
            }
        }
    }
    Ok(latest
        .into_iter()
        .map(|(order_id, (_, status))| (order_id, status))
        .collect())
}

/// Resolves invoice amounts for a batch of orders.
///
/// Returns `(paid, all)`: amounts of invoices whose latest status row is
/// "Paid", and amounts of every invoice (latest issued wins when an order
/// carries more than one).
async fn invoice_amounts(
    db: &DbPool,
    order_ids: &[Uuid],
) -> Result<(HashMap<Uuid, Decimal>, HashMap<Uuid, Decimal>), ServiceError> {
    if order_ids.is_empty() {
        return Ok((HashMap::new(), HashMap::new()));
    }

    let invoices = invoice::Entity::find()
        .filter(invoice::Column::OrderId.is_in(order_ids.iter().copied()))
        .order_by_asc(invoice::Column::IssuedAt)
        .all(db)
        .await?;

    let invoice_ids: Vec<Uuid> = invoices.iter().map(|i| i.id).collect();
    let status_rows = invoice_status::Entity::find()
        .filter(invoice_status::Column::InvoiceId.is_in(invoice_ids.iter().copied()))
        .all(db)
        .await?;

    let mut latest: HashMap<Uuid, (i32, String)> = HashMap::new();
    for row in status_rows {
        match latest.entry(row.invoice_id) {
            Entry::Occupied(mut slot) => {
                if row.sequence > slot.get().0 {
                    slot.insert((row.sequence, row.status));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert((row.sequence, row.status));
            }
        }
    }

    let mut paid_by_order = HashMap::new();
    let mut amount_by_order = HashMap::new();
    for inv in invoices {
        // Ascending issued_at order means later invoices overwrite earlier
        // ones, so each order resolves to its most recent invoice.
        amount_by_order.insert(inv.order_id, inv.amount);
        let is_paid = latest
            .get(&inv.id)
            .map(|(_, status)| status == INVOICE_PAID)
            .unwrap_or(false);
        if is_paid {
            paid_by_order.insert(inv.order_id, inv.amount);
        } else {
            paid_by_order.remove(&inv.order_id);
        }
    }

    Ok((paid_by_order, amount_by_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::str::FromStr;

    fn wednesday_afternoon() -> DateTime<Utc> {
        // 2025-08-06 is a Wednesday.
        Utc.with_ymd_and_hms(2025, 8, 6, 15, 30, 0).unwrap()
    }

    #[test]
    fn today_window_starts_at_midnight() {
        let now = wednesday_afternoon();
        let (start, end) = ReportRange::Today.window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 6, 0, 0, 0).unwrap());
        assert_eq!(end, now);
    }

    #[test]
    fn week_window_starts_on_monday() {
        let now = wednesday_afternoon();
        let (start, _) = ReportRange::ThisWeek.window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_window_on_a_monday_is_that_monday() {
        let monday = Utc.with_ymd_and_hms(2025, 8, 4, 8, 0, 0).unwrap();
        let (start, _) = ReportRange::ThisWeek.window(monday);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_window_starts_on_the_first() {
        let now = wednesday_afternoon();
        let (start, _) = ReportRange::ThisMonth.window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap());
    }

    #[rstest]
    #[case("today", ReportRange::Today)]
    #[case("this_week", ReportRange::ThisWeek)]
    #[case("this_month", ReportRange::ThisMonth)]
    fn range_labels_parse(#[case] label: &str, #[case] expected: ReportRange) {
        assert_eq!(ReportRange::from_str(label), Ok(expected));
    }

    #[test]
    fn unknown_range_label_is_rejected() {
        assert!(ReportRange::from_str("this_year").is_err());
    }
}
