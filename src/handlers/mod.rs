pub mod orders;
pub mod reports;
pub mod users;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    order_status::OrderStatusService, orders::OrderService, reports::ReportService,
    users::UserService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub lifecycle: Arc<OrderStatusService>,
    pub reports: Arc<ReportService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let orders = Arc::new(OrderService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let lifecycle = Arc::new(OrderStatusService::new(
            db_pool.clone(),
            Some(event_sender),
        ));
        let reports = Arc::new(ReportService::new(db_pool.clone()));
        let users = Arc::new(UserService::new(db_pool));

        Self {
            orders,
            lifecycle,
            reports,
            users,
        }
    }
}
