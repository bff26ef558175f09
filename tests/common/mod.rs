use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;
use washline_api::{
    config::AppConfig,
    db,
    entities::{
        app_user, customer, customer_address, delivery_option, invoice, invoice_status,
        laundry_detail, laundry_shop, order, order_status, shop_service,
    },
    events::{self, EventSender},
    handlers::AppServices,
    models::OrderStatus,
    AppState,
};

/// Helper harness for spinning up an application state backed by a throwaway
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

/// Identifiers of a seeded order and its reference rows.
#[allow(dead_code)]
pub struct SeededOrder {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Uuid,
    pub service_id: Uuid,
    pub laundry_detail_id: Uuid,
    pub delivery_id: Uuid,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_file = std::env::temp_dir().join(format!("washline_test_{}.db", Uuid::new_v4()));

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_file.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", washline_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_shop(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        laundry_shop::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            address: Set(Some("12 Soap St".to_string())),
            phone: Set(Some("555-0134".to_string())),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed shop");
        id
    }

    #[allow(dead_code)]
    pub async fn seed_customer(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        customer::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            phone: Set(Some("555-0199".to_string())),
            email: Set(Some(format!(
                "{}@example.com",
                name.to_lowercase().replace(' ', ".")
            ))),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed customer");

        customer_address::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(id),
            line1: Set("7 Rinse Road".to_string()),
            city: Set("Sudsville".to_string()),
            postal_code: Set(Some("1100".to_string())),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed customer address");

        id
    }

    /// Seeds an order with its reference rows and the initial "Pending"
    /// status row every order carries after creation.
    #[allow(dead_code)]
    pub async fn seed_order(
        &self,
        shop_id: Uuid,
        customer_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> SeededOrder {
        let db = &*self.state.db;

        let service_id = Uuid::new_v4();
        shop_service::ActiveModel {
            id: Set(service_id),
            shop_id: Set(shop_id),
            name: Set("Wash & Fold".to_string()),
            base_price: Set(dec!(150.00)),
        }
        .insert(db)
        .await
        .expect("seed shop service");

        let laundry_detail_id = Uuid::new_v4();
        laundry_detail::ActiveModel {
            id: Set(laundry_detail_id),
            weight_kg: Set(dec!(5.0)),
            notes: Set(None),
        }
        .insert(db)
        .await
        .expect("seed laundry detail");

        let delivery_id = Uuid::new_v4();
        delivery_option::ActiveModel {
            id: Set(delivery_id),
            kind: Set("Courier".to_string()),
            fee: Set(dec!(49.00)),
        }
        .insert(db)
        .await
        .expect("seed delivery option");

        let order_id = Uuid::new_v4();
        order::ActiveModel {
            id: Set(order_id),
            customer_id: Set(customer_id),
            shop_id: Set(shop_id),
            service_id: Set(service_id),
            laundry_detail_id: Set(laundry_detail_id),
            delivery_id: Set(delivery_id),
            created_at: Set(created_at),
        }
        .insert(db)
        .await
        .expect("seed order");

        order_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            status: Set(OrderStatus::Pending.to_string()),
            sequence: Set(1),
            recorded_at: Set(created_at),
        }
        .insert(db)
        .await
        .expect("seed initial status");

        SeededOrder {
            order_id,
            customer_id,
            shop_id,
            service_id,
            laundry_detail_id,
            delivery_id,
        }
    }

    /// Seeds an invoice for an order with an "Unpaid" status row and, when
    /// `paid`, a later "Paid" row.
    #[allow(dead_code)]
    pub async fn seed_invoice(&self, order_id: Uuid, amount: Decimal, paid: bool) -> Uuid {
        let db = &*self.state.db;
        let now = Utc::now();

        let invoice_id = Uuid::new_v4();
        invoice::ActiveModel {
            id: Set(invoice_id),
            order_id: Set(order_id),
            amount: Set(amount),
            issued_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed invoice");

        invoice_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            status: Set("Unpaid".to_string()),
            sequence: Set(1),
            recorded_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed invoice status");

        if paid {
            invoice_status::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                status: Set("Paid".to_string()),
                sequence: Set(2),
                recorded_at: Set(now),
            }
            .insert(db)
            .await
            .expect("seed paid invoice status");
        }

        invoice_id
    }

    #[allow(dead_code)]
    pub async fn seed_staff_user(&self, email: &str, password: &str, shop_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        app_user::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            password: Set(password.to_string()),
            role: Set("staff".to_string()),
            shop_id: Set(Some(shop_id)),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed staff user");
        id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Reads a response body into JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
