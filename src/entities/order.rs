use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An order row is immutable after creation; only the referenced laundry
/// detail's weight may be amended.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Uuid,
    pub service_id: Uuid,
    pub laundry_detail_id: Uuid,
    pub delivery_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::laundry_shop::Entity",
        from = "Column::ShopId",
        to = "super::laundry_shop::Column::Id"
    )]
    Shop,
    #[sea_orm(
        belongs_to = "super::shop_service::Entity",
        from = "Column::ServiceId",
        to = "super::shop_service::Column::Id"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::laundry_detail::Entity",
        from = "Column::LaundryDetailId",
        to = "super::laundry_detail::Column::Id"
    )]
    LaundryDetail,
    #[sea_orm(
        belongs_to = "super::delivery_option::Entity",
        from = "Column::DeliveryId",
        to = "super::delivery_option::Column::Id"
    )]
    DeliveryOption,
    #[sea_orm(has_many = "super::order_status::Entity")]
    StatusHistory,
    #[sea_orm(has_many = "super::order_processing::Entity")]
    ProcessingTrail,
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::laundry_shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl Related<super::order_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl Related<super::order_processing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessingTrail.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
