use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference_tables::Migration),
            Box::new(m20250301_000002_create_orders_table::Migration),
            Box::new(m20250301_000003_create_lifecycle_tables::Migration),
            Box::new(m20250301_000004_create_invoice_tables::Migration),
            Box::new(m20250301_000005_create_app_users_table::Migration),
            Box::new(m20250315_000006_add_history_indexes::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_reference_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_reference_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LaundryShops::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LaundryShops::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LaundryShops::Name).string().not_null())
                        .col(ColumnDef::new(LaundryShops::Address).string().null())
                        .col(ColumnDef::new(LaundryShops::Phone).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Phone).string().null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CustomerAddresses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CustomerAddresses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerAddresses::CustomerId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CustomerAddresses::Line1).string().not_null())
                        .col(ColumnDef::new(CustomerAddresses::City).string().not_null())
                        .col(
                            ColumnDef::new(CustomerAddresses::PostalCode)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ShopServices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShopServices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShopServices::ShopId).uuid().not_null())
                        .col(ColumnDef::new(ShopServices::Name).string().not_null())
                        .col(
                            ColumnDef::new(ShopServices::BasePrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(LaundryDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LaundryDetails::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LaundryDetails::WeightKg)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(LaundryDetails::Notes).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryOptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryOptions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryOptions::Kind).string().not_null())
                        .col(
                            ColumnDef::new(DeliveryOptions::Fee)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(LaundryDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ShopServices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CustomerAddresses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(LaundryShops::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum LaundryShops {
        Table,
        Id,
        Name,
        Address,
        Phone,
    }

    #[derive(DeriveIden)]
    pub enum Customers {
        Table,
        Id,
        Name,
        Phone,
        Email,
    }

    #[derive(DeriveIden)]
    pub enum CustomerAddresses {
        Table,
        Id,
        CustomerId,
        Line1,
        City,
        PostalCode,
    }

    #[derive(DeriveIden)]
    pub enum ShopServices {
        Table,
        Id,
        ShopId,
        Name,
        BasePrice,
    }

    #[derive(DeriveIden)]
    pub enum LaundryDetails {
        Table,
        Id,
        WeightKg,
        Notes,
    }

    #[derive(DeriveIden)]
    pub enum DeliveryOptions {
        Table,
        Id,
        Kind,
        Fee,
    }
}

mod m20250301_000002_create_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(Orders::ShopId).uuid().not_null())
                        .col(ColumnDef::new(Orders::ServiceId).uuid().not_null())
                        .col(ColumnDef::new(Orders::LaundryDetailId).uuid().not_null())
                        .col(ColumnDef::new(Orders::DeliveryId).uuid().not_null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_shop_created")
                        .table(Orders::Table)
                        .col(Orders::ShopId)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Id,
        CustomerId,
        ShopId,
        ServiceId,
        LaundryDetailId,
        DeliveryId,
        CreatedAt,
    }
}

mod m20250301_000003_create_lifecycle_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_lifecycle_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderStatus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderStatus::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderStatus::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderStatus::Status).string().not_null())
                        .col(ColumnDef::new(OrderStatus::Sequence).integer().not_null())
                        .col(
                            ColumnDef::new(OrderStatus::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One sequence number per order; makes "current status" deterministic
            // even when two rows share a timestamp.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_status_order_sequence")
                        .table(OrderStatus::Table)
                        .col(OrderStatus::OrderId)
                        .col(OrderStatus::Sequence)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderProcessing::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderProcessing::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderProcessing::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderProcessing::Step).string().not_null())
                        .col(
                            ColumnDef::new(OrderProcessing::Sequence)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderProcessing::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_processing_order_sequence")
                        .table(OrderProcessing::Table)
                        .col(OrderProcessing::OrderId)
                        .col(OrderProcessing::Sequence)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RejectedOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RejectedOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RejectedOrders::OrderId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(RejectedOrders::Reason).string().not_null())
                        .col(ColumnDef::new(RejectedOrders::Note).string().null())
                        .col(
                            ColumnDef::new(RejectedOrders::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RejectedOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderProcessing::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderStatus::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum OrderStatus {
        Table,
        Id,
        OrderId,
        Status,
        Sequence,
        RecordedAt,
    }

    #[derive(DeriveIden)]
    pub enum OrderProcessing {
        Table,
        Id,
        OrderId,
        Step,
        Sequence,
        RecordedAt,
    }

    #[derive(DeriveIden)]
    pub enum RejectedOrders {
        Table,
        Id,
        OrderId,
        Reason,
        Note,
        RecordedAt,
    }
}

mod m20250301_000004_create_invoice_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_invoice_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Invoices::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(Invoices::Amount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::IssuedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InvoiceStatus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceStatus::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceStatus::InvoiceId).uuid().not_null())
                        .col(ColumnDef::new(InvoiceStatus::Status).string().not_null())
                        .col(
                            ColumnDef::new(InvoiceStatus::Sequence)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceStatus::RecordedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoice_status_invoice_sequence")
                        .table(InvoiceStatus::Table)
                        .col(InvoiceStatus::InvoiceId)
                        .col(InvoiceStatus::Sequence)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceStatus::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Invoices {
        Table,
        Id,
        OrderId,
        Amount,
        IssuedAt,
    }

    #[derive(DeriveIden)]
    pub enum InvoiceStatus {
        Table,
        Id,
        InvoiceId,
        Status,
        Sequence,
        RecordedAt,
    }
}

mod m20250301_000005_create_app_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_app_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AppUsers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AppUsers::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(AppUsers::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(AppUsers::Password).string().not_null())
                        .col(ColumnDef::new(AppUsers::Role).string().not_null())
                        .col(ColumnDef::new(AppUsers::ShopId).uuid().null())
                        .col(ColumnDef::new(AppUsers::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AppUsers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum AppUsers {
        Table,
        Id,
        Email,
        Password,
        Role,
        ShopId,
        CreatedAt,
    }
}

mod m20250315_000006_add_history_indexes {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250315_000006_add_history_indexes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_status_recorded_at")
                        .table(OrderStatus::Table)
                        .col(OrderStatus::OrderId)
                        .col(OrderStatus::RecordedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_order")
                        .table(Invoices::Table)
                        .col(Invoices::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_index(
                    Index::drop()
                        .name("idx_order_status_recorded_at")
                        .table(OrderStatus::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_index(
                    Index::drop()
                        .name("idx_invoices_order")
                        .table(Invoices::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum OrderStatus {
        Table,
        OrderId,
        RecordedAt,
    }

    #[derive(DeriveIden)]
    pub enum Invoices {
        Table,
        OrderId,
    }
}
