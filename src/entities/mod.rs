pub mod app_user;
pub mod customer;
pub mod customer_address;
pub mod delivery_option;
pub mod invoice;
pub mod invoice_status;
pub mod laundry_detail;
pub mod laundry_shop;
pub mod order;
pub mod order_processing;
pub mod order_status;
pub mod rejected_order;
pub mod shop_service;
