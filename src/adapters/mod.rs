pub mod api_handler;
pub mod call_store;
pub mod file_storage;
pub mod health_handler;
pub mod product_catalog;
pub mod submission;
pub mod ui_handler;
