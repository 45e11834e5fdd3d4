pub mod calls;
pub mod feedback_form;
pub mod product_fields;
pub mod products;
pub mod toast;
