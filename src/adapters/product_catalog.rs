use async_trait::async_trait;
use dialdesk_forms::FieldDescriptor;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Settings;
use crate::domain::{Product, ProductPort};

/// Products as configured, editable at runtime; edits are not written back to disk
pub struct ProductCatalog {
    settings: Arc<RwLock<Settings>>,
}

impl ProductCatalog {
    pub fn new(settings: Arc<RwLock<Settings>>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ProductPort for ProductCatalog {
    async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let settings = self.settings.read().await;
        Ok(settings.products.clone())
    }

    async fn get_product(&self, id: &str) -> anyhow::Result<Option<Product>> {
        let settings = self.settings.read().await;
        Ok(settings.product(id).cloned())
    }

    async fn update_feedback_fields(
        &self,
        id: &str,
        fields: Vec<FieldDescriptor>,
    ) -> anyhow::Result<Option<Product>> {
        let mut settings = self.settings.write().await;
        Ok(settings.product_mut(id).map(|product| {
            product.feedback_fields = fields;
            product.clone()
        }))
    }
}
