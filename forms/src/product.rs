//! Product availability

use serde::{Deserialize, Serialize};

/// Whether agents can log new calls for a product
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Disabled,
}

impl ProductStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(ProductStatus::Disabled).unwrap(), "disabled");
        let status: ProductStatus = serde_json::from_str("\"active\"").unwrap();
        assert!(status.is_active());
        assert!(serde_json::from_str::<ProductStatus>("\"archived\"").is_err());
    }
}
