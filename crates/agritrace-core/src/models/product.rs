use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Product lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
    Inactive,
}

/// Unit of measure for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductUnit {
    Kg,
    Ton,
    Units,
    Liters,
    Bunches,
}

/// A traceable agricultural product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    /// Backend-generated unique code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Container-relative storage path of the product icon,
    /// e.g. `products/1731234567-abc123.png`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display color in hex notation, e.g. `#218358`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub unit: ProductUnit,
    /// Free-form JSON metadata, serialized by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 200, message = "Name must be between 3 and 200 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request body for a partial product update. Unset fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200, message = "Name must be between 3 and 200 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    /// Container-relative storage path of an uploaded icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_product_validates_name_length() {
        let dto = CreateProduct {
            name: "ab".to_string(),
            description: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateProduct {
            name: "Organic coffee".to_string(),
            description: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn product_status_wire_format() {
        let json = serde_json::to_string(&ProductStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
        let json = serde_json::to_string(&ProductUnit::Kg).unwrap();
        assert_eq!(json, "\"kg\"");
    }

    #[test]
    fn update_product_skips_unset_fields() {
        let dto = UpdateProduct {
            status: Some(ProductStatus::Inactive),
            ..Default::default()
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(json, "{\"status\":\"INACTIVE\"}");
    }
}
