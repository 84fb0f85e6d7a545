//! JSON envelopes used by the catalogue REST API.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, ProductRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListing {
    pub listcat: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListing {
    pub ldto: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEnvelope {
    #[serde(rename = "productDto")]
    pub product: ProductRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductDraft;

    #[test]
    fn test_product_envelope_field_names() {
        let body = r#"{"productDto":{"id":77,"name":"Widget","description":"","currentprice":9.99,
            "promotion":false,"selected":false,"available":true,"photoName":null,"idCat":3}}"#;
        let envelope: ProductEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.product.id, 77);
        assert_eq!(envelope.product.category_id, 3);
        assert_eq!(envelope.product.current_price, 9.99);
    }

    #[test]
    fn test_listing_tolerates_missing_optional_fields() {
        let body = r#"{"listcat":[{"id":2,"name":"Lamps","products":[{"id":5,"name":"Desk lamp","idCat":2}]},
            {"id":3,"name":"Tools"}]}"#;
        let listing: CategoryListing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.listcat.len(), 2);
        assert_eq!(listing.listcat[0].products[0].name, "Desk lamp");
        assert!(listing.listcat[1].products.is_empty());
    }

    #[test]
    fn test_new_draft_serialises_without_id() {
        let draft = ProductDraft {
            id: None,
            name: "Widget".into(),
            description: String::new(),
            current_price: 9.99,
            promotion: false,
            selected: false,
            available: true,
            photo_name: None,
            category_id: 3,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["idCat"], 3);
        assert_eq!(json["currentprice"], 9.99);
    }
}
