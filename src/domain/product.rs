use serde::{Deserialize, Serialize};

pub type ProductId = u64;
pub type CategoryId = u64;

/// A persisted catalogue product, as the catalogue service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "currentprice", default)]
    pub current_price: f64,
    #[serde(default)]
    pub promotion: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(rename = "photoName", default)]
    pub photo_name: Option<String>,
    #[serde(rename = "idCat")]
    pub category_id: CategoryId,
}

// Products are on sale unless the catalogue says otherwise.
fn default_available() -> bool {
    true
}

impl ProductRecord {
    pub fn new(id: ProductId, name: impl Into<String>, current_price: f64, category_id: CategoryId) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            current_price,
            promotion: false,
            selected: false,
            available: true,
            photo_name: None,
            category_id,
        }
    }
}

/// Validated form value sent to `create` or `update`.
///
/// `id` is `None` for a product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    #[serde(rename = "currentprice")]
    pub current_price: f64,
    pub promotion: bool,
    pub selected: bool,
    pub available: bool,
    #[serde(rename = "photoName", skip_serializing_if = "Option::is_none", default)]
    pub photo_name: Option<String>,
    #[serde(rename = "idCat")]
    pub category_id: CategoryId,
}

impl ProductDraft {
    /// Builds the persisted record once the catalogue has assigned an id.
    pub fn into_record(self, id: ProductId) -> ProductRecord {
        ProductRecord {
            id,
            name: self.name,
            description: self.description,
            current_price: self.current_price,
            promotion: self.promotion,
            selected: self.selected,
            available: self.available,
            photo_name: self.photo_name,
            category_id: self.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_uses_constructor_defaults() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id":4,"name":"Vice","currentprice":40.0,"idCat":3}"#).unwrap();
        assert_eq!(record, ProductRecord::new(4, "Vice", 40.0, 3));
        assert!(record.available);
    }

    #[test]
    fn test_explicit_unavailable_is_kept() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id":4,"name":"Vice","available":false,"idCat":3}"#).unwrap();
        assert!(!record.available);
    }
}
