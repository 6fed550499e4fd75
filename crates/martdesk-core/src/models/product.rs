use serde::{Deserialize, Serialize};

/// A product's category as returned inside product rows. The API populates it
/// on listings but may send the bare id elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated {
        #[serde(rename = "_id", alias = "id", default)]
        id: Option<String>,
        name: String,
    },
    Id(String),
}

impl CategoryRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Populated { name, .. } => Some(name.as_str()),
            CategoryRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub status: Option<String>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    pub fn category_name(&self) -> &str {
        self.category.as_ref().and_then(|c| c.name()).unwrap_or("N/A")
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("ACTIVE")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inventory_row() {
        let json = r#"{"_id":"p1","name":"Whole Milk 1L","sku":"MLK-001","category":{"_id":"c1","name":"Dairy"},"price":1.49,"stock":4,"lowStockThreshold":10,"status":"ACTIVE"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category_name(), "Dairy");
        assert!(product.is_low_stock());
        assert!(product.is_active());
    }

    #[test]
    fn test_unpopulated_category() {
        let json = r#"{"_id":"p2","name":"Rice","category":"c9","stock":40,"lowStockThreshold":5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, Some(CategoryRef::Id("c9".to_string())));
        assert_eq!(product.category_name(), "N/A");
        assert!(!product.is_low_stock());
    }
}
