use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub total_orders: i64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub is_blocked: bool,
}

impl Customer {
    pub fn status_label(&self) -> &'static str {
        if self.is_blocked {
            "Blocked"
        } else {
            "Active"
        }
    }
}
