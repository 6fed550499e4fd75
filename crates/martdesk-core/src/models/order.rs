use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    pub status: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("N/A")
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("PAID")
    }
}

/// Display label for an order status; unknown statuses render as-is.
pub fn order_status_label(status: &str) -> &str {
    match status {
        "PENDING" => "Pending",
        "CONFIRMED" => "Confirmed",
        "PROCESSING" => "Processing",
        "READY" => "Ready for Pickup",
        "SHIPPED" => "Out for Delivery",
        "DELIVERED" => "Delivered",
        "CANCELLED" => "Cancelled",
        "REFUNDED" => "Refunded",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_without_customer() {
        let json = r#"{"_id":"o1","orderNumber":"ORD-1001","items":[{"quantity":2,"price":3.5}],"total":7.0,"status":"ON_HOLD","paymentStatus":"PENDING","createdAt":"2024-03-01T10:00:00Z"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.customer_name(), "N/A");
        assert_eq!(order.items.len(), 1);
        assert!(!order.is_paid());
        assert_eq!(order_status_label(&order.status), "ON_HOLD");
        assert_eq!(order_status_label("DELIVERED"), "Delivered");
    }
}
