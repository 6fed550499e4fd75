use serde::{Deserialize, Serialize};

/// Bucket size for `GET /analytics/sales`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesGrouping {
    #[default]
    Day,
    Week,
    Month,
}

impl SalesGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesGrouping::Day => "day",
            SalesGrouping::Week => "week",
            SalesGrouping::Month => "month",
        }
    }
}

impl std::str::FromStr for SalesGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(SalesGrouping::Day),
            "week" => Ok(SalesGrouping::Week),
            "month" => Ok(SalesGrouping::Month),
            other => Err(format!("unknown grouping '{}' (expected day, week or month)", other)),
        }
    }
}

/// Aggregation key of a sales bucket (the API's `_id`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPeriod {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    #[serde(rename = "_id", default)]
    pub period: SalesPeriod,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub order_count: i64,
}

impl SalesPoint {
    /// Short axis label: `month/day` for daily buckets, else the coarser key.
    pub fn label(&self) -> String {
        match (self.period.month, self.period.day, self.period.week) {
            (Some(m), Some(d), _) => format!("{}/{}", m, d),
            (_, _, Some(w)) => format!("W{}", w),
            (Some(m), None, None) => match self.period.year {
                Some(y) => format!("{}/{}", m, y),
                None => m.to_string(),
            },
            _ => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub total_revenue: f64,
}

impl TopProduct {
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("Unknown product")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub total_revenue: f64,
}

/// Everything the analytics page shows, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsOverview {
    pub sales: Vec<SalesPoint>,
    pub top_products: Vec<TopProduct>,
    pub category_sales: Vec<CategorySales>,
}

impl AnalyticsOverview {
    pub fn total_revenue(&self) -> f64 {
        self.sales.iter().map(|p| p.total_revenue).sum()
    }

    pub fn total_orders(&self) -> i64 {
        self.sales.iter().map(|p| p.order_count).sum()
    }
}
