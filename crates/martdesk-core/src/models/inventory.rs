use serde::{Deserialize, Serialize};

/// Why stock was adjusted by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentReason {
    Restock,
    #[default]
    ManualCorrection,
    Damaged,
    Expired,
    Returned,
    Theft,
}

impl AdjustmentReason {
    pub const ALL: [AdjustmentReason; 6] = [
        AdjustmentReason::Restock,
        AdjustmentReason::ManualCorrection,
        AdjustmentReason::Damaged,
        AdjustmentReason::Expired,
        AdjustmentReason::Returned,
        AdjustmentReason::Theft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Restock => "RESTOCK",
            AdjustmentReason::ManualCorrection => "MANUAL_CORRECTION",
            AdjustmentReason::Damaged => "DAMAGED",
            AdjustmentReason::Expired => "EXPIRED",
            AdjustmentReason::Returned => "RETURNED",
            AdjustmentReason::Theft => "THEFT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdjustmentReason::Restock => "Restock",
            AdjustmentReason::ManualCorrection => "Manual Correction",
            AdjustmentReason::Damaged => "Damaged",
            AdjustmentReason::Expired => "Expired",
            AdjustmentReason::Returned => "Customer Return",
            AdjustmentReason::Theft => "Theft / Loss",
        }
    }
}

impl std::str::FromStr for AdjustmentReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        AdjustmentReason::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| format!("unknown adjustment reason '{}'", s))
    }
}

/// Body of `POST /inventory/adjust`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub product_id: String,
    pub adjustment: f64,
    pub reason: AdjustmentReason,
    pub notes: String,
}

impl StockAdjustment {
    /// Signed amount for messages, e.g. `+5` or `-2`
    pub fn signed_amount(&self) -> String {
        if self.adjustment > 0.0 {
            format!("+{}", self.adjustment)
        } else {
            format!("{}", self.adjustment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_body() {
        let adj = StockAdjustment {
            product_id: "p1".to_string(),
            adjustment: 12.0,
            reason: AdjustmentReason::default(),
            notes: String::new(),
        };
        let json = serde_json::to_value(&adj).unwrap();
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["reason"], "MANUAL_CORRECTION");
        assert_eq!(adj.signed_amount(), "+12");
    }

    #[test]
    fn test_reason_from_str() {
        assert_eq!("restock".parse::<AdjustmentReason>().unwrap(), AdjustmentReason::Restock);
        assert_eq!("manual correction".parse::<AdjustmentReason>().unwrap(), AdjustmentReason::ManualCorrection);
        assert!("gift".parse::<AdjustmentReason>().is_err());
    }
}
