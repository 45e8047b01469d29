use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Breakdown of a trade value estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeValue {
    pub estimated_value: i64,
    pub age_multiplier: Decimal,
    pub position_multiplier: Decimal,
    pub contract_multiplier: Decimal,
}
