//! Deterministic indicator pre-screen
//!
//! Cheap heuristics that run before any LLM call. The pre-screen surfaces
//! preliminary indicators for the Risk Analyst prompt; it never makes the
//! final classification on its own.

use crate::models::{ActivityClassification, CaseData};
use crate::tools::{CTR_THRESHOLD, STRUCTURING_FLOOR, WIRE_THRESHOLD};
use std::collections::HashSet;

/// Jurisdictions that trigger enhanced wire scrutiny — static, zero allocation
const HIGH_RISK_JURISDICTIONS: &[&str] = &[
    "cayman", "switzerland", "hong kong", "singapore",
    "panama", "restricted country", "offshore",
];

/// Wires at or above this size count toward rapid-succession layering
const LARGE_WIRE_FLOOR: f64 = 100_000.0;

#[derive(Debug, Clone)]
pub struct ScreenResult {
    pub indicators: Vec<String>,
    pub preliminary: Option<ActivityClassification>,
}

impl ScreenResult {
    pub fn is_clean(&self) -> bool {
        self.indicators.is_empty()
    }
}

/// Rules-based pre-screen over a case
pub struct IndicatorScreen;

impl IndicatorScreen {
    pub fn screen(case: &CaseData) -> ScreenResult {
        let mut indicators = Vec::new();

        let structuring_hits = case
            .transactions
            .iter()
            .filter(|t| {
                is_cash_deposit(&t.transaction_type)
                    && (STRUCTURING_FLOOR..CTR_THRESHOLD).contains(&t.amount)
            })
            .count();

        if structuring_hits >= 2 {
            indicators.push("threshold avoidance".to_string());
            indicators.push("repeated cash deposits".to_string());
        }

        let locations: HashSet<&str> = case
            .transactions
            .iter()
            .filter_map(|t| t.location.as_deref())
            .collect();
        if structuring_hits >= 2 && locations.len() >= 2 {
            indicators.push("multiple locations".to_string());
        }

        let offshore_wires = case
            .transactions
            .iter()
            .filter(|t| {
                is_wire(&t.transaction_type)
                    && t.amount.abs() >= WIRE_THRESHOLD
                    && in_high_risk_jurisdiction(t.location.as_deref())
            })
            .count();
        if offshore_wires >= 1 {
            indicators.push("high-risk jurisdictions".to_string());
        }

        let large_wires = case
            .transactions
            .iter()
            .filter(|t| is_wire(&t.transaction_type) && t.amount.abs() >= LARGE_WIRE_FLOOR)
            .count();
        if large_wires >= 2 {
            indicators.push("large amounts".to_string());
            indicators.push("rapid succession".to_string());
        }

        if has_profile_inconsistency(case) {
            indicators.push("profile inconsistency".to_string());
        }

        let preliminary = if structuring_hits >= 2 {
            Some(ActivityClassification::Structuring)
        } else if offshore_wires >= 1 && large_wires >= 2 {
            Some(ActivityClassification::MoneyLaundering)
        } else if has_profile_inconsistency(case) {
            Some(ActivityClassification::Fraud)
        } else {
            None
        };

        ScreenResult {
            indicators,
            preliminary,
        }
    }
}

fn is_cash_deposit(transaction_type: &str) -> bool {
    transaction_type.eq_ignore_ascii_case("cash_deposit")
}

fn is_wire(transaction_type: &str) -> bool {
    transaction_type.eq_ignore_ascii_case("wire_transfer")
}

fn in_high_risk_jurisdiction(location: Option<&str>) -> bool {
    let Some(location) = location else {
        return false;
    };
    let location = location.to_lowercase();
    HIGH_RISK_JURISDICTIONS
        .iter()
        .any(|j| location.contains(j))
}

/// A single credit far above the account's running balance is out of
/// character for the holder
fn has_profile_inconsistency(case: &CaseData) -> bool {
    case.accounts.iter().any(|account| {
        account.average_monthly_balance > 0.0
            && case.transactions.iter().any(|t| {
                t.account_id == account.account_id
                    && t.amount.abs() >= account.average_monthly_balance * 3.0
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    #[test]
    fn test_structuring_case_flags_threshold_avoidance() {
        let scenario = scenarios::structuring_classic();
        let result = IndicatorScreen::screen(&scenario.case);

        assert!(result.indicators.iter().any(|i| i == "threshold avoidance"));
        assert!(result.indicators.iter().any(|i| i == "multiple locations"));
        assert_eq!(
            result.preliminary,
            Some(ActivityClassification::Structuring)
        );
    }

    #[test]
    fn test_layering_case_flags_jurisdictions() {
        let scenario = scenarios::money_laundering_complex();
        let result = IndicatorScreen::screen(&scenario.case);

        assert!(result
            .indicators
            .iter()
            .any(|i| i == "high-risk jurisdictions"));
        assert!(result.indicators.iter().any(|i| i == "rapid succession"));
        assert_eq!(
            result.preliminary,
            Some(ActivityClassification::MoneyLaundering)
        );
    }

    #[test]
    fn test_fraud_case_flags_profile_inconsistency() {
        let scenario = scenarios::fraud_identity();
        let result = IndicatorScreen::screen(&scenario.case);

        assert!(result
            .indicators
            .iter()
            .any(|i| i == "profile inconsistency"));
    }

    #[test]
    fn test_benign_case_is_clean() {
        let scenario = scenarios::benign_activity();
        let result = IndicatorScreen::screen(&scenario.case);

        assert!(result.is_clean());
        assert_eq!(result.preliminary, None);
    }
}
