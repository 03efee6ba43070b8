//! Tool trait and registry
//!
//! Investigation tools are deterministic, side-effect-free lookups over
//! simulated data. Each tool declares its own typed parameter record and
//! decodes the raw parameter map before doing any work, so a parameter-shape
//! mismatch surfaces as a normal tool failure instead of a panic.

use crate::error::PipelineError;
use crate::Result;
use lazy_static::lazy_static;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Currency Transaction Report threshold
pub const CTR_THRESHOLD: f64 = 10_000.0;
/// Suspicious Activity Report threshold (if activity is suspicious)
pub const SAR_THRESHOLD: f64 = 5_000.0;
/// Enhanced monitoring threshold for wire transfers
pub const WIRE_THRESHOLD: f64 = 3_000.0;
/// Lower bound of the structuring detection band
pub const STRUCTURING_FLOOR: f64 = 8_000.0;

/// Trait for a single investigation tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn execute(&self, parameters: &Value) -> Result<Value>;
}

/// Tool registry for looking up tools by name.
///
/// Built once at startup and handed to the dispatcher; there is no
/// registration after construction.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_parameters<'de, T: Deserialize<'de>>(parameters: &'de Value) -> Result<T> {
    T::deserialize(parameters)
        .map_err(|e| PipelineError::InvalidToolInput(e.to_string()))
}

//
// ================= Transaction History =================
//

fn default_period_days() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
struct TransactionHistoryParams {
    account_id: String,
    #[serde(default = "default_period_days")]
    days: u32,
}

/// Retrieve transaction history for an account (simulated data).
///
/// The transaction pattern is keyed by substring match on the account id:
/// "high_risk" accounts show sub-threshold cash deposit runs, "business"
/// accounts show offsetting international wires, everything else looks like
/// ordinary retail activity.
pub struct TransactionHistoryTool;

#[async_trait::async_trait]
impl Tool for TransactionHistoryTool {
    fn name(&self) -> &'static str {
        "get_transaction_history"
    }

    fn description(&self) -> &'static str {
        "Retrieve recent transaction history for an account"
    }

    async fn execute(&self, parameters: &Value) -> Result<Value> {
        let params: TransactionHistoryParams = decode_parameters(parameters)?;
        let account = params.account_id.to_lowercase();

        let transactions = if account.contains("high_risk") {
            json!([
                {"date": "2025-09-15", "amount": 9800, "type": "cash_deposit", "location": "Branch_A"},
                {"date": "2025-09-14", "amount": 9750, "type": "cash_deposit", "location": "Branch_B"},
                {"date": "2025-09-13", "amount": 9900, "type": "cash_deposit", "location": "Branch_C"},
                {"date": "2025-09-12", "amount": 9850, "type": "cash_deposit", "location": "Branch_A"},
                {"date": "2025-09-11", "amount": 9600, "type": "cash_deposit", "location": "Branch_D"},
            ])
        } else if account.contains("business") {
            json!([
                {"date": "2025-09-15", "amount": 250000, "type": "wire_transfer", "location": "Singapore_Bank"},
                {"date": "2025-09-15", "amount": -240000, "type": "wire_transfer", "location": "Internal_Transfer"},
                {"date": "2025-09-10", "amount": 275000, "type": "wire_transfer", "location": "Singapore_Bank"},
                {"date": "2025-09-10", "amount": -260000, "type": "wire_transfer", "location": "Internal_Transfer"},
            ])
        } else {
            json!([
                {"date": "2025-09-15", "amount": 2500, "type": "payroll_deposit", "location": "ACH"},
                {"date": "2025-09-12", "amount": -1200, "type": "rent_payment", "location": "Online"},
                {"date": "2025-09-10", "amount": -350, "type": "grocery", "location": "POS"},
            ])
        };

        let count = transactions.as_array().map(|a| a.len()).unwrap_or(0);

        Ok(json!({
            "account_id": params.account_id,
            "period_days": params.days,
            "transaction_count": count,
            "transactions": transactions,
        }))
    }
}

//
// ================= Customer Profile =================
//

#[derive(Debug, Deserialize)]
struct CustomerProfileParams {
    customer_id: String,
}

lazy_static! {
    static ref CUSTOMER_PROFILES: HashMap<&'static str, Value> = {
        let mut profiles = HashMap::new();
        profiles.insert(
            "CUST_001",
            json!({
                "name": "Maria Santos",
                "occupation": "Restaurant Manager",
                "annual_income": 54000,
                "account_age_years": 3,
                "previous_sars": 0,
                "risk_score": 6.2,
                "address": "Local Resident",
            }),
        );
        profiles.insert(
            "CUST_002",
            json!({
                "name": "Robert Chen",
                "occupation": "Business Owner",
                "annual_income": 200000,
                "account_age_years": 0.5,
                "previous_sars": 0,
                "risk_score": 8.7,
                "address": "Multiple Jurisdictions",
            }),
        );
        profiles.insert(
            "CUST_003",
            json!({
                "name": "Sarah Johnson",
                "occupation": "Software Engineer",
                "annual_income": 85000,
                "account_age_years": 5,
                "previous_sars": 0,
                "risk_score": 2.1,
                "address": "Local Resident",
            }),
        );
        profiles
    };
}

/// Retrieve customer profile and risk information (simulated data).
///
/// An unknown id yields `{"error": "Customer not found"}` as ordinary data,
/// not a tool failure; callers see a successful execution.
pub struct CustomerProfileTool;

#[async_trait::async_trait]
impl Tool for CustomerProfileTool {
    fn name(&self) -> &'static str {
        "get_customer_profile"
    }

    fn description(&self) -> &'static str {
        "Retrieve a customer's profile and risk information"
    }

    async fn execute(&self, parameters: &Value) -> Result<Value> {
        let params: CustomerProfileParams = decode_parameters(parameters)?;

        let profile = CUSTOMER_PROFILES
            .get(params.customer_id.as_str())
            .cloned()
            .unwrap_or_else(|| json!({"error": "Customer not found"}));

        Ok(profile)
    }
}

//
// ================= Regulatory Thresholds =================
//

#[derive(Debug, Deserialize)]
struct ThresholdCheckParams {
    transaction_amount: f64,
    transaction_type: String,
}

/// Check a transaction against regulatory reporting thresholds
pub struct ThresholdCheckTool;

#[async_trait::async_trait]
impl Tool for ThresholdCheckTool {
    fn name(&self) -> &'static str {
        "check_regulatory_thresholds"
    }

    fn description(&self) -> &'static str {
        "Check a transaction amount and type against CTR/SAR/wire thresholds"
    }

    async fn execute(&self, parameters: &Value) -> Result<Value> {
        let params: ThresholdCheckParams = decode_parameters(parameters)?;
        let amount = params.transaction_amount;

        Ok(json!({
            "amount": amount,
            "type": params.transaction_type,
            "ctr_required": amount >= CTR_THRESHOLD,
            "below_ctr_threshold": (STRUCTURING_FLOOR..CTR_THRESHOLD).contains(&amount),
            "wire_monitoring": params.transaction_type == "wire_transfer"
                && amount >= WIRE_THRESHOLD,
            "potential_structuring": (STRUCTURING_FLOOR..CTR_THRESHOLD).contains(&amount),
        }))
    }
}

/// Create the registry of investigation tools
pub fn create_investigation_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(TransactionHistoryTool));
    registry.register(Arc::new(CustomerProfileTool));
    registry.register(Arc::new(ThresholdCheckTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_high_risk_account_pattern() {
        let tool = TransactionHistoryTool;
        let result = tool
            .execute(&json!({"account_id": "high_risk_007"}))
            .await
            .unwrap();

        assert_eq!(result["account_id"], "high_risk_007");
        assert_eq!(result["period_days"], 30);
        assert_eq!(result["transaction_count"], 5);

        let transactions = result["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 5);
        for txn in transactions {
            assert_eq!(txn["type"], "cash_deposit");
            let amount = txn["amount"].as_f64().unwrap();
            assert!((9000.0..10000.0).contains(&amount));
        }
    }

    #[tokio::test]
    async fn test_business_account_pattern() {
        let tool = TransactionHistoryTool;
        let result = tool
            .execute(&json!({"account_id": "ACME_business_42", "days": 7}))
            .await
            .unwrap();

        assert_eq!(result["period_days"], 7);
        let transactions = result["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 4);
        assert!(transactions
            .iter()
            .all(|t| t["type"] == "wire_transfer"));
    }

    #[tokio::test]
    async fn test_default_account_pattern() {
        let tool = TransactionHistoryTool;
        let result = tool
            .execute(&json!({"account_id": "ACC_12345"}))
            .await
            .unwrap();

        assert_eq!(result["transaction_count"], 3);
    }

    #[tokio::test]
    async fn test_known_customer_profile() {
        let tool = CustomerProfileTool;
        let result = tool
            .execute(&json!({"customer_id": "CUST_001"}))
            .await
            .unwrap();

        assert_eq!(result["name"], "Maria Santos");
        assert_eq!(result["risk_score"], 6.2);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_data_not_error() {
        let tool = CustomerProfileTool;
        let result = tool
            .execute(&json!({"customer_id": "CUST_999"}))
            .await
            .unwrap();

        assert_eq!(result, json!({"error": "Customer not found"}));
    }

    #[tokio::test]
    async fn test_structuring_band() {
        let tool = ThresholdCheckTool;
        let result = tool
            .execute(&json!({
                "transaction_amount": 9500.0,
                "transaction_type": "cash_deposit",
            }))
            .await
            .unwrap();

        assert_eq!(result["potential_structuring"], true);
        assert_eq!(result["ctr_required"], false);
        assert_eq!(result["below_ctr_threshold"], true);
        assert_eq!(result["wire_monitoring"], false);
    }

    #[tokio::test]
    async fn test_ctr_threshold() {
        let tool = ThresholdCheckTool;
        let result = tool
            .execute(&json!({
                "transaction_amount": 15000.0,
                "transaction_type": "cash_deposit",
            }))
            .await
            .unwrap();

        assert_eq!(result["ctr_required"], true);
        assert_eq!(result["potential_structuring"], false);
        assert_eq!(result["below_ctr_threshold"], false);
    }

    #[tokio::test]
    async fn test_wire_monitoring() {
        let tool = ThresholdCheckTool;
        let result = tool
            .execute(&json!({
                "transaction_amount": 3500.0,
                "transaction_type": "wire_transfer",
            }))
            .await
            .unwrap();

        assert_eq!(result["wire_monitoring"], true);
        assert_eq!(result["ctr_required"], false);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_invalid_input() {
        let tool = TransactionHistoryTool;
        let err = tool.execute(&json!({"days": 30})).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidToolInput(_)));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = create_investigation_registry();
        assert!(registry.get("get_transaction_history").is_some());
        assert!(registry.get("get_customer_profile").is_some());
        assert!(registry.get("check_regulatory_thresholds").is_some());
        assert!(registry.get("unknown_tool").is_none());
        assert_eq!(registry.list().len(), 3);
    }
}
