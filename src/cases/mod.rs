//! Case assembly
//!
//! Builds a unified `CaseData` from fragmented customer, account and
//! transaction records, the way alert data arrives from upstream monitoring.

use crate::error::PipelineError;
use crate::models::{AccountRecord, AgentKind, CaseData, CustomerRecord, TransactionRecord};
use crate::audit::AuditTrail;
use crate::Result;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Assembles case objects and audits every build
pub struct CaseBuilder {
    audit: Arc<AuditTrail>,
}

impl CaseBuilder {
    pub fn new(audit: Arc<AuditTrail>) -> Self {
        Self { audit }
    }

    /// Build a case for one customer.
    ///
    /// Accounts not owned by the customer and transactions outside the
    /// customer's accounts are dropped. A case with no transactions is
    /// rejected — there is nothing to investigate.
    pub async fn build_case(
        &self,
        customer: CustomerRecord,
        accounts: Vec<AccountRecord>,
        transactions: Vec<TransactionRecord>,
    ) -> Result<CaseData> {
        let start = Instant::now();
        let case_id = Uuid::new_v4().to_string();

        let accounts: Vec<AccountRecord> = accounts
            .into_iter()
            .filter(|a| a.customer_id == customer.customer_id)
            .collect();

        let account_ids: HashSet<&str> =
            accounts.iter().map(|a| a.account_id.as_str()).collect();

        let transactions: Vec<TransactionRecord> = transactions
            .into_iter()
            .filter(|t| account_ids.contains(t.account_id.as_str()))
            .collect();

        debug!(
            case_id = %case_id,
            customer_id = %customer.customer_id,
            account_count = accounts.len(),
            transaction_count = transactions.len(),
            "Assembling case"
        );

        if transactions.is_empty() {
            let message = format!(
                "no transactions for customer {} within their accounts",
                customer.customer_id
            );
            warn!(case_id = %case_id, "{}", message);

            self.audit
                .record_action(
                    AgentKind::CaseBuilder,
                    "create_case",
                    &case_id,
                    format!("customer {}", customer.customer_id),
                    String::new(),
                    "rejected empty case".to_string(),
                    start.elapsed().as_millis() as u64,
                    false,
                    Some(message.clone()),
                )
                .await?;

            return Err(PipelineError::CaseError(message));
        }

        let stamp = Utc::now().format("%Y%m%d").to_string();
        let data_sources: HashMap<String, String> = [
            ("customer_source", format!("alert_extract_{}", stamp)),
            ("account_source", format!("alert_extract_{}", stamp)),
            ("transaction_source", format!("alert_extract_{}", stamp)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let case = CaseData {
            case_id: case_id.clone(),
            customer,
            accounts,
            transactions,
            created_at: Utc::now(),
            data_sources,
        };

        self.audit
            .record_action(
                AgentKind::CaseBuilder,
                "create_case",
                &case_id,
                format!("customer {}", case.customer.customer_id),
                format!(
                    "{} account(s), {} transaction(s)",
                    case.accounts.len(),
                    case.transactions.len()
                ),
                "assembled case from fragmented records".to_string(),
                start.elapsed().as_millis() as u64,
                true,
                None,
            )
            .await?;

        Ok(case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskRating;

    fn customer(id: &str) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.to_string(),
            name: "Test Customer".to_string(),
            date_of_birth: "1980-01-01".to_string(),
            ssn_last_4: "1234".to_string(),
            address: "123 Test St".to_string(),
            customer_since: "2020-01-01".to_string(),
            risk_rating: RiskRating::Medium,
            phone: None,
            occupation: None,
            annual_income: None,
        }
    }

    fn account(id: &str, customer_id: &str) -> AccountRecord {
        AccountRecord {
            account_id: id.to_string(),
            customer_id: customer_id.to_string(),
            account_type: "Checking".to_string(),
            opening_date: "2020-01-01".to_string(),
            current_balance: 10_000.0,
            average_monthly_balance: 8_000.0,
            status: "Active".to_string(),
        }
    }

    fn transaction(id: &str, account_id: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            account_id: account_id.to_string(),
            date: "2024-01-15".to_string(),
            transaction_type: "Cash_Deposit".to_string(),
            amount,
            description: "Cash deposit".to_string(),
            counterparty: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_build_filters_foreign_records() {
        let audit = Arc::new(AuditTrail::new());
        let builder = CaseBuilder::new(audit.clone());

        let case = builder
            .build_case(
                customer("CUST_A"),
                vec![
                    account("ACC_1", "CUST_A"),
                    account("ACC_2", "CUST_B"),
                ],
                vec![
                    transaction("TXN_1", "ACC_1", 9_500.0),
                    transaction("TXN_2", "ACC_2", 500.0),
                    transaction("TXN_3", "ACC_1", 9_800.0),
                ],
            )
            .await
            .unwrap();

        assert_eq!(case.accounts.len(), 1);
        assert_eq!(case.transactions.len(), 2);
        assert!(case
            .transactions
            .iter()
            .all(|t| t.account_id == "ACC_1"));
        assert_eq!(case.data_sources.len(), 3);

        let entries = audit.entries_for_case(&case.case_id).await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
    }

    #[tokio::test]
    async fn test_empty_case_rejected_and_audited() {
        let audit = Arc::new(AuditTrail::new());
        let builder = CaseBuilder::new(audit.clone());

        let err = builder
            .build_case(
                customer("CUST_A"),
                vec![account("ACC_1", "CUST_A")],
                vec![transaction("TXN_1", "ACC_OTHER", 100.0)],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::CaseError(_)));
        assert_eq!(audit.len().await, 1);
    }
}
