//! Risk Analyst agent — chain-of-thought classification
//!
//! Classifies a case into a SAR category by walking the model through a
//! fixed five-step reasoning framework and demanding structured JSON back.

use crate::agents::extract_json_object;
use crate::audit::AuditTrail;
use crate::llm::LanguageModel;
use crate::models::{AgentKind, CaseData, RiskAssessment};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = r#"You are a senior financial crime analyst at a US financial institution, performing suspicious activity reviews for SAR filing decisions.

Work through every case step by step:
1. Data Review — examine the customer profile, accounts and transactions.
2. Pattern Recognition — identify suspicious indicators in the activity.
3. Regulatory Mapping — connect the pattern to known BSA/AML typologies.
4. Risk Quantification — assess the severity of the risk.
5. Classification Decision — pick the single best-fitting category.

Categories:
- Structuring: transactions designed to avoid reporting thresholds
- Sanctions: potential sanctions violations or prohibited parties
- Fraud: fraudulent transactions or identity-related crimes
- Money_Laundering: complex schemes to obscure illicit fund sources
- Other: suspicious patterns not fitting standard categories

Respond with a single JSON object in a ```json fenced block:
{
  "classification": "<Structuring|Sanctions|Fraud|Money_Laundering|Other>",
  "confidence_score": <0.0 to 1.0>,
  "reasoning": "<step-by-step summary, at most 500 characters>",
  "key_indicators": ["<indicator>", ...],
  "risk_level": "<Low|Medium|High|Critical>"
}"#;

/// Chain-of-thought risk classification agent
pub struct RiskAnalystAgent {
    model: Arc<dyn LanguageModel>,
    audit: Arc<AuditTrail>,
}

impl RiskAnalystAgent {
    pub fn new(model: Arc<dyn LanguageModel>, audit: Arc<AuditTrail>) -> Self {
        Self { model, audit }
    }

    /// Analyze one case, returning a validated assessment.
    ///
    /// `preliminary_indicators` come from the deterministic pre-screen and
    /// are offered to the model as hints, never as conclusions.
    pub async fn analyze_case(
        &self,
        case: &CaseData,
        preliminary_indicators: &[String],
    ) -> Result<RiskAssessment> {
        let start = Instant::now();
        let user_prompt = format_case_prompt(case, preliminary_indicators);

        debug!(case_id = %case.case_id, "Risk analyst: requesting analysis");

        let outcome = self.run_analysis(&user_prompt).await;

        let elapsed = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(assessment) => {
                self.audit
                    .record_action(
                        AgentKind::RiskAnalyst,
                        "analyze_case",
                        &case.case_id,
                        format!(
                            "customer {}, {} transaction(s)",
                            case.customer.customer_id,
                            case.transactions.len()
                        ),
                        format!(
                            "{} / {} (confidence {:.2})",
                            assessment.classification,
                            assessment.risk_level,
                            assessment.confidence_score
                        ),
                        assessment.reasoning.clone(),
                        elapsed,
                        true,
                        None,
                    )
                    .await?;
            }
            Err(e) => {
                warn!(case_id = %case.case_id, error = %e, "Risk analysis failed");
                self.audit
                    .record_action(
                        AgentKind::RiskAnalyst,
                        "analyze_case",
                        &case.case_id,
                        format!("customer {}", case.customer.customer_id),
                        String::new(),
                        String::new(),
                        elapsed,
                        false,
                        Some(e.to_string()),
                    )
                    .await?;
            }
        }

        outcome
    }

    async fn run_analysis(&self, user_prompt: &str) -> Result<RiskAssessment> {
        let response = self.model.generate(SYSTEM_PROMPT, user_prompt).await?;
        let value = extract_json_object(&response)?;
        let assessment: RiskAssessment = serde_json::from_value(value)?;
        assessment.validate()?;
        Ok(assessment)
    }
}

/// Render a case into the analysis prompt
fn format_case_prompt(case: &CaseData, preliminary_indicators: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str("CASE FOR REVIEW\n\n");
    prompt.push_str(&format!(
        "Customer: {} ({})\n",
        case.customer.name, case.customer.customer_id
    ));
    if let Some(occupation) = &case.customer.occupation {
        prompt.push_str(&format!("Occupation: {}\n", occupation));
    }
    if let Some(income) = case.customer.annual_income {
        prompt.push_str(&format!("Annual income: ${}\n", income));
    }
    prompt.push_str(&format!(
        "Customer since: {}, risk rating: {:?}\n\n",
        case.customer.customer_since, case.customer.risk_rating
    ));

    prompt.push_str("Accounts:\n");
    for account in &case.accounts {
        prompt.push_str(&format!(
            "- {} ({}, {}): balance ${:.2}, average monthly ${:.2}\n",
            account.account_id,
            account.account_type,
            account.status,
            account.current_balance,
            account.average_monthly_balance
        ));
    }

    prompt.push_str("\nTransactions under review:\n");
    for txn in &case.transactions {
        prompt.push_str(&format!(
            "- {} {}: {} ${:.2}{}{}\n",
            txn.date,
            txn.transaction_id,
            txn.transaction_type,
            txn.amount,
            txn.counterparty
                .as_deref()
                .map(|c| format!(" to {}", c))
                .unwrap_or_default(),
            txn.location
                .as_deref()
                .map(|l| format!(" at {}", l))
                .unwrap_or_default(),
        ));
    }

    let total = case.total_volume();
    let largest = case
        .transactions
        .iter()
        .map(|t| t.amount.abs())
        .fold(0.0_f64, f64::max);
    prompt.push_str(&format!(
        "\nSummary: {} transaction(s), total volume ${:.2}, largest ${:.2}\n",
        case.transactions.len(),
        total,
        largest
    ));

    if !preliminary_indicators.is_empty() {
        prompt.push_str(&format!(
            "\nAutomated pre-screen indicators (verify, do not assume): {}\n",
            preliminary_indicators.join(", ")
        ));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::llm::ScriptedModel;
    use crate::models::{ActivityClassification, RiskLevel};
    use crate::scenarios;

    fn agent(response: &str) -> (RiskAnalystAgent, Arc<AuditTrail>) {
        let audit = Arc::new(AuditTrail::new());
        (
            RiskAnalystAgent::new(Arc::new(ScriptedModel::single(response)), audit.clone()),
            audit,
        )
    }

    #[tokio::test]
    async fn test_analyze_parses_fenced_response() {
        let (agent, audit) = agent(
            r#"```json
{
  "classification": "Money_Laundering",
  "confidence_score": 0.91,
  "reasoning": "Layered wires through high-risk jurisdictions.",
  "key_indicators": ["high-risk jurisdictions", "layering"],
  "risk_level": "Critical"
}
```"#,
        );

        let scenario = scenarios::money_laundering_complex();
        let assessment = agent.analyze_case(&scenario.case, &[]).await.unwrap();

        assert_eq!(
            assessment.classification,
            ActivityClassification::MoneyLaundering
        );
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
        assert_eq!(audit.len().await, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_rejected() {
        let (agent, audit) = agent(
            r#"{"classification": "Fraud", "confidence_score": 1.8, "reasoning": "r", "key_indicators": [], "risk_level": "High"}"#,
        );

        let scenario = scenarios::fraud_identity();
        let err = agent.analyze_case(&scenario.case, &[]).await.unwrap_err();

        assert!(matches!(err, PipelineError::InvalidAssessment(_)));
        let entries = audit.entries_for_case(&scenario.case.case_id).await;
        assert!(!entries[0].success);
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let (agent, _audit) = agent(
            r#"{"classification": "Embezzlement", "confidence_score": 0.5, "reasoning": "r", "key_indicators": [], "risk_level": "Low"}"#,
        );

        let scenario = scenarios::benign_activity();
        let err = agent.analyze_case(&scenario.case, &[]).await.unwrap_err();
        assert!(matches!(err, PipelineError::SerializationError(_)));
    }

    #[test]
    fn test_prompt_includes_transactions_and_hints() {
        let scenario = scenarios::structuring_classic();
        let prompt = format_case_prompt(
            &scenario.case,
            &["threshold avoidance".to_string()],
        );

        assert!(prompt.contains("Sarah Thompson"));
        assert!(prompt.contains("Cash_Deposit"));
        assert!(prompt.contains("$9800.00"));
        assert!(prompt.contains("threshold avoidance"));
    }
}
