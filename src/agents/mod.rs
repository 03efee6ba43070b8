//! LLM-backed agents and the two-step SAR pipeline
//!
//! The pipeline is a straight chain: deterministic pre-screen, Risk Analyst
//! classification, Compliance Officer narrative drafting with validation.
//! No replanning, no retries — a failed step fails the case.

use crate::audit::{compute_case_hash, AuditTrail};
use crate::error::PipelineError;
use crate::llm::LanguageModel;
use crate::models::{AgentKind, CaseData, CaseOutcome};
use crate::screening::IndicatorScreen;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub mod compliance_officer;
pub mod risk_analyst;

pub use compliance_officer::ComplianceOfficerAgent;
pub use risk_analyst::RiskAnalystAgent;

/// Recover a JSON object from a model response.
///
/// Tries a ```json fenced block first, then falls back to the widest
/// `{ ... }` slice in the text. Models drift between the two forms.
pub fn extract_json_object(text: &str) -> Result<Value> {
    if let Some(start) = text.find("```json") {
        let after = &text[start + 7..];
        if let Some(end) = after.find("```") {
            let body = after[..end].trim();
            if let Ok(value) = serde_json::from_str::<Value>(body) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }

    if let Some(brace_start) = text.find('{') {
        if let Some(brace_end) = text.rfind('}') {
            if brace_end > brace_start {
                let body = &text[brace_start..=brace_end];
                if let Ok(value) = serde_json::from_str::<Value>(body) {
                    if value.is_object() {
                        return Ok(value);
                    }
                }
            }
        }
    }

    Err(PipelineError::MalformedResponse(
        "no JSON object found in model response".to_string(),
    ))
}

/// Sequential two-step SAR pipeline
pub struct SarPipeline {
    risk_analyst: RiskAnalystAgent,
    compliance_officer: ComplianceOfficerAgent,
    audit: Arc<AuditTrail>,
}

impl SarPipeline {
    pub fn new(model: Arc<dyn LanguageModel>, audit: Arc<AuditTrail>) -> Self {
        Self {
            risk_analyst: RiskAnalystAgent::new(model.clone(), audit.clone()),
            compliance_officer: ComplianceOfficerAgent::new(model, audit.clone()),
            audit,
        }
    }

    /// Run a case through the full chain and record the outcome
    pub async fn process_case(&self, case: &CaseData) -> Result<CaseOutcome> {
        let start = Instant::now();
        let mut reasoning_trace = Vec::new();

        info!(
            case_id = %case.case_id,
            customer_id = %case.customer.customer_id,
            transaction_count = case.transactions.len(),
            "Pipeline: starting case"
        );

        reasoning_trace.push(format!(
            "INPUT: case with {} transaction(s), total volume ${:.2}",
            case.transactions.len(),
            case.total_volume()
        ));

        // === PRE-SCREEN ===
        let screen = IndicatorScreen::screen(case);
        reasoning_trace.push(format!(
            "SCREEN: {} preliminary indicator(s){}",
            screen.indicators.len(),
            screen
                .preliminary
                .map(|c| format!(", preliminary category {}", c))
                .unwrap_or_default()
        ));
        debug!(indicators = ?screen.indicators, "Pre-screen complete");

        // === ANALYZE ===
        let assessment = self
            .risk_analyst
            .analyze_case(case, &screen.indicators)
            .await?;
        reasoning_trace.push(format!(
            "ANALYZE: {} at {} risk (confidence {:.2})",
            assessment.classification, assessment.risk_level, assessment.confidence_score
        ));

        // === DRAFT + VALIDATE ===
        let drafted = self
            .compliance_officer
            .draft_narrative(case, &assessment)
            .await?;
        reasoning_trace.push(format!(
            "DRAFT: {} word narrative, {} citation(s)",
            drafted.narrative.word_count(),
            drafted.narrative.regulatory_citations.len()
        ));
        reasoning_trace.push(format!(
            "VALIDATE: {} / {} rules passed",
            drafted
                .validation
                .checks
                .iter()
                .filter(|c| c.passed)
                .count(),
            drafted.validation.checks.len()
        ));

        let case_hash = compute_case_hash(case);
        let execution_time_ms = start.elapsed().as_millis() as u64;

        let audit_id = self
            .audit
            .record_action(
                AgentKind::Pipeline,
                "process_case",
                &case.case_id,
                format!(
                    "customer {}, {} transaction(s)",
                    case.customer.customer_id,
                    case.transactions.len()
                ),
                format!(
                    "{} / {} / narrative {} words",
                    assessment.classification,
                    assessment.risk_level,
                    drafted.narrative.word_count()
                ),
                reasoning_trace.join(" | "),
                execution_time_ms,
                true,
                None,
            )
            .await?;

        info!(
            case_id = %case.case_id,
            classification = %assessment.classification,
            validated = drafted.validation.passed,
            "Pipeline: case complete"
        );

        Ok(CaseOutcome {
            case_id: case.case_id.clone(),
            case_hash,
            assessment,
            narrative: drafted.narrative,
            validation: drafted.validation,
            audit_id,
            reasoning_trace,
            execution_time_ms,
        })
    }
}
