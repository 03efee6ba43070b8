//! Compliance Officer agent — ReACT narrative drafting
//!
//! Takes a finished risk assessment and drafts the SAR narrative text,
//! then runs it through the rules-based validator before anything is
//! reported back.

use crate::agents::extract_json_object;
use crate::audit::AuditTrail;
use crate::llm::LanguageModel;
use crate::models::{AgentKind, CaseData, ComplianceNarrative, RiskAssessment, ValidationReport};
use crate::validation::{create_sar_validator, NarrativeValidator, NARRATIVE_WORD_LIMIT};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = r#"You are a senior compliance officer at a US financial institution, drafting SAR narratives for FinCEN submission.

Work in two phases.

REASONING phase:
1. Review the risk analyst's findings and key indicators.
2. Assess which regulatory narrative requirements apply.
3. Identify the compliance elements the narrative must carry.
4. Plan the narrative structure.

ACTION phase:
1. Draft a concise narrative of at most 120 words.
2. Include specific amounts, dates and the customer reference.
3. State why the activity is suspicious, naming the pattern.
4. Use regulatory language (Bank Secrecy Act, reporting threshold, suspicious activity).

Respond with a single JSON object in a ```json fenced block:
{
  "narrative": "<the SAR narrative, at most 120 words>",
  "narrative_reasoning": "<why the narrative was structured this way, at most 500 characters>",
  "regulatory_citations": ["<citation>", ...],
  "completeness_check": <true|false>
}"#;

/// Result of one drafting pass: the narrative plus its validation report
#[derive(Debug, Clone)]
pub struct DraftedNarrative {
    pub narrative: ComplianceNarrative,
    pub validation: ValidationReport,
}

/// ReACT narrative drafting agent
pub struct ComplianceOfficerAgent {
    model: Arc<dyn LanguageModel>,
    audit: Arc<AuditTrail>,
    validator: NarrativeValidator,
}

impl ComplianceOfficerAgent {
    pub fn new(model: Arc<dyn LanguageModel>, audit: Arc<AuditTrail>) -> Self {
        Self {
            model,
            audit,
            validator: create_sar_validator(),
        }
    }

    /// Swap in a different rule set, mainly for tests
    pub fn with_validator(mut self, validator: NarrativeValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Draft and validate a narrative for an assessed case
    pub async fn draft_narrative(
        &self,
        case: &CaseData,
        assessment: &RiskAssessment,
    ) -> Result<DraftedNarrative> {
        let start = Instant::now();
        let user_prompt = format_drafting_prompt(case, assessment);

        debug!(case_id = %case.case_id, "Compliance officer: requesting narrative");

        let outcome = self.run_drafting(&user_prompt).await;

        let elapsed = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(drafted) => {
                self.audit
                    .record_action(
                        AgentKind::ComplianceOfficer,
                        "generate_narrative",
                        &case.case_id,
                        format!(
                            "{} / {}",
                            assessment.classification, assessment.risk_level
                        ),
                        format!(
                            "{} words, validation {}",
                            drafted.narrative.word_count(),
                            if drafted.validation.passed {
                                "passed"
                            } else {
                                "failed"
                            }
                        ),
                        drafted.narrative.narrative_reasoning.clone(),
                        elapsed,
                        true,
                        None,
                    )
                    .await?;
            }
            Err(e) => {
                warn!(case_id = %case.case_id, error = %e, "Narrative drafting failed");
                self.audit
                    .record_action(
                        AgentKind::ComplianceOfficer,
                        "generate_narrative",
                        &case.case_id,
                        format!("{}", assessment.classification),
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

    async fn run_drafting(&self, user_prompt: &str) -> Result<DraftedNarrative> {
        let response = self.model.generate(SYSTEM_PROMPT, user_prompt).await?;
        let value = extract_json_object(&response)?;
        let mut narrative: ComplianceNarrative = serde_json::from_value(value)?;
        narrative.validate()?;

        let validation = self.validator.validate(&narrative);
        // the model's own claim is replaced by the rule outcome
        narrative.completeness_check = validation.passed;

        Ok(DraftedNarrative {
            narrative,
            validation,
        })
    }
}

/// Render the assessment (and minimal case context) into the drafting prompt
fn format_drafting_prompt(case: &CaseData, assessment: &RiskAssessment) -> String {
    let mut prompt = String::new();

    prompt.push_str("RISK ANALYSIS RESULT\n\n");
    prompt.push_str(&format!(
        "Classification: {} (confidence {:.2})\n",
        assessment.classification, assessment.confidence_score
    ));
    prompt.push_str(&format!("Risk level: {}\n", assessment.risk_level));
    prompt.push_str(&format!(
        "Key indicators: {}\n",
        assessment.key_indicators.join(", ")
    ));
    prompt.push_str(&format!("Analyst reasoning: {}\n\n", assessment.reasoning));

    prompt.push_str("CASE CONTEXT\n\n");
    prompt.push_str(&format!(
        "Customer: {} ({})\n",
        case.customer.name, case.customer.customer_id
    ));
    prompt.push_str(&format!(
        "Transactions: {} totaling ${:.2}\n",
        case.transactions.len(),
        case.total_volume()
    ));
    for txn in &case.transactions {
        prompt.push_str(&format!(
            "- {}: {} ${:.2}\n",
            txn.date, txn.transaction_type, txn.amount
        ));
    }

    prompt.push_str(&format!(
        "\nDraft the SAR narrative now. Hard limit: {} words.\n",
        NARRATIVE_WORD_LIMIT
    ));

    prompt
}
