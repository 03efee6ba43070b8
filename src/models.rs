//! Core data models for the SAR investigation pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::Result;

//
// ================= Enums =================
//

/// Static risk rating carried on a customer record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

/// Severity of an assessed case
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// SAR classification categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityClassification {
    Structuring,
    Sanctions,
    Fraud,
    #[serde(rename = "Money_Laundering")]
    MoneyLaundering,
    Other,
}

//
// ================= Case Data =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub name: String,
    pub date_of_birth: String,
    pub ssn_last_4: String,
    pub address: String,
    pub customer_since: String,
    pub risk_rating: RiskRating,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub annual_income: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub customer_id: String,
    pub account_type: String,
    pub opening_date: String,
    /// Can be negative for overdrafts
    pub current_balance: f64,
    pub average_monthly_balance: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub account_id: String,
    pub date: String,
    pub transaction_type: String,
    /// Negative for debits/withdrawals
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Unified case combining customer, accounts and suspicious transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseData {
    pub case_id: String,
    pub customer: CustomerRecord,
    pub accounts: Vec<AccountRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub created_at: DateTime<Utc>,
    pub data_sources: HashMap<String, String>,
}

impl CaseData {
    /// Sum of absolute transaction amounts in the case
    pub fn total_volume(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount.abs()).sum()
    }
}

//
// ================= Risk Assessment =================
//

/// Maximum length of the analyst's reasoning text
pub const MAX_REASONING_CHARS: usize = 500;

/// Structured output of the Risk Analyst agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub classification: ActivityClassification,
    pub confidence_score: f64,
    pub reasoning: String,
    pub key_indicators: Vec<String>,
    pub risk_level: RiskLevel,
}

impl RiskAssessment {
    /// Enforce field constraints the analyst's output must satisfy
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(PipelineError::InvalidAssessment(format!(
                "confidence_score {} outside [0.0, 1.0]",
                self.confidence_score
            )));
        }
        if self.reasoning.chars().count() > MAX_REASONING_CHARS {
            return Err(PipelineError::InvalidAssessment(format!(
                "reasoning exceeds {} characters",
                MAX_REASONING_CHARS
            )));
        }
        Ok(())
    }
}

//
// ================= Compliance Narrative =================
//

/// Maximum length of the drafted narrative text
pub const MAX_NARRATIVE_CHARS: usize = 1000;

/// Structured output of the Compliance Officer agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceNarrative {
    pub narrative: String,
    pub narrative_reasoning: String,
    pub regulatory_citations: Vec<String>,
    #[serde(default)]
    pub completeness_check: bool,
}

impl ComplianceNarrative {
    pub fn validate(&self) -> Result<()> {
        if self.narrative.chars().count() > MAX_NARRATIVE_CHARS {
            return Err(PipelineError::InvalidNarrative(format!(
                "narrative exceeds {} characters",
                MAX_NARRATIVE_CHARS
            )));
        }
        if self.narrative_reasoning.chars().count() > MAX_REASONING_CHARS {
            return Err(PipelineError::InvalidNarrative(format!(
                "narrative_reasoning exceeds {} characters",
                MAX_REASONING_CHARS
            )));
        }
        Ok(())
    }

    pub fn word_count(&self) -> usize {
        self.narrative.split_whitespace().count()
    }
}

//
// ================= Validation =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub rule_name: String,
    pub passed: bool,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub risk_level: RiskLevel,
    pub checks: Vec<ComplianceCheck>,
    pub issues: Vec<String>,
    pub validated_at: DateTime<Utc>,
}

//
// ================= Audit =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AgentKind {
    CaseBuilder,
    RiskAnalyst,
    ComplianceOfficer,
    Pipeline,
}

/// One audited agent action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentActionRecord {
    pub audit_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub case_id: String,
    pub agent: AgentKind,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    pub reasoning: String,
    pub execution_time_ms: u64,
    pub success: bool,
    pub error_message: Option<String>,
}

//
// ================= Final Result =================
//

/// End-to-end outcome of processing one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub case_id: String,
    pub case_hash: String,
    pub assessment: RiskAssessment,
    pub narrative: ComplianceNarrative,
    pub validation: ValidationReport,
    pub audit_id: Uuid,
    pub reasoning_trace: Vec<String>,
    pub execution_time_ms: u64,
}

impl fmt::Display for ActivityClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityClassification::Structuring => "Structuring",
            ActivityClassification::Sanctions => "Sanctions",
            ActivityClassification::Fraud => "Fraud",
            ActivityClassification::MoneyLaundering => "Money_Laundering",
            ActivityClassification::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentKind::CaseBuilder => "CaseBuilder",
            AgentKind::RiskAnalyst => "RiskAnalyst",
            AgentKind::ComplianceOfficer => "ComplianceOfficer",
            AgentKind::Pipeline => "Pipeline",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assessment() -> RiskAssessment {
        RiskAssessment {
            classification: ActivityClassification::Structuring,
            confidence_score: 0.85,
            reasoning: "Repeated sub-threshold cash deposits".to_string(),
            key_indicators: vec!["threshold avoidance".to_string()],
            risk_level: RiskLevel::High,
        }
    }

    #[test]
    fn test_assessment_validation() {
        assert!(sample_assessment().validate().is_ok());

        let mut bad = sample_assessment();
        bad.confidence_score = 1.3;
        assert!(bad.validate().is_err());

        let mut long = sample_assessment();
        long.reasoning = "x".repeat(MAX_REASONING_CHARS + 1);
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_classification_serde_names() {
        let json = serde_json::to_string(&ActivityClassification::MoneyLaundering).unwrap();
        assert_eq!(json, "\"Money_Laundering\"");

        let parsed: ActivityClassification =
            serde_json::from_str("\"Money_Laundering\"").unwrap();
        assert_eq!(parsed, ActivityClassification::MoneyLaundering);
    }

    #[test]
    fn test_narrative_word_count() {
        let narrative = ComplianceNarrative {
            narrative: "Customer deposited structured amounts below the CTR threshold"
                .to_string(),
            narrative_reasoning: "test".to_string(),
            regulatory_citations: vec![],
            completeness_check: false,
        };
        assert_eq!(narrative.word_count(), 9);
        assert!(narrative.validate().is_ok());
    }
}
