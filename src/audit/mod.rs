//! Audit trail for agent actions
//!
//! Every agent action is recorded with inputs, outputs, reasoning and timing
//! so a case decision can be reconstructed after the fact. Records live in
//! memory; an optional JSONL sink appends one JSON object per line for
//! offline review.

use crate::models::{AgentActionRecord, AgentKind, CaseData};
use crate::Result;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Ordered store of audited agent actions
pub struct AuditTrail {
    records: Arc<RwLock<Vec<AgentActionRecord>>>,
    sink: Option<Mutex<File>>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            sink: None,
        }
    }

    /// Also append each record to a JSONL file
    pub fn with_log_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Ok(Self {
            records: Arc::new(RwLock::new(Vec::new())),
            sink: Some(Mutex::new(file)),
        })
    }

    /// Record one agent action and return its audit id
    #[allow(clippy::too_many_arguments)]
    pub async fn record_action(
        &self,
        agent: AgentKind,
        action: &str,
        case_id: &str,
        input_summary: String,
        output_summary: String,
        reasoning: String,
        execution_time_ms: u64,
        success: bool,
        error_message: Option<String>,
    ) -> Result<Uuid> {
        let record = AgentActionRecord {
            audit_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            case_id: case_id.to_string(),
            agent,
            action: action.to_string(),
            input_summary,
            output_summary,
            reasoning,
            execution_time_ms,
            success,
            error_message,
        };

        let audit_id = record.audit_id;

        if let Some(sink) = &self.sink {
            let line = serde_json::to_string(&record)?;
            let mut file = sink
                .lock()
                .map_err(|_| crate::error::PipelineError::AuditError(
                    "audit sink lock poisoned".to_string(),
                ))?;
            writeln!(file, "{}", line)?;
        }

        let mut records = self.records.write().await;
        records.push(record);

        Ok(audit_id)
    }

    /// Retrieve a record by audit id
    pub async fn get(&self, audit_id: Uuid) -> Option<AgentActionRecord> {
        let records = self.records.read().await;
        records.iter().find(|r| r.audit_id == audit_id).cloned()
    }

    /// All records for one case, in the order they were taken
    pub async fn entries_for_case(&self, case_id: &str) -> Vec<AgentActionRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|r| r.case_id == case_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute SHA256 hash of a case snapshot for integrity verification
/// Uses zero-copy streaming serialization into hasher
pub fn compute_case_hash(case: &CaseData) -> String {
    let mut hasher = Sha256::new();

    // Stream JSON directly into hasher (no intermediate String)
    if serde_json::to_writer(&mut HashWriter(&mut hasher), case).is_err() {
        return String::new();
    }

    hex::encode(hasher.finalize())
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    #[tokio::test]
    async fn test_record_and_fetch() {
        let trail = AuditTrail::new();

        let audit_id = trail
            .record_action(
                AgentKind::RiskAnalyst,
                "analyze_case",
                "CASE_1",
                "3 transactions".to_string(),
                "Structuring / High".to_string(),
                "sub-threshold deposits".to_string(),
                42,
                true,
                None,
            )
            .await
            .unwrap();

        let record = trail.get(audit_id).await.unwrap();
        assert_eq!(record.case_id, "CASE_1");
        assert_eq!(record.agent, AgentKind::RiskAnalyst);
        assert!(record.success);
    }

    #[tokio::test]
    async fn test_entries_for_case_preserve_order() {
        let trail = AuditTrail::new();

        for action in ["create_case", "analyze_case", "generate_narrative"] {
            trail
                .record_action(
                    AgentKind::Pipeline,
                    action,
                    "CASE_2",
                    String::new(),
                    String::new(),
                    String::new(),
                    0,
                    true,
                    None,
                )
                .await
                .unwrap();
        }
        trail
            .record_action(
                AgentKind::Pipeline,
                "unrelated",
                "CASE_3",
                String::new(),
                String::new(),
                String::new(),
                0,
                true,
                None,
            )
            .await
            .unwrap();

        let entries = trail.entries_for_case("CASE_2").await;
        let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["create_case", "analyze_case", "generate_narrative"]
        );
    }

    #[test]
    fn test_case_hash_is_stable_and_sensitive() {
        let scenario_a = scenarios::structuring_classic();
        let scenario_b = scenarios::benign_activity();

        let first = compute_case_hash(&scenario_a.case);
        let again = compute_case_hash(&scenario_a.case);
        let other = compute_case_hash(&scenario_b.case);

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(first.len(), 64);
    }
}
