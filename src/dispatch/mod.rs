//! Tool-call dispatch loop
//!
//! Extracts structured tool-call requests embedded in a model's free-form
//! response text and dispatches them against a fixed registry, one at a time,
//! in the order they appear. Nothing here is fatal: an unknown tool or a
//! failing handler becomes an inline error result and the batch continues.

use crate::tools::ToolRegistry;
use serde_json::{json, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One structured call request recovered from response text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub tool: String,
    pub parameters: Value,
}

/// Outcome of executing one request.
///
/// Distinguishes dispatch-level failures from success so callers can
/// discriminate without matching on error strings. A tool that *returns*
/// data shaped `{"error": ...}` is still `Success` — that is a domain-level
/// negative result, not a dispatch failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { data: Value },
    UnknownTool { message: String },
    HandlerError { message: String },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    /// Render the outcome as the value callers serialize back to the model:
    /// the handler's data on success, `{"error": message}` otherwise.
    pub fn to_value(&self) -> Value {
        match self {
            ToolOutcome::Success { data } => data.clone(),
            ToolOutcome::UnknownTool { message }
            | ToolOutcome::HandlerError { message } => json!({"error": message}),
        }
    }
}

/// One executed request with its outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool: String,
    pub parameters: Value,
    pub outcome: ToolOutcome,
}

impl ToolCallResult {
    /// Flat `{tool, parameters, result}` record suitable for a follow-up prompt
    pub fn to_value(&self) -> Value {
        json!({
            "tool": self.tool,
            "parameters": self.parameters,
            "result": self.outcome.to_value(),
        })
    }
}

/// Extract tool-call requests from response text, in order of appearance.
///
/// A request is a ```json fenced block containing an object with a `tool`
/// string and a `parameters` field. Blocks that fail to parse or lack either
/// field are skipped without aborting the scan.
pub fn extract_tool_calls(text: &str) -> Vec<ToolCallRequest> {
    const FENCE_OPEN: &str = "```json";
    const FENCE_CLOSE: &str = "```";

    let mut calls = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(FENCE_OPEN) {
        let body_start = cursor + found + FENCE_OPEN.len();
        let Some(body_len) = text[body_start..].find(FENCE_CLOSE) else {
            break;
        };
        let body = text[body_start..body_start + body_len].trim();
        cursor = body_start + body_len + FENCE_CLOSE.len();

        let Ok(value) = serde_json::from_str::<Value>(body) else {
            continue;
        };
        if !value.is_object() {
            continue;
        }
        let Some(tool) = value.get("tool").and_then(Value::as_str) else {
            continue;
        };
        let Some(parameters) = value.get("parameters") else {
            continue;
        };

        calls.push(ToolCallRequest {
            tool: tool.to_string(),
            parameters: parameters.clone(),
        });
    }

    calls
}

/// Executes extracted requests against an immutable registry
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Execute a single request, isolating any handler failure
    pub async fn execute_call(&self, request: &ToolCallRequest) -> ToolCallResult {
        let outcome = match self.registry.get(&request.tool) {
            Some(tool) => match tool.execute(&request.parameters).await {
                Ok(data) => ToolOutcome::Success { data },
                Err(e) => {
                    warn!(tool = %request.tool, error = %e, "Tool execution failed");
                    ToolOutcome::HandlerError {
                        message: format!("Tool execution failed: {}", e),
                    }
                }
            },
            None => {
                warn!(tool = %request.tool, "Tool not found in registry");
                ToolOutcome::UnknownTool {
                    message: format!("Tool {} not found", request.tool),
                }
            }
        };

        ToolCallResult {
            tool: request.tool.clone(),
            parameters: request.parameters.clone(),
            outcome,
        }
    }

    /// Extract and execute every request in one response text, preserving
    /// the order of appearance. Requests that fail to parse are not
    /// represented in the output at all.
    pub async fn process_response(&self, response: &str) -> Vec<ToolCallResult> {
        let requests = extract_tool_calls(response);
        let mut results = Vec::with_capacity(requests.len());

        for request in &requests {
            debug!(
                tool = %request.tool,
                parameters = %request.parameters,
                "Executing tool call"
            );

            let result = self.execute_call(request).await;

            debug!(
                tool = %result.tool,
                success = result.outcome.is_success(),
                "Tool call finished"
            );

            results.push(result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::create_investigation_registry;

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(create_investigation_registry())
    }

    #[test]
    fn test_extract_empty_text() {
        assert!(extract_tool_calls("").is_empty());
        assert!(extract_tool_calls("   \n\t  ").is_empty());
    }

    #[test]
    fn test_extract_ignores_surrounding_prose() {
        let text = r#"Thought: I should look up the account first.

```json
{"tool": "get_transaction_history", "parameters": {"account_id": "high_risk_007"}}
```

Then I will review the profile."#;

        let calls = extract_tool_calls(text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool, "get_transaction_history");
        assert_eq!(calls[0].parameters["account_id"], "high_risk_007");
    }

    #[test]
    fn test_extract_skips_malformed_blocks() {
        let text = r#"```json
{"tool": "get_customer_profile", "parameters": {"customer_id": "CUST_001"}}
```
```json
{this is not valid json}
```
```json
{"parameters": {"customer_id": "CUST_002"}}
```
```json
{"tool": "check_regulatory_thresholds"}
```"#;

        let calls = extract_tool_calls(text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool, "get_customer_profile");
    }

    #[test]
    fn test_extract_preserves_order() {
        let text = r#"
```json
{"tool": "first", "parameters": {}}
```
```json
{"tool": "second", "parameters": {}}
```
```json
{"tool": "third", "parameters": {}}
```"#;

        let calls = extract_tool_calls(text);
        let names: Vec<&str> = calls.iter().map(|c| c.tool.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_reported_inline() {
        let result = dispatcher()
            .execute_call(&ToolCallRequest {
                tool: "run_sanctions_scan".to_string(),
                parameters: serde_json::json!({}),
            })
            .await;

        assert!(!result.outcome.is_success());
        let rendered = result.to_value();
        assert_eq!(
            rendered["result"]["error"],
            "Tool run_sanctions_scan not found"
        );
    }

    #[tokio::test]
    async fn test_handler_failure_reported_inline() {
        // account_id is missing, so parameter decoding fails inside the tool
        let result = dispatcher()
            .execute_call(&ToolCallRequest {
                tool: "get_transaction_history".to_string(),
                parameters: serde_json::json!({"days": 30}),
            })
            .await;

        match &result.outcome {
            ToolOutcome::HandlerError { message } => {
                assert!(message.contains("Tool execution failed"));
            }
            other => panic!("expected HandlerError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_passes_data_through() {
        let result = dispatcher()
            .execute_call(&ToolCallRequest {
                tool: "get_customer_profile".to_string(),
                parameters: serde_json::json!({"customer_id": "CUST_003"}),
            })
            .await;

        match &result.outcome {
            ToolOutcome::Success { data } => {
                assert_eq!(data["name"], "Sarah Johnson");
                assert_eq!(data["occupation"], "Software Engineer");
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_domain_error_is_still_success() {
        let result = dispatcher()
            .execute_call(&ToolCallRequest {
                tool: "get_customer_profile".to_string(),
                parameters: serde_json::json!({"customer_id": "CUST_999"}),
            })
            .await;

        assert!(result.outcome.is_success());
        assert_eq!(
            result.outcome.to_value(),
            serde_json::json!({"error": "Customer not found"})
        );
    }

    #[tokio::test]
    async fn test_batch_empty_for_plain_text() {
        let results = dispatcher()
            .process_response("No tool calls here, just narrative reasoning.")
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_batch_order_and_mixed_outcomes() {
        let response = r#"I need history, then a profile, then something unregistered.

```json
{"tool": "get_transaction_history", "parameters": {"account_id": "high_risk_007"}}
```
```json
{"tool": "get_customer_profile", "parameters": {"customer_id": "CUST_002"}}
```
```json
{"tool": "freeze_account", "parameters": {"account_id": "high_risk_007"}}
```"#;

        let results = dispatcher().process_response(response).await;
        assert_eq!(results.len(), 3);

        assert_eq!(results[0].tool, "get_transaction_history");
        assert!(results[0].outcome.is_success());

        assert_eq!(results[1].tool, "get_customer_profile");
        assert!(results[1].outcome.is_success());

        assert_eq!(results[2].tool, "freeze_account");
        assert_eq!(
            results[2].outcome,
            ToolOutcome::UnknownTool {
                message: "Tool freeze_account not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_batch_skips_invalid_block_entirely() {
        let response = r#"
```json
{"tool": "check_regulatory_thresholds", "parameters": {"transaction_amount": 9500.0, "transaction_type": "cash_deposit"}}
```
```json
{"tool": "check_regulatory_thresholds", "parameters":
```"#;

        let results = dispatcher().process_response(response).await;
        assert_eq!(results.len(), 1);

        match &results[0].outcome {
            ToolOutcome::Success { data } => {
                assert_eq!(data["potential_structuring"], true);
                assert_eq!(data["ctr_required"], false);
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }
}
