//! SAR Agent Pipeline
//!
//! An AML investigation pipeline that:
//! - Dispatches structured tool calls embedded in LLM response text
//! - Assembles unified cases from fragmented customer/account/transaction records
//! - Pre-screens cases with deterministic indicator heuristics
//! - Classifies suspicious activity via a chain-of-thought Risk Analyst agent
//! - Drafts SAR narratives via a ReACT Compliance Officer agent
//! - Validates narratives against filing rules before reporting
//! - Records every agent action in an auditable trail
//!
//! PIPELINE:
//! CASE → SCREEN → ANALYZE → DRAFT → VALIDATE → AUDIT

pub mod agents;
pub mod audit;
pub mod cases;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod models;
pub mod scenarios;
pub mod screening;
pub mod tools;
pub mod validation;

pub use error::Result;

// Re-export common types
pub use dispatch::{extract_tool_calls, ToolCallRequest, ToolCallResult, ToolDispatcher, ToolOutcome};
pub use models::*;
