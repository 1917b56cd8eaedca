//! Run results and diagnostic trace.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::kind::StrategyKind;
use crate::tool::ToolCallRecord;

/// Category of a trace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// A model call and what it returned
    Llm,
    /// A parsed tool intent
    Intent,
    /// An argument repair exchange
    Repair,
    /// A fallback path was taken
    Fallback,
    /// A reasoning summary returned by the model
    Thought,
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TraceKind::Llm => "llm",
            TraceKind::Intent => "intent",
            TraceKind::Repair => "repair",
            TraceKind::Fallback => "fallback",
            TraceKind::Thought => "thought",
        };
        f.write_str(s)
    }
}

/// One append-only diagnostic entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerTraceStep {
    pub kind: TraceKind,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RunnerTraceStep {
    pub fn new(kind: TraceKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Terminal output of one strategy attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerResult {
    pub strategy: StrategyKind,
    pub final_text: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub trace: Vec<RunnerTraceStep>,
}

impl RunnerResult {
    pub fn repaired_calls(&self) -> usize {
        self.tool_calls.iter().filter(|c| c.repaired).count()
    }
}

/// Mutable accumulator for a single run. Consumed into a [`RunnerResult`].
#[derive(Debug)]
pub struct RunRecorder {
    strategy: StrategyKind,
    tool_calls: Vec<ToolCallRecord>,
    trace: Vec<RunnerTraceStep>,
}

impl RunRecorder {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            tool_calls: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn trace(&mut self, step: RunnerTraceStep) {
        self.trace.push(step);
    }

    pub fn step(&mut self, kind: TraceKind, detail: impl Into<String>) {
        self.trace(RunnerTraceStep::new(kind, detail));
    }

    pub fn step_with(&mut self, kind: TraceKind, detail: impl Into<String>, data: Value) {
        self.trace(RunnerTraceStep::new(kind, detail).with_data(data));
    }

    /// Append one `thought` step per reasoning summary.
    pub fn thoughts(&mut self, thoughts: &[String]) {
        for thought in thoughts {
            self.step(TraceKind::Thought, thought.clone());
        }
    }

    pub fn record_call(&mut self, record: ToolCallRecord) {
        self.tool_calls.push(record);
    }

    pub fn last_call(&self) -> Option<&ToolCallRecord> {
        self.tool_calls.last()
    }

    pub fn has_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn finish(self, final_text: impl Into<String>) -> RunnerResult {
        RunnerResult {
            strategy: self.strategy,
            final_text: final_text.into(),
            tool_calls: self.tool_calls,
            trace: self.trace,
        }
    }
}
