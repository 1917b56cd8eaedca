//! JSON recovery from model output.
//!
//! Models asked for "JSON only" still wrap answers in markdown fences, leave
//! trailing commas, forget to quote keys, or add a sentence of commentary.
//! [`recover`] turns that text into a [`serde_json::Value`] and
//! [`as_json_object`] narrows the value to a keyed mapping.
//!
//! ```text
//! raw text ──▶ strip fence ──▶ strict parse ──▶ repaired parse ──▶ first {...} + repair
//!                                  │                 │                     │
//!                                  └──── first success wins ───────────────┘
//! ```

pub mod recovery;

pub use recovery::{RecoveryError, ShapeError, as_json_object, recover, repair_syntax};
