//! Built-in benchmark presets
//!
//! Each preset exercises one built-in tool, plus `chat` for the
//! direct-respond path.

use toolbench_domain::Preset;

const PRESETS: [(&str, &str); 5] = [
    (
        "stats",
        "What is the mean of 12, 7, 3.5, 19 and 8? Use the statistics tool.",
    ),
    (
        "time",
        "What time is it right now in Tokyo (UTC+9)? Include the weekday.",
    ),
    (
        "temperature",
        "Convert 98.6 degrees Fahrenheit to Celsius.",
    ),
    (
        "words",
        "How many words are in this sentence: \"The quick brown fox jumps over the lazy dog\"?",
    ),
    (
        "chat",
        "In one sentence, explain what a JSON schema is. No tools are needed.",
    ),
];

/// Every built-in preset, in a stable order
pub fn builtin_presets() -> Vec<Preset> {
    PRESETS
        .iter()
        .map(|(id, prompt)| Preset::new(*id, *prompt))
        .collect()
}

/// Look up a built-in preset by id
pub fn find_preset(id: &str) -> Option<Preset> {
    builtin_presets().into_iter().find(|p| p.id == id)
}

/// Resolve preset ids, or every preset when `ids` is empty.
///
/// Returns the unknown id on failure.
pub fn resolve_presets(ids: &[String]) -> Result<Vec<Preset>, String> {
    if ids.is_empty() {
        return Ok(builtin_presets());
    }
    ids.iter()
        .map(|id| find_preset(id.trim()).ok_or_else(|| id.clone()))
        .collect()
}

/// Ids of every built-in preset
pub fn preset_ids() -> Vec<&'static str> {
    PRESETS.iter().map(|(id, _)| *id).collect()
}
