// --- File: crates/consult_common/src/validation.rs ---

/// Keeps a request field only when it holds something other than whitespace.
///
/// Request bodies model required fields as `Option<String>` so a missing or
/// blank value reaches the handler and gets the endpoint's own message
/// instead of a generic deserialization error.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
