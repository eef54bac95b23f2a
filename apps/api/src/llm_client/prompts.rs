// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Instruction that pins the structured block to the exact schema shown.
pub const SCHEMA_INSTRUCTION: &str = "\
    CRITICAL: The JSON object MUST parse as valid JSON and match the schema below exactly: \
    same field names, same types, no comments, no trailing commas. \
    Do NOT add fields. Do NOT write anything after the closing code fence.";

/// Instruction used when a prior output is being revised.
pub const REVISION_INSTRUCTION: &str = "\
    Revise the previous output according to the feedback. \
    Keep everything the feedback does not ask to change. \
    Do NOT start over from scratch.";

/// Fills `{key}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so user text containing `{...}`
/// lands in the prompt verbatim. Unknown placeholders are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replacement = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (end, *value))
        });

        match replacement {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
