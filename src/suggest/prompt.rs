//! Prompt construction for commit message suggestions.

/// Closing instruction of every prompt. The model is expected to honor it;
/// nothing enforces it locally.
pub const SINGLE_LINE_INSTRUCTION: &str =
    "Respond with exactly one line containing only the commit message and nothing else.";

/// Build the prompt sent to the model.
///
/// The intent and diff summary are interpolated verbatim.
pub fn build_prompt(intent: &str, diff_summary: &str) -> String {
    format!(
        r#"You are an expert at writing clear, conventional git commit messages.

Write a commit message for the following change.

Description of the change: "{intent}"

Staged changes:
{diff_summary}

{SINGLE_LINE_INSTRUCTION}"#
    )
}

/// Fold a previous suggestion and an optional hint into a new intent.
///
/// An empty or whitespace-only hint drops the "to be ..." clause.
pub fn rewrite_intent(previous: &str, hint: &str) -> String {
    let hint = hint.trim();
    if hint.is_empty() {
        format!("Rewrite the following commit message: {previous}")
    } else {
        format!("Rewrite the following commit message to be {hint}: {previous}")
    }
}
