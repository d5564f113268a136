//! Flattening of completion results into the client-facing response string.

use crate::backend::CompletionResult;

/// Separator written between the answer and each citation section.
///
/// The exact literal (two newlines, 59 equals signs, two newlines) is part of
/// the client protocol and must not change.
pub const SECTION_DELIMITER: &str =
    "\n\n===========================================================\n\n";

/// Flatten a completion result into one delimited text block.
///
/// The answer comes first; each citation then contributes
/// `delimiter + file_name + delimiter + text`, in backend order. Citations
/// are never re-ordered, deduplicated, or truncated, and an answer with no
/// citations is returned as-is with no trailing delimiter.
pub fn format_completion(result: &CompletionResult) -> String {
    let mut output = result.answer.clone();
    for citation in &result.citations {
        output.push_str(SECTION_DELIMITER);
        output.push_str(&citation.file_name);
        output.push_str(SECTION_DELIMITER);
        output.push_str(&citation.text);
    }
    output
}
