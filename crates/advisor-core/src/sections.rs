//! Best-effort extraction of named sections from agent response text.
//!
//! Agents are asked (not forced) to structure their answers with markdown
//! headings. This scanner recovers a named section when such a heading
//! exists and nothing more: it is a heuristic over free-form text, not a
//! parser, and callers must treat its output as advisory.

/// Scan `text` line by line for a heading containing `section_name`
/// (case-insensitive) and collect the lines that follow until the next
/// heading. Returns `None` when no matching heading is found or the section
/// body is empty.
pub fn extract_section(text: &str, section_name: &str) -> Option<String> {
    let needle = section_name.to_lowercase();
    let mut content: Vec<&str> = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        if !in_section {
            if line.contains('#') && line.to_lowercase().contains(&needle) {
                in_section = true;
            }
            continue;
        }
        if line.trim_start().starts_with('#') {
            break;
        }
        content.push(line);
    }

    let body = content.join("\n").trim().to_string();
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Extract a section, falling back to the full raw text when the heading is
/// missing. The fallback keeps the field useful for arbitrary agent output.
pub fn section_or_full(text: &str, section_name: &str) -> String {
    extract_section(text, section_name).unwrap_or_else(|| text.to_string())
}
