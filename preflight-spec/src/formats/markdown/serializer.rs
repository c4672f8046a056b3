//! Markdown serialization (Spec → dialect text)
//!
//! The output is the canonical shape of the dialect: fixed section order, one
//! blank line between blocks, directive comment directly under each `###`
//! heading. Feeding it back through [`super::parser::parse_spec`] yields an
//! equal [`Spec`].
//!
//! Unlike the import side this does not go through Comrak's CommonMark
//! renderer: the renderer normalises spacing and escapes text, and the
//! canonical layout has to be byte-exact. Heading and description text is
//! escaped here instead, only as far as needed for Comrak to hand the same
//! characters back. Line breaks inside a description paragraph are written as
//! backslash hard breaks.

use crate::model::{Spec, Stub, StubPayload};

/// Serialize a spec to canonical Markdown.
pub fn serialize_spec(spec: &Spec) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("spec-version: {}\n", spec.spec_version));
    out.push_str("---\n\n");

    out.push_str(&format!("# {}\n\n", escape_inline(&spec.name)));
    if let Some(description) = &spec.description {
        push_description(&mut out, description);
    }

    out.push_str("## Query\n\n");
    push_fenced(&mut out, "taxiql", &spec.query);
    out.push('\n');

    out.push_str("## Data Sources\n\n");
    for stub in &spec.data_sources {
        push_stub(&mut out, stub);
    }

    out.push_str("## Expected Result\n\n");
    push_fenced(&mut out, spec.result_format.info_string(), &spec.expected_result);

    if let Some(flow) = &spec.flow {
        out.push_str("\n## Flow\n\n");
        push_fenced(&mut out, "mermaid", flow);
    }

    out
}

fn push_stub(out: &mut String, stub: &Stub) {
    out.push_str(&format!("### {}\n", escape_inline(&stub.label)));
    match &stub.payload {
        StubPayload::RequestResponse {
            parameters,
            response,
        } => {
            out.push_str(&format!("<!-- operation: {} -->\n\n", stub.operation_name));
            let labelled = [("Request", parameters), ("Response", response)];
            let mut first = true;
            for (label, content) in labelled {
                if let Some(content) = content {
                    if !first {
                        out.push('\n');
                    }
                    push_labelled(out, label, content);
                    first = false;
                }
            }
        }
        StubPayload::Stream { messages } => {
            out.push_str(&format!(
                "<!-- operation: {}, mode: stream -->\n\n",
                stub.operation_name
            ));
            for (index, message) in messages.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                push_labelled(out, "Message", message);
            }
        }
    }
    out.push('\n');
}

fn push_description(out: &mut String, description: &str) {
    for paragraph in description.split("\n\n") {
        let lines: Vec<String> = paragraph.split('\n').map(escape_line).collect();
        out.push_str(&lines.join("\\\n"));
        out.push_str("\n\n");
    }
}

/// Backslash-escape the characters that open inline markup (emphasis, code
/// spans, links, raw HTML, entities) or close an ATX heading.
fn escape_inline(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '&' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// [`escape_inline`], plus the block markers that only count at the start of
/// a paragraph line: bullets, quotes, setext underlines, tilde fences and
/// ordered list numbers.
fn escape_line(line: &str) -> String {
    let escaped = escape_inline(line);
    if escaped.starts_with(['-', '+', '=', '>', '~']) {
        return format!("\\{escaped}");
    }
    let digits = escaped.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && escaped[digits..].starts_with(['.', ')']) {
        return format!("{}\\{}", &escaped[..digits], &escaped[digits..]);
    }
    escaped
}

fn push_labelled(out: &mut String, label: &str, content: &str) {
    out.push_str(label);
    out.push_str(":\n");
    push_fenced(out, "json", content);
}

fn push_fenced(out: &mut String, info: &str, content: &str) {
    let fence = fence_for(content);
    out.push_str(&fence);
    out.push_str(info);
    out.push('\n');
    out.push_str(content);
    out.push('\n');
    out.push_str(&fence);
    out.push('\n');
}

/// Three backticks, or one more than the longest backtick run that opens a
/// line of `content` (such a line would otherwise close the fence early).
fn fence_for(content: &str) -> String {
    let longest = content
        .lines()
        .map(|line| line.trim_start_matches(' '))
        .map(|line| line.chars().take_while(|c| *c == '`').count())
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}
