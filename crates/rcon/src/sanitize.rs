use std::borrow::Cow;

use crate::net::{OOB_HEADER, find_header};

/// Turns the raw bytes of an exchange into reply text.
///
/// Every out-of-band header is removed, line endings are normalized, the
/// leading `print` marker is dropped and the edges are trimmed. The result
/// is stable under a second pass.
pub fn clean(raw: &[u8]) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let joined = strip_headers(raw);
    let text = String::from_utf8_lossy(&joined);
    let text = normalize_newlines(&text);

    let mut rest: &str = &text;
    loop {
        let next = trim_edges(strip_print(rest));
        if next.len() == rest.len() {
            break;
        }
        rest = next;
    }

    rest.to_string()
}

fn strip_headers(raw: &[u8]) -> Cow<'_, [u8]> {
    if find_header(raw).is_none() {
        return Cow::Borrowed(raw);
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = find_header(rest) {
        out.extend_from_slice(&rest[..pos]);
        rest = &rest[pos + OOB_HEADER.len()..];
    }
    out.extend_from_slice(rest);
    Cow::Owned(out)
}

// Collapses "\r\n", and any run of '\r' ending in '\n', to a single '\n'.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains("\r\n") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut pending_cr = 0usize;
    for ch in text.chars() {
        match ch {
            '\r' => pending_cr += 1,
            '\n' => {
                pending_cr = 0;
                out.push('\n');
            }
            _ => {
                for _ in 0..pending_cr {
                    out.push('\r');
                }
                pending_cr = 0;
                out.push(ch);
            }
        }
    }
    for _ in 0..pending_cr {
        out.push('\r');
    }
    Cow::Owned(out)
}

fn strip_print(text: &str) -> &str {
    text.strip_prefix("print\n")
        .or_else(|| text.strip_prefix("print"))
        .unwrap_or(text)
}

fn trim_edges(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .trim_start()
}
