//! Whitespace collapsing
//!
//! Applied to the children of every container once they are built:
//! whitespace runs in text collapse to one space, text is trimmed where it
//! meets a block boundary, and text left empty is removed. Text whose
//! inherited `whiteSpace` preserves spacing is left as is.

use tre_css::user_agent::is_block_tag;

use crate::tree::TransientNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Collapse,
    /// `pre-line`: spaces collapse, newlines stay
    KeepNewlines,
    Preserve,
}

fn mode(node: &TransientNode) -> Mode {
    match node.computed.get("whiteSpace").and_then(|v| v.as_text()) {
        Some("pre") | Some("pre-wrap") | Some("break-spaces") => Mode::Preserve,
        Some("pre-line") => Mode::KeepNewlines,
        _ => Mode::Collapse,
    }
}

/// Whether a node starts a new line box
pub(crate) fn is_block(node: &TransientNode) -> bool {
    if !node.is_element() {
        return false;
    }
    match node.computed.get("display").and_then(|v| v.as_text()) {
        Some("block") | Some("flex") | Some("grid") | Some("list-item") | Some("table") => true,
        Some(_) => false,
        None => node.tag().is_some_and(is_block_tag),
    }
}

/// Collapse whitespace among `children`
///
/// `block_container` tells whether the first and last children sit at a
/// line boundary.
pub(crate) fn collapse_children(children: &mut Vec<TransientNode>, block_container: bool) {
    for child in children.iter_mut() {
        let keep_newlines = match mode(child) {
            Mode::Preserve => continue,
            Mode::KeepNewlines => true,
            Mode::Collapse => false,
        };
        if let Some(data) = child.data.as_mut() {
            *data = collapse(data, keep_newlines);
        }
    }

    let len = children.len();
    let mut prev_ends_with_space = false;
    for i in 0..len {
        if !children[i].is_text() {
            prev_ends_with_space = false;
            continue;
        }
        if mode(&children[i]) == Mode::Preserve {
            prev_ends_with_space = false;
            continue;
        }
        let at_start = if i == 0 { block_container } else { is_block(&children[i - 1]) };
        let at_end = if i + 1 == len { block_container } else { is_block(&children[i + 1]) };

        if let Some(data) = children[i].data.as_mut() {
            if at_start || prev_ends_with_space {
                let cut = data.len() - data.trim_start_matches(' ').len();
                data.replace_range(..cut, "");
            }
            if at_end {
                let keep = data.trim_end_matches(' ').len();
                data.truncate(keep);
            }
            if !data.is_empty() {
                prev_ends_with_space = data.ends_with(' ');
            }
        }
    }

    children.retain(|child| !child.is_text() || child.text().is_some_and(|t| !t.is_empty()));
}

fn collapse(text: &str, keep_newlines: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if keep_newlines && c == '\n' {
            out.push('\n');
            pending_space = false;
        } else if c.is_ascii_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.ends_with('\n') {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    if pending_space && !out.ends_with('\n') {
        out.push(' ');
    }
    out
}
