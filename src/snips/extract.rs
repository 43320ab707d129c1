// src/snips/extract.rs
//! Turns one toggle heading and its children into a [`Snip`].

use super::walker::toggle_children;
use crate::constants::{PLAY_SNIP_MARKER, TRANSCRIPT_MARKER};
use crate::model::{Block, BlockKind, Snip, SnipExport};
use crate::notion::NotionRepository;

/// The text between the first `[` and the first `]` of a title.
///
/// Returns `""` when either bracket is missing or they are reversed. The
/// content itself is not validated.
pub fn extract_timestamp(title: &str) -> String {
    match (title.find('['), title.find(']')) {
        (Some(open), Some(close)) if close > open => title[open + 1..close]
            .trim_matches(|c| c == '[' || c == ']')
            .to_string(),
        _ => String::new(),
    }
}

/// Title of a snip heading; empty for anything that is not a `heading_3`.
fn heading_title(heading: &Block) -> String {
    match &heading.kind {
        BlockKind::Heading3 { .. } => heading.plain_text(),
        _ => String::new(),
    }
}

/// Summary line contributed by one child block, if any.
fn summary_part(child: &Block) -> Option<String> {
    match &child.kind {
        BlockKind::Paragraph { .. } => {
            let text = child.plain_text();
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.contains(PLAY_SNIP_MARKER) {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        BlockKind::BulletedListItem { .. } => Some(child.plain_text().trim().to_string()),
        _ => None,
    }
}

fn snip_from_parts(heading: &Block, parts: Vec<String>) -> Snip {
    let title = heading_title(heading);
    Snip {
        timestamp: extract_timestamp(&title),
        title,
        summary: parts.join("\n"),
    }
}

/// The task-summary view of a snip. Nested toggles are skipped entirely.
pub fn extract_snip(heading: &Block, children: &[Block]) -> Snip {
    let parts = children.iter().filter_map(summary_part).collect();
    snip_from_parts(heading, parts)
}

/// The export view of a snip: the summary plus the verbatim children of its
/// transcript toggle.
///
/// Only a toggle whose text contains the transcript marker is opened; any
/// other toggle is skipped. If several transcript toggles exist the last one
/// wins.
pub async fn extract_snip_export(
    repo: &dyn NotionRepository,
    heading: &Block,
    children: &[Block],
) -> SnipExport {
    let mut parts = Vec::new();
    let mut transcript_toggle = None;

    for child in children {
        match &child.kind {
            BlockKind::Toggle { .. } => {
                if child.plain_text().contains(TRANSCRIPT_MARKER) {
                    transcript_toggle = Some(&child.id);
                }
            }
            _ => parts.extend(summary_part(child)),
        }
    }

    let transcript = match transcript_toggle {
        Some(id) => toggle_children(repo, id).await,
        None => Vec::new(),
    };

    SnipExport {
        snip: snip_from_parts(heading, parts),
        transcript,
    }
}
