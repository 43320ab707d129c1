// src/snips/mod.rs
//! Snip extraction: from a Snipd episode page to typed highlight records.
//!
//! A source page holds one collapsible `heading_3` per highlight. The
//! heading text carries the title and a bracketed timestamp, its children
//! carry the summary paragraphs, bullet points and a transcript toggle.

pub mod extract;
pub mod pagination;
pub mod project;
pub mod walker;

pub use extract::{extract_snip, extract_snip_export, extract_timestamp};
pub use pagination::{paginate_tasks, PageWindow};
pub use project::{extract_project, project_from_page};
pub use walker::{page_content, toggle_children, toggle_headings};
