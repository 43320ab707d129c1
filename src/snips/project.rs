// src/snips/project.rs
//! Reads a [`Project`] out of a source page's properties.

use crate::model::{Page, Project, PropertyBag, PropertyValue};
use crate::types::NotionId;

/// Builds a project from a property bag in one pass.
///
/// Any `title` property supplies the episode; `Status` (status), `Show`
/// (rich text) and `Snips` (number) fill the rest. When several properties
/// match a rule the last one in API order wins. Everything else is ignored.
pub fn extract_project(id: NotionId, properties: &PropertyBag) -> Project {
    let mut project = Project {
        id,
        status: String::new(),
        episode: String::new(),
        podcast_show: String::new(),
        snips: 0,
    };

    for (name, value) in properties {
        match (name.as_str(), value) {
            (_, PropertyValue::Title { .. }) => {
                project.episode = value.as_plain_text().unwrap_or_default();
            }
            ("Status", PropertyValue::Status { status }) => {
                project.status = status
                    .as_ref()
                    .map(|option| option.name.clone())
                    .unwrap_or_default();
            }
            ("Show", PropertyValue::RichText { .. }) => {
                project.podcast_show = value.as_plain_text().unwrap_or_default();
            }
            ("Snips", PropertyValue::Number { number }) => {
                project.snips = number.map(snip_count).unwrap_or(0);
            }
            _ => {}
        }
    }

    project
}

pub fn project_from_page(page: &Page) -> Project {
    extract_project(page.id.clone(), &page.properties)
}

fn snip_count(number: f64) -> u32 {
    if number.is_finite() && number > 0.0 {
        number.min(u32::MAX as f64) as u32
    } else {
        0
    }
}
