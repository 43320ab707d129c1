// src/export.rs
//! Copies the snips of pending episode pages into the curated database.
//!
//! Each snip becomes one "To Review" entry whose body is the snip's
//! transcript. Afterwards the source page is marked "Done" when every snip
//! was created, "In progress" otherwise.

use crate::constants::{
    NOTION_RICH_TEXT_LIMIT, PENDING_STATUS, STATUS_DONE, STATUS_IN_PROGRESS, STATUS_TO_REVIEW,
};
use crate::error::AppError;
use crate::model::{Page, PropertyValue, SnipExport};
use crate::notion::{DataSourceQuery, NotionRepository};
use crate::snips::{extract_snip_export, page_content, toggle_children, toggle_headings};
use crate::types::NotionId;
use chrono::NaiveDate;
use serde_json::{json, Value};

/// Episode-level fields copied onto every snip entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeInfo {
    pub title: String,
    pub podcast_show: String,
    pub last_snip_date: Option<NaiveDate>,
}

impl EpisodeInfo {
    pub fn from_page(page: &Page) -> Self {
        let mut info = EpisodeInfo {
            title: "Untitled".to_string(),
            podcast_show: "Untitled".to_string(),
            last_snip_date: None,
        };

        for (name, value) in &page.properties {
            match (name.as_str(), value) {
                (_, PropertyValue::Title { .. }) => {
                    info.title = value.as_plain_text().unwrap_or_default();
                }
                ("Show", PropertyValue::RichText { .. }) => {
                    info.podcast_show = value.as_plain_text().unwrap_or_default();
                }
                ("Last snip date", PropertyValue::Date { date }) => {
                    info.last_snip_date = date.as_ref().and_then(|d| d.start_date());
                }
                _ => {}
            }
        }
        info
    }
}

fn text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

fn truncate_chars(value: &str, limit: usize) -> String {
    value.chars().take(limit).collect()
}

/// Properties of the curated entry for one snip.
pub fn entry_properties(export: &SnipExport, episode: &EpisodeInfo) -> Value {
    let snip = &export.snip;
    let title = if snip.title.is_empty() {
        "Untitled Snip"
    } else {
        snip.title.as_str()
    };

    let mut properties = json!({
        "Title": { "title": text(title) },
        "Summary": { "rich_text": text(&truncate_chars(&snip.summary, NOTION_RICH_TEXT_LIMIT)) },
        "Episode": { "rich_text": text(&episode.title) },
        "Status": { "status": { "name": STATUS_TO_REVIEW } },
        "Timestamp": { "rich_text": text(&snip.timestamp) },
        "Podcast Show": { "rich_text": text(&episode.podcast_show) },
    });
    if let Some(date) = episode.last_snip_date {
        properties["Date Created"] =
            json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } });
    }
    properties
}

/// `POST pages` body creating the entry under `data_source`.
pub fn entry_body(data_source: &NotionId, export: &SnipExport, episode: &EpisodeInfo) -> Value {
    let mut body = json!({
        "parent": { "type": "data_source_id", "data_source_id": data_source.to_hyphenated() },
        "properties": entry_properties(export, episode),
    });
    let children: Vec<Value> = export
        .transcript
        .iter()
        .filter_map(|block| block.to_append_payload())
        .collect();
    if !children.is_empty() {
        body["children"] = Value::Array(children);
    }
    body
}

/// What happened to one source page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExport {
    pub page_id: NotionId,
    pub episode: String,
    pub snips_found: usize,
    pub snips_created: usize,
    pub new_status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportReport {
    pub pages: Vec<PageExport>,
}

impl ExportReport {
    pub fn snips_created(&self) -> usize {
        self.pages.iter().map(|p| p.snips_created).sum()
    }
}

/// Exports every snip of one page, then writes back the page status.
pub async fn export_page(
    notion: &dyn NotionRepository,
    target_data_source: &NotionId,
    page: &Page,
) -> PageExport {
    let episode = EpisodeInfo::from_page(page);
    log::info!("Processing page: {}", episode.title);

    let headings = toggle_headings(page_content(notion, &page.id).await);
    log::info!("  Found {} toggle headings (snips)", headings.len());

    let mut created = 0;
    for heading in &headings {
        let children = toggle_children(notion, &heading.id).await;
        let export = extract_snip_export(notion, heading, &children).await;
        let body = entry_body(target_data_source, &export, &episode);
        match notion.create_page(&body).await {
            Ok(_) => {
                created += 1;
                log::info!("  Created entry: {}", export.snip.title);
            }
            Err(e) => log::error!("  Error creating entry {:?}: {}", export.snip.title, e),
        }
    }

    let new_status = if created == headings.len() {
        STATUS_DONE
    } else {
        log::warn!(
            "  Created {} of {} snips; review errors and complete manually",
            created,
            headings.len()
        );
        STATUS_IN_PROGRESS
    };
    if let Err(e) = notion.update_page_status(&page.id, new_status).await {
        log::error!("  Error updating page status: {}", e);
    }

    PageExport {
        page_id: page.id.clone(),
        episode: episode.title,
        snips_found: headings.len(),
        snips_created: created,
        new_status,
    }
}

/// Runs the export over every pending page of `source_database`.
pub async fn run_export(
    notion: &dyn NotionRepository,
    source_database: &NotionId,
    target_database: &NotionId,
) -> Result<ExportReport, AppError> {
    let source = notion.primary_data_source(source_database).await?;
    let target = notion.primary_data_source(target_database).await?;

    let pending = notion
        .query_all(&source, &DataSourceQuery::with_status(PENDING_STATUS))
        .await?;
    log::info!("Found {} page(s) to process", pending.len());

    let mut report = ExportReport::default();
    for page in &pending {
        report.pages.push(export_page(notion, &target, page).await);
    }

    log::info!(
        "Export complete: {} pages processed, {} snips created",
        report.pages.len(),
        report.snips_created()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockKind, PropertyBag, Snip};

    fn id(n: u32) -> NotionId {
        NotionId::parse(&format!("{:032x}", n)).unwrap()
    }

    fn episode_page() -> Page {
        let properties: PropertyBag = serde_json::from_value(json!({
            "Episode": {"type": "title", "title": [{"plain_text": "Ep 7"}]},
            "Show": {"type": "rich_text", "rich_text": [{"plain_text": "Deep Dive"}]},
            "Last snip date": {"type": "date", "date": {"start": "2024-05-01"}},
            "Status": {"type": "status", "status": {"name": "Not started"}}
        }))
        .unwrap();
        Page {
            id: id(1),
            properties,
            url: None,
            archived: false,
        }
    }

    #[test]
    fn episode_info_defaults_to_untitled() {
        let page = Page {
            id: id(1),
            properties: PropertyBag::new(),
            url: None,
            archived: false,
        };
        let info = EpisodeInfo::from_page(&page);
        assert_eq!(info.title, "Untitled");
        assert_eq!(info.podcast_show, "Untitled");
        assert_eq!(info.last_snip_date, None);
    }

    #[test]
    fn date_created_drops_the_time_of_day() {
        let mut page = episode_page();
        page.properties = serde_json::from_value(json!({
            "Episode": {"type": "title", "title": [{"plain_text": "Ep 8"}]},
            "Last snip date": {"type": "date", "date": {"start": "2024-06-02T21:15:00.000+02:00"}}
        }))
        .unwrap();
        let info = EpisodeInfo::from_page(&page);
        assert_eq!(info.last_snip_date, NaiveDate::from_ymd_opt(2024, 6, 2));

        let properties = entry_properties(&SnipExport::default(), &info);
        assert_eq!(properties["Date Created"]["date"]["start"], "2024-06-02");
    }

    #[test]
    fn entry_properties_truncate_summary() {
        let export = SnipExport {
            snip: Snip {
                title: String::new(),
                summary: "é".repeat(2500),
                timestamp: "01:02".to_string(),
            },
            transcript: Vec::new(),
        };
        let episode = EpisodeInfo::from_page(&episode_page());
        let properties = entry_properties(&export, &episode);

        assert_eq!(properties["Title"]["title"][0]["text"]["content"], "Untitled Snip");
        let summary = properties["Summary"]["rich_text"][0]["text"]["content"]
            .as_str()
            .unwrap();
        assert_eq!(summary.chars().count(), 2000);
        assert_eq!(properties["Status"]["status"]["name"], "To Review");
        assert_eq!(properties["Date Created"]["date"]["start"], "2024-05-01");
        assert_eq!(properties["Podcast Show"]["rich_text"][0]["text"]["content"], "Deep Dive");
    }

    #[test]
    fn transcript_becomes_page_body() {
        let export = SnipExport {
            snip: Snip::default(),
            transcript: vec![
                Block::new(id(5), BlockKind::paragraph("line one")),
                Block::new(id(6), BlockKind::Unsupported),
            ],
        };
        let body = entry_body(&id(9), &export, &EpisodeInfo::from_page(&episode_page()));
        assert_eq!(body["parent"]["data_source_id"], id(9).to_hyphenated());
        let children = body["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["paragraph"]["rich_text"][0]["text"]["content"], "line one");
    }

    fn workspace() -> crate::notion::InMemoryNotion {
        let headings = vec![
            Block::new(id(11), BlockKind::toggle_heading("[01:00] Good snip")),
            Block::new(id(12), BlockKind::toggle_heading("[02:00] Bad snip")),
        ];
        crate::notion::InMemoryNotion::new()
            .with_database(id(100), id(101), vec![episode_page()])
            .with_database(id(200), id(201), Vec::new())
            .with_children(id(1), vec![headings])
            .with_children(
                id(11),
                vec![vec![
                    Block::new(id(21), BlockKind::paragraph("Worth keeping")),
                    Block::new(id(22), BlockKind::toggle("📚 Transcript")),
                ]],
            )
            .with_children(id(22), vec![vec![Block::new(id(23), BlockKind::paragraph("said it"))]])
    }

    #[tokio::test]
    async fn every_snip_created_marks_page_done() {
        let notion = workspace();
        let report = run_export(&notion, &id(100), &id(200)).await.unwrap();

        assert_eq!(report.snips_created(), 2);
        assert_eq!(report.pages[0].new_status, STATUS_DONE);
        let created = notion.created_pages();
        assert_eq!(created[0]["properties"]["Summary"]["rich_text"][0]["text"]["content"], "Worth keeping");
        assert_eq!(created[0]["children"][0]["paragraph"]["rich_text"][0]["text"]["content"], "said it");
        assert!(created[1].get("children").is_none());
        assert_eq!(notion.status_updates(), vec![(id(1), "Done".to_string())]);
    }

    #[tokio::test]
    async fn partial_failure_leaves_page_in_progress() {
        let notion = workspace().rejecting_pages_containing("Bad snip");
        let report = run_export(&notion, &id(100), &id(200)).await.unwrap();

        assert_eq!(report.pages[0].snips_found, 2);
        assert_eq!(report.pages[0].snips_created, 1);
        assert_eq!(notion.status_updates(), vec![(id(1), "In progress".to_string())]);
    }

    #[tokio::test]
    async fn missing_target_database_is_an_error() {
        let notion = workspace();
        assert!(run_export(&notion, &id(100), &id(999)).await.is_err());
    }
}
