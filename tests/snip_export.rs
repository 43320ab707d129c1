// tests/snip_export.rs
//! Snip extraction and the export job over fixture pages.

use podsnips::model::Block;
use podsnips::notion::PaginatedResponse;
use podsnips::snips::{extract_snip, extract_snip_export, toggle_headings};
use podsnips::{run_export, InMemoryNotion, NotionId, Page};
use pretty_assertions::assert_eq;

fn blocks(fixture: &str) -> Vec<Block> {
    let listing: PaginatedResponse<Block> =
        serde_json::from_str(fixture).expect("fixture should parse");
    listing.results
}

fn id(raw: &str) -> NotionId {
    NotionId::parse(raw).unwrap()
}

fn episode_headings() -> Vec<Block> {
    let mut all = blocks(include_str!("fixtures/api_responses/episode_blocks_page1.json"));
    all.extend(blocks(include_str!("fixtures/api_responses/episode_blocks_page2.json")));
    toggle_headings(all)
}

fn pending_pages() -> Vec<Page> {
    let listing: PaginatedResponse<Page> =
        serde_json::from_str(include_str!("fixtures/api_responses/pending_pages.json")).unwrap();
    listing.results
}

/// The first pending episode with both snips and a transcript under the first.
fn workspace() -> InMemoryNotion {
    let headings = episode_headings();
    InMemoryNotion::new()
        .with_database(
            id("2b3c4d5e-0000-4000-8000-000000000001"),
            id("2b3c4d5e-0000-4000-8000-000000000002"),
            pending_pages().into_iter().take(1).collect(),
        )
        .with_database(
            id("3c4d5e6f-0000-4000-8000-000000000001"),
            id("3c4d5e6f-0000-4000-8000-000000000002"),
            Vec::new(),
        )
        .with_children(id("1a2b3c4d-0000-4000-8000-000000000001"), vec![headings])
        .with_children(
            id("1a2b3c4d-0000-4000-8000-0000000000a1"),
            vec![blocks(include_str!("fixtures/api_responses/snip_children.json"))],
        )
        .with_children(
            id("1a2b3c4d-0000-4000-8000-0000000000c4"),
            vec![blocks(include_str!("fixtures/api_responses/transcript_children.json"))],
        )
}

#[test]
fn summary_skips_play_links_and_nested_toggles() {
    let headings = episode_headings();
    let children = blocks(include_str!("fixtures/api_responses/snip_children.json"));

    let snip = extract_snip(&headings[0], &children);
    assert_eq!(snip.title, "[12:34] Key insight");
    assert_eq!(snip.timestamp, "12:34");
    assert_eq!(snip.summary, "Great point about X\n- detail");
}

#[test]
fn heading_without_brackets_has_empty_timestamp() {
    let heading: Block = serde_json::from_value(serde_json::json!({
        "id": "1a2b3c4d-0000-4000-8000-0000000000f1",
        "type": "heading_3",
        "heading_3": {"rich_text": [{"plain_text": "No timestamp here"}], "is_toggleable": true}
    }))
    .unwrap();
    let snip = extract_snip(&heading, &[]);
    assert_eq!(snip.timestamp, "");
    assert_eq!(snip.summary, "");
}

#[tokio::test]
async fn export_view_captures_the_transcript() {
    let notion = workspace();
    let headings = episode_headings();
    let children = blocks(include_str!("fixtures/api_responses/snip_children.json"));

    let export = extract_snip_export(&notion, &headings[0], &children).await;
    assert_eq!(export.snip.summary, "Great point about X\n- detail");
    let lines: Vec<String> = export.transcript.iter().map(Block::plain_text).collect();
    assert_eq!(lines, vec!["Host: So what changed your mind?", "Guest: Mostly the data."]);
}

#[tokio::test]
async fn export_creates_one_entry_per_snip() {
    let notion = workspace();
    let report = run_export(
        &notion,
        &id("2b3c4d5e-0000-4000-8000-000000000001"),
        &id("3c4d5e6f-0000-4000-8000-000000000001"),
    )
    .await
    .unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].episode, "Why habits stick");
    assert_eq!(report.snips_created(), 2);

    let created = notion.created_pages();
    let first = &created[0];
    assert_eq!(
        first["parent"]["data_source_id"],
        "3c4d5e6f-0000-4000-8000-000000000002"
    );
    assert_eq!(first["properties"]["Title"]["title"][0]["text"]["content"], "[12:34] Key insight");
    assert_eq!(first["properties"]["Timestamp"]["rich_text"][0]["text"]["content"], "12:34");
    assert_eq!(first["properties"]["Episode"]["rich_text"][0]["text"]["content"], "Why habits stick");
    assert_eq!(first["properties"]["Podcast Show"]["rich_text"][0]["text"]["content"], "Deep Dive");
    assert_eq!(first["properties"]["Date Created"]["date"]["start"], "2025-03-09");
    assert_eq!(first["properties"]["Status"]["status"]["name"], "To Review");
    assert_eq!(first["children"].as_array().unwrap().len(), 2);
    assert_eq!(first["children"][1]["type"], "quote");
    let spans = &first["children"][0]["paragraph"]["rich_text"];
    assert_eq!(spans[0]["annotations"]["bold"], true);
    assert_eq!(spans[1]["text"]["content"], "So what changed your mind?");

    assert_eq!(
        notion.status_updates(),
        vec![(id("1a2b3c4d-0000-4000-8000-000000000001"), "Done".to_string())]
    );
}

#[tokio::test]
async fn failed_entry_leaves_the_episode_in_progress() {
    let notion = workspace().rejecting_pages_containing("Second thought");
    let report = run_export(
        &notion,
        &id("2b3c4d5e-0000-4000-8000-000000000001"),
        &id("3c4d5e6f-0000-4000-8000-000000000001"),
    )
    .await
    .unwrap();

    assert_eq!(report.pages[0].snips_found, 2);
    assert_eq!(report.pages[0].snips_created, 1);
    assert_eq!(report.pages[0].new_status, "In progress");
    assert_eq!(notion.created_pages().len(), 1);
}
