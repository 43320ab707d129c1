// src/youtube/transcript.rs
//! Parsing of YouTube `json3` subtitle files.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One caption line. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Turns a `json3` caption track into segments.
///
/// Events without text (window styling, bare line breaks) are dropped.
pub fn parse_json3(raw: &str) -> Result<Vec<TranscriptSegment>, AppError> {
    let document: Json3Document = serde_json::from_str(raw)?;

    Ok(document
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|seg| seg.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_become_segments() {
        let raw = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 120000, "id": 1, "wpWinPosId": 1},
                {"tStartMs": 1500, "dDurationMs": 2250, "segs": [{"utf8": "welcome "}, {"utf8": "back", "tOffsetMs": 400}]},
                {"tStartMs": 3750, "dDurationMs": 10, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 4000, "dDurationMs": 1000, "segs": [{"utf8": "to the\nshow"}]}
            ]
        }"#;

        assert_eq!(
            parse_json3(raw).unwrap(),
            vec![
                TranscriptSegment {
                    text: "welcome back".to_string(),
                    start: 1.5,
                    duration: 2.25,
                },
                TranscriptSegment {
                    text: "to the show".to_string(),
                    start: 4.0,
                    duration: 1.0,
                },
            ]
        );
    }

    #[test]
    fn garbage_is_a_malformed_response() {
        assert!(matches!(
            parse_json3("WEBVTT"),
            Err(AppError::MalformedResponse(_))
        ));
    }
}
