use crate::types::{extract_plain_text, RichTextItem};
use serde::{Deserialize, Serialize};

/// A page property value, keyed by the Notion `type` discriminant.
///
/// Property types this service never reads collapse into `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextItem>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextItem>,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Status {
        #[serde(default)]
        status: Option<SelectOption>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl PropertyValue {
    /// Plain text of a title or rich text property; `None` for other types.
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title { title } => Some(extract_plain_text(title)),
            PropertyValue::RichText { rich_text } => Some(extract_plain_text(rich_text)),
            _ => None,
        }
    }
}

/// Option of a select or status property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Value of a date property. `start` is either a date or a date-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

impl DateValue {
    /// The calendar date of `start`, ignoring any time component.
    pub fn start_date(&self) -> Option<chrono::NaiveDate> {
        let date_part = self.start.get(..10)?;
        chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_with_null_option() {
        let value: PropertyValue =
            serde_json::from_str(r#"{"id": "x", "type": "status", "status": null}"#).unwrap();
        assert_eq!(value, PropertyValue::Status { status: None });
    }

    #[test]
    fn unknown_types_are_kept_as_unknown() {
        let value: PropertyValue = serde_json::from_str(
            r#"{"id": "y", "type": "people", "people": [{"object": "user", "id": "u1"}]}"#,
        )
        .unwrap();
        assert_eq!(value, PropertyValue::Unknown);
        assert_eq!(value.as_plain_text(), None);
    }

    #[test]
    fn date_start_rejects_garbage() {
        let date = DateValue {
            start: "soon".to_string(),
            end: None,
        };
        assert_eq!(date.start_date(), None);
    }

    #[test]
    fn date_start_accepts_date_times() {
        let date = DateValue {
            start: "2025-03-09T18:21:00.000+00:00".to_string(),
            end: None,
        };
        assert_eq!(
            date.start_date(),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 9)
        );
    }
}
