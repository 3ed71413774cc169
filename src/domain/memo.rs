//! Memo records and their embedded style.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(FontWeight::Normal),
            "bold" => Some(FontWeight::Bold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation attributes of a memo. Stored as a single JSON column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoStyle {
    /// Text color, `#RRGGBB`.
    #[schema(example = "#2C1810")]
    pub color: String,
    /// Pixel size as sent by the client, e.g. `"32px"`.
    #[schema(example = "32px")]
    pub font_size: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
}

/// A validated, sanitized memo that has not been stored yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertMemo {
    pub content: String,
    pub styles: MemoStyle,
    #[schema(example = "#FFF8E1")]
    pub bg_color: String,
}

/// A memo as persisted by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: String,
    pub content: String,
    pub styles: MemoStyle,
    pub bg_color: String,
    pub created_at: DateTime<Utc>,
}

impl Memo {
    /// Attaches store-assigned identity to an insert record.
    pub fn from_insert(insert: InsertMemo, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content: insert.content,
            styles: insert.styles,
            bg_color: insert.bg_color,
            created_at,
        }
    }
}
