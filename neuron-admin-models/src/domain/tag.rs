use crate::{
    constants::FIRST_DATA_ROW,
    enums::tag::{TagAttribute, TagType},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// One untyped row of an uploaded tag sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTagRow {
    /// 1-based spreadsheet row number (the header is row 1)
    pub row: usize,
    /// Column key -> cell value; empty cells are absent
    pub values: Map<String, Json>,
}

impl RawTagRow {
    #[inline]
    pub fn new(row: usize, values: Map<String, Json>) -> Self {
        Self { row, values }
    }

    /// Number rows consecutively from the first data row.
    pub fn numbered(rows: Vec<Map<String, Json>>) -> Vec<Self> {
        rows.into_iter()
            .enumerate()
            .map(|(idx, values)| Self::new(idx + FIRST_DATA_ROW, values))
            .collect()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.values.get(key)
    }

    /// Group column rendered as text; absent or empty groups map to `""`.
    pub fn group(&self) -> String {
        self.get("group").and_then(scalar_to_string).unwrap_or_default()
    }
}

/// Rows sharing one group name, in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub group: String,
    pub rows: Vec<RawTagRow>,
}

/// One configured data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub group: String,
    pub name: String,
    pub address: String,
    pub attribute: TagAttribute,
    pub r#type: TagType,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Present only for static tags, always numeric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Number>,
}

/// A group name plus its validated tags, the unit of submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportBatch {
    pub group: String,
    pub tags: Vec<TagRecord>,
}

/// Body of the tag upload endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AddTagsRequest<'a> {
    pub node: &'a str,
    pub group: &'a str,
    pub tags: &'a [TagRecord],
}

/// Render a scalar cell as text: strings as-is, numbers and booleans via
/// their display form. Empty strings, `null`, arrays and objects yield `None`.
pub fn scalar_to_string(value: &Json) -> Option<String> {
    match value {
        Json::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
