//! Request shapes and the single decode step for record lists.
//!
//! Record lists may arrive already structured or as a JSON string. Both are
//! turned into one typed `Vec<InputRecord>` here, before anything reaches
//! the engine.

use serde::{Deserialize, Serialize};
use sheetline_engine::engine::{InputRecord, OutputMode, StyleOverrides};

/// Positional `[sheet?, from?, to?]` range segments as sent by callers.
pub type RangeSegments = Vec<Option<String>>;

/// Parameters of a read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadQuery {
    pub id: String,
    #[serde(rename = "type", default)]
    pub mode: OutputMode,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub range: RangeSegments,
}

/// Where appended rows go: the header is read from `sheet_name`, rows are
/// appended to the sheet identified by `sheet_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendQuery {
    pub id: String,
    pub sheet_id: u32,
    pub sheet_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppendBody {
    pub data: RecordList,
    #[serde(default)]
    pub props: Option<StyleOverrides>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuery {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateBody {
    pub data: UpdatePayload,
}

/// Target range and the records to write there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateData {
    #[serde(default)]
    pub range: RangeSegments,
    pub values: RecordList,
}

/// An update payload, structured or JSON-encoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdatePayload {
    Structured(UpdateData),
    Encoded(String),
}

impl UpdatePayload {
    pub fn decode(self) -> Result<UpdateData, serde_json::Error> {
        match self {
            UpdatePayload::Structured(data) => Ok(data),
            UpdatePayload::Encoded(text) => serde_json::from_str(&text),
        }
    }
}

/// A list of records, structured or JSON-encoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordList {
    Records(Vec<InputRecord>),
    Encoded(String),
}

impl RecordList {
    pub fn decode(self) -> Result<Vec<InputRecord>, serde_json::Error> {
        match self {
            RecordList::Records(records) => Ok(records),
            RecordList::Encoded(text) => serde_json::from_str(&text),
        }
    }
}

impl From<Vec<InputRecord>> for RecordList {
    fn from(records: Vec<InputRecord>) -> Self {
        RecordList::Records(records)
    }
}

/// True when no segment carries a non-empty value.
pub fn range_is_blank(range: &[Option<String>]) -> bool {
    range
        .iter()
        .all(|s| s.as_deref().is_none_or(str::is_empty))
}
