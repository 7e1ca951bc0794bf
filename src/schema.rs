//! Declarative description of the BaaS project this client talks to, and the
//! wire records exchanged with it.
//!
//! The table declaration is provisioning documentation for the hosted
//! service; nothing here enforces it beyond deriving endpoint paths from the
//! table names.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Json,
}

impl FieldType {
    fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
    pub indexed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub fields: &'static [Field],
}

const fn field(name: &'static str, kind: FieldType) -> Field {
    Field {
        name,
        kind,
        indexed: true,
    }
}

pub const VIDEO_TABLE: Table = Table {
    name: "video",
    fields: &[
        field("prompt", FieldType::String),
        field("description", FieldType::String),
        field("content", FieldType::String),
        field("metadata", FieldType::Json),
    ],
};

pub const PROMPTS_TABLE: Table = Table {
    name: "prompts",
    fields: &[
        field("topic", FieldType::String),
        field("output", FieldType::String),
    ],
};

pub const TABLES: [Table; 2] = [VIDEO_TABLE, PROMPTS_TABLE];

impl Table {
    /// Collection endpoint under a `{base}/account/{project}/db` URL.
    pub fn endpoint(&self, db_url: &str) -> String {
        format!("{}/{}", db_url.trim_end_matches('/'), self.name)
    }
}

/// The provisioning document, in the shape the hosted service expects.
pub fn project_schema(project_id: &str) -> Value {
    let mut tables = serde_json::Map::new();
    for table in TABLES {
        let mut fields = serde_json::Map::new();
        for f in table.fields {
            fields.insert(
                f.name.to_string(),
                json!({ "type": f.kind.as_str(), "indexed": f.indexed }),
            );
        }
        tables.insert(
            table.name.to_string(),
            json!({ "type": "collection", "fields": fields }),
        );
    }
    json!({
        "project_id": project_id,
        "tables": tables,
        "version": SCHEMA_VERSION,
    })
}

// --- Wire records ---

/// A row of the `video` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub prompt: String,
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

/// A row of the `prompts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub topic: String,
    pub output: String,
    pub top_text: String,
    pub bottom_text: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row<T> {
    pub value: T,
}

/// `GET {table}` response. Only the wrapped form is accepted; rows are kept
/// raw and decoded one by one with [`ListResponse::rows`].
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub data: Vec<Value>,
}

impl ListResponse {
    /// Decodes each row independently so a malformed row only costs itself.
    pub fn rows<T: DeserializeOwned>(self) -> impl Iterator<Item = serde_json::Result<T>> {
        self.data
            .into_iter()
            .map(|raw| serde_json::from_value::<Row<T>>(raw).map(|row| row.value))
    }
}

/// `POST {table}` response echoing the stored row.
#[derive(Debug, Deserialize)]
pub struct WriteResponse<T> {
    pub data: Row<T>,
}

/// Body of the local generation endpoint.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub topic: &'a str,
}

/// The local endpoint returns the model output as a JSON string.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDescription {
    pub video_description: String,
    pub top_text: String,
    pub bottom_text: String,
}
