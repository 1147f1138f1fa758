//! Request and response shapes of the extraction backend.

use std::path::Path;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render an arbitrary JSON value as display text.
///
/// Strings are taken verbatim, `null` becomes empty, numbers and booleans use their
/// literal form, arrays and objects are compact JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Extracted label → value pairs, kept in the order the backend delivered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `label`. An existing label keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let label = label.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((label, value));
        None
    }

    /// Overwrite the value of an existing label. Unknown labels are left alone.
    pub fn set(&mut self, label: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    #[must_use]
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(l, _)| l.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON object, stringifying non-string values.
    #[must_use]
    pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Self {
        let mut map = Self::new();
        for (label, value) in object {
            map.insert(label.clone(), value_text(value));
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, value) in iter {
            map.insert(label, value);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_json_object(&object))
    }
}

/// One extracted table: rows of cells, row 0 being the header.
pub type Table = Vec<Vec<String>>;

/// Tables found on one page of a multi-page document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageTables {
    #[serde(default, deserialize_with = "lenient_tables")]
    pub tables: Vec<Table>,
}

/// Table cells may arrive as `null` or numbers; normalize them to text.
pub(crate) fn lenient_tables<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Table>, D::Error> {
    let raw = Option::<Vec<Vec<Vec<Value>>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|table| {
            table
                .into_iter()
                .map(|row| row.iter().map(value_text).collect())
                .collect()
        })
        .collect())
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uploaded {
    /// A single image, addressed by its server-side name.
    Image { filename: String },
    /// A multi-page document rasterized into page images.
    Paged { pdf_id: String, images: Vec<String> },
}

/// A local file ready to be sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read `path` from disk, naming the part after the file's base name.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }

    /// Best-effort MIME type from the file extension.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

/// One completed question/answer pair as sent in `chat_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub ai: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub filename: Option<String>,
    pub pdf_id: Option<String>,
    pub query: String,
    pub chat_history: Vec<ChatTurn>,
}

/// Raw assistant reply; interpretation of missing fields is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Image bytes returned by the bounding-box endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Export formats produced by the backend rather than locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteFormat {
    Pdf,
    Docx,
}

impl RemoteFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FraudReport {
    #[serde(default)]
    pub is_fraud: bool,
    #[serde(default)]
    pub flags: Vec<String>,
}
