//! Client-side encoders for the field map and tables.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use invex_client::{FieldMap, RemoteFormat, Table};
use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const DATA_STEM: &str = "invoice_data";
const TABLES_STEM: &str = "invoice_tables";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoded output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("{0} export is produced by the backend")]
    RequiresBackend(ExportFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Txt,
    Csv,
    Yaml,
    Xml,
    Html,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub const ALL: [Self; 8] = [
        Self::Json,
        Self::Txt,
        Self::Csv,
        Self::Yaml,
        Self::Xml,
        Self::Html,
        Self::Pdf,
        Self::Docx,
    ];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Txt => "TXT",
            Self::Csv => "CSV",
            Self::Yaml => "YAML",
            Self::Xml => "XML",
            Self::Html => "HTML",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }

    /// The backend format for exports that cannot be encoded locally.
    #[must_use]
    pub fn remote(self) -> Option<RemoteFormat> {
        match self {
            Self::Pdf => Some(RemoteFormat::Pdf),
            Self::Docx => Some(RemoteFormat::Docx),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn stamped(stem: &str, ext: &str, timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => format!("{stem}_{}.{ext}", ts.format("%Y%m%d_%H%M%S")),
        None => format!("{stem}.{ext}"),
    }
}

/// `invoice_data.<ext>`, or `invoice_data_YYYYMMDD_HHMMSS.<ext>` with a timestamp.
#[must_use]
pub fn file_name(format: ExportFormat, timestamp: Option<NaiveDateTime>) -> String {
    stamped(DATA_STEM, format.extension(), timestamp)
}

#[must_use]
pub fn tables_file_name(timestamp: Option<NaiveDateTime>) -> String {
    stamped(TABLES_STEM, "csv", timestamp)
}

/// Encode `fields` in one of the locally produced formats.
///
/// # Errors
///
/// Returns [`ExportError::RequiresBackend`] for PDF and DOCX, or an encoder error.
pub fn encode(fields: &FieldMap, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        ExportFormat::Txt | ExportFormat::Yaml => Ok(key_value_lines(fields)),
        ExportFormat::Csv => fields_csv(fields),
        ExportFormat::Xml => Ok(xml(fields)),
        ExportFormat::Html => Ok(html(fields)),
        ExportFormat::Pdf | ExportFormat::Docx => Err(ExportError::RequiresBackend(format)),
    }
}

fn key_value_lines(fields: &FieldMap) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Csv(error.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Header row of labels and one row of values, without a trailing newline.
fn fields_csv(fields: &FieldMap) -> Result<String, ExportError> {
    if fields.is_empty() {
        return Ok("\n".to_owned());
    }
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::<u8>::new());
    writer.write_record(fields.labels())?;
    writer.write_record(fields.iter().map(|(_, v)| v))?;
    let mut out = finish(writer)?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Every cell quoted, a blank line after each table.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn encode_tables_csv(tables: &[Table]) -> Result<String, ExportError> {
    let mut out = String::new();
    for table in tables {
        for row in table {
            if row.is_empty() {
                out.push('\n');
                continue;
            }
            let mut writer = WriterBuilder::new()
                .quote_style(QuoteStyle::Always)
                .terminator(Terminator::Any(b'\n'))
                .from_writer(Vec::<u8>::new());
            writer.write_record(row)?;
            out.push_str(&finish(writer)?);
        }
        out.push('\n');
    }
    Ok(out)
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_html(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Element name for a label: each whitespace run becomes `_`.
#[must_use]
pub fn xml_element_name(label: &str) -> String {
    WHITESPACE_RUN.replace_all(label, "_").into_owned()
}

fn xml(fields: &FieldMap) -> String {
    let mut out = String::from("<invoice>\n");
    for (label, value) in fields.iter() {
        let name = xml_element_name(label);
        let _ = writeln!(out, "  <{name}>{}</{name}>", escape_text(value));
    }
    out.push_str("</invoice>");
    out
}

fn html(fields: &FieldMap) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Invoice Data Export</title>\n<style>\n\
         body { font-family: Arial, sans-serif; margin: 40px; }\n\
         h1 { color: #1E3A8A; text-align: center; }\n\
         .field { margin-bottom: 10px; }\n\
         .label { font-weight: bold; }\n\
         </style>\n</head>\n<body>\n<h1>Invoice Data Export</h1>\n",
    );
    for (label, value) in fields.iter() {
        let _ = writeln!(
            out,
            "<div class='field'><span class='label'>{}:</span> {}</div>",
            escape_html(label),
            escape_html(value)
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}
