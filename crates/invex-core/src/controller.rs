//! State transitions.
//!
//! [`update`] turns a user [`Action`] into state changes plus the [`Effect`]s to run;
//! [`apply`] folds a backend [`Completion`] back into the state. Neither performs I/O.

use std::path::{Path, PathBuf};

use invex_client::{
    ChatReply, ChatRequest, ClientError, FieldMap, FraudReport, PageTables, RemoteFormat,
    RenderedImage, Table, Uploaded,
};

use crate::document::{self, Document, PageSet};
use crate::export::{self, ExportFormat};
use crate::preferences::Preferences;
use crate::sequence::{Lane, Ticket};
use crate::state::{AppState, AssistantReply, FraudVerdict, Preview, Progress, StatusKind};
use crate::tables::{EditError, TableSet};

pub const MSG_BAD_FILE: &str = "Please upload an image or PDF file.";
pub const MSG_UPLOADING: &str = "Uploading invoice...";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed.";
pub const MSG_THINKING: &str = "Thinking...";
pub const MSG_NO_ANSWER: &str = "No answer.";
pub const MSG_ASSISTANT_FAILED: &str = "AI Assistant failed.";
pub const MSG_NO_SUMMARY: &str = "No summary available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionModel {
    Dataset,
    Ai,
}

impl ExtractionModel {
    fn running(self) -> &'static str {
        match self {
            Self::Dataset => "Extracting with dataset model...",
            Self::Ai => "Extracting with AI model...",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Dataset => "Extraction complete!",
            Self::Ai => "AI extraction complete!",
        }
    }

    fn failed(self) -> &'static str {
        match self {
            Self::Dataset => "Extraction failed.",
            Self::Ai => "AI extraction failed.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectFile(PathBuf),
    PrevPage,
    NextPage,
    Extract(ExtractionModel),
    ShowBoxes,
    Ask(String),
    Search(String),
    EditField {
        label: String,
        value: String,
    },
    EditCell {
        table: usize,
        row: usize,
        col: usize,
        value: String,
    },
    ExtractTablesPage,
    ExtractTablesAll,
    Export(ExportFormat),
    ExportTablesCsv,
    Summarize,
    DetectFraud,
    ToggleTheme,
}

/// A backend call to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Upload(PathBuf),
    Extract {
        model: ExtractionModel,
        filename: String,
    },
    ShowBoxes {
        filename: String,
    },
    Chat {
        turn: usize,
        request: ChatRequest,
    },
    TablesPage {
        pdf_id: String,
        page: usize,
    },
    TablesAll {
        pdf_id: String,
    },
    Export {
        fields: FieldMap,
        format: RemoteFormat,
    },
    Summarize {
        fields: FieldMap,
    },
    DetectFraud {
        fields: FieldMap,
    },
}

/// Result of a [`Request`].
#[derive(Debug)]
pub enum Reply {
    Uploaded(Result<Uploaded, ClientError>),
    Extracted {
        model: ExtractionModel,
        result: Result<FieldMap, ClientError>,
    },
    Boxes(Result<RenderedImage, ClientError>),
    Chat {
        turn: usize,
        result: Result<ChatReply, ClientError>,
    },
    TablesPage(Result<Vec<Table>, ClientError>),
    TablesAll(Result<Vec<PageTables>, ClientError>),
    Exported {
        format: RemoteFormat,
        result: Result<Vec<u8>, ClientError>,
    },
    Summary(Result<Option<String>, ClientError>),
    Fraud(Result<FraudReport, ClientError>),
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub reply: Reply,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Request { ticket: Ticket, request: Request },
    /// Save `bytes` under `file_name` in the export directory.
    Download { file_name: String, bytes: Vec<u8> },
    SavePreferences(Preferences),
}

fn request(state: &mut AppState, lane: Lane, request: Request) -> Vec<Effect> {
    let ticket = state.guard.issue(lane);
    tracing::debug!(?lane, seq = ticket.seq, "issuing request");
    vec![Effect::Request { ticket, request }]
}

fn timestamp(state: &AppState) -> Option<chrono::NaiveDateTime> {
    state
        .settings
        .timestamped_names
        .then(|| chrono::Local::now().naive_local())
}

fn message_or(err: &ClientError, default: &str) -> String {
    err.backend_message().unwrap_or(default).to_owned()
}

pub fn update(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::SelectFile(path) => select_file(state, path),
        Action::PrevPage => turn_page(state, PageSet::prev),
        Action::NextPage => turn_page(state, PageSet::next),
        Action::Extract(model) => {
            let Some(filename) = state.document.filename().map(str::to_owned) else {
                return Vec::new();
            };
            state.set_status(model.running(), StatusKind::Processing);
            state.extractions_in_flight += 1;
            request(state, Lane::Extraction, Request::Extract { model, filename })
        }
        Action::ShowBoxes => {
            let Some(filename) = state.document.filename().map(str::to_owned) else {
                return Vec::new();
            };
            state.set_status("Fetching bounding boxes...", StatusKind::Processing);
            request(state, Lane::Preview, Request::ShowBoxes { filename })
        }
        Action::Ask(question) => ask(state, &question),
        Action::Search(query) => {
            search(state, &query);
            Vec::new()
        }
        Action::EditField { label, value } => {
            if let Err(e) = edit_field(state, &label, value) {
                tracing::warn!("rejected field edit: {e}");
            }
            Vec::new()
        }
        Action::EditCell {
            table,
            row,
            col,
            value,
        } => {
            if let Err(e) = edit_cell(state, table, row, col, value) {
                tracing::warn!("rejected cell edit: {e}");
            }
            Vec::new()
        }
        Action::ExtractTablesPage => {
            let Some(pages) = state.document.pages() else {
                return Vec::new();
            };
            let req = Request::TablesPage {
                pdf_id: pages.pdf_id().to_owned(),
                page: pages.current(),
            };
            request(state, Lane::Tables, req)
        }
        Action::ExtractTablesAll => {
            let Some(pdf_id) = state.document.pdf_id().map(str::to_owned) else {
                return Vec::new();
            };
            request(state, Lane::Tables, Request::TablesAll { pdf_id })
        }
        Action::Export(format) => export_fields(state, format),
        Action::ExportTablesCsv => export_tables(state),
        Action::Summarize => {
            let fields = state.fields.clone();
            request(state, Lane::Summary, Request::Summarize { fields })
        }
        Action::DetectFraud => {
            let fields = state.fields.clone();
            request(state, Lane::Fraud, Request::DetectFraud { fields })
        }
        Action::ToggleTheme => {
            state.theme = state.theme.toggled();
            state.preferences.theme = Some(state.theme);
            vec![Effect::SavePreferences(state.preferences.clone())]
        }
    }
}

fn select_file(state: &mut AppState, path: PathBuf) -> Vec<Effect> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !document::is_accepted(&name) {
        state.set_status(MSG_BAD_FILE, StatusKind::Error);
        return Vec::new();
    }
    if !document::is_pdf(&name) {
        state.preview = Preview::LocalFile(path.clone());
    }
    state.set_status(MSG_UPLOADING, StatusKind::Processing);
    state.progress = Some(Progress {
        percent: 0,
        label: "Uploading...".into(),
    });
    state.uploads_in_flight += 1;
    request(state, Lane::Upload, Request::Upload(path))
}

fn turn_page(state: &mut AppState, step: fn(&mut PageSet) -> bool) -> Vec<Effect> {
    let base_url = state.settings.base_url.clone();
    let Some(pages) = state.document.pages_mut() else {
        return Vec::new();
    };
    if step(pages) {
        state.preview = Preview::Remote(pages.image_url(&base_url));
        // A boxes image requested for the previous page is stale now.
        state.guard.invalidate(&[Lane::Preview]);
    }
    Vec::new()
}

fn ask(state: &mut AppState, question: &str) -> Vec<Effect> {
    if !state.document.is_loaded() {
        return Vec::new();
    }
    let question = question.trim();
    if question.is_empty() {
        return Vec::new();
    }
    let turn = state.transcript.push_pending(question);
    state.reply = Some(AssistantReply {
        text: MSG_THINKING.into(),
        confidence: None,
    });
    let chat = ChatRequest {
        session_id: state.session_id().to_owned(),
        filename: state.document.filename().map(str::to_owned),
        pdf_id: state.document.pdf_id().map(str::to_owned),
        query: question.to_owned(),
        chat_history: state.transcript.history_before(turn),
    };
    request(
        state,
        Lane::Chat,
        Request::Chat {
            turn,
            request: chat,
        },
    )
}

/// Highlight fields matching `query` and report how many matched.
///
/// Returns `None` for a blank query, which changes nothing.
pub fn search(state: &mut AppState, query: &str) -> Option<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    state.highlight = Some(query);
    let matches = state
        .fields
        .iter()
        .filter(|(label, value)| state.is_highlighted(label, value))
        .count();
    if matches == 0 {
        state.set_status("No matches found", StatusKind::Info);
    } else {
        state.set_status(format!("Found {matches} matches"), StatusKind::Success);
    }
    Some(matches)
}

/// Overwrite the value of an existing field.
///
/// # Errors
///
/// Returns [`EditError::UnknownField`] if `label` is not in the field map.
pub fn edit_field(state: &mut AppState, label: &str, value: String) -> Result<(), EditError> {
    if state.fields.set(label, value) {
        Ok(())
    } else {
        Err(EditError::UnknownField(label.to_owned()))
    }
}

/// Overwrite one body cell of the extracted tables.
///
/// # Errors
///
/// Returns an [`EditError`] for header cells and out-of-range coordinates.
pub fn edit_cell(
    state: &mut AppState,
    table: usize,
    row: usize,
    col: usize,
    value: String,
) -> Result<(), EditError> {
    match state.tables.as_mut() {
        Some(tables) => tables.set_cell(table, row, col, value),
        None => Err(EditError::OutOfRange { table, row, col }),
    }
}

fn export_fields(state: &mut AppState, format: ExportFormat) -> Vec<Effect> {
    if let Some(remote) = format.remote() {
        let fields = state.fields.clone();
        return request(
            state,
            Lane::Export(remote),
            Request::Export {
                fields,
                format: remote,
            },
        );
    }
    match export::encode(&state.fields, format) {
        Ok(content) => vec![Effect::Download {
            file_name: export::file_name(format, timestamp(state)),
            bytes: content.into_bytes(),
        }],
        Err(e) => {
            tracing::warn!("{format} export failed: {e}");
            state.set_status(format!("{format} export failed."), StatusKind::Error);
            Vec::new()
        }
    }
}

fn export_tables(state: &mut AppState) -> Vec<Effect> {
    let Some(tables) = state.tables.as_ref().filter(|t| !t.is_empty()) else {
        return Vec::new();
    };
    match export::encode_tables_csv(tables.tables()) {
        Ok(content) => vec![Effect::Download {
            file_name: export::tables_file_name(timestamp(state)),
            bytes: content.into_bytes(),
        }],
        Err(e) => {
            tracing::warn!("tables export failed: {e}");
            state.set_status("Tables export failed.", StatusKind::Error);
            Vec::new()
        }
    }
}

/// Fold a completed request into the state.
pub fn apply(state: &mut AppState, completion: Completion) -> Vec<Effect> {
    let Completion { ticket, reply } = completion;
    match &reply {
        Reply::Uploaded(_) => {
            state.uploads_in_flight = state.uploads_in_flight.saturating_sub(1);
        }
        Reply::Extracted { .. } => {
            state.extractions_in_flight = state.extractions_in_flight.saturating_sub(1);
        }
        _ => {}
    }

    // Chat answers always land in their own turn; the guard only decides whether the
    // reply area shows them.
    if let Reply::Chat { turn, result } = reply {
        return apply_chat(state, ticket, turn, result);
    }

    if !state.guard.accept(ticket) {
        tracing::warn!(lane = ?ticket.lane, seq = ticket.seq, "discarding stale completion");
        return Vec::new();
    }
    tracing::debug!(lane = ?ticket.lane, seq = ticket.seq, "applying completion");

    match reply {
        Reply::Uploaded(result) => apply_upload(state, result),
        Reply::Extracted { model, result } => match result {
            Ok(fields) => {
                state.fields = fields;
                state.highlight = None;
                state.set_status(model.done(), StatusKind::Success);
            }
            Err(e) => {
                tracing::warn!("extraction failed: {e}");
                state.set_status(message_or(&e, model.failed()), StatusKind::Error);
            }
        },
        Reply::Boxes(result) => match result {
            Ok(image) => {
                state.preview = Preview::Rendered(image);
                state.set_status("Bounding boxes shown!", StatusKind::Success);
            }
            Err(e) => {
                tracing::warn!("show boxes failed: {e}");
                state.set_status("Failed to show boxes.", StatusKind::Error);
            }
        },
        Reply::TablesPage(result) => apply_tables(state, result.map(TableSet::new)),
        Reply::TablesAll(result) => apply_tables(state, result.map(TableSet::from_pages)),
        Reply::Exported { format, result } => {
            let export_format = match format {
                RemoteFormat::Pdf => ExportFormat::Pdf,
                RemoteFormat::Docx => ExportFormat::Docx,
            };
            match result {
                Ok(bytes) => {
                    return vec![Effect::Download {
                        file_name: export::file_name(export_format, timestamp(state)),
                        bytes,
                    }];
                }
                Err(e) => {
                    tracing::warn!("{export_format} export failed: {e}");
                    state.set_status(
                        message_or(&e, &format!("{export_format} export failed.")),
                        StatusKind::Error,
                    );
                }
            }
        }
        Reply::Summary(result) => match result {
            Ok(summary) => {
                state.summary = Some(
                    summary
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| MSG_NO_SUMMARY.into()),
                );
            }
            Err(ClientError::Rejected(_)) => state.summary = Some(MSG_NO_SUMMARY.into()),
            Err(e) => {
                tracing::warn!("summarization failed: {e}");
                state.set_status("Summarization failed.", StatusKind::Error);
            }
        },
        Reply::Fraud(result) => match result {
            Ok(report) if report.is_fraud => {
                state.fraud = Some(FraudVerdict::Flagged(report.flags));
            }
            Ok(_) => state.fraud = Some(FraudVerdict::Clean),
            Err(e) => {
                tracing::warn!("fraud check failed: {e}");
                state.set_status(message_or(&e, "Fraud check failed."), StatusKind::Error);
            }
        },
        Reply::Chat { .. } => {}
    }
    Vec::new()
}

fn apply_upload(state: &mut AppState, result: Result<Uploaded, ClientError>) {
    let document = match result {
        Ok(Uploaded::Image { filename }) => Some(Document::Image { filename }),
        Ok(Uploaded::Paged { pdf_id, images }) => PageSet::new(pdf_id, images).map(Document::Paged),
        Err(e) => {
            tracing::warn!("upload failed: {e}");
            state.set_status(message_or(&e, MSG_UPLOAD_FAILED), StatusKind::Error);
            state.progress = None;
            return;
        }
    };
    let Some(document) = document else {
        state.set_status(MSG_UPLOAD_FAILED, StatusKind::Error);
        state.progress = None;
        return;
    };

    let message = match &document {
        Document::Paged(pages) => {
            state.preview = Preview::Remote(pages.image_url(&state.settings.base_url));
            "PDF uploaded! Ready for extraction."
        }
        _ => "File uploaded! Ready for extraction.",
    };
    state.document = document;
    state.guard.invalidate(&Lane::DOCUMENT_BOUND);
    state.set_status(message, StatusKind::Success);
    state.progress = Some(Progress {
        percent: 100,
        label: "Upload complete!".into(),
    });
}

fn apply_tables(state: &mut AppState, result: Result<TableSet, ClientError>) {
    match result {
        Ok(tables) => state.tables = Some(tables),
        Err(e) => {
            tracing::warn!("table extraction failed: {e}");
            state.set_status(message_or(&e, "Table extraction failed."), StatusKind::Error);
        }
    }
}

fn apply_chat(
    state: &mut AppState,
    ticket: Ticket,
    turn: usize,
    result: Result<ChatReply, ClientError>,
) -> Vec<Effect> {
    let reply = match result {
        Ok(ChatReply {
            response: Some(response),
            confidence,
            ..
        }) if !response.is_empty() => {
            state.transcript.answer(turn, response.clone());
            AssistantReply {
                text: response,
                confidence: confidence.filter(|c| c.is_finite() && *c != 0.0),
            }
        }
        Ok(ChatReply { error, .. }) => AssistantReply {
            text: error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| MSG_NO_ANSWER.into()),
            confidence: None,
        },
        Err(e) => {
            tracing::warn!("chat failed: {e}");
            AssistantReply {
                text: MSG_ASSISTANT_FAILED.into(),
                confidence: None,
            }
        }
    };
    if state.guard.accept(ticket) {
        state.reply = Some(reply);
    } else {
        tracing::debug!(turn, "older chat answer, reply area keeps the newer one");
    }
    Vec::new()
}

/// Record the outcome of writing a download to disk.
pub fn download_finished(state: &mut AppState, file_name: &str, result: Result<&Path, String>) {
    match result {
        Ok(path) => state.set_status(format!("Saved {}", path.display()), StatusKind::Success),
        Err(e) => {
            tracing::warn!(file_name, "failed to save download: {e}");
            state.set_status(format!("Failed to save {file_name}: {e}"), StatusKind::Error);
        }
    }
}
