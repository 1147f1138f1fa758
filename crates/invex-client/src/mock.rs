//! Test-only scripted backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::backend::Backend;
use crate::error::ClientError;
use crate::types::{
    ChatReply, ChatRequest, FieldMap, FraudReport, PageTables, RemoteFormat, RenderedImage, Table,
    UploadFile, Uploaded,
};

/// Canned replies for every endpoint plus a log of the calls made.
#[derive(Debug, Clone)]
pub struct MockBackend {
    calls: Arc<Mutex<Vec<String>>>,
    chat_replies: Arc<Mutex<VecDeque<ChatReply>>>,
    chat_requests: Arc<Mutex<Vec<ChatRequest>>>,
    pub uploaded: Uploaded,
    pub fields: FieldMap,
    pub image: Vec<u8>,
    pub tables: Vec<Table>,
    pub pages: Vec<PageTables>,
    pub document: Vec<u8>,
    pub summary: Option<String>,
    pub fraud: FraudReport,
    /// Every call fails with this backend-supplied message.
    pub rejection: Option<String>,
    /// Every call fails as if the server were down.
    pub unavailable: bool,
    /// Milliseconds to sleep before answering.
    pub delay_ms: u64,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            chat_replies: Arc::new(Mutex::new(VecDeque::new())),
            chat_requests: Arc::new(Mutex::new(Vec::new())),
            uploaded: Uploaded::Image {
                filename: "invoice.png".into(),
            },
            fields: FieldMap::new(),
            image: Vec::new(),
            tables: Vec::new(),
            pages: Vec::new(),
            document: b"mock document".to_vec(),
            summary: None,
            fraud: FraudReport::default(),
            rejection: None,
            unavailable: false,
            delay_ms: 0,
        }
    }
}

impl MockBackend {
    #[must_use]
    pub fn with_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rejection: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_paged(mut self, pdf_id: &str, images: &[&str]) -> Self {
        self.uploaded = Uploaded::Paged {
            pdf_id: pdf_id.into(),
            images: images.iter().map(|&i| i.to_owned()).collect(),
        };
        self
    }

    #[must_use]
    pub fn with_chat_replies(self, replies: Vec<ChatReply>) -> Self {
        *self.chat_replies.lock().unwrap() = replies.into();
        self
    }

    #[must_use]
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Endpoint names in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    async fn enter(&self, endpoint: &str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(endpoint.to_owned());
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.unavailable {
            return Err(ClientError::Status {
                status: 503,
                body: "mock backend unavailable".into(),
            });
        }
        if let Some(message) = &self.rejection {
            return Err(ClientError::Rejected(message.clone()));
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    async fn upload(&self, _file: UploadFile) -> Result<Uploaded, ClientError> {
        self.enter("upload").await?;
        Ok(self.uploaded.clone())
    }

    async fn dataset_search(&self, _filename: &str) -> Result<FieldMap, ClientError> {
        self.enter("dataset_search").await?;
        Ok(self.fields.clone())
    }

    async fn ai_search(&self, _filename: &str) -> Result<FieldMap, ClientError> {
        self.enter("ai_search").await?;
        Ok(self.fields.clone())
    }

    async fn show_boxes(&self, _filename: &str) -> Result<RenderedImage, ClientError> {
        self.enter("show_boxes").await?;
        Ok(RenderedImage {
            content_type: Some("image/png".into()),
            bytes: self.image.clone(),
        })
    }

    async fn ai_chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        self.enter("ai_chat").await?;
        let next = self.chat_replies.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| ChatReply {
            response: Some("mock answer".into()),
            ..ChatReply::default()
        }))
    }

    async fn extract_tables_page(
        &self,
        _pdf_id: &str,
        _page: usize,
    ) -> Result<Vec<Table>, ClientError> {
        self.enter("extract_tables_pdf_page").await?;
        Ok(self.tables.clone())
    }

    async fn extract_tables_all(&self, _pdf_id: &str) -> Result<Vec<PageTables>, ClientError> {
        self.enter("extract_tables_pdf_all").await?;
        Ok(self.pages.clone())
    }

    async fn export(
        &self,
        _fields: &FieldMap,
        _format: RemoteFormat,
    ) -> Result<Vec<u8>, ClientError> {
        self.enter("export").await?;
        Ok(self.document.clone())
    }

    async fn summarize(&self, _fields: &FieldMap) -> Result<Option<String>, ClientError> {
        self.enter("summarize_invoice").await?;
        Ok(self.summary.clone())
    }

    async fn detect_fraud(&self, _fields: &FieldMap) -> Result<FraudReport, ClientError> {
        self.enter("detect_fraud").await?;
        Ok(self.fraud.clone())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
