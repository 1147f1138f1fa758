use std::future::Future;

use crate::error::ClientError;
use crate::types::{
    ChatReply, ChatRequest, FieldMap, FraudReport, PageTables, RemoteFormat, RenderedImage, Table,
    UploadFile, Uploaded,
};

/// The extraction service as seen by the front end: one method per endpoint.
pub trait Backend: Send + Sync {
    /// Send a document as multipart field `file` (`POST /upload`).
    fn upload(&self, file: UploadFile)
    -> impl Future<Output = Result<Uploaded, ClientError>> + Send;

    /// Extract fields with the dataset model (`POST /dataset_search`).
    fn dataset_search(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<FieldMap, ClientError>> + Send;

    /// Extract fields with the AI model (`POST /ai_search`).
    fn ai_search(&self, filename: &str)
    -> impl Future<Output = Result<FieldMap, ClientError>> + Send;

    /// Fetch the preview image annotated with bounding boxes (`POST /show_boxes`).
    fn show_boxes(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<RenderedImage, ClientError>> + Send;

    fn ai_chat(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatReply, ClientError>> + Send;

    /// Tables of one page; `page` is the zero-based page index.
    fn extract_tables_page(
        &self,
        pdf_id: &str,
        page: usize,
    ) -> impl Future<Output = Result<Vec<Table>, ClientError>> + Send;

    fn extract_tables_all(
        &self,
        pdf_id: &str,
    ) -> impl Future<Output = Result<Vec<PageTables>, ClientError>> + Send;

    /// Render the fields to a document on the server and return its bytes.
    fn export(
        &self,
        fields: &FieldMap,
        format: RemoteFormat,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;

    /// `None` when the backend answered without a summary.
    fn summarize(
        &self,
        fields: &FieldMap,
    ) -> impl Future<Output = Result<Option<String>, ClientError>> + Send;

    fn detect_fraud(
        &self,
        fields: &FieldMap,
    ) -> impl Future<Output = Result<FraudReport, ClientError>> + Send;

    fn name(&self) -> &str;
}
