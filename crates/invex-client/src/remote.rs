//! [`Backend`] over HTTP.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::backend::Backend;
use crate::error::ClientError;
use crate::retry::send_with_retry;
use crate::types::{
    ChatReply, ChatRequest, FieldMap, FraudReport, PageTables, RemoteFormat, RenderedImage, Table,
    UploadFile, Uploaded, lenient_tables,
};

const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    pdf_id: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct FieldsResponse {
    #[serde(default)]
    fields: Option<FieldMap>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct TablesResponse {
    #[serde(default, deserialize_with = "lenient_tables")]
    tables: Vec<Table>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct PagesResponse {
    #[serde(default)]
    pages: Option<Vec<PageTables>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct FraudResponse {
    #[serde(flatten)]
    report: FraudReport,
    #[serde(default)]
    error: Option<String>,
}

fn rejected(error: Option<String>) -> Option<ClientError> {
    error.filter(|e| !e.is_empty()).map(ClientError::Rejected)
}

fn truncate(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(MAX_ERROR_BODY).collect()
}

impl HttpBackend {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_retries: 2,
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST a JSON body and decode the JSON answer.
    ///
    /// Error statuses still carry `{error}` payloads, so the body is decoded first and
    /// the status only matters when decoding fails.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response =
            send_with_retry(path, self.max_retries, || self.client.post(&url).json(body).send())
                .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<T>(&bytes) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(ClientError::Json(e)),
            Err(_) => Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(&bytes),
            }),
        }
    }

    /// POST a JSON body and return the raw answer; any non-2xx status is an error.
    async fn post_for_bytes<B>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(Option<String>, Vec<u8>), ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response =
            send_with_retry(path, self.max_retries, || self.client.post(&url).json(body).send())
                .await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(&bytes),
            });
        }
        Ok((content_type, bytes.to_vec()))
    }

    async fn fields(&self, path: &str, filename: &str) -> Result<FieldMap, ClientError> {
        let reply: FieldsResponse = self.post_json(path, &json!({ "filename": filename })).await?;
        match reply.fields {
            Some(fields) => Ok(fields),
            None => Err(rejected(reply.error).unwrap_or(ClientError::MissingField("fields"))),
        }
    }
}

impl Backend for HttpBackend {
    async fn upload(&self, file: UploadFile) -> Result<Uploaded, ClientError> {
        let url = self.url("upload");
        tracing::debug!(%url, name = %file.name, size = file.bytes.len(), "upload");
        let mime = file.mime_type();
        let response = send_with_retry("upload", self.max_retries, || {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(mime);
            let request = self.client.post(&url);
            async move {
                let form = reqwest::multipart::Form::new().part("file", part?);
                request.multipart(form).send().await
            }
        })
        .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let reply: UploadResponse = match serde_json::from_slice(&bytes) {
            Ok(reply) => reply,
            Err(e) if status.is_success() => return Err(ClientError::Json(e)),
            Err(_) => {
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    body: truncate(&bytes),
                });
            }
        };

        if let Some(filename) = reply.filename.filter(|f| !f.is_empty()) {
            return Ok(Uploaded::Image { filename });
        }
        if let Some(pdf_id) = reply.pdf_id.filter(|id| !id.is_empty()) {
            if reply.images.is_empty() {
                return Err(ClientError::MissingField("images"));
            }
            return Ok(Uploaded::Paged {
                pdf_id,
                images: reply.images,
            });
        }
        Err(rejected(reply.error).unwrap_or(ClientError::MissingField("filename")))
    }

    async fn dataset_search(&self, filename: &str) -> Result<FieldMap, ClientError> {
        self.fields("dataset_search", filename).await
    }

    async fn ai_search(&self, filename: &str) -> Result<FieldMap, ClientError> {
        self.fields("ai_search", filename).await
    }

    async fn show_boxes(&self, filename: &str) -> Result<RenderedImage, ClientError> {
        let (content_type, bytes) = self
            .post_for_bytes("show_boxes", &json!({ "filename": filename }))
            .await?;
        Ok(RenderedImage {
            content_type,
            bytes,
        })
    }

    async fn ai_chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.post_json("ai_chat", request).await
    }

    async fn extract_tables_page(
        &self,
        pdf_id: &str,
        page: usize,
    ) -> Result<Vec<Table>, ClientError> {
        let reply: TablesResponse = self
            .post_json(
                "extract_tables_pdf_page",
                &json!({ "pdf_id": pdf_id, "page": page }),
            )
            .await?;
        if reply.tables.is_empty()
            && let Some(err) = rejected(reply.error)
        {
            return Err(err);
        }
        Ok(reply.tables)
    }

    async fn extract_tables_all(&self, pdf_id: &str) -> Result<Vec<PageTables>, ClientError> {
        let reply: PagesResponse = self
            .post_json("extract_tables_pdf_all", &json!({ "pdf_id": pdf_id }))
            .await?;
        let pages = reply.pages.unwrap_or_default();
        if pages.is_empty()
            && let Some(err) = rejected(reply.error)
        {
            return Err(err);
        }
        Ok(pages)
    }

    async fn export(&self, fields: &FieldMap, format: RemoteFormat) -> Result<Vec<u8>, ClientError> {
        let (_, bytes) = self
            .post_for_bytes("export", &json!({ "fields": fields, "format": format }))
            .await?;
        Ok(bytes)
    }

    async fn summarize(&self, fields: &FieldMap) -> Result<Option<String>, ClientError> {
        let reply: SummaryResponse = self
            .post_json("summarize_invoice", &json!({ "fields": fields }))
            .await?;
        if reply.summary.is_none()
            && let Some(err) = rejected(reply.error)
        {
            return Err(err);
        }
        Ok(reply.summary)
    }

    async fn detect_fraud(&self, fields: &FieldMap) -> Result<FraudReport, ClientError> {
        let reply: FraudResponse = self
            .post_json("detect_fraud", &json!({ "fields": fields }))
            .await?;
        if let Some(err) = rejected(reply.error) {
            return Err(err);
        }
        Ok(reply.report)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(reqwest::Client::new(), server.uri()).with_max_retries(0)
    }

    async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn fields() -> FieldMap {
        [("Vendor", "ACME"), ("Total", "10")].into_iter().collect()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let backend = HttpBackend::new(reqwest::Client::new(), "http://host:5000/");
        assert_eq!(backend.url("/upload"), "http://host:5000/upload");
        assert_eq!(backend.url("ai_chat"), "http://host:5000/ai_chat");
    }

    #[tokio::test]
    async fn upload_single_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"filename": "inv.png"})))
            .expect(1)
            .mount(&server)
            .await;

        let uploaded = backend(&server)
            .upload(UploadFile {
                name: "inv.png".into(),
                bytes: b"png".to_vec(),
            })
            .await
            .unwrap();
        assert_eq!(
            uploaded,
            Uploaded::Image {
                filename: "inv.png".into()
            }
        );
    }

    #[tokio::test]
    async fn upload_paged_document() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/upload",
            200,
            json!({"pdf_id": "abc", "images": ["p1.png", "p2.png"]}),
        )
        .await;

        let uploaded = backend(&server)
            .upload(UploadFile {
                name: "doc.pdf".into(),
                bytes: b"%PDF".to_vec(),
            })
            .await
            .unwrap();
        assert_eq!(
            uploaded,
            Uploaded::Paged {
                pdf_id: "abc".into(),
                images: vec!["p1.png".into(), "p2.png".into()]
            }
        );
    }

    #[tokio::test]
    async fn upload_error_payload_is_rejected() {
        let server = MockServer::start().await;
        mount_json(&server, "/upload", 400, json!({"error": "Unsupported file"})).await;

        let err = backend(&server)
            .upload(UploadFile {
                name: "x.pdf".into(),
                bytes: Vec::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some("Unsupported file"));
    }

    #[tokio::test]
    async fn upload_without_shape_is_missing_field() {
        let server = MockServer::start().await;
        mount_json(&server, "/upload", 200, json!({})).await;

        let err = backend(&server)
            .upload(UploadFile {
                name: "x.png".into(),
                bytes: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingField("filename")));
    }

    #[tokio::test]
    async fn dataset_search_sends_filename() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dataset_search"))
            .and(body_json(json!({"filename": "inv.png"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"fields": {"Vendor": "ACME", "Total": 10}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fields = backend(&server).dataset_search("inv.png").await.unwrap();
        assert_eq!(fields.get("Vendor"), Some("ACME"));
        assert_eq!(fields.get("Total"), Some("10"));
    }

    #[tokio::test]
    async fn ai_search_error_is_rejected() {
        let server = MockServer::start().await;
        mount_json(&server, "/ai_search", 500, json!({"error": "model offline"})).await;

        let err = backend(&server).ai_search("inv.png").await.unwrap_err();
        assert_eq!(err.backend_message(), Some("model offline"));
    }

    #[tokio::test]
    async fn non_json_error_becomes_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai_search"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = backend(&server).ai_search("inv.png").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn show_boxes_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/show_boxes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![1u8, 2, 3]),
            )
            .mount(&server)
            .await;

        let image = backend(&server).show_boxes("inv.png").await.unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn show_boxes_fails_on_error_status() {
        let server = MockServer::start().await;
        mount_json(&server, "/show_boxes", 404, json!({"error": "no file"})).await;

        let err = backend(&server).show_boxes("inv.png").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn ai_chat_posts_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai_chat"))
            .and(body_json(json!({
                "session_id": "s",
                "filename": null,
                "pdf_id": "abc",
                "query": "total?",
                "chat_history": []
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "42", "confidence": 0.87})),
            )
            .mount(&server)
            .await;

        let reply = backend(&server)
            .ai_chat(&ChatRequest {
                session_id: "s".into(),
                filename: None,
                pdf_id: Some("abc".into()),
                query: "total?".into(),
                chat_history: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response.as_deref(), Some("42"));
        assert_eq!(reply.confidence, Some(0.87));
    }

    #[tokio::test]
    async fn tables_for_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract_tables_pdf_page"))
            .and(body_json(json!({"pdf_id": "abc", "page": 2})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"tables": [[["Item", "Qty"], ["Bolt", "4"]]]})),
            )
            .mount(&server)
            .await;

        let tables = backend(&server).extract_tables_page("abc", 2).await.unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0][1], vec!["Bolt".to_owned(), "4".to_owned()]);
    }

    #[tokio::test]
    async fn tables_for_all_pages() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/extract_tables_pdf_all",
            200,
            json!({"pages": [{"tables": [[["A"]]]}, {"tables": []}]}),
        )
        .await;

        let pages = backend(&server).extract_tables_all("abc").await.unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[1].tables.is_empty());
    }

    #[tokio::test]
    async fn tables_for_all_pages_without_pages_is_empty() {
        let server = MockServer::start().await;
        mount_json(&server, "/extract_tables_pdf_all", 200, json!({})).await;

        let pages = backend(&server).extract_tables_all("abc").await.unwrap();
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn tables_for_all_pages_error_is_rejected() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/extract_tables_pdf_all",
            200,
            json!({"pages": null, "error": "PDF not found"}),
        )
        .await;

        let err = backend(&server).extract_tables_all("abc").await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected(ref msg) if msg == "PDF not found"));
    }

    #[tokio::test]
    async fn export_returns_document_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/export"))
            .and(body_json(json!({"fields": {"Vendor": "ACME", "Total": "10"}, "format": "pdf"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
            .mount(&server)
            .await;

        let bytes = backend(&server)
            .export(&fields(), RemoteFormat::Pdf)
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn summarize_without_summary_is_none() {
        let server = MockServer::start().await;
        mount_json(&server, "/summarize_invoice", 200, json!({})).await;

        let summary = backend(&server).summarize(&fields()).await.unwrap();
        assert!(summary.is_none());
    }

    #[tokio::test]
    async fn detect_fraud_reads_flags() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/detect_fraud",
            200,
            json!({"is_fraud": true, "flags": ["Duplicate invoice number"]}),
        )
        .await;

        let report = backend(&server).detect_fraud(&fields()).await.unwrap();
        assert!(report.is_fraud);
        assert_eq!(report.flags, ["Duplicate invoice number"]);
    }

    #[tokio::test]
    async fn transport_failure_is_http_error() {
        let backend = HttpBackend::new(reqwest::Client::new(), "http://127.0.0.1:1");
        let err = backend.ai_search("inv.png").await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
