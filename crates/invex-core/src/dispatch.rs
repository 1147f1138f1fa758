//! Effect execution against a [`Backend`].

use std::path::{Path, PathBuf};

use invex_client::{Backend, ClientError, UploadFile};

use crate::controller::{ExtractionModel, Reply, Request};

/// Perform one backend request.
pub async fn dispatch<B: Backend>(backend: &B, request: Request) -> Reply {
    match request {
        Request::Upload(path) => Reply::Uploaded(upload(backend, &path).await),
        Request::Extract { model, filename } => {
            let result = match model {
                ExtractionModel::Dataset => backend.dataset_search(&filename).await,
                ExtractionModel::Ai => backend.ai_search(&filename).await,
            };
            Reply::Extracted { model, result }
        }
        Request::ShowBoxes { filename } => Reply::Boxes(backend.show_boxes(&filename).await),
        Request::Chat { turn, request } => Reply::Chat {
            turn,
            result: backend.ai_chat(&request).await,
        },
        Request::TablesPage { pdf_id, page } => {
            Reply::TablesPage(backend.extract_tables_page(&pdf_id, page).await)
        }
        Request::TablesAll { pdf_id } => Reply::TablesAll(backend.extract_tables_all(&pdf_id).await),
        Request::Export { fields, format } => Reply::Exported {
            format,
            result: backend.export(&fields, format).await,
        },
        Request::Summarize { fields } => Reply::Summary(backend.summarize(&fields).await),
        Request::DetectFraud { fields } => Reply::Fraud(backend.detect_fraud(&fields).await),
    }
}

async fn upload<B: Backend>(backend: &B, path: &Path) -> Result<invex_client::Uploaded, ClientError> {
    let file = UploadFile::read(path).await?;
    backend.upload(file).await
}

/// Write a download into `dir`, creating it if needed. Returns the written path.
///
/// # Errors
///
/// Returns the I/O error of the failed filesystem step.
pub async fn save_download(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use invex_client::mock::MockBackend;

    use super::*;

    #[tokio::test]
    async fn upload_reads_file_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"png").unwrap();
        let backend = MockBackend::default();

        let reply = dispatch(&backend, Request::Upload(path)).await;
        assert!(matches!(reply, Reply::Uploaded(Ok(_))));
        assert_eq!(backend.calls(), ["upload"]);
    }

    #[tokio::test]
    async fn missing_upload_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::default();

        let reply = dispatch(&backend, Request::Upload(dir.path().join("gone.png"))).await;
        assert!(matches!(reply, Reply::Uploaded(Err(ClientError::Io(_)))));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn extraction_model_selects_endpoint() {
        let backend = MockBackend::with_fields([("A", "1")]);
        dispatch(
            &backend,
            Request::Extract {
                model: ExtractionModel::Ai,
                filename: "f.png".into(),
            },
        )
        .await;
        dispatch(
            &backend,
            Request::Extract {
                model: ExtractionModel::Dataset,
                filename: "f.png".into(),
            },
        )
        .await;
        assert_eq!(backend.calls(), ["ai_search", "dataset_search"]);
    }

    #[tokio::test]
    async fn save_download_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports/nested");
        let path = save_download(&target, "invoice_data.json", b"{}").await.unwrap();
        assert_eq!(path, target.join("invoice_data.json"));
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }
}
