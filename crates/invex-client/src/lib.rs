//! Typed client for the invoice-extraction backend.
//!
//! The backend is opaque: this crate only knows the request/response contract of
//! each endpoint. [`HttpBackend`] talks to a live server, [`mock::MockBackend`]
//! (feature `mock`) replays scripted replies for tests.

pub mod backend;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod remote;
mod retry;
pub mod types;

pub use backend::Backend;
pub use error::ClientError;
pub use remote::HttpBackend;
pub use types::{
    ChatReply, ChatRequest, ChatTurn, FieldMap, FraudReport, PageTables, RemoteFormat,
    RenderedImage, Table, UploadFile, Uploaded,
};
