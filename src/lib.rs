pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::memo_service::MemoService;
pub use domain::memo::{FontStyle, FontWeight, InsertMemo, Memo, MemoStyle};
pub use domain::validate::{sanitize_content, validate_insert_memo};
pub use error::{FieldError, StorageError, SubmitError, ValidationError};
pub use storage::{ConnectionManager, Connector, MemoStore};
