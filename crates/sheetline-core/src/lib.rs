//! sheetline-core - Request decoding, transport boundary and local workbooks.

pub mod error;
pub mod request;
pub mod service;
pub mod storage;
pub mod transport;

pub use error::{Result, ServiceError};
pub use service::SheetService;
pub use storage::CsvWorkbooks;
pub use transport::{GridTransport, TransportError};
