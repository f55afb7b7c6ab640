//! Stashfill engine: frame stream reader, backend/catalog clients and effect execution.
mod backend;
mod catalog;
mod decode;
mod engine;
mod frame;
mod persist;
mod reader;
mod types;

pub use backend::{
    AcceptedTag, BackendSettings, FillRequestBody, FrameStream, JobBackend, ReqwestBackend,
    SuggestionsRequest,
};
pub use catalog::{Catalog, CatalogFile, CatalogScene, CatalogSettings, GraphqlCatalog};
pub use decode::StreamDecoder;
pub use engine::EngineHandle;
pub use frame::{AttachedFile, FillPayload, Frame, FrameData};
pub use persist::{ensure_output_dir, safe_file_name, PersistError, TorrentWriter};
pub use reader::{FrameReader, ReaderSettings, DEFAULT_TERMINAL_MARKER};
pub use types::{EngineEvent, LookupError, StreamError, SubmissionError};
