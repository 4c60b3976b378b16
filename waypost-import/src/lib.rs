//! waypost-import library interface
//!
//! Exposes the ingestion pipeline for integration testing: per-format
//! decoders, the record normalizer, the upsert store operations, and the
//! import orchestrator that ties them together.

pub mod decoders;
pub mod normalize;
pub mod orchestrator;
pub mod rating;
pub mod store;

pub use decoders::{DecodeError, Format, RawRecord};
pub use normalize::{RowOutcome, SkipReason};
pub use orchestrator::{FileReport, FileStats, ImportOrchestrator, ImportReport};
pub use store::UpsertOutcome;
