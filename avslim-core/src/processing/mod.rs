//! Batch processing orchestration.

pub mod batch;

pub use batch::process_files;
