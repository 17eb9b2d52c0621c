//! Error types for the reader service.

mod reader_error;

pub use reader_error::ReaderError;
