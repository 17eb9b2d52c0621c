//! # Cupid Reader
//!
//! Read path over stored hotel content. Validates caller input before any
//! store or cache call, serves reviews cache-aside, and reports health.
//! HTTP routing is left to the host application or server binary.

pub mod config;
pub mod errors;
pub mod service;
pub mod types;

pub use config::ReaderConfig;
pub use errors::ReaderError;
pub use service::HotelReader;
pub use types::{CacheHealth, HealthReport, HotelPage, ReviewsView, TranslationsView};
