//! Error types for the hotel repository.
mod hotel_repository;

pub use hotel_repository::RepositoryError;
