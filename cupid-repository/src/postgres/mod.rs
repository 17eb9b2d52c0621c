//! PostgreSQL backend for the hotel repository.
mod hotel_repository;
mod rows;

pub use hotel_repository::PostgresHotelRepository;
