//! Capability contracts exposed by the repository crate.
mod hotel_repository;

pub use hotel_repository::HotelRepository;
