pub mod connection;
pub mod entities;
pub mod repositories;
pub mod rest;

pub use repositories::RecordRepository;
pub use rest::RestRecordStore;
