//! In-memory workplace storage.

mod workplace;

pub use workplace::InMemoryWorkplaceRepository;
