pub mod models;
pub mod profile_store;

mod memory;
pub use memory::MemoryStore;

pub use models::{Profile, UserId, DEFAULT_ROLE};
pub use profile_store::{ProfileStore, StoreError};
