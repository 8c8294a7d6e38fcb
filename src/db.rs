pub mod store;
pub use store::Store;
pub mod postgres;
pub use postgres::PgStore;
pub mod memory;
pub use memory::MemoryStore;
