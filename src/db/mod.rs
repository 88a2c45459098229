pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

mod macros;

pub use cache::ResponseCache;
pub use memory::MemoryStore;
pub use postgres::{create_pool, PostgresStore};
pub use store::{AccountStore, InteractionStore, Store};
