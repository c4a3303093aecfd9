//! Process-local adapters used without a database.

mod in_memory_directory;

pub use in_memory_directory::InMemoryDirectory;
