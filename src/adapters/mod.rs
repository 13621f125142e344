// Adapters layer: concrete command sources (local files, in-memory scripts).

pub mod file;
pub mod memory;

pub use file::FileSource;
pub use memory::MemorySource;
