//! Cache provider implementations

pub mod memory;
pub mod noop;

pub use memory::MemoryCache;
pub use noop::NoOpCache;
