//! Domain services: key generation, disposition policy, object stores and
//! static assets.

pub mod assets;
pub mod disk_store;
pub mod disposition;
pub mod key_generator;
pub mod memory_store;
pub mod object_store;
pub mod vocabulary;
