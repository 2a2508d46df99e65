//! HTTP handlers. Each one turns its own failures into a response; nothing
//! propagates past the handler that detects it.

pub mod file_handlers;
pub mod health_handlers;
pub mod upload_handlers;
