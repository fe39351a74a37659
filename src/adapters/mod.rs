// Adapters layer: concrete implementations for external systems (catalog file, upstream http, session cache).

pub mod cache;
pub mod catalog;
pub mod gemini;
