// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod runtime;
pub mod score;
pub mod session;
pub mod ui;
