// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod progress;
pub mod results_log;
pub mod runtime;
pub mod session;
pub mod text_buffer;
pub mod theme;
pub mod timer;
pub mod vocabulary;
pub mod word_source;
