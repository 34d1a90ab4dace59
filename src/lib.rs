// codegen-preview: Terminal preview of generated workflow client code
// License: Apache-2.0

pub mod clipboard;
pub mod config;
pub mod driver;
pub mod format;
pub mod highlight;
pub mod logger;
pub mod orchestrator;
pub mod service;
pub mod tui;
pub mod workflow;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
