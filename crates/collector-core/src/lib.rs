pub mod aggregate;
pub mod batch;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod paths;
pub mod progress;
pub mod scanner;
pub mod sync;

pub use config::AppConfig;
pub use engine::{CollectorEngine, RunResult, ScanStats};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
