//! Honeypot Insights Library
//!
//! Fetches dated honeypot log files from a remote repository, parses every
//! line into an [`Event`] and folds the events into an [`AggregationResult`]
//! (per-day, per-IP and per-type counts plus captured credentials) for a
//! rendering layer to display.
//!
//! # Modules
//!
//! - `parser`: per-honeypot grammars and the tag → grammar registry
//! - `selector`: dated log file selection for a window
//! - `store`: remote store client (listing and raw downloads)
//! - `aggregator`: the tally fold
//! - `pipeline`: end-to-end run
//!
//! ```rust,no_run
//! use honeypot_insights::{Pipeline, StoreConfig};
//!
//! # async fn demo() -> honeypot_insights::HoneypotResult<()> {
//! let pipeline = Pipeline::from_config(StoreConfig::from_env()?)?;
//! let result = pipeline.run_selector("fortipot", "7").await?;
//! println!("{} events", result.total_events);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod config;
pub mod error_handling;
pub mod event;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod selector;
pub mod store;
pub mod window;

// Re-export the main types for convenience
pub use aggregator::{aggregate, AggregationResult, Aggregator, CredentialAttempt};
pub use config::StoreConfig;
pub use error_handling::{HoneypotError, HoneypotResult};
pub use event::{Credential, Event};
pub use parser::{parse, Grammar, GrammarRegistry};
pub use pipeline::{Pipeline, RunStats};
pub use store::{GithubLogStore, LogStore};
pub use window::{DateRange, DateWindow};
