pub mod cli;
pub mod config;
pub mod config_parser;
pub mod error;
pub mod logging;
pub mod store;
pub mod write_loop;

pub use config::{SentinelAddr, ServerRole, WriterConfig};
pub use error::{Error, Result};
pub use store::{KvStore, SentinelStore};
pub use write_loop::{IterationOutcome, LoopStats, WriteLoop};
