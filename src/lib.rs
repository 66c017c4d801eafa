pub mod config;
pub mod convert;
pub mod error;
pub mod ingest;
pub mod models;
pub mod threading;

use env_logger::Env;
use std::sync::Once;

pub use config::{ConvertConfig, InputFormat};
pub use convert::{convert, write_threads};
pub use error::{ConvertError, RecordError};
pub use models::{LinkedMessage, PagingInfo, Record, Thread, ThreadInfo};
pub use threading::{Reconstruction, reconstruct, reconstruct_threads};

static LOGGER: Once = Once::new();

/// Install the `env_logger` backend once; `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .format_timestamp(None)
            .init();
    });
}
