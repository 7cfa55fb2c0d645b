//! sndvol - EverQuest sound volume tool
//!
//! Finds a sound in the `snd*.pfs` archives of a game directory and writes a
//! quieter copy of it to `<root>/sounds/`.

pub mod archive;
pub mod audio;
pub mod config;
pub mod error;
pub mod processing;
pub mod volume;

pub use config::{Config, Args};
pub use error::{SndVolError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .format_timestamp(None)
        .try_init()
        .ok();
}
