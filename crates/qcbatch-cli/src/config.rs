//! Turns command-line arguments and the optional TOML file into the core
//! library's workflow configurations.
//!
//! Precedence, highest first: command-line flags, `--set` overrides, the
//! config file, built-in defaults.

mod builder;
mod defaults;
mod file;

pub use builder::{
    build_collect_config, build_prepare_config, build_submit_config, resolve_layout,
};
