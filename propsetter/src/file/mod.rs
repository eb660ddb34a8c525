//! File access shared by definition loading, history and store snapshots.

mod helpers;
mod loader;
mod path;

pub(crate) use helpers::{read_optional, write_file};
pub(crate) use loader::load_toml_chain;
