//! Error types produced by the configuration pipeline.

mod constructors;
mod conversions;
mod list;
mod types;

pub use list::ErrorList;
pub use types::ConfigError;

#[cfg(test)]
mod tests;
