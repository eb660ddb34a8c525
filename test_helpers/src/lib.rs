//! Test helpers shared across the propsetter workspace.
//!
//! [`xml`] builds solution configuration documents, [`figment`] wraps
//! `figment::Jail` for settings tests and [`text`] normalises rendered
//! documents before comparison.

pub mod figment;
pub mod text;
pub mod xml;
