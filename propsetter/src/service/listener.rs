//! Notification hooks around configuration runs.

use super::RunStatus;
use crate::model::ObjectId;

/// Callbacks invoked once per apply or de-apply run.
pub trait ConfigListener {
    /// Called before any object of configuration `name` is touched.
    fn pre_configuration(&self, name: &str) {
        let _ = name;
    }

    /// Called after the run with every object it saved or deleted, including
    /// the ones touched before a failure.
    fn config_changed(&self, name: &str, touched: &[ObjectId], status: RunStatus) {
        let _ = (name, touched, status);
    }
}
