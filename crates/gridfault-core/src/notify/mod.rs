//! Notification dispatch.
//!
//! [`Notifier`] is the single "send notification" capability the reminder
//! engine depends on. Delivery is fire-and-forget beyond the returned
//! result; retries are the caller's business (the engine retries by leaving
//! the warning flag clear).

pub mod email;

pub use email::EmailNotifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Who a reminder is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipientRole {
    /// Escalation target for reports nobody has picked up.
    SuperAdmin,
    /// Responsible for confirming resolution of delegated reports.
    Admin,
}

impl RecipientRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            RecipientRole::SuperAdmin => "Super Admin",
            RecipientRole::Admin => "Admin",
        }
    }
}

/// Attempts delivery of one message and reports success or failure.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: RecipientRole,
        address: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
}
