//! Response envelopes and request schemas shared by the HTTP handlers.
//!
//! Domain types derive `ToSchema` themselves; this module only holds the
//! wrappers the REST surface adds around them.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Account, ChecklistRecord};

/// Acknowledgement carrying only a message, returned by deletes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Deleted successfully!")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A checklist returned from a create or update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChecklistEnvelope {
    #[schema(example = "Created")]
    pub message: String,
    pub checklist: ChecklistRecord,
}

/// An account returned from a role change.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountEnvelope {
    #[schema(example = "User role updated")]
    pub message: String,
    pub user: Account,
}
