//! Workflow configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{RequestNumber, RequestNumberError, WorkflowRules};

const DEFAULT_REQUEST_PREFIX: &str = "REQ";
const DEFAULT_COLLECTION_PREFIX: &str = "ACD";

fn default_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("relocation")
        .join("seed.json")
}

/// Settings that cannot be turned into [`WorkflowRules`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowSettingsError {
    /// A number prefix is empty or contains whitespace.
    #[error("{setting} is not a usable number prefix: {source}")]
    InvalidPrefix {
        /// Offending setting.
        setting: &'static str,
        /// Why the prefix was rejected.
        #[source]
        source: RequestNumberError,
    },
    /// Comments could never be recorded.
    #[error("max_comment_length must be greater than zero")]
    ZeroCommentLength,
}

/// Configuration values for the relocation workflow.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RELOCATION")]
pub struct WorkflowSettings {
    /// Prefix of human-readable request numbers.
    pub request_number_prefix: Option<String>,
    /// Prefix of asset collection document numbers.
    pub collection_document_prefix: Option<String>,
    /// Upper bound on approval comments and denial reasons, in characters.
    #[ortho_config(default = 500)]
    pub max_comment_length: usize,
    /// Seed fixture path override.
    pub seed_path: Option<PathBuf>,
}

impl WorkflowSettings {
    /// Return the configured request number prefix, falling back to `REQ`.
    pub fn request_number_prefix(&self) -> &str {
        self.request_number_prefix
            .as_deref()
            .unwrap_or(DEFAULT_REQUEST_PREFIX)
    }

    /// Return the configured collection document prefix, falling back to
    /// `ACD`.
    pub fn collection_document_prefix(&self) -> &str {
        self.collection_document_prefix
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTION_PREFIX)
    }

    /// Return the configured seed path, falling back to the bundled fixture.
    pub fn seed_path(&self) -> PathBuf {
        self.seed_path.clone().unwrap_or_else(default_seed_path)
    }

    /// Check the settings and build the service rules.
    ///
    /// # Errors
    /// [`WorkflowSettingsError`] when a prefix cannot form a number or the
    /// comment bound is zero.
    pub fn rules(&self) -> Result<WorkflowRules, WorkflowSettingsError> {
        for (setting, prefix) in [
            ("request_number_prefix", self.request_number_prefix()),
            ("collection_document_prefix", self.collection_document_prefix()),
        ] {
            RequestNumber::compose(prefix, 2024, 1)
                .map_err(|source| WorkflowSettingsError::InvalidPrefix { setting, source })?;
        }
        let max_comment_length = self.max_comment_length;
        if max_comment_length == 0 {
            return Err(WorkflowSettingsError::ZeroCommentLength);
        }
        Ok(WorkflowRules {
            request_number_prefix: self.request_number_prefix().to_owned(),
            collection_document_prefix: self.collection_document_prefix().to_owned(),
            max_comment_length,
        })
    }
}
