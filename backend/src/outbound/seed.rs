//! JSON seed fixture for the in-memory adapters.
//!
//! The fixture carries the reference data (locations, categories, the
//! transport catalogue), the user directory and a set of requests at every
//! lifecycle stage. Requests are checked against their invariants on load.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    AssetCategory, InternalVehicle, Location, RelocationRequest, RequestInvariantError,
    Transporter, User, UserId, VehicleFeature, VehicleType,
};
use crate::outbound::memory::{InMemoryRelocationRepository, InMemoryTransportCatalogue};

/// Errors raised while loading a seed fixture.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The fixture file could not be read.
    #[error("failed to read seed fixture at {path}: {source}")]
    Read {
        /// Path to the fixture.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The fixture is not valid JSON for this schema.
    #[error("seed fixture parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A seeded request breaks a record invariant.
    #[error("seed request is inconsistent: {0}")]
    Invalid(#[from] RequestInvariantError),
    /// Two seeded requests share a number.
    #[error("duplicate seed request number {number}")]
    DuplicateRequest {
        /// Repeated number.
        number: String,
    },
}

/// Parsed seed fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFixture {
    /// Site locations.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Asset categories.
    #[serde(default)]
    pub categories: Vec<AssetCategory>,
    /// Vehicle capacity classes.
    #[serde(default)]
    pub vehicle_types: Vec<VehicleType>,
    /// Internal fleet.
    #[serde(default)]
    pub internal_vehicles: Vec<InternalVehicle>,
    /// Approved external transporters.
    #[serde(default)]
    pub transporters: Vec<Transporter>,
    /// Optional vehicle features.
    #[serde(default)]
    pub vehicle_features: Vec<VehicleFeature>,
    /// User directory.
    #[serde(default)]
    pub users: Vec<User>,
    /// Stored requests.
    #[serde(default)]
    pub requests: Vec<RelocationRequest>,
}

impl SeedFixture {
    /// Parse and check a fixture.
    ///
    /// # Errors
    /// [`SeedError::Parse`] for malformed JSON, [`SeedError::Invalid`] or
    /// [`SeedError::DuplicateRequest`] for inconsistent requests.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let fixture: Self = serde_json::from_str(json)?;
        fixture.check()?;
        Ok(fixture)
    }

    /// Read a fixture from `path`.
    ///
    /// # Errors
    /// [`SeedError::Read`] when the file cannot be read, otherwise as
    /// [`SeedFixture::from_json`].
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let read_error = |source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path.file_name().ok_or_else(|| {
            read_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seed path must be a file",
            ))
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = dir
            .read_to_string(Path::new(file_name))
            .map_err(read_error)?;
        Self::from_json(&contents)
    }

    fn check(&self) -> Result<(), SeedError> {
        let mut seen = std::collections::HashSet::new();
        for request in &self.requests {
            request.check_invariants()?;
            if !seen.insert(request.request_number().as_str()) {
                return Err(SeedError::DuplicateRequest {
                    number: request.request_number().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Look up a user by identifier.
    pub fn find_user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    /// A repository holding the seeded requests.
    pub fn repository(&self) -> InMemoryRelocationRepository {
        InMemoryRelocationRepository::with_requests(self.requests.iter().cloned())
    }

    /// A catalogue over the seeded transport data.
    pub fn catalogue(&self) -> InMemoryTransportCatalogue {
        InMemoryTransportCatalogue::new(
            self.vehicle_types.clone(),
            self.internal_vehicles.clone(),
            self.transporters.clone(),
        )
    }
}
