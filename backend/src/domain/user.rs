//! Actor model: who is calling into the workflow.
//!
//! Users are created and authenticated elsewhere; the workflow only reads
//! them. A user's role decides which queue they work, and the assigned
//! location/category sets scope what an asset manager (and, at creation, a
//! custodian) may touch. An empty set means "unrestricted".

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalogue::{CategoryId, LocationId};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier had leading or trailing whitespace.
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable, opaque user identifier issued by the identity collaborator.
///
/// # Examples
/// ```
/// use moveitright::domain::UserId;
///
/// let id = UserId::new("5").expect("valid id");
/// assert_eq!(id.as_str(), "5");
/// assert!(UserId::new(" 5").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Borrow the identifier as text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Error returned when parsing an unknown role label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.input)
    }
}

impl std::error::Error for ParseRoleError {}

/// The closed set of workflow roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages the system; sees every request.
    SystemAdmin,
    /// Owns assets at their locations and raises relocation requests.
    Custodian,
    /// Allocates internal vehicles or declares internal transport unavailable.
    TransportAdmin,
    /// Head of department; first-line approver.
    Hod,
    /// Final approver scoped by category and location.
    AssetManager,
}

impl Role {
    /// Every role, in dashboard order.
    pub const ALL: [Self; 5] = [
        Self::SystemAdmin,
        Self::Custodian,
        Self::TransportAdmin,
        Self::Hod,
        Self::AssetManager,
    ];

    /// Returns the stored label.
    ///
    /// # Examples
    /// ```
    /// use moveitright::domain::Role;
    ///
    /// assert_eq!(Role::AssetManager.as_str(), "asset_manager");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemAdmin => "system_admin",
            Self::Custodian => "custodian",
            Self::TransportAdmin => "transport_admin",
            Self::Hod => "hod",
            Self::AssetManager => "asset_manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseRoleError {
                input: s.to_owned(),
            })
    }
}

/// Explicit permission grants carried on a user record.
///
/// Only [`Permission::CreateRequest`] widens what the resolver allows; the
/// remaining grants describe the role and are kept so user records round-trip
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// May raise relocation requests regardless of role.
    CreateRequest,
    /// May view their own requests.
    ViewOwnRequests,
    /// First-line approval.
    ApproveRequests,
    /// May view department requests.
    ViewDepartmentRequests,
    /// Final approval.
    FinalApproveRequests,
    /// May view category-scoped requests.
    ViewCategoryRequests,
    /// May manage the asset register.
    ManageAssets,
    /// May assign internal transport.
    AssignTransport,
    /// May manage the internal fleet.
    ManageInternalVehicles,
    /// May view the transport queue.
    ViewTransportRequests,
    /// May manage users.
    ManageUsers,
    /// May manage system configuration.
    ManageSystem,
    /// May view every request.
    ViewAllRequests,
    /// May manage settings.
    ManageSettings,
}

/// A user as supplied by the identity collaborator.
///
/// # Examples
/// ```
/// use moveitright::domain::{Role, User, UserId};
///
/// let hod = User::new(UserId::new("5").expect("id"), "Michael Brown", Role::Hod);
/// assert_eq!(hod.role, Role::Hod);
/// assert!(hod.assigned_locations.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Display name recorded on approvals and history entries.
    pub name: String,
    /// Workflow role.
    pub role: Role,
    /// Department label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Explicit grants.
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    /// Locations the user is scoped to; empty means all.
    #[serde(default)]
    pub assigned_locations: BTreeSet<LocationId>,
    /// Asset categories the user is scoped to; empty means all.
    #[serde(default)]
    pub assigned_categories: BTreeSet<CategoryId>,
}

impl User {
    /// Create an unscoped user with no explicit grants.
    pub fn new(id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            department: None,
            permissions: BTreeSet::new(),
            assigned_locations: BTreeSet::new(),
            assigned_categories: BTreeSet::new(),
        }
    }

    /// Restrict the user to the given locations.
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = LocationId>) -> Self {
        self.assigned_locations = locations.into_iter().collect();
        self
    }

    /// Restrict the user to the given asset categories.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.assigned_categories = categories.into_iter().collect();
        self
    }

    /// Add an explicit permission grant.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Whether the user holds an explicit grant.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Whether the location scope admits `location` (empty scope admits all).
    pub fn covers_location(&self, location: LocationId) -> bool {
        self.assigned_locations.is_empty() || self.assigned_locations.contains(&location)
    }

    /// Whether the category scope admits `category` (empty scope admits all).
    pub fn covers_category(&self, category: CategoryId) -> bool {
        self.assigned_categories.is_empty() || self.assigned_categories.contains(&category)
    }
}
