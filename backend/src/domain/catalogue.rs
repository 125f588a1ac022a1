//! Reference data: locations, asset categories and the transport catalogue.
//!
//! Requests copy the location, category and asset values they need at
//! creation time. Those copies are a historical record; later renames in the
//! catalogue never rewrite an existing request.

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Access the raw identifier.
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id! {
    /// Identifier of a site location.
    LocationId
}
numeric_id! {
    /// Identifier of an asset category.
    CategoryId
}
numeric_id! {
    /// Identifier of a fixed asset in the asset register.
    AssetId
}
numeric_id! {
    /// Identifier of a vehicle capacity class.
    VehicleTypeId
}
numeric_id! {
    /// Identifier of a vehicle in the internal fleet.
    VehicleId
}
numeric_id! {
    /// Identifier of an approved external transporter.
    TransporterId
}
numeric_id! {
    /// Identifier of an optional vehicle feature (crane, tail lift, ...).
    VehicleFeatureId
}

/// A site location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Stable identifier.
    pub id: LocationId,
    /// Display name, e.g. `Warehouse A`.
    pub name: String,
    /// Short code, e.g. `WH-A`.
    pub code: String,
}

/// An asset category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCategory {
    /// Stable identifier.
    pub id: CategoryId,
    /// Display name, e.g. `IT Equipment`.
    pub name: String,
}

/// The asset values copied onto a request when it is raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSnapshot {
    /// Register identifier.
    pub asset_id: AssetId,
    /// Asset name at request time.
    pub asset_name: String,
    /// Asset tag code at request time, e.g. `FUR-001`.
    pub asset_code: String,
    /// Category at request time.
    pub asset_category: AssetCategory,
}

/// A vehicle capacity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    /// Stable identifier.
    pub id: VehicleTypeId,
    /// Display name, e.g. `2-Ton Truck`.
    pub name: String,
    /// Capacity label, e.g. `2000kg`.
    pub capacity: String,
    /// Descriptive features.
    #[serde(default)]
    pub features: Vec<String>,
}

/// A vehicle in the internal fleet with its regular driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalVehicle {
    /// Stable identifier.
    pub id: VehicleId,
    /// Capacity class.
    pub vehicle_type: VehicleTypeId,
    /// Registration plate.
    pub registration: String,
    /// Capacity label.
    pub capacity: String,
    /// Regular driver.
    pub driver: String,
}

/// An approved external transporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transporter {
    /// Stable identifier.
    pub id: TransporterId,
    /// Company name.
    pub name: String,
    /// Contact person.
    pub contact_person: String,
    /// Contact phone.
    pub phone: String,
    /// Dispatch e-mail.
    pub email: String,
    /// Specialisations advertised by the transporter.
    #[serde(default)]
    pub specializations: Vec<String>,
}

/// An optional vehicle feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFeature {
    /// Stable identifier.
    pub id: VehicleFeatureId,
    /// Display name.
    pub name: String,
    /// What the feature is for.
    pub description: String,
}
