//! Port for read-only transport catalogue lookups.

use async_trait::async_trait;

use crate::domain::{
    InternalVehicle, Transporter, TransporterId, VehicleId, VehicleType, VehicleTypeId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by transport catalogue adapters.
    pub enum TransportCatalogueError {
        /// Catalogue could not be reached.
        Connection { message: String } =>
            "transport catalogue connection failed: {message}"; transient,
        /// Lookup failed during execution.
        Query { message: String } =>
            "transport catalogue query failed: {message}",
    }
}

/// Vehicle types, the internal fleet and approved transporters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportCatalogue: Send + Sync {
    /// Look up a vehicle capacity class.
    async fn vehicle_type(
        &self,
        id: VehicleTypeId,
    ) -> Result<Option<VehicleType>, TransportCatalogueError>;

    /// Look up an internal fleet vehicle.
    async fn internal_vehicle(
        &self,
        id: VehicleId,
    ) -> Result<Option<InternalVehicle>, TransportCatalogueError>;

    /// Look up an approved external transporter.
    async fn transporter(
        &self,
        id: TransporterId,
    ) -> Result<Option<Transporter>, TransportCatalogueError>;
}

/// Fixture implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTransportCatalogue;

#[async_trait]
impl TransportCatalogue for FixtureTransportCatalogue {
    async fn vehicle_type(
        &self,
        _id: VehicleTypeId,
    ) -> Result<Option<VehicleType>, TransportCatalogueError> {
        Ok(None)
    }

    async fn internal_vehicle(
        &self,
        _id: VehicleId,
    ) -> Result<Option<InternalVehicle>, TransportCatalogueError> {
        Ok(None)
    }

    async fn transporter(
        &self,
        _id: TransporterId,
    ) -> Result<Option<Transporter>, TransportCatalogueError> {
        Ok(None)
    }
}
