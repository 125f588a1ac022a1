//! In-memory transport catalogue.

use async_trait::async_trait;

use crate::domain::ports::{TransportCatalogue, TransportCatalogueError};
use crate::domain::{
    InternalVehicle, Transporter, TransporterId, VehicleId, VehicleType, VehicleTypeId,
};

/// Catalogue over fixed lists loaded at start-up.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransportCatalogue {
    vehicle_types: Vec<VehicleType>,
    vehicles: Vec<InternalVehicle>,
    transporters: Vec<Transporter>,
}

impl InMemoryTransportCatalogue {
    /// Create a catalogue from its three lists.
    pub fn new(
        vehicle_types: Vec<VehicleType>,
        vehicles: Vec<InternalVehicle>,
        transporters: Vec<Transporter>,
    ) -> Self {
        Self {
            vehicle_types,
            vehicles,
            transporters,
        }
    }
}

#[async_trait]
impl TransportCatalogue for InMemoryTransportCatalogue {
    async fn vehicle_type(
        &self,
        id: VehicleTypeId,
    ) -> Result<Option<VehicleType>, TransportCatalogueError> {
        Ok(self.vehicle_types.iter().find(|entry| entry.id == id).cloned())
    }

    async fn internal_vehicle(
        &self,
        id: VehicleId,
    ) -> Result<Option<InternalVehicle>, TransportCatalogueError> {
        Ok(self.vehicles.iter().find(|entry| entry.id == id).cloned())
    }

    async fn transporter(
        &self,
        id: TransporterId,
    ) -> Result<Option<Transporter>, TransportCatalogueError> {
        Ok(self.transporters.iter().find(|entry| entry.id == id).cloned())
    }
}
