//! Transport and dispatch records carried on a relocation request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::catalogue::{
    InternalVehicle, Transporter, TransporterId, VehicleFeatureId, VehicleId, VehicleTypeId,
};
use crate::domain::user::UserId;

/// Transport arrangements for a request.
///
/// `is_internal` mirrors the request's transport type and is only ever
/// changed together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportDetails {
    /// Whether the internal fleet moves the asset.
    pub is_internal: bool,
    /// Requested or allocated capacity class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleTypeId>,
    /// Vehicle and driver, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<TransportAssignment>,
    /// Mirrors `dispatchStatus.isDispatched`.
    #[serde(default)]
    pub is_dispatched: bool,
}

impl TransportDetails {
    /// Fresh details for a newly submitted request.
    pub fn unassigned(is_internal: bool, vehicle_type: Option<VehicleTypeId>) -> Self {
        Self {
            is_internal,
            vehicle_type,
            assignment: None,
            is_dispatched: false,
        }
    }

    /// Whether a vehicle and driver have been recorded.
    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }
}

/// The vehicle and driver moving the asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportAssignment {
    /// Allocated from the internal fleet by the transport administrator.
    Internal(InternalAssignment),
    /// Arranged by the requester with an approved transporter.
    External(ExternalTransport),
}

/// An internal fleet allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalAssignment {
    /// Fleet vehicle.
    pub vehicle_id: VehicleId,
    /// Capacity class copied from the fleet record.
    pub vehicle_type: VehicleTypeId,
    /// Registration plate.
    pub registration: String,
    /// Driver name.
    pub driver: String,
    /// Driver contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_mobile: Option<String>,
    /// Planned transport date.
    pub transport_date: NaiveDate,
}

/// Transport arranged with an external transporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTransport {
    /// Approved transporter.
    pub transporter_id: TransporterId,
    /// Transporter name copied from the catalogue.
    pub transporter_name: String,
    /// Transporter contact copied from the catalogue.
    pub transporter_contact: String,
    /// Vehicle registration plate.
    pub registration: String,
    /// Driver name.
    pub driver: String,
    /// Driver identity document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id_number: Option<String>,
    /// Driver contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_mobile: Option<String>,
    /// Vehicle features requested (crane, tail lift, ...).
    #[serde(default)]
    pub features: Vec<VehicleFeatureId>,
    /// Quoted cost in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost_cents: Option<u64>,
}

/// Transport administrator input for an internal allocation.
///
/// Omitted driver and registration fall back to the fleet record; an omitted
/// date falls back to the request's desired date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalTransportInput {
    /// Fleet vehicle to allocate.
    pub vehicle_id: VehicleId,
    /// Driver override.
    #[serde(default)]
    pub driver: Option<String>,
    /// Driver contact number.
    #[serde(default)]
    pub driver_mobile: Option<String>,
    /// Registration override.
    #[serde(default)]
    pub registration: Option<String>,
    /// Transport date override.
    #[serde(default)]
    pub transport_date: Option<NaiveDate>,
}

impl InternalTransportInput {
    /// Input that takes every value from the fleet record.
    pub fn for_vehicle(vehicle_id: VehicleId) -> Self {
        Self {
            vehicle_id,
            driver: None,
            driver_mobile: None,
            registration: None,
            transport_date: None,
        }
    }

    /// Combine the input with its fleet record.
    ///
    /// # Errors
    /// Returns `invalid_request` when the vehicle does not match or the
    /// resolved driver or registration is blank.
    pub fn resolve(
        self,
        vehicle: &InternalVehicle,
        default_date: NaiveDate,
    ) -> Result<InternalAssignment, Error> {
        if vehicle.id != self.vehicle_id {
            return Err(Error::invalid_request(format!(
                "vehicle {} does not match the selected vehicle {}",
                vehicle.id, self.vehicle_id
            )));
        }
        let driver = non_blank_or(self.driver, &vehicle.driver);
        let registration = non_blank_or(self.registration, &vehicle.registration);
        require("driver", &driver)?;
        require("registration", &registration)?;
        Ok(InternalAssignment {
            vehicle_id: vehicle.id,
            vehicle_type: vehicle.vehicle_type,
            registration,
            driver,
            driver_mobile: trimmed(self.driver_mobile),
            transport_date: self.transport_date.unwrap_or(default_date),
        })
    }
}

/// Requester input describing external transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTransportInput {
    /// Approved transporter.
    pub transporter_id: TransporterId,
    /// Vehicle registration plate.
    pub registration: String,
    /// Driver name.
    pub driver: String,
    /// Driver identity document number.
    #[serde(default)]
    pub driver_id_number: Option<String>,
    /// Driver contact number.
    #[serde(default)]
    pub driver_mobile: Option<String>,
    /// Vehicle features requested.
    #[serde(default)]
    pub features: Vec<VehicleFeatureId>,
    /// Quoted cost in cents.
    #[serde(default)]
    pub estimated_cost_cents: Option<u64>,
}

impl ExternalTransportInput {
    /// Combine the input with the transporter's catalogue record.
    ///
    /// # Errors
    /// Returns `invalid_request` when the transporter does not match or the
    /// driver or registration is blank.
    pub fn resolve(self, transporter: &Transporter) -> Result<ExternalTransport, Error> {
        if transporter.id != self.transporter_id {
            return Err(Error::invalid_request(format!(
                "transporter {} does not match the selected transporter {}",
                transporter.id, self.transporter_id
            )));
        }
        let driver = self.driver.trim().to_owned();
        let registration = self.registration.trim().to_owned();
        require("driver", &driver)?;
        require("registration", &registration)?;
        Ok(ExternalTransport {
            transporter_id: transporter.id,
            transporter_name: transporter.name.clone(),
            transporter_contact: transporter.contact_person.clone(),
            registration,
            driver,
            driver_id_number: trimmed(self.driver_id_number),
            driver_mobile: trimmed(self.driver_mobile),
            features: self.features,
            estimated_cost_cents: self.estimated_cost_cents,
        })
    }
}

/// Dispatch progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchStatus {
    /// Whether the asset has left the source location.
    pub is_dispatched: bool,
    /// Who released the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatched_by: Option<String>,
    /// Identifier of who released the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatched_by_user_id: Option<UserId>,
    /// When the asset was released.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_date: Option<DateTime<Utc>>,
    /// The custodian at the source location was told.
    #[serde(default)]
    pub current_custodian_notified: bool,
    /// The custodian at the destination was told.
    #[serde(default)]
    pub new_custodian_notified: bool,
    /// Expected arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Delivery confirmation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    /// Who confirmed delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
}

/// Dispatch input from the transport tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchDetails {
    /// Expected arrival.
    #[serde(default)]
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// The custodian at the source location was told.
    #[serde(default)]
    pub current_custodian_notified: bool,
    /// The custodian at the destination was told.
    #[serde(default)]
    pub new_custodian_notified: bool,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    trimmed(value).unwrap_or_else(|| fallback.trim().to_owned())
}

fn require(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(
            Error::invalid_request(format!("{field} is required"))
                .with_details(serde_json::json!({ "field": field })),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn truck() -> InternalVehicle {
        InternalVehicle {
            id: VehicleId::new(2),
            vehicle_type: VehicleTypeId::new(2),
            registration: "DEF456GP".to_owned(),
            capacity: "2000kg".to_owned(),
            driver: "Mike Johnson".to_owned(),
        }
    }

    #[fixture]
    fn crane_pro() -> Transporter {
        Transporter {
            id: TransporterId::new(3),
            name: "CranePro Movers".to_owned(),
            contact_person: "James Wilson".to_owned(),
            phone: "011-555-0125".to_owned(),
            email: "dispatch@cranepro.com".to_owned(),
            specializations: vec!["Heavy Machinery".to_owned()],
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date")
    }

    #[rstest]
    fn internal_input_defaults_from_fleet_record(truck: InternalVehicle) {
        let assignment = InternalTransportInput::for_vehicle(truck.id)
            .resolve(&truck, date(20))
            .expect("resolves");
        assert_eq!(assignment.driver, "Mike Johnson");
        assert_eq!(assignment.registration, "DEF456GP");
        assert_eq!(assignment.vehicle_type, VehicleTypeId::new(2));
        assert_eq!(assignment.transport_date, date(20));
    }

    #[rstest]
    fn internal_input_overrides_win(truck: InternalVehicle) {
        let input = InternalTransportInput {
            driver: Some("  Sipho Dlamini ".to_owned()),
            driver_mobile: Some("082 555 0101".to_owned()),
            transport_date: Some(date(22)),
            ..InternalTransportInput::for_vehicle(truck.id)
        };
        let assignment = input.resolve(&truck, date(20)).expect("resolves");
        assert_eq!(assignment.driver, "Sipho Dlamini");
        assert_eq!(assignment.driver_mobile.as_deref(), Some("082 555 0101"));
        assert_eq!(assignment.transport_date, date(22));
    }

    #[rstest]
    fn internal_input_rejects_blank_fleet_driver(mut truck: InternalVehicle) {
        truck.driver = " ".to_owned();
        let err = InternalTransportInput::for_vehicle(truck.id)
            .resolve(&truck, date(20))
            .expect_err("driver missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "driver is required");
    }

    #[rstest]
    fn internal_input_rejects_mismatched_vehicle(truck: InternalVehicle) {
        let err = InternalTransportInput::for_vehicle(VehicleId::new(9))
            .resolve(&truck, date(20))
            .expect_err("mismatch");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn external_input_copies_transporter_contact(crane_pro: Transporter) {
        let input = ExternalTransportInput {
            transporter_id: crane_pro.id,
            registration: "CP-001-GP".to_owned(),
            driver: "Peter Nkosi".to_owned(),
            driver_id_number: None,
            driver_mobile: Some(" ".to_owned()),
            features: vec![VehicleFeatureId::new(1)],
            estimated_cost_cents: Some(450_000),
        };
        let transport = input.resolve(&crane_pro).expect("resolves");
        assert_eq!(transport.transporter_name, "CranePro Movers");
        assert_eq!(transport.transporter_contact, "James Wilson");
        assert_eq!(transport.driver_mobile, None);
    }

    #[rstest]
    fn external_input_requires_registration(crane_pro: Transporter) {
        let input = ExternalTransportInput {
            transporter_id: crane_pro.id,
            registration: String::new(),
            driver: "Peter Nkosi".to_owned(),
            driver_id_number: None,
            driver_mobile: None,
            features: Vec::new(),
            estimated_cost_cents: None,
        };
        let err = input.resolve(&crane_pro).expect_err("registration missing");
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&serde_json::json!("registration")));
    }

    #[rstest]
    fn assignment_is_tagged_by_kind(truck: InternalVehicle) {
        let assignment = InternalTransportInput::for_vehicle(truck.id)
            .resolve(&truck, date(20))
            .expect("resolves");
        let value =
            serde_json::to_value(TransportAssignment::Internal(assignment)).expect("serialize");
        assert_eq!(value["kind"], "internal");
        assert_eq!(value["registration"], "DEF456GP");
    }
}
