//! Status vocabulary of a relocation request.
//!
//! The labels are stored verbatim; renaming one breaks every stored record,
//! so the wire form is pinned by [`RequestStatus::as_str`] rather than by
//! serde's case conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRequestStatusError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseRequestStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown request status: {}", self.input)
    }
}

impl std::error::Error for ParseRequestStatusError {}

/// Where a request sits in its lifecycle.
///
/// # Examples
/// ```
/// use moveitright::domain::RequestStatus;
///
/// let status: RequestStatus = "Pending Admin Transport".parse().expect("known label");
/// assert_eq!(status, RequestStatus::PendingAdminTransport);
/// assert!(status.is_pending());
/// assert!(!status.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequestStatus {
    /// Submitted; waiting for the assigned HOD.
    PendingHodApproval,
    /// HOD approved (ERP vocabulary; not produced by local transitions).
    HodApproved,
    /// Waiting for the assigned asset manager.
    PendingManagerApproval,
    /// Manager approved (ERP vocabulary; not produced by local transitions).
    ManagerApproved,
    /// Fully approved external request, ready for dispatch.
    Approved,
    /// Fully approved internal request waiting for a vehicle.
    PendingAdminTransport,
    /// Internal vehicle and driver assigned.
    TransportArranged,
    /// No internal vehicle; the requester must arrange transport.
    ExternalTransportRequired,
    /// Dispatched and in transit.
    InProgress,
    /// Delivered. Terminal.
    Completed,
    /// Denied by an approver. Terminal.
    Denied,
}

impl RequestStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 11] = [
        Self::PendingHodApproval,
        Self::HodApproved,
        Self::PendingManagerApproval,
        Self::ManagerApproved,
        Self::Approved,
        Self::PendingAdminTransport,
        Self::TransportArranged,
        Self::ExternalTransportRequired,
        Self::InProgress,
        Self::Completed,
        Self::Denied,
    ];

    /// Statuses that make up the transport administrator's queue.
    pub const TRANSPORT_QUEUE: [Self; 3] = [
        Self::PendingAdminTransport,
        Self::TransportArranged,
        Self::ExternalTransportRequired,
    ];

    /// Returns the stored label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingHodApproval => "Pending HOD Approval",
            Self::HodApproved => "HOD Approved",
            Self::PendingManagerApproval => "Pending Manager Approval",
            Self::ManagerApproved => "Manager Approved",
            Self::Approved => "Approved",
            Self::PendingAdminTransport => "Pending Admin Transport",
            Self::TransportArranged => "Transport Arranged",
            Self::ExternalTransportRequired => "External Transport Required",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Denied => "Denied",
        }
    }

    /// `Completed` and `Denied` accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Denied)
    }

    /// Whether the label reads as pending.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Self::PendingHodApproval | Self::PendingManagerApproval | Self::PendingAdminTransport
        )
    }

    /// Whether the label reads as approved (`HOD Approved`,
    /// `Manager Approved`, `Approved`).
    pub fn is_approved_label(self) -> bool {
        matches!(
            self,
            Self::HodApproved | Self::ManagerApproved | Self::Approved
        )
    }

    /// Whether the status belongs to the transport administrator's queue.
    pub fn in_transport_queue(self) -> bool {
        Self::TRANSPORT_QUEUE.contains(&self)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = ParseRequestStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseRequestStatusError {
                input: s.to_owned(),
            })
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = ParseRequestStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestStatus> for String {
    fn from(value: RequestStatus) -> Self {
        value.as_str().to_owned()
    }
}

/// Error returned when parsing an unknown transport type label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransportTypeError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseTransportTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transport type: {}", self.input)
    }
}

impl std::error::Error for ParseTransportTypeError {}

/// Who moves the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportType {
    /// The internal fleet, allocated by the transport administrator.
    Internal,
    /// An approved external transporter arranged by the requester.
    External,
}

impl TransportType {
    /// Returns the stored label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External",
        }
    }

    /// Whether this is [`TransportType::Internal`].
    pub fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportType {
    type Err = ParseTransportTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Internal" => Ok(Self::Internal),
            "External" => Ok(Self::External),
            _ => Err(ParseTransportTypeError {
                input: s.to_owned(),
            }),
        }
    }
}
