use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| format!("unknown blood group: {}", s))
    }
}

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// A point is resolved when it is finite and not the all-zero sentinel
    /// written for donors whose address never geocoded.
    pub fn is_resolved(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && !(self.latitude == 0.0 && self.longitude == 0.0)
    }
}

/// Registered donor, without credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    pub city: String,
    pub state: String,
    pub address: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(rename = "availableToDonate", default = "default_true")]
    pub available_to_donate: bool,
    #[serde(rename = "lastDonationDate", default)]
    pub last_donation_date: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Donor {
    /// Location usable for distance ranking
    pub fn resolved_location(&self) -> Option<GeoPoint> {
        self.location.filter(GeoPoint::is_resolved)
    }
}

fn default_true() -> bool { true }

/// New donor row prior to insertion
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub city: String,
    pub state: String,
    pub address: String,
    pub location: GeoPoint,
}

/// Partial donor update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct DonorUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub available_to_donate: Option<bool>,
    /// `Some(None)` clears the stored date
    pub last_donation_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Urgency::Low),
            "Medium" => Ok(Urgency::Medium),
            "High" => Ok(Urgency::High),
            "Critical" => Ok(Urgency::Critical),
            other => Err(format!("unknown urgency: {}", other)),
        }
    }
}

/// Request lifecycle; starts `Active` and only changes on explicit update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Active,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Active => "Active",
            RequestStatus::Fulfilled => "Fulfilled",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(RequestStatus::Active),
            "Fulfilled" => Ok(RequestStatus::Fulfilled),
            "Cancelled" => Ok(RequestStatus::Cancelled),
            other => Err(format!("unknown request status: {}", other)),
        }
    }
}

/// Blood request posted by a donor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: Uuid,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    #[serde(rename = "unitsNeeded")]
    pub units_needed: i32,
    #[serde(rename = "hospitalName")]
    pub hospital_name: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "contactPerson")]
    pub contact_person: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
    pub urgency: Urgency,
    pub status: RequestStatus,
    #[serde(rename = "requestedBy")]
    pub requested_by: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// New request row prior to insertion
#[derive(Debug, Clone)]
pub struct NewBloodRequest {
    pub patient_name: String,
    pub blood_group: BloodGroup,
    pub units_needed: i32,
    pub hospital_name: String,
    pub city: String,
    pub state: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub urgency: Urgency,
    pub requested_by: Uuid,
}

/// Name and email of the donor who posted a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requester {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Request joined with its requester, as listed publicly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithRequester {
    #[serde(flatten)]
    pub request: BloodRequest,
    #[serde(rename = "requester")]
    pub requester: Requester,
}
