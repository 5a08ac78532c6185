//! Drivers, vehicles, trips, and expenses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{de_amount, de_opt_label};

/// How a driver's company arrives: a bare key or an expanded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompanyRef {
    /// Primary key only.
    Id(i64),
    /// Expanded company object.
    Named {
        /// Primary key, when included.
        #[serde(default)]
        id: Option<i64>,
        /// Registered company name.
        company_name: String,
    },
}

impl CompanyRef {
    /// Company name when expanded, otherwise the key as text.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Named { company_name, .. } => company_name.clone(),
        }
    }
}

/// A driver registered with a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Primary key.
    pub id: i64,
    /// Driver name.
    #[serde(default, alias = "name")]
    pub full_name: String,
    /// Mobile number.
    #[serde(default)]
    pub mobile: String,
    /// Plate of the assigned vehicle.
    #[serde(default)]
    pub plate_number: String,
    /// Vehicle type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Photo URL or `/media/...` path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    /// Employing company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
}

string_enum! {
    /// Operational state of a vehicle.
    pub enum VehicleStatus {
        Active => "active",
        Moving => "moving",
        Stopped => "stopped",
        Offline => "offline",
        Maintenance => "maintenance",
        Inactive => "inactive",
    }
}

/// A fleet vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Primary key.
    pub id: i64,
    /// License plate.
    pub plate_number: String,
    /// Vehicle type.
    #[serde(default)]
    pub vehicle_type: String,
    /// Assigned driver (name or key).
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Owning company.
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Operational status.
    pub status: VehicleStatus,
    /// Load capacity as entered.
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    /// Body color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fuel level as reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<String>,
    /// Date of the last service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance: Option<String>,
    /// Trips completed.
    #[serde(default)]
    pub total_trips: u32,
    /// Odometer reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
}

/// Fields for registering a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    /// License plate.
    pub plate_number: String,
    /// Vehicle type.
    pub vehicle_type: String,
    /// Assigned driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Initial status.
    pub status: VehicleStatus,
    /// Load capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    /// Body color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

string_enum! {
    /// Lifecycle state of a trip.
    pub enum TripStatus {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// A trip from origin to destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Primary key.
    pub id: i64,
    /// Driver name or key.
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Vehicle plate or key.
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    /// Start location.
    #[serde(default)]
    pub origin: String,
    /// End location.
    #[serde(default)]
    pub destination: String,
    /// Departure time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Arrival time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Progress status.
    pub status: TripStatus,
    /// Distance covered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    /// Elapsed time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Fuel consumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_used: Option<String>,
    /// Trip cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    /// Customer rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields for scheduling a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    /// Driver key.
    pub driver: String,
    /// Vehicle key.
    pub vehicle: String,
    /// Start location.
    pub origin: String,
    /// End location.
    pub destination: String,
    /// Departure time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Arrival time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Initial status.
    pub status: TripStatus,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

string_enum! {
    /// What an expense was for.
    pub enum ExpenseCategory {
        Fuel => "fuel",
        Maintenance => "maintenance",
        Toll => "toll",
        Repair => "repair",
        Insurance => "insurance",
    }
}

string_enum! {
    /// Approval state of an expense.
    pub enum ExpenseStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// A recorded fleet expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Primary key.
    pub id: i64,
    /// Day the cost was incurred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Cost category.
    pub category: ExpenseCategory,
    /// Amount in Toman.
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    /// What was paid for.
    #[serde(default)]
    pub description: String,
    /// Driver name or key.
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Vehicle plate or key.
    #[serde(default, deserialize_with = "de_opt_label", skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    /// Approval status.
    #[serde(default = "default_expense_status")]
    pub status: ExpenseStatus,
}

fn default_expense_status() -> ExpenseStatus {
    ExpenseStatus::Pending
}

/// Fields for recording an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// Amount in Toman.
    pub amount: f64,
    /// Cost category.
    pub category: ExpenseCategory,
    /// What was paid for.
    pub description: String,
    /// Driver key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Vehicle key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    /// Day the cost was incurred.
    pub date: NaiveDate,
    /// Cash, card, and so on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
