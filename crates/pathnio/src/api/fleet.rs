//! Drivers, vehicles, trips and expenses.

use super::{item_path, list_all};
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Driver, Expense, NewExpense, NewTrip, NewVehicle, Trip, Vehicle};

const DRIVERS: &str = "accounts/drivers/";
const VEHICLES: &str = "accounts/vehicles/";
const TRIPS: &str = "accounts/trips/";
const EXPENSES: &str = "accounts/expenses/";

/// List drivers.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_drivers(client: &ApiClient) -> Result<Vec<Driver>> {
    list_all(client, DRIVERS).await
}

/// Fetch one driver.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_driver(client: &ApiClient, id: i64) -> Result<Driver> {
    client.get(&item_path(DRIVERS, id)).await
}

/// List vehicles.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_vehicles(client: &ApiClient) -> Result<Vec<Vehicle>> {
    list_all(client, VEHICLES).await
}

/// Fetch one vehicle.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_vehicle(client: &ApiClient, id: i64) -> Result<Vehicle> {
    client.get(&item_path(VEHICLES, id)).await
}

/// Register a vehicle.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn create_vehicle(client: &ApiClient, vehicle: &NewVehicle) -> Result<Vehicle> {
    client.post(VEHICLES, vehicle).await
}

/// List trips.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_trips(client: &ApiClient) -> Result<Vec<Trip>> {
    list_all(client, TRIPS).await
}

/// Fetch one trip.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_trip(client: &ApiClient, id: i64) -> Result<Trip> {
    client.get(&item_path(TRIPS, id)).await
}

/// Schedule a trip.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn create_trip(client: &ApiClient, trip: &NewTrip) -> Result<Trip> {
    client.post(TRIPS, trip).await
}

/// List expenses.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_expenses(client: &ApiClient) -> Result<Vec<Expense>> {
    list_all(client, EXPENSES).await
}

/// Fetch one expense.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get_expense(client: &ApiClient, id: i64) -> Result<Expense> {
    client.get(&item_path(EXPENSES, id)).await
}

/// Record an expense.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn create_expense(client: &ApiClient, expense: &NewExpense) -> Result<Expense> {
    client.post(EXPENSES, expense).await
}
