//! Derived views computed client-side from fetched lists.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Driver, Expense, ExpenseStatus, Ticket, TicketStatus, Trip, Vehicle};

/// Search and status filter for the ticket list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Case-insensitive substring matched against subject and message.
    pub search: Option<String>,
    /// Only tickets in this status; `None` keeps all.
    pub status: Option<TicketStatus>,
}

impl TicketFilter {
    /// Build a filter from CLI-style input, where `"all"` means no status
    /// filter and an empty search means no search.
    #[must_use]
    pub fn new(search: Option<&str>, status: Option<&str>) -> Self {
        Self {
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            status: status
                .filter(|s| !s.trim().eq_ignore_ascii_case("all"))
                .map(TicketStatus::from),
        }
    }

    /// Whether a ticket passes the filter.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = &self.status {
            if &ticket.status != status {
                return false;
            }
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                ticket.subject.to_lowercase().contains(&needle)
                    || ticket.message.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Tickets passing `filter`, in their original order.
#[must_use]
pub fn filter_tickets<'a>(tickets: &'a [Ticket], filter: &TicketFilter) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| filter.matches(t)).collect()
}

/// Headline ticket counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketCounts {
    /// All tickets.
    pub total: usize,
    /// Open plus answered.
    pub open: usize,
    /// Closed.
    pub closed: usize,
}

impl TicketCounts {
    /// Count tickets by status.
    #[must_use]
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        Self {
            total: tickets.len(),
            open: tickets.iter().filter(|t| t.is_open()).count(),
            closed: tickets
                .iter()
                .filter(|t| t.status == TicketStatus::Closed)
                .count(),
        }
    }
}

/// Dashboard summary over the fleet resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetSummary {
    /// Number of drivers.
    pub drivers: usize,
    /// Number of vehicles.
    pub vehicles: usize,
    /// Vehicle count per canonical status.
    pub vehicles_by_status: BTreeMap<String, usize>,
    /// Number of trips.
    pub trips: usize,
    /// Trip count per canonical status.
    pub trips_by_status: BTreeMap<String, usize>,
    /// Number of expenses.
    pub expenses: usize,
    /// Sum of all expense amounts.
    pub expense_total: f64,
    /// Expense sum per category.
    pub expense_by_category: BTreeMap<String, f64>,
    /// Expenses awaiting approval.
    pub pending_expenses: usize,
}

impl FleetSummary {
    /// Summarize already-fetched lists.
    #[must_use]
    pub fn from_parts(
        drivers: &[Driver],
        vehicles: &[Vehicle],
        trips: &[Trip],
        expenses: &[Expense],
    ) -> Self {
        let mut summary = Self {
            drivers: drivers.len(),
            vehicles: vehicles.len(),
            trips: trips.len(),
            expenses: expenses.len(),
            ..Self::default()
        };

        for vehicle in vehicles {
            *summary
                .vehicles_by_status
                .entry(vehicle.status.to_string())
                .or_default() += 1;
        }
        for trip in trips {
            *summary
                .trips_by_status
                .entry(trip.status.to_string())
                .or_default() += 1;
        }
        for expense in expenses {
            summary.expense_total += expense.amount;
            *summary
                .expense_by_category
                .entry(expense.category.to_string())
                .or_default() += expense.amount;
            if expense.status == ExpenseStatus::Pending {
                summary.pending_expenses += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: i64, subject: &str, message: &str, status: &str) -> Ticket {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "subject": subject,
            "message": message,
            "status": status
        }))
        .unwrap()
    }

    fn tickets() -> Vec<Ticket> {
        vec![
            ticket(1, "GPS offline", "Truck shows no position", "open"),
            ticket(2, "Invoice", "Missing invoice for June", "answered"),
            ticket(3, "Feature request", "Export trips to CSV", "closed"),
            ticket(4, "Login issue", "Cannot reset password", "pending"),
        ]
    }

    #[test]
    fn test_search_matches_subject_or_message() {
        let all = tickets();
        let filter = TicketFilter::new(Some("INVOICE"), None);
        let ids: Vec<i64> = filter_tickets(&all, &filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);

        let filter = TicketFilter::new(Some("csv"), None);
        let ids: Vec<i64> = filter_tickets(&all, &filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_status_all_keeps_everything() {
        let all = tickets();
        assert_eq!(filter_tickets(&all, &TicketFilter::new(None, Some("all"))).len(), 4);
        assert_eq!(filter_tickets(&all, &TicketFilter::default()).len(), 4);
        assert_eq!(filter_tickets(&all, &TicketFilter::new(Some("  "), None)).len(), 4);
    }

    #[test]
    fn test_status_and_search_combine() {
        let all = tickets();
        let filter = TicketFilter::new(Some("o"), Some("Open"));
        let ids: Vec<i64> = filter_tickets(&all, &filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_ticket_counts() {
        let counts = TicketCounts::from_tickets(&tickets());
        assert_eq!(
            counts,
            TicketCounts {
                total: 4,
                open: 2,
                closed: 1
            }
        );
    }

    #[test]
    fn test_fleet_summary() {
        let vehicles: Vec<Vehicle> = serde_json::from_value(serde_json::json!([
            {"id": 1, "plate_number": "A", "status": "Active"},
            {"id": 2, "plate_number": "B", "status": "active"},
            {"id": 3, "plate_number": "C", "status": "Maintenance"}
        ]))
        .unwrap();
        let trips: Vec<Trip> = serde_json::from_value(serde_json::json!([
            {"id": 1, "status": "Completed"},
            {"id": 2, "status": "In Progress"}
        ]))
        .unwrap();
        let expenses: Vec<Expense> = serde_json::from_value(serde_json::json!([
            {"id": 1, "category": "Fuel", "amount": 1000, "status": "Approved"},
            {"id": 2, "category": "Fuel", "amount": "500.5"},
            {"id": 3, "category": "Toll", "amount": 250}
        ]))
        .unwrap();

        let summary = FleetSummary::from_parts(&[], &vehicles, &trips, &expenses);
        assert_eq!(summary.drivers, 0);
        assert_eq!(summary.vehicles_by_status["active"], 2);
        assert_eq!(summary.vehicles_by_status["maintenance"], 1);
        assert_eq!(summary.trips_by_status["in_progress"], 1);
        assert!((summary.expense_total - 1750.5).abs() < 1e-9);
        assert!((summary.expense_by_category["fuel"] - 1500.5).abs() < 1e-9);
        assert_eq!(summary.pending_expenses, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = FleetSummary::from_parts(&[], &[], &[], &[]);
        assert_eq!(summary, FleetSummary::default());
    }
}
