use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Client, LeadStage, Property, PropertyStatus, Reminder, ReminderStatus};

const DASHBOARD_PREVIEW: usize = 3;
const TOP_AREAS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: PropertyStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: LeadStage,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCount {
    pub area: String,
    pub count: usize,
}

/// Home screen summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_properties: usize,
    pub total_clients: usize,
    pub pending_reminders: usize,
    pub inventory: Vec<StatusCount>,
    pub upcoming_reminders: Vec<Reminder>,
    pub favorite_properties: Vec<Property>,
    pub favorite_clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderMetrics {
    pub completed: usize,
    pub client_no_shows: usize,
    pub owner_no_shows: usize,
    /// Percentage of reminders rescheduled at least once
    pub reschedule_rate: u32,
}

/// Analytics report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub lead_funnel: Vec<StageCount>,
    pub top_areas: Vec<AreaCount>,
    pub inventory: Vec<StatusCount>,
    pub total_value: u64,
    pub average_ticket: u64,
    pub conversion_rate: u32,
    pub show_rate: u32,
    pub reminders: ReminderMetrics,
}

/// Rounded percentage; an empty denominator counts as one
#[inline]
fn percent(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole.max(1) as f64) * 100.0).round() as u32
}

/// Listing counts for Available, Sold and Rented, dropping empty buckets
pub fn inventory_counts(properties: &[Property]) -> Vec<StatusCount> {
    [PropertyStatus::Available, PropertyStatus::Sold, PropertyStatus::Rented]
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: properties.iter().filter(|p| p.status == status).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect()
}

pub fn dashboard(
    properties: &[Property],
    clients: &[Client],
    reminders: &[Reminder],
) -> DashboardSummary {
    let mut upcoming: Vec<Reminder> =
        reminders.iter().filter(|r| !r.is_completed).cloned().collect();
    let pending_reminders = upcoming.len();
    upcoming.sort_by_key(|r| r.time);
    upcoming.truncate(DASHBOARD_PREVIEW);

    DashboardSummary {
        total_properties: properties.len(),
        total_clients: clients.len(),
        pending_reminders,
        inventory: inventory_counts(properties),
        upcoming_reminders: upcoming,
        favorite_properties: properties
            .iter()
            .filter(|p| p.is_favorite)
            .take(DASHBOARD_PREVIEW)
            .cloned()
            .collect(),
        favorite_clients: clients
            .iter()
            .filter(|c| c.is_favorite)
            .take(DASHBOARD_PREVIEW)
            .cloned()
            .collect(),
    }
}

pub fn report(
    properties: &[Property],
    clients: &[Client],
    reminders: &[Reminder],
) -> ReportSummary {
    let lead_funnel = LeadStage::ALL
        .into_iter()
        .map(|stage| StageCount {
            stage,
            count: clients.iter().filter(|c| c.lead_stage == stage).count(),
        })
        .collect();

    // Area popularity, ties broken by name so the report is deterministic
    let mut by_area: HashMap<&str, usize> = HashMap::new();
    for property in properties {
        *by_area.entry(property.location.area.as_str()).or_default() += 1;
    }
    let mut top_areas: Vec<AreaCount> = by_area
        .into_iter()
        .map(|(area, count)| AreaCount {
            area: area.to_string(),
            count,
        })
        .collect();
    top_areas.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.area.cmp(&b.area)));
    top_areas.truncate(TOP_AREAS);

    let total_value: u64 = properties.iter().map(|p| p.price).sum();
    let average_ticket = if properties.is_empty() {
        0
    } else {
        total_value / properties.len() as u64
    };

    let closed = clients.iter().filter(|c| c.lead_stage == LeadStage::Closed).count();

    let completed: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| r.status == ReminderStatus::Completed)
        .collect();
    let absent = completed.iter().filter(|r| r.client_present == Some(false)).count();
    let show_rate = if completed.is_empty() {
        100
    } else {
        percent(completed.len() - absent, completed.len())
    };

    let reminder_metrics = ReminderMetrics {
        completed: completed.len(),
        client_no_shows: reminders
            .iter()
            .filter(|r| r.is_completed && r.client_present == Some(false))
            .count(),
        owner_no_shows: reminders
            .iter()
            .filter(|r| r.is_completed && r.owner_present == Some(false))
            .count(),
        reschedule_rate: percent(
            reminders.iter().filter(|r| r.reschedule_count > 0).count(),
            reminders.len(),
        ),
    };

    ReportSummary {
        lead_funnel,
        top_areas,
        inventory: inventory_counts(properties),
        total_value,
        average_ticket,
        conversion_rate: percent(closed, clients.len()),
        show_rate,
        reminders: reminder_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_property(id: &str, area: &str, status: &str, price: u64, favorite: bool) -> Property {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": id,
            "transactionType": "Rent",
            "price": price,
            "bhk": "1BHK",
            "furnishing": "Semi",
            "status": status,
            "isFavorite": favorite,
            "location": { "area": area, "city": "Pune" }
        }))
        .unwrap()
    }

    fn create_client(stage: &str) -> Client {
        serde_json::from_value(serde_json::json!({
            "name": "Lead",
            "phone": "1",
            "maritalStatus": "Married",
            "requirement": "Rent",
            "leadStage": stage,
            "budgetMin": 0,
            "budgetMax": 1
        }))
        .unwrap()
    }

    fn create_reminder(
        time: &str,
        completed: bool,
        client_present: Option<bool>,
        rescheduled: u32,
    ) -> Reminder {
        let status = if completed { "Completed" } else { "Pending" };
        serde_json::from_value(serde_json::json!({
            "id": time,
            "title": "Visit",
            "time": time,
            "status": status,
            "isCompleted": completed,
            "clientPresent": client_present,
            "rescheduleCount": rescheduled
        }))
        .unwrap()
    }

    #[test]
    fn test_inventory_drops_empty_buckets() {
        let properties = vec![
            create_property("1", "Baner", "Available", 10, false),
            create_property("2", "Baner", "On Hold", 10, false),
            create_property("3", "Aundh", "Sold", 10, false),
        ];
        let inventory = inventory_counts(&properties);
        assert_eq!(
            inventory,
            vec![
                StatusCount { status: PropertyStatus::Available, count: 1 },
                StatusCount { status: PropertyStatus::Sold, count: 1 },
            ]
        );
    }

    #[test]
    fn test_dashboard_upcoming_sorted() {
        let reminders = vec![
            create_reminder("2024-05-04T09:00:00Z", false, None, 0),
            create_reminder("2024-05-01T09:00:00Z", false, None, 0),
            create_reminder("2024-04-01T09:00:00Z", true, Some(true), 0),
            create_reminder("2024-05-03T09:00:00Z", false, None, 0),
            create_reminder("2024-05-02T09:00:00Z", false, None, 0),
        ];

        let summary = dashboard(&[], &[], &reminders);
        assert_eq!(summary.pending_reminders, 4);
        let ids: Vec<&str> = summary.upcoming_reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["2024-05-01T09:00:00Z", "2024-05-02T09:00:00Z", "2024-05-03T09:00:00Z"]
        );
    }

    #[test]
    fn test_report_aggregates() {
        let properties = vec![
            create_property("1", "Baner", "Available", 100, true),
            create_property("2", "Baner", "Rented", 200, false),
            create_property("3", "Aundh", "Sold", 300, false),
        ];
        let clients = vec![
            create_client("Closed"),
            create_client("New"),
            create_client("New"),
            create_client("Lost"),
        ];
        let reminders = vec![
            create_reminder("2024-05-01T09:00:00Z", true, Some(true), 0),
            create_reminder("2024-05-02T09:00:00Z", true, Some(false), 1),
            create_reminder("2024-05-03T09:00:00Z", false, None, 0),
            create_reminder("2024-05-04T09:00:00Z", false, None, 0),
        ];

        let summary = report(&properties, &clients, &reminders);

        assert_eq!(summary.total_value, 600);
        assert_eq!(summary.average_ticket, 200);
        assert_eq!(summary.conversion_rate, 25);
        assert_eq!(summary.show_rate, 50);
        assert_eq!(summary.top_areas[0], AreaCount { area: "Baner".to_string(), count: 2 });
        assert_eq!(summary.lead_funnel.len(), 7);
        assert_eq!(summary.lead_funnel[0], StageCount { stage: LeadStage::New, count: 2 });
        assert_eq!(summary.reminders.completed, 2);
        assert_eq!(summary.reminders.client_no_shows, 1);
        assert_eq!(summary.reminders.reschedule_rate, 25);
    }

    #[test]
    fn test_empty_report() {
        let summary = report(&[], &[], &[]);
        assert_eq!(summary.average_ticket, 0);
        assert_eq!(summary.show_rate, 100);
        assert_eq!(summary.conversion_rate, 0);
        assert!(summary.inventory.is_empty());
    }
}
