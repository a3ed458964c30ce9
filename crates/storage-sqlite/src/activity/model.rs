use chrono::{DateTime, Utc};
use diesel::prelude::*;

use marketpulse_core::activity::{ActivityEntry, ActivityStatus};

/// Database model for activity log entries.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::activity_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityEntryDB {
    pub id: String,
    pub activity_type: String,
    pub activity: String,
    pub details: String,
    pub status: String,
    pub created_at: String,
}

impl From<&ActivityEntry> for ActivityEntryDB {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            id: entry.id.clone(),
            activity_type: entry.activity_type.clone(),
            activity: entry.activity.clone(),
            details: entry.details.clone(),
            status: entry.status.as_str().to_string(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

impl From<ActivityEntryDB> for ActivityEntry {
    fn from(db: ActivityEntryDB) -> Self {
        let status = match db.status.as_str() {
            "success" => ActivityStatus::Success,
            "error" => ActivityStatus::Error,
            _ => ActivityStatus::Info,
        };

        ActivityEntry {
            id: db.id,
            activity_type: db.activity_type,
            activity: db.activity,
            details: db.details,
            status,
            created_at: DateTime::parse_from_rfc3339(&db.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
        }
    }
}
