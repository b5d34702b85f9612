use serde::{Deserialize, Serialize};

/// One logged shift. Immutable once written; rows only leave the table via
/// the tally/reset clear or the subject's delete-last correction. `id` is
/// insertion order, which delete-last relies on (shifts may be logged out of
/// chronological order).
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct ShiftRecord {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub session_host: String,
    pub time_started: String,
    pub time_ended: String,
    pub rank_name: String,
    pub duration_hours: f64,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

/// Insert payload for a shift; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewShift {
    pub subject_id: i64,
    pub subject_name: String,
    pub session_host: String,
    pub time_started: String,
    pub time_ended: String,
    pub rank_name: String,
    pub duration_hours: f64,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}
