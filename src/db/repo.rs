use std::collections::HashMap;

use sqlx::{PgPool, Row};

use crate::db::models::{NewShift, ShiftRecord};

/// Insert a new shift row.
pub async fn insert_shift(pool: &PgPool, shift: &NewShift) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shifts
        (subject_id, subject_name, session_host, time_started, time_ended, rank_name, duration_hours, rating, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(shift.subject_id)
    .bind(&shift.subject_name)
    .bind(&shift.session_host)
    .bind(&shift.time_started)
    .bind(&shift.time_ended)
    .bind(&shift.rank_name)
    .bind(shift.duration_hours)
    .bind(shift.rating)
    .bind(&shift.notes)
    .execute(pool)
    .await?;
    Ok(())
}

/// Summed logged hours per subject, over the whole table.
pub async fn sum_hours_by_subject(pool: &PgPool) -> anyhow::Result<HashMap<i64, f64>> {
    let rows = sqlx::query(
        "SELECT subject_id, SUM(duration_hours) AS total_hours FROM shifts GROUP BY subject_id",
    )
    .fetch_all(pool)
    .await?;

    let mut totals = HashMap::with_capacity(rows.len());
    for row in rows {
        let subject_id: i64 = row.get("subject_id");
        let total: Option<f64> = row.get("total_hours");
        totals.insert(subject_id, total.unwrap_or(0.0));
    }
    Ok(totals)
}

/// Delete every shift row, resetting accrual for the next period.
/// Returns the number of rows removed.
pub async fn clear_shifts(pool: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM shifts").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Delete the subject's most recently inserted shift (by `id`, not by the
/// logged time fields). Returns the removed row, or `None` when the subject
/// has nothing logged.
pub async fn delete_last_for_subject(
    pool: &PgPool,
    subject_id: i64,
) -> anyhow::Result<Option<ShiftRecord>> {
    let record = sqlx::query_as::<_, ShiftRecord>(
        r#"
        DELETE FROM shifts
        WHERE id = (SELECT id FROM shifts WHERE subject_id = $1 ORDER BY id DESC LIMIT 1)
        RETURNING id, subject_id, subject_name, session_host, time_started, time_ended, rank_name, duration_hours, rating, notes
        "#,
    )
    .bind(subject_id)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}
