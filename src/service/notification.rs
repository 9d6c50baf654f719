use crate::db;
use crate::db::notification::schema::Notification;
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};
use tracing::info;

/// Human friendly age of a notification, as shown in the notification center.
pub fn relative_time(created_at: OffsetDateTime, now: OffsetDateTime) -> String {
    let age = now - created_at;
    if age < Duration::minutes(1) {
        return "Just now".into();
    }
    if age < Duration::hours(1) {
        return plural(age.whole_minutes(), "minute");
    }
    if age < Duration::days(1) {
        return plural(age.whole_hours(), "hour");
    }
    if age < Duration::days(2) {
        return "Yesterday".into();
    }
    if age < Duration::weeks(1) {
        return plural(age.whole_days(), "day");
    }
    created_at
        .format(format_description!(
            "[month repr:short] [day padding:none], [year]"
        ))
        .unwrap_or_else(|_| created_at.date().to_string())
}

fn plural(count: i64, unit: &str) -> String {
    match count {
        1 => format!("1 {unit} ago"),
        _ => format!("{count} {unit}s ago"),
    }
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|it| !it.read).count()
}

pub async fn mark_as_read(id: i64, user_id: i64, pool: &Pool) -> Result<()> {
    match db::notification::queries::mark_as_read(id, user_id, pool).await? {
        0 => Err(Error::NotFound(format!(
            "Notification with id {id} doesn't exist"
        ))),
        _ => Ok(()),
    }
}

pub async fn mark_all_as_read(user_id: i64, pool: &Pool) -> Result<usize> {
    let updated = db::notification::queries::mark_all_as_read(user_id, pool).await?;
    info!(user_id, updated, "Marked all notifications as read");
    Ok(updated)
}

pub async fn dismiss(id: i64, user_id: i64, pool: &Pool) -> Result<()> {
    let deleted =
        db::notification::queries::set_deleted_at(id, user_id, OffsetDateTime::now_utc(), pool)
            .await?;
    match deleted {
        0 => Err(Error::NotFound(format!(
            "Notification with id {id} doesn't exist"
        ))),
        _ => Ok(()),
    }
}
