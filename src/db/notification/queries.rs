use super::blocking_queries;
use super::schema::Notification;
use crate::Result;
use deadpool_sqlite::Pool;
use time::OffsetDateTime;

pub async fn select_by_user_id(user_id: i64, pool: &Pool) -> Result<Vec<Notification>> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_user_id(user_id, conn))
        .await?
}

pub async fn mark_as_read(id: i64, user_id: i64, pool: &Pool) -> Result<usize> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::mark_as_read(id, user_id, conn))
        .await?
}

pub async fn mark_all_as_read(user_id: i64, pool: &Pool) -> Result<usize> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::mark_all_as_read(user_id, conn))
        .await?
}

pub async fn set_deleted_at(
    id: i64,
    user_id: i64,
    deleted_at: OffsetDateTime,
    pool: &Pool,
) -> Result<usize> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::set_deleted_at(id, user_id, deleted_at, conn))
        .await?
}
