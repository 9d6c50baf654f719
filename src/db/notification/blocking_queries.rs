use super::schema::{self, Columns, Notification, NotificationStatus};
use crate::Result;
use rusqlite::{named_params, params, Connection};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub fn insert(
    user_id: i64,
    title: &str,
    message: &str,
    status: NotificationStatus,
    conn: &Connection,
) -> Result<Notification> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {user_id},
                {title},
                {message},
                {status}
            ) VALUES (
                :user_id,
                :title,
                :message,
                :status
            )
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        user_id = Columns::UserId.as_str(),
        title = Columns::Title.as_str(),
        message = Columns::Message.as_str(),
        status = Columns::Status.as_str(),
        projection = Notification::projection(),
    );
    conn.query_row(
        &sql,
        named_params! {
            ":user_id": user_id,
            ":title": title,
            ":message": message,
            ":status": status.as_ref(),
        },
        Notification::mapper(),
    )
    .map_err(Into::into)
}

pub fn select_by_user_id(user_id: i64, conn: &Connection) -> Result<Vec<Notification>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {user_id} = ?1 AND {deleted_at} IS NULL
            ORDER BY {created_at} DESC, {id} DESC
        "#,
        projection = Notification::projection(),
        table = schema::TABLE_NAME,
        user_id = Columns::UserId.as_str(),
        deleted_at = Columns::DeletedAt.as_str(),
        created_at = Columns::CreatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.prepare(&sql)?
        .query_map(params![user_id], Notification::mapper())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Returns the number of affected rows, zero means the notification doesn't
/// exist, belongs to another user or was dismissed.
pub fn mark_as_read(id: i64, user_id: i64, conn: &Connection) -> Result<usize> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {read} = 1
            WHERE {id} = ?1 AND {user_id} = ?2 AND {deleted_at} IS NULL
        "#,
        table = schema::TABLE_NAME,
        read = Columns::Read.as_str(),
        id = Columns::Id.as_str(),
        user_id = Columns::UserId.as_str(),
        deleted_at = Columns::DeletedAt.as_str(),
    );
    conn.execute(&sql, params![id, user_id]).map_err(Into::into)
}

pub fn mark_all_as_read(user_id: i64, conn: &Connection) -> Result<usize> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {read} = 1
            WHERE {user_id} = ?1 AND {read} = 0 AND {deleted_at} IS NULL
        "#,
        table = schema::TABLE_NAME,
        read = Columns::Read.as_str(),
        user_id = Columns::UserId.as_str(),
        deleted_at = Columns::DeletedAt.as_str(),
    );
    conn.execute(&sql, params![user_id]).map_err(Into::into)
}

pub fn set_deleted_at(
    id: i64,
    user_id: i64,
    deleted_at: OffsetDateTime,
    conn: &Connection,
) -> Result<usize> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {deleted_at} = ?3
            WHERE {id} = ?1 AND {user_id} = ?2 AND {deleted_at} IS NULL
        "#,
        table = schema::TABLE_NAME,
        deleted_at = Columns::DeletedAt.as_str(),
        id = Columns::Id.as_str(),
        user_id = Columns::UserId.as_str(),
    );
    conn.execute(&sql, params![id, user_id, deleted_at.format(&Rfc3339)?])
        .map_err(Into::into)
}
