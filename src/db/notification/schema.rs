use rusqlite::types::Type;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use strum::{AsRefStr, Display, EnumString};
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "notification";

pub enum Columns {
    Id,
    UserId,
    Title,
    Message,
    Status,
    Read,
    CreatedAt,
    DeletedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::UserId => "user_id",
            Columns::Title => "title",
            Columns::Message => "message",
            Columns::Status => "status",
            Columns::Read => "read",
            Columns::CreatedAt => "created_at",
            Columns::DeletedAt => "deleted_at",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationStatus {
    Info,
    Success,
    Warning,
    Update,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    pub read: bool,
    pub created_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl Notification {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::UserId,
                Columns::Title,
                Columns::Message,
                Columns::Status,
                Columns::Read,
                Columns::CreatedAt,
                Columns::DeletedAt,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<Notification> {
        |row: &_| {
            let status: String = row.get(Columns::Status.as_str())?;
            let status = status.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?;
            Ok(Notification {
                id: row.get(Columns::Id.as_str())?,
                user_id: row.get(Columns::UserId.as_str())?,
                title: row.get(Columns::Title.as_str())?,
                message: row.get(Columns::Message.as_str())?,
                status,
                read: row.get(Columns::Read.as_str())?,
                created_at: row.get(Columns::CreatedAt.as_str())?,
                deleted_at: row.get(Columns::DeletedAt.as_str())?,
            })
        }
    }
}
