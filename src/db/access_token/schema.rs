use rusqlite::Row;
use std::sync::OnceLock;
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "access_token";

pub enum Columns {
    Id,
    UserId,
    Secret,
    CreatedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::UserId => "user_id",
            Columns::Secret => "secret",
            Columns::CreatedAt => "created_at",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub secret: String,
    pub created_at: OffsetDateTime,
}

impl AccessToken {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::UserId,
                Columns::Secret,
                Columns::CreatedAt,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<AccessToken> {
        |row: &_| {
            Ok(AccessToken {
                id: row.get(Columns::Id.as_str())?,
                user_id: row.get(Columns::UserId.as_str())?,
                secret: row.get(Columns::Secret.as_str())?,
                created_at: row.get(Columns::CreatedAt.as_str())?,
            })
        }
    }
}
