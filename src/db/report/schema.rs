use rusqlite::types::Type;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "report";

pub enum Columns {
    Id,
    UserId,
    LightCode,
    IssueType,
    Description,
    Photo,
    Latitude,
    Longitude,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::UserId => "user_id",
            Columns::LightCode => "light_code",
            Columns::IssueType => "issue_type",
            Columns::Description => "description",
            Columns::Photo => "photo",
            Columns::Latitude => "latitude",
            Columns::Longitude => "longitude",
            Columns::Status => "status",
            Columns::CreatedAt => "created_at",
            Columns::UpdatedAt => "updated_at",
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IssueType {
    NotWorking,
    Flickering,
    Damaged,
    ExposedWires,
    Other,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub id: i64,
    pub user_id: Option<i64>,
    pub light_code: String,
    pub issue_type: IssueType,
    pub description: String,
    pub photo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ReportStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewReport {
    pub user_id: Option<i64>,
    pub light_code: String,
    pub issue_type: IssueType,
    pub description: String,
    pub photo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn parse_column<T: FromStr>(row: &Row, column: Columns) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.get(column.as_str())?;
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

impl Report {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::UserId,
                Columns::LightCode,
                Columns::IssueType,
                Columns::Description,
                Columns::Photo,
                Columns::Latitude,
                Columns::Longitude,
                Columns::Status,
                Columns::CreatedAt,
                Columns::UpdatedAt,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<Report> {
        |row: &_| {
            Ok(Report {
                id: row.get(Columns::Id.as_str())?,
                user_id: row.get(Columns::UserId.as_str())?,
                light_code: row.get(Columns::LightCode.as_str())?,
                issue_type: parse_column(row, Columns::IssueType)?,
                description: row.get(Columns::Description.as_str())?,
                photo: row.get(Columns::Photo.as_str())?,
                latitude: row.get(Columns::Latitude.as_str())?,
                longitude: row.get(Columns::Longitude.as_str())?,
                status: parse_column(row, Columns::Status)?,
                created_at: row.get(Columns::CreatedAt.as_str())?,
                updated_at: row.get(Columns::UpdatedAt.as_str())?,
            })
        }
    }
}

#[cfg(test)]
impl NewReport {
    pub fn mock(user_id: Option<i64>, light_code: &str) -> NewReport {
        NewReport {
            user_id,
            light_code: light_code.into(),
            issue_type: IssueType::NotWorking,
            description: "The lamp has been dark for three nights".into(),
            photo: None,
            latitude: Some(-2.990934),
            longitude: Some(104.756554),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{IssueType, ReportStatus};
    use std::str::FromStr;

    #[test]
    fn status_names() {
        assert_eq!("in-progress", ReportStatus::InProgress.to_string());
        assert_eq!(
            ReportStatus::InProgress,
            ReportStatus::from_str("in-progress").unwrap()
        );
        assert!(ReportStatus::from_str("in_progress").is_err());
    }

    #[test]
    fn issue_type_names() {
        assert_eq!("exposed_wires", IssueType::ExposedWires.as_ref());
        assert_eq!(
            IssueType::NotWorking,
            IssueType::from_str("not_working").unwrap()
        );
        assert_eq!(
            "\"not_working\"",
            serde_json::to_string(&IssueType::NotWorking).unwrap()
        );
    }
}
