use rusqlite::Row;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use time::OffsetDateTime;

pub const TABLE_NAME: &str = "light";

pub enum Columns {
    Id,
    Code,
    Address,
    Subdistrict,
    Ward,
    Latitude,
    Longitude,
    Status,
    LastReportedAt,
    CreatedAt,
    UpdatedAt,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::Code => "code",
            Columns::Address => "address",
            Columns::Subdistrict => "subdistrict",
            Columns::Ward => "ward",
            Columns::Latitude => "latitude",
            Columns::Longitude => "longitude",
            Columns::Status => "status",
            Columns::LastReportedAt => "last_reported_at",
            Columns::CreatedAt => "created_at",
            Columns::UpdatedAt => "updated_at",
        }
    }
}

/// Operational state of a light. The government inventory is free text, so
/// anything outside the known states is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LightStatus {
    Working,
    Reported,
    Maintenance,
    Other(String),
}

impl LightStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LightStatus::Working => "working",
            LightStatus::Reported => "reported",
            LightStatus::Maintenance => "maintenance",
            LightStatus::Other(other) => other,
        }
    }
}

impl FromStr for LightStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "working" => LightStatus::Working,
            "reported" => LightStatus::Reported,
            "maintenance" => LightStatus::Maintenance,
            _ => LightStatus::Other(trimmed.to_string()),
        })
    }
}

impl From<&str> for LightStatus {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(infallible) => match infallible {},
        }
    }
}

impl fmt::Display for LightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LightStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LightStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(LightStatus::from(value.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub id: i64,
    pub code: String,
    pub address: Option<String>,
    pub subdistrict: Option<String>,
    pub ward: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: LightStatus,
    pub last_reported_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A light as described by the remote inventory, before it gets a local id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLight {
    pub code: String,
    pub address: Option<String>,
    pub subdistrict: Option<String>,
    pub ward: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: Option<LightStatus>,
}

impl Light {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::Code,
                Columns::Address,
                Columns::Subdistrict,
                Columns::Ward,
                Columns::Latitude,
                Columns::Longitude,
                Columns::Status,
                Columns::LastReportedAt,
                Columns::CreatedAt,
                Columns::UpdatedAt,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<Light> {
        |row: &_| {
            let status: String = row.get(Columns::Status.as_str())?;
            Ok(Light {
                id: row.get(Columns::Id.as_str())?,
                code: row.get(Columns::Code.as_str())?,
                address: row.get(Columns::Address.as_str())?,
                subdistrict: row.get(Columns::Subdistrict.as_str())?,
                ward: row.get(Columns::Ward.as_str())?,
                latitude: row.get(Columns::Latitude.as_str())?,
                longitude: row.get(Columns::Longitude.as_str())?,
                status: LightStatus::from(status.as_str()),
                last_reported_at: row.get(Columns::LastReportedAt.as_str())?,
                created_at: row.get(Columns::CreatedAt.as_str())?,
                updated_at: row.get(Columns::UpdatedAt.as_str())?,
            })
        }
    }
}

#[cfg(test)]
impl NewLight {
    pub fn mock(code: &str, status: LightStatus) -> NewLight {
        NewLight {
            code: code.into(),
            address: Some(format!("Jl. Sudirman {code}")),
            subdistrict: Some("Ilir Timur I".into()),
            ward: Some("20 Ilir D I".into()),
            latitude: -2.990934,
            longitude: 104.756554,
            status: Some(status),
        }
    }
}

#[cfg(test)]
mod test {
    use super::LightStatus;

    #[test]
    fn status_parsing() {
        assert_eq!(LightStatus::Working, LightStatus::from("working"));
        assert_eq!(LightStatus::Reported, LightStatus::from(" Reported "));
        assert_eq!(LightStatus::Maintenance, LightStatus::from("MAINTENANCE"));
        assert_eq!(
            LightStatus::Other("Rusak Berat".into()),
            LightStatus::from("Rusak Berat")
        );
        assert_eq!("Rusak Berat", LightStatus::from("Rusak Berat").to_string());
    }

    #[test]
    fn status_serde() -> crate::Result<()> {
        assert_eq!(
            "\"maintenance\"",
            serde_json::to_string(&LightStatus::Maintenance)?
        );
        let status: LightStatus = serde_json::from_str("\"padam\"")?;
        assert_eq!(LightStatus::Other("padam".into()), status);
        Ok(())
    }
}
