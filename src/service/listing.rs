use crate::db;
use crate::db::light::schema::{LightStatus, NewLight};
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    #[serde(rename = "Projects")]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, alias = "codenumber")]
    code: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default, alias = "kecamatan")]
    subdistrict: Option<String>,
    #[serde(default, alias = "kelurahan")]
    ward: Option<String>,
    #[serde(default)]
    status: Option<String>,
    latitude: Coordinate,
    longitude: Coordinate,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Text(String),
    Number(f64),
}

impl Coordinate {
    fn parse(&self, range: f64) -> Option<f64> {
        let value = match self {
            Coordinate::Text(text) => text.trim().parse::<f64>().ok()?,
            Coordinate::Number(number) => *number,
        };
        (value.is_finite() && value.abs() <= range).then_some(value)
    }

    fn raw(&self) -> String {
        match self {
            Coordinate::Text(text) => text.clone(),
            Coordinate::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SyncRes {
    pub lights_fetched: usize,
    pub lights_imported: usize,
}

/// Decodes the listing envelope. Any malformed record fails the whole batch
/// so that a bad response can never reach the stored inventory.
pub fn decode(body: &[u8]) -> Result<Vec<NewLight>> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| Error::Listing(e.to_string()))?;
    envelope
        .data
        .projects
        .into_iter()
        .enumerate()
        .map(|(index, project)| to_new_light(index, project))
        .collect()
}

fn to_new_light(index: usize, project: Project) -> Result<NewLight> {
    let latitude = project.latitude.parse(90.0).ok_or_else(|| {
        Error::Listing(format!(
            "project #{index} has invalid latitude {:?}",
            project.latitude.raw()
        ))
    })?;
    let longitude = project.longitude.parse(180.0).ok_or_else(|| {
        Error::Listing(format!(
            "project #{index} has invalid longitude {:?}",
            project.longitude.raw()
        ))
    })?;
    let code = non_blank(project.code)
        .or_else(|| match project.id {
            Some(Value::Number(id)) => Some(id.to_string()),
            Some(Value::String(id)) => non_blank(Some(id)),
            _ => None,
        })
        .ok_or_else(|| Error::Listing(format!("project #{index} has neither code nor id")))?;
    Ok(NewLight {
        code,
        address: non_blank(project.address),
        subdistrict: non_blank(project.subdistrict),
        ward: non_blank(project.ward),
        latitude,
        longitude,
        status: non_blank(project.status).map(|it| LightStatus::from(it.as_str())),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|it| it.trim().to_string())
        .filter(|it| !it.is_empty())
}

pub async fn fetch(url: &str) -> Result<Vec<NewLight>> {
    let url = Url::parse(url)?;
    info!(%url, "Fetching light listing");
    let response = reqwest::Client::builder()
        .timeout(TIMEOUT)
        .build()?
        .get(url)
        .send()
        .await?;
    info!(http_status_code = ?response.status(), "Got light listing response");
    if !response.status().is_success() {
        return Err(Error::Listing(format!(
            "unexpected HTTP status {}",
            response.status()
        )));
    }
    let body = response.bytes().await?;
    let lights = decode(&body)?;
    info!(lights = lights.len(), "Decoded light listing");
    Ok(lights)
}

/// All or nothing, the inventory is only touched if every record fits.
pub fn import(lights: &[NewLight], conn: &mut Connection) -> Result<usize> {
    let tx = conn.transaction()?;
    for light in lights {
        db::light::blocking_queries::upsert(light, &tx)?;
    }
    tx.commit()?;
    Ok(lights.len())
}

pub async fn sync(url: &str, pool: &Pool) -> Result<SyncRes> {
    let lights = fetch(url).await?;
    let lights_fetched = lights.len();
    let lights_imported = pool
        .get()
        .await?
        .interact(move |conn| import(&lights, conn))
        .await??;
    info!(lights_fetched, lights_imported, "Light listing synced");
    Ok(SyncRes {
        lights_fetched,
        lights_imported,
    })
}
