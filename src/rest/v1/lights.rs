use crate::db;
use crate::db::light::schema::{Light, LightStatus};
use crate::log::RequestExtension;
use crate::rest::error::RestResult as Res;
use crate::service;
use crate::service::light::LightFilter;
use crate::service::map::BoundingBox;
use crate::Result;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, HttpMessage, HttpRequest};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Deserialize)]
pub struct GetListArgs {
    pub q: Option<String>,
    pub status: Option<String>,
    pub bbox: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GetItem {
    pub id: i64,
    pub code: String,
    pub address: Option<String>,
    pub subdistrict: Option<String>,
    pub ward: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: LightStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_reported_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Light> for GetItem {
    fn from(light: Light) -> Self {
        GetItem {
            id: light.id,
            code: light.code,
            address: light.address,
            subdistrict: light.subdistrict,
            ward: light.ward,
            latitude: light.latitude,
            longitude: light.longitude,
            status: light.status,
            last_reported_at: light.last_reported_at,
            updated_at: light.updated_at,
        }
    }
}

/// Loads the inventory and narrows it down by status, text query and bounds.
pub async fn select_filtered(
    status: Option<&str>,
    query: Option<&str>,
    bbox: Option<&str>,
    pool: &Pool,
) -> Result<Vec<Light>> {
    let bbox = bbox
        .filter(|it| !it.trim().is_empty())
        .map(BoundingBox::parse)
        .transpose()?;
    let lights = db::light::queries::select_all(pool).await?;
    let mut lights = LightFilter::new(status, query).apply(lights);
    if let Some(bbox) = bbox {
        lights.retain(|it| bbox.contains(it));
    }
    Ok(lights)
}

#[get("")]
pub async fn get(req: HttpRequest, args: Query<GetListArgs>, pool: Data<Pool>) -> Res<Vec<GetItem>> {
    let lights = select_filtered(
        args.status.as_deref(),
        args.q.as_deref(),
        args.bbox.as_deref(),
        &pool,
    )
    .await?;
    req.extensions_mut()
        .insert(RequestExtension::new(lights.len()));
    Ok(Json(lights.into_iter().map(Into::into).collect()))
}

#[get("{id}")]
pub async fn get_by_id(id: Path<i64>, pool: Data<Pool>) -> Res<GetItem> {
    let light = db::light::queries::select_by_id(id.into_inner(), &pool).await?;
    Ok(Json(light.into()))
}

#[derive(Serialize, Deserialize)]
pub struct SyncRes {
    pub lights_fetched: usize,
    pub lights_imported: usize,
}

#[post("sync")]
pub async fn post_sync(req: HttpRequest, pool: Data<Pool>) -> Res<SyncRes> {
    service::auth::require_admin(&req, &pool).await?;
    let conf = db::conf::queries::select(&pool).await?;
    let res = service::listing::sync(&conf.light_listing_url, &pool).await?;
    Ok(Json(SyncRes {
        lights_fetched: res.lights_fetched,
        lights_imported: res.lights_imported,
    }))
}
