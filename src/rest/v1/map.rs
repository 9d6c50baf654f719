use super::lights::select_filtered;
use crate::conf::EnvConf;
use crate::db;
use crate::db::light::schema::LightStatus;
use crate::log::RequestExtension;
use crate::rest::error::RestResult as Res;
use crate::service;
use crate::service::light::{LightFilter, LightStats};
use crate::service::map::{ScreenPosition, Viewport, MAX_ZOOM, MIN_ZOOM};
use actix_web::web::{Data, Json, Query};
use actix_web::{get, post, HttpMessage, HttpRequest};
use deadpool_sqlite::Pool;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ConfigRes {
    pub style: String,
    pub access_token: Option<String>,
    pub initial_viewport: Viewport,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

#[get("config")]
pub async fn get_config(pool: Data<Pool>, env_conf: Data<EnvConf>) -> Res<ConfigRes> {
    let conf = db::conf::queries::select(&pool).await?;
    Ok(Json(ConfigRes {
        initial_viewport: Viewport::initial(&conf),
        style: conf.map_style,
        access_token: env_conf.map_access_token.clone(),
        min_zoom: MIN_ZOOM,
        max_zoom: MAX_ZOOM,
    }))
}

#[get("stats")]
pub async fn get_stats(pool: Data<Pool>) -> Res<LightStats> {
    let lights = db::light::queries::select_all(&pool).await?;
    Ok(Json(service::light::stats(&lights)))
}

#[derive(Deserialize)]
pub struct GetGeoJsonArgs {
    pub q: Option<String>,
    pub status: Option<String>,
    pub bbox: Option<String>,
}

#[get("lights.geojson")]
pub async fn get_geojson(
    req: HttpRequest,
    args: Query<GetGeoJsonArgs>,
    pool: Data<Pool>,
) -> Res<FeatureCollection> {
    let lights = select_filtered(
        args.status.as_deref(),
        args.q.as_deref(),
        args.bbox.as_deref(),
        &pool,
    )
    .await?;
    req.extensions_mut()
        .insert(RequestExtension::new(lights.len()));
    Ok(Json(service::map::feature_collection(&lights)))
}

#[derive(Deserialize)]
pub struct GetMarkersArgs {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<f64>,
    pub status: Option<String>,
    /// `in` or `out`, applied to the requested zoom level
    pub step: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct Marker {
    pub id: i64,
    pub code: String,
    pub status: LightStatus,
    pub position: ScreenPosition,
    pub visible: bool,
}

#[derive(Serialize, Deserialize)]
pub struct MarkersRes {
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
}

#[get("markers")]
pub async fn get_markers(
    req: HttpRequest,
    args: Query<GetMarkersArgs>,
    pool: Data<Pool>,
) -> Res<MarkersRes> {
    let initial = Viewport::initial(&db::conf::queries::select(&pool).await?);
    let viewport = Viewport::checked(
        args.lat.unwrap_or(initial.latitude),
        args.lon.unwrap_or(initial.longitude),
        args.zoom.unwrap_or(initial.zoom),
    )?;
    let viewport = match args.step.as_deref() {
        Some(step) => viewport.step(step)?,
        None => viewport,
    };
    let lights = db::light::queries::select_all(&pool).await?;
    let lights = LightFilter::new(args.status.as_deref(), None).apply(lights);
    req.extensions_mut()
        .insert(RequestExtension::new(lights.len()));
    let markers = lights
        .into_iter()
        .map(|light| {
            let position = viewport.project(light.latitude, light.longitude);
            Marker {
                id: light.id,
                code: light.code,
                status: light.status,
                visible: (0.0..=100.0).contains(&position.left)
                    && (0.0..=100.0).contains(&position.top),
                position,
            }
        })
        .collect();
    Ok(Json(MarkersRes { viewport, markers }))
}

#[derive(Deserialize)]
pub struct PostViewportArgs {
    pub current: Viewport,
    pub next: Viewport,
}

#[derive(Serialize, Deserialize)]
pub struct PostViewportRes {
    pub viewport: Viewport,
    pub changed: bool,
}

#[post("viewport")]
pub async fn post_viewport(args: Json<PostViewportArgs>) -> Res<PostViewportRes> {
    let mut viewport = args.current;
    let changed = viewport.apply(args.next);
    Ok(Json(PostViewportRes { viewport, changed }))
}
