use crate::db::conf::schema::Conf;
use crate::db::light::schema::Light;
use crate::{Error, Result};
use geo::{coord, Intersects, Point, Rect};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 20.0;

// Percent of the map width a degree moves a marker per zoom level
const PROJECTION_SCALE: f64 = 0.02;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(latitude: f64, longitude: f64, zoom: f64) -> Self {
        Viewport {
            latitude,
            longitude,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Same as [`Viewport::new`] but rejects coordinates outside of the map.
    pub fn checked(latitude: f64, longitude: f64, zoom: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput(format!(
                "Latitude must be between -90 and 90: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput(format!(
                "Longitude must be between -180 and 180: {longitude}"
            )));
        }
        if zoom.is_nan() {
            return Err(Error::InvalidInput("Zoom must be a number".into()));
        }
        Ok(Viewport::new(latitude, longitude, zoom))
    }

    pub fn initial(conf: &Conf) -> Self {
        Viewport::new(
            conf.map_initial_latitude,
            conf.map_initial_longitude,
            conf.map_initial_zoom,
        )
    }

    pub fn zoom_in(self) -> Self {
        Viewport::new(self.latitude, self.longitude, self.zoom + 1.0)
    }

    pub fn zoom_out(self) -> Self {
        Viewport::new(self.latitude, self.longitude, self.zoom - 1.0)
    }

    /// Applies a zoom step by name, `in` or `out`.
    pub fn step(self, step: &str) -> Result<Self> {
        match step {
            "in" => Ok(self.zoom_in()),
            "out" => Ok(self.zoom_out()),
            _ => Err(Error::InvalidInput(format!(
                "Unknown zoom step: {step}, expected in or out"
            ))),
        }
    }

    /// Takes the next viewport reported by the map and returns `true` if
    /// anything actually moved.
    pub fn apply(&mut self, next: Viewport) -> bool {
        let next = Viewport::new(next.latitude, next.longitude, next.zoom);
        if *self == next {
            return false;
        }
        *self = next;
        true
    }

    /// Position of a light relative to the viewport, in percent of the map
    /// width and height, with the center at 50/50.
    pub fn project(&self, latitude: f64, longitude: f64) -> ScreenPosition {
        ScreenPosition {
            left: (longitude - self.longitude) * PROJECTION_SCALE * self.zoom + 50.0,
            top: (self.latitude - latitude) * PROJECTION_SCALE * self.zoom + 50.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ScreenPosition {
    pub left: f64,
    pub top: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox(Rect<f64>);

impl BoundingBox {
    /// Parses `min_lon,min_lat,max_lon,max_lat`.
    pub fn parse(value: &str) -> Result<Self> {
        let parts = value
            .split(',')
            .map(|it| it.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidInput(format!("Invalid bbox: {value}")))?;
        let [min_lon, min_lat, max_lon, max_lat] = parts[..] else {
            return Err(Error::InvalidInput(
                "bbox must have 4 values: min_lon,min_lat,max_lon,max_lat".into(),
            ));
        };
        if !(-180.0..=180.0).contains(&min_lon)
            || !(-180.0..=180.0).contains(&max_lon)
            || !(-90.0..=90.0).contains(&min_lat)
            || !(-90.0..=90.0).contains(&max_lat)
        {
            return Err(Error::InvalidInput(format!("bbox is out of range: {value}")));
        }
        if min_lon > max_lon || min_lat > max_lat {
            return Err(Error::InvalidInput(format!(
                "bbox min values must not exceed max values: {value}"
            )));
        }
        Ok(BoundingBox(Rect::new(
            coord! { x: min_lon, y: min_lat },
            coord! { x: max_lon, y: max_lat },
        )))
    }

    pub fn contains(&self, light: &Light) -> bool {
        self.0
            .intersects(&Point::new(light.longitude, light.latitude))
    }
}

pub fn feature_collection(lights: &[Light]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: lights.iter().map(feature).collect(),
        foreign_members: None,
    }
}

fn feature(light: &Light) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("code".into(), Value::String(light.code.clone()));
    properties.insert("status".into(), Value::String(light.status.to_string()));
    if let Some(address) = &light.address {
        properties.insert("address".into(), Value::String(address.clone()));
    }
    if let Some(subdistrict) = &light.subdistrict {
        properties.insert("subdistrict".into(), Value::String(subdistrict.clone()));
    }
    if let Some(ward) = &light.ward {
        properties.insert("ward".into(), Value::String(ward.clone()));
    }
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![
            light.longitude,
            light.latitude,
        ]))),
        id: Some(geojson::feature::Id::Number(light.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}
