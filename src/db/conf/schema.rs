use rusqlite::Row;
use std::sync::OnceLock;

pub const TABLE_NAME: &str = "conf";

pub enum Columns {
    MapStyle,
    MapInitialLatitude,
    MapInitialLongitude,
    MapInitialZoom,
    LightListingUrl,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::MapStyle => "map_style",
            Columns::MapInitialLatitude => "map_initial_latitude",
            Columns::MapInitialLongitude => "map_initial_longitude",
            Columns::MapInitialZoom => "map_initial_zoom",
            Columns::LightListingUrl => "light_listing_url",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Conf {
    pub map_style: String,
    pub map_initial_latitude: f64,
    pub map_initial_longitude: f64,
    pub map_initial_zoom: f64,
    pub light_listing_url: String,
}

impl Conf {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::MapStyle,
                Columns::MapInitialLatitude,
                Columns::MapInitialLongitude,
                Columns::MapInitialZoom,
                Columns::LightListingUrl,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<Self> {
        |row| {
            Ok(Self {
                map_style: row.get(Columns::MapStyle.as_str())?,
                map_initial_latitude: row.get(Columns::MapInitialLatitude.as_str())?,
                map_initial_longitude: row.get(Columns::MapInitialLongitude.as_str())?,
                map_initial_zoom: row.get(Columns::MapInitialZoom.as_str())?,
                light_listing_url: row.get(Columns::LightListingUrl.as_str())?,
            })
        }
    }
}
