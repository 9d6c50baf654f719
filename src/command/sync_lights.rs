use crate::db;
use crate::service::listing;
use crate::Result;
use rusqlite::Connection;
use tracing::info;
use url::Url;

/// Fetches the remote listing once and imports it. An optional argument
/// replaces the stored listing URL before fetching.
pub async fn run(args: &[String], conn: &mut Connection) -> Result<()> {
    if let Some(url) = args.first() {
        let url = Url::parse(url)?;
        db::conf::blocking_queries::set_light_listing_url(url.as_str(), conn)?;
        info!(%url, "Light listing URL updated");
    }
    let conf = db::conf::blocking_queries::select(conn)?;
    let lights = listing::fetch(&conf.light_listing_url).await?;
    let lights_fetched = lights.len();
    let lights_imported = listing::import(&lights, conn)?;
    let lights_total = db::light::blocking_queries::select_all(conn)?.len();
    info!(lights_fetched, lights_imported, lights_total, "Finished light sync");
    Ok(())
}
