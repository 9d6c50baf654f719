use super::schema::{self, Columns, Conf};
use crate::Result;
use rusqlite::{params, Connection};

pub fn select(conn: &Connection) -> Result<Conf> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
        "#,
        projection = Conf::projection(),
        table = schema::TABLE_NAME,
    );
    conn.prepare(&sql)?
        .query_row((), Conf::mapper())
        .map_err(Into::into)
}

pub fn set_light_listing_url(url: &str, conn: &Connection) -> Result<Conf> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {light_listing_url} = ?1
        "#,
        table = schema::TABLE_NAME,
        light_listing_url = Columns::LightListingUrl.as_str(),
    );
    conn.execute(&sql, params![url])?;
    select(conn)
}
