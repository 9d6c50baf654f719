use super::schema::{self, Columns, Light, LightStatus, NewLight};
use crate::Result;
use rusqlite::{named_params, params, Connection, OptionalExtension};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub fn upsert(light: &NewLight, conn: &Connection) -> Result<Light> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {code},
                {address},
                {subdistrict},
                {ward},
                {latitude},
                {longitude},
                {status}
            ) VALUES (
                :code,
                :address,
                :subdistrict,
                :ward,
                :latitude,
                :longitude,
                coalesce(:status, 'working')
            )
            ON CONFLICT({code}) DO UPDATE SET
                {address} = excluded.{address},
                {subdistrict} = excluded.{subdistrict},
                {ward} = excluded.{ward},
                {latitude} = excluded.{latitude},
                {longitude} = excluded.{longitude},
                {status} = coalesce(:status, {status}),
                {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        code = Columns::Code.as_str(),
        address = Columns::Address.as_str(),
        subdistrict = Columns::Subdistrict.as_str(),
        ward = Columns::Ward.as_str(),
        latitude = Columns::Latitude.as_str(),
        longitude = Columns::Longitude.as_str(),
        status = Columns::Status.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        projection = Light::projection(),
    );
    conn.query_row(
        &sql,
        named_params! {
            ":code": light.code,
            ":address": light.address,
            ":subdistrict": light.subdistrict,
            ":ward": light.ward,
            ":latitude": light.latitude,
            ":longitude": light.longitude,
            ":status": light.status.as_ref().map(|it| it.as_str()),
        },
        Light::mapper(),
    )
    .map_err(Into::into)
}

pub fn select_all(conn: &Connection) -> Result<Vec<Light>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            ORDER BY {id}
        "#,
        projection = Light::projection(),
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
    );
    conn.prepare(&sql)?
        .query_map((), Light::mapper())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

pub fn select_by_id(id: i64, conn: &Connection) -> Result<Light> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {id} = ?1
        "#,
        projection = Light::projection(),
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
    );
    conn.query_row(&sql, params![id], Light::mapper())
        .map_err(Into::into)
}

pub fn select_by_code(code: &str, conn: &Connection) -> Result<Option<Light>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {code} = ?1 COLLATE NOCASE
        "#,
        projection = Light::projection(),
        table = schema::TABLE_NAME,
        code = Columns::Code.as_str(),
    );
    conn.query_row(&sql, params![code.trim()], Light::mapper())
        .optional()
        .map_err(Into::into)
}

pub fn set_status(id: i64, status: &LightStatus, conn: &Connection) -> Result<Light> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {status} = ?2, {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            WHERE {id} = ?1
        "#,
        table = schema::TABLE_NAME,
        status = Columns::Status.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.execute(&sql, params![id, status.as_str()])?;
    select_by_id(id, conn)
}

pub fn set_reported(id: i64, reported_at: OffsetDateTime, conn: &Connection) -> Result<Light> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET
                {status} = ?2,
                {last_reported_at} = ?3,
                {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            WHERE {id} = ?1
        "#,
        table = schema::TABLE_NAME,
        status = Columns::Status.as_str(),
        last_reported_at = Columns::LastReportedAt.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.execute(
        &sql,
        params![
            id,
            LightStatus::Reported.as_str(),
            reported_at.format(&Rfc3339)?,
        ],
    )?;
    select_by_id(id, conn)
}
