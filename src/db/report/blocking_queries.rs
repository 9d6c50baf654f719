use super::schema::{self, Columns, NewReport, Report, ReportStatus};
use crate::Result;
use rusqlite::{named_params, params, Connection};

pub fn insert(report: &NewReport, conn: &Connection) -> Result<Report> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {user_id},
                {light_code},
                {issue_type},
                {description},
                {photo},
                {latitude},
                {longitude}
            ) VALUES (
                :user_id,
                :light_code,
                :issue_type,
                :description,
                :photo,
                :latitude,
                :longitude
            )
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        user_id = Columns::UserId.as_str(),
        light_code = Columns::LightCode.as_str(),
        issue_type = Columns::IssueType.as_str(),
        description = Columns::Description.as_str(),
        photo = Columns::Photo.as_str(),
        latitude = Columns::Latitude.as_str(),
        longitude = Columns::Longitude.as_str(),
        projection = Report::projection(),
    );
    conn.query_row(
        &sql,
        named_params! {
            ":user_id": report.user_id,
            ":light_code": report.light_code,
            ":issue_type": report.issue_type.as_ref(),
            ":description": report.description,
            ":photo": report.photo,
            ":latitude": report.latitude,
            ":longitude": report.longitude,
        },
        Report::mapper(),
    )
    .map_err(Into::into)
}

pub fn select_by_id(id: i64, conn: &Connection) -> Result<Report> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {id} = ?1
        "#,
        projection = Report::projection(),
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
    );
    conn.query_row(&sql, params![id], Report::mapper())
        .map_err(Into::into)
}

pub fn select_by_user_id(user_id: i64, conn: &Connection) -> Result<Vec<Report>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {user_id} = ?1
            ORDER BY {created_at} DESC, {id} DESC
        "#,
        projection = Report::projection(),
        table = schema::TABLE_NAME,
        user_id = Columns::UserId.as_str(),
        created_at = Columns::CreatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.prepare(&sql)?
        .query_map(params![user_id], Report::mapper())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

pub fn set_status(id: i64, status: ReportStatus, conn: &Connection) -> Result<Report> {
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
    conn.execute(&sql, params![id, status.as_ref()])?;
    select_by_id(id, conn)
}
