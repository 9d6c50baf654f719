use super::schema::{self, Columns, Role, User};
use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub fn insert(name: &str, password: &str, conn: &Connection) -> Result<User> {
    let sql = format!(
        r#"
            INSERT INTO {table} ({name}, {password})
            VALUES (?1, ?2)
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        name = Columns::Name.as_str(),
        password = Columns::Password.as_str(),
        projection = User::projection(),
    );
    conn.query_row(&sql, params![name, password], User::mapper())
        .map_err(Into::into)
}

pub fn select_by_id(id: i64, conn: &Connection) -> Result<User> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {id} = ?1
        "#,
        projection = User::projection(),
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
    );
    conn.query_row(&sql, params![id], User::mapper())
        .map_err(Into::into)
}

pub fn select_by_name(name: &str, conn: &Connection) -> Result<Option<User>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {name} = ?1
        "#,
        projection = User::projection(),
        table = schema::TABLE_NAME,
        name = Columns::Name.as_str(),
    );
    conn.query_row(&sql, params![name], User::mapper())
        .optional()
        .map_err(Into::into)
}

pub fn set_roles(id: i64, roles: &[Role], conn: &Connection) -> Result<User> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {roles} = json(?2), {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            WHERE {id} = ?1
        "#,
        table = schema::TABLE_NAME,
        roles = Columns::Roles.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.execute(&sql, params![id, serde_json::to_string(roles)?])?;
    select_by_id(id, conn)
}
