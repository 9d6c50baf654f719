use crate::Result;
use rusqlite::{named_params, Connection};

const TABLE_NAME: &str = "request";
const COL_ID: &str = "id";
const COL_DATE: &str = "date";
const COL_IP: &str = "ip";
const COL_METHOD: &str = "method";
const COL_PATH: &str = "path";
const COL_QUERY: &str = "query";
const COL_CODE: &str = "code";
const COL_ENTITIES: &str = "entities";
const COL_TIME_NS: &str = "time_ns";

pub struct Request<'a> {
    pub ip: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub code: i64,
    pub entities: Option<i64>,
    pub time_ns: i64,
}

pub fn init(conn: &Connection) -> Result<()> {
    let sql = format!(
        r#"
            CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
                {COL_ID} INTEGER PRIMARY KEY NOT NULL,
                {COL_DATE} TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ')),
                {COL_IP} TEXT NOT NULL,
                {COL_METHOD} TEXT NOT NULL,
                {COL_PATH} TEXT NOT NULL,
                {COL_QUERY} TEXT NOT NULL,
                {COL_CODE} INTEGER NOT NULL,
                {COL_ENTITIES} INTEGER,
                {COL_TIME_NS} INTEGER NOT NULL
            ) STRICT;
            CREATE INDEX IF NOT EXISTS request_path ON {TABLE_NAME}({COL_PATH});
        "#
    );
    conn.execute_batch(&sql)?;
    Ok(())
}

pub fn insert(request: &Request, conn: &Connection) -> Result<()> {
    let sql = format!(
        r#"
            INSERT INTO {TABLE_NAME} (
                {COL_IP},
                {COL_METHOD},
                {COL_PATH},
                {COL_QUERY},
                {COL_CODE},
                {COL_ENTITIES},
                {COL_TIME_NS}
            ) VALUES (
                :{COL_IP},
                :{COL_METHOD},
                :{COL_PATH},
                :{COL_QUERY},
                :{COL_CODE},
                :{COL_ENTITIES},
                :{COL_TIME_NS}
            );
        "#
    );
    conn.execute(
        &sql,
        named_params! {
            ":ip": request.ip,
            ":method": request.method,
            ":path": request.path,
            ":query": request.query,
            ":code": request.code,
            ":entities": request.entities,
            ":time_ns": request.time_ns,
        },
    )?;
    Ok(())
}

#[cfg(test)]
pub fn count_by_path(path: &str, conn: &Connection) -> Result<i64> {
    let sql = format!("SELECT count(*) FROM {TABLE_NAME} WHERE {COL_PATH} = ?1");
    conn.query_row(&sql, [path], |row| row.get(0))
        .map_err(Into::into)
}
