use crate::service::filesystem::data_dir_file_path;
use crate::Result;
use deadpool_sqlite::{Config, Pool, Runtime};
use rusqlite::Connection;

pub mod access_token;
pub mod conf;
pub mod light;
pub mod migration;
pub mod notification;
pub mod report;
pub mod user;

const DB_FILE_NAME: &str = "streetlight.db";

pub fn open_connection() -> Result<Connection> {
    let conn = Connection::open(data_dir_file_path(DB_FILE_NAME)?)?;
    init_pragmas(&conn)?;
    Ok(conn)
}

pub fn pool() -> Result<Pool> {
    Config::new(data_dir_file_path(DB_FILE_NAME)?)
        .builder(Runtime::Tokio1)?
        .build()
        .map_err(Into::into)
}

fn init_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}
