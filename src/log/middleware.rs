use super::request::{self, Request};
use crate::service::filesystem::data_dir_file_path;
use crate::Result;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    middleware::Next,
    Error, HttpMessage, HttpRequest,
};
use rusqlite::Connection;
use std::time::Instant;
use tracing::error;

const LOG_DB_FILE_NAME: &str = "log.db";

thread_local! {
    // Every worker thread writes through its own connection, a worker that
    // can't open one keeps serving requests without the access log
    static CONN: Option<Connection> = open_conn()
        .inspect_err(|e| error!(%e, "Failed to open request log connection"))
        .ok();
}

fn open_conn() -> Result<Connection> {
    let conn = Connection::open(data_dir_file_path(LOG_DB_FILE_NAME)?)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    request::init(&conn)?;
    Ok(conn)
}

/// Handlers attach this to a request to record how many entities they served.
pub struct RequestExtension {
    pub entities: i64,
}

impl RequestExtension {
    pub fn new(entities: usize) -> Self {
        RequestExtension {
            entities: entities as i64,
        }
    }
}

pub async fn handle_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let started_at = Instant::now();
    let res = next.call(req).await;
    let Ok(res) = res else { return res };
    let entities = res
        .request()
        .extensions()
        .get::<RequestExtension>()
        .map(|it| it.entities);
    let time_ns = started_at.elapsed().as_nanos() as i64;
    if let Err(e) = log_request(res.request(), res.response().status(), entities, time_ns) {
        error!(%e, "Failed to log request");
    }
    Ok(res)
}

fn log_request(
    req: &HttpRequest,
    code: StatusCode,
    entities: Option<i64>,
    time_ns: i64,
) -> Result<()> {
    let conn_info = req.connection_info();
    let Some(addr) = conn_info.realip_remote_addr() else {
        return Ok(());
    };
    CONN.with(|conn| match conn {
        Some(conn) => request::insert(
            &Request {
                ip: addr,
                method: req.method().as_str(),
                path: req.path(),
                query: req.query_string(),
                code: code.as_u16() as i64,
                entities,
                time_ns,
            },
            conn,
        ),
        None => Ok(()),
    })
}
