use crate::conf::EnvConf;
use crate::log;
use crate::rest::error::{json_error_handler, query_error_handler};
use crate::rest::v1;
use crate::{db, Result};
use actix_web::dev::Service;
use actix_web::middleware::from_fn;
use actix_web::web::{scope, Data, JsonConfig, QueryConfig, ServiceConfig};
use actix_web::{
    middleware::{Compress, NormalizePath},
    App, HttpServer,
};
use futures_util::future::FutureExt;
use time::OffsetDateTime;
use tracing::info;

// Base64 photos are capped at 5 MiB decoded, leave room for the encoding
const JSON_LIMIT_BYTES: usize = 8 * 1024 * 1024;

pub async fn run() -> Result<()> {
    let env_conf = EnvConf::from_env();
    if env_conf.map_access_token.is_none() {
        info!("MAP_ACCESS_TOKEN is not set, map clients will get no token");
    }
    // All the worker threads are sharing a single connection pool
    let pool = db::pool()?;
    let bind = env_conf.bind.clone();
    info!(bind, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_query_string = req.query_string().to_string();
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_time = OffsetDateTime::now_utc();
                let req_real_ip = req
                    .connection_info()
                    .realip_remote_addr()
                    .unwrap_or_default()
                    .to_string();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        let res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64();
                        if res_time_sec > 5.0 {
                            info!(
                                req_query_string,
                                req_method,
                                req_path,
                                req_real_ip,
                                res_status,
                                res_time_sec,
                                "Slow request",
                            );
                        }
                    }
                    res
                })
            })
            .wrap(from_fn(log::middleware::handle_request))
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(env_conf.clone()))
            .configure(config)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}

pub fn config(cfg: &mut ServiceConfig) {
    cfg.app_data(QueryConfig::default().error_handler(query_error_handler))
        .app_data(
            JsonConfig::default()
                .limit(JSON_LIMIT_BYTES)
                .error_handler(json_error_handler),
        )
        .service(
            scope("v1")
                .service(
                    scope("lights")
                        .service(v1::lights::get)
                        .service(v1::lights::post_sync)
                        .service(v1::lights::get_by_id),
                )
                .service(
                    scope("map")
                        .service(v1::map::get_config)
                        .service(v1::map::get_stats)
                        .service(v1::map::get_geojson)
                        .service(v1::map::get_markers)
                        .service(v1::map::post_viewport),
                )
                .service(
                    scope("reports")
                        .service(v1::reports::post)
                        .service(v1::reports::get)
                        .service(v1::reports::get_issue_types)
                        .service(v1::reports::get_photo)
                        .service(v1::reports::get_by_id)
                        .service(v1::reports::patch),
                )
                .service(
                    scope("notifications")
                        .service(v1::notifications::get)
                        .service(v1::notifications::post_read_all)
                        .service(v1::notifications::post_read)
                        .service(v1::notifications::delete),
                )
                .service(scope("dashboard").service(v1::dashboard::get))
                .service(
                    scope("auth")
                        .service(v1::auth::register)
                        .service(v1::auth::login)
                        .service(v1::auth::logout),
                ),
        );
}
