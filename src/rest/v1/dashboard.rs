use crate::db;
use crate::rest::error::RestResult as Res;
use crate::service;
use crate::service::report::ReportCounts;
use actix_web::web::{Data, Json};
use actix_web::{get, HttpRequest};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GetRes {
    pub name: String,
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    pub pending: usize,
    pub unread_notifications: usize,
}

#[get("")]
pub async fn get(req: HttpRequest, pool: Data<Pool>) -> Res<GetRes> {
    let user = service::auth::require_user(&req, &pool).await?;
    let reports = db::report::queries::select_by_user_id(user.id, &pool).await?;
    let notifications = db::notification::queries::select_by_user_id(user.id, &pool).await?;
    let ReportCounts {
        total,
        pending,
        active,
        resolved,
    } = service::report::counts(&reports);
    Ok(Json(GetRes {
        name: user.name,
        total,
        active,
        resolved,
        pending,
        unread_notifications: service::notification::unread_count(&notifications),
    }))
}
