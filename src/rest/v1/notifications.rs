use crate::db;
use crate::db::notification::schema::{Notification, NotificationStatus};
use crate::log::RequestExtension;
use crate::rest::error::RestResult as Res;
use crate::service;
use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, HttpMessage, HttpRequest};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Serialize, Deserialize)]
pub struct GetItem {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    pub read: bool,
    pub time: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl GetItem {
    fn new(notification: Notification, now: OffsetDateTime) -> Self {
        GetItem {
            time: service::notification::relative_time(notification.created_at, now),
            id: notification.id,
            title: notification.title,
            message: notification.message,
            status: notification.status,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct GetListRes {
    pub unread_count: usize,
    pub notifications: Vec<GetItem>,
}

#[get("")]
pub async fn get(req: HttpRequest, pool: Data<Pool>) -> Res<GetListRes> {
    let user = service::auth::require_user(&req, &pool).await?;
    let notifications = db::notification::queries::select_by_user_id(user.id, &pool).await?;
    req.extensions_mut()
        .insert(RequestExtension::new(notifications.len()));
    let now = OffsetDateTime::now_utc();
    Ok(Json(GetListRes {
        unread_count: service::notification::unread_count(&notifications),
        notifications: notifications
            .into_iter()
            .map(|it| GetItem::new(it, now))
            .collect(),
    }))
}

#[derive(Serialize, Deserialize)]
pub struct UpdateRes {
    pub updated: usize,
}

#[post("{id}/read")]
pub async fn post_read(req: HttpRequest, id: Path<i64>, pool: Data<Pool>) -> Res<UpdateRes> {
    let user = service::auth::require_user(&req, &pool).await?;
    service::notification::mark_as_read(id.into_inner(), user.id, &pool).await?;
    Ok(Json(UpdateRes { updated: 1 }))
}

#[post("read-all")]
pub async fn post_read_all(req: HttpRequest, pool: Data<Pool>) -> Res<UpdateRes> {
    let user = service::auth::require_user(&req, &pool).await?;
    let updated = service::notification::mark_all_as_read(user.id, &pool).await?;
    Ok(Json(UpdateRes { updated }))
}

#[delete("{id}")]
pub async fn delete(req: HttpRequest, id: Path<i64>, pool: Data<Pool>) -> Res<UpdateRes> {
    let user = service::auth::require_user(&req, &pool).await?;
    service::notification::dismiss(id.into_inner(), user.id, &pool).await?;
    Ok(Json(UpdateRes { updated: 1 }))
}
