use crate::rest::error::{RestApiError, RestApiErrorCode, RestResult as Res};
use crate::service;
use crate::service::auth::Session;
use actix_web::web::{Data, Json};
use actix_web::{post, HttpRequest};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct SessionRes {
    pub token: String,
    pub name: String,
}

impl From<Session> for SessionRes {
    fn from(session: Session) -> Self {
        SessionRes {
            token: session.token,
            name: session.user.name,
        }
    }
}

#[post("register")]
pub async fn register(args: Json<Credentials>, pool: Data<Pool>) -> Res<SessionRes> {
    let session = service::auth::register(&args.name, &args.password, &pool).await?;
    Ok(Json(session.into()))
}

#[post("login")]
pub async fn login(args: Json<Credentials>, pool: Data<Pool>) -> Res<SessionRes> {
    let session = service::auth::login(&args.name, &args.password, &pool).await?;
    Ok(Json(session.into()))
}

#[derive(Serialize, Deserialize)]
pub struct LogoutRes {
    pub logged_out: bool,
}

#[post("logout")]
pub async fn logout(req: HttpRequest, pool: Data<Pool>) -> Res<LogoutRes> {
    let Some(secret) = service::auth::bearer_secret(&req) else {
        return Err(RestApiError::new(
            RestApiErrorCode::Unauthorized,
            "Authentication required",
        ));
    };
    service::auth::logout(&secret, &pool).await?;
    Ok(Json(LogoutRes { logged_out: true }))
}
