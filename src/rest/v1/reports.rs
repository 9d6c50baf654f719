use crate::db;
use crate::db::report::schema::{IssueType, Report, ReportStatus};
use crate::db::user::schema::User;
use crate::log::RequestExtension;
use crate::rest::error::{RestApiError, RestApiErrorCode, RestResult as Res};
use crate::service;
use crate::service::filesystem;
use crate::service::report::{AuthPrompt, ReportForm};
use actix_web::web::{Data, Json, Path};
use actix_web::{get, patch, post, HttpMessage, HttpRequest, HttpResponse};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use time::OffsetDateTime;

#[derive(Serialize, Deserialize)]
pub struct GetItem {
    pub id: i64,
    pub light_code: String,
    pub issue_type: IssueType,
    pub description: String,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ReportStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Report> for GetItem {
    fn from(report: Report) -> Self {
        GetItem {
            photo_url: report
                .photo
                .as_ref()
                .map(|_| format!("/v1/reports/{}/photo", report.id)),
            id: report.id,
            light_code: report.light_code,
            issue_type: report.issue_type,
            description: report.description,
            latitude: report.latitude,
            longitude: report.longitude,
            status: report.status,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct PostRes {
    pub report: GetItem,
    pub dialog_open: bool,
    pub auth_prompt: Option<AuthPrompt>,
}

#[post("")]
pub async fn post(req: HttpRequest, form: Json<ReportForm>, pool: Data<Pool>) -> Res<PostRes> {
    let user = service::auth::authenticate(&req, &pool).await?;
    let valid = service::report::validate(form.into_inner()).map_err(RestApiError::invalid_fields)?;
    let outcome =
        service::report::submit(valid, user, &filesystem::photo_dir()?, &pool).await?;
    Ok(Json(PostRes {
        report: outcome.report.into(),
        dialog_open: false,
        auth_prompt: outcome.auth_prompt,
    }))
}

#[derive(Serialize, Deserialize)]
pub struct GetListRes {
    pub total: usize,
    pub reports: Vec<GetItem>,
}

#[get("")]
pub async fn get(req: HttpRequest, pool: Data<Pool>) -> Res<GetListRes> {
    let user = service::auth::require_user(&req, &pool).await?;
    let reports = db::report::queries::select_by_user_id(user.id, &pool).await?;
    req.extensions_mut()
        .insert(RequestExtension::new(reports.len()));
    Ok(Json(GetListRes {
        total: reports.len(),
        reports: reports.into_iter().map(Into::into).collect(),
    }))
}

#[get("issue-types")]
pub async fn get_issue_types() -> Res<Vec<IssueType>> {
    Ok(Json(IssueType::iter().collect()))
}

async fn select_visible(id: i64, user: &User, pool: &Pool) -> Result<Report, RestApiError> {
    let report = db::report::queries::select_by_id(id, pool).await?;
    if report.user_id != Some(user.id) && !user.is_admin() {
        return Err(RestApiError::new(
            RestApiErrorCode::Forbidden,
            "This report belongs to another user.",
        ));
    }
    Ok(report)
}

#[get("{id}")]
pub async fn get_by_id(req: HttpRequest, id: Path<i64>, pool: Data<Pool>) -> Res<GetItem> {
    let user = service::auth::require_user(&req, &pool).await?;
    let report = select_visible(id.into_inner(), &user, &pool).await?;
    Ok(Json(report.into()))
}

#[get("{id}/photo")]
pub async fn get_photo(
    req: HttpRequest,
    id: Path<i64>,
    pool: Data<Pool>,
) -> Result<HttpResponse, RestApiError> {
    let user = service::auth::require_user(&req, &pool).await?;
    let report = select_visible(id.into_inner(), &user, &pool).await?;
    let Some(file_name) = report.photo else {
        return Err(RestApiError::not_found());
    };
    let photo = service::report::load_photo(&file_name, &filesystem::photo_dir()?)?;
    Ok(HttpResponse::Ok()
        .content_type(photo.photo_type.content_type())
        .body(photo.bytes))
}

#[derive(Deserialize)]
pub struct PatchArgs {
    pub status: ReportStatus,
}

#[patch("{id}")]
pub async fn patch(
    req: HttpRequest,
    id: Path<i64>,
    args: Json<PatchArgs>,
    pool: Data<Pool>,
) -> Res<GetItem> {
    service::auth::require_admin(&req, &pool).await?;
    let report = service::report::update_status(id.into_inner(), args.status, &pool).await?;
    Ok(Json(report.into()))
}

#[cfg(test)]
mod test {
    use super::{GetItem, GetListRes, PostRes};
    use crate::db::light::schema::{LightStatus, NewLight};
    use crate::db::report::schema::{NewReport, ReportStatus};
    use crate::db::test::pool;
    use crate::db::user::schema::Role;
    use crate::service::report::AuthPrompt;
    use crate::{db, service, Result};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::{scope, Data};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    #[test]
    async fn get_issue_types() -> Result<()> {
        let app = test::init_service(App::new().service(super::get_issue_types)).await;
        let req = TestRequest::get().uri("/issue-types").to_request();
        let res: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            json!(["not_working", "flickering", "damaged", "exposed_wires", "other"]),
            res
        );
        Ok(())
    }

    #[test]
    async fn post_anonymous() -> Result<()> {
        let pool = pool().await;
        let light =
            db::light::queries::upsert(NewLight::mock("SL-1001", LightStatus::Working), &pool)
                .await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool.clone()))
                .service(scope("/").service(super::post)),
        )
        .await;
        let req = TestRequest::post()
            .uri("/")
            .set_json(json!({
                "light_id": "SL-1001",
                "issue_type": "not_working",
                "description": "Completely dark since Monday night",
            }))
            .to_request();
        let res: PostRes = test::call_and_read_body_json(&app, req).await;
        assert!(!res.dialog_open);
        assert_eq!(Some(AuthPrompt::Login), res.auth_prompt);
        assert_eq!(ReportStatus::Pending, res.report.status);
        assert_eq!(Some(light.latitude), res.report.latitude);
        assert_eq!(
            LightStatus::Reported,
            db::light::queries::select_by_id(light.id, &pool).await?.status
        );
        Ok(())
    }

    #[test]
    async fn post_authenticated() -> Result<()> {
        let pool = pool().await;
        let session = service::auth::register("citizen", "password1", &pool).await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool.clone()))
                .service(scope("/").service(super::post)),
        )
        .await;
        let req = TestRequest::post()
            .uri("/")
            .insert_header(bearer(&session.token))
            .set_json(json!({
                "light_id": "SL-4040",
                "issue_type": "exposed_wires",
                "description": "Cables are hanging from the pole",
                "latitude": -2.98,
                "longitude": 104.74,
            }))
            .to_request();
        let res: PostRes = test::call_and_read_body_json(&app, req).await;
        assert_eq!(None, res.auth_prompt);
        assert_eq!(None, res.report.photo_url);
        let notifications =
            db::notification::queries::select_by_user_id(session.user.id, &pool).await?;
        assert_eq!(1, notifications.len());
        Ok(())
    }

    #[test]
    async fn post_short_description_is_rejected() -> Result<()> {
        let pool = pool().await;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool.clone()))
                .service(scope("/").service(super::post)),
        )
        .await;
        let req = TestRequest::post()
            .uri("/")
            .set_json(json!({
                "light_id": "SL-1001",
                "issue_type": "flickering",
                "description": "blinks",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            "Description must be at least 10 characters",
            body["fields"]["description"]
        );
        let stored: i64 = pool
            .get()
            .await?
            .interact(|conn| conn.query_row("SELECT count(*) FROM report", [], |row| row.get(0)))
            .await??;
        assert_eq!(0, stored);
        Ok(())
    }

    #[test]
    async fn get_own_reports() -> Result<()> {
        let pool = pool().await;
        let session = service::auth::register("citizen", "password1", &pool).await?;
        let other = service::auth::register("neighbor", "password1", &pool).await?;
        db::report::queries::insert(NewReport::mock(Some(session.user.id), "SL-1"), &pool).await?;
        db::report::queries::insert(NewReport::mock(Some(session.user.id), "SL-2"), &pool).await?;
        db::report::queries::insert(NewReport::mock(Some(other.user.id), "SL-3"), &pool).await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool))
                .service(scope("/").service(super::get)),
        )
        .await;
        let req = TestRequest::get()
            .uri("/")
            .insert_header(bearer(&session.token))
            .to_request();
        let res: GetListRes = test::call_and_read_body_json(&app, req).await;
        assert_eq!(2, res.total);
        assert_eq!("SL-2", res.reports[0].light_code);

        let req = TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::UNAUTHORIZED, res.status());
        Ok(())
    }

    #[test]
    async fn get_by_id_checks_owner() -> Result<()> {
        let pool = pool().await;
        let owner = service::auth::register("citizen", "password1", &pool).await?;
        let other = service::auth::register("neighbor", "password1", &pool).await?;
        let report =
            db::report::queries::insert(NewReport::mock(Some(owner.user.id), "SL-1"), &pool)
                .await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool))
                .service(super::get_by_id),
        )
        .await;
        let req = TestRequest::get()
            .uri(&format!("/{}", report.id))
            .insert_header(bearer(&owner.token))
            .to_request();
        let res: GetItem = test::call_and_read_body_json(&app, req).await;
        assert_eq!(report.id, res.id);

        let req = TestRequest::get()
            .uri(&format!("/{}", report.id))
            .insert_header(bearer(&other.token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::FORBIDDEN, res.status());
        Ok(())
    }

    #[test]
    async fn patch_requires_admin() -> Result<()> {
        let pool = pool().await;
        let citizen = service::auth::register("citizen", "password1", &pool).await?;
        let admin = service::auth::register("admin", "password1", &pool).await?;
        db::user::queries::set_roles(admin.user.id, vec![Role::Admin], &pool).await?;
        let light =
            db::light::queries::upsert(NewLight::mock("SL-1", LightStatus::Reported), &pool)
                .await?;
        let report =
            db::report::queries::insert(NewReport::mock(Some(citizen.user.id), "SL-1"), &pool)
                .await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool.clone()))
                .service(super::patch),
        )
        .await;

        let req = TestRequest::patch()
            .uri(&format!("/{}", report.id))
            .insert_header(bearer(&citizen.token))
            .set_json(json!({ "status": "resolved" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::FORBIDDEN, res.status());

        let req = TestRequest::patch()
            .uri(&format!("/{}", report.id))
            .insert_header(bearer(&admin.token))
            .set_json(json!({ "status": "in-progress" }))
            .to_request();
        let res: GetItem = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ReportStatus::InProgress, res.status);
        assert_eq!(
            LightStatus::Maintenance,
            db::light::queries::select_by_id(light.id, &pool).await?.status
        );
        Ok(())
    }
}
