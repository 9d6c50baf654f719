use crate::db;
use crate::db::light::schema::LightStatus;
use crate::db::light::schema::Light;
use crate::db::notification::schema::NotificationStatus;
use crate::db::report::schema::{IssueType, NewReport, Report, ReportStatus};
use crate::db::user::schema::User;
use crate::{Error, Result};
use base64::prelude::*;
use deadpool_sqlite::Pool;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const PHOTO_MAX_BYTES: usize = 5 * 1024 * 1024;

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Deserialize, Default)]
pub struct ReportForm {
    pub light_id: Option<String>,
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub photo_base64: Option<String>,
    pub photo_content_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoType {
    Jpeg,
    Png,
    Webp,
}

impl PhotoType {
    pub fn from_content_type(content_type: &str) -> Option<PhotoType> {
        match content_type.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(PhotoType::Jpeg),
            "image/png" => Some(PhotoType::Png),
            "image/webp" => Some(PhotoType::Webp),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<PhotoType> {
        match Path::new(file_name).extension()?.to_str()? {
            "jpg" => Some(PhotoType::Jpeg),
            "png" => Some(PhotoType::Png),
            "webp" => Some(PhotoType::Webp),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            PhotoType::Jpeg => "image/jpeg",
            PhotoType::Png => "image/png",
            PhotoType::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PhotoType::Jpeg => "jpg",
            PhotoType::Png => "png",
            PhotoType::Webp => "webp",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Photo {
    pub photo_type: PhotoType,
    pub bytes: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub struct ValidReport {
    pub light_code: String,
    pub issue_type: IssueType,
    pub description: String,
    pub photo: Option<Photo>,
    pub coordinates: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPrompt {
    Login,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub report: Report,
    pub light: Option<Light>,
    pub auth_prompt: Option<AuthPrompt>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub total: usize,
    pub pending: usize,
    pub active: usize,
    pub resolved: usize,
}

/// Checks every field and collects all problems at once, so a client can
/// highlight each offending input in a single round trip.
pub fn validate(form: ReportForm) -> Result<ValidReport, FieldErrors> {
    let mut errors = FieldErrors::new();

    let light_code = form
        .light_id
        .as_deref()
        .map(str::trim)
        .filter(|it| !it.is_empty())
        .map(str::to_string);
    if light_code.is_none() {
        errors.insert("light_id".into(), "Light ID is required".into());
    }

    let issue_type = form
        .issue_type
        .as_deref()
        .and_then(|it| IssueType::from_str(it.trim()).ok());
    if issue_type.is_none() {
        errors.insert("issue_type".into(), "Issue type is required".into());
    }

    let description = form.description.as_deref().unwrap_or("").trim().to_string();
    let description_chars = description.chars().count();
    if description_chars < DESCRIPTION_MIN_CHARS {
        errors.insert(
            "description".into(),
            format!("Description must be at least {DESCRIPTION_MIN_CHARS} characters"),
        );
    } else if description_chars > DESCRIPTION_MAX_CHARS {
        errors.insert(
            "description".into(),
            format!("Description must be at most {DESCRIPTION_MAX_CHARS} characters"),
        );
    }

    let photo = match decode_photo(
        form.photo_base64.as_deref(),
        form.photo_content_type.as_deref(),
    ) {
        Ok(photo) => photo,
        Err(message) => {
            errors.insert("photo".into(), message);
            None
        }
    };

    let coordinates = match (form.latitude, form.longitude) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                errors.insert(
                    "latitude".into(),
                    "Latitude must be between -90 and 90".into(),
                );
            }
            if !(-180.0..=180.0).contains(&lon) {
                errors.insert(
                    "longitude".into(),
                    "Longitude must be between -180 and 180".into(),
                );
            }
            Some((lat, lon))
        }
        (Some(_), None) => {
            errors.insert(
                "longitude".into(),
                "Longitude is required when latitude is set".into(),
            );
            None
        }
        (None, Some(_)) => {
            errors.insert(
                "latitude".into(),
                "Latitude is required when longitude is set".into(),
            );
            None
        }
        (None, None) => None,
    };

    match (light_code, issue_type) {
        (Some(light_code), Some(issue_type)) if errors.is_empty() => Ok(ValidReport {
            light_code,
            issue_type,
            description,
            photo,
            coordinates,
        }),
        _ => Err(errors),
    }
}

// Accepts both bare base64 and data URLs, a data URL carries its own type
fn decode_photo(
    base64: Option<&str>,
    content_type: Option<&str>,
) -> Result<Option<Photo>, String> {
    let Some(base64) = base64.map(str::trim).filter(|it| !it.is_empty()) else {
        return Ok(None);
    };
    let (content_type, data) = match base64
        .strip_prefix("data:")
        .and_then(|it| it.split_once(";base64,"))
    {
        Some((content_type, data)) => (Some(content_type), data),
        None => (content_type, base64),
    };
    let photo_type = content_type
        .and_then(PhotoType::from_content_type)
        .ok_or("Photo must be a JPEG, PNG or WebP image")?;
    let bytes = BASE64_STANDARD
        .decode(data)
        .map_err(|_| "Photo is not valid base64")?;
    if bytes.is_empty() {
        return Err("Photo is empty".into());
    }
    if bytes.len() > PHOTO_MAX_BYTES {
        return Err("Photo must be at most 5 MiB".into());
    }
    Ok(Some(Photo { photo_type, bytes }))
}

pub fn save_photo(photo: &Photo, dir: &Path) -> Result<String> {
    let file_name = format!("{}.{}", Uuid::new_v4(), photo.photo_type.extension());
    fs::write(dir.join(&file_name), &photo.bytes)?;
    info!(file_name, bytes = photo.bytes.len(), "Saved report photo");
    Ok(file_name)
}

pub fn load_photo(file_name: &str, dir: &Path) -> Result<Photo> {
    if file_name.contains(['/', '\\']) || file_name.starts_with('.') {
        return Err(Error::InvalidInput(format!(
            "Invalid photo file name: {file_name}"
        )));
    }
    let photo_type = PhotoType::from_file_name(file_name)
        .ok_or_else(|| Error::NotFound(format!("Unknown photo type: {file_name}")))?;
    let path = dir.join(file_name);
    if !path.exists() {
        return Err(Error::NotFound(format!("Photo {file_name} doesn't exist")));
    }
    Ok(Photo {
        photo_type,
        bytes: fs::read(path)?,
    })
}

/// Persists an accepted report together with its side effects: the light gets
/// flagged as reported and a signed in submitter gets an acknowledgement.
pub fn persist(
    valid: &ValidReport,
    photo: Option<String>,
    user: Option<&User>,
    now: OffsetDateTime,
    conn: &mut Connection,
) -> Result<SubmitOutcome> {
    let tx = conn.transaction()?;
    let light = db::light::blocking_queries::select_by_code(&valid.light_code, &tx)?;
    let coordinates = valid.coordinates.or_else(|| {
        light
            .as_ref()
            .map(|light| (light.latitude, light.longitude))
    });
    let report = db::report::blocking_queries::insert(
        &NewReport {
            user_id: user.map(|it| it.id),
            light_code: light
                .as_ref()
                .map(|it| it.code.clone())
                .unwrap_or_else(|| valid.light_code.clone()),
            issue_type: valid.issue_type,
            description: valid.description.clone(),
            photo,
            latitude: coordinates.map(|it| it.0),
            longitude: coordinates.map(|it| it.1),
        },
        &tx,
    )?;
    let light = match light {
        Some(light) => Some(db::light::blocking_queries::set_reported(
            light.id, now, &tx,
        )?),
        None => None,
    };
    if let Some(user) = user {
        db::notification::blocking_queries::insert(
            user.id,
            "Report received",
            &format!(
                "Your report about light {} has been received and is waiting for review",
                report.light_code
            ),
            NotificationStatus::Info,
            &tx,
        )?;
    }
    tx.commit()?;
    Ok(SubmitOutcome {
        report,
        light,
        auth_prompt: match user {
            Some(_) => None,
            None => Some(AuthPrompt::Login),
        },
    })
}

/// Saves the photo (if any) into `photo_dir` and stores the report. The photo file is
/// removed again when the report can't be stored.
pub async fn submit(
    valid: ValidReport,
    user: Option<User>,
    photo_dir: &Path,
    pool: &Pool,
) -> Result<SubmitOutcome> {
    let photo = match &valid.photo {
        Some(photo) => Some(save_photo(photo, photo_dir)?),
        None => None,
    };
    let saved_photo = photo.clone();
    let res: Result<SubmitOutcome> = async {
        pool.get()
            .await?
            .interact(move |conn| {
                persist(
                    &valid,
                    photo,
                    user.as_ref(),
                    OffsetDateTime::now_utc(),
                    conn,
                )
            })
            .await?
    }
    .await;
    let outcome = match res {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(file_name) = saved_photo {
                if let Err(remove_err) = fs::remove_file(photo_dir.join(&file_name)) {
                    warn!(file_name, ?remove_err, "Failed to remove orphaned photo");
                }
            }
            return Err(e);
        }
    };
    info!(
        report_id = outcome.report.id,
        light_code = outcome.report.light_code,
        known_light = outcome.light.is_some(),
        anonymous = outcome.auth_prompt.is_some(),
        "Report submitted",
    );
    Ok(outcome)
}

fn light_status_for(status: ReportStatus) -> Option<LightStatus> {
    match status {
        ReportStatus::InProgress => Some(LightStatus::Maintenance),
        ReportStatus::Resolved => Some(LightStatus::Working),
        ReportStatus::Pending | ReportStatus::Closed => None,
    }
}

fn status_message(report: &Report) -> String {
    let code = &report.light_code;
    match report.status {
        ReportStatus::Pending => format!("Your report about light {code} is waiting for review"),
        ReportStatus::InProgress => {
            format!("A maintenance crew has been assigned to light {code}")
        }
        ReportStatus::Resolved => format!("Light {code} has been fixed, thank you for reporting"),
        ReportStatus::Closed => format!("Your report about light {code} has been closed"),
    }
}

pub fn set_status(id: i64, status: ReportStatus, conn: &mut Connection) -> Result<Report> {
    let tx = conn.transaction()?;
    let report = db::report::blocking_queries::select_by_id(id, &tx)?;
    if report.status == status {
        return Ok(report);
    }
    let report = db::report::blocking_queries::set_status(id, status, &tx)?;
    if let Some(light_status) = light_status_for(status) {
        if let Some(light) = db::light::blocking_queries::select_by_code(&report.light_code, &tx)? {
            db::light::blocking_queries::set_status(light.id, &light_status, &tx)?;
        }
    }
    if let Some(user_id) = report.user_id {
        let notification_status = match status {
            ReportStatus::Resolved => NotificationStatus::Success,
            _ => NotificationStatus::Update,
        };
        db::notification::blocking_queries::insert(
            user_id,
            "Report updated",
            &status_message(&report),
            notification_status,
            &tx,
        )?;
    }
    tx.commit()?;
    Ok(report)
}

pub async fn update_status(id: i64, status: ReportStatus, pool: &Pool) -> Result<Report> {
    let report = pool
        .get()
        .await?
        .interact(move |conn| set_status(id, status, conn))
        .await??;
    info!(report_id = report.id, status = %report.status, "Report status changed");
    Ok(report)
}

pub fn counts(reports: &[Report]) -> ReportCounts {
    let mut res = ReportCounts {
        total: reports.len(),
        ..ReportCounts::default()
    };
    for report in reports {
        match report.status {
            ReportStatus::Pending => res.pending += 1,
            ReportStatus::InProgress => res.active += 1,
            ReportStatus::Resolved | ReportStatus::Closed => res.resolved += 1,
        }
    }
    res
}

#[cfg(test)]
mod test {
    use super::{AuthPrompt, ReportForm};
    use crate::db;
    use crate::db::light::schema::{LightStatus, NewLight};
    use crate::db::notification::schema::NotificationStatus;
    use crate::db::report::schema::{IssueType, NewReport, ReportStatus};
    use crate::db::test::{conn, pool};
    use crate::Result;
    use base64::prelude::*;
    use time::macros::datetime;

    fn form() -> ReportForm {
        ReportForm {
            light_id: Some(" SL-1001 ".into()),
            issue_type: Some("flickering".into()),
            description: Some("Flickers every few seconds after dusk".into()),
            ..ReportForm::default()
        }
    }

    #[test]
    fn validate_accepts_minimal_form() {
        let valid = super::validate(form()).unwrap();
        assert_eq!("SL-1001", valid.light_code);
        assert_eq!(IssueType::Flickering, valid.issue_type);
        assert_eq!(None, valid.photo);
        assert_eq!(None, valid.coordinates);
    }

    #[test]
    fn validate_rejects_short_description() {
        let errors = super::validate(ReportForm {
            description: Some("too short".into()),
            ..form()
        })
        .unwrap_err();
        assert_eq!(
            Some("Description must be at least 10 characters"),
            errors.get("description").map(String::as_str)
        );
        assert_eq!(1, errors.len());
    }

    #[test]
    fn validate_rejects_long_description() {
        let errors = super::validate(ReportForm {
            description: Some("x".repeat(501)),
            ..form()
        })
        .unwrap_err();
        assert_eq!(
            Some("Description must be at most 500 characters"),
            errors.get("description").map(String::as_str)
        );
        assert!(super::validate(ReportForm {
            description: Some("x".repeat(500)),
            ..form()
        })
        .is_ok());
    }

    #[test]
    fn validate_counts_chars_not_bytes() {
        assert!(super::validate(ReportForm {
            description: Some("lampu mati".into()),
            ..form()
        })
        .is_ok());
        assert!(super::validate(ReportForm {
            description: Some("ééééééééé".into()),
            ..form()
        })
        .is_err());
    }

    #[test]
    fn validate_collects_every_error() {
        let errors = super::validate(ReportForm {
            latitude: Some(91.0),
            ..ReportForm::default()
        })
        .unwrap_err();
        assert_eq!(
            Some("Light ID is required"),
            errors.get("light_id").map(String::as_str)
        );
        assert_eq!(
            Some("Issue type is required"),
            errors.get("issue_type").map(String::as_str)
        );
        assert!(errors.contains_key("description"));
        assert!(errors.contains_key("longitude"));
    }

    #[test]
    fn validate_rejects_unknown_issue_type() {
        let errors = super::validate(ReportForm {
            issue_type: Some("broken".into()),
            ..form()
        })
        .unwrap_err();
        assert!(errors.contains_key("issue_type"));
    }

    #[test]
    fn validate_checks_coordinate_ranges() {
        let errors = super::validate(ReportForm {
            latitude: Some(-91.0),
            longitude: Some(181.0),
            ..form()
        })
        .unwrap_err();
        assert!(errors.contains_key("latitude"));
        assert!(errors.contains_key("longitude"));
        let valid = super::validate(ReportForm {
            latitude: Some(-2.99),
            longitude: Some(104.75),
            ..form()
        })
        .unwrap();
        assert_eq!(Some((-2.99, 104.75)), valid.coordinates);
    }

    #[test]
    fn validate_photo() {
        let encoded = BASE64_STANDARD.encode([0xff, 0xd8, 0xff, 0xe0]);
        let valid = super::validate(ReportForm {
            photo_base64: Some(encoded.clone()),
            photo_content_type: Some("image/jpeg".into()),
            ..form()
        })
        .unwrap();
        assert_eq!(
            Some(super::PhotoType::Jpeg),
            valid.photo.map(|it| it.photo_type)
        );

        let valid = super::validate(ReportForm {
            photo_base64: Some(format!("data:image/png;base64,{encoded}")),
            ..form()
        })
        .unwrap();
        assert_eq!(
            Some(super::PhotoType::Png),
            valid.photo.map(|it| it.photo_type)
        );

        let errors = super::validate(ReportForm {
            photo_base64: Some(encoded),
            photo_content_type: Some("application/pdf".into()),
            ..form()
        })
        .unwrap_err();
        assert!(errors.contains_key("photo"));

        let errors = super::validate(ReportForm {
            photo_base64: Some("%%%".into()),
            photo_content_type: Some("image/png".into()),
            ..form()
        })
        .unwrap_err();
        assert_eq!(
            Some("Photo is not valid base64"),
            errors.get("photo").map(String::as_str)
        );
    }

    #[test]
    fn validate_rejects_oversized_photo() {
        let encoded = BASE64_STANDARD.encode(vec![0u8; super::PHOTO_MAX_BYTES + 1]);
        let errors = super::validate(ReportForm {
            photo_base64: Some(encoded),
            photo_content_type: Some("image/webp".into()),
            ..form()
        })
        .unwrap_err();
        assert_eq!(
            Some("Photo must be at most 5 MiB"),
            errors.get("photo").map(String::as_str)
        );
    }

    #[test]
    fn save_and_load_photo() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("streetlight-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;
        let photo = super::Photo {
            photo_type: super::PhotoType::Png,
            bytes: vec![1, 2, 3],
        };
        let file_name = super::save_photo(&photo, &dir)?;
        assert!(file_name.ends_with(".png"));
        assert_eq!(photo, super::load_photo(&file_name, &dir)?);
        assert!(super::load_photo("../streetlight.db", &dir).is_err());
        assert!(super::load_photo("missing.png", &dir)
            .unwrap_err()
            .is_not_found());
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[test]
    fn persist_anonymous() -> Result<()> {
        let mut conn = conn();
        let light = db::light::blocking_queries::upsert(
            &NewLight::mock("SL-1001", LightStatus::Working),
            &conn,
        )?;
        let now = datetime!(2024-05-01 19:30 UTC);
        let valid = super::validate(ReportForm {
            light_id: Some("sl-1001".into()),
            ..form()
        })
        .unwrap();
        let outcome = super::persist(&valid, None, None, now, &mut conn)?;
        assert_eq!(Some(AuthPrompt::Login), outcome.auth_prompt);
        assert_eq!(None, outcome.report.user_id);
        assert_eq!("SL-1001", outcome.report.light_code);
        assert_eq!(Some(light.latitude), outcome.report.latitude);
        assert_eq!(Some(light.longitude), outcome.report.longitude);
        let light = db::light::blocking_queries::select_by_id(light.id, &conn)?;
        assert_eq!(LightStatus::Reported, light.status);
        assert_eq!(Some(now), light.last_reported_at);
        Ok(())
    }

    #[test]
    fn persist_authenticated_notifies() -> Result<()> {
        let mut conn = conn();
        let user = db::user::blocking_queries::insert("citizen", "hash", &conn)?;
        let valid = super::validate(ReportForm {
            latitude: Some(-2.95),
            longitude: Some(104.7),
            ..form()
        })
        .unwrap();
        let outcome = super::persist(
            &valid,
            Some("photo.jpg".into()),
            Some(&user),
            datetime!(2024-05-01 19:30 UTC),
            &mut conn,
        )?;
        assert_eq!(None, outcome.auth_prompt);
        assert_eq!(None, outcome.light);
        assert_eq!(Some(user.id), outcome.report.user_id);
        assert_eq!(Some("photo.jpg".into()), outcome.report.photo);
        assert_eq!(Some(-2.95), outcome.report.latitude);
        let notifications = db::notification::blocking_queries::select_by_user_id(user.id, &conn)?;
        assert_eq!(1, notifications.len());
        assert_eq!(NotificationStatus::Info, notifications[0].status);
        assert!(!notifications[0].read);
        Ok(())
    }

    #[test]
    fn set_status_updates_light_and_notifies_owner() -> Result<()> {
        let mut conn = conn();
        let user = db::user::blocking_queries::insert("citizen", "hash", &conn)?;
        let light = db::light::blocking_queries::upsert(
            &NewLight::mock("SL-1001", LightStatus::Reported),
            &conn,
        )?;
        let report =
            db::report::blocking_queries::insert(&NewReport::mock(Some(user.id), "SL-1001"), &conn)?;

        let report = super::set_status(report.id, ReportStatus::InProgress, &mut conn)?;
        assert_eq!(ReportStatus::InProgress, report.status);
        assert_eq!(
            LightStatus::Maintenance,
            db::light::blocking_queries::select_by_id(light.id, &conn)?.status
        );

        super::set_status(report.id, ReportStatus::Resolved, &mut conn)?;
        assert_eq!(
            LightStatus::Working,
            db::light::blocking_queries::select_by_id(light.id, &conn)?.status
        );

        let notifications = db::notification::blocking_queries::select_by_user_id(user.id, &conn)?;
        assert_eq!(2, notifications.len());
        assert_eq!(NotificationStatus::Success, notifications[0].status);
        assert_eq!(NotificationStatus::Update, notifications[1].status);
        Ok(())
    }

    #[test]
    fn set_status_missing_report() {
        let mut conn = conn();
        assert!(super::set_status(7, ReportStatus::Closed, &mut conn)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn counts() -> Result<()> {
        let mut conn = conn();
        let mut ids = vec![];
        for code in ["SL-1", "SL-2", "SL-3", "SL-4", "SL-5"] {
            ids.push(db::report::blocking_queries::insert(&NewReport::mock(None, code), &conn)?.id);
        }
        super::set_status(ids[1], ReportStatus::InProgress, &mut conn)?;
        super::set_status(ids[2], ReportStatus::Resolved, &mut conn)?;
        super::set_status(ids[3], ReportStatus::Closed, &mut conn)?;
        let reports = ids
            .iter()
            .map(|id| db::report::blocking_queries::select_by_id(*id, &conn))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(
            super::ReportCounts {
                total: 5,
                pending: 2,
                active: 1,
                resolved: 2,
            },
            super::counts(&reports)
        );
        Ok(())
    }

    fn photo_form() -> ReportForm {
        ReportForm {
            photo_base64: Some(BASE64_STANDARD.encode([0x89, 0x50, 0x4e, 0x47])),
            photo_content_type: Some("image/png".into()),
            ..form()
        }
    }

    fn photo_dir() -> Result<std::path::PathBuf> {
        let dir = std::env::temp_dir().join(format!("streetlight-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    #[actix_web::test]
    async fn submit_keeps_photo() -> Result<()> {
        let pool = pool().await;
        let dir = photo_dir()?;
        let valid = super::validate(photo_form()).unwrap();
        let outcome = super::submit(valid, None, &dir, &pool).await?;
        let file_name = outcome.report.photo.unwrap();
        assert!(dir.join(&file_name).exists());
        assert_eq!(1, std::fs::read_dir(&dir)?.count());
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[actix_web::test]
    async fn submit_failure_removes_photo() -> Result<()> {
        let pool = pool().await;
        pool.get()
            .await?
            .interact(|conn| conn.execute_batch("DROP TABLE report"))
            .await??;
        let dir = photo_dir()?;
        let valid = super::validate(photo_form()).unwrap();
        assert!(super::submit(valid, None, &dir, &pool).await.is_err());
        assert_eq!(0, std::fs::read_dir(&dir)?.count());
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }
}
