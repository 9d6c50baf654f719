use crate::db;
use crate::db::user::schema::User;
use crate::{Error, Result};
use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use deadpool_sqlite::Pool;
use rusqlite::Connection;
use std::sync::OnceLock;
use tracing::{info, warn};
use uuid::Uuid;

pub const NAME_MAX_CHARS: usize = 64;
pub const PASSWORD_MIN_CHARS: usize = 8;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct Session {
    pub token: String,
    pub user: User,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|it| it.to_string())
        .map_err(|e| Error::Generic(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

fn unknown_user_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password("unknown-user").unwrap_or_default())
}

fn validate_credentials(name: &str, password: &str) -> Result<()> {
    let name_chars = name.chars().count();
    if name_chars == 0 || name_chars > NAME_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "Name must be between 1 and {NAME_MAX_CHARS} characters"
        )));
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(Error::InvalidInput(format!(
            "Password must be at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    Ok(())
}

pub async fn register(name: &str, password: &str, pool: &Pool) -> Result<Session> {
    let name = name.trim().to_string();
    validate_credentials(&name, password)?;
    if db::user::queries::select_by_name(&name, pool).await?.is_some() {
        return Err(Error::Conflict(format!("User {name} already exists")));
    }
    let user = db::user::queries::insert(&name, hash_password(password)?, pool)
        .await
        .map_err(|e| match e {
            Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Conflict(format!("User {name} already exists"))
            }
            e => e,
        })?;
    let token = create_token(&user, pool).await?;
    info!(user_id = user.id, user_name = user.name, "Registered new user");
    Ok(Session { token, user })
}

/// Every failure reads the same to the caller so that names can't be probed.
pub async fn login(name: &str, password: &str, pool: &Pool) -> Result<Session> {
    let Some(user) = db::user::queries::select_by_name(name.trim(), pool).await? else {
        // Unknown names still pay for one hash check
        verify_password(password, unknown_user_hash());
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
    };
    if !verify_password(password, &user.password) {
        warn!(user_name = user.name, "Failed login attempt");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
    }
    let token = create_token(&user, pool).await?;
    info!(user_id = user.id, "User logged in");
    Ok(Session { token, user })
}

pub async fn logout(secret: &str, pool: &Pool) -> Result<()> {
    match db::access_token::queries::delete_by_secret(secret, pool).await? {
        0 => Err(Error::Unauthorized("Invalid token".into())),
        _ => Ok(()),
    }
}

async fn create_token(user: &User, pool: &Pool) -> Result<String> {
    let secret = Uuid::new_v4().to_string();
    db::access_token::queries::insert(user.id, &secret, pool).await?;
    Ok(secret)
}

pub fn bearer_secret(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|it| !it.is_empty())
        .map(str::to_string)
}

fn select_user_by_secret(secret: &str, conn: &Connection) -> Result<Option<User>> {
    match db::access_token::blocking_queries::select_by_secret(secret, conn)? {
        Some(token) => db::user::blocking_queries::select_by_id(token.user_id, conn).map(Some),
        None => Ok(None),
    }
}

/// Resolves the caller, if any. A request without credentials is anonymous,
/// but a request with an unknown token is rejected.
pub async fn authenticate(req: &HttpRequest, pool: &Pool) -> Result<Option<User>> {
    let Some(secret) = bearer_secret(req) else {
        return Ok(None);
    };
    let user = pool
        .get()
        .await?
        .interact(move |conn| select_user_by_secret(&secret, conn))
        .await??;
    match user {
        Some(user) => Ok(Some(user)),
        None => Err(Error::Unauthorized("Invalid token".into())),
    }
}

pub async fn require_user(req: &HttpRequest, pool: &Pool) -> Result<User> {
    authenticate(req, pool)
        .await?
        .ok_or(Error::Unauthorized("Authentication required".into()))
}

pub async fn require_admin(req: &HttpRequest, pool: &Pool) -> Result<User> {
    let user = require_user(req, pool).await?;
    if !user.is_admin() {
        warn!(user_id = user.id, path = req.path(), "Admin access denied");
        return Err(Error::Forbidden("Admin role is required".into()));
    }
    Ok(user)
}
