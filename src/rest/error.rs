use crate::service::report::FieldErrors;
use crate::Error;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{http::StatusCode, web::Json, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use tracing::error;

pub type RestResult<T, E = RestApiError> = std::result::Result<Json<T>, E>;

#[derive(Debug)]
pub struct RestApiError {
    pub code: RestApiErrorCode,
    pub message: String,
    pub fields: Option<FieldErrors>,
}

impl RestApiError {
    pub fn new(code: RestApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: None,
        }
    }

    pub fn not_found() -> Self {
        Self::new(
            RestApiErrorCode::NotFound,
            "Entity with requested ID doesn't exist.",
        )
    }

    pub fn database() -> Self {
        Self::new(
            RestApiErrorCode::Database,
            "Database query failed. Contact the city lighting team to resolve.",
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(RestApiErrorCode::InvalidInput, message)
    }

    pub fn invalid_fields(fields: FieldErrors) -> Self {
        Self {
            code: RestApiErrorCode::InvalidInput,
            message: "Some fields are invalid.".into(),
            fields: Some(fields),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestApiErrorCode {
    NotFound,
    Database,
    InvalidInput,
    Unauthorized,
    Forbidden,
    Conflict,
    Upstream,
}

impl fmt::Display for RestApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl fmt::Display for RestApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestApiErrorCode::NotFound => write!(f, "not_found"),
            RestApiErrorCode::Database => write!(f, "database"),
            RestApiErrorCode::InvalidInput => write!(f, "invalid_input"),
            RestApiErrorCode::Unauthorized => write!(f, "unauthorized"),
            RestApiErrorCode::Forbidden => write!(f, "forbidden"),
            RestApiErrorCode::Conflict => write!(f, "conflict"),
            RestApiErrorCode::Upstream => write!(f, "upstream"),
        }
    }
}

impl RestApiErrorCode {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Upstream => StatusCode::BAD_GATEWAY,
        }
    }
}

impl ResponseError for RestApiError {
    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "code": self.code.to_string(),
            "message": self.message,
        });
        if let Some(fields) = &self.fields {
            body["fields"] = json!(fields);
        }
        HttpResponse::build(self.status_code())
            .content_type("application/json")
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl From<Error> for RestApiError {
    fn from(error: Error) -> Self {
        if error.is_not_found() {
            return match error {
                Error::NotFound(message) => Self::new(RestApiErrorCode::NotFound, message),
                _ => Self::not_found(),
            };
        }
        match error {
            Error::InvalidInput(message) => Self::invalid_input(message),
            Error::Unauthorized(message) => Self::new(RestApiErrorCode::Unauthorized, message),
            Error::Forbidden(message) => Self::new(RestApiErrorCode::Forbidden, message),
            Error::Conflict(message) => Self::new(RestApiErrorCode::Conflict, message),
            Error::Listing(_) | Error::Reqwest(_) | Error::Url(_) => {
                error!(%error, "Light listing sync failed");
                Self::new(RestApiErrorCode::Upstream, error.to_string())
            }
            error => {
                error!(%error, "Request failed");
                Self::database()
            }
        }
    }
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    RestApiError::invalid_input(format!("Invalid arguments: {err}")).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    RestApiError::invalid_input(format!("Invalid request body: {err}")).into()
}

#[cfg(test)]
mod test {
    use super::{RestApiError, RestApiErrorCode};
    use crate::Error;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use serde_json::Value;

    #[test]
    fn error_mapping() {
        let cases = [
            (Error::NotFound("gone".into()), RestApiErrorCode::NotFound),
            (
                Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows),
                RestApiErrorCode::NotFound,
            ),
            (Error::InvalidInput("bad".into()), RestApiErrorCode::InvalidInput),
            (Error::Unauthorized("who".into()), RestApiErrorCode::Unauthorized),
            (Error::Forbidden("no".into()), RestApiErrorCode::Forbidden),
            (Error::Conflict("dup".into()), RestApiErrorCode::Conflict),
            (Error::Listing("junk".into()), RestApiErrorCode::Upstream),
            (Error::Generic("boom".into()), RestApiErrorCode::Database),
        ];
        for (error, code) in cases {
            assert_eq!(code, RestApiError::from(error).code);
        }
    }

    #[actix_web::test]
    async fn field_errors_in_body() {
        let mut fields = crate::service::report::FieldErrors::new();
        fields.insert("description".into(), "Too short".into());
        let error = RestApiError::invalid_fields(fields);
        assert_eq!(StatusCode::BAD_REQUEST, error.status_code());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!("invalid_input", body["code"]);
        assert_eq!("Too short", body["fields"]["description"]);
    }
}
