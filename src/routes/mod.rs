//! src/routes/mod.rs
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse};

mod health_check;
pub use health_check::*;

mod subscriptions;
pub use subscriptions::*;

mod list;
pub use list::*;

#[derive(serde::Serialize)]
pub(crate) struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
}

impl<'a> ErrorBody<'a> {
    pub(crate) fn new(error: &'a str) -> Self {
        Self {
            error,
            suggestion: None,
        }
    }

    pub(crate) fn with_suggestion(error: &'a str, suggestion: &'a str) -> Self {
        Self {
            error,
            suggestion: Some(suggestion),
        }
    }
}

/// Malformed or incomplete JSON bodies all get the same 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorBody::new("No data provided"));
    InternalError::from_response(err, response).into()
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
