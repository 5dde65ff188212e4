//! src/routes/subscriptions.rs
use super::{error_chain_fmt, ErrorBody};
use crate::domain::{EmailValidator, RejectReason, SubscriberEmail, ValidationResult};
use crate::storage::{StoreError, SubscriptionStore};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(serde::Serialize)]
struct SubscribeResponse {
    message: &'static str,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    Rejected(RejectReason),
    #[error("{reason}")]
    Typo {
        reason: RejectReason,
        suggestion: SubscriberEmail,
    },
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error("Failed to save email")]
    UnexpectedError(#[source] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubscribeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadySubscribed => SubscribeError::AlreadySubscribed,
            StoreError::Unexpected(e) => SubscribeError::UnexpectedError(e),
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::Rejected(_) | SubscribeError::Typo { .. } => StatusCode::BAD_REQUEST,
            SubscribeError::AlreadySubscribed => StatusCode::CONFLICT,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = self.to_string();
        let body = match self {
            SubscribeError::Typo { suggestion, .. } => {
                ErrorBody::with_suggestion(&error, suggestion.as_ref())
            }
            _ => ErrorBody::new(&error),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(payload, validator, store),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = %payload.email,
    )
)]
pub async fn subscribe(
    payload: web::Json<SubscribeRequest>,
    validator: web::Data<EmailValidator>,
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, SubscribeError> {
    let email = match validator.validate(&payload.email) {
        ValidationResult::Accepted(email) => email,
        ValidationResult::Rejected(reason) => {
            tracing::info!(reason = reason.code(), "Rejected subscriber email");
            return Err(SubscribeError::Rejected(reason));
        }
        ValidationResult::RejectedWithSuggestion { reason, suggestion } => {
            tracing::info!(
                reason = reason.code(),
                suggestion = %suggestion,
                "Rejected subscriber email with a suggestion"
            );
            return Err(SubscribeError::Typo { reason, suggestion });
        }
    };

    store.insert(&email).await?;

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        message: "Email saved successfully",
    }))
}

/// CORS preflight for `/subscribe`; the headers come from the app-wide defaults.
pub async fn subscribe_preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}
