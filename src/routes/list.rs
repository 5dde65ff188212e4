//! src/routes/list.rs
use super::{error_chain_fmt, ErrorBody};
use crate::storage::{StoreError, SubscriptionStore};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

#[derive(thiserror::Error)]
#[error("Failed to retrieve subscribers")]
pub struct ListError(#[source] StoreError);

impl std::fmt::Debug for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ListError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(&self.to_string()))
    }
}

#[tracing::instrument(name = "Listing subscribers", skip(store))]
pub async fn list_subscriptions(
    store: web::Data<dyn SubscriptionStore>,
) -> Result<HttpResponse, ListError> {
    let subscriptions = store.list().await.map_err(ListError)?;

    Ok(HttpResponse::Ok().json(subscriptions))
}
