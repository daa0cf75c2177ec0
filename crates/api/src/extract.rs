//! Request extractors shared by handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use khayroukum_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then checked with `validator`.
///
/// Malformed JSON is a 400. A body of the wrong shape (missing or mistyped
/// fields) is a 422, and one that fails validation is a 422 carrying the
/// field error map.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonDataError(e) => {
                    AppError::Core(CoreError::Validation(e.body_text()))
                }
                other => AppError::BadRequest(other.body_text()),
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
