//! Request extractors

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use oncoassist_common::errors::{AppError, Result};
use serde::de::DeserializeOwned;

/// JSON body extractor whose rejections use the API error body
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
