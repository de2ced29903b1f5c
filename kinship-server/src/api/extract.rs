//! Extractors whose rejections render as [`ServerError`]

use axum::extract::{
    FromRequest, FromRequestParts, Request,
    rejection::{JsonRejection, PathRejection},
};
use axum::http::{StatusCode, request::Parts};
use serde::de::DeserializeOwned;

use crate::error::{ServerError, bad_request};

/// `axum::Json` that rejects with a 400 [`ServerError`]
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ServerError::PayloadTooLarge(rejection.body_text()))
            }
            Err(rejection) => Err(bad_request(rejection.body_text())),
        }
    }
}

/// `axum::extract::Path` that rejects with a 400 [`ServerError`]
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(PathRejection::FailedToDeserializePathParams(inner)) => {
                Err(bad_request(inner.body_text()))
            }
            Err(rejection) => Err(ServerError::Internal(format!(
                "Unhandled path rejection: {rejection}"
            ))),
        }
    }
}
