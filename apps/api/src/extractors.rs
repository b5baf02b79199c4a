//! Wrappers around axum's body and query extractors whose rejections render
//! as `AppError`, so malformed input gets the same `{error, code}` body as
//! every other failure.

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
