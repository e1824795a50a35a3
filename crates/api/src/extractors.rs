use std::num::IntErrorKind;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::Deserialize;
use shopfront_catalog::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE};

use crate::error::{ApiError, FieldError};

#[derive(Debug, Deserialize)]
struct RawPageQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// `page` and `limit` query parameters, parsed but not yet range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: i64,
    pub limit: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPageQuery>::try_from_uri(&parts.uri).map_err(|rejection| {
            ApiError::Validation(vec![FieldError {
                field: "query".to_string(),
                message: rejection.body_text(),
            }])
        })?;

        let mut errors = Vec::new();
        let page = parse_integer("page", raw.page.as_deref(), DEFAULT_PAGE, &mut errors);
        let limit = parse_integer("limit", raw.limit.as_deref(), DEFAULT_LIMIT, &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(PageQuery { page, limit })
    }
}

/// Integer `{id}` path segment. Non-integers are rejected as malformed; range
/// checks are left to the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![FieldError {
                    field: "id".to_string(),
                    message: rejection.body_text(),
                }])
            })?;

        let mut errors = Vec::new();
        let id = parse_integer("id", Some(&raw), 0, &mut errors);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(ResourceId(id))
    }
}

/// Parses an integer field. Digit strings beyond `i64` saturate so the range
/// checks downstream reject them as out of range rather than malformed.
fn parse_integer(
    field: &str,
    raw: Option<&str>,
    default: i64,
    errors: &mut Vec<FieldError>,
) -> i64 {
    let value = match raw.map(str::trim) {
        None | Some("") => return default,
        Some(value) => value,
    };

    match value.parse::<i64>() {
        Ok(parsed) => parsed,
        Err(error) => match error.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                errors.push(FieldError {
                    field: field.to_string(),
                    message: format!("'{}' is not a valid integer", value),
                });
                default
            }
        },
    }
}
