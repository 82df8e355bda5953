//! Keyword API endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{DELETED_MESSAGE, ID_REQUIRED_MESSAGE, MISSING_FIELDS_MESSAGE, SAVED_MESSAGE};
use crate::errors::AppError;
use crate::models::{CreateKeywordRequest, CreatedKeywords, KeywordPage, MessageResponse, NewKeywords};
use crate::AppState;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 15;

/// Raw list query parameters. Kept as strings so bad input falls back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Delete query parameters.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub id: Option<String>,
}

/// Resolved page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Resolve query parameters, substituting defaults for anything that is
    /// absent, has no leading digits or is not positive.
    pub fn from_query(query: &ListQuery) -> Self {
        Self {
            page: positive_or(query.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(query.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Read the leading run of digits, so `"5abc"` is 5 and `"2.5"` is 2.
fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(leading_integer)
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn leading_integer(raw: &str) -> Option<u64> {
    let value = raw.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Check required fields and resolve defaults for a create request.
pub fn validate_create(request: CreateKeywordRequest) -> Result<NewKeywords, AppError> {
    let missing = || AppError::Validation(MISSING_FIELDS_MESSAGE.to_string());

    let username = request
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(missing)?;
    let channels = request
        .channels
        .filter(|c| !c.is_empty() && c.iter().all(|channel| !channel.trim().is_empty()))
        .ok_or_else(missing)?;
    let created_by = request
        .created_by
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    Ok(NewKeywords {
        username,
        channels,
        available: request.available.unwrap_or(false),
        unavailable: request.unavailable.unwrap_or(false),
        created: request.created.unwrap_or(false),
        created_by,
        created_at: request.created_at,
    })
}

/// GET /api/keywords - List one page of keywords.
pub async fn list_keywords(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<KeywordPage>, AppError> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!("Unreadable list query, using defaults: {}", rejection);
            ListQuery::default()
        }
    };
    let pagination = Pagination::from_query(&query);

    let total = state.repo.count_keywords().await?;
    let records = state
        .repo
        .list_keywords(pagination.offset(), pagination.limit)
        .await?;

    Ok(Json(KeywordPage {
        records,
        total_pages: pagination.total_pages(total),
    }))
}

/// POST /api/keywords - Create one keyword per channel.
pub async fn create_keywords(
    State(state): State<AppState>,
    payload: Result<Json<CreateKeywordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedKeywords>), AppError> {
    let Json(request) = payload?;

    let new_keywords = match validate_create(request) {
        Ok(new_keywords) => new_keywords,
        Err(e) => {
            tracing::warn!("Rejected keyword create: {}", e);
            return Err(e);
        }
    };

    let created_records = state.repo.create_keywords(&new_keywords).await?;
    tracing::info!(
        username = %new_keywords.username,
        count = created_records.len(),
        "Keywords created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedKeywords {
            message: SAVED_MESSAGE.to_string(),
            created_records,
        }),
    ))
}

/// DELETE /api/keywords?id= - Delete a keyword.
pub async fn delete_keyword(
    State(state): State<AppState>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id_required = || AppError::Validation(ID_REQUIRED_MESSAGE.to_string());

    let Query(query) = query.map_err(|rejection| {
        tracing::warn!("Rejected keyword delete: {}", rejection);
        id_required()
    })?;
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(id_required)?;

    state.repo.delete_keyword(&id).await?;
    tracing::info!(%id, "Keyword deleted");

    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}

/// Any other verb on /api/keywords.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_pagination_defaults() {
        let defaults = Pagination { page: 1, limit: 15 };
        assert_eq!(Pagination::from_query(&query(None, None)), defaults);
        assert_eq!(Pagination::from_query(&query(Some("abc"), Some("x"))), defaults);
        assert_eq!(Pagination::from_query(&query(Some("0"), Some("-4"))), defaults);
        assert_eq!(Pagination::from_query(&query(Some(""), Some(""))), defaults);
        assert_eq!(Pagination::from_query(&query(Some("-2"), Some("+"))), defaults);
        assert_eq!(
            Pagination::from_query(&query(Some("3"), Some("10"))),
            Pagination { page: 3, limit: 10 }
        );
    }

    #[test]
    fn test_pagination_reads_leading_digits() {
        assert_eq!(
            Pagination::from_query(&query(Some("5abc"), Some("2.5"))),
            Pagination { page: 5, limit: 2 }
        );
        assert_eq!(
            Pagination::from_query(&query(Some(" 7 "), Some("+4"))),
            Pagination { page: 7, limit: 4 }
        );
        assert_eq!(
            Pagination::from_query(&query(Some("0x10"), Some("99999999999999999999999"))),
            Pagination { page: 1, limit: 15 }
        );
    }

    #[test]
    fn test_pagination_arithmetic() {
        let p = Pagination { page: 1, limit: 15 };
        assert_eq!(p.offset(), 0);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(15), 1);
        assert_eq!(p.total_pages(16), 2);

        let p = Pagination { page: 4, limit: 7 };
        assert_eq!(p.offset(), 21);
        assert_eq!(p.total_pages(22), 4);

        let huge = Pagination {
            page: u64::MAX,
            limit: u64::MAX,
        };
        assert_eq!(huge.offset(), u64::MAX);
        assert_eq!(huge.total_pages(3), 1);
    }

    #[test]
    fn test_validate_create_requires_username_and_channels() {
        let missing_username = CreateKeywordRequest {
            channels: Some(vec!["a".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            validate_create(missing_username),
            Err(AppError::Validation(_))
        ));

        let empty_channels = CreateKeywordRequest {
            username: Some("bob".to_string()),
            channels: Some(vec![]),
            ..Default::default()
        };
        assert!(matches!(
            validate_create(empty_channels),
            Err(AppError::Validation(_))
        ));

        let blank_channel = CreateKeywordRequest {
            username: Some("bob".to_string()),
            channels: Some(vec!["a".to_string(), " ".to_string()]),
            ..Default::default()
        };
        assert!(validate_create(blank_channel).is_err());
    }

    #[test]
    fn test_validate_create_fills_defaults() {
        let request = CreateKeywordRequest {
            username: Some("bob".to_string()),
            channels: Some(vec!["chan1".to_string(), "chan1".to_string()]),
            available: Some(true),
            ..Default::default()
        };

        let new_keywords = validate_create(request).unwrap();
        assert_eq!(new_keywords.created_by, "bob");
        assert_eq!(new_keywords.channels.len(), 2);
        assert!(new_keywords.available);
        assert!(!new_keywords.unavailable);
        assert!(!new_keywords.created);
        assert!(new_keywords.created_at.is_none());
    }
}
