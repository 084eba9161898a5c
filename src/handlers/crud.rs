use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use crate::db::StoreError;
use crate::error::{AppError, AppResult};
use crate::AppState;

// ── Resource contract ─────────────────────────────────────────────────────────

/// One CRUD surface: response shapes, payload validation, store calls, and the
/// entity-specific conflict mapping. The generic handlers below are the only
/// HTTP plumbing; each entity just implements this trait.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Lowercase singular noun for the invalid-id message.
    const SINGULAR: &'static str;
    /// Not-found message stem; operations append their own tail
    /// ("." / " para actualizar." / " para eliminar.").
    const NOT_FOUND: &'static str;
    /// Confirmation message returned by delete.
    const DELETED: &'static str;

    /// Element of the list response.
    type ListItem: Serialize + Send;
    /// Get-by-id response, possibly carrying joined rows.
    type Detail: Serialize + Send;
    /// Create and update response.
    type Row: Serialize + Send;
    /// Validated write payload.
    type Input: Send + Sync;

    fn parse(body: &Value) -> Result<Self::Input, AppError>;
    fn row_id(row: &Self::Row) -> i32;

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Self::ListItem>, StoreError>;
    async fn fetch_by_id(pool: &PgPool, id: i32) -> Result<Self::Detail, StoreError>;
    async fn insert(pool: &PgPool, input: &Self::Input) -> Result<Self::Row, StoreError>;
    async fn replace(pool: &PgPool, id: i32, input: &Self::Input)
        -> Result<Self::Row, StoreError>;
    async fn remove(pool: &PgPool, id: i32) -> Result<(), StoreError>;

    /// Map a constraint violation raised by insert or replace onto the API
    /// error. Entities override this with their own message.
    fn write_conflict(err: StoreError) -> AppError {
        AppError::internal(err)
    }

    /// Map a constraint violation raised by remove onto the API error.
    fn delete_conflict(err: StoreError) -> AppError {
        AppError::internal(err)
    }
}

/// Mount the five handlers of `R` under `base` and `base/:id`.
pub fn routes<R: Resource>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", base),
            get(get_by_id::<R>).put(update::<R>).delete(delete::<R>),
        )
}

// ── Body extraction ───────────────────────────────────────────────────────────

/// Request body as loose JSON. Converting the rejection here keeps the
/// `{message}` error shape for malformed bodies.
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await.map_err(|_| {
            AppError::BadRequest("El cuerpo de la petición debe ser JSON válido.".to_string())
        })?;

        Ok(JsonBody(body))
    }
}

// ── Generic handlers ──────────────────────────────────────────────────────────

/// Path ids are taken as raw strings so a bad id reports 400, not a router 404.
/// The whole segment must parse; "5abc" is invalid.
fn parse_id<R: Resource>(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("ID de {} inválido.", R::SINGULAR)))
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<R::ListItem>>)> {
    let items = R::fetch_all(&state.db).await.map_err(AppError::internal)?;

    info!(resource = R::SINGULAR, count = items.len(), "Listed");
    Ok((StatusCode::OK, Json(items)))
}

pub async fn get_by_id<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<R::Detail>)> {
    let id = parse_id::<R>(&id)?;

    let detail = match R::fetch_by_id(&state.db, id).await {
        Ok(detail) => detail,
        Err(StoreError::NotFound) => {
            return Err(AppError::NotFound(format!("{}.", R::NOT_FOUND)))
        }
        Err(err) => return Err(AppError::internal(err)),
    };

    info!(resource = R::SINGULAR, id, "Fetched");
    Ok((StatusCode::OK, Json(detail)))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<R::Row>)> {
    let input = R::parse(&body)?;

    let row = match R::insert(&state.db, &input).await {
        Ok(row) => row,
        Err(err @ (StoreError::UniqueViolation | StoreError::ForeignKeyViolation)) => {
            return Err(R::write_conflict(err))
        }
        Err(err) => return Err(AppError::internal(err)),
    };

    info!(resource = R::SINGULAR, id = R::row_id(&row), "Created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<R::Row>)> {
    let id = parse_id::<R>(&id)?;
    let input = R::parse(&body)?;

    let row = match R::replace(&state.db, id, &input).await {
        Ok(row) => row,
        Err(StoreError::NotFound) => {
            return Err(AppError::NotFound(format!(
                "{} para actualizar.",
                R::NOT_FOUND
            )))
        }
        Err(err @ (StoreError::UniqueViolation | StoreError::ForeignKeyViolation)) => {
            return Err(R::write_conflict(err))
        }
        Err(err) => return Err(AppError::internal(err)),
    };

    info!(resource = R::SINGULAR, id, "Updated");
    Ok((StatusCode::OK, Json(row)))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let id = parse_id::<R>(&id)?;

    match R::remove(&state.db, id).await {
        Ok(()) => {}
        Err(StoreError::NotFound) => {
            return Err(AppError::NotFound(format!(
                "{} para eliminar.",
                R::NOT_FOUND
            )))
        }
        Err(err @ StoreError::ForeignKeyViolation) => return Err(R::delete_conflict(err)),
        Err(err) => return Err(AppError::internal(err)),
    }

    info!(resource = R::SINGULAR, id, "Deleted");
    Ok((StatusCode::OK, Json(json!({ "message": R::DELETED }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{categorias::Categorias, productos::Productos};

    #[test]
    fn id_parsing_accepts_whole_integers_only() {
        assert_eq!(parse_id::<Categorias>("12").unwrap(), 12);
        assert_eq!(parse_id::<Categorias>("-3").unwrap(), -3);
        assert!(parse_id::<Categorias>("12abc").is_err());
        assert!(parse_id::<Categorias>("9.5").is_err());
        assert!(parse_id::<Categorias>("").is_err());
        assert!(parse_id::<Categorias>("1e3").is_err());
    }

    #[test]
    fn id_messages_name_the_entity() {
        let err = parse_id::<Categorias>("abc").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "ID de categoría inválido."));

        let err = parse_id::<Productos>("abc").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "ID de producto inválido."));
    }
}
