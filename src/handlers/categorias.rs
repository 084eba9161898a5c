use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::{self, StoreError};
use crate::error::AppError;
use crate::handlers::crud::Resource;
use crate::models::{Categoria, CategoriaConProductos, NuevaCategoria};

/// CRUD surface mounted at /api/categorias.
pub struct Categorias;

#[async_trait]
impl Resource for Categorias {
    const SINGULAR: &'static str = "categoría";
    const NOT_FOUND: &'static str = "Categoría no encontrada";
    const DELETED: &'static str = "Categoría eliminada exitosamente.";

    type ListItem = Categoria;
    type Detail = CategoriaConProductos;
    type Row = Categoria;
    type Input = NuevaCategoria;

    fn parse(body: &Value) -> Result<NuevaCategoria, AppError> {
        NuevaCategoria::parse(body)
    }

    fn row_id(row: &Categoria) -> i32 {
        row.id
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Categoria>, StoreError> {
        db::fetch_all_categorias(pool).await
    }

    async fn fetch_by_id(pool: &PgPool, id: i32) -> Result<CategoriaConProductos, StoreError> {
        db::fetch_categoria_by_id(pool, id).await
    }

    async fn insert(pool: &PgPool, input: &NuevaCategoria) -> Result<Categoria, StoreError> {
        db::insert_categoria(pool, input).await
    }

    async fn replace(
        pool: &PgPool,
        id: i32,
        input: &NuevaCategoria,
    ) -> Result<Categoria, StoreError> {
        db::update_categoria(pool, id, input).await
    }

    async fn remove(pool: &PgPool, id: i32) -> Result<(), StoreError> {
        db::delete_categoria(pool, id).await
    }

    // Duplicate nombre on create or update.
    fn write_conflict(err: StoreError) -> AppError {
        match err {
            StoreError::UniqueViolation => {
                AppError::Conflict("Ya existe una categoría con este nombre.".to_string())
            }
            other => AppError::internal(other),
        }
    }

    // Productos still reference the row; the FK blocks the delete.
    fn delete_conflict(err: StoreError) -> AppError {
        match err {
            StoreError::ForeignKeyViolation => AppError::Conflict(
                "No se puede eliminar la categoría porque tiene productos asociados. \
                 Elimine los productos primero."
                    .to_string(),
            ),
            other => AppError::internal(other),
        }
    }
}
