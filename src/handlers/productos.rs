use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::{self, StoreError};
use crate::error::AppError;
use crate::handlers::crud::Resource;
use crate::models::{NuevoProducto, Producto, ProductoConCategoria};

/// CRUD surface mounted at /api/productos.
pub struct Productos;

#[async_trait]
impl Resource for Productos {
    const SINGULAR: &'static str = "producto";
    const NOT_FOUND: &'static str = "Producto no encontrado";
    const DELETED: &'static str = "Producto eliminado exitosamente.";

    type ListItem = ProductoConCategoria;
    type Detail = ProductoConCategoria;
    type Row = Producto;
    type Input = NuevoProducto;

    fn parse(body: &Value) -> Result<NuevoProducto, AppError> {
        NuevoProducto::parse(body)
    }

    fn row_id(row: &Producto) -> i32 {
        row.id
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<ProductoConCategoria>, StoreError> {
        db::fetch_all_productos(pool).await
    }

    async fn fetch_by_id(pool: &PgPool, id: i32) -> Result<ProductoConCategoria, StoreError> {
        db::fetch_producto_by_id(pool, id).await
    }

    async fn insert(pool: &PgPool, input: &NuevoProducto) -> Result<Producto, StoreError> {
        db::insert_producto(pool, input).await
    }

    async fn replace(
        pool: &PgPool,
        id: i32,
        input: &NuevoProducto,
    ) -> Result<Producto, StoreError> {
        db::update_producto(pool, id, input).await
    }

    async fn remove(pool: &PgPool, id: i32) -> Result<(), StoreError> {
        db::delete_producto(pool, id).await
    }

    // A write that points at a categoría that does not exist is a caller
    // mistake, not a conflict.
    fn write_conflict(err: StoreError) -> AppError {
        match err {
            StoreError::ForeignKeyViolation => {
                AppError::BadRequest("La categoriaId proporcionada no existe.".to_string())
            }
            other => AppError::internal(other),
        }
    }
}
