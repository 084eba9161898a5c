use sqlx::PgPool;

use crate::models::{
    Categoria, CategoriaConProductos, NuevaCategoria, NuevoProducto, Producto,
    ProductoConCategoria,
};

// ── Store errors ──────────────────────────────────────────────────────────────

/// Outcome of one store round trip. Handlers match on this closed set instead
/// of digging through driver errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,
    #[error("{0}")]
    Other(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // PostgreSQL SQLSTATE: 23505 unique_violation, 23503 foreign_key_violation.
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => return StoreError::UniqueViolation,
                Some("23503") => return StoreError::ForeignKeyViolation,
                _ => {}
            }
        }
        StoreError::Other(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ── Categorías ────────────────────────────────────────────────────────────────

pub async fn fetch_all_categorias(pool: &PgPool) -> StoreResult<Vec<Categoria>> {
    let categorias =
        sqlx::query_as::<_, Categoria>("SELECT id, nombre FROM categorias ORDER BY nombre ASC")
            .fetch_all(pool)
            .await?;

    Ok(categorias)
}

pub async fn fetch_categoria_by_id(pool: &PgPool, id: i32) -> StoreResult<CategoriaConProductos> {
    let categoria =
        sqlx::query_as::<_, Categoria>("SELECT id, nombre FROM categorias WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(StoreError::NotFound)?;

    let productos = sqlx::query_as::<_, Producto>(
        r#"
        SELECT id, nombre, descripcion, precio, stock, categoria_id
        FROM productos
        WHERE categoria_id = $1
        ORDER BY nombre ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(CategoriaConProductos {
        id: categoria.id,
        nombre: categoria.nombre,
        productos,
    })
}

pub async fn insert_categoria(pool: &PgPool, payload: &NuevaCategoria) -> StoreResult<Categoria> {
    let categoria = sqlx::query_as::<_, Categoria>(
        "INSERT INTO categorias (nombre) VALUES ($1) RETURNING id, nombre",
    )
    .bind(&payload.nombre)
    .fetch_one(pool)
    .await?;

    Ok(categoria)
}

pub async fn update_categoria(
    pool: &PgPool,
    id: i32,
    payload: &NuevaCategoria,
) -> StoreResult<Categoria> {
    sqlx::query_as::<_, Categoria>(
        "UPDATE categorias SET nombre = $1 WHERE id = $2 RETURNING id, nombre",
    )
    .bind(&payload.nombre)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)
}

pub async fn delete_categoria(pool: &PgPool, id: i32) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM categorias WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

// ── Productos ─────────────────────────────────────────────────────────────────

/// Flat join row, folded into the nested wire shape below.
#[derive(sqlx::FromRow)]
struct ProductoJoinRow {
    id: i32,
    nombre: String,
    descripcion: Option<String>,
    precio: f64,
    stock: i32,
    categoria_id: i32,
    categoria_nombre: String,
}

impl From<ProductoJoinRow> for ProductoConCategoria {
    fn from(row: ProductoJoinRow) -> Self {
        ProductoConCategoria {
            id: row.id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            precio: row.precio,
            stock: row.stock,
            categoria_id: row.categoria_id,
            categoria: Categoria {
                id: row.categoria_id,
                nombre: row.categoria_nombre,
            },
        }
    }
}

pub async fn fetch_all_productos(pool: &PgPool) -> StoreResult<Vec<ProductoConCategoria>> {
    let rows = sqlx::query_as::<_, ProductoJoinRow>(
        r#"
        SELECT p.id, p.nombre, p.descripcion, p.precio, p.stock, p.categoria_id,
               c.nombre AS categoria_nombre
        FROM productos p
        JOIN categorias c ON c.id = p.categoria_id
        ORDER BY p.nombre ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ProductoConCategoria::from).collect())
}

pub async fn fetch_producto_by_id(pool: &PgPool, id: i32) -> StoreResult<ProductoConCategoria> {
    sqlx::query_as::<_, ProductoJoinRow>(
        r#"
        SELECT p.id, p.nombre, p.descripcion, p.precio, p.stock, p.categoria_id,
               c.nombre AS categoria_nombre
        FROM productos p
        JOIN categorias c ON c.id = p.categoria_id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(ProductoConCategoria::from)
    .ok_or(StoreError::NotFound)
}

pub async fn insert_producto(pool: &PgPool, payload: &NuevoProducto) -> StoreResult<Producto> {
    let producto = sqlx::query_as::<_, Producto>(
        r#"
        INSERT INTO productos (nombre, descripcion, precio, stock, categoria_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, nombre, descripcion, precio, stock, categoria_id
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(payload.precio)
    .bind(payload.stock)
    .bind(payload.categoria_id)
    .fetch_one(pool)
    .await?;

    Ok(producto)
}

pub async fn update_producto(
    pool: &PgPool,
    id: i32,
    payload: &NuevoProducto,
) -> StoreResult<Producto> {
    sqlx::query_as::<_, Producto>(
        r#"
        UPDATE productos
        SET nombre      = $1,
            descripcion = $2,
            precio      = $3,
            stock       = $4,
            categoria_id = $5
        WHERE id = $6
        RETURNING id, nombre, descripcion, precio, stock, categoria_id
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(payload.precio)
    .bind(payload.stock)
    .bind(payload.categoria_id)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)
}

pub async fn delete_producto(pool: &PgPool, id: i32) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM productos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_only_touches_database_errors() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Other(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Other(_)
        ));
    }

    #[test]
    fn store_errors_render_for_logs() {
        assert_eq!(StoreError::NotFound.to_string(), "row not found");
        assert_eq!(
            StoreError::UniqueViolation.to_string(),
            "unique constraint violated"
        );
        assert_eq!(
            StoreError::ForeignKeyViolation.to_string(),
            "foreign key constraint violated"
        );
    }
}
