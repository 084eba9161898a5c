use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::producto::Producto;

/// Grouping entity productos hang off. `nombre` is unique across the table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Categoria {
    pub id: i32,
    pub nombre: String,
}

/// Categoría with its productos attached, as returned by get-by-id.
#[derive(Debug, Serialize)]
pub struct CategoriaConProductos {
    pub id: i32,
    pub nombre: String,
    pub productos: Vec<Producto>,
}

// ── Write payload ─────────────────────────────────────────────────────────────

/// Validated body for create and update.
#[derive(Debug, Clone)]
pub struct NuevaCategoria {
    pub nombre: String,
}

impl NuevaCategoria {
    /// `nombre` must be a string with visible content; the trimmed value is
    /// what gets stored.
    pub fn parse(body: &Value) -> Result<Self, AppError> {
        let nombre = body
            .get("nombre")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|nombre| !nombre.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest(
                    "El nombre de la categoría es requerido y debe ser una cadena de texto."
                        .to_string(),
                )
            })?;

        Ok(Self {
            nombre: nombre.to_string(),
        })
    }
}
