use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::models::categoria::Categoria;
use crate::models::{float_field, int_field, missing};

const CAMPOS_REQUERIDOS: &str =
    "Todos los campos obligatorios (nombre, precio, stock, categoriaId) son requeridos.";
const NUMEROS_INVALIDOS: &str = "Precio, stock y categoriaId deben ser números válidos.";

/// Inventory item. `categoria_id` crosses the wire as `categoriaId`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub stock: i32,
    pub categoria_id: i32,
}

/// Producto with its categoría attached, as returned by list and get-by-id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductoConCategoria {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub stock: i32,
    pub categoria_id: i32,
    pub categoria: Categoria,
}

// ── Write payload ─────────────────────────────────────────────────────────────

/// Validated body for create and update.
#[derive(Debug, Clone)]
pub struct NuevoProducto {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub stock: i32,
    pub categoria_id: i32,
}

impl NuevoProducto {
    /// Checks run in contract order: field presence, then numeric parsing,
    /// then range rules. The first failure decides the message.
    pub fn parse(body: &Value) -> Result<Self, AppError> {
        let nombre = match body.get("nombre").and_then(Value::as_str) {
            Some(nombre) if !nombre.trim().is_empty() => nombre.trim().to_string(),
            _ => return Err(AppError::BadRequest(CAMPOS_REQUERIDOS.to_string())),
        };
        if missing(body, "precio") || missing(body, "stock") || missing(body, "categoriaId") {
            return Err(AppError::BadRequest(CAMPOS_REQUERIDOS.to_string()));
        }

        let descripcion = match body.get("descripcion") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(AppError::BadRequest(
                    "La descripción debe ser una cadena de texto.".to_string(),
                ))
            }
        };

        let parsed = (
            float_field(body, "precio"),
            int_field(body, "stock"),
            int_field(body, "categoriaId"),
        );
        let (precio, stock, categoria_id) = match parsed {
            (Some(precio), Some(stock), Some(categoria_id)) => (precio, stock, categoria_id),
            _ => return Err(AppError::BadRequest(NUMEROS_INVALIDOS.to_string())),
        };

        if !precio.is_finite() || precio <= 0.0 {
            return Err(AppError::BadRequest(
                "El precio debe ser un número positivo.".to_string(),
            ));
        }
        if stock < 0 {
            return Err(AppError::BadRequest(
                "El stock no puede ser negativo.".to_string(),
            ));
        }

        Ok(Self {
            nombre,
            descripcion,
            precio,
            stock,
            categoria_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_body() -> Value {
        json!({
            "nombre": "Aspirina",
            "descripcion": "Caja de 20 comprimidos",
            "precio": 9.99,
            "stock": 10,
            "categoriaId": 1
        })
    }

    #[test]
    fn parse_accepts_numbers_as_strings() {
        let body = json!({
            "nombre": "Aspirina",
            "precio": "9.99",
            "stock": "10",
            "categoriaId": "1"
        });
        let payload = NuevoProducto::parse(&body).unwrap();
        assert_eq!(payload.precio, 9.99);
        assert_eq!(payload.stock, 10);
        assert_eq!(payload.categoria_id, 1);
        assert_eq!(payload.descripcion, None);
    }

    #[test]
    fn parse_reports_missing_fields_first() {
        for key in ["nombre", "precio", "stock", "categoriaId"] {
            let mut body = base_body();
            body.as_object_mut().unwrap().remove(key);
            let err = NuevoProducto::parse(&body).unwrap_err();
            assert!(
                matches!(err, AppError::BadRequest(msg) if msg == CAMPOS_REQUERIDOS),
                "expected required-fields message without {key}"
            );
        }
    }

    #[test]
    fn parse_treats_blank_strings_as_missing() {
        let mut body = base_body();
        body["precio"] = json!("   ");
        let err = NuevoProducto::parse(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == CAMPOS_REQUERIDOS));
    }

    #[test]
    fn parse_rejects_non_numeric_values() {
        for (key, value) in [
            ("precio", json!("caro")),
            ("stock", json!("10.5")),
            ("stock", json!(10.5)),
            ("categoriaId", json!("uno")),
        ] {
            let mut body = base_body();
            body[key] = value;
            let err = NuevoProducto::parse(&body).unwrap_err();
            assert!(
                matches!(err, AppError::BadRequest(msg) if msg == NUMEROS_INVALIDOS),
                "expected invalid-numbers message for {key}"
            );
        }
    }

    #[test]
    fn parse_enforces_price_and_stock_ranges() {
        let mut body = base_body();
        body["precio"] = json!(0);
        let err = NuevoProducto::parse(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "El precio debe ser un número positivo."));

        let mut body = base_body();
        body["precio"] = json!(-3.5);
        assert!(NuevoProducto::parse(&body).is_err());

        let mut body = base_body();
        body["stock"] = json!(-1);
        let err = NuevoProducto::parse(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "El stock no puede ser negativo."));
    }

    #[test]
    fn parse_allows_zero_stock() {
        let mut body = base_body();
        body["stock"] = json!(0);
        let payload = NuevoProducto::parse(&body).unwrap();
        assert_eq!(payload.stock, 0);
    }

    #[test]
    fn parse_rejects_non_string_description() {
        let mut body = base_body();
        body["descripcion"] = json!(123);
        let err = NuevoProducto::parse(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "La descripción debe ser una cadena de texto."));
    }

    #[test]
    fn serializes_camel_case_categoria_id() {
        let producto = Producto {
            id: 7,
            nombre: "Ibuprofeno".to_string(),
            descripcion: None,
            precio: 5.5,
            stock: 3,
            categoria_id: 2,
        };
        let value = serde_json::to_value(&producto).unwrap();
        assert_eq!(value["categoriaId"], json!(2));
        assert!(value.get("categoria_id").is_none());
        assert_eq!(value["descripcion"], Value::Null);
    }
}
