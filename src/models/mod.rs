pub mod categoria;
pub mod producto;

pub use categoria::{Categoria, CategoriaConProductos, NuevaCategoria};
pub use producto::{NuevoProducto, Producto, ProductoConCategoria};

use serde_json::Value;

// ── Form-field coercion ───────────────────────────────────────────────────────
// The browser forms submit every value as text, so numeric fields arrive
// either as JSON numbers or as digit strings. Parses cover the whole string:
// "10.5" is not a valid stock and "5abc" is not a valid id.

/// True when the field is absent, JSON null, or a blank string.
pub(crate) fn missing(body: &Value, key: &str) -> bool {
    match body.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Coerce a JSON number or numeric string to f64.
pub(crate) fn float_field(body: &Value, key: &str) -> Option<f64> {
    match body.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a JSON integer or integer string to i32. Fractional input fails.
pub(crate) fn int_field(body: &Value, key: &str) -> Option<i32> {
    match body.get(key)? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_covers_absent_null_and_blank() {
        let body = json!({ "a": null, "b": "   ", "c": "x", "d": 0 });
        assert!(missing(&body, "absent"));
        assert!(missing(&body, "a"));
        assert!(missing(&body, "b"));
        assert!(!missing(&body, "c"));
        assert!(!missing(&body, "d"), "zero is present, not missing");
    }

    #[test]
    fn float_field_accepts_numbers_and_strings() {
        let body = json!({ "n": 9.99, "s": "9.99", "pad": " 9.99 ", "bad": "abc" });
        assert_eq!(float_field(&body, "n"), Some(9.99));
        assert_eq!(float_field(&body, "s"), Some(9.99));
        assert_eq!(float_field(&body, "pad"), Some(9.99));
        assert_eq!(float_field(&body, "bad"), None);
        assert_eq!(float_field(&body, "absent"), None);
    }

    #[test]
    fn int_field_rejects_fractions() {
        let body = json!({ "n": 10, "s": "10", "frac": "10.5", "fnum": 10.5, "arr": [1] });
        assert_eq!(int_field(&body, "n"), Some(10));
        assert_eq!(int_field(&body, "s"), Some(10));
        assert_eq!(int_field(&body, "frac"), None);
        assert_eq!(int_field(&body, "fnum"), None);
        assert_eq!(int_field(&body, "arr"), None);
    }

    #[test]
    fn int_field_respects_i32_range() {
        let body = json!({ "big": 2_147_483_648_i64, "neg": -7 });
        assert_eq!(int_field(&body, "big"), None);
        assert_eq!(int_field(&body, "neg"), Some(-7));
    }
}
