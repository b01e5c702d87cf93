//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API except for
//! [`parse_id`], which the HTTP layer uses for path parameters. They
//! centralize validation so every operation enforces the same invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Parse a raw id (path or query parameter) into a positive integer.
pub fn parse_id(value: &str, field: &'static str) -> ResultEngine<i64> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(_) => Err(EngineError::validation(field, "id must be positive")),
        Err(_) => Err(EngineError::validation(
            field,
            format!("'{value}' is not a numeric id"),
        )),
    }
}

/// Trim a required display name, rejecting empty values.
pub(crate) fn normalize_required_name(value: &str, field: &'static str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > 100 {
        return Err(EngineError::validation(field, "too long (max 100 chars)"));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text; blank input collapses to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Comparison key for category names.
///
/// Accents and case are folded and runs of punctuation/whitespace become a
/// single space, so `"Alimentación"` and `"alimentacion "` collide.
pub(crate) fn normalize_category_key(value: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in value.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }

    let key = out.trim_end();
    if key.is_empty() {
        return Err(EngineError::validation(
            "name",
            "category name must contain letters or digits",
        ));
    }
    Ok(key.to_string())
}

/// Validate a `#RRGGBB` display color and return it upper-cased.
pub(crate) fn normalize_color(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(EngineError::validation("color", "expected #RRGGBB"));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Reject negative amounts; the transaction kind carries the sign.
pub(crate) fn ensure_non_negative(amount_minor: i64, field: &'static str) -> ResultEngine<()> {
    if amount_minor < 0 {
        return Err(EngineError::validation(field, "must be >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_names_the_field() {
        assert_eq!(parse_id("42", "category_id").unwrap(), 42);
        let err = parse_id("abc", "category_id").unwrap_err();
        assert_eq!(err.field(), Some("category_id"));
        assert_eq!(parse_id("0", "id").unwrap_err().field(), Some("id"));
    }

    #[test]
    fn category_key_folds_case_and_accents() {
        assert_eq!(
            normalize_category_key("  Alimentación ").unwrap(),
            "alimentacion"
        );
        assert_eq!(
            normalize_category_key("Ingresos--Extra").unwrap(),
            "ingresos extra"
        );
        assert!(normalize_category_key(" 🐱 ").is_err());
    }

    #[test]
    fn colors_must_be_hex() {
        assert_eq!(normalize_color("#ff69b4").unwrap(), "#FF69B4");
        assert!(normalize_color("pink").is_err());
        assert!(normalize_color("#12345G").is_err());
    }
}
