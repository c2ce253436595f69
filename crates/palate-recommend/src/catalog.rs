//! Raw dataset documents → [`CatalogItem`]s, driven by a system's
//! [`FieldMapping`].

use palate_core::config::FieldMapping;
use palate_core::errors::CatalogError;
use palate_core::{CatalogItem, FeatureVector};
use serde_json::{Map, Value};

const DEFAULT_NAME: &str = "Unknown";

/// Normalise every document. All feature vectors must share the first
/// document's length.
pub fn normalize(
    documents: &[Value],
    mapping: &FieldMapping,
) -> Result<Vec<CatalogItem>, CatalogError> {
    let mut items = Vec::with_capacity(documents.len());
    let mut expected_len: Option<usize> = None;

    for (index, document) in documents.iter().enumerate() {
        let object = document.as_object().ok_or_else(|| CatalogError::InvalidField {
            index,
            field: "<document>".to_string(),
            reason: "not a JSON object".to_string(),
        })?;

        let id = match required(object, index, &mapping.id)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(invalid(index, &mapping.id, format!("unsupported id {other}"))),
        };
        let feature_vector =
            parse_features(required(object, index, &mapping.feature_vector)?, index, mapping)?;

        match expected_len {
            None => expected_len = Some(feature_vector.len()),
            Some(n) if n != feature_vector.len() => {
                return Err(invalid(
                    index,
                    &mapping.feature_vector,
                    format!("expected {n} features, got {}", feature_vector.len()),
                ));
            }
            Some(_) => {}
        }

        items.push(CatalogItem {
            id,
            name: text(object, &mapping.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description: text(object, &mapping.description).unwrap_or_default(),
            image: text(object, &mapping.image).unwrap_or_default(),
            feature_vector,
            latitude: coordinate(object, index, mapping.latitude.as_deref())?,
            longitude: coordinate(object, index, mapping.longitude.as_deref())?,
        });
    }
    Ok(items)
}

/// [`normalize`] over a JSON array given as text.
pub fn normalize_json(
    text: &str,
    mapping: &FieldMapping,
) -> Result<Vec<CatalogItem>, CatalogError> {
    let documents: Vec<Value> =
        serde_json::from_str(text).map_err(|e| invalid(0, "<dataset>", e.to_string()))?;
    normalize(&documents, mapping)
}

fn invalid(index: usize, field: &str, reason: String) -> CatalogError {
    CatalogError::InvalidField {
        index,
        field: field.to_string(),
        reason,
    }
}

fn required<'v>(
    object: &'v Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<&'v Value, CatalogError> {
    object.get(field).ok_or_else(|| CatalogError::MissingField {
        index,
        field: field.to_string(),
    })
}

/// Strings verbatim, other scalars via their JSON text; absent or null is `None`.
fn text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_features(
    value: &Value,
    index: usize,
    mapping: &FieldMapping,
) -> Result<FeatureVector, CatalogError> {
    let field = mapping.feature_vector.as_str();
    let entries = value
        .as_array()
        .ok_or_else(|| invalid(index, field, "not an array".to_string()))?;
    let bits = entries
        .iter()
        .map(|entry| match entry {
            Value::Bool(b) => Ok(u8::from(*b)),
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 0.0 => Ok(0),
                Some(v) if v == 1.0 => Ok(1),
                _ => Err(invalid(index, field, format!("feature value {n} is not 0 or 1"))),
            },
            other => Err(invalid(index, field, format!("feature value {other} is not 0 or 1"))),
        })
        .collect::<Result<Vec<u8>, _>>()?;
    if bits.is_empty() {
        return Err(invalid(index, field, "no features".to_string()));
    }
    FeatureVector::new(bits).map_err(|e| invalid(index, field, e.to_string()))
}

fn coordinate(
    object: &Map<String, Value>,
    index: usize,
    field: Option<&str>,
) -> Result<Option<f64>, CatalogError> {
    let Some(field) = field else {
        return Ok(None);
    };
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| invalid(index, field, e.to_string())),
        Some(other) => Err(invalid(index, field, format!("unsupported coordinate {other}"))),
    }
}
