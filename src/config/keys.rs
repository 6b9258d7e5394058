//! Dotted-key access to the document (`notifications.openai.model`).
//!
//! The document is converted to a TOML value tree, edited, then decoded back
//! so every edit goes through the same schema checks as a file on disk.

use crate::config::loader::ConfigError;
use crate::config::metadata::{self, FieldKind};
use crate::config::types::ConfigDocument;

/// Read the value stored under `key`.
pub fn get(doc: &ConfigDocument, key: &str) -> Result<toml::Value, ConfigError> {
    let tree = to_tree(doc)?;
    lookup(&tree, key)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownKey {
            key: key.to_string(),
        })
}

/// Set `key` from raw user input.
///
/// The input is coerced to the type of the value currently stored there
/// (or the registry kind for new keys), validated against the field
/// registry, and the result must still decode as a document.
pub fn set(doc: &mut ConfigDocument, key: &str, raw: &str) -> Result<(), ConfigError> {
    if key == "version" {
        return Err(invalid(key, "the version is managed by migrations"));
    }
    let def = metadata::find(key);
    if let Some(def) = def {
        def.validate(raw).map_err(|reason| invalid(key, &reason))?;
    }

    let mut tree = to_tree(doc)?;
    let value = match lookup(&tree, key) {
        Some(toml::Value::Table(_)) => {
            return Err(invalid(key, "is a section, set one of its keys instead"))
        }
        Some(current) => coerce_like(current, key, raw)?,
        None => coerce_new(def.map(|d| d.kind), raw),
    };

    let (parents, leaf) = split(key)?;
    let mut table = tree
        .as_table_mut()
        .ok_or_else(|| invalid(key, "document root is not a table"))?;
    for segment in parents {
        let entry = table
            .entry(segment.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        table = entry
            .as_table_mut()
            .ok_or_else(|| invalid(key, &format!("'{segment}' is not a section")))?;
    }
    table.insert(leaf.to_string(), value);

    let updated = from_tree(tree, key)?;
    // keys serde does not know are dropped on decode
    if lookup(&to_tree(&updated)?, key).is_none() {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
        });
    }
    *doc = updated;
    Ok(())
}

/// Remove `key`. Struct fields fall back to their empty value, map entries
/// (providers, custom variables, provider settings) disappear.
pub fn unset(doc: &mut ConfigDocument, key: &str) -> Result<(), ConfigError> {
    if key == "version" {
        return Err(invalid(key, "the version is managed by migrations"));
    }
    let (parents, leaf) = split(key)?;
    let mut tree = to_tree(doc)?;

    let mut table = tree.as_table_mut();
    for segment in parents {
        table = table
            .and_then(|t| t.get_mut(segment))
            .and_then(|v| v.as_table_mut());
    }
    let removed = table.and_then(|t| t.remove(leaf));
    if removed.is_none() {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
        });
    }

    *doc = from_tree(tree, key)?;
    Ok(())
}

/// Every leaf of the document as `(dotted key, value)`, in document order.
///
/// Empty sections are reported as leaves so they stay visible.
pub fn flatten(doc: &ConfigDocument) -> Result<Vec<(String, toml::Value)>, ConfigError> {
    let tree = to_tree(doc)?;
    let mut out = Vec::new();
    if let toml::Value::Table(table) = tree {
        walk("", &table, &mut out);
    }
    Ok(out)
}

/// Render a value for humans: strings bare, everything else as TOML.
pub fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn walk(prefix: &str, table: &toml::Table, out: &mut Vec<(String, toml::Value)>) {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::Table(inner) if !inner.is_empty() => walk(&key, inner, out),
            other => out.push((key, other.clone())),
        }
    }
}

fn to_tree(doc: &ConfigDocument) -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(doc).map_err(|e| ConfigError::SerializeError { source: e })
}

fn from_tree(tree: toml::Value, key: &str) -> Result<ConfigDocument, ConfigError> {
    tree.try_into()
        .map_err(|e: toml::de::Error| invalid(key, e.message()))
}

fn lookup<'a>(tree: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(tree, |node, segment| node.as_table()?.get(segment))
}

fn split(key: &str) -> Result<(Vec<&str>, &str), ConfigError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(invalid(key, "key has an empty segment"));
    }
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| invalid(key, "key is empty"))?;
    Ok((parents.to_vec(), *leaf))
}

fn coerce_like(current: &toml::Value, key: &str, raw: &str) -> Result<toml::Value, ConfigError> {
    let value = match current {
        toml::Value::String(_) => toml::Value::String(raw.to_string()),
        toml::Value::Boolean(_) => toml::Value::Boolean(
            raw.parse()
                .map_err(|_| invalid(key, "must be true or false"))?,
        ),
        toml::Value::Integer(_) => toml::Value::Integer(
            raw.parse()
                .map_err(|_| invalid(key, "must be an integer"))?,
        ),
        toml::Value::Float(_) => toml::Value::Float(
            raw.parse()
                .map_err(|_| invalid(key, "must be a number"))?,
        ),
        toml::Value::Array(_) => list(raw),
        other => return Err(invalid(key, &format!("cannot set a {} value", other.type_str()))),
    };
    Ok(value)
}

fn coerce_new(kind: Option<FieldKind>, raw: &str) -> toml::Value {
    match kind {
        Some(FieldKind::Bool) => raw
            .parse()
            .map(toml::Value::Boolean)
            .unwrap_or_else(|_| toml::Value::String(raw.to_string())),
        Some(FieldKind::Integer) => raw
            .parse()
            .map(toml::Value::Integer)
            .unwrap_or_else(|_| toml::Value::String(raw.to_string())),
        Some(FieldKind::TextList) => list(raw),
        Some(FieldKind::Text | FieldKind::Secret | FieldKind::Duration) => {
            toml::Value::String(raw.to_string())
        }
        None => {
            if let Ok(b) = raw.parse::<bool>() {
                toml::Value::Boolean(b)
            } else if let Ok(i) = raw.parse::<i64>() {
                toml::Value::Integer(i)
            } else {
                toml::Value::String(raw.to_string())
            }
        }
    }
}

fn list(raw: &str) -> toml::Value {
    toml::Value::Array(
        raw.split(',')
            .map(|part| toml::Value::String(part.trim().to_string()))
            .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
            .collect(),
    )
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
