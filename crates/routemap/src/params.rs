//! Path parameters: template parsing and typed coercion
//!
//! Path templates declare parameters as whole segments, `{name}` or
//! `{name:kind}` (`{id:int}`, `{slug}`, ...). Template parsing happens once
//! at route construction and is strict: a malformed template is a
//! [`ConfigError`], never a route that silently cannot match.
//!
//! Coercion is the downstream half: the resolver binds raw string values
//! into the scope, and [`parse_path_params`] turns them into typed
//! [`ParamValue`]s using the declared kinds.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;

/// A parameter token: a whole segment of the form `{name}` or `{name:kind}`,
/// with an identifier name
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?::(?P<kind>[A-Za-z0-9_]+))?\}$").unwrap()
});

/// Declared kind of a path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ParamKind {
    /// Raw string, the default for a bare `{name}` token
    Str,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// UUID in any format `uuid::Uuid` accepts
    Uuid,
}

impl ParamKind {
    /// Parse a kind as written in a template token
    pub(crate) fn parse(kind: &str) -> Option<Self> {
        match kind {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "uuid" => Some(Self::Uuid),
            _ => None,
        }
    }

    /// Kind name as written in templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Uuid => "uuid",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared path parameter.
///
/// `full` is the token body exactly as written (`id:int` for `{id:int}`);
/// it is what route listings render back into the wildcard slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
    /// Parameter name, an identifier
    pub name: String,
    /// Token body as written in the template
    pub full: String,
    /// Declared kind
    pub kind: ParamKind,
}

/// A coerced path-parameter value.
///
/// Serializes untagged, so an int binds as a JSON number and a uuid as a
/// string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// String parameter
    Str(String),
    /// Integer parameter
    Int(i64),
    /// Float parameter
    Float(f64),
    /// UUID parameter
    Uuid(Uuid),
}

impl ParamValue {
    /// The string value, if this is a string parameter
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The integer value, if this is an integer parameter
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float value, if this is a float parameter
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The UUID value, if this is a UUID parameter
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(value) => Some(*value),
            _ => None,
        }
    }
}

/// Errors from typed coercion of raw path-parameter values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The raw value does not parse as the declared kind
    #[error("Invalid value '{value}' for path parameter '{name}' (expected {kind})")]
    InvalidValue {
        /// Parameter name
        name: String,
        /// Declared kind
        kind: ParamKind,
        /// Raw value that failed to parse
        value: String,
    },

    /// No raw value was bound for a declared parameter
    #[error("Missing raw value for path parameter '{name}'")]
    Missing {
        /// Parameter name
        name: String,
    },
}

/// Normalize a path: trim surrounding whitespace and slashes, ensure exactly
/// one leading `/` and no trailing one. The empty path becomes the root `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Parse a path template into its normalized path and ordered parameter
/// definitions.
///
/// Strict by design: stray braces, tokens embedded in a wider segment,
/// non-identifier names, unknown kinds, and repeated names all fail here,
/// at build time.
pub(crate) fn parse_template(path: &str) -> Result<(String, Vec<ParamDef>), ConfigError> {
    let normalized = normalize_path(path);
    let mut params: Vec<ParamDef> = Vec::new();

    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        if !segment.contains('{') && !segment.contains('}') {
            continue;
        }
        let Some(caps) = TOKEN_RE.captures(segment) else {
            return Err(ConfigError::invalid_template(
                path,
                format!("segment '{segment}' must be a whole '{{name}}' or '{{name:kind}}' token"),
            ));
        };
        let full = &segment[1..segment.len() - 1];
        let name = &caps["name"];
        let kind = match caps.name("kind") {
            Some(kind) => {
                ParamKind::parse(kind.as_str()).ok_or_else(|| ConfigError::UnknownParamKind {
                    token: full.to_string(),
                    path: path.to_string(),
                })?
            }
            None => ParamKind::Str,
        };
        if params.iter().any(|p| p.name == name) {
            return Err(ConfigError::DuplicateParamName {
                name: name.to_string(),
                path: path.to_string(),
            });
        }
        params.push(ParamDef {
            name: name.to_string(),
            full: full.to_string(),
            kind,
        });
    }

    Ok((normalized, params))
}

/// Coerce raw path-parameter values to their declared kinds.
///
/// This is the step downstream of resolution: the resolver writes raw
/// strings into the scope, and callers (or the dispatch façade) apply this
/// to get typed values.
///
/// # Errors
///
/// [`ParamError::InvalidValue`] when a raw value does not parse as its
/// declared kind, [`ParamError::Missing`] when a declared parameter has no
/// raw value at all.
pub fn parse_path_params(
    defs: &[ParamDef],
    raw: &HashMap<String, String>,
) -> Result<HashMap<String, ParamValue>, ParamError> {
    let mut values = HashMap::with_capacity(defs.len());
    for def in defs {
        let raw_value = raw.get(&def.name).ok_or_else(|| ParamError::Missing {
            name: def.name.clone(),
        })?;
        let value = coerce(def, raw_value)?;
        values.insert(def.name.clone(), value);
    }
    Ok(values)
}

fn coerce(def: &ParamDef, raw: &str) -> Result<ParamValue, ParamError> {
    let invalid = || ParamError::InvalidValue {
        name: def.name.clone(),
        kind: def.kind,
        value: raw.to_string(),
    };
    match def.kind {
        ParamKind::Str => Ok(ParamValue::Str(raw.to_string())),
        ParamKind::Int => raw.parse::<i64>().map(ParamValue::Int).map_err(|_| invalid()),
        ParamKind::Float => raw
            .parse::<f64>()
            .map(ParamValue::Float)
            .map_err(|_| invalid()),
        ParamKind::Uuid => Uuid::parse_str(raw).map(ParamValue::Uuid).map_err(|_| invalid()),
    }
}
