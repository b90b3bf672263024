//! Named parameters passed to registry factories.

use std::fmt;

use ember_core::Vec3;
use indexmap::IndexMap;

/// One parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A float.
    Float(f32),
    /// An integer.
    Int(i64),
    /// A 3D vector.
    Vec3(Vec3),
    /// A string.
    Text(String),
}

impl ParamValue {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Vec3(_) => "vec3",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Vec3(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Why a parameter could not be read.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamError {
    /// The parameter was not supplied.
    Missing {
        /// Parameter name.
        name: String,
    },
    /// The parameter has a different type.
    WrongType {
        /// Parameter name.
        name: String,
        /// Requested type.
        expected: &'static str,
        /// Supplied type.
        found: &'static str,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name } => write!(f, "missing parameter '{name}'"),
            Self::WrongType {
                name,
                expected,
                found,
            } => write!(f, "parameter '{name}' is {found}, expected {expected}"),
        }
    }
}

impl std::error::Error for ParamError {}

/// An ordered map of parameter names to values.
///
/// Integers are accepted where a float is requested.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BehaviorParams {
    values: IndexMap<String, ParamValue>,
}

impl BehaviorParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter, builder style.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Add or replace a parameter.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Raw lookup.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a float parameter.
    pub fn float(&self, name: &str) -> Result<f32, ParamError> {
        match self.require(name)? {
            ParamValue::Float(v) => Ok(*v),
            ParamValue::Int(v) => Ok(*v as f32),
            other => Err(wrong_type(name, "float", other)),
        }
    }

    /// Read an integer parameter.
    pub fn int(&self, name: &str) -> Result<i64, ParamError> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            other => Err(wrong_type(name, "int", other)),
        }
    }

    /// Read a vector parameter.
    pub fn vec3(&self, name: &str) -> Result<Vec3, ParamError> {
        match self.require(name)? {
            ParamValue::Vec3(v) => Ok(*v),
            other => Err(wrong_type(name, "vec3", other)),
        }
    }

    /// Read a string parameter.
    pub fn text(&self, name: &str) -> Result<&str, ParamError> {
        match self.require(name)? {
            ParamValue::Text(v) => Ok(v),
            other => Err(wrong_type(name, "text", other)),
        }
    }

    /// Read a float parameter, falling back to `default` when absent.
    pub fn float_or(&self, name: &str, default: f32) -> Result<f32, ParamError> {
        if self.contains(name) {
            self.float(name)
        } else {
            Ok(default)
        }
    }

    /// Read an integer parameter, falling back to `default` when absent.
    pub fn int_or(&self, name: &str, default: i64) -> Result<i64, ParamError> {
        if self.contains(name) {
            self.int(name)
        } else {
            Ok(default)
        }
    }

    /// Read a vector parameter, falling back to `default` when absent.
    pub fn vec3_or(&self, name: &str, default: Vec3) -> Result<Vec3, ParamError> {
        if self.contains(name) {
            self.vec3(name)
        } else {
            Ok(default)
        }
    }

    fn require(&self, name: &str) -> Result<&ParamValue, ParamError> {
        self.values.get(name).ok_or_else(|| ParamError::Missing {
            name: name.to_string(),
        })
    }
}

fn wrong_type(name: &str, expected: &'static str, found: &ParamValue) -> ParamError {
    ParamError::WrongType {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}
