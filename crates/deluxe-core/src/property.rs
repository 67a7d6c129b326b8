//! Property declarations and values shared by operations and meta-operations.
//!
//! Every operation declares its parameters once as a static table of
//! [`PropertySpec`]s. Writes go through [`PropertyValues::set`], which coerces
//! the incoming [`Value`] to the declared kind and rejects anything outside the
//! declared range. UI hints (soft range, gamma, unit, visibility) ride along
//! with the declaration but never affect validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeluxeError, Result};

/// A parameter value as seen by the property system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    /// Enum values travel by nick, e.g. `"circle"`.
    Enum(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Enum(_) => "enum",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Enum(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Enum(v.to_string())
    }
}

/// One member of an enum property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnumValue {
    pub nick: &'static str,
    pub label: &'static str,
}

impl EnumValue {
    pub const fn new(nick: &'static str, label: &'static str) -> Self {
        Self { nick, label }
    }
}

/// Value domain and default of a property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyKind {
    Bool {
        default: bool,
    },
    Int {
        default: i64,
        min: i64,
        max: i64,
    },
    Double {
        default: f64,
        min: f64,
        max: f64,
    },
    Enum {
        default: &'static str,
        values: &'static [EnumValue],
    },
}

/// When a property should be shown by a UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Visibility {
    Always,
    /// Shown only while enum property `property` holds one of `values`.
    When {
        property: &'static str,
        values: &'static [&'static str],
    },
}

impl Visibility {
    pub fn is_visible(&self, values: &PropertyValues) -> bool {
        match self {
            Self::Always => true,
            Self::When { property, values: nicks } => match values.get(property) {
                Some(Value::Enum(current)) => nicks.contains(&current.as_str()),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::When { property, values } => write!(f, "{property} {{{}}}", values.join(", ")),
        }
    }
}

/// Presentation hints. Purely cosmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UiHints {
    pub range: Option<(f64, f64)>,
    pub gamma: Option<f64>,
    pub unit: Option<&'static str>,
    pub visible: Visibility,
}

impl UiHints {
    pub const NONE: UiHints = UiHints {
        range: None,
        gamma: None,
        unit: None,
        visible: Visibility::Always,
    };
}

/// Static declaration of a single property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub kind: PropertyKind,
    pub ui: UiHints,
}

impl PropertySpec {
    pub const fn new(name: &'static str, label: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            label,
            description: "",
            kind,
            ui: UiHints::NONE,
        }
    }

    pub const fn int(
        name: &'static str,
        label: &'static str,
        default: i64,
        min: i64,
        max: i64,
    ) -> Self {
        Self::new(name, label, PropertyKind::Int { default, min, max })
    }

    pub const fn double(
        name: &'static str,
        label: &'static str,
        default: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self::new(name, label, PropertyKind::Double { default, min, max })
    }

    pub const fn boolean(name: &'static str, label: &'static str, default: bool) -> Self {
        Self::new(name, label, PropertyKind::Bool { default })
    }

    pub const fn enumeration(
        name: &'static str,
        label: &'static str,
        default: &'static str,
        values: &'static [EnumValue],
    ) -> Self {
        Self::new(name, label, PropertyKind::Enum { default, values })
    }

    pub const fn describe(self, description: &'static str) -> Self {
        Self {
            description,
            ..self
        }
    }

    pub const fn ui_range(mut self, min: f64, max: f64) -> Self {
        self.ui.range = Some((min, max));
        self
    }

    pub const fn ui_gamma(mut self, gamma: f64) -> Self {
        self.ui.gamma = Some(gamma);
        self
    }

    pub const fn unit(mut self, unit: &'static str) -> Self {
        self.ui.unit = Some(unit);
        self
    }

    pub const fn visible_when(
        mut self,
        property: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        self.ui.visible = Visibility::When { property, values };
        self
    }

    pub fn default_value(&self) -> Value {
        match self.kind {
            PropertyKind::Bool { default } => Value::Bool(default),
            PropertyKind::Int { default, .. } => Value::Int(default),
            PropertyKind::Double { default, .. } => Value::Double(default),
            PropertyKind::Enum { default, .. } => Value::Enum(default.to_string()),
        }
    }

    /// Coerce `value` to this property's kind and range-check it.
    ///
    /// Doubles written to int properties truncate toward zero. Values at the
    /// range limits are accepted as-is; anything beyond is an error.
    pub fn validate(&self, value: Value) -> Result<Value> {
        let mismatch = |expected: &'static str, got: &Value| DeluxeError::ParameterType {
            name: self.name.to_string(),
            expected,
            got: got.type_name(),
        };

        match self.kind {
            PropertyKind::Bool { .. } => match value {
                Value::Bool(_) => Ok(value),
                other => Err(mismatch("bool", &other)),
            },
            PropertyKind::Int { min, max, .. } => {
                let v = match value {
                    Value::Int(v) => v,
                    Value::Double(d) if d.is_finite() => d.trunc() as i64,
                    other => return Err(mismatch("int", &other)),
                };
                if v < min || v > max {
                    return Err(self.out_of_range(v as f64, min as f64, max as f64));
                }
                Ok(Value::Int(v))
            }
            PropertyKind::Double { min, max, .. } => {
                let v = match value {
                    Value::Double(d) => d,
                    Value::Int(i) => i as f64,
                    other => return Err(mismatch("double", &other)),
                };
                if !(min..=max).contains(&v) {
                    return Err(self.out_of_range(v, min, max));
                }
                Ok(Value::Double(v))
            }
            PropertyKind::Enum { values, .. } => match value {
                Value::Enum(nick) => {
                    if values.iter().any(|ev| ev.nick == nick) {
                        Ok(Value::Enum(nick))
                    } else {
                        Err(DeluxeError::UnknownEnumValue {
                            name: self.name.to_string(),
                            value: nick,
                        })
                    }
                }
                other => Err(mismatch("enum", &other)),
            },
        }
    }

    fn out_of_range(&self, value: f64, min: f64, max: f64) -> DeluxeError {
        DeluxeError::ParameterOutOfRange {
            name: self.name.to_string(),
            value,
            min,
            max,
        }
    }
}

/// Current values of a set of declared properties.
#[derive(Clone, Debug)]
pub struct PropertyValues {
    owner: &'static str,
    specs: &'static [PropertySpec],
    values: BTreeMap<&'static str, Value>,
}

impl PropertyValues {
    /// Seed every declared property with its default.
    pub fn new(owner: &'static str, specs: &'static [PropertySpec]) -> Self {
        let values = specs
            .iter()
            .map(|spec| (spec.name, spec.default_value()))
            .collect();
        Self {
            owner,
            specs,
            values,
        }
    }

    pub fn specs(&self) -> &'static [PropertySpec] {
        self.specs
    }

    pub fn spec(&self, name: &str) -> Result<&'static PropertySpec> {
        self.specs
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| DeluxeError::UnknownParameter {
                operation: self.owner.to_string(),
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Validate and store. Returns the value as stored after coercion.
    pub fn set(&mut self, name: &str, value: Value) -> Result<Value> {
        let spec = self.spec(name)?;
        let stored = spec.validate(value)?;
        self.values.insert(spec.name, stored.clone());
        Ok(stored)
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "int", other)),
        }
    }

    pub fn double(&self, name: &str) -> Result<f64> {
        match self.require(name)? {
            Value::Double(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "double", other)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            Value::Bool(v) => Ok(*v),
            other => Err(self.wrong_kind(name, "bool", other)),
        }
    }

    pub fn nick(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            Value::Enum(v) => Ok(v.as_str()),
            other => Err(self.wrong_kind(name, "enum", other)),
        }
    }

    /// Parse an enum property into its Rust type.
    pub fn enum_value<T>(&self, name: &str) -> Result<T>
    where
        T: std::str::FromStr<Err = DeluxeError>,
    {
        self.nick(name)?.parse()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.specs
            .iter()
            .filter_map(|spec| self.values.get(spec.name).map(|v| (spec.name, v)))
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| DeluxeError::UnknownParameter {
                operation: self.owner.to_string(),
                name: name.to_string(),
            })
    }

    fn wrong_kind(&self, name: &str, expected: &'static str, got: &Value) -> DeluxeError {
        DeluxeError::ParameterType {
            name: name.to_string(),
            expected,
            got: got.type_name(),
        }
    }
}
