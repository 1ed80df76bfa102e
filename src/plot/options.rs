//! Plot options
//!
//! Options are a flat name -> value map. A plot's effective options are the
//! explicit options, then the store options, then the plot-type defaults.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Value of a single plot option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<OptionValue>),
    Null,
}

impl OptionValue {
    /// Convert to a JSON value for the Vega-Lite writer
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Boolean(b) => json!(b),
            OptionValue::Number(n) => json!(n),
            OptionValue::String(s) => json!(s),
            OptionValue::Array(values) => Value::Array(values.iter().map(|v| v.to_json()).collect()),
            OptionValue::Null => Value::Null,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Two-element numeric array as a (start, end) range
    pub fn as_range(&self) -> Option<(f64, f64)> {
        match self {
            OptionValue::Array(values) if values.len() == 2 => {
                Some((values[0].as_f64()?, values[1].as_f64()?))
            }
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<(f64, f64)> for OptionValue {
    fn from((start, end): (f64, f64)) -> Self {
        OptionValue::Array(vec![OptionValue::Number(start), OptionValue::Number(end)])
    }
}

/// Default value for a plot option
#[derive(Debug, Clone, Copy)]
pub enum DefaultOptionValue {
    String(&'static str),
    Number(f64),
    Boolean(bool),
    Null,
}

impl DefaultOptionValue {
    pub fn to_option_value(self) -> OptionValue {
        match self {
            DefaultOptionValue::String(s) => OptionValue::String(s.to_string()),
            DefaultOptionValue::Number(n) => OptionValue::Number(n),
            DefaultOptionValue::Boolean(b) => OptionValue::Boolean(b),
            DefaultOptionValue::Null => OptionValue::Null,
        }
    }
}

/// Plot option definition: name and default value
#[derive(Debug, Clone, Copy)]
pub struct DefaultOption {
    pub name: &'static str,
    pub default: DefaultOptionValue,
}

/// Name -> value map of plot options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotOptions {
    values: BTreeMap<String, OptionValue>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(OptionValue::as_f64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    /// Boolean flag; absent or non-boolean values read as `false`
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    pub fn get_range(&self, name: &str) -> Option<(f64, f64)> {
        self.get(name).and_then(OptionValue::as_range)
    }

    /// Fill in every option missing from `self` with the value from `fallback`
    pub fn merged_over(mut self, fallback: &PlotOptions) -> Self {
        for (name, value) in &fallback.values {
            self.values
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    /// Fill in missing options from plot-type defaults (`Null` defaults are skipped)
    pub fn with_defaults(mut self, defaults: &[DefaultOption]) -> Self {
        for default in defaults {
            if matches!(default.default, DefaultOptionValue::Null) {
                continue;
            }
            self.values
                .entry(default.name.to_string())
                .or_insert_with(|| default.default.to_option_value());
        }
        self
    }
}
