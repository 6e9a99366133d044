//! Resolution options and resolver configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::cache::DEFAULT_CACHE_CAPACITY;

/// Looks up a custom property by name (`--foo`).
pub type VarCallback = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Converts `(value, unit)` to pixels.
pub type PixelCallback = Arc<dyn Fn(f64, &str) -> Option<f64> + Send + Sync>;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Fully resolved value.
    #[default]
    #[serde(rename = "")]
    Default,
    /// Specified value: `var()` references stay, math stays wrapped in `calc()`.
    #[serde(rename = "specifiedValue")]
    SpecifiedValue,
}

/// Custom property sources for `var()` resolution.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CustomPropertyOptions {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(skip)]
    pub callback: Option<VarCallback>,
}

impl fmt::Debug for CustomPropertyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPropertyOptions")
            .field("values", &self.values)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Pixel conversion sources for relative units.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DimensionOptions {
    /// Pixels per unit, e.g. `"em" => 16.0`.
    #[serde(default)]
    pub units: BTreeMap<String, f64>,
    #[serde(skip)]
    pub callback: Option<PixelCallback>,
}

impl fmt::Debug for DimensionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionOptions")
            .field("units", &self.units)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Options for a single resolution call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub custom_property: CustomPropertyOptions,
    #[serde(default)]
    pub dimension: DimensionOptions,
}

impl Options {
    pub fn specified_value() -> Self {
        Self {
            format: Format::SpecifiedValue,
            ..Self::default()
        }
    }

    pub fn is_specified_value(&self) -> bool {
        self.format == Format::SpecifiedValue
    }

    /// Add a custom property value.
    pub fn with_custom_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_property.values.insert(name.into(), value.into());
        self
    }

    /// Add a pixels-per-unit factor.
    pub fn with_unit(mut self, unit: impl Into<String>, pixels: f64) -> Self {
        self.dimension.units.insert(unit.into(), pixels);
        self
    }

    pub fn with_var_callback(mut self, callback: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.custom_property.callback = Some(Arc::new(callback));
        self
    }

    pub fn with_pixel_callback(mut self, callback: impl Fn(f64, &str) -> Option<f64> + Send + Sync + 'static) -> Self {
        self.dimension.callback = Some(Arc::new(callback));
        self
    }

    /// Callbacks cannot be part of a cache key, so their presence disables caching.
    pub fn has_callback(&self) -> bool {
        self.custom_property.callback.is_some() || self.dimension.callback.is_some()
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum number of cached results
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
