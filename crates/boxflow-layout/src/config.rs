//! Per-tree layout configuration.

use boxflow_core::Style;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

/// Configuration shared by every node of one [`LayoutTree`](crate::LayoutTree).
///
/// Passed explicitly into each layout pass; independent trees never share it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Device pixels per point. When positive, results are snapped to
    /// `1 / point_scale_factor`. The default `0.0` keeps exact layouts.
    ///
    /// Snapped sizes can land up to one grid unit outside a node's
    /// `[min, max]` range; edges of adjacent boxes stay shared.
    pub point_scale_factor: f32,
    /// Use CSS defaults (`row`, `flex-shrink: 1`, `align-content: stretch`)
    /// for new nodes and for the `flex` shorthand.
    pub use_web_defaults: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            point_scale_factor: 0.0,
            use_web_defaults: false,
        }
    }
}

impl LayoutConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point scale factor. Negative or non-finite values disable rounding.
    #[must_use]
    pub fn with_point_scale_factor(mut self, factor: f32) -> Self {
        self.point_scale_factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        self
    }

    /// Toggle CSS defaults.
    #[must_use]
    pub const fn with_web_defaults(mut self, enabled: bool) -> Self {
        self.use_web_defaults = enabled;
        self
    }

    /// Parse from TOML; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> LayoutResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| LayoutError::Config(e.to_string()))?;
        Ok(config.with_point_scale_factor(config.point_scale_factor))
    }

    /// Style given to freshly created nodes.
    #[must_use]
    pub fn default_style(&self) -> Style {
        if self.use_web_defaults {
            Style::web()
        } else {
            Style::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxflow_core::FlexDirection;

    #[test]
    fn test_config_default() {
        let c = LayoutConfig::default();
        assert_eq!(c.point_scale_factor, 0.0);
        assert!(!c.use_web_defaults);
    }

    #[test]
    fn test_config_from_toml() {
        let c = LayoutConfig::from_toml_str("point_scale_factor = 2.0\nuse_web_defaults = true\n")
            .unwrap();
        assert_eq!(c.point_scale_factor, 2.0);
        assert!(c.use_web_defaults);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let c = LayoutConfig::from_toml_str("use_web_defaults = true").unwrap();
        assert_eq!(c.point_scale_factor, 0.0);
    }

    #[test]
    fn test_config_from_toml_invalid() {
        let err = LayoutConfig::from_toml_str("point_scale_factor = \"big\"").unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
    }

    #[test]
    fn test_negative_scale_disables_rounding() {
        let c = LayoutConfig::new().with_point_scale_factor(-3.0);
        assert_eq!(c.point_scale_factor, 0.0);
    }

    #[test]
    fn test_default_style_follows_web_defaults() {
        let native = LayoutConfig::new().default_style();
        let web = LayoutConfig::new().with_web_defaults(true).default_style();
        assert_eq!(native.flex_direction, FlexDirection::Column);
        assert_eq!(web.flex_direction, FlexDirection::Row);
    }
}
