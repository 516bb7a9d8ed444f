use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            padding_x: 140.0,
            // Taller than wide because children stack vertically.
            padding_y: 200.0,
            min_width: 1000.0,
            min_height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapConfig {
    pub base_separation: f64,
    pub long_text_bonus: f64,
    /// Label length at which the full bonus applies.
    pub long_text_len: usize,
    pub max_iterations: usize,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            base_separation: 60.0,
            long_text_bonus: 30.0,
            long_text_len: 50,
            max_iterations: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub warning_threshold: f64,
    pub critical_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            warning_threshold: 15.0,
            critical_threshold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal gap between the topic box and the branch column.
    pub branch_gap: f64,
    /// Horizontal gap between the branch column and the child column.
    pub child_gap: f64,
    /// Vertical step between childless branches.
    pub childless_spacing: f64,
    pub gap_base: f64,
    pub gap_font_factor: f64,
    /// Applied to the gap when consecutive children belong to different branches.
    pub boundary_gap_multiplier: f64,
    pub canvas: CanvasConfig,
    pub overlap: OverlapConfig,
    pub validation: ValidationConfig,
    pub background: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            branch_gap: 120.0,
            child_gap: 90.0,
            childless_spacing: 80.0,
            gap_base: 6.0,
            gap_font_factor: 0.3,
            boundary_gap_multiplier: 3.0,
            canvas: CanvasConfig::default(),
            overlap: OverlapConfig::default(),
            validation: ValidationConfig::default(),
            background: "#f5f5f5".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CanvasConfigFile {
    padding_x: Option<f64>,
    padding_y: Option<f64>,
    min_width: Option<f64>,
    min_height: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OverlapConfigFile {
    base_separation: Option<f64>,
    long_text_bonus: Option<f64>,
    long_text_len: Option<usize>,
    max_iterations: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ValidationConfigFile {
    warning_threshold: Option<f64>,
    critical_threshold: Option<f64>,
}

/// Partial configuration as written in a config file or passed by a host.
/// Absent keys keep their defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    branch_gap: Option<f64>,
    child_gap: Option<f64>,
    childless_spacing: Option<f64>,
    gap_base: Option<f64>,
    gap_font_factor: Option<f64>,
    boundary_gap_multiplier: Option<f64>,
    canvas: Option<CanvasConfigFile>,
    overlap: Option<OverlapConfigFile>,
    validation: Option<ValidationConfigFile>,
    background: Option<String>,
}

impl ConfigFile {
    pub fn apply(self, config: &mut LayoutConfig) {
        if let Some(v) = self.branch_gap {
            config.branch_gap = v;
        }
        if let Some(v) = self.child_gap {
            config.child_gap = v;
        }
        if let Some(v) = self.childless_spacing {
            config.childless_spacing = v;
        }
        if let Some(v) = self.gap_base {
            config.gap_base = v;
        }
        if let Some(v) = self.gap_font_factor {
            config.gap_font_factor = v;
        }
        if let Some(v) = self.boundary_gap_multiplier {
            config.boundary_gap_multiplier = v;
        }
        if let Some(v) = self.background {
            config.background = v;
        }
        if let Some(canvas) = self.canvas {
            if let Some(v) = canvas.padding_x {
                config.canvas.padding_x = v;
            }
            if let Some(v) = canvas.padding_y {
                config.canvas.padding_y = v;
            }
            if let Some(v) = canvas.min_width {
                config.canvas.min_width = v;
            }
            if let Some(v) = canvas.min_height {
                config.canvas.min_height = v;
            }
        }
        if let Some(overlap) = self.overlap {
            if let Some(v) = overlap.base_separation {
                config.overlap.base_separation = v;
            }
            if let Some(v) = overlap.long_text_bonus {
                config.overlap.long_text_bonus = v;
            }
            if let Some(v) = overlap.long_text_len {
                config.overlap.long_text_len = v.max(1);
            }
            if let Some(v) = overlap.max_iterations {
                config.overlap.max_iterations = v;
            }
        }
        if let Some(validation) = self.validation {
            if let Some(v) = validation.warning_threshold {
                config.validation.warning_threshold = v;
            }
            if let Some(v) = validation.critical_threshold {
                config.validation.critical_threshold = v;
            }
        }
    }
}

/// Parses config text (JSON or JSON5) on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let parsed: ConfigFile = json5::from_str(contents)?;
    parsed.apply(&mut config);
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}
