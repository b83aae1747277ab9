use anyhow::{Context, Result};
use kinescope_core::scene::SurfaceKind;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fs, path::Path};

pub const DEFAULT_FPS: u32 = 50;

/// Rendering and styling configuration handed to the external renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Frame rate, resolution and layout
    #[serde(default)]
    pub output: OutputConfig,

    /// Colors and fonts
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Draft,
    #[default]
    Normal,
    High,
}

impl Quality {
    pub fn dpi(self) -> u32 {
        match self {
            Quality::Draft => 80,
            Quality::Normal => 120,
            Quality::High => 150,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Frames per second at normal playback speed
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Resolution preset
    #[serde(default)]
    pub quality: Quality,

    /// Explicit resolution, overrides the preset
    pub dpi: Option<u32>,

    /// Playback speed multiplier (0.5 = half speed)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,

    /// Simulation time step, overrides the scene's own
    pub dt: Option<f64>,

    /// Figure size in inches
    #[serde(default = "default_figsize")]
    pub figsize: (f64, f64),

    /// Draw the speed-time graph under the diagram
    #[serde(default = "default_true")]
    pub include_graph: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            quality: Quality::default(),
            dpi: None,
            speed_factor: default_speed_factor(),
            dt: None,
            figsize: default_figsize(),
            include_graph: default_true(),
        }
    }
}

/// Timing and resolution passed to the frame writer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationParams {
    pub fps: u32,
    pub dpi: u32,
    pub interval_ms: f64,
}

impl OutputConfig {
    pub fn animation_params(&self) -> AnimationParams {
        AnimationParams {
            fps: ((self.fps as f64) * self.speed_factor).round().max(1.0) as u32,
            dpi: self.dpi.unwrap_or(self.quality.dpi()),
            interval_ms: 1000.0 / self.fps as f64 / self.speed_factor,
        }
    }
}

/// Style configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub palette: Palette,

    #[serde(default)]
    pub font: FontConfig,
}

/// Colors used by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Slope colors, first slope first; later slopes reuse the last entry
    pub slopes: Vec<String>,
    pub floor: String,
    /// Object colors, assigned in insertion order and cycled
    pub objects: Vec<String>,
    pub rope: String,
    pub pulley_fill: String,
    pub pulley_edge: String,
    pub event_line: String,
    pub current_point: String,
    pub grid: String,
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        let s = |v: &str| v.to_string();
        Self {
            slopes: vec![s("#3498db"), s("#27ae60")],
            floor: s("#7f8c8d"),
            objects: vec![
                s("#e74c3c"),
                s("#9b59b6"),
                s("#f39c12"),
                s("#1abc9c"),
                s("#3498db"),
            ],
            rope: s("#2c3e50"),
            pulley_fill: s("#ecf0f1"),
            pulley_edge: s("#2c3e50"),
            event_line: s("#e74c3c"),
            current_point: s("#e74c3c"),
            grid: s("#cccccc"),
            background: s("#ffffff"),
        }
    }
}

impl Palette {
    pub fn object_color(&self, index: usize) -> &str {
        &self.objects[index % self.objects.len()]
    }

    /// Color for the `slope_index`-th slope, or the floor color.
    pub fn surface_color(&self, kind: SurfaceKind, slope_index: usize) -> &str {
        match kind {
            SurfaceKind::Floor => &self.floor,
            SurfaceKind::Slope => &self.slopes[slope_index.min(self.slopes.len() - 1)],
        }
    }
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default = "default_font_family")]
    pub family: String,

    /// Font file to register before drawing
    pub path: Option<String>,

    /// Use a Unicode minus sign on axes
    #[serde(default)]
    pub unicode_minus: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: default_font_family(),
            path: None,
            unicode_minus: false,
        }
    }
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_speed_factor() -> f64 {
    1.0
}

fn default_figsize() -> (f64, f64) {
    (14.0, 10.0)
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    "NanumGothic".to_string()
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load(path.as_ref(), "config")
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let output = &self.output;
        if output.fps == 0 {
            anyhow::bail!("output.fps must be positive");
        }
        if !(output.speed_factor.is_finite() && output.speed_factor > 0.0) {
            anyhow::bail!(
                "output.speed_factor must be positive, got {}",
                output.speed_factor
            );
        }
        if let Some(dt) = output.dt {
            if !(dt.is_finite() && dt > 0.0) {
                anyhow::bail!("output.dt must be positive, got {dt}");
            }
        }
        if output.dpi == Some(0) {
            anyhow::bail!("output.dpi must be positive");
        }

        let palette = &self.style.palette;
        if palette.objects.is_empty() {
            anyhow::bail!("style.palette.objects cannot be empty");
        }
        if palette.slopes.is_empty() {
            anyhow::bail!("style.palette.slopes cannot be empty");
        }

        Ok(())
    }
}

/// Read `path` as TOML or JSON depending on its extension. Unknown
/// extensions try TOML first, then JSON.
pub fn load<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;

    let parse_toml = |content: &str| -> Result<T> {
        toml::from_str(content).with_context(|| format!("failed to parse {what} as TOML"))
    };
    let parse_json = |content: &str| -> Result<T> {
        serde_json::from_str(content).with_context(|| format!("failed to parse {what} as JSON"))
    };

    let parsed = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => parse_toml(&content),
        Some("json") => parse_json(&content),
        _ => parse_toml(&content).or_else(|_| parse_json(&content)),
    };
    parsed.with_context(|| format!("invalid {what} file {}", path.display()))
}
