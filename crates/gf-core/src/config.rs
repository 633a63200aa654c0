use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charset::{CHARSET_COMPACT, Ramp};
use crate::color::{Rgb, rgb_from_components};
use crate::error::{CoreError, CoreResult};

/// Configuration complète d'une conversion. Figée pour toute la durée du run.
///
/// Construite par défaut, fusionnée avec un fichier TOML optionnel puis
/// avec les arguments CLI, et validée avant le décodage de la première frame.
///
/// # Example
/// ```
/// use gf_core::config::RunConfig;
/// let config = RunConfig::default();
/// assert_eq!(config.scale_x, 1.0);
/// assert!(config.validate().is_ok());
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    // === Échantillonnage ===
    /// Horizontal scale, (0, 1].
    pub scale_x: f32,
    /// Vertical scale, (0, 1].
    pub scale_y: f32,
    /// Source pixels per cell horizontally, at scale 1.
    pub cell_width: u32,
    /// Source pixels per cell vertically, at scale 1.
    pub cell_height: u32,
    /// Rampe de glyphes, du plus clair au plus dense.
    pub charset: String,
    /// Inverser la luminance (pour fond clair).
    pub invert: bool,

    // === Couleur ===
    /// Use each cell's mean colour as foreground.
    pub color_enabled: bool,
    /// Foreground when colour mode is off.
    pub fill_color: Rgb,
    /// Cell background.
    pub back_color: Rgb,
    /// No background fill at all.
    pub transparent: bool,

    // === Sortie ===
    /// Playback speed multiplier, > 0.
    pub speed: f32,
    /// Animated GIF or plain text.
    pub output_mode: OutputMode,
    /// TrueType/OpenType font for GIF rasterization.
    pub font_path: PathBuf,
    /// Glyph height in pixels.
    pub font_size: f32,

    // === Animation faciale ===
    /// Synthetic expression settings.
    pub face: FaceConfig,
}

/// Output format of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Animated GIF, one rasterized glyph per cell.
    #[default]
    Gif,
    /// Plain text, frames separated by a marker line.
    Text,
}

/// Cycle timing of one expression, in frames.
///
/// # Example
/// ```
/// use gf_core::config::ExpressionTiming;
/// let t = ExpressionTiming::new(4, 2);
/// assert_eq!((t.interval, t.duration), (4, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionTiming {
    /// Frames between cycle starts.
    pub interval: u32,
    /// Active frames within a cycle.
    pub duration: u32,
}

impl ExpressionTiming {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(interval: u32, duration: u32) -> Self {
        Self { interval, duration }
    }
}

/// Face animation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceConfig {
    /// Master switch.
    pub enabled: bool,
    /// Draw override glyphs over animated regions.
    pub overlay: bool,
    /// Blink cycle.
    pub blink: ExpressionTiming,
    /// Smile cycle.
    pub smile: ExpressionTiming,
    /// Eyebrow-raise cycle.
    pub eyebrow: ExpressionTiming,
    /// Eyebrow lift at full intensity, in source pixels.
    pub raise_amplitude: f32,
    /// Outward corner shift at full smile, as a fraction of mouth width.
    pub smile_widen: f32,
    /// Upward corner shift at full smile, as a fraction of mouth width.
    pub smile_lift: f32,
    /// Blink intensity from which eyes are drawn closed.
    pub blink_glyph_threshold: f32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            overlay: true,
            blink: ExpressionTiming::new(90, 6),
            smile: ExpressionTiming::new(120, 30),
            eyebrow: ExpressionTiming::new(150, 20),
            raise_amplitude: 4.0,
            smile_widen: 0.1,
            smile_lift: 0.05,
            blink_glyph_threshold: 0.5,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            cell_width: 1,
            cell_height: 1,
            charset: CHARSET_COMPACT.to_string(),
            invert: false,
            color_enabled: false,
            fill_color: (255, 255, 255),
            back_color: (0, 0, 0),
            transparent: false,
            speed: 1.0,
            output_mode: OutputMode::Gif,
            font_path: PathBuf::from("font.ttf"),
            font_size: 12.0,
            face: FaceConfig::default(),
        }
    }
}

fn check(ok: bool, msg: impl FnOnce() -> String) -> CoreResult<()> {
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(msg()))
    }
}

fn check_unit(name: &str, v: f32) -> CoreResult<()> {
    check((0.0..=1.0).contains(&v), || {
        format!("{name} = {v} hors de [0, 1]")
    })
}

fn check_timing(name: &str, t: ExpressionTiming) -> CoreResult<()> {
    check(t.interval >= 1 && t.duration >= 1, || {
        format!(
            "{name}: interval ({}) et duration ({}) doivent être ≥ 1",
            t.interval, t.duration
        )
    })
}

impl RunConfig {
    /// Check every field against its documented range.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] naming the first offending field.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, v) in [("scale_x", self.scale_x), ("scale_y", self.scale_y)] {
            check(v > 0.0 && v <= 1.0, || format!("{name} = {v} hors de (0, 1]"))?;
        }
        check(self.speed > 0.0 && self.speed.is_finite(), || {
            format!("speed = {} doit être > 0", self.speed)
        })?;
        check(self.cell_width >= 1 && self.cell_height >= 1, || {
            format!(
                "cellule {}×{} : dimensions ≥ 1 requises",
                self.cell_width, self.cell_height
            )
        })?;
        Ramp::new(&self.charset)?;
        check(self.font_size > 0.0 && self.font_size.is_finite(), || {
            format!("font_size = {} doit être > 0", self.font_size)
        })?;

        let face = &self.face;
        check_timing("blink", face.blink)?;
        check_timing("smile", face.smile)?;
        check_timing("eyebrow", face.eyebrow)?;
        check(
            face.raise_amplitude >= 0.0 && face.raise_amplitude.is_finite(),
            || format!("raise_amplitude = {} doit être ≥ 0", face.raise_amplitude),
        )?;
        check_unit("smile_widen", face.smile_widen)?;
        check_unit("smile_lift", face.smile_lift)?;
        check_unit("blink_glyph_threshold", face.blink_glyph_threshold)?;
        Ok(())
    }

    /// Consume and return the config once validated.
    ///
    /// # Errors
    /// See [`RunConfig::validate`].
    pub fn validated(self) -> CoreResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Ramp built from `charset`.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] for a charset shorter than 2 glyphs.
    pub fn ramp(&self) -> CoreResult<Ramp> {
        Ramp::new(&self.charset)
    }
}

/// Structure TOML intermédiaire, toutes les sections optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    render: Option<RenderSection>,
    output: Option<OutputSection>,
    face: Option<FaceSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderSection {
    scale: Option<[f32; 2]>,
    scale_x: Option<f32>,
    scale_y: Option<f32>,
    cell_width: Option<u32>,
    cell_height: Option<u32>,
    charset: Option<String>,
    invert: Option<bool>,
    color: Option<bool>,
    fill_color: Option<Vec<i64>>,
    back_color: Option<Vec<i64>>,
    transparent: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    mode: Option<OutputMode>,
    speed: Option<f32>,
    font_path: Option<PathBuf>,
    font_size: Option<f32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FaceSection {
    enabled: Option<bool>,
    overlay: Option<bool>,
    blink: Option<ExpressionTiming>,
    smile: Option<ExpressionTiming>,
    eyebrow: Option<ExpressionTiming>,
    raise_amplitude: Option<f32>,
    smile_widen: Option<f32>,
    smile_lift: Option<f32>,
    blink_glyph_threshold: Option<f32>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// The result is not validated yet; CLI overrides usually come next.
///
/// # Errors
/// Returns [`CoreError::Validation`] on malformed TOML, unknown keys or
/// colour components outside `0..=255`.
///
/// # Example
/// ```
/// use gf_core::config::{parse_config, OutputMode};
/// let config = parse_config("[render]\nscale = [0.5, 0.25]\n[output]\nmode = \"Text\"\n").unwrap();
/// assert_eq!(config.scale_y, 0.25);
/// assert_eq!(config.output_mode, OutputMode::Text);
/// ```
pub fn parse_config(content: &str) -> CoreResult<RunConfig> {
    let file: ConfigFile = toml::from_str(content)
        .map_err(|e| CoreError::Validation(format!("erreur de parsing TOML : {e}")))?;

    let mut config = RunConfig::default();

    if let Some(r) = file.render {
        if let Some([x, y]) = r.scale {
            config.scale_x = x;
            config.scale_y = y;
        }
        if let Some(v) = r.scale_x {
            config.scale_x = v;
        }
        if let Some(v) = r.scale_y {
            config.scale_y = v;
        }
        if let Some(v) = r.cell_width {
            config.cell_width = v;
        }
        if let Some(v) = r.cell_height {
            config.cell_height = v;
        }
        if let Some(v) = r.charset {
            config.charset = v;
        }
        if let Some(v) = r.invert {
            config.invert = v;
        }
        if let Some(v) = r.color {
            config.color_enabled = v;
        }
        if let Some(v) = r.fill_color {
            config.fill_color = rgb_from_components("fill_color", &v)?;
        }
        if let Some(v) = r.back_color {
            config.back_color = rgb_from_components("back_color", &v)?;
        }
        if let Some(v) = r.transparent {
            config.transparent = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.mode {
            config.output_mode = v;
        }
        if let Some(v) = o.speed {
            config.speed = v;
        }
        if let Some(v) = o.font_path {
            config.font_path = v;
        }
        if let Some(v) = o.font_size {
            config.font_size = v;
        }
    }

    if let Some(f) = file.face {
        let face = &mut config.face;
        if let Some(v) = f.enabled {
            face.enabled = v;
        }
        if let Some(v) = f.overlay {
            face.overlay = v;
        }
        if let Some(v) = f.blink {
            face.blink = v;
        }
        if let Some(v) = f.smile {
            face.smile = v;
        }
        if let Some(v) = f.eyebrow {
            face.eyebrow = v;
        }
        if let Some(v) = f.raise_amplitude {
            face.raise_amplitude = v;
        }
        if let Some(v) = f.smile_widen {
            face.smile_widen = v;
        }
        if let Some(v) = f.smile_lift {
            face.smile_lift = v;
        }
        if let Some(v) = f.blink_glyph_threshold {
            face.blink_glyph_threshold = v;
        }
    }

    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns [`CoreError::Validation`] if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gf_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> CoreResult<RunConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Validation(format!("impossible de lire {} : {e}", path.display()))
    })?;
    let config = parse_config(&content)?;
    log::debug!("Config chargée depuis {}", path.display());
    Ok(config)
}
