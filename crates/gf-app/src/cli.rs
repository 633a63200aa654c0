use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gf_core::color::rgb_from_components;
use gf_core::config::{OutputMode, RunConfig};

/// gifscii: GIF to ASCII-art converter with synthetic facial animation.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier source : GIF animé, ou image fixe (PNG, JPEG, BMP).
    pub input: PathBuf,

    /// Facteurs d'échelle horizontal et vertical, dans ]0, 1].
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    pub scale: Option<Vec<f32>>,

    /// Multiplicateur de vitesse de lecture (> 0).
    #[arg(long)]
    pub speed: Option<f32>,

    /// Inverser la rampe de glyphes.
    #[arg(long, default_value_t = false)]
    pub inverse: bool,

    /// Colorer chaque glyphe avec la couleur moyenne de sa cellule.
    #[arg(long, default_value_t = false)]
    pub color: bool,

    /// Fond transparent (sortie GIF).
    #[arg(long, default_value_t = false)]
    pub transparent: bool,

    /// Couleur de fond.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    pub backcolor: Option<Vec<i64>>,

    /// Couleur des glyphes hors mode couleur.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    pub fillcolor: Option<Vec<i64>>,

    /// Police TrueType/OpenType utilisée pour la sortie GIF.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Taille de police en pixels.
    #[arg(long)]
    pub size: Option<f32>,

    /// Sortie texte au lieu d'un GIF.
    #[arg(long, default_value_t = false)]
    pub ascii: bool,

    /// Fichier de sortie.
    #[arg(long, default_value = "out.gif")]
    pub out: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml s'il existe.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Activer l'animation faciale (clignement, sourire, sourcils).
    #[arg(long, default_value_t = false)]
    pub face: bool,

    /// Script JSON de points faciaux par frame.
    #[arg(long)]
    pub landmarks: Option<PathBuf>,

    /// Animer les points sans remplacer les glyphes.
    #[arg(long, default_value_t = false)]
    pub no_overlay: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply the flags the user actually passed on top of `config`.
    ///
    /// # Errors
    /// Returns an error if a colour flag has a component outside `0..=255`.
    pub fn apply_overrides(&self, config: &mut RunConfig) -> Result<()> {
        if let Some([x, y]) = self.scale.as_deref() {
            config.scale_x = *x;
            config.scale_y = *y;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.inverse {
            config.invert = true;
        }
        if self.color {
            config.color_enabled = true;
        }
        if self.transparent {
            config.transparent = true;
        }
        if let Some(ref c) = self.backcolor {
            config.back_color = rgb_from_components("--backcolor", c)?;
        }
        if let Some(ref c) = self.fillcolor {
            config.fill_color = rgb_from_components("--fillcolor", c)?;
        }
        if let Some(ref font) = self.font {
            config.font_path.clone_from(font);
        }
        if let Some(size) = self.size {
            config.font_size = size;
        }
        if self.ascii {
            config.output_mode = OutputMode::Text;
        }
        if self.face || self.landmarks.is_some() {
            config.face.enabled = true;
        }
        if self.no_overlay {
            config.face.overlay = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gifscii").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = parse(&["in.gif"]);
        assert_eq!(cli.out, PathBuf::from("out.gif"));
        let mut config = RunConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "in.gif", "--scale", "0.5", "0.25", "--speed", "2", "--inverse", "--color",
            "--backcolor", "1", "2", "3", "--fillcolor", "4", "5", "6", "--ascii", "--face",
            "--no-overlay", "--size", "16",
        ]);
        let mut config = RunConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!((config.scale_x, config.scale_y), (0.5, 0.25));
        assert_eq!(config.speed, 2.0);
        assert!(config.invert && config.color_enabled);
        assert_eq!(config.back_color, (1, 2, 3));
        assert_eq!(config.fill_color, (4, 5, 6));
        assert_eq!(config.output_mode, OutputMode::Text);
        assert!(config.face.enabled && !config.face.overlay);
        assert_eq!(config.font_size, 16.0);
    }

    #[test]
    fn landmarks_imply_face_animation() {
        let cli = parse(&["in.gif", "--landmarks", "faces.json"]);
        let mut config = RunConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert!(config.face.enabled);
    }

    #[test]
    fn out_of_range_colour_is_rejected() {
        let cli = parse(&["in.gif", "--backcolor", "0", "300", "0"]);
        assert!(cli.apply_overrides(&mut RunConfig::default()).is_err());
    }

    #[test]
    fn scale_needs_two_values() {
        let args = ["gifscii", "in.gif", "--scale", "0.5"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
