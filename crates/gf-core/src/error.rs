use thiserror::Error;

/// Errors originating from the core pipeline.
///
/// Every variant is fatal for the run: the output format needs a complete,
/// consistent frame sequence.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input frame sequence (or landmark script) cannot be decoded.
    #[error("Décodage impossible de {path} : {reason}")]
    Decode {
        /// Offending file.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// Configuration value out of its documented range.
    #[error("Configuration invalide : {0}")]
    Validation(String),

    /// Rasterization asset (glyph font) missing or unusable.
    #[error("Ressource introuvable ou invalide {path} : {reason}")]
    Asset {
        /// Asset path.
        path: String,
        /// Loader message.
        reason: String,
    },

    /// A single frame failed to render.
    #[error("Échec du rendu : {0}")]
    Render(String),

    /// Output could not be written.
    #[error("Écriture impossible vers {path} : {reason}")]
    Encode {
        /// Output path.
        path: String,
        /// Encoder message.
        reason: String,
    },
}

impl CoreError {
    /// Shorthand for [`CoreError::Decode`].
    pub fn decode(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`CoreError::Asset`].
    pub fn asset(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Asset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`CoreError::Encode`].
    pub fn encode(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Encode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used across the library crates.
pub type CoreResult<T> = Result<T, CoreError>;
