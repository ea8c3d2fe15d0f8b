/// Convenience result type used across Spotdrift.
pub type SpotdriftResult<T> = Result<T, SpotdriftError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SpotdriftError {
    /// Invalid user-provided scene or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while acquiring or decoding image sources.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors in the drawing surface or compositing stage.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpotdriftError {
    /// Build a [`SpotdriftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpotdriftError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`SpotdriftError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_format_with_prefix() {
        assert_eq!(
            SpotdriftError::validation("bad scene").to_string(),
            "validation error: bad scene"
        );
        assert_eq!(
            SpotdriftError::asset("missing file").to_string(),
            "asset error: missing file"
        );
        assert_eq!(
            SpotdriftError::render("surface too large").to_string(),
            "render error: surface too large"
        );
    }

    #[test]
    fn wraps_anyhow_transparently() {
        let err: SpotdriftError = anyhow::anyhow!("io broke").into();
        assert_eq!(err.to_string(), "io broke");
    }
}
