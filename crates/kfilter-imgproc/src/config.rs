use std::str::FromStr;

use thiserror::Error;

/// Largest magnitude accepted for the contrast offset.
pub const MAX_CONTRAST: i64 = 255;

/// Largest accepted kernel radius.
///
/// A gaussian kernel of this radius holds `2049 * 2049` weights (32 MiB).
pub const MAX_RADIUS: usize = 1024;

/// Errors raised while validating a filter configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// The radius must be zero or positive.
    #[error("radius must be >= 0, got {0}")]
    NegativeRadius(i64),

    /// The radius exceeds [`MAX_RADIUS`].
    #[error("radius must be <= 1024, got {0}")]
    RadiusTooLarge(u64),

    /// The contrast offset must lie in [-255, 255].
    #[error("contrast must be within [-255, 255], got {0}")]
    ContrastOutOfRange(i64),

    /// The technique name is not recognized.
    #[error("unknown technique: {0} (expected gaussian or box)")]
    UnknownTechnique(String),

    /// The border mode name is not recognized.
    #[error("unknown border mode: {0} (expected renormalize or truncate)")]
    UnknownBorderMode(String),
}

/// The convolution technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Technique {
    /// Normalized 2D gaussian weights.
    #[default]
    Gaussian,
    /// Unweighted neighbourhood average.
    Box,
}

impl FromStr for Technique {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" => Ok(Technique::Gaussian),
            "box" | "mean" => Ok(Technique::Box),
            _ => Err(ConfigError::UnknownTechnique(s.to_string())),
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Technique::Gaussian => write!(f, "gaussian"),
            Technique::Box => write!(f, "box"),
        }
    }
}

/// How gaussian weights are treated when the window is cut by the image border.
///
/// The box technique always averages over the samples it visited, so it is not
/// affected by this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Divide by the sum of the weights that fell inside the image.
    #[default]
    Renormalize,
    /// Keep the partial weight sum; pixels near the border get darker.
    Truncate,
}

impl FromStr for BorderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "renormalize" => Ok(BorderMode::Renormalize),
            "truncate" => Ok(BorderMode::Truncate),
            _ => Err(ConfigError::UnknownBorderMode(s.to_string())),
        }
    }
}

/// Check that a radius fits the kernel size limit.
///
/// # Errors
///
/// Returns [`ConfigError::RadiusTooLarge`] if the radius exceeds [`MAX_RADIUS`].
pub fn check_radius(radius: u64) -> Result<usize, ConfigError> {
    match usize::try_from(radius) {
        Ok(r) if r <= MAX_RADIUS => Ok(r),
        _ => Err(ConfigError::RadiusTooLarge(radius)),
    }
}

/// Validated parameters of a spatial filter pass.
///
/// # Examples
///
/// ```
/// use kfilter_imgproc::{FilterConfig, Technique};
///
/// let config = FilterConfig::new(2, Technique::Box, -20).unwrap();
/// assert_eq!(config.kernel_width(), 5);
///
/// assert!(FilterConfig::new(-1, Technique::Box, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    radius: usize,
    technique: Technique,
    contrast: i32,
    border: BorderMode,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            technique: Technique::Gaussian,
            contrast: 0,
            border: BorderMode::Renormalize,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `radius` - Half width of the sampling window, excluding the center.
    /// * `technique` - The convolution technique.
    /// * `contrast` - Offset added to every channel after the convolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is negative or larger than [`MAX_RADIUS`], or
    /// if the contrast lies outside [-255, 255].
    pub fn new(radius: i64, technique: Technique, contrast: i64) -> Result<Self, ConfigError> {
        if radius < 0 {
            return Err(ConfigError::NegativeRadius(radius));
        }
        let radius = check_radius(radius as u64)?;

        if !(-MAX_CONTRAST..=MAX_CONTRAST).contains(&contrast) {
            return Err(ConfigError::ContrastOutOfRange(contrast));
        }

        Ok(Self {
            radius,
            technique,
            contrast: contrast as i32,
            border: BorderMode::default(),
        })
    }

    /// Set the border mode.
    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }

    /// Half width of the sampling window.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// The convolution technique.
    pub fn technique(&self) -> Technique {
        self.technique
    }

    /// Offset added to every channel after the convolution.
    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    /// How the gaussian weights are handled at the image border.
    pub fn border(&self) -> BorderMode {
        self.border
    }

    /// Side length of the square kernel, `2 * radius + 1`.
    pub fn kernel_width(&self) -> usize {
        2 * self.radius + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.radius(), 1);
        assert_eq!(config.technique(), Technique::Gaussian);
        assert_eq!(config.contrast(), 0);
        assert_eq!(config.border(), BorderMode::Renormalize);
        assert_eq!(config.kernel_width(), 3);
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            FilterConfig::new(-1, Technique::Gaussian, 0),
            Err(ConfigError::NegativeRadius(-1))
        );
        assert_eq!(
            FilterConfig::new(1, Technique::Gaussian, 256),
            Err(ConfigError::ContrastOutOfRange(256))
        );
        assert_eq!(
            FilterConfig::new(1, Technique::Gaussian, -256),
            Err(ConfigError::ContrastOutOfRange(-256))
        );
        assert!(FilterConfig::new(0, Technique::Box, -255).is_ok());
        assert!(FilterConfig::new(0, Technique::Box, 255).is_ok());
    }

    #[test]
    fn test_radius_limit() {
        let max = MAX_RADIUS as i64;
        assert!(FilterConfig::new(max, Technique::Box, 0).is_ok());
        assert_eq!(
            FilterConfig::new(max + 1, Technique::Gaussian, 0),
            Err(ConfigError::RadiusTooLarge(max as u64 + 1))
        );
        assert_eq!(
            FilterConfig::new(i64::MAX, Technique::Gaussian, 0),
            Err(ConfigError::RadiusTooLarge(i64::MAX as u64))
        );
        assert_eq!(
            FilterConfig::new(i64::MAX, Technique::Box, 0),
            Err(ConfigError::RadiusTooLarge(i64::MAX as u64))
        );
        assert_eq!(check_radius(3), Ok(3));
        assert_eq!(check_radius(u64::MAX), Err(ConfigError::RadiusTooLarge(u64::MAX)));
    }

    #[test]
    fn test_parse_technique() -> Result<(), ConfigError> {
        assert_eq!("gaussian".parse::<Technique>()?, Technique::Gaussian);
        assert_eq!("Box".parse::<Technique>()?, Technique::Box);
        assert_eq!("mean".parse::<Technique>()?, Technique::Box);
        assert_eq!(
            "median".parse::<Technique>(),
            Err(ConfigError::UnknownTechnique("median".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_parse_border() -> Result<(), ConfigError> {
        assert_eq!("truncate".parse::<BorderMode>()?, BorderMode::Truncate);
        assert_eq!(
            "RENORMALIZE".parse::<BorderMode>()?,
            BorderMode::Renormalize
        );
        assert!("wrap".parse::<BorderMode>().is_err());
        Ok(())
    }

    #[test]
    fn test_with_border() -> Result<(), ConfigError> {
        let config =
            FilterConfig::new(3, Technique::Gaussian, 10)?.with_border(BorderMode::Truncate);
        assert_eq!(config.border(), BorderMode::Truncate);
        assert_eq!(config.radius(), 3);
        assert_eq!(config.contrast(), 10);
        Ok(())
    }
}
