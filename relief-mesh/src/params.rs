//! Relief generation parameters.

use crate::error::{ReliefError, ReliefResult};

/// Configuration for relief generation.
///
/// All physical values are millimeters. Defaults produce an 80x80 mm
/// plate sampled at 4 points/mm, 0.2-4.0 mm thick, with a 3 mm rim.
/// Darker samples produce thicker output unless
/// [`invert`](Self::with_invert) is set.
///
/// # Examples
///
/// ```
/// use relief_mesh::ReliefParams;
///
/// let params = ReliefParams::new()
///     .with_size_mm(100.0, 60.0)
///     .with_thickness_mm(3.0, 0.4)
///     .with_border_mm(0.0);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReliefParams {
    /// Physical output width in mm.
    pub width_mm: f32,

    /// Physical output height in mm.
    pub height_mm: f32,

    /// Output sampling density in points per mm.
    pub samples_per_mm: f32,

    /// Extrusion depth of the thickest output in mm.
    pub thickest_mm: f32,

    /// Extrusion depth of the thinnest output in mm.
    pub thinnest_mm: f32,

    /// Width of the flat rim around the image in mm. Zero disables it.
    pub border_mm: f32,

    /// Mirror the tone mapping so the darkest samples come out
    /// thinnest. The rim is unaffected.
    pub invert: bool,

    /// Collapse the grid to two levels before tone mapping.
    pub two_tone: bool,

    /// Two-tone brightness threshold as a percentage (1-99).
    /// `None` means 50.
    pub threshold_percent: Option<u8>,
}

impl Default for ReliefParams {
    fn default() -> Self {
        Self {
            width_mm: 80.0,
            height_mm: 80.0,
            samples_per_mm: 4.0,
            thickest_mm: 4.0,
            thinnest_mm: 0.2,
            border_mm: 3.0,
            invert: false,
            two_tone: false,
            threshold_percent: None,
        }
    }
}

impl ReliefParams {
    /// Creates parameters with default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use relief_mesh::ReliefParams;
    ///
    /// let params = ReliefParams::new();
    /// assert_eq!(params.width_mm, 80.0);
    /// assert_eq!(params.samples_per_mm, 4.0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the physical output size in mm.
    #[must_use]
    pub const fn with_size_mm(mut self, width: f32, height: f32) -> Self {
        self.width_mm = width;
        self.height_mm = height;
        self
    }

    /// Sets the sampling density in points per mm.
    #[must_use]
    pub const fn with_samples_per_mm(mut self, samples: f32) -> Self {
        self.samples_per_mm = samples;
        self
    }

    /// Sets the thickest and thinnest extrusion depths in mm.
    ///
    /// # Examples
    ///
    /// ```
    /// use relief_mesh::ReliefParams;
    ///
    /// let params = ReliefParams::new().with_thickness_mm(5.0, 0.5);
    /// assert_eq!(params.thickest_mm, 5.0);
    /// assert_eq!(params.thinnest_mm, 0.5);
    /// ```
    #[must_use]
    pub const fn with_thickness_mm(mut self, thickest: f32, thinnest: f32) -> Self {
        self.thickest_mm = thickest;
        self.thinnest_mm = thinnest;
        self
    }

    /// Sets the rim width in mm. Zero disables the rim.
    #[must_use]
    pub const fn with_border_mm(mut self, border: f32) -> Self {
        self.border_mm = border;
        self
    }

    /// Enables or disables the mirrored tone mapping.
    #[must_use]
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Enables or disables two-tone output. The threshold percentage
    /// only applies while two-tone is enabled; `None` means 50.
    ///
    /// # Examples
    ///
    /// ```
    /// use relief_mesh::ReliefParams;
    ///
    /// let params = ReliefParams::new().with_two_tone(true, Some(30));
    /// assert!(params.two_tone);
    /// assert_eq!(params.threshold_percent, Some(30));
    ///
    /// let params = params.with_two_tone(false, None);
    /// assert!(!params.two_tone);
    /// ```
    #[must_use]
    pub const fn with_two_tone(mut self, enabled: bool, threshold_percent: Option<u8>) -> Self {
        self.two_tone = enabled;
        self.threshold_percent = threshold_percent;
        self
    }

    /// The two-tone threshold as a sample value (0-255).
    #[must_use]
    pub fn threshold_value(&self) -> u8 {
        let percent = f32::from(self.threshold_percent.unwrap_or(50));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // In range by construction: percent is validated to 1-99
        {
            (percent * 255.0 / 100.0).round() as u8
        }
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::InvalidParams`] naming the first
    /// out-of-range value found.
    pub fn validate(&self) -> ReliefResult<()> {
        if self.width_mm <= 0.0 || self.height_mm <= 0.0 {
            return Err(ReliefError::invalid_params(format!(
                "output size must be positive, got {}x{} mm",
                self.width_mm, self.height_mm
            )));
        }
        if self.samples_per_mm <= 0.0 {
            return Err(ReliefError::invalid_params(format!(
                "samples per mm must be positive, got {}",
                self.samples_per_mm
            )));
        }
        if self.thickest_mm <= 0.0 {
            return Err(ReliefError::invalid_params(format!(
                "thickest depth must be positive, got {} mm",
                self.thickest_mm
            )));
        }
        if self.thickest_mm < self.thinnest_mm {
            return Err(ReliefError::invalid_params(format!(
                "thickest ({} mm) must not be below thinnest ({} mm)",
                self.thickest_mm, self.thinnest_mm
            )));
        }
        if self.thinnest_mm < 0.0 {
            return Err(ReliefError::invalid_params(format!(
                "thinnest depth must not be negative, got {} mm",
                self.thinnest_mm
            )));
        }
        if self.border_mm < 0.0 {
            return Err(ReliefError::invalid_params(format!(
                "border must not be negative, got {} mm",
                self.border_mm
            )));
        }
        if let Some(percent) = self.threshold_percent {
            if !(1..=99).contains(&percent) {
                return Err(ReliefError::invalid_params(format!(
                    "threshold must be 1-99 percent, got {percent}"
                )));
            }
        }
        Ok(())
    }
}
