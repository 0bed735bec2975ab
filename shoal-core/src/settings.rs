//! Clustering configuration.
//!
//! All thresholds are validated eagerly when the settings are built, so a
//! contradictory configuration surfaces before any clustering work starts.

use std::num::NonZeroUsize;

use thiserror::Error;

/// Default eigensolver iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 540;
/// Default delta-norm convergence tolerance.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 1e-9;
/// Default seed for the eigensolver's initial vector.
pub const DEFAULT_RANDOM_SEED: u64 = 42_133_742;

/// An error produced while validating clustering settings.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SettingsError {
    /// A threshold fell outside its documented range.
    #[error("{name} must lie within [0, 1] (got {value})")]
    ThresholdOutOfRange {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Relocation and merge thresholds would fight each other.
    #[error(
        "min_parent_similarity {min_parent_similarity} must be below max_parent_similarity {max_parent_similarity}"
    )]
    ContradictoryThresholds {
        /// Configured relocation threshold.
        min_parent_similarity: f64,
        /// Configured merge threshold.
        max_parent_similarity: f64,
    },
    /// The minimum cluster size must be at least one.
    #[error("min_cluster_size must be at least 1 (got {got})")]
    InvalidMinClusterSize {
        /// The rejected value.
        got: usize,
    },
    /// The eigensolver iteration budget must be at least one.
    #[error("max_iterations must be at least 1 (got {got})")]
    InvalidIterationBudget {
        /// The rejected value.
        got: usize,
    },
    /// The convergence tolerance must be finite and positive.
    #[error("convergence_tolerance must be finite and positive (got {got})")]
    InvalidTolerance {
        /// The rejected value.
        got: f64,
    },
}

impl SettingsError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> SettingsErrorCode {
        match self {
            Self::ThresholdOutOfRange { .. } => SettingsErrorCode::ThresholdOutOfRange,
            Self::ContradictoryThresholds { .. } => SettingsErrorCode::ContradictoryThresholds,
            Self::InvalidMinClusterSize { .. } => SettingsErrorCode::InvalidMinClusterSize,
            Self::InvalidIterationBudget { .. } => SettingsErrorCode::InvalidIterationBudget,
            Self::InvalidTolerance { .. } => SettingsErrorCode::InvalidTolerance,
        }
    }
}

/// Machine-readable error codes for [`SettingsError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SettingsErrorCode {
    /// A threshold fell outside its documented range.
    ThresholdOutOfRange,
    /// Relocation and merge thresholds would fight each other.
    ContradictoryThresholds,
    /// The minimum cluster size must be at least one.
    InvalidMinClusterSize,
    /// The eigensolver iteration budget must be at least one.
    InvalidIterationBudget,
    /// The convergence tolerance must be finite and positive.
    InvalidTolerance,
}

impl SettingsErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThresholdOutOfRange => "SETTINGS_THRESHOLD_OUT_OF_RANGE",
            Self::ContradictoryThresholds => "SETTINGS_CONTRADICTORY_THRESHOLDS",
            Self::InvalidMinClusterSize => "SETTINGS_INVALID_MIN_CLUSTER_SIZE",
            Self::InvalidIterationBudget => "SETTINGS_INVALID_ITERATION_BUDGET",
            Self::InvalidTolerance => "SETTINGS_INVALID_TOLERANCE",
        }
    }
}

/// Immutable configuration consumed by every clustering phase.
///
/// # Examples
/// ```
/// use shoal_core::ClusteringSettings;
///
/// let settings = ClusteringSettings::builder()
///     .min_cluster_size(3)
///     .min_affiliation(0.1)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(settings.min_cluster_size().get(), 3);
/// assert!(settings.min_parent_similarity().is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClusteringSettings {
    min_affiliation: f64,
    min_cluster_size: NonZeroUsize,
    min_parent_similarity: Option<f64>,
    max_parent_similarity: Option<f64>,
    flatten: bool,
    max_iterations: usize,
    convergence_tolerance: f64,
    random_seed: u64,
    strict_convergence: bool,
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            min_affiliation: 0.0,
            min_cluster_size: NonZeroUsize::MIN,
            min_parent_similarity: None,
            max_parent_similarity: None,
            flatten: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
            random_seed: DEFAULT_RANDOM_SEED,
            strict_convergence: false,
        }
    }
}

impl ClusteringSettings {
    /// Creates a builder populated with the documented defaults.
    #[must_use]
    pub fn builder() -> ClusteringSettingsBuilder {
        ClusteringSettingsBuilder::default()
    }

    /// Members scoring below this affiliation are shifted toward ancestors.
    #[must_use]
    pub fn min_affiliation(&self) -> f64 {
        self.min_affiliation
    }

    /// Recursion stops rather than produce a side smaller than this.
    #[must_use]
    pub fn min_cluster_size(&self) -> NonZeroUsize {
        self.min_cluster_size
    }

    /// Relocation threshold; `None` disables the relocation pass.
    #[must_use]
    pub fn min_parent_similarity(&self) -> Option<f64> {
        self.min_parent_similarity
    }

    /// Merge threshold; `None` disables the merge pass.
    #[must_use]
    pub fn max_parent_similarity(&self) -> Option<f64> {
        self.max_parent_similarity
    }

    /// Whether degenerate single-child chains are collapsed at the end.
    #[must_use]
    pub fn flatten(&self) -> bool {
        self.flatten
    }

    /// Eigensolver iteration budget.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Eigensolver delta-norm convergence tolerance.
    #[must_use]
    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    /// Seed for the eigensolver's initial vector.
    #[must_use]
    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    /// Whether eigensolver non-convergence aborts the run instead of
    /// degrading the affected node to a leaf.
    #[must_use]
    pub fn strict_convergence(&self) -> bool {
        self.strict_convergence
    }
}

/// Configures and validates [`ClusteringSettings`].
///
/// Defaults: `min_affiliation` 0, `min_cluster_size` 1, relocation and
/// merging disabled, `flatten` off, eigensolver budget
/// [`DEFAULT_MAX_ITERATIONS`], tolerance [`DEFAULT_CONVERGENCE_TOLERANCE`],
/// seed [`DEFAULT_RANDOM_SEED`].
#[derive(Clone, Debug)]
pub struct ClusteringSettingsBuilder {
    min_affiliation: f64,
    min_cluster_size: usize,
    min_parent_similarity: Option<f64>,
    max_parent_similarity: Option<f64>,
    flatten: bool,
    max_iterations: usize,
    convergence_tolerance: f64,
    random_seed: u64,
    strict_convergence: bool,
}

impl Default for ClusteringSettingsBuilder {
    fn default() -> Self {
        Self {
            min_affiliation: 0.0,
            min_cluster_size: 1,
            min_parent_similarity: None,
            max_parent_similarity: None,
            flatten: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
            random_seed: DEFAULT_RANDOM_SEED,
            strict_convergence: false,
        }
    }
}

impl ClusteringSettingsBuilder {
    /// Overrides the minimum member affiliation.
    #[must_use]
    pub fn min_affiliation(mut self, value: f64) -> Self {
        self.min_affiliation = value;
        self
    }

    /// Overrides the minimum cluster size.
    #[must_use]
    pub fn min_cluster_size(mut self, value: usize) -> Self {
        self.min_cluster_size = value;
        self
    }

    /// Enables relocation with the given threshold.
    #[must_use]
    pub fn min_parent_similarity(mut self, value: f64) -> Self {
        self.min_parent_similarity = Some(value);
        self
    }

    /// Enables merging with the given threshold.
    #[must_use]
    pub fn max_parent_similarity(mut self, value: f64) -> Self {
        self.max_parent_similarity = Some(value);
        self
    }

    /// Enables or disables the flattening pass.
    #[must_use]
    pub fn flatten(mut self, value: bool) -> Self {
        self.flatten = value;
        self
    }

    /// Overrides the eigensolver iteration budget.
    #[must_use]
    pub fn max_iterations(mut self, value: usize) -> Self {
        self.max_iterations = value;
        self
    }

    /// Overrides the eigensolver convergence tolerance.
    #[must_use]
    pub fn convergence_tolerance(mut self, value: f64) -> Self {
        self.convergence_tolerance = value;
        self
    }

    /// Overrides the eigensolver seed.
    #[must_use]
    pub fn random_seed(mut self, value: u64) -> Self {
        self.random_seed = value;
        self
    }

    /// Makes eigensolver non-convergence fatal for the whole run.
    #[must_use]
    pub fn strict_convergence(mut self, value: bool) -> Self {
        self.strict_convergence = value;
        self
    }

    /// Validates the configuration and constructs settings.
    ///
    /// # Errors
    /// Returns a [`SettingsError`] when a threshold is out of range, the
    /// relocation threshold is not below the merge threshold, the minimum
    /// cluster size is zero, the iteration budget is zero or the tolerance
    /// is not finite and positive.
    pub fn build(self) -> Result<ClusteringSettings, SettingsError> {
        check_unit_range("min_affiliation", self.min_affiliation)?;
        if let Some(value) = self.min_parent_similarity {
            check_unit_range("min_parent_similarity", value)?;
        }
        if let Some(value) = self.max_parent_similarity {
            check_unit_range("max_parent_similarity", value)?;
        }
        if let (Some(lo), Some(hi)) = (self.min_parent_similarity, self.max_parent_similarity) {
            if lo >= hi {
                return Err(SettingsError::ContradictoryThresholds {
                    min_parent_similarity: lo,
                    max_parent_similarity: hi,
                });
            }
        }
        let min_cluster_size = NonZeroUsize::new(self.min_cluster_size).ok_or(
            SettingsError::InvalidMinClusterSize {
                got: self.min_cluster_size,
            },
        )?;
        if self.max_iterations == 0 {
            return Err(SettingsError::InvalidIterationBudget {
                got: self.max_iterations,
            });
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(SettingsError::InvalidTolerance {
                got: self.convergence_tolerance,
            });
        }

        Ok(ClusteringSettings {
            min_affiliation: self.min_affiliation,
            min_cluster_size,
            min_parent_similarity: self.min_parent_similarity,
            max_parent_similarity: self.max_parent_similarity,
            flatten: self.flatten,
            max_iterations: self.max_iterations,
            convergence_tolerance: self.convergence_tolerance,
            random_seed: self.random_seed,
            strict_convergence: self.strict_convergence,
        })
    }
}

fn check_unit_range(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SettingsError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}
