//! Configuration options for profiling and pipeline runs.

use serde::{Deserialize, Serialize};

/// Options for the profiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Cardinality ceiling above which a categorical column gets a warning.
    pub max_categories: usize,
    /// Length of ranked lists (top missing, top skewed, top correlated).
    pub top_k: usize,
    /// Correlation is computed over at most this many numeric columns.
    pub max_corr_numeric_cols: usize,
    /// Row ceiling above which correlation uses stride sampling.
    pub corr_sample_rows: usize,
    /// Minimum non-missing values before skewness is computed.
    pub skew_min_rows: usize,
    /// Minimum non-missing values before outlier fractions are computed.
    pub outlier_min_rows: usize,
    /// Sample size for string-quality and candidate detection.
    pub sample_size: usize,
    /// Parse-success ratio for datetime candidate detection.
    pub datetime_success_ratio: f64,
    /// Letter-character ratio ceiling for datetime candidate detection.
    pub max_letters_ratio: f64,
    /// IQR multiplier for outlier fractions.
    pub iqr_k: f64,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            max_categories: 30,
            top_k: 10,
            max_corr_numeric_cols: 30,
            corr_sample_rows: 50_000,
            skew_min_rows: 20,
            outlier_min_rows: 20,
            sample_size: 200,
            datetime_success_ratio: 0.8,
            max_letters_ratio: 0.3,
            iqr_k: 1.5,
        }
    }
}

impl ProfileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_max_categories(mut self, ceiling: usize) -> Self {
        self.max_categories = ceiling;
        self
    }
}

/// Options controlling one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Ask the LLM advisor for the plan, falling back to the rule engine.
    pub use_llm: bool,
    /// Model name forwarded to the advisor client.
    pub llm_model: Option<String>,
    /// Caller override for imputation. `Some(false)` forces the step off;
    /// an override never re-enables a step the plan disabled.
    pub impute: Option<bool>,
    /// Profiler options shared by the pre and post profile passes.
    pub profile: ProfileOptions,
}

impl RunOptions {
    pub fn new() -> Self {
        Self {
            profile: ProfileOptions::default(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_llm(mut self, use_llm: bool) -> Self {
        self.use_llm = use_llm;
        self
    }

    #[must_use]
    pub fn without_impute(mut self) -> Self {
        self.impute = Some(false);
        self
    }
}
