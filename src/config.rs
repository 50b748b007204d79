//! View configuration
//!
//! Tunables for a browsing session: page size, ranking defaults and
//! bounds, cell width, and chart colors. Loadable from JSON; every field
//! is optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Metric;

/// Chart colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPalette {
    /// Bar color for the focused record
    pub highlight: String,
    /// Bar color for every other record
    pub base: String,
    /// Slice colors for the regional breakdown, in region order
    pub regions: [String; 4],
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            highlight: "#36A2EB".to_string(),
            base: "#8884d8".to_string(),
            regions: [
                "#36A2EB".to_string(),
                "#FF6384".to_string(),
                "#FFCE56".to_string(),
                "#4BC0C0".to_string(),
            ],
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Table rows per page
    pub page_size: usize,
    /// Initial top-N size for the ranking chart
    pub rank_size: usize,
    /// Upper bound accepted for the top-N size
    pub max_rank_size: usize,
    /// Initial ranking metric
    pub rank_metric: Metric,
    /// Maximum display width of a table cell
    pub cell_width: usize,
    /// Chart colors
    pub palette: ChartPalette,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 15,
            rank_size: 10,
            max_rank_size: 100,
            rank_metric: Metric::GlobalSales,
            cell_width: 32,
            palette: ChartPalette::default(),
        }
    }
}

impl ViewConfig {
    /// Parse and validate a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and
    /// [`Error::InvalidConfig`] for values that fail [`ViewConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set rows per page
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the initial top-N size
    #[must_use]
    pub fn with_rank_size(mut self, rank_size: usize) -> Self {
        self.rank_size = rank_size;
        self
    }

    /// Set the top-N upper bound
    #[must_use]
    pub fn with_max_rank_size(mut self, max: usize) -> Self {
        self.max_rank_size = max;
        self
    }

    /// Set the initial ranking metric
    #[must_use]
    pub fn with_rank_metric(mut self, metric: Metric) -> Self {
        self.rank_metric = metric;
        self
    }

    /// Set the maximum cell width
    #[must_use]
    pub fn with_cell_width(mut self, width: usize) -> Self {
        self.cell_width = width;
        self
    }

    /// Set chart colors
    #[must_use]
    pub fn with_palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Check that all sizes are usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a zero page size, zero cell
    /// width, or zero maximum rank size, and [`Error::InvalidRankSize`] when
    /// the initial rank size lies outside `1..=max_rank_size`.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_config("page_size must be positive"));
        }
        if self.cell_width == 0 {
            return Err(Error::invalid_config("cell_width must be positive"));
        }
        if self.max_rank_size == 0 {
            return Err(Error::invalid_config("max_rank_size must be positive"));
        }
        if self.rank_size == 0 || self.rank_size > self.max_rank_size {
            return Err(Error::InvalidRankSize {
                requested: self.rank_size,
                max: self.max_rank_size,
            });
        }
        Ok(())
    }
}
