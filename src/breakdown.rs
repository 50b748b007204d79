//! Regional breakdown of a single record
//!
//! A fixed-order projection of the four regional metrics, fed to the pie
//! chart next to the detail panel.

use std::fmt;

use serde::Serialize;

use crate::config::ChartPalette;
use crate::record::{Metric, Record, RecordId};

/// Sales regions, in breakdown order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    /// North America
    NorthAmerica,
    /// Europe
    Europe,
    /// Japan
    Japan,
    /// Rest of world
    Other,
}

impl Region {
    /// All regions in breakdown order
    pub const ALL: [Self; 4] = [Self::NorthAmerica, Self::Europe, Self::Japan, Self::Other];

    /// Slice label
    pub const fn label(self) -> &'static str {
        match self {
            Self::NorthAmerica => "NA Sales",
            Self::Europe => "EU Sales",
            Self::Japan => "JP Sales",
            Self::Other => "Other Sales",
        }
    }

    /// Metric backing this region
    pub const fn metric(self) -> Metric {
        match self {
            Self::NorthAmerica => Metric::NaSales,
            Self::Europe => Metric::EuSales,
            Self::Japan => Metric::JpSales,
            Self::Other => Metric::OtherSales,
        }
    }

    const fn position(self) -> usize {
        match self {
            Self::NorthAmerica => 0,
            Self::Europe => 1,
            Self::Japan => 2,
            Self::Other => 3,
        }
    }

    /// Slice color from a palette
    pub fn color(self, palette: &ChartPalette) -> &str {
        &palette.regions[self.position()]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One pie slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakdownSlice {
    /// Region
    pub region: Region,
    /// Sales in millions, `None` when missing
    pub value: Option<f64>,
}

impl BreakdownSlice {
    /// Slice label
    pub fn label(&self) -> &'static str {
        self.region.label()
    }

    /// Tooltip text, e.g. `"NA Sales: 41.49 million"`
    pub fn tooltip(&self) -> String {
        match self.value {
            Some(v) => format!("{}: {v} million", self.label()),
            None => format!("{}: n/a", self.label()),
        }
    }
}

/// Regional breakdown of one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    id: RecordId,
    slices: [BreakdownSlice; 4],
}

impl Breakdown {
    /// Record this breakdown describes
    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Slices in region order
    #[inline]
    pub fn slices(&self) -> &[BreakdownSlice] {
        &self.slices
    }

    /// Slice labels in region order
    pub fn labels(&self) -> Vec<&'static str> {
        self.slices.iter().map(BreakdownSlice::label).collect()
    }

    /// Slice values in region order (missing as `None`)
    pub fn values(&self) -> Vec<Option<f64>> {
        self.slices.iter().map(|s| s.value).collect()
    }

    /// Slice colors in region order
    pub fn colors<'p>(&self, palette: &'p ChartPalette) -> Vec<&'p str> {
        self.slices.iter().map(|s| s.region.color(palette)).collect()
    }

    /// Sum of present regional values
    pub fn total(&self) -> f64 {
        self.slices.iter().filter_map(|s| s.value).sum()
    }

    /// Fraction of the regional total held by a region
    ///
    /// `None` when the region's value is missing or the total is zero.
    pub fn share(&self, region: Region) -> Option<f64> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        self.slices[region.position()].value.map(|v| v / total)
    }
}

/// Project a record onto its regional slices
pub fn breakdown(id: RecordId, record: &Record) -> Breakdown {
    Breakdown {
        id,
        slices: Region::ALL.map(|region| BreakdownSlice {
            region,
            value: record.metric(region.metric()),
        }),
    }
}
