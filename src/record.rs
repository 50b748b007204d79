//! Catalog record model
//!
//! One [`Record`] per dataset row. Records are immutable once loaded and
//! are addressed by [`RecordId`], never by field values: names and ranks
//! are not guaranteed unique.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stable handle for a record, assigned at load time (ingestion row index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(usize);

impl RecordId {
    /// Create a handle from an ingestion row index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Ingestion row index
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One catalog item: categorical attributes plus regional and total sales
///
/// Numeric fields are `None` when the decoder could not parse them.
/// `global_sales` is taken verbatim from the source, it is not recomputed
/// from the regional columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Source rank (not guaranteed unique)
    #[serde(rename = "Rank", default)]
    pub rank: Option<u32>,
    /// Display name (not guaranteed unique)
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Platform
    #[serde(rename = "Platform", default)]
    pub platform: String,
    /// Release year, the grouping key for rankings
    #[serde(rename = "Year", default)]
    pub year: Option<i32>,
    /// Genre
    #[serde(rename = "Genre", default)]
    pub genre: String,
    /// Publisher
    #[serde(rename = "Publisher", default)]
    pub publisher: String,
    /// North American sales (millions)
    #[serde(rename = "NA_Sales", default)]
    pub na_sales: Option<f64>,
    /// European sales (millions)
    #[serde(rename = "EU_Sales", default)]
    pub eu_sales: Option<f64>,
    /// Japanese sales (millions)
    #[serde(rename = "JP_Sales", default)]
    pub jp_sales: Option<f64>,
    /// Rest-of-world sales (millions)
    #[serde(rename = "Other_Sales", default)]
    pub other_sales: Option<f64>,
    /// Worldwide total (millions)
    #[serde(rename = "Global_Sales", default)]
    pub global_sales: Option<f64>,
}

impl Record {
    /// Create a record with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the year
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set a metric value
    #[must_use]
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        *self.metric_slot(metric) = Some(value);
        self
    }

    fn metric_slot(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::NaSales => &mut self.na_sales,
            Metric::EuSales => &mut self.eu_sales,
            Metric::JpSales => &mut self.jp_sales,
            Metric::OtherSales => &mut self.other_sales,
            Metric::GlobalSales => &mut self.global_sales,
        }
    }

    /// Value of a numeric metric
    #[inline]
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::NaSales => self.na_sales,
            Metric::EuSales => self.eu_sales,
            Metric::JpSales => self.jp_sales,
            Metric::OtherSales => self.other_sales,
            Metric::GlobalSales => self.global_sales,
        }
    }

    /// Borrow the value of any field for comparison or display
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Rank => FieldValue::Number(self.rank.map(f64::from)),
            Field::Name => FieldValue::Text(&self.name),
            Field::Platform => FieldValue::Text(&self.platform),
            Field::Year => FieldValue::Number(self.year.map(f64::from)),
            Field::Genre => FieldValue::Text(&self.genre),
            Field::Publisher => FieldValue::Text(&self.publisher),
            Field::NaSales => FieldValue::Number(self.na_sales),
            Field::EuSales => FieldValue::Number(self.eu_sales),
            Field::JpSales => FieldValue::Number(self.jp_sales),
            Field::OtherSales => FieldValue::Number(self.other_sales),
            Field::GlobalSales => FieldValue::Number(self.global_sales),
        }
    }

    /// Sum of the regional metrics that are present
    pub fn regional_sum(&self) -> f64 {
        Metric::REGIONAL
            .iter()
            .filter_map(|m| self.metric(*m))
            .sum()
    }
}

/// A borrowed field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Numeric value, `None` when missing
    Number(Option<f64>),
    /// Text value
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Check if the value is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Number(None))
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(Some(v)) => write!(f, "{v}"),
            Self::Number(None) => Ok(()),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Kind of comparison a field uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Numeric comparison, missing values last
    Numeric,
    /// Locale-style text comparison
    Text,
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Source rank
    Rank,
    /// Name
    Name,
    /// Platform
    Platform,
    /// Release year
    Year,
    /// Genre
    Genre,
    /// Publisher
    Publisher,
    /// North American sales
    #[serde(rename = "NA_Sales")]
    NaSales,
    /// European sales
    #[serde(rename = "EU_Sales")]
    EuSales,
    /// Japanese sales
    #[serde(rename = "JP_Sales")]
    JpSales,
    /// Rest-of-world sales
    #[serde(rename = "Other_Sales")]
    OtherSales,
    /// Worldwide total
    #[serde(rename = "Global_Sales")]
    GlobalSales,
}

impl Field {
    /// All columns in table order
    pub const ALL: [Self; 11] = [
        Self::Rank,
        Self::Name,
        Self::Platform,
        Self::Year,
        Self::Genre,
        Self::Publisher,
        Self::NaSales,
        Self::EuSales,
        Self::JpSales,
        Self::OtherSales,
        Self::GlobalSales,
    ];

    /// Column name in the decoded dataset
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Rank => "Rank",
            Self::Name => "Name",
            Self::Platform => "Platform",
            Self::Year => "Year",
            Self::Genre => "Genre",
            Self::Publisher => "Publisher",
            Self::NaSales => "NA_Sales",
            Self::EuSales => "EU_Sales",
            Self::JpSales => "JP_Sales",
            Self::OtherSales => "Other_Sales",
            Self::GlobalSales => "Global_Sales",
        }
    }

    /// Table header label
    pub const fn header(self) -> &'static str {
        match self {
            Self::Rank => "Rank",
            Self::Name => "Name",
            Self::Platform => "Platform",
            Self::Year => "Year",
            Self::Genre => "Genre",
            Self::Publisher => "Publisher",
            Self::NaSales => "NA Sales (million units)",
            Self::EuSales => "EU Sales (million units)",
            Self::JpSales => "JP Sales (million units)",
            Self::OtherSales => "Other Sales (million units)",
            Self::GlobalSales => "Total Global Sales (million units)",
        }
    }

    /// Comparison kind
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::Platform | Self::Genre | Self::Publisher => FieldKind::Text,
            _ => FieldKind::Numeric,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.column_name().eq_ignore_ascii_case(s) || f.header() == s)
            .ok_or_else(|| Error::unknown_field(s))
    }
}

/// Numeric fields usable for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metric {
    /// North American sales
    #[serde(rename = "NA_Sales")]
    NaSales,
    /// European sales
    #[serde(rename = "EU_Sales")]
    EuSales,
    /// Japanese sales
    #[serde(rename = "JP_Sales")]
    JpSales,
    /// Rest-of-world sales
    #[serde(rename = "Other_Sales")]
    OtherSales,
    /// Worldwide total
    #[default]
    #[serde(rename = "Global_Sales")]
    GlobalSales,
}

impl Metric {
    /// All metrics
    pub const ALL: [Self; 5] = [
        Self::NaSales,
        Self::EuSales,
        Self::JpSales,
        Self::OtherSales,
        Self::GlobalSales,
    ];

    /// Regional metrics, in breakdown order
    pub const REGIONAL: [Self; 4] = [Self::NaSales, Self::EuSales, Self::JpSales, Self::OtherSales];

    /// The table column holding this metric
    pub const fn field(self) -> Field {
        match self {
            Self::NaSales => Field::NaSales,
            Self::EuSales => Field::EuSales,
            Self::JpSales => Field::JpSales,
            Self::OtherSales => Field::OtherSales,
            Self::GlobalSales => Field::GlobalSales,
        }
    }

    /// Dataset label for charts
    pub const fn chart_label(self) -> &'static str {
        match self {
            Self::NaSales => "NA Sales (millions)",
            Self::EuSales => "EU Sales (millions)",
            Self::JpSales => "JP Sales (millions)",
            Self::OtherSales => "Other Sales (millions)",
            Self::GlobalSales => "Global Sales (millions)",
        }
    }

    /// Short name used in chart headings
    pub const fn title(self) -> &'static str {
        match self {
            Self::NaSales => "NA Sales",
            Self::EuSales => "EU Sales",
            Self::JpSales => "JP Sales",
            Self::OtherSales => "Other Sales",
            Self::GlobalSales => "Global Sales",
        }
    }
}

impl TryFrom<Field> for Metric {
    type Error = Error;

    fn try_from(field: Field) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.field() == field)
            .ok_or_else(|| Error::unknown_field(format!("{field} is not a metric")))
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<Field>().and_then(Self::try_from)
    }
}
