//! Arrow batch hand-off
//!
//! The external decoder (e.g. `arrow-csv`) delivers `RecordBatch`es. This
//! module maps them onto [`Record`]s by column name. Cells that cannot be
//! read as numbers become `None` rather than failing the load.

use arrow::array::{
    Array, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array,
    LargeStringArray, RecordBatch, StringArray, UInt16Array, UInt32Array, UInt64Array,
    UInt8Array,
};
use arrow::datatypes::DataType;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::{Field, FieldKind, Record};

/// Decode all batches into records, preserving row order across batches
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if a batch has no `Name` column and
/// [`Error::SchemaMismatch`] if a known column has an unusable type.
pub fn records_from_batches(batches: &[RecordBatch]) -> Result<Vec<Record>> {
    let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut records = Vec::with_capacity(total);
    let mut unparseable = 0usize;

    for batch in batches {
        let columns = BatchColumns::resolve(batch)?;
        for row in 0..batch.num_rows() {
            records.push(columns.record_at(row, &mut unparseable));
        }
    }

    if unparseable > 0 {
        warn!(
            cells = unparseable,
            "unparseable numeric cells treated as missing"
        );
    }
    debug!(
        rows = records.len(),
        batches = batches.len(),
        "decoded records from arrow batches"
    );
    Ok(records)
}

/// A single numeric cell after coercion
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumericCell {
    Value(f64),
    Missing,
    Unparseable,
}

impl NumericCell {
    fn into_option(self, unparseable: &mut usize) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing => None,
            Self::Unparseable => {
                *unparseable += 1;
                None
            }
        }
    }
}

const FIELD_COUNT: usize = Field::ALL.len();

/// Columns of one batch, indexed by [`Field`] declaration order
struct BatchColumns<'a> {
    columns: [Option<&'a dyn Array>; FIELD_COUNT],
}

impl<'a> BatchColumns<'a> {
    fn resolve(batch: &'a RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut columns: [Option<&'a dyn Array>; FIELD_COUNT] = [None; FIELD_COUNT];

        for field in Field::ALL {
            let Some((idx, _)) = schema.column_with_name(field.column_name()) else {
                continue;
            };
            let array = batch.column(idx).as_ref();
            check_type(field, array.data_type())?;
            columns[field as usize] = Some(array);
        }

        if columns[Field::Name as usize].is_none() {
            return Err(Error::column_not_found(Field::Name.column_name()));
        }
        Ok(Self { columns })
    }

    fn column(&self, field: Field) -> Option<&'a dyn Array> {
        self.columns[field as usize]
    }

    fn text(&self, field: Field, row: usize) -> String {
        self.column(field)
            .and_then(|a| text_at(a, row))
            .unwrap_or_default()
    }

    fn number(&self, field: Field, row: usize, unparseable: &mut usize) -> Option<f64> {
        self.column(field)
            .map_or(NumericCell::Missing, |a| number_at(a, row))
            .into_option(unparseable)
    }

    fn record_at(&self, row: usize, unparseable: &mut usize) -> Record {
        Record {
            rank: self
                .number(Field::Rank, row, unparseable)
                .and_then(whole_u32),
            name: self.text(Field::Name, row),
            platform: self.text(Field::Platform, row),
            year: self
                .number(Field::Year, row, unparseable)
                .and_then(whole_i32),
            genre: self.text(Field::Genre, row),
            publisher: self.text(Field::Publisher, row),
            na_sales: self.number(Field::NaSales, row, unparseable),
            eu_sales: self.number(Field::EuSales, row, unparseable),
            jp_sales: self.number(Field::JpSales, row, unparseable),
            other_sales: self.number(Field::OtherSales, row, unparseable),
            global_sales: self.number(Field::GlobalSales, row, unparseable),
        }
    }
}

fn is_numeric_type(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn check_type(field: Field, dt: &DataType) -> Result<()> {
    let usable = matches!(dt, DataType::Utf8 | DataType::LargeUtf8 | DataType::Null)
        || is_numeric_type(dt);
    if usable {
        return Ok(());
    }
    let expected = match field.kind() {
        FieldKind::Numeric => "a numeric or string column",
        FieldKind::Text => "a string column",
    };
    Err(Error::schema_mismatch(format!(
        "{} is {dt}, expected {expected}",
        field.column_name()
    )))
}

macro_rules! primitive_at {
    ($array:expr, $row:expr, $ty:ty) => {
        $array
            .as_any()
            .downcast_ref::<$ty>()
            .map(|a| a.value($row) as f64)
    };
}

fn str_at(array: &dyn Array, row: usize) -> Option<&str> {
    match array.data_type() {
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row)),
        DataType::LargeUtf8 => array
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
fn number_at(array: &dyn Array, row: usize) -> NumericCell {
    if row >= array.len() || array.is_null(row) {
        return NumericCell::Missing;
    }

    let value = match array.data_type() {
        DataType::Int8 => primitive_at!(array, row, Int8Array),
        DataType::Int16 => primitive_at!(array, row, Int16Array),
        DataType::Int32 => primitive_at!(array, row, Int32Array),
        DataType::Int64 => primitive_at!(array, row, Int64Array),
        DataType::UInt8 => primitive_at!(array, row, UInt8Array),
        DataType::UInt16 => primitive_at!(array, row, UInt16Array),
        DataType::UInt32 => primitive_at!(array, row, UInt32Array),
        DataType::UInt64 => primitive_at!(array, row, UInt64Array),
        DataType::Float32 => primitive_at!(array, row, Float32Array),
        DataType::Float64 => primitive_at!(array, row, Float64Array),
        DataType::Utf8 | DataType::LargeUtf8 => {
            let Some(text) = str_at(array, row).map(str::trim) else {
                return NumericCell::Missing;
            };
            if text.is_empty() {
                return NumericCell::Missing;
            }
            match text.parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => return NumericCell::Unparseable,
            }
        }
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() => NumericCell::Value(v),
        Some(_) => NumericCell::Unparseable,
        None => NumericCell::Missing,
    }
}

fn text_at(array: &dyn Array, row: usize) -> Option<String> {
    if row >= array.len() || array.is_null(row) {
        return None;
    }
    if let Some(s) = str_at(array, row) {
        return Some(s.to_string());
    }
    match number_at(array, row) {
        NumericCell::Value(v) => Some(v.to_string()),
        NumericCell::Missing | NumericCell::Unparseable => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u32(v: f64) -> Option<u32> {
    (v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v)).then_some(v as u32)
}

#[allow(clippy::cast_possible_truncation)]
fn whole_i32(v: f64) -> Option<i32> {
    (v.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&v))
        .then_some(v as i32)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::BooleanArray;
    use arrow::datatypes::Schema;

    use super::*;

    fn batch(fields: Vec<(&str, DataType)>, columns: Vec<Arc<dyn Array>>) -> RecordBatch {
        let schema = Arc::new(Schema::new(
            fields
                .into_iter()
                .map(|(n, t)| arrow::datatypes::Field::new(n, t, true))
                .collect::<Vec<_>>(),
        ));
        RecordBatch::try_new(schema, columns).unwrap()
    }

    #[test]
    fn f_adapter_reads_typed_columns() {
        let b = batch(
            vec![
                ("Rank", DataType::Int64),
                ("Name", DataType::Utf8),
                ("Year", DataType::Float64),
                ("Global_Sales", DataType::Float64),
            ],
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["Wii Sports", "Super Mario Bros."])),
                Arc::new(Float64Array::from(vec![2006.0, 1985.0])),
                Arc::new(Float64Array::from(vec![82.74, 40.24])),
            ],
        );
        let records = records_from_batches(&[b]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rank, Some(1));
        assert_eq!(records[1].name, "Super Mario Bros.");
        assert_eq!(records[1].year, Some(1985));
        assert_eq!(records[0].global_sales, Some(82.74));
        assert!(records[0].platform.is_empty());
        assert_eq!(records[0].na_sales, None);
    }

    #[test]
    fn f_adapter_unparseable_text_becomes_missing() {
        let b = batch(
            vec![("Name", DataType::Utf8), ("Year", DataType::Utf8)],
            vec![
                Arc::new(StringArray::from(vec!["a", "b", "c"])),
                Arc::new(StringArray::from(vec![Some("2001"), Some("N/A"), None])),
            ],
        );
        let records = records_from_batches(&[b]).unwrap();
        assert_eq!(records[0].year, Some(2001));
        assert_eq!(records[1].year, None);
        assert_eq!(records[2].year, None);
    }

    #[test]
    fn f_adapter_fractional_year_is_missing() {
        let b = batch(
            vec![("Name", DataType::Utf8), ("Year", DataType::Float64)],
            vec![
                Arc::new(StringArray::from(vec!["a"])),
                Arc::new(Float64Array::from(vec![2001.5])),
            ],
        );
        let records = records_from_batches(&[b]).unwrap();
        assert_eq!(records[0].year, None);
    }

    #[test]
    fn f_adapter_null_numeric_is_missing() {
        let b = batch(
            vec![("Name", DataType::Utf8), ("EU_Sales", DataType::Float32)],
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Float32Array::from(vec![Some(0.5), None])),
            ],
        );
        let records = records_from_batches(&[b]).unwrap();
        assert_eq!(records[0].eu_sales, Some(0.5));
        assert_eq!(records[1].eu_sales, None);
    }

    #[test]
    fn f_adapter_numeric_text_column_is_formatted() {
        let b = batch(
            vec![("Name", DataType::Int32)],
            vec![Arc::new(Int32Array::from(vec![1942]))],
        );
        let records = records_from_batches(&[b]).unwrap();
        assert_eq!(records[0].name, "1942");
    }

    #[test]
    fn f_adapter_missing_name_column() {
        let b = batch(
            vec![("Year", DataType::Int32)],
            vec![Arc::new(Int32Array::from(vec![2000]))],
        );
        let err = records_from_batches(&[b]).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { name } if name == "Name"));
    }

    #[test]
    fn f_adapter_unusable_type() {
        let b = batch(
            vec![("Name", DataType::Utf8), ("Global_Sales", DataType::Boolean)],
            vec![
                Arc::new(StringArray::from(vec!["a"])),
                Arc::new(BooleanArray::from(vec![true])),
            ],
        );
        let err = records_from_batches(&[b]).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn f_adapter_preserves_order_across_batches() {
        let make = |names: Vec<&str>| {
            batch(
                vec![("Name", DataType::Utf8)],
                vec![Arc::new(StringArray::from(names))],
            )
        };
        let records = records_from_batches(&[make(vec!["a", "b"]), make(vec!["c"])]).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn f_adapter_no_batches() {
        assert!(records_from_batches(&[]).unwrap().is_empty());
    }

    #[test]
    fn f_whole_number_conversions() {
        assert_eq!(whole_u32(3.0), Some(3));
        assert_eq!(whole_u32(-1.0), None);
        assert_eq!(whole_i32(1980.0), Some(1980));
        assert_eq!(whole_i32(1980.25), None);
    }
}
