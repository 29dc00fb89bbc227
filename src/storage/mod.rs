//! Columnar storage of the combined table (Arrow/Parquet)
//!
//! The CSV tables are the primary contract with the chart renderer; the
//! Parquet copy keeps `individual_times` as a real list column instead of a
//! space-separated string.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Array, Float64Builder, ListBuilder, RecordBatch, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::ArrowWriter;

use crate::record::BenchmarkRecord;
use crate::{Error, Result};

/// Arrow schema of the combined table.
#[must_use]
pub fn combined_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("language", DataType::Utf8, false),
        Field::new("matrix_size", DataType::UInt32, false),
        Field::new("iterations", DataType::UInt32, false),
        Field::new(
            "individual_times",
            DataType::List(Arc::new(Field::new("item", DataType::Float64, true))),
            false,
        ),
        Field::new("average_time", DataType::Float64, false),
        Field::new("min_time", DataType::Float64, false),
        Field::new("max_time", DataType::Float64, false),
        Field::new("std_dev", DataType::Float64, false),
        Field::new("fastest_time", DataType::Float64, true),
        Field::new("relative_performance", DataType::Float64, true),
    ]))
}

/// Convert records into one batch with [`combined_schema`].
///
/// # Errors
///
/// Returns [`Error::Arrow`] if the columns do not line up with the schema.
pub fn records_to_batch<'a>(
    records: impl IntoIterator<Item = &'a BenchmarkRecord>,
) -> Result<RecordBatch> {
    let records: Vec<&BenchmarkRecord> = records.into_iter().collect();

    let mut times = ListBuilder::new(Float64Builder::new());
    for record in &records {
        times.values().append_slice(record.individual_times());
        times.append(true);
    }

    let f64_column = |f: fn(&BenchmarkRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(|r| f(r)).collect::<Vec<f64>>()))
    };
    let opt_column = |f: fn(&BenchmarkRecord) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(
            records.iter().map(|r| f(r)).collect::<Vec<Option<f64>>>(),
        ))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            records.iter().map(|r| r.language()).collect::<Vec<&str>>(),
        )),
        Arc::new(UInt32Array::from(
            records.iter().map(|r| r.matrix_size()).collect::<Vec<u32>>(),
        )),
        Arc::new(UInt32Array::from(
            records.iter().map(|r| r.iterations()).collect::<Vec<u32>>(),
        )),
        Arc::new(times.finish()),
        f64_column(BenchmarkRecord::average_time),
        f64_column(BenchmarkRecord::min_time),
        f64_column(BenchmarkRecord::max_time),
        f64_column(BenchmarkRecord::std_dev),
        opt_column(BenchmarkRecord::fastest_time),
        opt_column(BenchmarkRecord::relative_performance),
    ];

    Ok(RecordBatch::try_new(combined_schema(), columns)?)
}

/// Storage engine for Arrow record batches
#[derive(Debug, Default)]
pub struct StorageEngine {
    batches: Vec<RecordBatch>,
}

impl StorageEngine {
    /// Create a new storage engine from existing batches
    #[must_use]
    pub const fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Build storage holding the combined table of `records`.
    ///
    /// # Errors
    ///
    /// Returns error if the batch cannot be assembled
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a BenchmarkRecord>,
    ) -> Result<Self> {
        Ok(Self::new(vec![records_to_batch(records)?]))
    }

    /// Load table from Parquet file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref())
            .map_err(|e| Error::Storage(format!("Failed to open Parquet file: {e}")))?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::Storage(format!("Failed to parse Parquet file: {e}")))?
            .build()
            .map_err(|e| Error::Storage(format!("Failed to create Parquet reader: {e}")))?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch =
                batch.map_err(|e| Error::Storage(format!("Failed to read record batch: {e}")))?;
            batches.push(batch);
        }

        Ok(Self { batches })
    }

    /// Total rows across batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Write all batches as one Parquet file.
    ///
    /// # Errors
    ///
    /// Returns error if storage is empty or the writer fails
    pub fn write_parquet<W: Write + Send>(&self, writer: W) -> Result<()> {
        let schema = self
            .batches
            .first()
            .map(RecordBatch::schema)
            .ok_or_else(|| Error::Storage("No batches to write".to_string()))?;

        let mut writer = ArrowWriter::try_new(writer, schema, None)?;
        for batch in &self.batches {
            writer.write(batch)?;
        }
        writer.close()?;
        Ok(())
    }
}
