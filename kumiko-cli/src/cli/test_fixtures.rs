//! Test fixture builders for CLI integration tests.
//!
//! These helpers create small, representative Parquet edge tables used across
//! CLI tests. Keeping them in one place avoids duplication and keeps the
//! individual test modules focused on behaviour.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;
use tempfile::TempDir;

/// Rows of the worked example used across the test suite.
///
/// Strengths: a=3, b=3 on the source side and x=3, y=1, z=2 on the target
/// side, for a total mass of 6.
pub(crate) fn example_rows() -> Vec<(&'static str, &'static str, i64)> {
    vec![("a", "x", 2), ("a", "y", 1), ("b", "x", 1), ("b", "z", 2)]
}

/// Creates a small Parquet edge table with columns `p1`, `p2` and `w`.
///
/// The file is written to `dir` using the provided `name` and contains a
/// single record batch with one row per entry of `rows`.
///
/// # Errors
/// Returns an error when the file cannot be created or the Parquet writer
/// fails to write the batch.
pub(crate) fn create_edge_parquet(
    dir: &TempDir,
    name: &str,
    rows: &[(&str, &str, i64)],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join(name);
    let schema = build_schema();
    let batch = build_record_batch(schema.clone(), rows)?;
    let file = File::create(&path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(path)
}

fn build_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("p1", DataType::Utf8, false),
        Field::new("p2", DataType::Utf8, false),
        Field::new("w", DataType::Int64, false),
    ]))
}

fn build_record_batch(
    schema: Arc<Schema>,
    rows: &[(&str, &str, i64)],
) -> Result<RecordBatch, Box<dyn std::error::Error>> {
    let sources: StringArray = rows.iter().map(|&(source, _, _)| Some(source)).collect();
    let targets: StringArray = rows.iter().map(|&(_, target, _)| Some(target)).collect();
    let weights = Int64Array::from(rows.iter().map(|&(_, _, weight)| weight).collect::<Vec<_>>());
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(sources) as ArrayRef,
            Arc::new(targets) as ArrayRef,
            Arc::new(weights) as ArrayRef,
        ],
    )?;
    Ok(batch)
}
