//! Parquet persistence for simulated edge tables.

use std::{fs::File, path::Path, sync::Arc};

use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use kumiko_core::Edge;
use parquet::arrow::arrow_writer::ArrowWriter;

use crate::columns::EdgeColumns;
use crate::errors::EdgeTableError;

/// Writes `edges` to `path` as a three-column Parquet edge table.
///
/// The schema reuses the configured column names so simulated tables mirror
/// the input's shape exactly. Weights are written as `Int64` for parity with
/// the dataframe tooling that typically consumes these tables.
///
/// # Errors
/// Returns [`EdgeTableError::WeightTooLarge`] when a weight exceeds the
/// `Int64` range, and the `Io`/`Arrow`/`Parquet` variants when persisting
/// fails.
pub fn write_edge_table(
    path: impl AsRef<Path>,
    edges: &[Edge],
    columns: &EdgeColumns,
) -> Result<(), EdgeTableError> {
    let schema = edge_table_schema(columns);
    let batch = edge_table_batch(schema.clone(), edges)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn edge_table_schema(columns: &EdgeColumns) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(columns.source(), DataType::Utf8, false),
        Field::new(columns.target(), DataType::Utf8, false),
        Field::new(columns.weight(), DataType::Int64, false),
    ]))
}

fn edge_table_batch(
    schema: Arc<Schema>,
    edges: &[Edge],
) -> Result<RecordBatch, EdgeTableError> {
    let sources: StringArray = edges.iter().map(|edge| Some(edge.source.as_ref())).collect();
    let targets: StringArray = edges.iter().map(|edge| Some(edge.target.as_ref())).collect();
    let mut weights = Vec::with_capacity(edges.len());
    for (row, edge) in edges.iter().enumerate() {
        let weight =
            i64::try_from(edge.weight).map_err(|_| EdgeTableError::WeightTooLarge { row })?;
        weights.push(weight);
    }
    let weights = Int64Array::from(weights);
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
