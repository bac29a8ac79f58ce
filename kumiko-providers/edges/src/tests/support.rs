use std::sync::Arc;

use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;

use super::EdgeColumns;

pub(crate) fn edge_columns() -> EdgeColumns {
    EdgeColumns::new("p1", "p2", "w")
}

pub(crate) fn write_parquet(schema: Arc<Schema>, arrays: Vec<ArrayRef>) -> Bytes {
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("batch");
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");
    }
    Bytes::from(buffer)
}

pub(crate) fn utf8_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("p1", DataType::Utf8, false),
        Field::new("p2", DataType::Utf8, false),
        Field::new("w", DataType::Int64, false),
    ]))
}

/// Builds a standard three-column Parquet edge table in memory.
pub(crate) fn utf8_edge_table(rows: &[(&str, &str, i64)]) -> Bytes {
    let sources: StringArray = rows.iter().map(|&(source, _, _)| Some(source)).collect();
    let targets: StringArray = rows.iter().map(|&(_, target, _)| Some(target)).collect();
    let weights = Int64Array::from(rows.iter().map(|&(_, _, weight)| weight).collect::<Vec<_>>());
    write_parquet(
        utf8_schema(),
        vec![
            Arc::new(sources) as ArrayRef,
            Arc::new(targets) as ArrayRef,
            Arc::new(weights) as ArrayRef,
        ],
    )
}
