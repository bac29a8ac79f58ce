//! Parquet ingestion for weighted bipartite edge tables.

use std::{collections::HashSet, fs::File, path::Path, sync::Arc};

use arrow_array::{
    Array, Int64Array, LargeStringArray, RecordBatch, RecordBatchReader, StringArray, UInt64Array,
};
use kumiko_core::Edge;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;

use crate::columns::EdgeColumns;
use crate::errors::EdgeTableError;

/// An edge table loaded from a Parquet file.
///
/// Rows keep their file order; aggregation and validation of weights beyond
/// positivity is the engine's concern. Node ids are interned so tables with
/// few distinct nodes and many rows stay cheap to hold.
#[derive(Debug)]
pub struct EdgeTable {
    name: String,
    edges: Vec<Edge>,
}

impl EdgeTable {
    pub(crate) fn from_parts(name: impl Into<String>, edges: Vec<Edge>) -> Self {
        Self {
            name: name.into(),
            edges,
        }
    }

    /// Returns the name this table was loaded under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of rows in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the loaded edges in file order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Consumes the table, yielding its edges.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    /// Loads an edge table from a Parquet file on disk.
    ///
    /// # Errors
    /// Returns [`EdgeTableError`] when the file cannot be opened or its
    /// contents fail schema or value validation.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        columns: &EdgeColumns,
    ) -> Result<Self, EdgeTableError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, columns)
    }

    /// Loads an edge table from a Parquet reader.
    ///
    /// # Errors
    /// Returns [`EdgeTableError::ColumnNotFound`] when a configured column is
    /// absent, the `InvalidColumnType` variants when a column has an
    /// unsupported Arrow type, [`EdgeTableError::NullValue`] on null cells
    /// and [`EdgeTableError::NonPositiveWeight`] on weights below one.
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        columns: &EdgeColumns,
    ) -> Result<Self, EdgeTableError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        for column in columns.names() {
            if builder.schema().index_of(column).is_err() {
                return Err(EdgeTableError::ColumnNotFound {
                    column: column.to_owned(),
                });
            }
        }
        let mask = ProjectionMask::columns(builder.parquet_schema(), columns.names());
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let source_index = column_index(&schema, columns.source())?;
        let target_index = column_index(&schema, columns.target())?;
        let weight_index = column_index(&schema, columns.weight())?;

        let mut pool: HashSet<Arc<str>> = HashSet::new();
        let mut edges = Vec::new();
        let mut rows = 0_usize;
        for batch in reader {
            let batch = batch?;
            append_edges(
                &batch,
                (source_index, target_index, weight_index),
                columns,
                rows,
                &mut pool,
                &mut edges,
            )?;
            rows += batch.num_rows();
        }
        Ok(Self::from_parts(name, edges))
    }
}

fn column_index(
    schema: &arrow_schema::SchemaRef,
    column: &str,
) -> Result<usize, EdgeTableError> {
    schema
        .index_of(column)
        .map_err(|_| EdgeTableError::ColumnNotFound {
            column: column.to_owned(),
        })
}

fn append_edges(
    batch: &RecordBatch,
    (source_index, target_index, weight_index): (usize, usize, usize),
    columns: &EdgeColumns,
    start_row: usize,
    pool: &mut HashSet<Arc<str>>,
    edges: &mut Vec<Edge>,
) -> Result<(), EdgeTableError> {
    let sources = IdColumn::try_new(batch.column(source_index), columns.source())?;
    let targets = IdColumn::try_new(batch.column(target_index), columns.target())?;
    let weights = WeightColumn::try_new(batch.column(weight_index), columns.weight())?;

    edges.reserve(batch.num_rows());
    for row in 0..batch.num_rows() {
        let absolute_row = start_row + row;
        let source = sources.value(row, absolute_row, columns.source(), pool)?;
        let target = targets.value(row, absolute_row, columns.target(), pool)?;
        let weight = weights.value(row, absolute_row, columns.weight())?;
        edges.push(Edge {
            source,
            target,
            weight,
        });
    }
    Ok(())
}

/// A node-id column in one of the supported Arrow representations.
enum IdColumn<'a> {
    Utf8(&'a StringArray),
    LargeUtf8(&'a LargeStringArray),
    Int64(&'a Int64Array),
}

impl<'a> IdColumn<'a> {
    fn try_new(
        array: &'a dyn Array,
        column: &str,
    ) -> Result<Self, EdgeTableError> {
        let any = array.as_any();
        if let Some(strings) = any.downcast_ref::<StringArray>() {
            return Ok(Self::Utf8(strings));
        }
        if let Some(strings) = any.downcast_ref::<LargeStringArray>() {
            return Ok(Self::LargeUtf8(strings));
        }
        if let Some(integers) = any.downcast_ref::<Int64Array>() {
            return Ok(Self::Int64(integers));
        }
        Err(EdgeTableError::InvalidIdColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })
    }

    fn value(
        &self,
        row: usize,
        absolute_row: usize,
        column: &str,
        pool: &mut HashSet<Arc<str>>,
    ) -> Result<Arc<str>, EdgeTableError> {
        let is_null = match self {
            Self::Utf8(strings) => strings.is_null(row),
            Self::LargeUtf8(strings) => strings.is_null(row),
            Self::Int64(integers) => integers.is_null(row),
        };
        if is_null {
            return Err(EdgeTableError::NullValue {
                column: column.to_owned(),
                row: absolute_row,
            });
        }
        let interned = match self {
            Self::Utf8(strings) => intern(pool, strings.value(row)),
            Self::LargeUtf8(strings) => intern(pool, strings.value(row)),
            Self::Int64(integers) => intern(pool, &integers.value(row).to_string()),
        };
        Ok(interned)
    }
}

/// A weight column in one of the supported Arrow representations.
enum WeightColumn<'a> {
    Int64(&'a Int64Array),
    UInt64(&'a UInt64Array),
}

impl<'a> WeightColumn<'a> {
    fn try_new(
        array: &'a dyn Array,
        column: &str,
    ) -> Result<Self, EdgeTableError> {
        let any = array.as_any();
        if let Some(integers) = any.downcast_ref::<Int64Array>() {
            return Ok(Self::Int64(integers));
        }
        if let Some(integers) = any.downcast_ref::<UInt64Array>() {
            return Ok(Self::UInt64(integers));
        }
        Err(EdgeTableError::InvalidWeightColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })
    }

    fn value(
        &self,
        row: usize,
        absolute_row: usize,
        column: &str,
    ) -> Result<u64, EdgeTableError> {
        match self {
            Self::Int64(integers) => {
                if integers.is_null(row) {
                    return Err(EdgeTableError::NullValue {
                        column: column.to_owned(),
                        row: absolute_row,
                    });
                }
                let value = integers.value(row);
                u64::try_from(value)
                    .ok()
                    .filter(|&weight| weight > 0)
                    .ok_or(EdgeTableError::NonPositiveWeight {
                        row: absolute_row,
                        value,
                    })
            }
            Self::UInt64(integers) => {
                if integers.is_null(row) {
                    return Err(EdgeTableError::NullValue {
                        column: column.to_owned(),
                        row: absolute_row,
                    });
                }
                let value = integers.value(row);
                if value == 0 {
                    return Err(EdgeTableError::NonPositiveWeight {
                        row: absolute_row,
                        value: 0,
                    });
                }
                Ok(value)
            }
        }
    }
}

fn intern(pool: &mut HashSet<Arc<str>>, value: &str) -> Arc<str> {
    if let Some(found) = pool.get(value) {
        Arc::clone(found)
    } else {
        let created: Arc<str> = Arc::from(value);
        pool.insert(Arc::clone(&created));
        created
    }
}
