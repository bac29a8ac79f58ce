use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeTableError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: String },
    #[error("id column `{column}` must be Utf8, LargeUtf8 or Int64 but found {actual:?}")]
    InvalidIdColumnType { column: String, actual: DataType },
    #[error("weight column `{column}` must be Int64 or UInt64 but found {actual:?}")]
    InvalidWeightColumnType { column: String, actual: DataType },
    #[error("column `{column}` is null at row {row}")]
    NullValue { column: String, row: usize },
    #[error("weight at row {row} is {value}; weights must be positive counts")]
    NonPositiveWeight { row: usize, value: i64 },
    #[error("weight at row {row} does not fit the output weight column")]
    WeightTooLarge { row: usize },
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
