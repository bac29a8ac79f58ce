pub(crate) use super::{EdgeColumns, EdgeTable, EdgeTableError, write_edge_table};

mod support;
