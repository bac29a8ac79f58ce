//! Logical column configuration for edge tables.

/// Names of the three logical edge-table columns.
///
/// Input files name their columns freely; the caller supplies the mapping
/// once and both ingestion and persistence use it, so simulated tables come
/// back with exactly the schema the input carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeColumns {
    source: String,
    target: String,
    weight: String,
}

impl EdgeColumns {
    /// Creates a column mapping from the three logical column names.
    ///
    /// # Examples
    /// ```
    /// use kumiko_providers_edges::EdgeColumns;
    ///
    /// let columns = EdgeColumns::new("account", "hashtag", "tweets");
    /// assert_eq!(columns.source(), "account");
    /// ```
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: weight.into(),
        }
    }

    /// Returns the source-id column name.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target-id column name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the weight column name.
    #[must_use]
    pub fn weight(&self) -> &str {
        &self.weight
    }

    /// Iterates the three column names in schema order.
    pub(crate) fn names(&self) -> [&str; 3] {
        [&self.source, &self.target, &self.weight]
    }
}
