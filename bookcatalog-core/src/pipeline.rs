//! Composable aggregation pipeline descriptors.
//!
//! A [`Pipeline`] is an ordered sequence of strongly-typed [`Stage`]
//! descriptors that each engine translates into its native aggregation
//! representation. Using typed stages instead of dynamically-typed
//! pipeline literals keeps field names and stage shapes checked at the
//! construction site.
//!
//! # Example
//!
//! ```ignore
//! use bookcatalog::pipeline::{Accumulator, Pipeline, ValueExpr};
//! use bookcatalog::query::SortDirection;
//!
//! // count books per publication decade, ascending
//! let pipeline = Pipeline::builder()
//!     .project(vec![("decade", ValueExpr::DecadeOf("published_year".into()))])
//!     .group(ValueExpr::Field("decade".into()), vec![("bookCount", Accumulator::Count)])
//!     .sort("_id", SortDirection::Asc)
//!     .build();
//! ```

use crate::query::SortDirection;

/// A value-producing expression usable in projection and grouping stages.
#[derive(Debug, Clone)]
pub enum ValueExpr {
    /// The value of the named field.
    Field(String),
    /// The decade containing the named numeric year field,
    /// computed as `year - (year mod 10)`.
    DecadeOf(String),
}

/// An accumulator applied per group of documents.
#[derive(Debug, Clone)]
pub enum Accumulator {
    /// Arithmetic mean of the named numeric field across the group.
    /// Documents where the field is missing or non-numeric do not contribute.
    Avg(String),
    /// Number of documents in the group.
    Count,
}

/// A single aggregation stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Replaces each document in the stream with the named computed fields.
    Project(Vec<(String, ValueExpr)>),
    /// Groups the stream by a key expression, emitting one document per
    /// group with the key under `_id` plus the named accumulator outputs.
    Group {
        /// The grouping key expression.
        key: ValueExpr,
        /// Output field names paired with their accumulators.
        accumulators: Vec<(String, Accumulator)>,
    },
    /// Orders the stream by a field.
    Sort {
        /// The field name to sort by (group output rows expose their key as `_id`).
        field: String,
        /// The sort direction.
        direction: SortDirection,
    },
    /// Truncates the stream to the first `n` documents.
    Limit(usize),
}

/// An ordered sequence of aggregation stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// The stages, executed in order.
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Pipeline::default()
    }

    /// Creates a new pipeline builder for fluent construction.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    pub fn new() -> Self {
        PipelineBuilder { pipeline: Pipeline::default() }
    }

    /// Appends a projection stage.
    pub fn project<S: Into<String>>(mut self, fields: Vec<(S, ValueExpr)>) -> Self {
        self.pipeline.stages.push(Stage::Project(
            fields
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        ));
        self
    }

    /// Appends a grouping stage.
    pub fn group<S: Into<String>>(
        mut self,
        key: ValueExpr,
        accumulators: Vec<(S, Accumulator)>,
    ) -> Self {
        self.pipeline.stages.push(Stage::Group {
            key,
            accumulators: accumulators
                .into_iter()
                .map(|(name, accumulator)| (name.into(), accumulator))
                .collect(),
        });
        self
    }

    /// Appends a sort stage.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.pipeline.stages.push(Stage::Sort { field: field.into(), direction });
        self
    }

    /// Appends a limit stage.
    pub fn limit(mut self, limit: usize) -> Self {
        self.pipeline.stages.push(Stage::Limit(limit));
        self
    }

    /// Builds and returns the final pipeline.
    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
