//! Aggregation pipeline execution over in-memory document streams.
//!
//! Stages run in order over a vector of documents. Grouping preserves
//! first-seen key order; a later sort stage decides the final ordering,
//! as in the external engine.

use std::cmp::Ordering;

use bson::{Bson, Document, doc};

use bookcatalog_core::{
    error::{CatalogError, CatalogResult},
    pipeline::{Accumulator, Pipeline, Stage, ValueExpr},
    query::SortDirection,
};

use crate::evaluator::Comparable;

pub(crate) fn run_pipeline(
    mut stream: Vec<Document>,
    pipeline: &Pipeline,
) -> CatalogResult<Vec<Document>> {
    for stage in &pipeline.stages {
        stream = match stage {
            Stage::Project(fields) => project(stream, fields)?,
            Stage::Group { key, accumulators } => group(stream, key, accumulators)?,
            Stage::Sort { field, direction } => sort(stream, field, direction),
            Stage::Limit(limit) => {
                stream.truncate(*limit);
                stream
            }
        };
    }

    Ok(stream)
}

fn evaluate(expr: &ValueExpr, document: &Document) -> CatalogResult<Bson> {
    match expr {
        ValueExpr::Field(name) => Ok(document.get(name).cloned().unwrap_or(Bson::Null)),
        ValueExpr::DecadeOf(name) => {
            let year = match document.get(name) {
                Some(Bson::Int32(value)) => *value as i64,
                Some(Bson::Int64(value)) => *value,
                Some(Bson::Double(value)) => *value as i64,
                other => {
                    return Err(CatalogError::InvalidDocument(format!(
                        "field '{name}' is not a numeric year: {other:?}"
                    )));
                }
            };

            Ok(Bson::Int32((year - year % 10) as i32))
        }
    }
}

fn project(stream: Vec<Document>, fields: &[(String, ValueExpr)]) -> CatalogResult<Vec<Document>> {
    stream
        .into_iter()
        .map(|document| {
            let mut projected = Document::new();
            for (name, expr) in fields {
                projected.insert(name.clone(), evaluate(expr, &document)?);
            }

            Ok(projected)
        })
        .collect()
}

fn group(
    stream: Vec<Document>,
    key: &ValueExpr,
    accumulators: &[(String, Accumulator)],
) -> CatalogResult<Vec<Document>> {
    // first-seen key order; a later sort stage imposes the final ordering
    let mut groups: Vec<(Bson, Vec<Document>)> = Vec::new();
    for document in stream {
        let key_value = evaluate(key, &document)?;
        match groups.iter_mut().find(|(existing, _)| existing == &key_value) {
            Some((_, members)) => members.push(document),
            None => groups.push((key_value, vec![document])),
        }
    }

    groups
        .into_iter()
        .map(|(key_value, members)| {
            let mut row = doc! { "_id": key_value };
            for (name, accumulator) in accumulators {
                row.insert(name.clone(), apply(accumulator, &members));
            }

            Ok(row)
        })
        .collect()
}

fn apply(accumulator: &Accumulator, members: &[Document]) -> Bson {
    match accumulator {
        Accumulator::Count => Bson::Int64(members.len() as i64),
        Accumulator::Avg(field) => {
            let mut sum = 0.0;
            let mut counted = 0usize;
            for member in members {
                match member.get(field) {
                    Some(Bson::Double(value)) => {
                        sum += value;
                        counted += 1;
                    }
                    Some(Bson::Int32(value)) => {
                        sum += *value as f64;
                        counted += 1;
                    }
                    Some(Bson::Int64(value)) => {
                        sum += *value as f64;
                        counted += 1;
                    }
                    // missing or non-numeric values do not contribute
                    _ => {}
                }
            }

            if counted == 0 {
                Bson::Null
            } else {
                Bson::Double(sum / counted as f64)
            }
        }
    }
}

fn sort(mut stream: Vec<Document>, field: &str, direction: &SortDirection) -> Vec<Document> {
    stream.sort_by(|a, b| {
        let left = a.get(field).map(Comparable::from).unwrap_or(Comparable::Null);
        let right = b.get(field).map(Comparable::from).unwrap_or(Comparable::Null);

        match direction {
            SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        }
    });

    stream
}
