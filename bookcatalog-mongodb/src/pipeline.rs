//! Pipeline translation from typed stage descriptors to MongoDB
//! aggregation documents.

use bson::{Bson, Document, doc};

use bookcatalog_core::{
    pipeline::{Accumulator, Pipeline, Stage, ValueExpr},
    query::SortDirection,
};

pub(crate) fn translate_pipeline(pipeline: &Pipeline) -> Vec<Document> {
    pipeline.stages.iter().map(translate_stage).collect()
}

fn translate_stage(stage: &Stage) -> Document {
    match stage {
        Stage::Project(fields) => doc! {
            "$project": fields
                .iter()
                .map(|(name, expr)| (name.clone(), translate_expr(expr)))
                .collect::<Document>(),
        },
        Stage::Group { key, accumulators } => {
            let mut spec = doc! { "_id": translate_expr(key) };
            for (name, accumulator) in accumulators {
                spec.insert(
                    name.clone(),
                    match accumulator {
                        Accumulator::Avg(field) => doc! { "$avg": format!("${field}") },
                        Accumulator::Count => doc! { "$sum": 1 },
                    },
                );
            }

            doc! { "$group": spec }
        }
        Stage::Sort { field, direction } => doc! {
            "$sort": {
                field.clone(): match direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            }
        },
        Stage::Limit(limit) => doc! { "$limit": *limit as i64 },
    }
}

fn translate_expr(expr: &ValueExpr) -> Bson {
    match expr {
        ValueExpr::Field(name) => Bson::String(format!("${name}")),
        ValueExpr::DecadeOf(name) => {
            let field = format!("${name}");
            Bson::Document(doc! {
                "$subtract": [field.as_str(), { "$mod": [field.as_str(), 10] }],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_by_group_translates_to_group_stage() {
        let pipeline = Pipeline::builder()
            .group(
                ValueExpr::Field("genre".into()),
                vec![("averagePrice", Accumulator::Avg("price".into()))],
            )
            .build();

        assert_eq!(
            translate_pipeline(&pipeline),
            vec![doc! {
                "$group": { "_id": "$genre", "averagePrice": { "$avg": "$price" } }
            }],
        );
    }

    #[test]
    fn top_group_translates_to_group_sort_limit() {
        let pipeline = Pipeline::builder()
            .group(
                ValueExpr::Field("author".into()),
                vec![("bookCount", Accumulator::Count)],
            )
            .sort("bookCount", SortDirection::Desc)
            .limit(1)
            .build();

        assert_eq!(
            translate_pipeline(&pipeline),
            vec![
                doc! { "$group": { "_id": "$author", "bookCount": { "$sum": 1 } } },
                doc! { "$sort": { "bookCount": -1 } },
                doc! { "$limit": 1_i64 },
            ],
        );
    }

    #[test]
    fn decade_bucketing_uses_subtract_and_mod() {
        let pipeline = Pipeline::builder()
            .project(vec![("decade", ValueExpr::DecadeOf("published_year".into()))])
            .group(
                ValueExpr::Field("decade".into()),
                vec![("bookCount", Accumulator::Count)],
            )
            .sort("_id", SortDirection::Asc)
            .build();

        assert_eq!(
            translate_pipeline(&pipeline)[0],
            doc! {
                "$project": {
                    "decade": {
                        "$subtract": ["$published_year", { "$mod": ["$published_year", 10] }]
                    }
                }
            },
        );
    }
}
