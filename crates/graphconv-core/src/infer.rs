//! Attribute type inference for untyped input.
//!
//! Every observation of a non-reserved field is tallied by the runtime type
//! of its value. A field resolves to its most frequent type; ties go to
//! whichever of the tied types was seen first.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::AttributeDef;
use crate::scalar::{AttributeType, Scalar};

#[derive(Debug, Clone, Default)]
struct Tally {
    // (type, count) in first-observed order.
    counts: Vec<(AttributeType, usize)>,
}

impl Tally {
    fn record(&mut self, ty: AttributeType) {
        match self.counts.iter_mut().find(|(t, _)| *t == ty) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((ty, 1)),
        }
    }

    fn winner(&self) -> AttributeType {
        let mut best: Option<(AttributeType, usize)> = None;
        for &(ty, count) in &self.counts {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((ty, count));
            }
        }
        best.map(|(ty, _)| ty).unwrap_or_default()
    }
}

/// Per-field type histogram, built as a fold over observations.
#[derive(Debug, Clone, Default)]
pub struct TypeHistogram {
    fields: Vec<(String, Tally)>,
    index: HashMap<String, usize>,
}

impl TypeHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(mut self, name: &str, value: &Scalar) -> Self {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                self.fields.push((name.to_string(), Tally::default()));
                self.index.insert(name.to_string(), self.fields.len() - 1);
                self.fields.len() - 1
            }
        };
        self.fields[slot].1.record(value.attribute_type());
        self
    }

    /// One definition per observed field, in first-observation order.
    pub fn resolve(self) -> Vec<AttributeDef> {
        self.fields
            .into_iter()
            .map(|(name, tally)| AttributeDef::new(name, tally.winner()))
            .collect()
    }
}

/// Infer a schema from the attribute maps of a collection of elements,
/// skipping any name in `reserved`.
pub fn infer_schema<'a>(
    elements: impl IntoIterator<Item = &'a BTreeMap<String, Scalar>>,
    reserved: &HashSet<&str>,
) -> Vec<AttributeDef> {
    elements
        .into_iter()
        .flat_map(|attributes| attributes.iter())
        .filter(|(name, _)| !reserved.contains(name.as_str()))
        .fold(TypeHistogram::new(), |histogram, (name, value)| {
            histogram.observe(name, value)
        })
        .resolve()
}

/// Append inferred definitions that are not declared yet.
pub fn extend_schema(declared: &mut Vec<AttributeDef>, inferred: Vec<AttributeDef>) {
    for def in inferred {
        if !declared.iter().any(|d| d.id == def.id) {
            declared.push(def);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::reserved_names;
    use pretty_assertions::assert_eq;

    fn observe_all(values: &[Scalar]) -> AttributeType {
        values
            .iter()
            .fold(TypeHistogram::new(), |h, v| h.observe("f", v))
            .resolve()[0]
            .ty
    }

    #[test]
    fn test_majority_wins_regardless_of_order() {
        let mut values = vec![
            Scalar::from("a"),
            Scalar::Number(1.0),
            Scalar::Number(2.0),
        ];
        assert_eq!(observe_all(&values), AttributeType::Number);
        values.reverse();
        assert_eq!(observe_all(&values), AttributeType::Number);
    }

    #[test]
    fn test_tie_goes_to_first_observed() {
        let values = [Scalar::Boolean(true), Scalar::Number(1.0)];
        assert_eq!(observe_all(&values), AttributeType::Boolean);
        let values = [Scalar::Number(1.0), Scalar::Boolean(true)];
        assert_eq!(observe_all(&values), AttributeType::Number);
    }

    #[test]
    fn test_infer_schema_order_and_reserved() {
        let a: BTreeMap<String, Scalar> = [
            ("score".to_string(), Scalar::Number(1.0)),
            ("label".to_string(), Scalar::from("x")),
        ]
        .into_iter()
        .collect();
        let b: BTreeMap<String, Scalar> = [
            ("active".to_string(), Scalar::Boolean(false)),
            ("score".to_string(), Scalar::Number(3.0)),
        ]
        .into_iter()
        .collect();

        let schema = infer_schema([&a, &b], &reserved_names());
        assert_eq!(
            schema,
            vec![
                AttributeDef::new("score", AttributeType::Number),
                AttributeDef::new("active", AttributeType::Boolean),
            ]
        );
        assert_eq!(schema[0].title, "score");
    }

    #[test]
    fn test_extend_schema_keeps_declared() {
        let mut declared = vec![AttributeDef::new("score", AttributeType::String)];
        extend_schema(
            &mut declared,
            vec![
                AttributeDef::new("score", AttributeType::Number),
                AttributeDef::new("rank", AttributeType::Number),
            ],
        );
        assert_eq!(declared.len(), 2);
        assert_eq!(declared[0].ty, AttributeType::String);
        assert_eq!(declared[1].id, "rank");
    }
}
