//! Which reserved fields a document actually carries.

use std::collections::HashSet;

use strum::IntoEnumIterator;

use crate::fields::{Field, Scope};
use crate::model::GraphDocument;

/// Set of (scope, field) pairs present on at least one element.
#[derive(Debug, Clone, Default)]
pub struct PresenceIndex {
    present: HashSet<(Scope, Field)>,
}

impl PresenceIndex {
    pub fn build(doc: &GraphDocument) -> Self {
        let mut present = HashSet::new();
        for scope in Scope::ALL {
            for element in doc.elements(scope) {
                for field in Field::iter().filter(|f| element.has(*f)) {
                    present.insert((scope, field));
                }
            }
        }
        Self { present }
    }

    pub fn contains(&self, scope: Scope, field: Field) -> bool {
        self.present.contains(&(scope, field))
    }
}
