use std::sync::Arc;

use crate::catalog::Catalog;
use crate::models::{Outcome, ReactionRule};

use super::ReagentSet;

/// Matches staged reagent sets against the catalog's rule table.
///
/// Resolution is a pure function of the id set and the (immutable) rule table,
/// so a single resolver is shared by every session.
#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Arc<Catalog>,
}

impl Resolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The rule whose reagent set equals `set` exactly, if any.
    pub fn find_rule(&self, set: &ReagentSet) -> Option<&ReactionRule> {
        self.catalog.rule_for(set)
    }

    /// Resolve an id set that is already canonical.
    pub fn resolve_set(&self, set: &ReagentSet) -> Outcome {
        if set.is_empty() {
            return Outcome::NothingToMix;
        }
        match self.find_rule(set) {
            Some(rule) => Outcome::from_rule(rule),
            None => Outcome::NoReaction,
        }
    }

    /// Resolve any collection of ids. Order and duplicates are irrelevant.
    pub fn resolve<I, S>(&self, ids: I) -> Outcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_set(&ids.into_iter().collect())
    }
}
