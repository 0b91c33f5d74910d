use std::collections::BTreeSet;
use std::fmt;

/// Canonical, order-independent set of reagent ids.
///
/// Ids are kept sorted and deduplicated, so two sets compare equal exactly when
/// they contain the same ids regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReagentSet(BTreeSet<String>);

impl ReagentSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReagentSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ReagentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_regardless_of_order() {
        let a: ReagentSet = ["na", "h2o"].into_iter().collect();
        let b: ReagentSet = ["h2o", "na"].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicates_collapse() {
        let set: ReagentSet = ["zn", "hcl", "zn"].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn displays_sorted_ids() {
        let set: ReagentSet = ["vinegar", "baking_soda"].into_iter().collect();
        assert_eq!(set.to_string(), "baking_soda + vinegar");
    }
}
