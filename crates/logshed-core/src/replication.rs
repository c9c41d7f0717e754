//! Replication requirements for a log.
//!
//! A replication property is a set of `(scope, factor)` pairs: each record
//! must have `factor` copies spanning that many distinct domains at `scope`.
//! `{rack: 2, node: 3}` reads "3 copies across at least 2 racks".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::location::LocationScope;

/// Per-scope replication factors, stored finest scope first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationProperty {
    factors: Vec<(LocationScope, usize)>,
}

impl ReplicationProperty {
    /// A property with a single `(scope, factor)` entry.
    #[must_use]
    pub fn new(scope: LocationScope, factor: usize) -> Self {
        debug_assert!(factor >= 1);
        Self { factors: vec![(scope, factor)] }
    }

    /// Build a property from `(scope, factor)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReplication`] if the pairs are empty, a factor
    /// is zero, or a scope appears twice.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (LocationScope, usize)>,
    ) -> Result<Self, Error> {
        let mut factors: Vec<(LocationScope, usize)> = pairs.into_iter().collect();
        if factors.is_empty() {
            return Err(Error::InvalidReplication("no replication factors given".to_string()));
        }
        if let Some(&(scope, _)) = factors.iter().find(|&&(_, factor)| factor == 0) {
            return Err(Error::InvalidReplication(format!("zero factor at scope {scope}")));
        }
        factors.sort_by_key(|&(scope, _)| scope);
        if factors.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(Error::InvalidReplication("duplicate scope".to_string()));
        }
        Ok(Self { factors })
    }

    /// All `(scope, factor)` pairs, finest scope first.
    #[must_use]
    pub fn pairs(&self) -> &[(LocationScope, usize)] {
        &self.factors
    }

    /// The total number of replicas required per record: the factor of the
    /// finest scope (factors never shrink as scopes narrow).
    #[must_use]
    pub fn replication_factor(&self) -> usize {
        self.factors.iter().map(|&(_, factor)| factor).max().unwrap_or(0)
    }

    /// Reduce the property to the pair cross-domain selection consults: the
    /// widest scope across which replicas must be spread, and the total
    /// replication factor. `{rack: 2, node: 3}` reduces to `(rack, 3)`.
    #[must_use]
    pub fn sync_scope_and_factor(&self) -> (LocationScope, usize) {
        let (scope, _) = self.factors[self.factors.len() - 1];
        (scope, self.replication_factor())
    }
}

impl fmt::Display for ReplicationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (scope, factor)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{scope}: {factor}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_entry() {
        let prop = ReplicationProperty::new(LocationScope::Rack, 3);
        assert_eq!(prop.sync_scope_and_factor(), (LocationScope::Rack, 3));
        assert_eq!(prop.replication_factor(), 3);
    }

    #[test]
    fn test_multi_entry_reduces_to_widest_scope() {
        let prop = ReplicationProperty::from_pairs([
            (LocationScope::DataCenter, 2),
            (LocationScope::Node, 4),
        ])
        .unwrap();
        assert_eq!(prop.sync_scope_and_factor(), (LocationScope::DataCenter, 4));
        assert_eq!(prop.replication_factor(), 4);
        assert_eq!(
            prop.pairs(),
            &[(LocationScope::Node, 4), (LocationScope::DataCenter, 2)]
        );
    }

    #[test]
    fn test_from_pairs_rejects_bad_input() {
        assert!(ReplicationProperty::from_pairs([]).is_err());
        assert!(ReplicationProperty::from_pairs([(LocationScope::Rack, 0)]).is_err());
        assert!(ReplicationProperty::from_pairs([
            (LocationScope::Rack, 2),
            (LocationScope::Rack, 3),
        ])
        .is_err());
    }

    #[test]
    fn test_display() {
        let prop = ReplicationProperty::from_pairs([
            (LocationScope::Node, 3),
            (LocationScope::Rack, 2),
        ])
        .unwrap();
        assert_eq!(prop.to_string(), "{node: 3, rack: 2}");
    }
}
