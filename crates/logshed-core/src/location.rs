//! Hierarchical node locations.
//!
//! Every storage node is tagged with a location path in the cluster topology,
//! widest scope first: `region.data_center.cluster.row.rack`. A *domain at
//! scope S* is the equivalence class of nodes sharing the same location
//! prefix up to S; the prefix string itself serves as the domain key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A level in the cluster topology, finest first.
///
/// `Node` is finer than any label-bearing scope (a location never names an
/// individual node); `Root` is a sentinel meaning "no constraint". The
/// derived ordering is the ladder: `Node < Rack < ... < Region < Root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationScope {
    /// An individual storage node.
    Node,
    /// A rack of nodes.
    Rack,
    /// A row of racks.
    Row,
    /// A cluster within a data center.
    Cluster,
    /// A data center.
    DataCenter,
    /// A geographic region.
    Region,
    /// The whole tier; no placement constraint.
    Root,
}

impl LocationScope {
    /// Number of scopes that carry a label in a location path.
    pub const NUM_LABEL_SCOPES: usize = 5;

    /// The fixed name of this scope.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Rack => "rack",
            Self::Row => "row",
            Self::Cluster => "cluster",
            Self::DataCenter => "data_center",
            Self::Region => "region",
            Self::Root => "root",
        }
    }

    /// Position of this scope's label in a location path (widest first),
    /// or `None` for `Node` and `Root` which carry no label.
    #[must_use]
    pub const fn label_index(self) -> Option<usize> {
        match self {
            Self::Region => Some(0),
            Self::DataCenter => Some(1),
            Self::Cluster => Some(2),
            Self::Row => Some(3),
            Self::Rack => Some(4),
            Self::Node | Self::Root => None,
        }
    }

    /// The next wider scope on the ladder, or `None` for `Root`.
    #[must_use]
    pub const fn next_wider(self) -> Option<Self> {
        match self {
            Self::Node => Some(Self::Rack),
            Self::Rack => Some(Self::Row),
            Self::Row => Some(Self::Cluster),
            Self::Cluster => Some(Self::DataCenter),
            Self::DataCenter => Some(Self::Region),
            Self::Region => Some(Self::Root),
            Self::Root => None,
        }
    }

    /// The label-bearing scopes, widest first, in location-path order.
    pub fn hierarchy() -> impl Iterator<Item = Self> {
        [Self::Region, Self::DataCenter, Self::Cluster, Self::Row, Self::Rack].into_iter()
    }
}

impl fmt::Display for LocationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocationScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "rack" => Ok(Self::Rack),
            "row" => Ok(Self::Row),
            "cluster" => Ok(Self::Cluster),
            "data_center" => Ok(Self::DataCenter),
            "region" => Ok(Self::Region),
            "root" => Ok(Self::Root),
            other => Err(Error::UnknownScope(other.to_string())),
        }
    }
}

/// A node's position in the cluster topology.
///
/// Stores up to [`LocationScope::NUM_LABEL_SCOPES`] labels, widest scope
/// first. A location may be partial (a prefix that stops early), but labels
/// must be contiguous: `rg0.dc1` specifies region and data center and leaves
/// the narrower scopes unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeLocation {
    labels: Vec<String>,
}

impl NodeLocation {
    /// Parse a location from a `.`-separated domain string.
    ///
    /// Trailing separators are allowed (`"rg0.dc0."` specifies two scopes);
    /// empty labels before a non-empty one are not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLocation`] if the string has more labels than
    /// the scope ladder or contains an interior empty label.
    pub fn from_domain_string(s: &str) -> Result<Self, Error> {
        let mut labels: Vec<String> = s.split('.').map(str::to_string).collect();
        while labels.last().is_some_and(|label| label.is_empty()) {
            labels.pop();
        }
        if labels.len() > LocationScope::NUM_LABEL_SCOPES {
            return Err(Error::InvalidLocation(s.to_string()));
        }
        if labels.iter().any(|label| label.is_empty()) {
            return Err(Error::InvalidLocation(s.to_string()));
        }
        Ok(Self { labels })
    }

    /// Returns true if no scope is specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of scopes this location specifies.
    #[must_use]
    pub fn num_scopes(&self) -> usize {
        self.labels.len()
    }

    /// Whether the location carries a label at `scope`.
    ///
    /// `Root` is always specified (every node is in the tier); `Node` never
    /// is (locations do not name individual nodes).
    #[must_use]
    pub fn scope_specified(&self, scope: LocationScope) -> bool {
        match scope {
            LocationScope::Root => true,
            LocationScope::Node => false,
            _ => scope.label_index().is_some_and(|idx| idx < self.labels.len()),
        }
    }

    /// The domain key for this location at `scope`: the label prefix up to
    /// and including `scope`, joined with `.`.
    ///
    /// `Root` yields the empty string; `Node` yields the full path.
    #[must_use]
    pub fn domain(&self, scope: LocationScope) -> String {
        let take = match scope {
            LocationScope::Root => 0,
            LocationScope::Node => self.labels.len(),
            _ => scope
                .label_index()
                .map_or(self.labels.len(), |idx| (idx + 1).min(self.labels.len())),
        };
        self.labels[..take].join(".")
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels.join("."))
    }
}

impl FromStr for NodeLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_domain_string(s)
    }
}

impl TryFrom<String> for NodeLocation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_domain_string(&value)
    }
}

impl From<NodeLocation> for String {
    fn from(location: NodeLocation) -> Self {
        location.to_string()
    }
}
