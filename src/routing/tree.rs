//! Segment-indexed route tree.
//!
//! Every path component is an edge. A node has any number of literal edges,
//! at most one parameter edge, and an optional terminal entry marking that a
//! route ends there. Matching walks the tree depth-first, preferring the
//! literal edge at each node and backtracking into the parameter edge when
//! the literal branch never reaches a terminal node.

use {
    super::{pattern::Segment, table::RouteEntry},
    crate::{Error, Result},
    std::collections::{BTreeMap, HashMap},
};

/// Key of an edge leaving a [`RouteNode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Edge {
    Literal(String),
    /// Binds the matched segment under this parameter name.
    Parameter(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParamEdge {
    name: String,
    node: Box<RouteNode>,
}

/// A node of the [`RouteTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteNode {
    literals: BTreeMap<String, RouteNode>,
    parameter: Option<ParamEdge>,
    terminal: Option<RouteEntry>,
}

impl RouteNode {
    /// The route ending at this node, if any.
    pub fn terminal(&self) -> Option<&RouteEntry> {
        self.terminal.as_ref()
    }

    /// Follows a single edge.
    pub fn child(&self, edge: &Edge) -> Option<&RouteNode> {
        match edge {
            Edge::Literal(text) => self.literals.get(text),
            Edge::Parameter(name) => self
                .parameter
                .as_ref()
                .filter(|param| &param.name == name)
                .map(|param| param.node.as_ref()),
        }
    }

    /// Outgoing edges: literals in sorted order, then the parameter edge.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, &RouteNode)> {
        self.literals
            .iter()
            .map(|(text, node)| (Edge::Literal(text.clone()), node))
            .chain(
                self.parameter
                    .iter()
                    .map(|param| (Edge::Parameter(param.name.clone()), param.node.as_ref())),
            )
    }

    /// Fails if walking `segments` would need a second parameter edge on a
    /// node that already has one under a different name.
    fn check_insert(&self, pattern: &str, segments: &[Segment]) -> Result<()> {
        let Some((head, rest)) = segments.split_first() else {
            return Ok(());
        };
        match head {
            Segment::Literal(text) => match self.literals.get(text) {
                Some(child) => child.check_insert(pattern, rest),
                None => Ok(()),
            },
            Segment::Param(name) => match &self.parameter {
                Some(param) if &param.name != name => Err(Error::malformed_pattern(format!(
                    "Route pattern `{pattern}` binds `<{name}>` where another route already binds `<{}>`",
                    param.name
                ))),
                Some(param) => param.node.check_insert(pattern, rest),
                None => Ok(()),
            },
        }
    }

    fn insert(&mut self, segments: &[Segment], entry: RouteEntry) -> Option<RouteEntry> {
        let Some((head, rest)) = segments.split_first() else {
            return self.terminal.replace(entry);
        };
        let child = match head {
            Segment::Literal(text) => self.literals.entry(text.clone()).or_default(),
            Segment::Param(name) => {
                let param = self.parameter.get_or_insert_with(|| ParamEdge {
                    name: name.clone(),
                    node: Box::default(),
                });
                param.node.as_mut()
            }
        };
        child.insert(rest, entry)
    }

    fn count_terminals(&self) -> usize {
        let own = usize::from(self.terminal.is_some());
        own + self
            .edges()
            .map(|(_, child)| child.count_terminals())
            .sum::<usize>()
    }
}

/// Tree of routes indexed by path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTree {
    root: RouteNode,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &RouteNode {
        &self.root
    }

    /// Inserts the entry along its pattern's segments.
    ///
    /// The insertion is all-or-nothing: a pattern whose parameter would clash
    /// with an existing parameter edge of a different name is rejected
    /// before the tree is touched. Returns the entry previously terminal at
    /// the same node, if any.
    pub fn insert(&mut self, entry: RouteEntry) -> Result<Option<RouteEntry>> {
        let segments = entry.pattern.segments().to_vec();
        self.root.check_insert(entry.pattern.as_str(), &segments)?;
        Ok(self.root.insert(&segments, entry))
    }

    /// Number of terminal nodes.
    pub fn len(&self) -> usize {
        self.root.count_terminals()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matches path segments against the tree.
    ///
    /// On success returns the terminal entry and the parameters bound along
    /// the successful path only.
    pub fn find(&self, segments: &[&str]) -> Option<(&RouteEntry, HashMap<String, String>)> {
        let mut bindings = Vec::new();
        let entry = walk(&self.root, segments, &mut bindings)?;
        let params = bindings
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Some((entry, params))
    }
}

fn walk<'t, 's>(
    node: &'t RouteNode,
    segments: &[&'s str],
    bindings: &mut Vec<(&'t str, &'s str)>,
) -> Option<&'t RouteEntry> {
    let Some((&head, rest)) = segments.split_first() else {
        return node.terminal.as_ref();
    };

    if let Some(child) = node.literals.get(head)
        && let Some(entry) = walk(child, rest, bindings)
    {
        return Some(entry);
    }

    let param = node.parameter.as_ref()?;
    if head.is_empty() {
        return None;
    }
    bindings.push((param.name.as_str(), head));
    let found = walk(&param.node, rest, bindings);
    if found.is_none() {
        bindings.pop();
    }
    found
}
