// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parsed path expressions

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::node::PathNode;
use super::segment::Segment;
use crate::parser::{ParseError, ParseResult, parse_path};

/// An immutable, parsed path
///
/// Cloning is cheap and clones share their nodes, including node caches.
/// Equality is structural over the segments.
#[derive(Clone)]
pub struct PathExpression {
    source: Arc<str>,
    nodes: Vec<Arc<PathNode>>,
}

impl PathExpression {
    /// Parse a path string
    pub fn parse(input: &str) -> ParseResult<Self> {
        parse_path(input)
    }

    pub(crate) fn from_segments(source: &str, segments: Vec<Segment>) -> Self {
        let mut nodes: Vec<Arc<PathNode>> = Vec::with_capacity(segments.len());
        for segment in segments {
            let parent = nodes.last().cloned();
            nodes.push(Arc::new(PathNode::new(segment, parent)));
        }
        Self {
            source: Arc::from(source),
            nodes,
        }
    }

    /// The string this path was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no segments
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes from first to last
    pub fn nodes(&self) -> &[Arc<PathNode>] {
        &self.nodes
    }

    /// Segments from first to last
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.nodes.iter().map(|node| node.segment())
    }

    /// The last node
    pub fn leaf(&self) -> Option<&Arc<PathNode>> {
        self.nodes.last()
    }

    /// The last node and the nodes leading to it
    pub fn split_leaf(&self) -> Option<(&Arc<PathNode>, &[Arc<PathNode>])> {
        self.nodes.split_last()
    }

    /// Drop every node's cached resolution
    pub fn clear_cache(&self) {
        for node in &self.nodes {
            node.clear_cache();
        }
    }
}

impl PartialEq for PathExpression {
    fn eq(&self, other: &Self) -> bool {
        self.segments().eq(other.segments())
    }
}

impl FromStr for PathExpression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathExpression").field(&self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("customer.address.city")]
    #[case("items[10].sku")]
    #[case(r#"attributes["a \"quoted\" key"].value"#)]
    #[case("orders.at(2, 'x\\ty', -1.5, false, null).total")]
    #[case("größe.$ref")]
    fn test_display_round_trip(#[case] input: &str) {
        let parsed: PathExpression = input.parse().unwrap();
        let reparsed: PathExpression = parsed.to_string().parse().unwrap();
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn test_canonical_form() {
        let parsed = PathExpression::parse("f( 1 ,'a' ).items[ 0 ]").unwrap();
        assert_eq!(parsed.to_string(), "f(1, 'a').items[0]");
        assert_eq!(parsed.source(), "f( 1 ,'a' ).items[ 0 ]");
    }

    #[test]
    fn test_nodes_are_linked() {
        let parsed = PathExpression::parse("a.b.c").unwrap();
        let (leaf, parents) = parsed.split_leaf().unwrap();
        assert_eq!(parents.len(), 2);
        assert_eq!(leaf.qualified_path(), "a.b.c");
        assert!(Arc::ptr_eq(leaf.parent().unwrap(), &parents[1]));
        assert!(parsed.nodes()[0].is_root());
    }
}
