//! Output visitors build a format-specific tree while the navigator walks the
//! object graph.

use hateoas_support::ClassInfo;

use crate::error::Result;

/// Builds output nodes for one format.
pub trait Visitor: Send + Sync {
    type Node;

    fn null(&self) -> Self::Node;
    fn boolean(&self, value: bool) -> Self::Node;
    fn integer(&self, value: i64) -> Self::Node;
    fn float(&self, value: f64) -> Self::Node;
    fn string(&self, value: &str) -> Self::Node;
    fn list(&self, items: Vec<Self::Node>) -> Self::Node;
    fn map(&self, entries: Vec<(String, Self::Node)>) -> Self::Node;

    /// An empty node for an object of `class`; properties are added with
    /// [`add_property`](Self::add_property).
    fn object(&self, class: &'static ClassInfo) -> Self::Node;
    fn add_property(&self, object: &mut Self::Node, name: &str, value: Self::Node);

    /// Renders the finished tree. `root_name` is only meaningful to formats
    /// with a named document root.
    fn render(&self, root: Self::Node, root_name: &str) -> Result<Vec<u8>>;
}

/// Outcome of navigating one value.
#[derive(Debug)]
pub enum Visited<N> {
    Node(N),
    Null,
    /// The value is an object already on the visiting path.
    Cycle,
    /// The value is an object below the active depth limit.
    Excluded,
}

impl<N> Visited<N> {
    pub fn into_node(self) -> Option<N> {
        match self {
            Visited::Node(node) => Some(node),
            _ => None,
        }
    }
}
