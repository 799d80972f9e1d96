//! Location paths for validation issues.
//!
//! A [`LocationContext`] is an immutable, persistent list of path segments.
//! Appending shares the parent's segments, so building the location of a deeply
//! nested field costs one allocation per level regardless of depth.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// One step of a location path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Container type name, e.g. `Patient`. Only meaningful at the root.
    Type(String),
    /// Field name within the current container, e.g. `contact`.
    Field(String),
    /// Zero-based list index applied to the preceding field.
    Index(usize),
}

#[derive(Debug)]
struct Node {
    parent: Option<Arc<Node>>,
    segment: PathSegment,
    depth: usize,
}

/// Where in a document instance an issue was found.
///
/// Renders as `Patient.contact[2].name`.
#[derive(Clone, Default)]
pub struct LocationContext {
    head: Option<Arc<Node>>,
}

impl LocationContext {
    /// An empty path, rendered as the empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A root path naming the container type.
    pub fn root(type_name: impl Into<String>) -> Self {
        Self::empty().append(PathSegment::Type(type_name.into()))
    }

    /// Returns a new path extended by `segment`; `self` is left untouched.
    pub fn append(&self, segment: PathSegment) -> Self {
        let depth = self.depth() + 1;
        Self {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                segment,
                depth,
            })),
        }
    }

    pub fn field(&self, name: impl Into<String>) -> Self {
        self.append(PathSegment::Field(name.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.append(PathSegment::Index(index))
    }

    /// Shorthand for `field(name).index(index)`.
    pub fn field_index(&self, name: impl Into<String>, index: usize) -> Self {
        self.field(name).index(index)
    }

    pub fn depth(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.head.as_ref().map(|node| &node.segment)
    }

    /// Segments from root to leaf.
    pub fn segments(&self) -> Vec<&PathSegment> {
        let mut segments = Vec::with_capacity(self.depth());
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            segments.push(&node.segment);
            current = node.parent.as_deref();
        }
        segments.reverse();
        segments
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in self.segments() {
            match segment {
                PathSegment::Type(name) | PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl fmt::Display for LocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for LocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationContext({})", self.render())
    }
}

impl PartialEq for LocationContext {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Eq for LocationContext {}

impl Serialize for LocationContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}
