//! Field selection.

use core::fmt;
use std::ops::Range;

/// One attribute of a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// `name`
    Field(&'static str),
    /// `"name": path`
    Alias {
        name: &'static str,
        path: &'static str,
    },
    /// `name->{...}`
    Deref {
        name: &'static str,
        projection: Projection,
    },
    /// `"name": source[]{...}` or `"name": source[a...b]{...}`
    Array {
        name: &'static str,
        source: &'static str,
        range: Option<Range<usize>>,
        projection: Projection,
    },
    /// `"name": source[i]{...}`
    Element {
        name: &'static str,
        source: &'static str,
        index: usize,
        projection: Projection,
    },
}

impl Attribute {
    /// The key this attribute produces in the result object.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Field(name)
            | Self::Alias { name, .. }
            | Self::Deref { name, .. }
            | Self::Array { name, .. }
            | Self::Element { name, .. } => *name,
        }
    }
}

/// A typed projection: the shape of every returned document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    attributes: Vec<Attribute>,
}

impl Projection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: &'static str) -> Self {
        self.attributes.push(Attribute::Field(name));
        self
    }

    #[must_use]
    pub fn fields(self, names: &[&'static str]) -> Self {
        names
            .iter()
            .copied()
            .fold(self, |projection, name| projection.field(name))
    }

    #[must_use]
    pub fn alias(mut self, name: &'static str, path: &'static str) -> Self {
        self.attributes.push(Attribute::Alias { name, path });
        self
    }

    #[must_use]
    pub fn deref(mut self, name: &'static str, projection: Self) -> Self {
        self.attributes.push(Attribute::Deref { name, projection });
        self
    }

    #[must_use]
    pub fn array(mut self, name: &'static str, source: &'static str, projection: Self) -> Self {
        self.attributes.push(Attribute::Array {
            name,
            source,
            range: None,
            projection,
        });
        self
    }

    #[must_use]
    pub fn array_slice(
        mut self,
        name: &'static str,
        source: &'static str,
        range: Range<usize>,
        projection: Self,
    ) -> Self {
        self.attributes.push(Attribute::Array {
            name,
            source,
            range: Some(range),
            projection,
        });
        self
    }

    #[must_use]
    pub fn element(
        mut self,
        name: &'static str,
        source: &'static str,
        index: usize,
        projection: Self,
    ) -> Self {
        self.attributes.push(Attribute::Element {
            name,
            source,
            index,
            projection,
        });
        self
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Whether the projection produces the given key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.iter().any(|attr| attr.key() == key)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Alias { name, path } => write!(f, "\"{name}\": {path}"),
            Self::Deref { name, projection } => write!(f, "{name}->{projection}"),
            Self::Array {
                name,
                source,
                range,
                projection,
            } => match range {
                Some(range) => write!(
                    f,
                    "\"{name}\": {source}[{}...{}]{projection}",
                    range.start, range.end
                ),
                None => write!(f, "\"{name}\": {source}[]{projection}"),
            },
            Self::Element {
                name,
                source,
                index,
                projection,
            } => write!(f, "\"{name}\": {source}[{index}]{projection}"),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{attribute}")?;
        }
        f.write_str("}")
    }
}
