//! Typed GROQ query builder.
//!
//! A [`Query`] is a tuple of (filter, score, ordering, slice, projection)
//! plus its bound parameters. It renders to GROQ text for the HTTP API and
//! can be evaluated directly by [`MemoryStore`](super::MemoryStore).
//!
//! ```
//! use oakline_storefront::sanity::groq::{Condition, Direction, Param, Projection, Query};
//!
//! let query = Query::documents("product")
//!     .filter(Condition::eq("color", Param("color")))
//!     .param(Param("color"), "walnut")
//!     .order_by("name", Direction::Asc)
//!     .limit(6)
//!     .project(Projection::new().field("_id").field("name"));
//!
//! assert_eq!(
//!     query.render(),
//!     "*[_type == \"product\" && color == $color] | order(name asc)[0...6] {_id, name}"
//! );
//! ```

mod condition;
mod projection;
pub mod text;

use core::fmt;
use std::collections::BTreeMap;
use std::ops::Range;

use serde_json::Value;

pub use condition::{Comparison, Condition, Operand, Param};
pub use projection::{Attribute, Projection};

/// Bound query parameters, keyed by name without the `$` sigil.
pub type Params = BTreeMap<String, Value>;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub path: &'static str,
    pub direction: Direction,
}

/// A weighted scoring clause: `boost(condition, weight)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Boost {
    pub condition: Condition,
    pub weight: u32,
}

/// Which part of the ordered result set to return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slice {
    /// Every matching document.
    #[default]
    All,
    /// `[start...end]`, end exclusive.
    Range(Range<usize>),
    /// `[0]`: the first document or `null`.
    First,
}

/// The document path that holds a relevance score after `score()`.
pub const SCORE_PATH: &str = "_score";

/// A typed GROQ query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    filter: Vec<Condition>,
    boosts: Vec<Boost>,
    order: Vec<OrderBy>,
    slice: Slice,
    projection: Projection,
    params: Params,
}

impl Query {
    /// Start a query over all documents of one type.
    #[must_use]
    pub fn documents(doc_type: &'static str) -> Self {
        Self {
            filter: vec![Condition::doc_type(doc_type)],
            boosts: Vec::new(),
            order: Vec::new(),
            slice: Slice::All,
            projection: Projection::new(),
            params: Params::new(),
        }
    }

    /// AND another clause onto the filter.
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter.push(condition);
        self
    }

    /// Add a weighted scoring clause.
    #[must_use]
    pub fn boost(mut self, condition: Condition, weight: u32) -> Self {
        self.boosts.push(Boost { condition, weight });
        self
    }

    #[must_use]
    pub fn order_by(mut self, path: &'static str, direction: Direction) -> Self {
        self.order.push(OrderBy { path, direction });
        self
    }

    /// Return at most `n` documents.
    #[must_use]
    pub fn limit(self, n: usize) -> Self {
        self.slice(0..n)
    }

    #[must_use]
    pub fn slice(mut self, range: Range<usize>) -> Self {
        self.slice = Slice::Range(range);
        self
    }

    /// Return the first matching document instead of an array.
    #[must_use]
    pub fn first(mut self) -> Self {
        self.slice = Slice::First;
        self
    }

    #[must_use]
    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Bind a parameter value.
    #[must_use]
    pub fn param(mut self, param: Param, value: impl Into<Value>) -> Self {
        self.params.insert(param.name().to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.filter
    }

    #[must_use]
    pub fn boosts(&self) -> &[Boost] {
        &self.boosts
    }

    #[must_use]
    pub fn ordering(&self) -> &[OrderBy] {
        &self.order
    }

    #[must_use]
    pub const fn selection(&self) -> &Slice {
        &self.slice
    }

    #[must_use]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Whether the query returns a single document (or `null`).
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self.slice, Slice::First)
    }

    /// Render the query as GROQ text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*[")?;
        for (i, condition) in self.filter.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{condition}")?;
        }
        f.write_str("]")?;

        if !self.boosts.is_empty() {
            f.write_str(" | score(")?;
            for (i, boost) in self.boosts.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "boost({}, {})", boost.condition, boost.weight)?;
            }
            f.write_str(")")?;
        }

        if !self.order.is_empty() {
            f.write_str(" | order(")?;
            for (i, key) in self.order.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} {}", key.path, key.direction.as_str())?;
            }
            f.write_str(")")?;
        }

        match &self.slice {
            Slice::All => {}
            Slice::Range(range) => write!(f, "[{}...{}]", range.start, range.end)?,
            Slice::First => f.write_str("[0]")?,
        }

        if !self.projection.attributes().is_empty() {
            write!(f, " {}", self.projection)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bare_type_query() {
        assert_eq!(Query::documents("category").render(), "*[_type == \"category\"]");
    }

    #[test]
    fn test_render_single_lookup() {
        let query = Query::documents("product")
            .filter(Condition::eq("slug.current", Param("slug")))
            .param(Param("slug"), "oak-table")
            .first()
            .project(Projection::new().field("_id"));

        assert_eq!(
            query.render(),
            "*[_type == \"product\" && slug.current == $slug][0] {_id}"
        );
        assert!(query.is_single());
        assert_eq!(query.params().get("slug"), Some(&Value::from("oak-table")));
    }

    #[test]
    fn test_render_score_and_multi_key_order() {
        let query = Query::documents("product")
            .boost(Condition::prefix_match("name", Param("q")), 3)
            .boost(Condition::prefix_match("description", Param("q")), 1)
            .order_by(SCORE_PATH, Direction::Desc)
            .order_by("name", Direction::Asc);

        assert_eq!(
            query.render(),
            "*[_type == \"product\"] | score(boost(name match $q + \"*\", 3), boost(description match $q + \"*\", 1)) | order(_score desc, name asc)"
        );
    }

    #[test]
    fn test_later_param_binding_wins() {
        let query = Query::documents("product")
            .param(Param("color"), "oak")
            .param(Param("color"), "walnut");
        assert_eq!(query.params().len(), 1);
        assert_eq!(query.params().get("color"), Some(&Value::from("walnut")));
    }
}
