//! Predicate clauses.

use core::fmt;

use serde_json::Value;

/// A named query parameter, rendered as `$name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param(pub &'static str);

impl Param {
    /// The parameter name without the `$` sigil.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A bound query parameter.
    Param(Param),
    /// A constant written into the query text.
    Literal(Value),
}

impl From<Param> for Operand {
    fn from(param: Param) -> Self {
        Self::Param(param)
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Self::Literal(Value::Bool(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<u32> for Operand {
    fn from(value: u32) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<&'static str> for Operand {
    fn from(value: &'static str) -> Self {
        Self::Literal(Value::String(value.to_owned()))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(param) => write!(f, "{param}"),
            // serde_json renders strings quoted and escaped, which is valid GROQ
            Self::Literal(value) => write!(f, "{value}"),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lte,
}

impl Comparison {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }
}

/// A single boolean clause of a document filter.
///
/// Paths use GROQ syntax: `.` for attribute access and `->` to follow a
/// reference, e.g. `category->slug.current`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `path <op> operand`
    Compare {
        path: &'static str,
        op: Comparison,
        operand: Operand,
    },
    /// `path in $param`
    In { path: &'static str, param: Param },
    /// `path match $param + "*"` (prefix match on every term)
    Match { path: &'static str, param: Param },
    /// `(a || b || ...)`
    Any(Vec<Self>),
}

impl Condition {
    /// `_type == "<doc_type>"`
    #[must_use]
    pub fn doc_type(doc_type: &'static str) -> Self {
        Self::eq("_type", doc_type)
    }

    #[must_use]
    pub fn eq(path: &'static str, operand: impl Into<Operand>) -> Self {
        Self::compare(path, Comparison::Eq, operand)
    }

    #[must_use]
    pub fn gt(path: &'static str, operand: impl Into<Operand>) -> Self {
        Self::compare(path, Comparison::Gt, operand)
    }

    #[must_use]
    pub fn gte(path: &'static str, operand: impl Into<Operand>) -> Self {
        Self::compare(path, Comparison::Gte, operand)
    }

    #[must_use]
    pub fn lte(path: &'static str, operand: impl Into<Operand>) -> Self {
        Self::compare(path, Comparison::Lte, operand)
    }

    fn compare(path: &'static str, op: Comparison, operand: impl Into<Operand>) -> Self {
        Self::Compare {
            path,
            op,
            operand: operand.into(),
        }
    }

    /// Membership in an array parameter.
    #[must_use]
    pub const fn is_in(path: &'static str, param: Param) -> Self {
        Self::In { path, param }
    }

    /// Prefix text match against a string parameter.
    #[must_use]
    pub const fn prefix_match(path: &'static str, param: Param) -> Self {
        Self::Match { path, param }
    }

    /// Disjunction of clauses.
    #[must_use]
    pub fn any(conditions: impl IntoIterator<Item = Self>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { path, op, operand } => write!(f, "{path} {} {operand}", op.as_str()),
            Self::In { path, param } => write!(f, "{path} in {param}"),
            Self::Match { path, param } => write!(f, "{path} match {param} + \"*\""),
            Self::Any(conditions) => match conditions.as_slice() {
                [] => f.write_str("false"),
                [single] => write!(f, "{single}"),
                many => {
                    f.write_str("(")?;
                    for (i, condition) in many.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" || ")?;
                        }
                        write!(f, "{condition}")?;
                    }
                    f.write_str(")")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_comparisons() {
        assert_eq!(
            Condition::doc_type("product").to_string(),
            "_type == \"product\""
        );
        assert_eq!(Condition::gt("stock", 0).to_string(), "stock > 0");
        assert_eq!(
            Condition::lte("price", Param("maxPrice")).to_string(),
            "price <= $maxPrice"
        );
        assert_eq!(Condition::eq("featured", true).to_string(), "featured == true");
    }

    #[test]
    fn test_render_match_and_membership() {
        assert_eq!(
            Condition::prefix_match("name", Param("searchQuery")).to_string(),
            "name match $searchQuery + \"*\""
        );
        assert_eq!(
            Condition::is_in("_id", Param("ids")).to_string(),
            "_id in $ids"
        );
    }

    #[test]
    fn test_render_disjunction() {
        let any = Condition::any([
            Condition::prefix_match("name", Param("q")),
            Condition::prefix_match("description", Param("q")),
        ]);
        assert_eq!(
            any.to_string(),
            "(name match $q + \"*\" || description match $q + \"*\")"
        );
        assert_eq!(Condition::any([]).to_string(), "false");
    }

    #[test]
    fn test_literal_strings_are_escaped() {
        assert_eq!(
            Condition::eq("color", "say \"oak\"").to_string(),
            "color == \"say \\\"oak\\\"\""
        );
    }
}
