//! In-memory evaluation of typed queries over a dataset export.
//!
//! Loads the NDJSON produced by `sanity dataset export` (one document per
//! line) and answers the same [`Query`] values the HTTP client sends, with
//! GROQ semantics for filtering, scoring, ordering, slicing and projection.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::groq::{Attribute, Comparison, Condition, Direction, Operand, Params, Projection, Query, SCORE_PATH, Slice, text};
use super::{ContentStore, SanityError};

/// A read-only document store held in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    documents: Vec<Value>,
    by_id: HashMap<String, usize>,
}

impl MemoryStore {
    /// Build a store from documents. Later documents win on duplicate `_id`.
    #[must_use]
    pub fn new(documents: Vec<Value>) -> Self {
        let by_id = documents
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| Some((doc.get("_id")?.as_str()?.to_owned(), i)))
            .collect();

        Self {
            inner: Arc::new(MemoryStoreInner { documents, by_id }),
        }
    }

    /// Parse an NDJSON dataset export.
    ///
    /// # Errors
    ///
    /// Returns `SanityError::Dataset` naming the first line that is not a
    /// JSON object.
    pub fn from_ndjson(input: &str) -> Result<Self, SanityError> {
        let mut documents = Vec::new();
        for (line_no, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let doc: Value = serde_json::from_str(line)
                .map_err(|e| SanityError::Dataset(format!("line {}: {e}", line_no + 1)))?;
            if !doc.is_object() {
                return Err(SanityError::Dataset(format!(
                    "line {}: expected a document object",
                    line_no + 1
                )));
            }
            documents.push(doc);
        }
        Ok(Self::new(documents))
    }

    /// Load an NDJSON dataset export from disk.
    ///
    /// # Errors
    ///
    /// Returns `SanityError::Dataset` if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, SanityError> {
        let input = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SanityError::Dataset(format!("{}: {e}", path.display())))?;
        let store = Self::from_ndjson(&input)?;
        debug!(path = %path.display(), documents = store.len(), "Loaded dataset export");
        Ok(store)
    }

    /// Number of documents in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.documents.is_empty()
    }

    /// Evaluate a query against the stored documents.
    #[must_use]
    pub fn evaluate(&self, query: &Query) -> Value {
        let params = query.params();

        let mut candidates: Vec<Cow<'_, Value>> = self
            .inner
            .documents
            .iter()
            .filter(|doc| query.conditions().iter().all(|c| self.test(doc, c, params)))
            .map(Cow::Borrowed)
            .collect();

        if !query.boosts().is_empty() {
            candidates = candidates
                .into_iter()
                .map(|doc| {
                    let score: u32 = query
                        .boosts()
                        .iter()
                        .filter(|boost| self.test(&doc, &boost.condition, params))
                        .map(|boost| boost.weight)
                        .sum();
                    let mut doc = doc.into_owned();
                    if let Some(fields) = doc.as_object_mut() {
                        fields.insert(SCORE_PATH.to_owned(), Value::from(score));
                    }
                    Cow::Owned(doc)
                })
                .collect();
        }

        if !query.ordering().is_empty() {
            candidates.sort_by(|a, b| {
                query
                    .ordering()
                    .iter()
                    .map(|key| {
                        let ordering = sort_cmp(self.resolve(a, key.path), self.resolve(b, key.path));
                        match key.direction {
                            Direction::Asc => ordering,
                            Direction::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let projection = query.projection();
        match query.selection() {
            Slice::First => candidates
                .first()
                .map_or(Value::Null, |doc| self.project(doc, projection)),
            Slice::Range(range) => Value::Array(
                candidates
                    .iter()
                    .skip(range.start)
                    .take(range.end.saturating_sub(range.start))
                    .map(|doc| self.project(doc, projection))
                    .collect(),
            ),
            Slice::All => Value::Array(
                candidates
                    .iter()
                    .map(|doc| self.project(doc, projection))
                    .collect(),
            ),
        }
    }

    /// Follow a reference (`{"_ref": id}`) to its document.
    fn dereference<'a>(&'a self, value: &Value) -> Option<&'a Value> {
        let id = value.get("_ref")?.as_str()?;
        self.inner
            .by_id
            .get(id)
            .and_then(|&index| self.inner.documents.get(index))
    }

    /// Resolve a GROQ path such as `category->slug.current`.
    fn resolve<'a>(&'a self, doc: &'a Value, path: &str) -> Option<&'a Value> {
        let mut current = doc;
        for (hop, segment) in path.split("->").enumerate() {
            if hop > 0 {
                current = self.dereference(current)?;
            }
            for key in segment.split('.').filter(|key| !key.is_empty()) {
                current = current.get(key)?;
            }
        }
        (!current.is_null()).then_some(current)
    }

    fn test(&self, doc: &Value, condition: &Condition, params: &Params) -> bool {
        match condition {
            Condition::Compare { path, op, operand } => {
                let (Some(left), Some(right)) = (self.resolve(doc, path), operand_value(operand, params))
                else {
                    return false;
                };
                match op {
                    Comparison::Eq => values_equal(left, right),
                    Comparison::Gt => compare(left, right).is_some_and(Ordering::is_gt),
                    Comparison::Gte => compare(left, right).is_some_and(Ordering::is_ge),
                    Comparison::Lte => compare(left, right).is_some_and(Ordering::is_le),
                }
            }
            Condition::In { path, param } => {
                let Some(left) = self.resolve(doc, path) else {
                    return false;
                };
                params
                    .get(param.name())
                    .and_then(Value::as_array)
                    .is_some_and(|candidates| candidates.iter().any(|c| values_equal(left, c)))
            }
            Condition::Match { path, param } => {
                let Some(text) = self.resolve(doc, path).and_then(Value::as_str) else {
                    return false;
                };
                params
                    .get(param.name())
                    .and_then(Value::as_str)
                    .is_some_and(|term| text::matches(text, &format!("{term}*")))
            }
            Condition::Any(conditions) => conditions.iter().any(|c| self.test(doc, c, params)),
        }
    }

    fn project(&self, doc: &Value, projection: &Projection) -> Value {
        let mut out = Map::new();
        for attribute in projection.attributes() {
            let value = match attribute {
                Attribute::Field(name) => self.resolve(doc, name).cloned(),
                Attribute::Alias { path, .. } => self.resolve(doc, path).cloned(),
                Attribute::Deref { name, projection } => doc
                    .get(*name)
                    .and_then(|reference| self.dereference(reference))
                    .map(|target| self.project(target, projection)),
                Attribute::Array {
                    source,
                    range,
                    projection,
                    ..
                } => doc.get(*source).and_then(Value::as_array).map(|items| {
                    let (skip, take) = range
                        .as_ref()
                        .map_or((0, items.len()), |r| (r.start, r.end.saturating_sub(r.start)));
                    Value::Array(
                        items
                            .iter()
                            .skip(skip)
                            .take(take)
                            .map(|item| self.project(item, projection))
                            .collect(),
                    )
                }),
                Attribute::Element {
                    source,
                    index,
                    projection,
                    ..
                } => doc
                    .get(*source)
                    .and_then(Value::as_array)
                    .and_then(|items| items.get(*index))
                    .map(|item| self.project(item, projection)),
            };
            out.insert(attribute.key().to_owned(), value.unwrap_or(Value::Null));
        }
        Value::Object(out)
    }
}

impl ContentStore for MemoryStore {
    #[instrument(skip_all, fields(documents = self.len()))]
    async fn fetch(&self, query: &Query) -> Result<Value, SanityError> {
        Ok(self.evaluate(query))
    }
}

fn operand_value<'a>(operand: &'a Operand, params: &'a Params) -> Option<&'a Value> {
    match operand {
        Operand::Param(param) => params.get(param.name()),
        Operand::Literal(value) => Some(value),
    }
    .filter(|value| !value.is_null())
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) if left.is_number() && right.is_number() => {
            l.partial_cmp(&r) == Some(Ordering::Equal)
        }
        _ => left == right,
    }
}

/// Compare two values of the same kind; mixed kinds are incomparable.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Total order used by `order()`: numbers, then strings, then booleans,
/// then everything else; missing values sort last.
fn sort_cmp(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    const fn rank(value: &Value) -> u8 {
        match value {
            Value::Number(_) => 0,
            Value::String(_) => 1,
            Value::Bool(_) => 2,
            _ => 3,
        }
    }

    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => {
            compare(l, r).unwrap_or_else(|| rank(l).cmp(&rank(r)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sanity::groq::Param;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            json!({"_id": "cat-sofas", "_type": "category", "title": "Sofas", "slug": {"current": "sofas"}}),
            json!({"_id": "img-1", "_type": "sanity.imageAsset", "url": "https://cdn.example/img-1.jpg"}),
            json!({
                "_id": "p-velvet", "_type": "product", "name": "Velvet Sofa", "price": 899,
                "stock": 3, "category": {"_ref": "cat-sofas"},
                "images": [
                    {"_key": "a", "asset": {"_ref": "img-1"}},
                    {"_key": "b", "asset": {"_ref": "img-missing"}}
                ]
            }),
            json!({"_id": "p-bench", "_type": "product", "name": "Oak Bench", "price": 149.5, "stock": 0,
                   "description": "Pairs well with any sofa"}),
            json!({"_id": "p-lamp", "_type": "product", "name": "Arc Lamp", "price": 210}),
        ])
    }

    fn ids(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|doc| doc["_id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_filter_by_type_and_comparison() {
        let query = Query::documents("product")
            .filter(Condition::gt("stock", 0))
            .project(Projection::new().field("_id"));
        assert_eq!(ids(&store().evaluate(&query)), vec!["p-velvet"]);
    }

    #[test]
    fn test_missing_field_never_satisfies_comparison() {
        let query = Query::documents("product")
            .filter(Condition::lte("stock", 10))
            .project(Projection::new().field("_id"));
        // p-lamp has no stock field
        assert_eq!(ids(&store().evaluate(&query)), vec!["p-velvet", "p-bench"]);
    }

    #[test]
    fn test_dereference_in_filter() {
        let query = Query::documents("product")
            .filter(Condition::eq("category->slug.current", Param("categorySlug")))
            .param(Param("categorySlug"), "sofas")
            .project(Projection::new().field("_id"));
        assert_eq!(ids(&store().evaluate(&query)), vec!["p-velvet"]);
    }

    #[test]
    fn test_unbound_param_matches_nothing() {
        let query = Query::documents("product").filter(Condition::eq("color", Param("color")));
        assert_eq!(store().evaluate(&query), json!([]));
    }

    #[test]
    fn test_membership() {
        let query = Query::documents("product")
            .filter(Condition::is_in("_id", Param("ids")))
            .param(Param("ids"), json!(["p-lamp", "p-unknown"]))
            .project(Projection::new().field("_id"));
        assert_eq!(ids(&store().evaluate(&query)), vec!["p-lamp"]);
    }

    #[test]
    fn test_score_and_order() {
        let query = Query::documents("product")
            .boost(Condition::prefix_match("name", Param("q")), 3)
            .boost(Condition::prefix_match("description", Param("q")), 1)
            .param(Param("q"), "sof")
            .order_by(SCORE_PATH, Direction::Desc)
            .order_by("name", Direction::Asc)
            .project(Projection::new().field("_id").field("_score"));

        let result = store().evaluate(&query);
        assert_eq!(ids(&result), vec!["p-velvet", "p-bench", "p-lamp"]);
        assert_eq!(result[0]["_score"], json!(3));
        assert_eq!(result[1]["_score"], json!(1));
        assert_eq!(result[2]["_score"], json!(0));
    }

    #[test]
    fn test_order_by_number_desc_and_slice() {
        let query = Query::documents("product")
            .order_by("price", Direction::Desc)
            .slice(1..2)
            .project(Projection::new().field("_id"));
        assert_eq!(ids(&store().evaluate(&query)), vec!["p-lamp"]);
    }

    #[test]
    fn test_missing_sort_values_go_last() {
        let query = Query::documents("product")
            .order_by("stock", Direction::Asc)
            .project(Projection::new().field("_id"));
        assert_eq!(ids(&store().evaluate(&query)), vec!["p-bench", "p-velvet", "p-lamp"]);
    }

    #[test]
    fn test_first_returns_null_when_empty() {
        let query = Query::documents("product")
            .filter(Condition::eq("slug.current", Param("slug")))
            .param(Param("slug"), "nope")
            .first();
        assert_eq!(store().evaluate(&query), Value::Null);
    }

    #[test]
    fn test_projection_shapes() {
        let asset = Projection::new().fields(&["_id", "url"]);
        let query = Query::documents("product")
            .filter(Condition::eq("_id", "p-velvet"))
            .first()
            .project(
                Projection::new()
                    .alias("categorySlug", "category->slug.current")
                    .deref("category", Projection::new().field("title"))
                    .array_slice("images", "images", 0..4, Projection::new().field("_key").deref("asset", asset.clone()))
                    .element("image", "images", 0, Projection::new().deref("asset", asset))
                    .field("description"),
            );

        let result = store().evaluate(&query);
        assert_eq!(result["categorySlug"], json!("sofas"));
        assert_eq!(result["category"], json!({"title": "Sofas"}));
        assert_eq!(result["images"][0]["asset"]["url"], json!("https://cdn.example/img-1.jpg"));
        assert_eq!(result["images"][1]["asset"], Value::Null);
        assert_eq!(result["image"]["asset"]["_id"], json!("img-1"));
        assert_eq!(result["description"], Value::Null);
    }

    #[test]
    fn test_from_ndjson_reports_bad_line() {
        let input = "{\"_id\": \"a\"}\n\nnot json\n";
        let err = MemoryStore::from_ndjson(input).err().unwrap();
        assert!(err.to_string().starts_with("Dataset error: line 3"));
    }

    #[test]
    fn test_from_ndjson_skips_blank_lines() {
        let input = "{\"_id\": \"a\", \"_type\": \"product\"}\n\n{\"_id\": \"b\", \"_type\": \"product\"}\n";
        let store = MemoryStore::from_ndjson(input).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_goes_through_content_store() {
        let query = Query::documents("category").project(Projection::new().field("title"));
        let result = store().fetch(&query).await.unwrap();
        assert_eq!(result, json!([{"title": "Sofas"}]));
    }
}
