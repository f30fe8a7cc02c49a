//! Named catalog queries.
//!
//! Each function returns a typed [`Query`] with its parameters already
//! bound. The projections here define the record shapes in
//! [`crate::sanity::types`].

use oakline_core::ProductId;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use super::filters::{FilterParams, SortOrder};
use crate::sanity::groq::{Condition, Direction, Param, Projection, Query, SCORE_PATH};

const PRODUCT: &str = "product";
const CUSTOMER: &str = "customer";

/// Homepage carousel size.
pub const FEATURED_LIMIT: usize = 6;
/// Result cap for shopping assistant searches.
pub const ASSISTANT_LIMIT: usize = 20;
/// Preview images per filtered listing card.
pub const FILTERED_IMAGE_LIMIT: usize = 4;
/// Relevance weight of a name match.
pub const NAME_BOOST: u32 = 3;
/// Relevance weight of a description match.
pub const DESCRIPTION_BOOST: u32 = 1;

pub const CATEGORY_SLUG: Param = Param("categorySlug");
pub const COLOR: Param = Param("color");
pub const MATERIAL: Param = Param("material");
pub const MIN_PRICE: Param = Param("minPrice");
pub const MAX_PRICE: Param = Param("maxPrice");
pub const SEARCH_QUERY: Param = Param("searchQuery");
pub const SLUG: Param = Param("slug");
pub const IDS: Param = Param("ids");
pub const THRESHOLD: Param = Param("threshold");
pub const EMAIL: Param = Param("email");
pub const STRIPE_CUSTOMER_ID: Param = Param("stripeCustomerId");

// =============================================================================
// Projections
// =============================================================================

fn asset() -> Projection {
    Projection::new().fields(&["_id", "url"])
}

/// `{_key, asset->{_id, url}, hotspot}`
fn gallery_image() -> Projection {
    Projection::new()
        .field("_key")
        .deref("asset", asset())
        .field("hotspot")
}

/// `{_key, asset->{_id, url}}`
fn preview_image() -> Projection {
    Projection::new().field("_key").deref("asset", asset())
}

/// `{asset->{_id, url}, hotspot}`
fn primary_image() -> Projection {
    Projection::new().deref("asset", asset()).field("hotspot")
}

/// `{asset->{_id, url}}`
fn thumbnail() -> Projection {
    Projection::new().deref("asset", asset())
}

fn category() -> Projection {
    Projection::new()
        .fields(&["_id", "title"])
        .alias("slug", "slug.current")
}

fn identity() -> Projection {
    Projection::new()
        .fields(&["_id", "name"])
        .alias("slug", "slug.current")
}

fn detail_projection() -> Projection {
    identity()
        .fields(&["description", "price"])
        .array("images", "images", gallery_image())
        .deref("category", category())
        .fields(&[
            "material",
            "color",
            "dimensions",
            "stock",
            "featured",
            "assemblyRequired",
        ])
}

fn featured_projection() -> Projection {
    identity()
        .fields(&["description", "price"])
        .array("images", "images", gallery_image())
        .deref("category", category())
        .field("stock")
}

fn card_projection(with_score: bool) -> Projection {
    let base = Projection::new().field("_id");
    let base = if with_score { base.field(SCORE_PATH) } else { base };
    base.field("name")
        .alias("slug", "slug.current")
        .field("price")
        .element("image", "images", 0, primary_image())
        .deref("category", category())
        .fields(&["material", "color", "stock"])
}

fn filtered_projection() -> Projection {
    identity()
        .field("price")
        .array_slice("images", "images", 0..FILTERED_IMAGE_LIMIT, preview_image())
        .deref("category", category())
        .fields(&["material", "color", "stock"])
}

fn cart_projection() -> Projection {
    identity()
        .field("price")
        .element("image", "images", 0, primary_image())
        .field("stock")
}

fn assistant_projection() -> Projection {
    identity()
        .fields(&["description", "price"])
        .element("image", "images", 0, thumbnail())
        .deref("category", category())
        .fields(&[
            "material",
            "color",
            "dimensions",
            "stock",
            "featured",
            "assemblyRequired",
        ])
}

fn customer_projection() -> Projection {
    Projection::new().fields(&[
        "_id",
        "email",
        "name",
        "clerkUserId",
        "stripeCustomerId",
        "createdAt",
    ])
}

// =============================================================================
// Filters
// =============================================================================

/// Prices bind as JSON numbers so they compare against numeric fields.
fn price_value(price: Decimal) -> Value {
    price.to_f64().map_or(Value::Null, Value::from)
}

/// `name match $searchQuery + "*" || ...` over the given paths.
fn text_search(paths: &[&'static str]) -> Condition {
    Condition::any(
        paths
            .iter()
            .map(|&path| Condition::prefix_match(path, SEARCH_QUERY)),
    )
}

/// AND the active filters onto a query and bind their parameters.
///
/// Inactive filters add neither a clause nor a parameter.
fn apply_filters(mut query: Query, filters: &FilterParams, search_paths: &[&'static str]) -> Query {
    if let Some(term) = filters.search_query() {
        query = query
            .filter(text_search(search_paths))
            .param(SEARCH_QUERY, term);
    }
    if let Some(slug) = filters.category_slug() {
        query = query
            .filter(Condition::eq("category->slug.current", CATEGORY_SLUG))
            .param(CATEGORY_SLUG, slug);
    }
    if let Some(color) = filters.color() {
        query = query
            .filter(Condition::eq("color", COLOR))
            .param(COLOR, color);
    }
    if let Some(material) = filters.material() {
        query = query
            .filter(Condition::eq("material", MATERIAL))
            .param(MATERIAL, material);
    }
    if let Some(min) = filters.min_price() {
        query = query
            .filter(Condition::gte("price", MIN_PRICE))
            .param(MIN_PRICE, price_value(min));
    }
    if let Some(max) = filters.max_price() {
        query = query
            .filter(Condition::lte("price", MAX_PRICE))
            .param(MAX_PRICE, price_value(max));
    }
    if filters.in_stock() {
        query = query.filter(Condition::gt("stock", 0));
    }
    query
}

/// Score name matches above description matches, best first.
fn by_relevance(query: Query) -> Query {
    query
        .boost(Condition::prefix_match("name", SEARCH_QUERY), NAME_BOOST)
        .boost(
            Condition::prefix_match("description", SEARCH_QUERY),
            DESCRIPTION_BOOST,
        )
        .order_by(SCORE_PATH, Direction::Desc)
        .order_by("name", Direction::Asc)
}

// =============================================================================
// Product Queries
// =============================================================================

/// Every product with full detail, by name.
#[must_use]
pub fn all_products() -> Query {
    Query::documents(PRODUCT)
        .order_by("name", Direction::Asc)
        .project(detail_projection())
}

/// In-stock featured products for the homepage carousel.
#[must_use]
pub fn featured_products() -> Query {
    Query::documents(PRODUCT)
        .filter(Condition::eq("featured", true))
        .filter(Condition::gt("stock", 0))
        .order_by("name", Direction::Asc)
        .limit(FEATURED_LIMIT)
        .project(featured_projection())
}

/// Products in one category, by name.
#[must_use]
pub fn products_by_category(category_slug: &str) -> Query {
    Query::documents(PRODUCT)
        .filter(Condition::eq("category->slug.current", CATEGORY_SLUG))
        .param(CATEGORY_SLUG, category_slug)
        .order_by("name", Direction::Asc)
        .project(card_projection(false))
}

/// The product with this slug, or `null`.
#[must_use]
pub fn product_by_slug(slug: &str) -> Query {
    Query::documents(PRODUCT)
        .filter(Condition::eq("slug.current", SLUG))
        .param(SLUG, slug)
        .first()
        .project(detail_projection())
}

/// Relevance-ranked text search over name and description.
///
/// A blank term matches every product, ordered by name.
#[must_use]
pub fn search_products(term: &str) -> Query {
    let term = term.trim();
    let query = Query::documents(PRODUCT).project(card_projection(true));

    if term.is_empty() {
        return query.order_by("name", Direction::Asc);
    }

    by_relevance(
        query
            .filter(text_search(&["name", "description"]))
            .param(SEARCH_QUERY, term),
    )
}

/// Filtered listing in the requested order.
///
/// All orders select the same products. Relevance without a search term
/// has nothing to score and falls back to name order.
#[must_use]
pub fn filtered_products(filters: &FilterParams, sort: SortOrder) -> Query {
    let query = apply_filters(Query::documents(PRODUCT), filters, &["name", "description"])
        .project(filtered_projection());

    match sort {
        SortOrder::Name => query.order_by("name", Direction::Asc),
        SortOrder::PriceAsc => query.order_by("price", Direction::Asc),
        SortOrder::PriceDesc => query.order_by("price", Direction::Desc),
        SortOrder::Relevance if filters.search_query().is_some() => by_relevance(query),
        SortOrder::Relevance => query.order_by("name", Direction::Asc),
    }
}

/// Products with the given ids, in no particular order.
#[must_use]
pub fn products_by_ids(ids: &[ProductId]) -> Query {
    let ids: Vec<Value> = ids.iter().map(|id| Value::from(id.as_str())).collect();
    Query::documents(PRODUCT)
        .filter(Condition::is_in("_id", IDS))
        .param(IDS, ids)
        .project(cart_projection())
}

/// Products with `0 < stock <= threshold`, lowest first.
#[must_use]
pub fn low_stock_products(threshold: u32) -> Query {
    Query::documents(PRODUCT)
        .filter(Condition::gt("stock", 0))
        .filter(Condition::lte("stock", THRESHOLD))
        .param(THRESHOLD, threshold)
        .order_by("stock", Direction::Asc)
        .project(identity().field("stock").element("image", "images", 0, thumbnail()))
}

/// Products with no stock, by name.
#[must_use]
pub fn out_of_stock_products() -> Query {
    Query::documents(PRODUCT)
        .filter(Condition::eq("stock", 0))
        .order_by("name", Direction::Asc)
        .project(identity().element("image", "images", 0, thumbnail()))
}

/// Shopping assistant search.
///
/// Same filters as the listing, but the search term also matches the
/// category title. Results are capped and ordered by name, unscored.
#[must_use]
pub fn assistant_search(filters: &FilterParams) -> Query {
    apply_filters(
        Query::documents(PRODUCT),
        filters,
        &["name", "description", "category->title"],
    )
    .order_by("name", Direction::Asc)
    .limit(ASSISTANT_LIMIT)
    .project(assistant_projection())
}

/// Cheapest possible round trip, for readiness checks.
#[must_use]
pub fn ping() -> Query {
    Query::documents(PRODUCT)
        .first()
        .project(Projection::new().field("_id"))
}

// =============================================================================
// Customer Queries
// =============================================================================

#[must_use]
pub fn customer_by_email(email: &str) -> Query {
    Query::documents(CUSTOMER)
        .filter(Condition::eq("email", EMAIL))
        .param(EMAIL, email)
        .first()
        .project(customer_projection())
}

#[must_use]
pub fn customer_by_stripe_id(stripe_customer_id: &str) -> Query {
    Query::documents(CUSTOMER)
        .filter(Condition::eq("stripeCustomerId", STRIPE_CUSTOMER_ID))
        .param(STRIPE_CUSTOMER_ID, stripe_customer_id)
        .first()
        .project(customer_projection())
}
