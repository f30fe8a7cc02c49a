//! Catalog query commands.
//!
//! # Environment Variables
//!
//! - `SANITY_PROJECT_ID`, `SANITY_DATASET`, `SANITY_API_VERSION`,
//!   `SANITY_API_TOKEN` - live dataset access (not needed with `--dataset-file`)
//! - `LOW_STOCK_THRESHOLD` - default for `low-stock` (5)

use std::path::Path;

use clap::{Args, Subcommand};
use oakline_core::{Email, EmailError, ProductId};
use oakline_storefront::catalog::{Catalog, CatalogConfig, FilterParams, SortOrder, queries};
use oakline_storefront::config::{ConfigError, SanityConfig};
use oakline_storefront::sanity::groq::Query;
use oakline_storefront::sanity::{ContentStore, MemoryStore, SanityClient, SanityError};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Errors that can occur while running a catalog command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The content store query failed.
    #[error(transparent)]
    Sanity(#[from] SanityError),

    /// The email argument is not a valid address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// `LOW_STOCK_THRESHOLD` is not a number.
    #[error("Invalid LOW_STOCK_THRESHOLD: {0}")]
    InvalidThreshold(String),

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Listing filters. Omitted flags leave the filter off.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Category slug
    #[arg(long)]
    category: Option<String>,

    /// Exact color
    #[arg(long)]
    color: Option<String>,

    /// Exact material
    #[arg(long)]
    material: Option<String>,

    /// Minimum price (inclusive)
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum price (inclusive)
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Prefix search over name and description
    #[arg(long, short = 'q')]
    search: Option<String>,

    /// Only products with stock
    #[arg(long)]
    in_stock: bool,
}

impl FilterArgs {
    fn filters(&self) -> FilterParams {
        FilterParams::new()
            .with_category(self.category.as_deref())
            .with_color(self.color.as_deref())
            .with_material(self.material.as_deref())
            .with_min_price(self.min_price)
            .with_max_price(self.max_price)
            .with_search(self.search.as_deref())
            .with_in_stock(self.in_stock)
    }
}

/// A named catalog query.
#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Every product with full detail
    AllProducts,

    /// Featured, in-stock products (max 6)
    Featured,

    /// Products in a category
    Category {
        /// Category slug
        slug: String,
    },

    /// One product by slug
    Product {
        /// Product slug
        slug: String,
    },

    /// Relevance-ranked search over name and description
    Search {
        /// Search terms
        terms: Vec<String>,
    },

    /// Filtered listing
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// Sort order (`name`, `price-ascending`, `price-descending`, `relevance`)
        #[arg(long, default_value = "name")]
        sort: String,
    },

    /// Resolve product ids (cart lines)
    ByIds {
        /// Product document ids
        ids: Vec<String>,
    },

    /// Products running low (0 < stock <= threshold)
    LowStock {
        /// Override `LOW_STOCK_THRESHOLD`
        #[arg(long)]
        threshold: Option<u32>,
    },

    /// Products with zero stock
    OutOfStock,

    /// Shopping assistant search (max 20, by name)
    Assistant {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Customer by email address
    CustomerByEmail {
        email: String,
    },

    /// Customer by Stripe customer id
    CustomerByStripeId {
        stripe_customer_id: String,
    },
}

/// `LOW_STOCK_THRESHOLD` from the environment or `.env`.
fn threshold_from_env() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("LOW_STOCK_THRESHOLD").ok()
}

/// The flag wins, then the environment value, then the default.
fn parse_threshold(flag: Option<u32>, env: Option<String>) -> Result<u32, CommandError> {
    match (flag, env) {
        (Some(threshold), _) => Ok(threshold),
        (None, Some(value)) => value
            .parse()
            .map_err(|_| CommandError::InvalidThreshold(value)),
        (None, None) => Ok(DEFAULT_LOW_STOCK_THRESHOLD),
    }
}

/// Reject malformed addresses, but bind what was typed.
///
/// Stored emails are matched exactly, so only surrounding whitespace is dropped.
fn email_arg(email: &str) -> Result<&str, CommandError> {
    Email::parse(email)?;
    Ok(email.trim())
}

impl QueryCommand {
    /// Catalog settings for this command.
    ///
    /// Only `low-stock` consults `env`; every other command uses the defaults.
    fn catalog_config(
        &self,
        env: impl FnOnce() -> Option<String>,
    ) -> Result<CatalogConfig, CommandError> {
        match self {
            Self::LowStock { threshold } => Ok(CatalogConfig {
                low_stock_threshold: parse_threshold(*threshold, env())?,
            }),
            _ => Ok(CatalogConfig::default()),
        }
    }

    /// The typed query this command runs.
    fn query(&self) -> Result<Query, CommandError> {
        Ok(match self {
            Self::AllProducts => queries::all_products(),
            Self::Featured => queries::featured_products(),
            Self::Category { slug } => queries::products_by_category(slug),
            Self::Product { slug } => queries::product_by_slug(slug),
            Self::Search { terms } => queries::search_products(&terms.join(" ")),
            Self::Filter { filters, sort } => {
                queries::filtered_products(&filters.filters(), SortOrder::parse(sort))
            }
            Self::ByIds { ids } => queries::products_by_ids(&product_ids(ids)),
            Self::LowStock { threshold } => {
                queries::low_stock_products(parse_threshold(*threshold, threshold_from_env())?)
            }
            Self::OutOfStock => queries::out_of_stock_products(),
            Self::Assistant { filters } => queries::assistant_search(&filters.filters()),
            Self::CustomerByEmail { email } => {
                queries::customer_by_email(email_arg(email)?)
            }
            Self::CustomerByStripeId { stripe_customer_id } => {
                queries::customer_by_stripe_id(stripe_customer_id)
            }
        })
    }

    /// Run against a catalog and print the records.
    async fn run<S: ContentStore>(&self, catalog: &Catalog<S>) -> Result<(), CommandError> {
        match self {
            Self::AllProducts => print_json(&catalog.all_products().await?),
            Self::Featured => print_json(&catalog.featured_products().await?),
            Self::Category { slug } => print_json(&catalog.products_by_category(slug).await?),
            Self::Product { slug } => print_json(&catalog.product_by_slug(slug).await?),
            Self::Search { terms } => {
                print_json(&catalog.search_products(&terms.join(" ")).await?)
            }
            Self::Filter { filters, sort } => print_json(
                &catalog
                    .filtered_products(&filters.filters(), SortOrder::parse(sort))
                    .await?,
            ),
            Self::ByIds { ids } => print_json(&catalog.products_by_ids(&product_ids(ids)).await?),
            Self::LowStock { .. } => {
                let entries = catalog.low_stock_products().await?;
                tracing::info!(
                    count = entries.len(),
                    threshold = catalog.config().low_stock_threshold,
                    "Low stock report"
                );
                print_json(&entries)
            }
            Self::OutOfStock => {
                let entries = catalog.out_of_stock_products().await?;
                tracing::info!(count = entries.len(), "Out of stock report");
                print_json(&entries)
            }
            Self::Assistant { filters } => {
                print_json(&catalog.assistant_search(&filters.filters()).await?)
            }
            Self::CustomerByEmail { email } => {
                print_json(&catalog.customer_by_email(email_arg(email)?).await?)
            }
            Self::CustomerByStripeId { stripe_customer_id } => {
                print_json(&catalog.customer_by_stripe_id(stripe_customer_id).await?)
            }
        }
    }
}

fn product_ids(ids: &[String]) -> Vec<ProductId> {
    ids.iter().map(|id| ProductId::new(id.as_str())).collect()
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a query against the live dataset or a local export.
///
/// # Errors
///
/// Returns an error if configuration is missing, the dataset cannot be
/// loaded, or the query fails.
pub async fn execute(command: &QueryCommand, dataset_file: Option<&Path>) -> Result<(), CommandError> {
    let config = command.catalog_config(threshold_from_env)?;

    if let Some(path) = dataset_file {
        let store = MemoryStore::load(path).await?;
        tracing::info!(path = %path.display(), documents = store.len(), "Using local dataset");
        command.run(&Catalog::new(store, config)).await
    } else {
        let sanity = SanityConfig::from_env()?;
        tracing::info!(project_id = %sanity.project_id, dataset = %sanity.dataset, "Using Sanity API");
        command.run(&Catalog::new(SanityClient::new(&sanity), config)).await
    }
}

/// Print the rendered GROQ and bound parameters for a query.
///
/// # Errors
///
/// Returns an error if the query arguments are invalid.
pub fn print_groq(command: &QueryCommand) -> Result<(), CommandError> {
    let query = command.query()?;
    print_json(&json!({
        "query": query.render(),
        "params": query.params(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_build_params() {
        let args = FilterArgs {
            color: Some("walnut".to_string()),
            min_price: Some(Decimal::from(100)),
            in_stock: true,
            ..FilterArgs::default()
        };
        let filters = args.filters();
        assert_eq!(filters.color(), Some("walnut"));
        assert!(filters.in_stock());
        assert!(filters.category_slug().is_none());
    }

    #[test]
    fn test_threshold_flag_wins() {
        assert_eq!(parse_threshold(Some(2), Some("9".to_string())).unwrap(), 2);
        assert_eq!(parse_threshold(None, Some("9".to_string())).unwrap(), 9);
        assert_eq!(parse_threshold(None, None).unwrap(), DEFAULT_LOW_STOCK_THRESHOLD);

        let command = QueryCommand::LowStock { threshold: Some(2) };
        assert!(command.query().unwrap().render().contains("stock <= $threshold"));
    }

    #[test]
    fn test_bad_threshold_only_fails_low_stock() {
        let bad = || Some("lots".to_string());

        let config = QueryCommand::Featured.catalog_config(bad).unwrap();
        assert_eq!(config.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert!(QueryCommand::OutOfStock.catalog_config(bad).is_ok());

        let low_stock = QueryCommand::LowStock { threshold: None };
        assert!(matches!(
            low_stock.catalog_config(bad),
            Err(CommandError::InvalidThreshold(value)) if value == "lots"
        ));
        let config = QueryCommand::LowStock { threshold: Some(3) }
            .catalog_config(bad)
            .unwrap();
        assert_eq!(config.low_stock_threshold, 3);
    }

    #[test]
    fn test_search_terms_are_joined() {
        let command = QueryCommand::Search {
            terms: vec!["oak".to_string(), "table".to_string()],
        };
        let query = command.query().unwrap();
        assert_eq!(
            query.params().get("searchQuery"),
            Some(&serde_json::Value::from("oak table"))
        );
    }

    #[test]
    fn test_customer_email_keeps_its_case() {
        let command = QueryCommand::CustomerByEmail {
            email: "  Ada@Example.com ".to_string(),
        };
        let query = command.query().unwrap();
        assert_eq!(
            query.params().get("email"),
            Some(&serde_json::Value::from("Ada@Example.com"))
        );
    }

    #[tokio::test]
    async fn test_mixed_case_customer_is_found() {
        let store = MemoryStore::new(vec![json!({
            "_id": "customer-ada",
            "_type": "customer",
            "email": "Ada@Example.com",
            "stripeCustomerId": "cus_ada",
        })]);
        let catalog = Catalog::new(store, CatalogConfig::default());

        let email = email_arg("Ada@Example.com").unwrap();
        let customer = catalog.customer_by_email(email).await.unwrap().unwrap();
        assert_eq!(customer.email, "Ada@Example.com");

        let missing = catalog.customer_by_email(email_arg("ada@example.com").unwrap()).await;
        assert!(missing.unwrap().is_none());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let command = QueryCommand::CustomerByEmail {
            email: "not-an-email".to_string(),
        };
        assert!(matches!(command.query(), Err(CommandError::InvalidEmail(_))));
    }
}
