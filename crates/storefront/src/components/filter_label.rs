//! Section header for one filter in the product filter panel.

use askama::Template;

use super::ClassList;
use crate::catalog::{FilterKey, FilterParams};

/// A filter section label with an "Active" badge and a clear control.
///
/// The badge and the clear link are rendered only while the filter is
/// active. The clear link points at the current listing with this one
/// filter removed.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "components/filter_label.html")]
pub struct FilterLabel {
    pub label: String,
    pub filter_key: FilterKey,
    pub is_active: bool,
    pub clear_href: String,
}

impl FilterLabel {
    #[must_use]
    pub fn new(label: impl Into<String>, filter_key: FilterKey, is_active: bool) -> Self {
        Self {
            label: label.into(),
            filter_key,
            is_active,
            clear_href: String::new(),
        }
    }

    /// Set the URL the clear control navigates to.
    #[must_use]
    pub fn with_clear_href(mut self, href: impl Into<String>) -> Self {
        self.clear_href = href.into();
        self
    }

    /// One label per filter, with clear links relative to `base_path`.
    #[must_use]
    pub fn for_filters(filters: &FilterParams, base_path: &str) -> Vec<Self> {
        FilterKey::ALL
            .iter()
            .map(|&key| {
                let remaining = filters.without(key).to_query_string();
                let href = if remaining.is_empty() {
                    base_path.to_string()
                } else {
                    format!("{base_path}?{remaining}")
                };
                Self::new(key.label(), key, filters.is_active(key)).with_clear_href(href)
            })
            .collect()
    }

    /// Classes for the label text.
    #[must_use]
    pub fn label_class(&self) -> ClassList {
        ClassList::new()
            .add("block text-sm font-medium")
            .add_if(self.is_active, "text-zinc-900 dark:text-zinc-100")
            .add_if(!self.is_active, "text-zinc-700 dark:text-zinc-300")
    }

    /// Handle a clear action.
    ///
    /// Calls `on_clear` exactly once with this label's key and returns
    /// `true`. Clearing an inactive label does nothing and returns `false`.
    pub fn clear(&self, on_clear: impl FnOnce(FilterKey)) -> bool {
        if !self.is_active {
            return false;
        }
        on_clear(self.filter_key);
        true
    }
}
