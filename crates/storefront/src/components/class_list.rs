//! CSS class composition.

use core::fmt;

/// An ordered, de-duplicated list of CSS classes.
///
/// Adding a class that is already present moves it to the end, so the last
/// occurrence wins.
///
/// ```
/// use oakline_storefront::components::ClassList;
///
/// let classes = ClassList::new()
///     .add("block text-sm  font-medium")
///     .add_if(false, "text-zinc-900")
///     .add_if(true, "text-zinc-700 block");
/// assert_eq!(classes.to_string(), "text-sm font-medium text-zinc-700 block");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Add whitespace-separated classes. Empty input is ignored.
    #[must_use]
    pub fn add(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.classes.retain(|existing| existing != class);
            self.classes.push(class.to_string());
        }
        self
    }

    /// Add classes only when `condition` holds.
    #[must_use]
    pub fn add_if(self, condition: bool, classes: &str) -> Self {
        if condition { self.add(classes) } else { self }
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ClassList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::add)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.classes.join(" "))
    }
}
