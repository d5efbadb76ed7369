//! Items that can be bound to a declaration block.

use std::collections::BTreeMap;

/// Something a declaration block can render.
///
/// Implementors name the block they bind to, expose their replacement
/// dictionary by key, and report whether they are deprecated (which drives the
/// `{% deprecated=... %}` line markers).
pub trait Replaceable {
    /// Name of the declaration block this item renders into.
    fn declaration_name(&self) -> &str;

    /// Rendered value for `attribute`, if the item has one.
    fn value(&self, attribute: &str) -> Option<&str>;

    /// Whether the item is deprecated.
    fn is_deprecated(&self) -> bool;
}

/// A plain replacement dictionary bound to a declaration name.
///
/// Useful for ad-hoc renders (summaries, listings) where no richer domain
/// type exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacement {
    declaration_name: String,
    values: BTreeMap<String, String>,
    deprecated: bool,
}

impl Replacement {
    pub fn new(declaration_name: impl Into<String>) -> Self {
        Self {
            declaration_name: declaration_name.into(),
            values: BTreeMap::new(),
            deprecated: false,
        }
    }

    /// Adds a key/value pair, replacing any previous value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl Replaceable for Replacement {
    fn declaration_name(&self) -> &str {
        &self.declaration_name
    }

    fn value(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).map(String::as_str)
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

impl<T: Replaceable + ?Sized> Replaceable for &T {
    fn declaration_name(&self) -> &str {
        (**self).declaration_name()
    }

    fn value(&self, attribute: &str) -> Option<&str> {
        (**self).value(attribute)
    }

    fn is_deprecated(&self) -> bool {
        (**self).is_deprecated()
    }
}
