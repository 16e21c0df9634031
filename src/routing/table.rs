//! Flat route table.
//!
//! Entries are keyed by their literal pattern string and kept in registration
//! order. Re-registering a pattern replaces the target in place, so the
//! entry keeps its first position for the regex tier.

use {
    super::pattern::RoutePattern,
    crate::Result,
    regex::Regex,
    std::collections::HashMap,
};

/// A pattern bound to a handler and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub handler: String,
    pub action: String,
}

impl RouteEntry {
    pub fn new(
        pattern: RoutePattern,
        handler: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            pattern,
            handler: handler.into(),
            action: action.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct TableSlot {
    entry: RouteEntry,
    // Static patterns are served by the exact tier and never get a regex.
    regex: Option<Regex>,
}

/// Route table with exact lookup and ordered regex candidates.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    slots: Vec<TableSlot>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for its pattern string.
    ///
    /// Returns the entry previously bound to the same pattern, if any.
    pub fn insert(&mut self, entry: RouteEntry) -> Result<Option<RouteEntry>> {
        let regex = if entry.pattern.is_static() {
            None
        } else {
            Some(Regex::new(&entry.pattern.to_regex())?)
        };
        let slot = TableSlot { entry, regex };

        let existing = self.index.get(slot.entry.pattern.as_str()).copied();
        if let Some(position) = existing {
            let previous = std::mem::replace(&mut self.slots[position], slot);
            return Ok(Some(previous.entry));
        }

        self.index
            .insert(slot.entry.pattern.as_str().to_string(), self.slots.len());
        self.slots.push(slot);
        Ok(None)
    }

    /// Inserts the entry only when no entry claims its pattern yet.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, entry: RouteEntry) -> Result<bool> {
        if self.contains(entry.pattern.as_str()) {
            return Ok(false);
        }
        self.insert(entry)?;
        Ok(true)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.index.contains_key(pattern)
    }

    /// Exact lookup by literal pattern string.
    pub fn get(&self, pattern: &str) -> Option<&RouteEntry> {
        self.index
            .get(pattern)
            .map(|&position| &self.slots[position].entry)
    }

    /// Tests the route against each parameterized pattern in registration
    /// order. The first match wins; patterns are not ranked by specificity.
    pub fn match_regex(&self, route: &str) -> Option<(&RouteEntry, HashMap<String, String>)> {
        self.slots.iter().find_map(|slot| {
            let regex = slot.regex.as_ref()?;
            let captures = regex.captures(route)?;
            let params = regex
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|value| (name.to_string(), value.as_str().to_string()))
                })
                .collect();
            Some((&slot.entry, params))
        })
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.slots.iter().map(|slot| &slot.entry)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// Regexes are derived from the patterns, so comparing entries is enough.
impl PartialEq for RouteTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for RouteTable {}
