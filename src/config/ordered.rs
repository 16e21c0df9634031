use {
    serde::de::{Deserialize, Deserializer, MapAccess, Visitor},
    std::{fmt, marker::PhantomData},
};

///
/// A string-keyed table that remembers insertion order.
///
/// Route registration order decides which parameterized pattern wins when
/// several match, so configuration tables must keep the order in which they
/// were written. Deserializing from TOML visits keys in document order.
/// Re-inserting an existing key replaces its value in place.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedTable<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedTable<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedTable<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for TableVisitor<V> {
            type Value = OrderedTable<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = OrderedTable::new();
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    table.insert(key, value);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        table: OrderedTable<u32>,
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let wrapper: Wrapper = toml::from_str(
            r#"
[table]
zeta = 1
alpha = 2
"/items/<id>" = 3
"#,
        )
        .unwrap();
        let keys: Vec<_> = wrapper.table.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "/items/<id>"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table: OrderedTable<u32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(table.insert("a", 10), Some(1));
        assert_eq!(table.iter().collect::<Vec<_>>(), [("a", &10), ("b", &2)]);
        assert!(table.contains_key("b"));
        assert_eq!(table.len(), 2);
    }
}
