use std::collections::HashMap;

use crate::catalog::{CatalogError, ProviderDescriptor};

/// Lower-cased provider names (keys and aliases) mapped to canonical keys
#[derive(Debug, Default)]
pub struct AliasIndex {
    lookup: HashMap<String, &'static str>,
    entries: Vec<(String, &'static str)>,
}

impl AliasIndex {
    /// Indexes every key and alias of `descriptors`.
    ///
    /// A name repeated within one descriptor is indexed once; a name shared by
    /// two descriptors is a [`CatalogError::Collision`].
    pub fn build(descriptors: &[ProviderDescriptor]) -> Result<Self, CatalogError> {
        let mut index = Self::default();

        for descriptor in descriptors {
            let names = std::iter::once(descriptor.key).chain(descriptor.aliases.iter().copied());

            for name in names {
                let name = name.to_lowercase();
                match index.lookup.get(&name) {
                    Some(&owner) if owner == descriptor.key => continue,
                    Some(&owner) => {
                        return Err(CatalogError::Collision {
                            name,
                            first: owner.to_string(),
                            second: descriptor.key.to_string(),
                        });
                    }
                    None => {
                        index.lookup.insert(name.clone(), descriptor.key);
                        index.entries.push((name, descriptor.key));
                    }
                }
            }
        }

        Ok(index)
    }

    /// Exact lookup of an already normalized name
    pub fn lookup(&self, normalized: &str) -> Option<&'static str> {
        self.lookup.get(normalized).copied()
    }

    /// Every `(name, canonical key)` pair in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries.iter().map(|(name, key)| (name.as_str(), *key))
    }

    /// Number of indexed names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
