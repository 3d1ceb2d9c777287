use serde::Serialize;

use crate::catalog::{ProviderCatalog, ProviderFamily};

/// Public view of a catalog entry, for dropdowns and autocomplete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    /// Canonical key
    pub key: &'static str,
    /// Display name
    pub label: &'static str,
    /// Platform family tag
    pub family: ProviderFamily,
    /// Optional free text
    pub description: Option<&'static str>,
}

impl ProviderCatalog {
    /// Catalog entries in catalog order, optionally narrowed to those whose key
    /// or label contains `filter` (case-insensitive). An empty filter keeps all.
    pub fn directory(&self, filter: Option<&str>) -> Vec<ProviderInfo> {
        let needle = filter
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.descriptors()
            .iter()
            .filter(|descriptor| match &needle {
                Some(needle) => {
                    descriptor.key.to_lowercase().contains(needle.as_str())
                        || descriptor.label.to_lowercase().contains(needle.as_str())
                }
                None => true,
            })
            .map(|descriptor| ProviderInfo {
                key: descriptor.key,
                label: descriptor.label,
                family: descriptor.family,
                description: descriptor.description,
            })
            .collect()
    }
}
