use tracing::debug;

use crate::catalog::{ProviderCatalog, ProviderDescriptor};
use crate::error::ResolveError;

impl ProviderCatalog {
    /// Resolves free-form provider text to exactly one provider.
    ///
    /// Missing or blank input selects the default provider. An exact key or
    /// alias match always wins; otherwise every name containing the input
    /// (prefix matches included) is collected, and the input resolves only
    /// when all of them belong to a single provider.
    pub fn resolve(&self, input: Option<&str>) -> Result<&ProviderDescriptor, ResolveError> {
        let Some(raw) = input else {
            return Ok(self.default_provider());
        };

        let query = raw.trim().to_lowercase();
        if query.is_empty() {
            return Ok(self.default_provider());
        }

        if let Some(key) = self.alias_index().lookup(&query) {
            return Ok(self.descriptor_for(key));
        }

        let mut matches: Vec<&'static str> = Vec::new();
        for (alias, key) in self.alias_index().entries() {
            if (alias.starts_with(&query) || alias.contains(&query)) && !matches.contains(&key) {
                matches.push(key);
            }
        }

        match matches.as_slice() {
            [key] => {
                debug!("Provider {:?} autocompleted to {}", raw, key);
                Ok(self.descriptor_for(key))
            }
            [] => Err(ResolveError::UnknownProvider {
                input: raw.to_string(),
                providers: self.sorted_keys(),
            }),
            _ => {
                let mut matches: Vec<String> = matches.iter().map(|key| key.to_string()).collect();
                matches.sort();
                Err(ResolveError::AmbiguousProvider {
                    input: raw.to_string(),
                    matches,
                })
            }
        }
    }

    fn descriptor_for(&self, key: &str) -> &ProviderDescriptor {
        // The alias index is built from this catalog, so every key it yields is present.
        self.get(key).unwrap_or_else(|| self.default_provider())
    }
}
