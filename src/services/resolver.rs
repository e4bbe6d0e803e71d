use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::errors::ResolveError;
use crate::storage::{LinkField, LinkRecord, LinkStore};
use crate::utils::{canonicalize_code, is_valid_short_code};

/// Maps a short code to its [`LinkRecord`].
#[derive(Clone)]
pub struct CodeResolver {
    store: Arc<dyn LinkStore>,
}

impl CodeResolver {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Exactly one store query per call; no mutation.
    ///
    /// Codes are compared in canonical (lowercase) form. A code that cannot
    /// exist is `NotFound` without a store round trip. If the store returns
    /// several records, the first in store order wins.
    pub async fn resolve(&self, code: &str) -> Result<LinkRecord, ResolveError> {
        let code = canonicalize_code(code);
        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {:?}", code);
            return Err(ResolveError::NotFound);
        }

        let matches = self
            .store
            .query_by_field(LinkField::ShortCode, &code)
            .await
            .map_err(|e| {
                error!("Store query failed while resolving '{}': {}", code, e);
                ResolveError::Infra(e)
            })?;

        if matches.len() > 1 {
            debug!(
                "{} records share short code '{}', using the oldest",
                matches.len(),
                code
            );
        }

        matches.into_iter().next().ok_or_else(|| {
            debug!("Short code not found: {}", code);
            ResolveError::NotFound
        })
    }
}
