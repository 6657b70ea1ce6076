//! Per-call credential lookup.
//!
//! Provider availability is never cached: every check goes back to the
//! lookup, so keys added or removed at runtime take effect on the next call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::provider::{ProviderKind, PROVIDER_PRIORITY};

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

#[derive(Clone)]
pub struct CredentialSource {
    lookup: Arc<Lookup>,
}

impl CredentialSource {
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::new(|key| std::env::var(key).ok())
    }

    /// Fixed key/value pairs, mostly for tests and embedding.
    pub fn from_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(move |key| map.get(key).cloned())
    }

    /// Trimmed value of `key`, or `None` when missing or blank.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn api_key(&self, kind: ProviderKind) -> Option<String> {
        self.get(kind.api_key_var())
    }

    pub fn base_url_override(&self, kind: ProviderKind) -> Option<String> {
        self.get(kind.api_url_var())
    }

    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.api_key(kind).is_some()
    }

    /// Configured providers in priority order.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        PROVIDER_PRIORITY
            .into_iter()
            .filter(|kind| self.is_available(*kind))
            .collect()
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSource")
            .field("available", &self.available_providers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_aiml_key_set() {
        let credentials = CredentialSource::from_map([("AIML_API_KEY", "aiml-key")]);
        let available = credentials.available_providers();
        assert_eq!(available, vec![ProviderKind::Aiml]);
        assert!(!available.contains(&ProviderKind::OpenAi));
        assert!(!available.contains(&ProviderKind::OpenRouter));
    }

    #[test]
    fn blank_keys_do_not_count() {
        let credentials = CredentialSource::from_map([
            ("OPENAI_API_KEY", "   "),
            ("OPENROUTER_API_KEY", ""),
        ]);
        assert!(credentials.available_providers().is_empty());
    }

    #[test]
    fn values_are_trimmed() {
        let credentials = CredentialSource::from_map([
            ("OPENAI_API_KEY", " sk-1 \n"),
            ("OPENAI_API_URL", " http://localhost:9999/v1 "),
        ]);
        assert_eq!(credentials.api_key(ProviderKind::OpenAi).as_deref(), Some("sk-1"));
        assert_eq!(
            credentials.base_url_override(ProviderKind::OpenAi).as_deref(),
            Some("http://localhost:9999/v1")
        );
    }

    #[test]
    fn availability_follows_priority_order() {
        let credentials = CredentialSource::from_map([
            ("OPENAI_API_KEY", "a"),
            ("OPENROUTER_API_KEY", "b"),
            ("AIML_API_KEY", "c"),
        ]);
        assert_eq!(credentials.available_providers(), PROVIDER_PRIORITY.to_vec());
    }

    #[test]
    fn lookup_is_consulted_on_every_call() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let present = Arc::new(AtomicBool::new(false));
        let flag = present.clone();
        let credentials = CredentialSource::new(move |key| {
            (key == "AIML_API_KEY" && flag.load(Ordering::SeqCst)).then(|| "k".to_string())
        });

        assert!(!credentials.is_available(ProviderKind::Aiml));
        present.store(true, Ordering::SeqCst);
        assert!(credentials.is_available(ProviderKind::Aiml));
    }
}
