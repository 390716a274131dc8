use std::collections::HashMap;
use tokio::sync::OnceCell;

use crate::api::client::ApiClient;

/// Session-cached mapping from gate name to tooltip text.
///
/// Loaded at most once per process: the first `ensure_loaded` call
/// issues the request, concurrent callers share it (single-flight),
/// and the result is memoized for the page lifetime. A failed load
/// memoizes an empty table, so tooltips silently stay unavailable for
/// the rest of the session instead of surfacing an error.
#[derive(Debug, Default)]
pub struct TooltipIndex {
    cell: OnceCell<HashMap<String, String>>,
}

impl TooltipIndex {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Builds an already-resolved index, skipping the lazy load.
    pub fn preloaded(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(name, tooltip)| (name.trim().to_string(), tooltip.trim().to_string()))
            .collect();

        Self {
            cell: OnceCell::new_with(Some(map)),
        }
    }

    pub async fn ensure_loaded(&self, client: &ApiClient) -> &HashMap<String, String> {
        self.cell
            .get_or_init(|| async {
                match client.fetch_gate_index().await {
                    Ok(gates) => gates
                        .into_iter()
                        .map(|g| (g.name.trim().to_string(), g.tooltip.trim().to_string()))
                        .collect(),
                    Err(e) => {
                        eprintln!("Tooltip index load failed: {e}");
                        HashMap::new()
                    }
                }
            })
            .await
    }

    /// Exact trimmed match. `None` before the index resolves, after a
    /// failed load, or when the text is empty, never an error.
    pub fn lookup(&self, gate_name: &str) -> Option<&str> {
        self.cell
            .get()
            .and_then(|map| map.get(gate_name.trim()))
            .map(String::as_str)
            .filter(|tooltip| !tooltip.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_before_load_is_none() {
        let index = TooltipIndex::new();
        assert_eq!(index.lookup("18"), None);
    }

    #[test]
    fn lookup_matches_trimmed_names() {
        let index = TooltipIndex::preloaded([(
            " 18 ".to_string(),
            " Gate of Change ".to_string(),
        )]);

        assert_eq!(index.lookup("18"), Some("Gate of Change"));
        assert_eq!(index.lookup(" 18 "), Some("Gate of Change"));
        assert_eq!(index.lookup("19"), None);
    }

    #[test]
    fn empty_tooltip_counts_as_absent() {
        let index = TooltipIndex::preloaded([("7".to_string(), "  ".to_string())]);
        assert_eq!(index.lookup("7"), None);
    }

    #[tokio::test]
    async fn failed_load_memoizes_an_empty_index() {
        let client = match ApiClient::new("http://127.0.0.1:9") {
            Ok(client) => client,
            Err(e) => panic!("client build failed: {e}"),
        };
        let index = TooltipIndex::new();

        assert!(index.ensure_loaded(&client).await.is_empty());
        // Fail-open: lookups keep returning None, no retry, no error
        assert_eq!(index.lookup("18"), None);
        assert!(index.ensure_loaded(&client).await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_result() {
        use std::sync::Arc;

        let client = match ApiClient::new("http://127.0.0.1:9") {
            Ok(client) => client,
            Err(e) => panic!("client build failed: {e}"),
        };
        let index = Arc::new(TooltipIndex::new());

        let a = {
            let index = Arc::clone(&index);
            let client = client.clone();
            tokio::spawn(async move { index.ensure_loaded(&client).await.len() })
        };
        let b = {
            let index = Arc::clone(&index);
            let client = client.clone();
            tokio::spawn(async move { index.ensure_loaded(&client).await.len() })
        };

        let (a, b) = (a.await, b.await);
        assert_eq!(a.ok(), Some(0));
        assert_eq!(b.ok(), Some(0));
    }
}
