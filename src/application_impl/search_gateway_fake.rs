use crate::domain_model::{Credential, ItemId, SearchFilters, SearchItem, SiteId};
use crate::domain_port::{GatewayError, SearchGateway};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted gateway: serves one canned batch per call, then keeps repeating
/// the last one. Backs the `fake` search backend for offline runs and lets
/// tests drive the delta engine without a network, including asserting how
/// often the upstream was hit.
pub struct FakeSearchGateway {
    script: Mutex<VecDeque<Vec<SearchItem>>>,
    last: Mutex<Vec<SearchItem>>,
    calls: AtomicUsize,
}

impl FakeSearchGateway {
    pub fn scripted(batches: Vec<Vec<SearchItem>>) -> Self {
        FakeSearchGateway {
            script: Mutex::new(batches.into_iter().collect()),
            last: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A small feed that gains an item on the second poll, for demo runs.
    pub fn demo() -> Self {
        let first = vec![
            demo_item("FAKE001", "Raspberry Pi 4 Model B 4GB", 250_000.0),
            demo_item("FAKE002", "Raspberry Pi Pico W", 38_000.0),
        ];
        let mut second = first.clone();
        second.push(demo_item("FAKE003", "Raspberry Pi 5 8GB", 420_000.0));
        FakeSearchGateway::scripted(vec![first, second])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn demo_item(id: &str, title: &str, price: f64) -> SearchItem {
    SearchItem {
        id: ItemId(id.to_string()),
        title: title.to_string(),
        price,
        currency_id: Some("COP".to_string()),
        permalink: format!("https://example.invalid/{id}"),
        thumbnail: None,
        condition: Some("new".to_string()),
        free_shipping: Some(true),
    }
}

#[async_trait::async_trait]
impl SearchGateway for FakeSearchGateway {
    async fn search(
        &self,
        _query: &str,
        _site: &SiteId,
        filters: &SearchFilters,
        _credential: &Credential,
    ) -> Result<Vec<SearchItem>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let batch = {
            let mut script = self
                .script
                .lock()
                .map_err(|e| GatewayError::Network(e.to_string()))?;
            match script.pop_front() {
                Some(batch) => {
                    let mut last = self
                        .last
                        .lock()
                        .map_err(|e| GatewayError::Network(e.to_string()))?;
                    *last = batch.clone();
                    batch
                }
                None => self
                    .last
                    .lock()
                    .map_err(|e| GatewayError::Network(e.to_string()))?
                    .clone(),
            }
        };

        Ok(filters.apply(batch))
    }
}
