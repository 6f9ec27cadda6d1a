//! Debounced suggestion search
//!
//! Live inventory suggestions for a typing user. Each keystroke resets a
//! debounce window; only the query alive at the end of an uninterrupted
//! window issues a lookup. Queries shorter than two characters clear the
//! suggestions without touching the store.
//!
//! In-flight lookups are not cancelled when superseded. Instead every input
//! bumps a generation counter and a response is discarded unless its
//! generation is still the latest, so a slow stale lookup can never
//! overwrite fresher results.

use atelier_client::StoreClient;
use parking_lot::Mutex;
use shared::models::InventoryItem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::services::InventoryService;

/// Quiet period after the last keystroke before a lookup fires
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);
/// Minimum query length that triggers a lookup
pub const MIN_QUERY_LEN: usize = 2;
/// Result cap per lookup
pub const MAX_SUGGESTIONS: u32 = 10;

/// Debounced inventory suggestion search for one user
pub struct SuggestionSearch {
    inventory: InventoryService,
    window: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: watch::Sender<Vec<InventoryItem>>,
}

impl SuggestionSearch {
    pub fn new(client: Arc<dyn StoreClient>, user_id: impl Into<String>) -> Self {
        Self::with_window(client, user_id, DEBOUNCE_WINDOW)
    }

    pub fn with_window(
        client: Arc<dyn StoreClient>,
        user_id: impl Into<String>,
        window: Duration,
    ) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            inventory: InventoryService::new(client, user_id),
            window,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            tx,
        }
    }

    /// Subscribe to suggestion updates
    pub fn subscribe(&self) -> watch::Receiver<Vec<InventoryItem>> {
        self.tx.subscribe()
    }

    /// Current suggestion set
    pub fn suggestions(&self) -> Vec<InventoryItem> {
        self.tx.borrow().clone()
    }

    /// Feed the current query text; call on every keystroke.
    pub fn on_input(&self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // A new keystroke inside the window cancels the pending lookup
        // before it fires; never both run.
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }

        let query = query.trim().to_string();
        if query.len() < MIN_QUERY_LEN {
            // send_replace stores the value even when no receiver is alive,
            // so suggestions() always reflects the latest publication
            self.tx.send_replace(Vec::new());
            return;
        }

        let inventory = self.inventory.clone();
        let gen_counter = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let window = self.window;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if gen_counter.load(Ordering::SeqCst) != generation {
                return;
            }
            // The lookup itself runs detached: superseding input does not
            // abort it, the generation check below discards its result.
            tokio::spawn(async move {
                let items = match inventory.search_suggestions(&query, MAX_SUGGESTIONS).await {
                    Ok(items) => items,
                    Err(e) => {
                        tracing::warn!(error = %e, query = %query, "Suggestion lookup failed");
                        Vec::new()
                    }
                };

                if gen_counter.load(Ordering::SeqCst) == generation {
                    tx.send_replace(items);
                }
            });
        });
        *self.pending.lock() = Some(handle);
    }

    /// Cancel any pending lookup and invalidate in-flight responses.
    ///
    /// Call when the owning view is torn down.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for SuggestionSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
