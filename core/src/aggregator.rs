//! Debounced, dual-locale address autocomplete.
//!
//! # Design
//! Every `submit_query` arms one task: sleep for the debounce interval, then
//! fan out a localized and an English request, join both, merge, publish.
//! The task's `JoinHandle` is the cancellation handle; arming a new task
//! aborts the previous one and bumps a generation counter. A round publishes
//! only while its generation is still current, checked under the same lock
//! that `submit_query` and `clear` take, so a superseded round can never
//! overwrite newer state.
//!
//! Published state lives in a `watch` channel owned by the instance. A failed
//! round leaves the previous suggestions in place and only clears `loading`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::places::{merge_suggestions, PlacesClient};
use crate::transport::Transport;
use crate::types::{LocaleSettings, PlacePrediction, Suggestion};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What a UI renders: the current suggestions and whether a round is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    pub suggestions: Vec<Suggestion>,
    pub loading: bool,
}

struct Control {
    generation: u64,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    session_token: Option<Uuid>,
}

struct Shared {
    client: PlacesClient,
    transport: Arc<dyn Transport>,
    locale: LocaleSettings,
    state: watch::Sender<SuggestionState>,
    control: Mutex<Control>,
}

/// Owns the published suggestion list for one address field.
pub struct AutocompleteAggregator {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl AutocompleteAggregator {
    /// Captures the current Tokio runtime; methods may then be called from
    /// any thread.
    ///
    /// # Panics
    /// When called outside a Tokio runtime.
    pub fn new(
        client: PlacesClient,
        transport: Arc<dyn Transport>,
        locale: LocaleSettings,
    ) -> Self {
        Self::with_runtime(client, transport, locale, Handle::current())
    }

    pub fn with_runtime(
        client: PlacesClient,
        transport: Arc<dyn Transport>,
        locale: LocaleSettings,
        runtime: Handle,
    ) -> Self {
        let (state, _) = watch::channel(SuggestionState::default());
        Self {
            shared: Arc::new(Shared {
                client,
                transport,
                locale,
                state,
                control: Mutex::new(Control {
                    generation: 0,
                    debounce: DEFAULT_DEBOUNCE,
                    pending: None,
                    session_token: None,
                }),
            }),
            runtime,
        }
    }

    /// Override the quiet period for every round armed from now on.
    pub fn with_debounce(self, debounce: Duration) -> Self {
        self.shared.control.lock().debounce = debounce;
        self
    }

    /// Restart the debounce for `text`. Blank text clears the list at once
    /// and schedules nothing.
    pub fn submit_query(&self, text: &str) {
        let mut control = self.shared.control.lock();
        control.generation += 1;
        if let Some(pending) = control.pending.take() {
            pending.abort();
        }

        if text.trim().is_empty() {
            self.shared.state.send_modify(|s| {
                s.suggestions.clear();
                s.loading = false;
            });
            return;
        }

        let generation = control.generation;
        let debounce = control.debounce;
        let shared = Arc::clone(&self.shared);
        let text = text.to_string();
        control.pending = Some(self.runtime.spawn(shared.run_round(generation, debounce, text)));
    }

    /// Cancel pending work, empty the list and end the provider session.
    pub fn clear(&self) {
        let mut control = self.shared.control.lock();
        control.generation += 1;
        control.session_token = None;
        if let Some(pending) = control.pending.take() {
            pending.abort();
        }
        self.shared.state.send_modify(|s| {
            s.suggestions.clear();
            s.loading = false;
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> SuggestionState {
        self.shared.state.borrow().clone()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.shared.state.borrow().suggestions.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }
}

impl Drop for AutocompleteAggregator {
    fn drop(&mut self) {
        if let Some(pending) = self.shared.control.lock().pending.take() {
            pending.abort();
        }
    }
}

impl Shared {
    async fn run_round(self: Arc<Self>, generation: u64, debounce: Duration, text: String) {
        tokio::time::sleep(debounce).await;

        let Some(session_token) = self.begin_round(generation) else {
            return;
        };
        let outcome = self.fetch_merged(&text, session_token).await;
        self.finish_round(generation, &text, outcome);
    }

    /// Mark the round as loading if it is still current; hands out the
    /// session token both requests share.
    fn begin_round(&self, generation: u64) -> Option<Uuid> {
        let mut control = self.control.lock();
        if control.generation != generation {
            return None;
        }
        let token = *control.session_token.get_or_insert_with(Uuid::new_v4);
        self.state.send_modify(|s| s.loading = true);
        Some(token)
    }

    fn finish_round(
        &self,
        generation: u64,
        text: &str,
        outcome: Result<Vec<Suggestion>, ApiError>,
    ) {
        let control = self.control.lock();
        if control.generation != generation {
            debug!(query = text, "discarding superseded autocomplete round");
            return;
        }
        match outcome {
            Ok(suggestions) => {
                info!(query = text, count = suggestions.len(), "autocomplete round published");
                self.state.send_modify(|s| {
                    s.suggestions = suggestions;
                    s.loading = false;
                });
            }
            Err(e) => {
                warn!(
                    query = text,
                    error = %e,
                    "autocomplete round failed, keeping previous suggestions"
                );
                self.state.send_modify(|s| s.loading = false);
            }
        }
    }

    async fn fetch_merged(
        &self,
        text: &str,
        session_token: Uuid,
    ) -> Result<Vec<Suggestion>, ApiError> {
        let localized = self
            .client
            .build_autocomplete(&self.locale.localized_query(text, Some(session_token)))?;
        let english = self
            .client
            .build_autocomplete(&self.locale.english_query(text, Some(session_token)))?;

        let (localized, english) = tokio::join!(self.fetch(localized), self.fetch(english));
        Ok(merge_suggestions(localized?, english?))
    }

    async fn fetch(&self, request: HttpRequest) -> Result<Vec<PlacePrediction>, ApiError> {
        let response = self.transport.execute(request).await?;
        self.client.parse_autocomplete(response)
    }
}
