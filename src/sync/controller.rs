use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::watch;

use super::SyncStatus;
use super::schedule::RefreshHandle;
use super::store::LinkStore;
use crate::auth::Authorizer;
use crate::config::BoardConfig;
use crate::core::filter::{CategoryFilter, Projection, ViewState};
use crate::core::link::{LinkRecord, NewLink};
use crate::core::theme::Theme;
use crate::error::{BoardError, StoreError};

/// Everything the board shows, published to subscribers on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Authoritative copy of the remote collection, newest first.
    pub links: Arc<Vec<LinkRecord>>,
    pub view: ViewState,
    pub projection: Projection,
    pub status: SyncStatus,
}

impl BoardState {
    fn reproject(&mut self) {
        self.projection = Projection::build(&self.links, &self.view);
    }
}

/// What a call to [`SyncController::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No store attached yet; nothing happened.
    NotReady,
    /// The collection was replaced with `count` records.
    Replaced { count: usize },
    /// A background refresh failed and was only logged.
    Suppressed,
}

struct Inner<S> {
    store: OnceLock<S>,
    authorizer: Box<dyn Authorizer>,
    reset_view_on_add: bool,
    state: watch::Sender<BoardState>,
}

/// Owns the board state for one session and keeps it in step with the store.
///
/// Clones share the same state, so a clone can be moved into the periodic
/// refresh task.
pub struct SyncController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SyncController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: LinkStore> SyncController<S> {
    pub fn new(authorizer: Box<dyn Authorizer>, view: ViewState, reset_view_on_add: bool) -> Self {
        let state = BoardState {
            view,
            ..BoardState::default()
        };
        let (state, _) = watch::channel(state);
        Self {
            inner: Arc::new(Inner {
                store: OnceLock::new(),
                authorizer,
                reset_view_on_add,
                state,
            }),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let view = ViewState {
            theme: config.theme,
            ..ViewState::default()
        };
        Self::new(config.authorizer(), view, config.reset_view_on_add)
    }

    /// Install the store client once its secrets have loaded. Only the first
    /// call takes effect; returns whether this one did.
    pub fn attach_store(&self, store: S) -> bool {
        if self.inner.store.set(store).is_err() {
            log::warn!("Link store already attached; ignoring");
            return false;
        }
        log::info!("Link store attached");
        true
    }

    pub fn is_ready(&self) -> bool {
        self.inner.store.get().is_some()
    }

    fn store(&self) -> Result<&S, BoardError> {
        self.inner.store.get().ok_or(BoardError::ConfigNotReady)
    }

    pub fn snapshot(&self) -> BoardState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.inner.state.subscribe()
    }

    fn set_status(&self, status: SyncStatus) {
        self.inner.state.send_modify(|state| state.status = status);
    }

    /// Reload the whole collection from the store.
    ///
    /// A foreground refresh shows `Syncing` while in flight and reports
    /// failure both as `SyncStatus::Error` and as the returned error. A
    /// background refresh never touches the status on failure and returns
    /// `Suppressed`. Either way a failure leaves the current links in place.
    pub async fn refresh(&self, background: bool) -> Result<RefreshOutcome, BoardError> {
        let Ok(store) = self.store() else {
            log::debug!("Refresh skipped: link store not configured yet");
            return Ok(RefreshOutcome::NotReady);
        };

        if !background {
            self.set_status(SyncStatus::Syncing);
        }

        match store.fetch_all().await {
            Ok(links) => {
                let count = links.len();
                let links = Arc::new(links);
                let now = chrono::Local::now().format("%H:%M").to_string();
                self.inner.state.send_modify(|state| {
                    state.links = links;
                    state.reproject();
                    if !background || state.status != SyncStatus::Syncing {
                        state.status = SyncStatus::LastSynced(now);
                    }
                });
                log::debug!(
                    "{} refresh: {} links",
                    if background { "Background" } else { "Foreground" },
                    count
                );
                Ok(RefreshOutcome::Replaced { count })
            }
            Err(e) if background => {
                log::warn!("Background refresh failed: {}", e);
                Ok(RefreshOutcome::Suppressed)
            }
            Err(e) => {
                log::error!("Refresh failed: {}", e);
                self.set_status(SyncStatus::Error(e.to_string()));
                Err(BoardError::Sync(e))
            }
        }
    }

    /// Start refreshing in the background every `period`.
    pub fn schedule_periodic_refresh(&self, period: Duration) -> RefreshHandle {
        RefreshHandle::spawn(self.clone(), period)
    }

    /// Initial foreground load, then periodic refreshes.
    ///
    /// Polling starts even when the first load fails: that failure has
    /// already been reported and a later tick may succeed.
    pub async fn start(
        &self,
        period: Duration,
    ) -> (Result<RefreshOutcome, BoardError>, RefreshHandle) {
        let first = self.refresh(false).await;
        (first, self.schedule_periodic_refresh(period))
    }

    /// Publish a new link. It shows up after the refresh that follows; the
    /// list is never patched locally.
    pub async fn add_record(&self, title: &str, url: &str, category: &str) -> Result<(), BoardError> {
        let title = title.trim();
        let url = url.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("title"));
        }
        if url.is_empty() {
            return Err(BoardError::Validation("url"));
        }

        let store = self.store()?;
        let link = NewLink::new(title, url, category);
        store.insert(&link).await.map_err(write_error)?;

        if self.inner.reset_view_on_add {
            self.update_view(ViewState::reset_filters);
        }
        self.refresh_after_write().await;
        Ok(())
    }

    /// Delete a link if `auth_token` is accepted as the admin secret.
    pub async fn delete_record(&self, id: i64, auth_token: &str) -> Result<(), BoardError> {
        if !self.inner.authorizer.authorize(auth_token) {
            log::warn!("Rejected delete of link {}: bad admin token", id);
            return Err(BoardError::Auth);
        }

        let store = self.store()?;
        store.delete(id).await.map_err(write_error)?;

        self.refresh_after_write().await;
        Ok(())
    }

    /// The write already went through, so a failed reload is reported in
    /// the status rather than as a failure of the write.
    async fn refresh_after_write(&self) {
        if let Err(e) = self.refresh(false).await {
            log::warn!("Reload after write failed: {}", e);
        }
    }

    fn update_view(&self, f: impl FnOnce(&mut ViewState)) {
        self.inner.state.send_modify(|state| {
            f(&mut state.view);
            state.reproject();
        });
    }

    pub fn set_category(&self, category: CategoryFilter) {
        self.update_view(|view| view.category = category);
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.update_view(|view| view.search = search);
    }

    pub fn set_theme(&self, theme: Theme) {
        self.inner.state.send_modify(|state| state.view.theme = theme);
    }

    /// Switch to the next theme and return it.
    pub fn cycle_theme(&self) -> Theme {
        let mut next = Theme::default();
        self.inner.state.send_modify(|state| {
            next = state.view.theme.next();
            state.view.theme = next;
        });
        next
    }
}

fn write_error(e: StoreError) -> BoardError {
    log::error!("Write to link store failed: {}", e);
    BoardError::Write(e)
}
