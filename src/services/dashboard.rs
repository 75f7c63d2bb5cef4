//! Movers dashboard controller
//!
//! Holds the latest movers snapshot and the view/filter selection, and hands
//! out card lists for rendering. Cards are recomputed in full whenever the
//! snapshot or the selection changes; otherwise the last result is reused.

use crate::models::{ActiveView, CardStats, Filter, MarketCapCategory, MoversSnapshot, MoversViewState};
use crate::services::movers::MoversAggregator;
use tracing::debug;

/// Receiver for "user picked a ticker" notifications
pub trait StockSelectHandler {
    fn on_select_stock(&mut self, symbol: &str);
}

impl<F> StockSelectHandler for F
where
    F: FnMut(&str),
{
    fn on_select_stock(&mut self, symbol: &str) {
        self(symbol)
    }
}

/// Inputs the memoized cards were computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoKey {
    data_version: u64,
    view_version: u64,
}

pub struct MoversDashboard {
    snapshot: MoversSnapshot,
    state: MoversViewState,
    data_version: u64,
    view_version: u64,
    memo: Option<(MemoKey, Vec<CardStats>)>,
    on_select: Option<Box<dyn StockSelectHandler + Send>>,
}

impl Default for MoversDashboard {
    fn default() -> Self {
        Self::new(MoversSnapshot::default())
    }
}

impl MoversDashboard {
    pub fn new(snapshot: MoversSnapshot) -> Self {
        Self {
            snapshot,
            state: MoversViewState::default(),
            data_version: 0,
            view_version: 0,
            memo: None,
            on_select: None,
        }
    }

    pub fn state(&self) -> &MoversViewState {
        &self.state
    }

    /// Replace the movers data (e.g. after a refresh)
    pub fn set_snapshot(&mut self, snapshot: MoversSnapshot) {
        self.snapshot = snapshot;
        self.data_version += 1;
    }

    pub fn set_active_view(&mut self, view: ActiveView) {
        if self.state.set_active_view(view) {
            self.view_version += 1;
        }
    }

    pub fn select_market_cap(&mut self, filter: Filter<MarketCapCategory>) {
        if self.state.select_market_cap(filter) {
            self.view_version += 1;
        }
    }

    pub fn select_sector(&mut self, filter: Filter<String>) {
        if self.state.select_sector(filter) {
            self.view_version += 1;
        }
    }

    /// Register the ticker selection callback
    pub fn on_select_stock<H>(&mut self, handler: H)
    where
        H: StockSelectHandler + Send + 'static,
    {
        self.on_select = Some(Box::new(handler));
    }

    /// Notify the registered handler; a no-op when none is registered
    pub fn select_stock(&mut self, symbol: &str) {
        match self.on_select.as_mut() {
            Some(handler) => handler.on_select_stock(symbol),
            None => debug!("No stock select handler registered, ignoring {}", symbol),
        }
    }

    /// Cards for the current snapshot and selection
    pub fn cards(&mut self) -> &[CardStats] {
        let key = MemoKey {
            data_version: self.data_version,
            view_version: self.view_version,
        };

        let stale = !matches!(&self.memo, Some((cached, _)) if *cached == key);
        if stale {
            debug!(
                "Recomputing cards (data v{}, view v{}, view={})",
                key.data_version,
                key.view_version,
                self.state.active_view()
            );
            let cards = MoversAggregator::cards_for_view(&self.snapshot, &self.state);
            self.memo = Some((key, cards));
        }

        match &self.memo {
            Some((_, cards)) => cards,
            None => &[],
        }
    }

    /// Whether the next `cards()` call will reuse the previous result
    pub fn is_cached(&self) -> bool {
        matches!(
            &self.memo,
            Some((cached, _)) if cached.data_version == self.data_version
                && cached.view_version == self.view_version
        )
    }
}
