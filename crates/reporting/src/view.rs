//! Per-view state: load status plus a memoized aggregate of the loaded
//! dataset.

use crate::aggregate::Aggregator;
use crate::memo::Memo;
use insights_core::types::Dataset;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Dataset),
    Failed(String),
}

impl LoadState {
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            LoadState::Loaded(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// One dashboard screen. Each view owns its dataset and its aggregate;
/// nothing is shared between views.
pub struct DashboardView<A: Aggregator> {
    title: &'static str,
    state: LoadState,
    memo: Memo<(Uuid, A::Params), A::Output>,
}

impl<A: Aggregator> DashboardView<A> {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            state: LoadState::Loading,
            memo: Memo::new(A::NAME),
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Swap in a new load outcome. A different dataset gets a different
    /// memo key, so stale aggregates are never returned.
    pub fn set_state(&mut self, state: LoadState) {
        if state.dataset().is_none() {
            self.memo.invalidate();
        }
        self.state = state;
    }

    /// Aggregate for the loaded dataset, `None` while loading or after a
    /// failed load.
    pub fn metrics(&self, params: &A::Params) -> Option<A::Output> {
        let dataset = self.state.dataset()?;
        let key = (dataset.id, params.clone());
        Some(
            self.memo
                .get_or_compute(&key, || A::aggregate(dataset.campaigns(), params)),
        )
    }

    /// Banner text: the view title, or the load error in its place.
    pub fn headline(&self) -> String {
        match &self.state {
            LoadState::Failed(message) => format!("Error loading data: {message}"),
            _ => self.title.to_string(),
        }
    }
}
