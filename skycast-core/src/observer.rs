use crate::{
    category::{AmbientEffectsSink, Category},
    model::RecentSearchRecord,
    state::{SearchState, SummaryState},
};

/// Receives state transitions from a [`SearchOrchestrator`](crate::SearchOrchestrator).
///
/// Every method defaults to a no-op so subscribers implement only what they
/// render. Callbacks run on the task that produced the transition and must
/// not block.
pub trait SearchObserver: Send + Sync {
    fn on_state_change(&self, _state: &SearchState) {}

    fn on_summary_state_change(&self, _state: &SummaryState) {}

    fn on_history_change(&self, _history: &[RecentSearchRecord]) {}

    fn on_category_change(&self, _category: Category) {}
}

/// Forwards category changes to an [`AmbientEffectsSink`] along with the
/// scene for that category.
pub struct AmbientEffects<S> {
    sink: S,
}

impl<S: AmbientEffectsSink> AmbientEffects<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: AmbientEffectsSink> SearchObserver for AmbientEffects<S> {
    fn on_category_change(&self, category: Category) {
        self.sink.apply(category, category.scene());
    }
}
