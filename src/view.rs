//! State for the snaps moderation view.
//!
//! All mutation goes through [`SnapsView`] methods invoked from the event
//! loop; spawned API tasks only ever report back through app events.

use std::collections::HashSet;

use crate::api::types::Snap;
use crate::event::ApiResult;
use crate::filter::{FilterCriteria, FilterMode};

// ---------------------------------------------------------------------------
// Load state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready {
        snaps: Vec<Snap>,
        /// Indices into `snaps` that pass the current filter.
        filtered: Vec<usize>,
    },
}

/// A block/unblock call the event loop should dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub snap_id: String,
    pub email: String,
    pub currently_blocked: bool,
}

/// What happened when a toggle response was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied { blocked: bool },
    Failed(String),
    /// The snap is no longer in the list.
    Unknown,
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SnapsView {
    pub load: LoadState,
    pub filter: FilterCriteria,
    pending: HashSet<String>,
    /// Id of the snap shown in the detail overlay.
    detail: Option<String>,
    pub selected_index: usize,
}

impl SnapsView {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            load: LoadState::Loading,
            filter: FilterCriteria::new(mode),
            pending: HashSet::new(),
            detail: None,
            selected_index: 0,
        }
    }

    // -- Loading -------------------------------------------------------------

    /// Apply the result of the initial fetch. Later calls are ignored; the view
    /// never goes back to loading.
    pub fn finish_load(&mut self, result: ApiResult<Vec<Snap>>) {
        if self.load != LoadState::Loading {
            tracing::warn!("ignoring duplicate snap load");
            return;
        }
        self.load = match result {
            Ok(snaps) => {
                let filtered = self.filter.apply(&snaps);
                LoadState::Ready { snaps, filtered }
            }
            Err(e) => LoadState::Failed(e.to_string()),
        };
        self.selected_index = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match self.load {
            LoadState::Failed(ref msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn all_snaps(&self) -> &[Snap] {
        match self.load {
            LoadState::Ready { ref snaps, .. } => snaps.as_slice(),
            _ => &[],
        }
    }

    /// Snaps that pass the current filter, in list order.
    pub fn filtered(&self) -> Vec<&Snap> {
        match self.load {
            LoadState::Ready {
                ref snaps,
                ref filtered,
            } => filtered.iter().map(|&i| &snaps[i]).collect(),
            _ => Vec::new(),
        }
    }

    pub fn filtered_len(&self) -> usize {
        match self.load {
            LoadState::Ready { ref filtered, .. } => filtered.len(),
            _ => 0,
        }
    }

    pub fn find(&self, snap_id: &str) -> Option<&Snap> {
        self.all_snaps().iter().find(|s| s.id == snap_id)
    }

    pub fn selected(&self) -> Option<&Snap> {
        match self.load {
            LoadState::Ready {
                ref snaps,
                ref filtered,
            } => filtered.get(self.selected_index).map(|&i| &snaps[i]),
            _ => None,
        }
    }

    // -- Filtering -----------------------------------------------------------

    /// Recompute the filtered list from scratch and keep the selection in range.
    fn refilter(&mut self) {
        if let LoadState::Ready {
            ref snaps,
            ref mut filtered,
        } = self.load
        {
            *filtered = self.filter.apply(snaps);
            self.selected_index = self.selected_index.min(filtered.len().saturating_sub(1));
        }
    }

    pub fn set_mode(&mut self, mode: FilterMode) {
        self.filter.set_mode(mode);
        self.refilter();
    }

    pub fn set_term(&mut self, term: &str) {
        self.filter.set_term(term);
        self.refilter();
    }

    pub fn set_range(&mut self, start: Option<chrono::NaiveDate>, end: Option<chrono::NaiveDate>) {
        self.filter.set_start(start);
        self.filter.set_end(end);
        self.refilter();
    }

    /// Reset every filter input, keeping the current mode.
    pub fn clear_filter(&mut self) {
        self.filter = FilterCriteria::new(self.filter.mode());
        self.refilter();
    }

    // -- Selection -----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.filtered_len() {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    // -- Block / unblock -----------------------------------------------------

    pub fn is_pending(&self, snap_id: &str) -> bool {
        self.pending.contains(snap_id)
    }

    /// Mark a snap pending and describe the call to make. Returns `None` when
    /// the snap is unknown or already has a call in flight.
    pub fn begin_toggle(&mut self, snap_id: &str) -> Option<ToggleRequest> {
        if self.is_pending(snap_id) {
            return None;
        }
        let snap = self.find(snap_id)?;
        let request = ToggleRequest {
            snap_id: snap.id.clone(),
            email: snap.email.clone(),
            currently_blocked: snap.is_blocked,
        };
        self.pending.insert(request.snap_id.clone());
        Some(request)
    }

    /// Apply a toggle response. On success only the matching snap's
    /// `is_blocked` changes; the pending flag is cleared either way.
    pub fn finish_toggle(&mut self, snap_id: &str, result: ApiResult<bool>) -> ToggleOutcome {
        self.pending.remove(snap_id);

        let blocked = match result {
            Ok(blocked) => blocked,
            Err(e) => return ToggleOutcome::Failed(e.to_string()),
        };

        let LoadState::Ready { ref mut snaps, .. } = self.load else {
            return ToggleOutcome::Unknown;
        };
        let Some(snap) = snaps.iter_mut().find(|s| s.id == snap_id) else {
            return ToggleOutcome::Unknown;
        };
        snap.is_blocked = blocked;
        self.refilter();
        ToggleOutcome::Applied { blocked }
    }

    // -- Detail overlay ------------------------------------------------------

    pub fn open_detail(&mut self, snap_id: &str) {
        if self.find(snap_id).is_some() {
            self.detail = Some(snap_id.to_string());
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail_open(&self) -> bool {
        self.detail.is_some()
    }

    /// The snap shown in the overlay, read live from the full list.
    pub fn detail_snap(&self) -> Option<&Snap> {
        self.detail.as_deref().and_then(|id| self.find(id))
    }
}
