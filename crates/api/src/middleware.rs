//! API middleware.

#![allow(missing_docs)]

use ovation_core::{EntryService, RoundService, VoteService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub vote_service: VoteService,
    pub round_service: RoundService,
    pub entry_service: EntryService,
    /// Shared secret for the editor surface. Empty disables editor routes.
    pub editor_token: String,
}
