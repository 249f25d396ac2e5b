//! Watchlist and favorite buttons.
//!
//! The button flips and relabels as soon as it is activated. The submission
//! that follows is fire-and-log: a failure never rolls the button back, the
//! next page load reconciles with the server.
use tracing::{error, info};

use crate::api::AccountApi;
use crate::view::Element;
use crate::widgets::SubmitOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Watchlist,
    Favorite,
}

impl ToggleKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToggleKind::Watchlist => "watchlist-button",
            ToggleKind::Favorite => "favorite-button",
        }
    }

    pub fn label(&self, active: bool) -> &'static str {
        match (self, active) {
            (ToggleKind::Watchlist, false) => "Add to Watchlist",
            (ToggleKind::Watchlist, true) => "Drop from Watchlist",
            (ToggleKind::Favorite, false) => "Favorite",
            (ToggleKind::Favorite, true) => "Unfavorite",
        }
    }

    fn data_key(&self) -> &'static str {
        match self {
            ToggleKind::Watchlist => "in-watchlist",
            ToggleKind::Favorite => "in-favorites",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            ToggleKind::Watchlist => "watchlisting",
            ToggleKind::Favorite => "favoriting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleButton {
    movie_id: i64,
    kind: ToggleKind,
    active: bool,
}

impl ToggleButton {
    pub fn new(movie_id: i64, kind: ToggleKind, active: bool) -> Self {
        Self {
            movie_id,
            kind,
            active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kind(&self) -> ToggleKind {
        self.kind
    }

    pub fn label(&self) -> &'static str {
        self.kind.label(self.active)
    }

    /// Inverts whatever the button currently shows and hands back the
    /// submission for the new state.
    pub fn activate(&mut self) -> ToggleRequest {
        self.active = !self.active;
        ToggleRequest {
            movie_id: self.movie_id,
            kind: self.kind,
            active: self.active,
        }
    }

    pub async fn toggle(&mut self, api: &dyn AccountApi) -> SubmitOutcome {
        self.activate().submit(api).await
    }

    pub fn render(&self) -> Element {
        Element::new("button")
            .with_class(self.kind.class())
            .with_data(self.kind.data_key(), if self.active { "true" } else { "false" })
            .text(self.label())
    }
}

/// A pending watchlist/favorite submission, detached from the button so
/// several can be in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRequest {
    pub movie_id: i64,
    pub kind: ToggleKind,
    pub active: bool,
}

impl ToggleRequest {
    pub async fn submit(self, api: &dyn AccountApi) -> SubmitOutcome {
        let result = match self.kind {
            ToggleKind::Watchlist => api.set_watchlist(self.movie_id, self.active).await,
            ToggleKind::Favorite => api.set_favorite(self.movie_id, self.active).await,
        };
        match result {
            Ok(res) if res.success => {
                info!("Successfully updated {:?} for movie {}", self.kind, self.movie_id);
                SubmitOutcome::Confirmed
            }
            Ok(res) => {
                let reason = res.failure_reason();
                error!(
                    "Error {} movie {}: {}",
                    self.kind.verb(),
                    self.movie_id,
                    reason.as_deref().unwrap_or("unknown error")
                );
                SubmitOutcome::Rejected(reason)
            }
            Err(e) => {
                error!("Error {} movie {}: {:#}", self.kind.verb(), self.movie_id, e);
                SubmitOutcome::Failed
            }
        }
    }
}
