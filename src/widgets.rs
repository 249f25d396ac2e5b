use anyhow::Result;
use tracing::{error, info};

use crate::api::{fetch_credentials, AccountApi};
use crate::rating::{self, Rating};
use crate::toggle::{ToggleButton, ToggleKind};
use crate::view::Element;

pub const DELETE_RATING_CLASS: &str = "delete-rating-button";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Confirmed,
    /// The server answered `success: false`.
    Rejected(Option<String>),
    /// Transport error, bad status, or missing credentials.
    Failed,
}

impl SubmitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmitOutcome::Confirmed)
    }
}

/// Star row plus the "Delete Rating" affordance for one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingWidget {
    movie_id: i64,
    rating: Option<Rating>,
    delete_button: bool,
}

impl RatingWidget {
    /// A stored rating of 0 counts as unrated for the delete button.
    pub fn new(movie_id: i64, rating: Option<Rating>) -> Self {
        Self {
            movie_id,
            rating,
            delete_button: rating.is_some_and(|r| r.value() > 0.0),
        }
    }

    pub fn movie_id(&self) -> i64 {
        self.movie_id
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn has_delete_button(&self) -> bool {
        self.delete_button
    }

    pub fn stars(&self) -> [rating::Star; rating::STAR_COUNT] {
        rating::stars(self.rating)
    }

    /// Fills the stars for the clicked position right away. The rating is only
    /// sent once the returned request is submitted.
    pub fn click_star(&mut self, position: usize) -> Result<RatingRequest> {
        let rating = rating::rating_for_click(position)?;
        self.rating = Some(rating);
        Ok(RatingRequest {
            movie_id: self.movie_id,
            rating,
        })
    }

    pub async fn rate(&mut self, position: usize, api: &dyn AccountApi) -> Result<SubmitOutcome> {
        let request = self.click_star(position)?;
        let outcome = request.submit(api).await;
        self.apply_rated(&outcome);
        Ok(outcome)
    }

    pub fn apply_rated(&mut self, outcome: &SubmitOutcome) {
        if outcome.is_confirmed() {
            self.delete_button = true;
        }
    }

    /// Deletes the rating on TMDB. Credentials are fetched first and the
    /// DELETE is never sent if either comes back empty.
    pub async fn delete_rating(&mut self, api: &dyn AccountApi) -> SubmitOutcome {
        let credentials = match fetch_credentials(api).await {
            Ok(c) => c,
            Err(e) => {
                error!("Error with fetch call: {:#}", e);
                return SubmitOutcome::Failed;
            }
        };
        match api.delete_rating(self.movie_id, &credentials).await {
            Ok(res) if res.success => {
                info!("Successfully deleted movie rating: {}", self.movie_id);
                self.rating = None;
                self.delete_button = false;
                SubmitOutcome::Confirmed
            }
            Ok(res) => {
                let reason = res.failure_reason();
                error!(
                    "Error deleting movie rating {}: {}",
                    self.movie_id,
                    reason.as_deref().unwrap_or("unknown error")
                );
                SubmitOutcome::Rejected(reason)
            }
            Err(e) => {
                error!("Error with fetch call: {:#}", e);
                SubmitOutcome::Failed
            }
        }
    }

    pub fn render_stars(&self) -> Element {
        let stars = self.stars().into_iter().map(|star| {
            Element::new("span")
                .with_class("star")
                .with_data("value", star.threshold.to_string())
                .with_color(if star.filled { "gold" } else { "gray" })
                .text("\u{2605}")
        });
        Element::new("div").with_class("stars").children(stars)
    }

    pub fn render_delete_button(&self) -> Option<Element> {
        self.delete_button.then(|| {
            Element::new("button")
                .with_class(DELETE_RATING_CLASS)
                .text("Delete Rating")
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRequest {
    pub movie_id: i64,
    pub rating: Rating,
}

impl RatingRequest {
    pub async fn submit(self, api: &dyn AccountApi) -> SubmitOutcome {
        match api.rate_movie(self.movie_id, self.rating).await {
            Ok(res) if res.success => {
                info!("Successfully rated movie: {}", self.movie_id);
                SubmitOutcome::Confirmed
            }
            Ok(res) => {
                let reason = res.failure_reason();
                error!(
                    "Error rating movie {}: {}",
                    self.movie_id,
                    reason.as_deref().unwrap_or("unknown error")
                );
                SubmitOutcome::Rejected(reason)
            }
            Err(e) => {
                error!("Error rating movie {}: {:#}", self.movie_id, e);
                SubmitOutcome::Failed
            }
        }
    }
}

/// Account widgets for a single card, only present when logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardControls {
    pub rating: RatingWidget,
    pub watchlist: ToggleButton,
    pub favorite: ToggleButton,
}

impl CardControls {
    pub fn new(movie_id: i64, state: &AccountState) -> Self {
        Self {
            rating: RatingWidget::new(movie_id, state.rating),
            watchlist: ToggleButton::new(movie_id, ToggleKind::Watchlist, state.watchlist),
            favorite: ToggleButton::new(movie_id, ToggleKind::Favorite, state.favorite),
        }
    }

    pub fn toggle_mut(&mut self, kind: ToggleKind) -> &mut ToggleButton {
        match kind {
            ToggleKind::Watchlist => &mut self.watchlist,
            ToggleKind::Favorite => &mut self.favorite,
        }
    }
}

/// Cached snapshot of the user's flags for one movie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountState {
    pub rating: Option<Rating>,
    pub watchlist: bool,
    pub favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_rating_starts_with_delete_button() {
        let widget = RatingWidget::new(1, Some(Rating::from_whole(6).unwrap()));
        assert!(widget.has_delete_button());
        let stars = widget.render_stars();
        assert_eq!(stars.count_class("star"), 5);
        let gold = stars
            .find_by_class("star")
            .iter()
            .filter(|s| s.color.as_deref() == Some("gold"))
            .count();
        assert_eq!(gold, 3);
    }

    #[test]
    fn zero_rating_has_no_delete_button() {
        let widget = RatingWidget::new(1, Some(Rating::from_whole(0).unwrap()));
        assert!(!widget.has_delete_button());
        assert!(widget.render_delete_button().is_none());
        assert!(widget.stars().iter().all(|s| !s.filled));
    }

    #[test]
    fn clicking_rederives_all_stars() {
        let mut widget = RatingWidget::new(1, Some(Rating::from_whole(10).unwrap()));
        let request = widget.click_star(0).unwrap();
        assert_eq!(request.rating.value(), 2.0);
        let filled: Vec<bool> = widget.stars().iter().map(|s| s.filled).collect();
        assert_eq!(filled, vec![false, false, false, false, true]);
    }

    #[test]
    fn delete_button_only_added_on_confirmation() {
        let mut widget = RatingWidget::new(1, None);
        assert!(widget.render_delete_button().is_none());
        widget.click_star(2).unwrap();
        widget.apply_rated(&SubmitOutcome::Rejected(None));
        assert!(!widget.has_delete_button());
        widget.apply_rated(&SubmitOutcome::Confirmed);
        widget.apply_rated(&SubmitOutcome::Confirmed);
        assert!(widget.render_delete_button().is_some());
    }

    #[test]
    fn star_markup_matches_threshold_order() {
        let html = RatingWidget::new(1, None).render_stars().to_html();
        assert!(html.starts_with(
            r#"<div class="stars"><span class="star" data-value="10" style="color: gray">"#
        ));
        assert!(html.ends_with(r#"data-value="2" style="color: gray">★</span></div>"#));
    }
}
