//! Page assemblers: read the embedded blobs once, build the cards, and route
//! user actions to the widget of the right card.
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::str::FromStr;
use tracing::{error, info, warn};

use crate::api::AccountApi;
use crate::cards::{
    cast_card, credit_card, image_gallery, person_info, person_portrait, DetailCard, MovieCard,
};
use crate::carousel::{Carousel, PLAYER_ID};
use crate::embedded::{array_of, EmbeddedData};
use crate::models::{
    AccountLists, AccountMovie, CastMember, ImageFile, MediaItem, MovieAccountStates,
    MovieCredit, MovieDetails, MovieSummary, Person,
};
use crate::toggle::ToggleKind;
use crate::view::Element;
use crate::widgets::{CardControls, SubmitOutcome};

pub const RATED_MOVIES_PATH: &str = "/rated-movies";
pub const MAX_CAST: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    MovieList,
    MovieDetails,
    Person,
}

impl FromStr for PageKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "list" | "movies" => Ok(PageKind::MovieList),
            "movie" | "details" => Ok(PageKind::MovieDetails),
            "person" => Ok(PageKind::Person),
            _ => Err(anyhow!("page kind must be 'list', 'movie' or 'person'")),
        }
    }
}

/// Elements to append to the mount point with id `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub target: &'static str,
    pub elements: Vec<Element>,
}

impl Fragment {
    pub fn to_html(&self) -> String {
        self.elements.iter().map(Element::to_html).collect()
    }
}

async fn fetch_logged_in(api: &dyn AccountApi) -> Result<bool> {
    api.logged_in()
        .await
        .context("Failed to fetch logged-in status")
}

fn blob_array<T: DeserializeOwned>(
    data: &EmbeddedData,
    id: &str,
    what: &str,
) -> Option<Vec<T>> {
    match data.raw(id) {
        Ok(value) => array_of(value, what),
        Err(e) => {
            error!("{:#}", e);
            None
        }
    }
}

fn controls_mut(
    controls: Option<&mut CardControls>,
    movie_id: i64,
) -> Result<&mut CardControls> {
    controls.ok_or_else(|| anyhow!("Movie {} has no account controls (not logged in)", movie_id))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieListPage {
    pathname: String,
    cards: Vec<MovieCard>,
}

impl MovieListPage {
    pub async fn load(data: &EmbeddedData, api: &dyn AccountApi, pathname: &str) -> Result<Self> {
        let logged_in = fetch_logged_in(api).await?;
        Ok(Self::assemble(data, logged_in, pathname))
    }

    pub fn assemble(data: &EmbeddedData, logged_in: bool, pathname: &str) -> Self {
        let movies: Vec<MovieSummary> =
            blob_array(data, "json-data", "movies").unwrap_or_default();
        let lists = logged_in.then(|| AccountLists {
            rated: account_list(data, "rated-movies"),
            watchlist: account_list(data, "watchlist-movies"),
            favorite: account_list(data, "favorite-movies"),
        });
        let cards: Vec<MovieCard> = movies
            .into_iter()
            .map(|movie| {
                let state = lists.as_ref().map(|l| l.state_for(movie.id));
                MovieCard::new(movie, state)
            })
            .collect();
        info!("Assembled {} movie cards for {}", cards.len(), pathname);
        Self {
            pathname: pathname.to_string(),
            cards,
        }
    }

    pub fn cards(&self) -> &[MovieCard] {
        &self.cards
    }

    pub fn card(&self, movie_id: i64) -> Option<&MovieCard> {
        self.cards.iter().find(|c| c.movie_id() == movie_id)
    }

    fn card_index(&self, movie_id: i64) -> Result<usize> {
        self.cards
            .iter()
            .position(|c| c.movie_id() == movie_id)
            .ok_or_else(|| anyhow!("No card for movie {}", movie_id))
    }

    pub async fn rate(
        &mut self,
        movie_id: i64,
        position: usize,
        api: &dyn AccountApi,
    ) -> Result<SubmitOutcome> {
        let idx = self.card_index(movie_id)?;
        let controls = controls_mut(self.cards[idx].controls_mut(), movie_id)?;
        controls.rating.rate(position, api).await
    }

    pub async fn toggle(
        &mut self,
        movie_id: i64,
        kind: ToggleKind,
        api: &dyn AccountApi,
    ) -> Result<SubmitOutcome> {
        let idx = self.card_index(movie_id)?;
        let controls = controls_mut(self.cards[idx].controls_mut(), movie_id)?;
        Ok(controls.toggle_mut(kind).toggle(api).await)
    }

    /// On the "My Ratings" page the card goes away as soon as deletion is
    /// requested, whatever the outcome.
    pub async fn delete_rating(
        &mut self,
        movie_id: i64,
        api: &dyn AccountApi,
    ) -> Result<SubmitOutcome> {
        let idx = self.card_index(movie_id)?;
        controls_mut(self.cards[idx].controls_mut(), movie_id)?;
        if self.pathname == RATED_MOVIES_PATH {
            let mut card = self.cards.remove(idx);
            let controls = controls_mut(card.controls_mut(), movie_id)?;
            return Ok(controls.rating.delete_rating(api).await);
        }
        let controls = controls_mut(self.cards[idx].controls_mut(), movie_id)?;
        Ok(controls.rating.delete_rating(api).await)
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        vec![Fragment {
            target: "movie-list",
            elements: self.cards.iter().map(MovieCard::render).collect(),
        }]
    }
}

fn account_list(data: &EmbeddedData, id: &str) -> Vec<AccountMovie> {
    if !data.contains(id) {
        warn!("No embedded '{}' list, treating as empty", id);
        return Vec::new();
    }
    blob_array(data, id, id).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailPage {
    card: DetailCard,
    cast: Vec<CastMember>,
    carousel: Option<Carousel>,
}

impl MovieDetailPage {
    pub async fn load(data: &EmbeddedData, api: &dyn AccountApi) -> Result<Self> {
        let logged_in = fetch_logged_in(api).await?;
        Self::assemble(data, logged_in)
    }

    pub fn assemble(data: &EmbeddedData, logged_in: bool) -> Result<Self> {
        let details: MovieDetails = data.get("movie-details")?;
        let account = if logged_in {
            let states = data
                .get::<MovieAccountStates>("account-states")
                .map(|s| s.state_for(details.summary.id))
                .unwrap_or_else(|e| {
                    error!("{:#}", e);
                    Default::default()
                });
            Some(states)
        } else {
            None
        };

        let mut cast: Vec<CastMember> =
            data.array_field("movie-cast", "cast").unwrap_or_default();
        cast.truncate(MAX_CAST);

        let keys = data
            .array_field::<MediaItem>("media-items", "results")
            .unwrap_or_default()
            .into_iter()
            .filter(MediaItem::is_youtube)
            .map(|m| m.key)
            .collect();
        let carousel = Carousel::new(keys);
        if carousel.is_none() {
            warn!("No media items for movie {}", details.summary.id);
        }

        Ok(Self {
            card: DetailCard::new(details, account),
            cast,
            carousel,
        })
    }

    pub fn card(&self) -> &DetailCard {
        &self.card
    }

    pub fn cast(&self) -> &[CastMember] {
        &self.cast
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn backdrop_style(&self) -> Option<String> {
        self.card
            .backdrop_url()
            .map(|url| format!("background-image: url('{url}')"))
    }

    pub async fn rate(&mut self, position: usize, api: &dyn AccountApi) -> Result<SubmitOutcome> {
        let movie_id = self.card.movie_id();
        let controls = controls_mut(self.card.controls_mut(), movie_id)?;
        controls.rating.rate(position, api).await
    }

    pub async fn toggle(
        &mut self,
        kind: ToggleKind,
        api: &dyn AccountApi,
    ) -> Result<SubmitOutcome> {
        let movie_id = self.card.movie_id();
        let controls = controls_mut(self.card.controls_mut(), movie_id)?;
        Ok(controls.toggle_mut(kind).toggle(api).await)
    }

    pub async fn delete_rating(&mut self, api: &dyn AccountApi) -> Result<SubmitOutcome> {
        let movie_id = self.card.movie_id();
        let controls = controls_mut(self.card.controls_mut(), movie_id)?;
        Ok(controls.rating.delete_rating(api).await)
    }

    pub fn next_video(&mut self) -> Option<String> {
        self.carousel.as_mut().map(Carousel::next)
    }

    pub fn previous_video(&mut self) -> Option<String> {
        self.carousel.as_mut().map(Carousel::previous)
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        let mut out = vec![
            Fragment {
                target: "banner-wrapped",
                elements: vec![self.card.render()],
            },
            Fragment {
                target: "main-cast",
                elements: self.cast.iter().map(cast_card).collect(),
            },
        ];
        if let Some(carousel) = &self.carousel {
            out.push(Fragment {
                target: PLAYER_ID,
                elements: vec![carousel.render()],
            });
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonPage {
    person: Person,
    portraits: Vec<ImageFile>,
    tagged_images: Vec<ImageFile>,
    credits: Vec<MovieCredit>,
}

impl PersonPage {
    /// Person pages carry no account widgets, so the host is never asked.
    pub fn assemble(data: &EmbeddedData) -> Result<Self> {
        let person: Person = data.get("person-info")?;
        Ok(Self {
            person,
            portraits: optional_array(data, "person-portraits", "profiles"),
            tagged_images: optional_array(data, "person-tagged-images", "results"),
            credits: optional_array(data, "person-movie-credits", "cast"),
        })
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn credits(&self) -> &[MovieCredit] {
        &self.credits
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        vec![
            Fragment {
                target: "person-banner-wrapped",
                elements: vec![person_portrait(&self.person), person_info(&self.person)],
            },
            Fragment {
                target: "person-images",
                elements: vec![image_gallery(
                    "person-portraits",
                    "person-image",
                    &self.portraits,
                )],
            },
            Fragment {
                target: "person-tagged-images-div",
                elements: vec![image_gallery(
                    "person-tagged-images",
                    "person-tagged-image",
                    &self.tagged_images,
                )],
            },
            Fragment {
                target: "person-movie-credit-div",
                elements: vec![Element::new("div")
                    .with_class("person-movie-credit-container")
                    .children(self.credits.iter().filter_map(credit_card))],
            },
        ]
    }
}

fn optional_array<T: DeserializeOwned>(data: &EmbeddedData, id: &str, key: &str) -> Vec<T> {
    let Ok(value) = data.raw(id) else {
        warn!("No embedded '{}' on person page", id);
        return Vec::new();
    };
    match value.get(key) {
        Some(items) => array_of(items, key).unwrap_or_default(),
        None => {
            warn!("Embedded '{}' has no '{}' field", id, key);
            Vec::new()
        }
    }
}

/// Every page of the given kind, already assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    MovieList(MovieListPage),
    MovieDetails(MovieDetailPage),
    Person(PersonPage),
}

impl Page {
    pub async fn load(
        kind: PageKind,
        data: &EmbeddedData,
        api: &dyn AccountApi,
        pathname: &str,
    ) -> Result<Self> {
        Ok(match kind {
            PageKind::MovieList => {
                Page::MovieList(MovieListPage::load(data, api, pathname).await?)
            }
            PageKind::MovieDetails => {
                Page::MovieDetails(MovieDetailPage::load(data, api).await?)
            }
            PageKind::Person => Page::Person(PersonPage::assemble(data)?),
        })
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        match self {
            Page::MovieList(p) => p.fragments(),
            Page::MovieDetails(p) => p.fragments(),
            Page::Person(p) => p.fragments(),
        }
    }
}
