use serde::{Deserialize, Serialize};

use crate::rating::Rating;
use crate::widgets::AccountState;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Entry of the embedded rated/watchlist/favorite lists.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccountMovie {
    pub id: i64,
    pub rating: Option<Rating>,
}

/// The per-user lists embedded in movie list pages.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccountLists {
    pub rated: Vec<AccountMovie>,
    pub watchlist: Vec<AccountMovie>,
    pub favorite: Vec<AccountMovie>,
}

impl AccountLists {
    pub fn state_for(&self, movie_id: i64) -> AccountState {
        AccountState {
            rating: self
                .rated
                .iter()
                .find(|m| m.id == movie_id)
                .and_then(|m| m.rating),
            watchlist: self.watchlist.iter().any(|m| m.id == movie_id),
            favorite: self.favorite.iter().any(|m| m.id == movie_id),
        }
    }
}

/// `rated` in the detail page's account states: `false`, `{ "value": n }`, or
/// a list of rated movies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RatedField {
    Value { value: Rating },
    List(Vec<AccountMovie>),
    Flag(bool),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieAccountStates {
    pub rated: Option<RatedField>,
    #[serde(default)]
    pub watchlist: bool,
    #[serde(default)]
    pub favorite: bool,
}

impl MovieAccountStates {
    pub fn state_for(&self, movie_id: i64) -> AccountState {
        let rating = match &self.rated {
            Some(RatedField::Value { value }) => Some(*value),
            Some(RatedField::List(list)) => list
                .iter()
                .find(|m| m.id == movie_id)
                .and_then(|m| m.rating),
            Some(RatedField::Flag(_)) | None => None,
        };
        AccountState {
            rating,
            watchlist: self.watchlist,
            favorite: self.favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CastMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediaItem {
    pub key: String,
    pub site: Option<String>,
}

impl MediaItem {
    /// Items without a site are assumed to be YouTube keys.
    pub fn is_youtube(&self) -> bool {
        self.site
            .as_deref()
            .map_or(true, |site| site.eq_ignore_ascii_case("YouTube"))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub biography: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageFile {
    pub file_path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieCredit {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
}
