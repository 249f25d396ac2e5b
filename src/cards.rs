//! Card assemblers. Each card owns its widgets, and `render` rebuilds the
//! element subtree from their current state.
use crate::models::{CastMember, ImageFile, MovieCredit, MovieDetails, MovieSummary, Person};
use crate::utils::{
    format_date, format_vote, image_or_placeholder, image_url, movie_href, person_href,
    release_year, similar_movies_href, CREDIT_POSTER, ORIGINAL,
};
use crate::view::Element;
use crate::widgets::{AccountState, CardControls};

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    movie: MovieSummary,
    controls: Option<CardControls>,
}

impl MovieCard {
    /// `account` is `None` for anonymous visitors, which hides every widget.
    pub fn new(movie: MovieSummary, account: Option<AccountState>) -> Self {
        let controls = account.map(|state| CardControls::new(movie.id, &state));
        Self { movie, controls }
    }

    pub fn movie_id(&self) -> i64 {
        self.movie.id
    }

    pub fn movie(&self) -> &MovieSummary {
        &self.movie
    }

    pub fn controls(&self) -> Option<&CardControls> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut CardControls> {
        self.controls.as_mut()
    }

    pub fn render(&self) -> Element {
        let movie = &self.movie;
        let mut info = Element::new("div")
            .with_class("movie-info")
            .child(title_link(movie))
            .child(
                Element::new("h5").with_class("movie-stats").text(format!(
                    "{} | Rated {}",
                    format_date(movie.release_date.as_deref()),
                    format_vote(movie.vote_average)
                )),
            )
            .child(
                Element::new("p")
                    .with_class("movie-description")
                    .text(movie.overview.clone()),
            );
        if let Some(controls) = &self.controls {
            info = info.child(controls.rating.render_stars());
        }
        info = info.child(card_buttons("card-buttons", movie, self.controls.as_ref()));

        Element::new("div")
            .with_id(format!("movie-card-{}", movie.id))
            .with_class("movie-card")
            .with_data("movie-id", movie.id.to_string())
            .child(
                Element::new("img")
                    .with_class("movie-poster")
                    .with_attr("src", poster_src(movie)),
            )
            .child(info)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailCard {
    details: MovieDetails,
    controls: Option<CardControls>,
}

impl DetailCard {
    pub fn new(details: MovieDetails, account: Option<AccountState>) -> Self {
        let controls = account.map(|state| CardControls::new(details.summary.id, &state));
        Self { details, controls }
    }

    pub fn movie_id(&self) -> i64 {
        self.details.summary.id
    }

    pub fn details(&self) -> &MovieDetails {
        &self.details
    }

    pub fn controls(&self) -> Option<&CardControls> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut CardControls> {
        self.controls.as_mut()
    }

    pub fn backdrop_url(&self) -> Option<String> {
        self.details
            .summary
            .backdrop_path
            .as_deref()
            .map(|p| image_url(ORIGINAL, p))
    }

    pub fn render(&self) -> Element {
        let movie = &self.details.summary;
        let genres = self
            .details
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut info = Element::new("div")
            .with_class("movie-details-info")
            .child(title_link(movie))
            .child(Element::new("h5").with_class("movie-stats").text(format!(
                "{} | Rated {} | {}",
                format_date(movie.release_date.as_deref()),
                format_vote(movie.vote_average),
                genres
            )));
        if let Some(controls) = &self.controls {
            info = info.child(
                controls
                    .rating
                    .render_stars()
                    .with_class("movie-details-star-container"),
            );
        }
        info = info
            .child(card_buttons(
                "movie-details-buttons",
                movie,
                self.controls.as_ref(),
            ))
            .child(
                Element::new("p")
                    .with_class("movie-details-tagline")
                    .text(self.details.tagline.clone()),
            )
            .child(Element::new("h4").text("Overview"))
            .child(
                Element::new("p")
                    .with_class("movie-description")
                    .text(movie.overview.clone()),
            );

        Element::new("div")
            .with_id(format!("movie-card-{}", movie.id))
            .with_class("movie-details-card")
            .with_data("movie-id", movie.id.to_string())
            .child(
                Element::new("img")
                    .with_class("movie-details-poster")
                    .with_attr("src", poster_src(movie)),
            )
            .child(info)
    }
}

fn poster_src(movie: &MovieSummary) -> String {
    image_or_placeholder(ORIGINAL, movie.poster_path.as_deref())
}

fn title_link(movie: &MovieSummary) -> Element {
    let year = release_year(movie.release_date.as_deref());
    let title = if year.is_empty() {
        movie.title.clone()
    } else {
        format!("{} {}", movie.title, year)
    };
    Element::new("a")
        .with_attr("href", movie_href(movie.id))
        .child(Element::new("h3").with_class("movie-name").text(title))
}

fn card_buttons(class: &str, movie: &MovieSummary, controls: Option<&CardControls>) -> Element {
    let mut buttons = Element::new("div").with_class(class).child(
        Element::new("a")
            .with_class("similar-movies-button")
            .with_attr("href", similar_movies_href(movie.id, &movie.title))
            .text("Similar Movies"),
    );
    if let Some(controls) = controls {
        if let Some(delete) = controls.rating.render_delete_button() {
            buttons = buttons.child(delete);
        }
        buttons = buttons
            .child(controls.watchlist.render())
            .child(controls.favorite.render());
    }
    buttons
}

pub fn cast_card(member: &CastMember) -> Element {
    let label = if member.character.is_empty() {
        member.name.clone()
    } else {
        format!("{} - {}", member.name, member.character)
    };
    Element::new("div")
        .with_class("cast-card")
        .child(
            Element::new("img")
                .with_class("cast-image")
                .with_attr(
                    "src",
                    image_or_placeholder(ORIGINAL, member.profile_path.as_deref()),
                ),
        )
        .child(
            Element::new("div").with_class("cast-info").child(
                Element::new("a")
                    .with_attr("href", person_href(member.id))
                    .child(Element::new("h3").with_class("cast-name").text(label)),
            ),
        )
}

/// Credits without a poster are left out entirely.
pub fn credit_card(credit: &MovieCredit) -> Option<Element> {
    let poster = credit.poster_path.as_deref().filter(|p| !p.is_empty())?;
    Some(
        Element::new("div")
            .with_class("person-movie-credit")
            .child(
                Element::new("a").with_attr("href", movie_href(credit.id)).child(
                    Element::new("img")
                        .with_class("person-movie-credit-poster")
                        .with_attr("src", image_url(CREDIT_POSTER, poster)),
                ),
            )
            .child(Element::new("h5").text(credit.title.clone())),
    )
}

pub fn person_portrait(person: &Person) -> Element {
    Element::new("img")
        .with_class("person-portrait")
        .with_attr(
            "src",
            image_or_placeholder(ORIGINAL, person.profile_path.as_deref()),
        )
}

pub fn person_info(person: &Person) -> Element {
    let mut biography = Element::new("p");
    for (i, line) in person.biography.split('\n').enumerate() {
        if i > 0 {
            biography = biography.child(Element::new("br"));
        }
        if !line.is_empty() {
            biography = biography.text(line);
        }
    }
    Element::new("div")
        .with_class("person-info")
        .child(Element::new("h2").text(person.name.clone()))
        .child(Element::new("h3").text("Biography"))
        .child(biography)
}

pub fn image_gallery(container_class: &str, image_class: &str, images: &[ImageFile]) -> Element {
    Element::new("div")
        .with_class(container_class)
        .children(images.iter().map(|img| {
            Element::new("img")
                .with_class(image_class)
                .with_attr("src", image_url(ORIGINAL, &img.file_path))
        }))
}
