use chrono::{Datelike, NaiveDate};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const ORIGINAL: &str = "original";
pub const CREDIT_POSTER: &str = "w150_and_h225_bestv2";
pub const NO_IMAGE: &str = "https://www.allianceplast.com/wp-content/uploads/2017/11/no-image.png";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `2024-03-01` -> `March 1st, 2024`. Anything unparsable renders empty.
pub fn format_date(date: Option<&str>) -> String {
    let Some(parsed) = date.and_then(|d| d.trim().parse::<NaiveDate>().ok()) else {
        return String::new();
    };
    let day = parsed.day();
    format!(
        "{} {}{}, {}",
        MONTHS[parsed.month0() as usize],
        day,
        ordinal_suffix(day),
        parsed.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `"(2024)"`, or empty without a usable date.
pub fn release_year(date: Option<&str>) -> String {
    match date.map(str::trim) {
        Some(d) if d.len() >= 4 && d.is_char_boundary(4) => format!("({})", &d[..4]),
        _ => String::new(),
    }
}

pub fn image_url(size: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{IMAGE_BASE}/{size}{path}")
    } else {
        format!("{IMAGE_BASE}/{size}/{path}")
    }
}

pub fn image_or_placeholder(size: &str, path: Option<&str>) -> String {
    match path.filter(|p| !p.trim().is_empty()) {
        Some(p) => image_url(size, p),
        None => NO_IMAGE.to_string(),
    }
}

pub fn movie_href(id: i64) -> String {
    format!("/movie/{id}")
}

pub fn person_href(id: i64) -> String {
    format!("/person/{id}")
}

pub fn similar_movies_href(id: i64, title: &str) -> String {
    format!(
        "/similar-movies/{id}/?title={}",
        urlencoding::encode(title)
    )
}

/// Vote averages print like `7` or `7.25`, never `7.0`.
pub fn format_vote(vote: f64) -> String {
    format!("{vote}")
}
