use crate::view::Element;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
pub const PLAYER_ID: &str = "videoPlayer";

/// Circular cursor over trailer keys. Never empty, so navigation can't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    keys: Vec<String>,
    index: usize,
}

impl Carousel {
    pub fn new(keys: Vec<String>) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        Some(Self { keys, index: 0 })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn current_key(&self) -> &str {
        &self.keys[self.index]
    }

    pub fn current_source(&self) -> String {
        format!("{EMBED_BASE}{}", self.current_key())
    }

    pub fn next(&mut self) -> String {
        self.index = (self.index + 1) % self.keys.len();
        self.current_source()
    }

    pub fn previous(&mut self) -> String {
        self.index = if self.index == 0 {
            self.keys.len() - 1
        } else {
            self.index - 1
        };
        self.current_source()
    }

    pub fn render(&self) -> Element {
        Element::new("iframe")
            .with_id(PLAYER_ID)
            .with_attr("src", self.current_source())
    }
}
