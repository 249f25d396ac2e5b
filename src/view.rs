//! A small element tree standing in for the browser DOM.
//!
//! Cards and pages are assembled as [`Element`]s and rendered to HTML in one
//! pass. Attributes keep insertion order so output is stable.

const VOID_TAGS: [&str; 4] = ["img", "br", "hr", "input"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub color: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn with_data(self, key: &str, value: impl Into<String>) -> Self {
        self.with_attr(&format!("data-{key}"), value)
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first search including `self`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_by_class(class, &mut out);
        out
    }

    fn collect_by_class<'a>(&'a self, class: &str, out: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            out.push(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                el.collect_by_class(class, out);
            }
        }
    }

    pub fn count_class(&self, class: &str) -> usize {
        self.find_by_class(class).len()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        for (name, value) in &self.attrs {
            push_attr(out, name, value);
        }
        if let Some(color) = &self.color {
            push_attr(out, "style", &format!("color: {color}"));
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(&escape(t)),
                Node::Element(el) => el.write_html(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_elements_with_escaping() {
        let el = Element::new("div")
            .with_id("movie-card-1")
            .with_class("movie-card")
            .with_data("movie-id", "1")
            .child(Element::new("img").with_attr("src", "/a.jpg?x=1&y=2"))
            .child(Element::new("p").text("Tom & <Jerry>"));
        assert_eq!(
            el.to_html(),
            r#"<div id="movie-card-1" class="movie-card" data-movie-id="1"><img src="/a.jpg?x=1&amp;y=2"><p>Tom &amp; &lt;Jerry&gt;</p></div>"#
        );
    }

    #[test]
    fn class_lookup_walks_the_tree() {
        let el = Element::new("div").child(
            Element::new("div")
                .with_class("stars")
                .child(Element::new("span").with_class("star").with_color("gold"))
                .child(Element::new("span").with_class("star")),
        );
        assert_eq!(el.count_class("star"), 2);
        assert_eq!(el.find_by_class("star")[0].color.as_deref(), Some("gold"));
        assert_eq!(el.count_class("missing"), 0);
    }

    #[test]
    fn attributes_replace_in_place() {
        let el = Element::new("iframe")
            .with_attr("src", "a")
            .with_attr("title", "t")
            .with_attr("src", "b");
        assert_eq!(el.attr("src"), Some("b"));
        assert_eq!(el.to_html(), r#"<iframe src="b" title="t"></iframe>"#);
    }
}
