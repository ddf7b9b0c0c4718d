//! Locating elements in an HTML fragment.
//!
//! `tl` does the tokenizing: comments, quoted attribute values and void
//! elements are its business. Each tag's source span comes from
//! [`tl::HTMLTag::boundaries`] so the original bytes can be spliced.

use std::ops::Range;

/// An element of a container, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Name as written in the source.
    pub name: String,
    /// Attributes with raw (still entity-encoded) values, sorted by name.
    pub attrs: Vec<(String, String)>,
    /// Byte range of the whole element, closing tag included.
    pub range: Range<usize>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// All elements of `html`, in document order.
///
/// An element whose closing tag is missing spans its start tag only.
pub fn scan(html: &str) -> Vec<Element> {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return Vec::new();
    };
    let parser = dom.parser();

    let mut elements: Vec<Element> = dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .filter_map(|tag| {
            let name = tag.name().as_utf8_str();
            if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return None;
            }

            let mut attrs: Vec<(String, String)> = tag
                .attributes()
                .iter()
                .map(|(key, value)| (key.into_owned(), value.map(|v| v.into_owned()).unwrap_or_default()))
                .collect();
            attrs.sort_by(|a, b| a.0.cmp(&b.0));

            // Inclusive end
            let (start, end) = tag.boundaries(parser);
            Some(Element {
                name: name.into_owned(),
                attrs,
                range: start..end + 1,
            })
        })
        .collect();
    elements.sort_by_key(|e| e.range.start);
    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_self_closing() {
        let html = r#"<p>a</p><SteamGameBlock :gameUrl="&#39;x&#39;" /><p>b</p>"#;
        let elements = scan(html);
        let block = elements.iter().find(|e| e.name == "SteamGameBlock").unwrap();
        assert_eq!(&html[block.range.clone()], r#"<SteamGameBlock :gameUrl="&#39;x&#39;" />"#);
        assert_eq!(block.attr(":gameUrl"), Some("&#39;x&#39;"));
    }

    #[test]
    fn test_scan_nested() {
        let html = "<div class=\"a b\"><div>x</div><span>y</span></div>";
        let elements = scan(html);
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].range, 0..html.len());
        assert_eq!(elements[0].attr("class"), Some("a b"));
        assert_eq!(&html[elements[1].range.clone()], "<div>x</div>");
    }

    #[test]
    fn test_scan_void_and_quoted_gt() {
        let html = r#"<img src="a.png" alt="1 > 0"><br>"#;
        let elements = scan(html);
        assert_eq!(elements[0].range, 0..html.find("<br>").unwrap());
        assert_eq!(elements[0].attr("alt"), Some("1 > 0"));
    }

    #[test]
    fn test_scan_ignores_comments() {
        let elements = scan("<!-- <Fake /> --><p>x</p>");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "p");
    }

    #[test]
    fn test_closing_tag_inside_comment() {
        let html = "<div><!-- </div> --></div><p>after</p>";
        let elements = scan(html);
        assert_eq!(elements[0].name, "div");
        assert_eq!(&html[elements[0].range.clone()], "<div><!-- </div> --></div>");
        assert_eq!(elements[1].name, "p");
    }

    #[test]
    fn test_valueless_attribute() {
        let elements = scan("<input data-x='1' disabled>");
        assert_eq!(elements[0].attr("disabled"), Some(""));
        assert_eq!(elements[0].attr("data-x"), Some("1"));
    }
}
