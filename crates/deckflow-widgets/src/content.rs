#![forbid(unsafe_code)]

//! Image release for replaced scroll content.
//!
//! Webviews keep decoded images alive as long as an `<img>` points at them,
//! even after the markup is detached. Before scroll content is replaced,
//! every image source is pointed at a tiny placeholder so the host can drop
//! the decoded bitmaps.

use std::sync::LazyLock;

use regex::Regex;

static IMG_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").ok());

static SRC_ATTR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\ssrc\s*=\s*)("[^"]*"|'[^']*'|[^\s>"']+)"#).ok()
});

/// Markup after release plus the sources that were released.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Released {
    pub markup: String,
    /// Sources in document order, excluding ones already at the placeholder.
    pub sources: Vec<String>,
}

/// Point every `<img>` in `markup` at `placeholder`.
///
/// Images without a `src` attribute gain one.
#[must_use]
pub fn release_images(markup: &str, placeholder: &str) -> Released {
    let (Some(img), Some(src)) = (IMG_TAG.as_ref(), SRC_ATTR.as_ref()) else {
        return Released {
            markup: markup.to_string(),
            sources: Vec::new(),
        };
    };

    let mut sources = Vec::new();
    let mut out = String::with_capacity(markup.len());
    let mut last = 0;
    for tag in img.find_iter(markup) {
        out.push_str(&markup[last..tag.start()]);
        last = tag.end();
        let text = tag.as_str();
        match src.captures(text) {
            Some(caps) => {
                let (Some(attr), Some(value)) = (caps.get(1), caps.get(2)) else {
                    out.push_str(text);
                    continue;
                };
                let raw = value.as_str();
                let unquoted = raw.trim_matches(|c| c == '"' || c == '\'');
                if unquoted != placeholder {
                    sources.push(unquoted.to_string());
                }
                out.push_str(&text[..attr.end()]);
                out.push('"');
                out.push_str(placeholder);
                out.push('"');
                out.push_str(&text[value.end()..]);
            }
            None => {
                // "<img" is four bytes.
                out.push_str(&text[..4]);
                out.push_str(" src=\"");
                out.push_str(placeholder);
                out.push('"');
                out.push_str(&text[4..]);
            }
        }
    }
    out.push_str(&markup[last..]);

    Released {
        markup: out,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK: &str = "../img/blank.png";

    #[test]
    fn rewrites_quoted_and_bare_sources() {
        let html = r#"<p><img class="thumb" src="a.jpg"><IMG SRC='b.png' alt=x><img src=c.gif></p>"#;
        let r = release_images(html, BLANK);
        assert_eq!(r.sources, ["a.jpg", "b.png", "c.gif"]);
        assert_eq!(
            r.markup,
            r#"<p><img class="thumb" src="../img/blank.png"><IMG SRC="../img/blank.png" alt=x><img src="../img/blank.png"></p>"#
        );
    }

    #[test]
    fn data_src_is_not_src() {
        let r = release_images(r#"<img data-src="lazy.jpg">"#, BLANK);
        assert!(r.sources.is_empty());
        assert_eq!(r.markup, r#"<img src="../img/blank.png" data-src="lazy.jpg">"#);
    }

    #[test]
    fn already_released_is_not_reported() {
        let r = release_images(r#"<img src="../img/blank.png">"#, BLANK);
        assert!(r.sources.is_empty());
    }

    #[test]
    fn no_images_is_identity() {
        let html = "<ul><li>Soup</li></ul>";
        assert_eq!(release_images(html, BLANK).markup, html);
    }
}
