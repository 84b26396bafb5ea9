//! DOM helpers shared by the extractor and the link classifier

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Elements whose text is never visible
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Compile a list of CSS selectors, skipping (and logging) the invalid ones
pub(crate) fn parse_selectors(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Failed to parse selector '{}': {}", s, e);
                None
            }
        })
        .collect()
}

/// Compile a single selector that is known to be valid at compile time
pub(crate) fn selector(s: &str) -> Option<Selector> {
    parse_selectors(&[s]).into_iter().next()
}

/// Elements under the document root matching `selector`.
///
/// `Html::select` walks every node of the arena, detached ones included, so
/// anything that runs after `strip_regions` goes through here.
pub(crate) fn select_in<'a, 'b>(
    document: &'a Html,
    selector: &'b Selector,
) -> scraper::element_ref::Select<'a, 'b> {
    document.root_element().select(selector)
}

/// Detach every element matching one of `selectors` from the document
pub(crate) fn strip_regions(document: &mut Html, selectors: &[Selector]) {
    let ids: Vec<_> = selectors
        .iter()
        .flat_map(|s| select_in(document, s).map(|element| element.id()))
        .collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Visible text of an element: text nodes outside script/style, each trimmed,
/// empty ones dropped, joined by `separator`
pub(crate) fn visible_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| INVISIBLE_TAGS.contains(&e.name()))
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Single-line text of an element with inner whitespace collapsed
pub(crate) fn inline_text(element: ElementRef<'_>) -> String {
    visible_text(element, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased `class` and `id` attributes of an element
pub(crate) fn class_and_id(element: ElementRef<'_>) -> (String, String) {
    let value = element.value();
    let classes = value.attr("class").unwrap_or_default().to_lowercase();
    let id = value.id().unwrap_or_default().to_lowercase();
    (classes, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = Html::parse_fragment(
            "<div><p> Hello </p><script>var x = 1;</script><p>world</p><style>p{}</style></div>",
        );
        let div = html.select(&selector("div").unwrap()).next().unwrap();
        assert_eq!(visible_text(div, "\n"), "Hello\nworld");
        assert_eq!(inline_text(div), "Hello world");
    }

    #[test]
    fn test_strip_regions_detaches_matches() {
        let mut html = Html::parse_document(
            "<html><body><nav>Menu</nav><main><p>Body text</p></main><footer>Foot</footer></body></html>",
        );
        strip_regions(&mut html, &parse_selectors(&["nav", "footer"]));
        let body = html.select(&selector("body").unwrap()).next().unwrap();
        assert_eq!(inline_text(body), "Body text");
        assert!(select_in(&html, &selector("nav").unwrap()).next().is_none());
    }

    #[test]
    fn test_invalid_selectors_are_skipped() {
        let selectors = parse_selectors(&["article", "[[broken", "main"]);
        assert_eq!(selectors.len(), 2);
    }
}
