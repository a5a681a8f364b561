//! Html-to-plain-text extraction for the indexing pipeline. The index never
//! sees markup; it consumes the text this module produces.

use chardetng::EncodingDetector;
use scraper::{Html, Node};

/// Detect a document's character encoding and decode it. The collection
/// predates consistent UTF-8; Latin-1 Spanish pages are common, and losing
/// their accented characters would drop every accented term from the index.
pub fn decode_bytes(raw: &[u8]) -> String {
    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(raw);
    text.into_owned()
}

/// Visible text of an html document, text nodes joined by spaces. Script,
/// style, and noscript content is not visible text and is skipped.
pub fn html_to_text(raw: &[u8]) -> String {
    let html = decode_bytes(raw);
    let document = Html::parse_document(&html);
    let mut text = String::new();
    for node in document.tree.nodes() {
        let Node::Text(fragment) = node.value() else { continue };
        let skip = node
            .parent()
            .map(|parent| match parent.value() {
                Node::Element(element) => {
                    matches!(element.name(), "script" | "style" | "noscript")
                }
                _ => false,
            })
            .unwrap_or(false);
        if !skip {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_visible_text_only() {
        let html = b"<html><head><style>p{color:red}</style></head>\
                     <body><p>Hola mundo</p><script>var x = 1;</script></body></html>";
        let text = html_to_text(html);
        assert!(text.contains("Hola mundo"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn decodes_latin1_accents() {
        let text = html_to_text(b"<p>campe\xf3n de Espa\xf1a</p>");
        assert!(text.contains("campe\u{f3}n de Espa\u{f1}a"));
    }

    #[test]
    fn utf8_passes_through_unchanged() {
        let text = html_to_text("<p>campeón de España</p>".as_bytes());
        assert!(text.contains("campeón de España"));
    }

    #[test]
    fn tolerates_arbitrary_bytes() {
        let mut raw = b"<p>ok</p>".to_vec();
        raw.push(0xff);
        assert!(html_to_text(&raw).contains("ok"));
    }
}
