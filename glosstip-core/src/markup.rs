//! Markup guards: deciding whether a position sits inside a protected element
//!
//! The guard answers one question for a candidate match: scanning forward from
//! the match end, is a closing tag of a protected element reached before any
//! opening tag of the same element? If so, the match lives inside that element
//! and must be left alone.
//!
//! The same pass records the byte span of every tag's own markup (`<` to the
//! closing `>`), so a match inside an attribute value or a tag name can be
//! rejected too.
//!
//! Tag positions are collected in a single pass over the text, so each query
//! is a couple of binary searches instead of a rescan of the remaining input.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Tag that is always guarded: annotating inside a link would nest links
pub const ANCHOR_TAG: &str = "a";

/// How far a guard's forward scan may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardScope {
    /// Stop at the first newline; elements spanning lines are not detected
    Line,
    /// Scan to the end of the text
    #[default]
    Document,
}

/// Opener and closer byte offsets of one guarded tag, ascending
#[derive(Debug, Clone)]
struct TagPositions {
    tag: String,
    openers: Vec<usize>,
    closers: Vec<usize>,
}

impl TagPositions {
    fn new(tag: String) -> Self {
        Self {
            tag,
            openers: Vec::new(),
            closers: Vec::new(),
        }
    }

    /// First closer at or after `at` that is not preceded by an opener
    fn guarding_closer(&self, at: usize) -> Option<usize> {
        let closer = first_at_or_after(&self.closers, at)?;
        match first_at_or_after(&self.openers, at) {
            Some(opener) if opener < closer => None,
            _ => Some(closer),
        }
    }
}

/// Precomputed tag positions for one text
#[derive(Debug, Clone)]
pub struct MarkupGuard {
    tags: Vec<TagPositions>,
    spans: Vec<Range<usize>>,
    newlines: Vec<usize>,
    scope: GuardScope,
}

impl MarkupGuard {
    /// Scan `text` once, recording openers and closers of the anchor tag and
    /// every tag in `excluded_tags`, plus the span of every tag's markup
    ///
    /// Tag names are compared literally and ASCII case-insensitively. A tag
    /// span starts at a `<` followed by a letter, `/`, `!` or `?` and ends at
    /// the first `>` outside a quoted attribute value. A span left open at the
    /// end of the text is not recorded.
    pub fn scan<S: AsRef<str>>(text: &str, excluded_tags: &[S], scope: GuardScope) -> Self {
        let mut tags = vec![TagPositions::new(ANCHOR_TAG.to_string())];
        for tag in excluded_tags {
            let tag = tag.as_ref().trim().to_ascii_lowercase();
            if tag.is_empty() || tags.iter().any(|t| t.tag == tag) {
                continue;
            }
            tags.push(TagPositions::new(tag));
        }

        let bytes = text.as_bytes();
        let mut newlines = Vec::new();
        let mut spans = Vec::new();
        let mut open_tag: Option<OpenTag> = None;

        for (pos, &byte) in bytes.iter().enumerate() {
            let mut closed = None;
            if let Some(tag) = open_tag.as_mut() {
                closed = tag.advance(byte, pos);
            } else if byte == b'<' && tag_starts_at(bytes, pos) {
                open_tag = Some(OpenTag::new(pos));
            }
            if let Some(span) = closed {
                spans.push(span);
                open_tag = None;
            }

            match byte {
                b'\n' => newlines.push(pos),
                b'<' => {
                    for positions in &mut tags {
                        match classify_tag(bytes, pos, positions.tag.as_bytes()) {
                            Some(TagKind::Open) => positions.openers.push(pos),
                            Some(TagKind::Close) => positions.closers.push(pos),
                            None => {}
                        }
                    }
                }
                _ => {}
            }
        }

        Self {
            tags,
            spans,
            newlines,
            scope,
        }
    }

    /// True when byte offset `at` lies inside a tag's own markup, such as an
    /// attribute value or the tag name
    pub fn inside_tag(&self, at: usize) -> bool {
        let idx = self.spans.partition_point(|span| span.start <= at);
        idx > 0 && self.spans[idx - 1].contains(&at)
    }

    /// Name of the first guarded element enclosing byte offset `at`
    ///
    /// The anchor tag is checked first, then excluded tags in configuration
    /// order.
    pub fn enclosing(&self, at: usize) -> Option<&str> {
        let reach = match self.scope {
            GuardScope::Line => first_at_or_after(&self.newlines, at),
            GuardScope::Document => None,
        };

        self.tags
            .iter()
            .find(|positions| {
                positions
                    .guarding_closer(at)
                    .is_some_and(|closer| reach.map_or(true, |newline| closer < newline))
            })
            .map(|positions| positions.tag.as_str())
    }

    /// Guarded tag names, anchor first
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|positions| positions.tag.as_str())
    }
}

/// A tag whose closing `>` has not been seen yet
#[derive(Debug)]
struct OpenTag {
    start: usize,
    quote: Option<u8>,
    after_equals: bool,
}

impl OpenTag {
    fn new(start: usize) -> Self {
        Self {
            start,
            quote: None,
            after_equals: false,
        }
    }

    /// Feed the byte at `pos`, returning the tag's span once it closes
    ///
    /// Quotes only open a value directly after `=`, so an apostrophe in an
    /// unquoted value does not swallow the rest of the text.
    fn advance(&mut self, byte: u8, pos: usize) -> Option<Range<usize>> {
        match (self.quote, byte) {
            (Some(quote), b) if b == quote => self.quote = None,
            (Some(_), _) => {}
            (None, b'>') => return Some(self.start..pos + 1),
            (None, b'=') => self.after_equals = true,
            (None, b'"' | b'\'') if self.after_equals => {
                self.quote = Some(byte);
                self.after_equals = false;
            }
            (None, b) if b.is_ascii_whitespace() => {}
            (None, _) => self.after_equals = false,
        }
        None
    }
}

/// True when the `<` at `pos` starts tag markup rather than a bare less-than
fn tag_starts_at(bytes: &[u8], pos: usize) -> bool {
    matches!(
        bytes.get(pos + 1),
        Some(b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?')
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
}

/// Classify the `<` at `pos` as an opener or closer of `tag`
///
/// An opener is `<tag` followed by whitespace, `>`, `/` or end of input, so
/// `<abbr>` does not open `a`. A closer is `</tag` followed by optional
/// whitespace and `>`.
fn classify_tag(bytes: &[u8], pos: usize, tag: &[u8]) -> Option<TagKind> {
    let rest = &bytes[pos + 1..];
    let (kind, name_start) = match rest.first() {
        Some(b'/') => (TagKind::Close, 1),
        Some(_) => (TagKind::Open, 0),
        None => return None,
    };

    let name = rest.get(name_start..name_start + tag.len())?;
    if !name.eq_ignore_ascii_case(tag) {
        return None;
    }

    let mut after = rest[name_start + tag.len()..].iter();
    match kind {
        TagKind::Open => match after.next() {
            None => Some(TagKind::Open),
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => Some(TagKind::Open),
            Some(_) => None,
        },
        TagKind::Close => match after.find(|b| !b.is_ascii_whitespace()) {
            Some(b'>') => Some(TagKind::Close),
            _ => None,
        },
    }
}

fn first_at_or_after(sorted: &[usize], at: usize) -> Option<usize> {
    let idx = sorted.partition_point(|&pos| pos < at);
    sorted.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    fn end_of(text: &str, needle: &str) -> usize {
        text.find(needle).unwrap() + needle.len()
    }

    #[test]
    fn test_inside_anchor() {
        let text = r#"<a href="x">milk</a> and milk"#;
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Line);

        assert_eq!(guard.enclosing(end_of(text, ">milk")), Some("a"));
        assert_eq!(guard.enclosing(text.len()), None);
    }

    #[test]
    fn test_next_anchor_is_not_enclosing() {
        // The closer belongs to a later anchor, opened after the match
        let text = r#"milk <a href="x">link</a>"#;
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Line);

        assert_eq!(guard.enclosing(4), None);
    }

    #[test]
    fn test_similar_tag_names_are_not_openers() {
        let text = r#"<a href="x">milk <abbr>m</abbr></a>"#;
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Line);

        assert_eq!(guard.enclosing(end_of(text, ">milk")), Some("a"));
    }

    #[test]
    fn test_uppercase_tags() {
        let text = r#"<A HREF="x">milk</A >"#;
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Line);

        assert_eq!(guard.enclosing(end_of(text, ">milk")), Some("a"));
    }

    #[test]
    fn test_excluded_tags_in_order() {
        let text = "<div><h1>milk</h1></div>";
        let guard = MarkupGuard::scan(text, &["div", "h1"], GuardScope::Line);

        // Both enclose the match; configuration order decides which is reported
        assert_eq!(guard.enclosing(end_of(text, "<h1>milk")), Some("div"));
        assert_eq!(guard.tags().collect::<Vec<_>>(), vec!["a", "div", "h1"]);
    }

    #[test]
    fn test_excluded_tag_names_are_literal() {
        let text = "<h1>milk</h1> <x.*>milk</x.*>";
        let guard = MarkupGuard::scan(text, &[" H1 ", "x.*", ""], GuardScope::Line);

        assert_eq!(guard.enclosing(end_of(text, "<h1>milk")), Some("h1"));
        assert_eq!(guard.enclosing(end_of(text, "<x.*>milk")), Some("x.*"));
    }

    #[test]
    fn test_line_scope_stops_at_newline() {
        let text = "<h1>milk\n</h1>";
        let line = MarkupGuard::scan(text, &["h1"], GuardScope::Line);
        let document = MarkupGuard::scan(text, &["h1"], GuardScope::Document);

        let at = end_of(text, "milk");
        assert_eq!(line.enclosing(at), None);
        assert_eq!(document.enclosing(at), Some("h1"));
    }

    #[test]
    fn test_document_scope_is_default() {
        assert_eq!(GuardScope::default(), GuardScope::Document);

        let text = "<a href=\"x\">\nfresh milk\n</a>";
        let guard = MarkupGuard::scan(text, NONE, GuardScope::default());
        assert_eq!(guard.enclosing(end_of(text, "milk")), Some("a"));
    }

    #[test]
    fn test_inside_tag_markup() {
        let text = r#"<p><img alt="milk > cream" src="x.png"> milk</p>"#;
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Document);

        assert!(guard.inside_tag(text.find("milk").unwrap()));
        assert!(guard.inside_tag(text.find("cream").unwrap()));
        assert!(guard.inside_tag(text.find("p>").unwrap()));
        assert!(!guard.inside_tag(text.rfind("milk").unwrap()));
    }

    #[test]
    fn test_tag_names_and_comments_are_markup() {
        let text = "<table><!-- milk --></table> table";
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Document);

        assert!(guard.inside_tag(1));
        assert!(guard.inside_tag(text.find("milk").unwrap()));
        assert!(guard.inside_tag(text.rfind("</table").unwrap() + 2));
        assert!(!guard.inside_tag(text.rfind("table").unwrap()));
    }

    #[test]
    fn test_bare_less_than_is_not_markup() {
        let text = "1 < 2 milk, x<3 milk";
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Document);

        assert!(!guard.inside_tag(text.find("milk").unwrap()));
        assert!(!guard.inside_tag(text.rfind("milk").unwrap()));
    }

    #[test]
    fn test_apostrophe_in_unquoted_value() {
        let text = "<p title=don't>milk</p>";
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Document);

        assert!(guard.inside_tag(text.find("don").unwrap()));
        assert!(!guard.inside_tag(text.find("milk").unwrap()));
    }

    #[test]
    fn test_unterminated_tag_is_not_recorded() {
        let text = "milk <b milk";
        let guard = MarkupGuard::scan(text, NONE, GuardScope::Document);

        assert!(!guard.inside_tag(text.rfind("milk").unwrap()));
    }

    #[test]
    fn test_classify_tag() {
        assert_eq!(classify_tag(b"<a>", 0, b"a"), Some(TagKind::Open));
        assert_eq!(classify_tag(b"<a href>", 0, b"a"), Some(TagKind::Open));
        assert_eq!(classify_tag(b"<a/>", 0, b"a"), Some(TagKind::Open));
        assert_eq!(classify_tag(b"<abbr>", 0, b"a"), None);
        assert_eq!(classify_tag(b"</a>", 0, b"a"), Some(TagKind::Close));
        assert_eq!(classify_tag(b"</a  >", 0, b"a"), Some(TagKind::Close));
        assert_eq!(classify_tag(b"</abbr>", 0, b"a"), None);
        assert_eq!(classify_tag(b"</a", 0, b"a"), None);
        assert_eq!(classify_tag(b"<", 0, b"a"), None);
    }
}
