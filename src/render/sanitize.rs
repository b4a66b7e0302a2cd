use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

use crate::util::is_safe_href;

/// Tags that survive sanitization. Everything else is removed, keeping its text.
const ALLOWED_TAGS: &[&str] = &[
    "b", "i", "em", "strong", "a", "code", "pre", "br", "p", "ul", "ol", "li", "blockquote", "img",
];

/// Allowed tags that never have content or a closing tag.
const VOID_TAGS: &[&str] = &["br", "img"];

/// Tags removed together with everything inside them.
const DISCARD_CONTENT_TAGS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

/// Attributes kept per tag, in output order. URL-valued attributes are
/// additionally filtered through [`is_safe_href`].
fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title"],
        "img" => &["src", "alt"],
        _ => &[],
    }
}

fn is_url_attribute(name: &str) -> bool {
    name == "href" || name == "src"
}

/// Reduces untrusted feed markup to a small allow-listed subset.
///
/// - Only `b i em strong a code pre br p ul ol li blockquote img` are kept
/// - `a` keeps `href` and `title`, `img` keeps `src` and `alt`; links and
///   image sources must be relative or use a safe scheme
/// - Every `a` opens in a new tab with `rel="noopener noreferrer"`
/// - `script`, `style`, `textarea`, `option` and `noscript` are removed with
///   their content; other tags are removed but their text is kept
/// - Comments and declarations are removed
/// - Text and attribute values are re-escaped; unclosed tags are closed
///
/// ```
/// use herald::render::sanitize;
///
/// assert_eq!(
///     sanitize(r#"<p onclick="x()">Hi <a href="https://e.com">there</a><script>bad()</script></p>"#),
///     r#"<p>Hi <a href="https://e.com" target="_blank" rel="noopener noreferrer">there</a></p>"#
/// );
/// ```
pub fn sanitize(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut open: Vec<&'static str> = Vec::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        push_text(&mut out, &rest[..lt]);
        let after = &rest[lt + 1..];

        // Comments
        if let Some(comment) = after.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        // Doctype, CDATA remnants, processing instructions
        if after.starts_with('!') || after.starts_with('?') {
            rest = after.find('>').map_or("", |end| &after[end + 1..]);
            continue;
        }

        let starts_tag = after
            .trim_start_matches('/')
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_tag {
            push_text(&mut out, "<");
            rest = after;
            continue;
        }

        let Some(tag) = Tag::scan(after) else {
            // Unterminated tag: nothing after it can be trusted
            rest = "";
            break;
        };
        rest = &after[tag.consumed..];

        if !tag.closing && DISCARD_CONTENT_TAGS.contains(&tag.name.as_str()) {
            rest = skip_past_closing(rest, &tag.name);
            continue;
        }

        let Some(&name) = ALLOWED_TAGS.iter().find(|t| **t == tag.name) else {
            continue;
        };

        if tag.closing {
            if let Some(pos) = open.iter().rposition(|t| *t == name) {
                for t in open.drain(pos..).rev() {
                    push_closing(&mut out, t);
                }
            }
            continue;
        }

        push_opening(&mut out, name, &tag.attributes);
        if !VOID_TAGS.contains(&name) {
            open.push(name);
        }
    }

    push_text(&mut out, rest);
    for t in open.into_iter().rev() {
        push_closing(&mut out, t);
    }

    out
}

fn push_text(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    let decoded = decode_html_entities(text);
    out.push_str(&encode_text(&decoded));
}

fn push_opening(out: &mut String, name: &str, attributes: &[(String, String)]) {
    out.push('<');
    out.push_str(name);

    for &allowed in allowed_attributes(name) {
        let Some((_, value)) = attributes.iter().find(|(n, _)| n == allowed) else {
            continue;
        };
        let value = decode_html_entities(value);
        if is_url_attribute(allowed) && !is_safe_href(value.trim()) {
            continue;
        }
        out.push(' ');
        out.push_str(allowed);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(value.trim()));
        out.push('"');
    }

    if name == "a" {
        out.push_str(r#" target="_blank" rel="noopener noreferrer""#);
    }

    if VOID_TAGS.contains(&name) {
        out.push_str(" />");
    } else {
        out.push('>');
    }
}

fn push_closing(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Returns the input after the closing tag for `name`, or `""` if there is none.
fn skip_past_closing<'a>(rest: &'a str, name: &str) -> &'a str {
    let needle = format!("</{name}");
    let Some(start) = rest.to_ascii_lowercase().find(&needle) else {
        return "";
    };
    let tail = &rest[start..];
    tail.find('>').map_or("", |end| &tail[end + 1..])
}

/// A start or end tag read from markup.
#[derive(Debug, PartialEq)]
struct Tag {
    /// Lowercased tag name
    name: String,
    closing: bool,
    /// Attributes in source order, names lowercased, values raw
    attributes: Vec<(String, String)>,
    /// Bytes of input consumed after the `<`, including the `>`
    consumed: usize,
}

impl Tag {
    /// Reads a tag from the text following `<`. Returns `None` if the tag
    /// is never terminated.
    fn scan(input: &str) -> Option<Tag> {
        let bytes = input.as_bytes();
        let mut pos = 0;

        let closing = bytes.first() == Some(&b'/');
        if closing {
            pos += 1;
        }

        let name_start = pos;
        while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
            pos += 1;
        }
        let name = input[name_start..pos].to_ascii_lowercase();

        let mut attributes = Vec::new();
        loop {
            while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
                pos += 1;
            }
            match bytes.get(pos) {
                None => return None,
                Some(b'>') => {
                    return Some(Tag {
                        name,
                        closing,
                        attributes,
                        consumed: pos + 1,
                    });
                }
                Some(_) => {}
            }

            let attr_start = pos;
            while pos < bytes.len()
                && !bytes[pos].is_ascii_whitespace()
                && !matches!(bytes[pos], b'=' | b'>' | b'/')
            {
                pos += 1;
            }
            let attr_name = input[attr_start..pos].to_ascii_lowercase();

            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            let mut value = String::new();
            if bytes.get(pos) == Some(&b'=') {
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                match bytes.get(pos) {
                    Some(&quote) if quote == b'"' || quote == b'\'' => {
                        let value_start = pos + 1;
                        let len = input[value_start..].find(quote as char)?;
                        value = input[value_start..value_start + len].to_string();
                        pos = value_start + len + 1;
                    }
                    _ => {
                        let value_start = pos;
                        while pos < bytes.len()
                            && !bytes[pos].is_ascii_whitespace()
                            && bytes[pos] != b'>'
                        {
                            pos += 1;
                        }
                        value = input[value_start..pos].to_string();
                    }
                }
            }

            if !attr_name.is_empty() {
                attributes.push((attr_name, value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allowed_markup_passes_through() {
        let html = "<p>Hello <b>bold</b> <em>em</em> <code>x</code></p><ul><li>one</li></ul>";
        assert_eq!(sanitize(html), html);
    }

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(sanitize("Fish & chips"), "Fish &amp; chips");
        assert_eq!(sanitize("1 < 2"), "1 &lt; 2");
        assert_eq!(sanitize("already &amp; escaped"), "already &amp; escaped");
    }

    #[test]
    fn test_disallowed_tags_keep_text() {
        assert_eq!(
            sanitize(r#"<div class="x"><span>inside</span> <h1>Title</h1></div>"#),
            "inside Title"
        );
    }

    #[test]
    fn test_script_and_style_dropped_with_content() {
        assert_eq!(sanitize("a<script>alert('x')</script>b"), "ab");
        assert_eq!(sanitize("a<STYLE>p{}</Style>b"), "ab");
        assert_eq!(sanitize("a<script>never closed"), "a");
    }

    #[test]
    fn test_links_rewritten_and_filtered() {
        assert_eq!(
            sanitize(r#"<a href="https://e.com/x?a=1&amp;b=2" title="T" onclick="evil()" target="_self">go</a>"#),
            r#"<a href="https://e.com/x?a=1&amp;b=2" title="T" target="_blank" rel="noopener noreferrer">go</a>"#
        );
        assert_eq!(
            sanitize(r#"<a href="javascript:alert(1)">x</a>"#),
            r#"<a target="_blank" rel="noopener noreferrer">x</a>"#
        );
        assert_eq!(
            sanitize("<a href=/relative>rel</a>"),
            r#"<a href="/relative" target="_blank" rel="noopener noreferrer">rel</a>"#
        );
    }

    #[test]
    fn test_images_keep_src_and_alt_only() {
        assert_eq!(
            sanitize(r#"<img src="https://e.com/a.png" alt="A &quot;pic&quot;" width="5" onerror="x()">"#),
            r#"<img src="https://e.com/a.png" alt="A &quot;pic&quot;" />"#
        );
        assert_eq!(sanitize(r#"<img src="data:image/png;base64,AAAA"/>"#), "<img />");
    }

    #[test]
    fn test_unclosed_tags_closed_and_stray_closers_dropped() {
        assert_eq!(sanitize("<p><b>open"), "<p><b>open</b></p>");
        assert_eq!(sanitize("</i>stray</p>"), "stray");
        assert_eq!(sanitize("<b><i>x</b>y"), "<b><i>x</i></b>y");
    }

    #[test]
    fn test_void_tags() {
        assert_eq!(sanitize("a<br>b<BR/>c"), "a<br />b<br />c");
    }

    #[test]
    fn test_comments_and_declarations_removed() {
        assert_eq!(sanitize("<!DOCTYPE html>a<!-- hidden <b> -->b<?xml x?>c"), "abc");
        assert_eq!(sanitize("a<!-- never closed"), "a");
    }

    #[test]
    fn test_unterminated_tag_drops_remainder() {
        assert_eq!(sanitize("safe <a href=\"x"), "safe ");
        assert_eq!(sanitize("safe <b"), "safe ");
    }

    #[test]
    fn test_uppercase_tags_normalized() {
        assert_eq!(sanitize("<P>Up</P>"), "<p>Up</p>");
    }

    #[test]
    fn test_quoted_gt_inside_attribute() {
        let out = sanitize(r#"<a title="a > b" href="https://e.com">t</a>"#);
        assert!(out.starts_with(r#"<a href="https://e.com" title="a "#));
        assert!(out.ends_with(r#" target="_blank" rel="noopener noreferrer">t</a>"#));
        assert!(!out.contains(" b\" href"));
    }

    #[test]
    fn test_scan_tag_attributes() {
        let tag = Tag::scan(r#"A HREF='x' data-id=7 disabled>rest"#).unwrap();
        assert_eq!(tag.name, "a");
        assert!(!tag.closing);
        assert_eq!(
            tag.attributes,
            vec![
                ("href".to_string(), "x".to_string()),
                ("data-id".to_string(), "7".to_string()),
                ("disabled".to_string(), String::new()),
            ]
        );
        assert_eq!(&r#"A HREF='x' data-id=7 disabled>rest"#[tag.consumed..], "rest");
    }
}
