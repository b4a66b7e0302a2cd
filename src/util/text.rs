use std::borrow::Cow;

/// Tags that separate blocks of text. When stripped they leave a space
/// behind so adjacent words do not run together.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
    "section", "table", "tr", "td", "pre",
];

/// Converts an HTML fragment into a plain-text snippet.
///
/// Markup is removed, block-level tags are replaced by whitespace, entities
/// are decoded and runs of whitespace collapse to a single space. The result
/// is trimmed. Text that does not look like a tag (`a < b`) is kept as is.
///
/// # Examples
///
/// ```
/// use herald::util::html_to_text;
///
/// assert_eq!(html_to_text("<p>Hello <b>world</b></p><p>again</p>"), "Hello world again");
/// assert_eq!(html_to_text("Fish &amp; chips"), "Fish & chips");
/// assert_eq!(html_to_text("1 < 2"), "1 < 2");
/// ```
pub fn html_to_text(html: &str) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        stripped.push_str(&rest[..lt]);
        let after = &rest[lt + 1..];

        let looks_like_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?');
        if !looks_like_tag {
            stripped.push('<');
            rest = after;
            continue;
        }

        // Comments may contain '>' and end only at "-->"
        if let Some(comment) = after.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        let Some(gt) = find_tag_end(after) else {
            // Unterminated tag: drop the remainder
            rest = "";
            break;
        };

        let name: String = after
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if BLOCK_TAGS.contains(&name.as_str()) {
            stripped.push(' ');
        }

        rest = &after[gt + 1..];

        // Script and style bodies are not text
        if !after.starts_with('/') && (name == "script" || name == "style") {
            let closing = format!("</{name}");
            rest = match rest.to_ascii_lowercase().find(&closing) {
                Some(end) => &rest[end..],
                None => "",
            };
        }
    }
    stripped.push_str(rest);

    let decoded = html_escape::decode_html_entities(&stripped);
    collapse_whitespace(&decoded)
}

/// Byte offset of the `>` closing a tag, skipping any inside quoted
/// attribute values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    for (i, b) in tag.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips ASCII control characters (other than tab, newline and carriage
/// return) and DEL from feed-supplied text.
///
/// Feed titles occasionally carry stray control bytes from broken encoders;
/// they are invalid in HTML documents and are dropped before rendering.
///
/// Returns `Cow::Borrowed` when the input contains no control characters (common case).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_control = |c: char| c == '\x7f' || (c < '\x20' && c != '\t' && c != '\n' && c != '\r');

    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_control(c)).collect())
}
