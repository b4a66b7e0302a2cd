use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::feed::{Entry, Source, PLACEHOLDER_LINK};
use crate::render::{humanize, sanitize};
use crate::util::is_safe_href;

/// Page-level text that does not come from feeds.
#[derive(Debug, Clone)]
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

const STYLE: &str = r#"
  :root { --bg:#0b0f14; --fg:#e8eef5; --muted:#9fb3c8; --card:#121821; --accent:#7cc4ff; }
  *{box-sizing:border-box}
  body{margin:0; font-family:ui-sans-serif,system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial; background:var(--bg); color:var(--fg);}
  header{padding:24px 16px; border-bottom:1px solid #1f2937;}
  .wrap{max-width:1024px; margin:0 auto; padding:0 16px;}
  h1{margin:0 0 8px; font-size:28px}
  .meta-line{color:var(--muted); font-size:14px}
  .grid{display:grid; grid-template-columns:repeat(auto-fill,minmax(320px,1fr)); gap:16px; padding:24px 0 64px;}
  .card{background:var(--card); border:1px solid #1f2937; padding:16px; border-radius:16px; box-shadow:0 2px 12px rgba(0,0,0,.2);}
  .card h3{margin:0 0 6px; font-size:18px; line-height:1.3}
  .card a{color:var(--fg); text-decoration:none}
  .card a:hover{color:var(--accent)}
  .card .meta{display:flex; gap:8px; color:var(--muted); font-size:12px; margin:0 0 8px;}
  .desc{margin:8px 0 0; color:#cfe2f3; font-size:14px; line-height:1.45}
  footer{border-top:1px solid #1f2937; color:var(--muted); font-size:13px; padding:16px 0 48px;}
  .sources{display:flex; flex-wrap:wrap; gap:8px; margin-top:6px}
  .pill{padding:4px 8px; border:1px solid #263445; border-radius:999px; color:#a5b4c3; font-size:12px}
"#;

/// Renders one entry as an `<article>` card.
///
/// Titles and source names are escaped; the description goes through
/// [`sanitize`]. Links with an unsafe scheme are replaced by `#`.
pub fn render_card(entry: &Entry, now: DateTime<Utc>) -> String {
    let link = if is_safe_href(&entry.link) {
        entry.link.as_str()
    } else {
        PLACEHOLDER_LINK
    };
    let desc = sanitize(&entry.description_html);
    let desc_html = if desc.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="desc">{desc}</p>"#)
    };

    format!(
        r#"
  <article class="card">
    <h3><a href="{link}" target="_blank" rel="noopener">{title}</a></h3>
    <div class="meta">
      <span>{source}</span>
      <span>•</span>
      <time>{time}</time>
    </div>
    {desc_html}
  </article>"#,
        link = encode_double_quoted_attribute(link),
        title = encode_text(&entry.title),
        source = encode_text(&entry.source_name),
        time = humanize(entry.published, now),
    )
}

/// Renders the complete HTML document.
///
/// `sources` drives the row of source pills in the header and includes
/// sources that failed this run.
pub fn render_page(
    meta: &PageMeta<'_>,
    entries: &[Entry],
    sources: &[Source],
    now: DateTime<Utc>,
) -> String {
    let cards: Vec<String> = entries.iter().map(|e| render_card(e, now)).collect();
    let pills: String = sources
        .iter()
        .map(|s| format!(r#"<span class="pill">{}</span>"#, encode_text(&s.name)))
        .collect();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{title} – Aggregated</title>
<meta name="description" content="{description}"/>
<style>{STYLE}</style>
</head>
<body>
  <header>
    <div class="wrap">
      <h1>{title}</h1>
      <div class="meta-line">Updated {updated}</div>
      <div class="sources">{pills}</div>
    </div>
  </header>
  <main class="wrap">
    <section class="grid">
      {cards}
    </section>
  </main>
  <footer>
    <div class="wrap">
      Static page • No cookies • Links go to original publishers.
    </div>
  </footer>
</body>
</html>
"#,
        title = encode_text(meta.title),
        description = encode_double_quoted_attribute(meta.description),
        updated = now.format("%Y-%m-%d %H:%M UTC"),
        cards = cards.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn entry(title: &str, link: &str, desc: &str) -> Entry {
        Entry {
            title: title.to_string(),
            link: link.to_string(),
            description_html: desc.to_string(),
            published: Some(now() - Duration::hours(2)),
            source_name: "Example & Co".to_string(),
        }
    }

    #[test]
    fn test_card_escapes_title_and_source() {
        let card = render_card(&entry("<b>Hi</b>", "https://e.com/1", ""), now());
        assert!(card.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(card.contains("<span>Example &amp; Co</span>"));
        assert!(card.contains("<time>2 hours ago</time>"));
        assert!(card.contains(r#"href="https://e.com/1""#));
    }

    #[test]
    fn test_card_omits_empty_description() {
        let card = render_card(&entry("T", "https://e.com/1", ""), now());
        assert!(!card.contains("class=\"desc\""));

        let card = render_card(&entry("T", "https://e.com/1", "<script>x</script>"), now());
        assert!(!card.contains("class=\"desc\""));
    }

    #[test]
    fn test_card_sanitizes_description() {
        let card = render_card(
            &entry("T", "https://e.com/1", r#"<p>ok <img src=x onerror="alert(1)"></p>"#),
            now(),
        );
        assert!(card.contains(r#"<p class="desc"><p>ok <img src="x" /></p></p>"#));
        assert!(!card.contains("onerror"));
    }

    #[test]
    fn test_card_replaces_unsafe_link() {
        let card = render_card(&entry("T", "javascript:alert(1)", ""), now());
        assert!(card.contains(r##"href="#""##));
        assert!(!card.contains("javascript"));
    }

    #[test]
    fn test_page_lists_sources_and_cards_in_order() {
        let entries = vec![
            entry("First", "https://e.com/1", ""),
            entry("Second", "https://e.com/2", ""),
        ];
        let sources = vec![
            Source {
                url: "https://a.example/rss".into(),
                name: "Alpha".into(),
                max_items: 5,
            },
            Source {
                url: "https://b.example/rss".into(),
                name: "Beta".into(),
                max_items: 5,
            },
        ];
        let meta = PageMeta {
            title: "My News",
            description: "All the things",
        };

        let page = render_page(&meta, &entries, &sources, now());
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("<h1>My News</h1>"));
        assert!(page.contains("Updated 2025-06-15 12:00 UTC"));
        assert!(page.contains(
            r#"<div class="sources"><span class="pill">Alpha</span><span class="pill">Beta</span></div>"#
        ));
        let first = page.find("First").unwrap();
        let second = page.find("Second").unwrap();
        assert!(first < second);
        assert_eq!(page.matches("<article class=\"card\">").count(), 2);
    }

    #[test]
    fn test_empty_page_still_renders() {
        let meta = PageMeta {
            title: "Empty",
            description: "",
        };
        let page = render_page(&meta, &[], &[], now());
        assert!(page.contains("<section class=\"grid\">"));
        assert!(!page.contains("<article"));
    }
}
