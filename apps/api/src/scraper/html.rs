//! HTML text extraction helpers for scraped pages.

use std::sync::LazyLock;

use regex::Regex;

use super::{PageData, BODY_TEXT_LIMIT};

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 regex"));
static META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
});
static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("valid body regex"));
static INVISIBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|template|head)\b[^>]*>.*?</(script|style|noscript|template|head)>")
        .expect("valid invisible-block regex")
});
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Extracts title, meta description, first `h1` and visible body text.
pub fn extract_page_data(html: &str) -> PageData {
    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .unwrap_or_default();

    let h1 = H1_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| strip_tags(m.as_str()))
        .unwrap_or_default();

    let body = BODY_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map_or(html, |m| m.as_str());
    let body_text: String = strip_tags(body).chars().take(BODY_TEXT_LIMIT).collect();

    PageData {
        title,
        meta_description: extract_meta_description(html),
        h1,
        body_text,
    }
}

fn extract_meta_description(html: &str) -> String {
    for tag in META_RE.find_iter(html) {
        let mut name = None;
        let mut content = None;
        for cap in ATTR_RE.captures_iter(tag.as_str()) {
            let value = cap.get(2).or_else(|| cap.get(3)).map_or("", |m| m.as_str());
            match cap[1].to_ascii_lowercase().as_str() {
                "name" => name = Some(value.to_ascii_lowercase()),
                "content" => content = Some(value),
                _ => {}
            }
        }
        if name.as_deref() == Some("description") {
            return clean_text(content.unwrap_or_default());
        }
    }
    String::new()
}

fn strip_tags(fragment: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(fragment, " ");
    let visible = INVISIBLE_RE.replace_all(&without_comments, " ");
    let text = TAG_RE.replace_all(&visible, " ");
    clean_text(&text)
}

fn clean_text(input: &str) -> String {
    let decoded = input
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        // Last, so an escaped entity stays literal.
        .replace("&amp;", "&");
    WS_RE.replace_all(&decoded, " ").trim().to_string()
}
