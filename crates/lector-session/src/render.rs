//! Result rendering
//!
//! The backend may embed structural markup in its result text. Everything
//! that touches that markup goes through [`ResultRenderer`], which is the one
//! place a sanitization step belongs.
//!
//! SECURITY: markup is passed through verbatim. [`RenderedResult::is_sanitized`]
//! reports `false` until a sanitizer is wired in here.

use serde::Serialize;

/// Elements whose boundaries become line breaks in plain text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// A rendered extraction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedResult {
    markup: String,
    plain_text: String,
    sanitized: bool,
}

impl RenderedResult {
    /// Markup exactly as the backend sent it
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Markup stripped to plain text
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// Whether the markup went through a sanitizer (currently never)
    pub fn is_sanitized(&self) -> bool {
        self.sanitized
    }
}

/// Renders backend result text
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer;

impl ResultRenderer {
    /// Render `text` as rich content
    pub fn render(text: &str) -> RenderedResult {
        RenderedResult {
            markup: text.to_string(),
            plain_text: plain_text(text),
            sanitized: false,
        }
    }
}

/// Strip markup from `markup`
///
/// Tags are removed, entities decoded, and block-level boundaries turned
/// into line breaks. `<style>` and `<script>` bodies are dropped. Lines are
/// trimmed and blank lines removed.
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    let mut skipping: Option<&'static str> = None;

    while let Some(lt) = rest.find('<') {
        let (text, after) = rest.split_at(lt);
        if skipping.is_none() {
            decode_entities_into(text, &mut out);
        }

        let Some(gt) = after.find('>') else {
            // Unterminated tag: keep the remainder as text
            if skipping.is_none() {
                decode_entities_into(after, &mut out);
            }
            rest = "";
            break;
        };

        let tag = &after[1..gt];
        rest = &after[gt + 1..];
        let (closing, name) = tag_name(tag);

        if let Some(skip) = skipping {
            if closing && name == skip {
                skipping = None;
            }
            continue;
        }

        match name.as_str() {
            "style" if !closing && !tag.ends_with('/') => skipping = Some("style"),
            "script" if !closing && !tag.ends_with('/') => skipping = Some("script"),
            n if BLOCK_ELEMENTS.contains(&n) => out.push('\n'),
            _ => {}
        }
    }

    if skipping.is_none() {
        decode_entities_into(rest, &mut out);
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn tag_name(tag: &str) -> (bool, String) {
    let tag = tag.trim_start();
    let (closing, body) = match tag.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, tag),
    };
    let name = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (closing, name)
}

fn decode_entities_into(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        let decoded = candidate
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_entity(&candidate[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
