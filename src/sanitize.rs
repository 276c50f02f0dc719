//! Article body clean-up.
//!
//! Guardian bodies are HTML fragments full of inline links and embedded
//! `<figure>` blocks (images, captions, embeds). For print both are noise:
//! links become their visible text and figures disappear entirely. All other
//! markup is written back out as parsed.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Elements whose text children are serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Strip links from an article body and remove all figures.
///
/// Each `<a>` is replaced by the text it contains (the target is dropped) and
/// each `<figure>` is removed together with its subtree. Malformed input is
/// parsed best-effort with the HTML5 fragment algorithm, so this never fails.
/// Running it on its own output returns that output unchanged.
///
/// # Examples
///
/// ```ignore
/// let body = r#"<p>See <a href="x">this</a> story</p><figure><img src="y"></figure>"#;
/// assert_eq!(clean_article_html(body), "<p>See this story</p>");
/// ```
pub fn clean_article_html(html_content: &str) -> String {
    if html_content.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html_content);
    let mut out = String::with_capacity(html_content.len());
    for child in fragment.root_element().children() {
        write_node(&mut out, child, false);
    }
    out
}

fn write_node(out: &mut String, node: NodeRef<'_, Node>, raw_text: bool) {
    match node.value() {
        Node::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_text(out, text);
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(el) => match el.name() {
            "figure" => {}
            "a" => {
                let label: String = node
                    .descendants()
                    .filter_map(|n| n.value().as_text())
                    .map(|t| &**t)
                    .collect();
                escape_text(out, &label);
            }
            name => {
                out.push('<');
                out.push_str(name);
                for (attr, value) in el.attrs() {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    escape_attr(out, value);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    return;
                }

                let raw = RAW_TEXT_ELEMENTS.contains(&name);
                for child in node.children() {
                    write_node(out, child, raw);
                }

                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        },
        _ => {}
    }
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
