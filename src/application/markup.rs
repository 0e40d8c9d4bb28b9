//! Markdown rendering and the small HTML queries the post page needs.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use ammonia::Builder as AmmoniaBuilder;
use comrak::{
    Arena, format_html,
    nodes::{AstNode, NodeValue},
    options::Options,
    parse_document,
};
use lol_html::{RewriteStrSettings, element, rewrite_str};
use once_cell::sync::Lazy;
use thiserror::Error;

static SANITIZER: Lazy<AmmoniaBuilder<'static>> = Lazy::new(build_sanitizer);

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("failed to render markdown: {message}")]
    Markdown { message: String },
    #[error("failed to query rendered html: {message}")]
    Html { message: String },
}

/// The first image of a rendered post, used for social cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadImage {
    pub src: String,
    pub alt: Option<String>,
}

/// Render markdown to sanitised HTML.
pub fn render_markdown(markdown: &str) -> Result<String, MarkupError> {
    let options = markdown_options();
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);

    let mut html = String::new();
    format_html(root, &options, &mut html).map_err(|err| MarkupError::Markdown {
        message: err.to_string(),
    })?;

    Ok(SANITIZER.clean(&html).to_string())
}

/// Text content of a markdown document with whitespace collapsed.
pub fn plain_text(markdown: &str) -> String {
    let options = markdown_options();
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);

    let mut text = String::new();
    collect_text(root, &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find the first `<img>` carrying a `src` in an HTML fragment.
pub fn lead_image(html: &str) -> Result<Option<LeadImage>, MarkupError> {
    let found: Rc<RefCell<Option<LeadImage>>> = Rc::new(RefCell::new(None));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("img[src]", {
                let found = Rc::clone(&found);
                move |el| {
                    let mut found = found.borrow_mut();
                    if found.is_none()
                        && let Some(src) = el.get_attribute("src")
                    {
                        let alt = el
                            .get_attribute("alt")
                            .map(|alt| alt.trim().to_string())
                            .filter(|alt| !alt.is_empty());
                        *found = Some(LeadImage { src, alt });
                    }
                    Ok(())
                }
            })],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| MarkupError::Html {
        message: err.to_string(),
    })?;

    Ok(found.take())
}

fn collect_text<'a>(node: &'a AstNode<'a>, buffer: &mut String) {
    let separates_blocks = {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Text(text) => buffer.push_str(text),
            NodeValue::Code(code) => buffer.push_str(&code.literal),
            NodeValue::CodeBlock(block) => buffer.push_str(&block.literal),
            NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
            _ => {}
        }
        matches!(
            data.value,
            NodeValue::Paragraph
                | NodeValue::Heading(_)
                | NodeValue::Item(_)
                | NodeValue::BlockQuote
                | NodeValue::TableCell
        )
    };

    let mut child = node.first_child();
    while let Some(next) = child {
        collect_text(next, buffer);
        child = next.next_sibling();
    }

    if separates_blocks {
        buffer.push(' ');
    }
}

fn markdown_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;

    options.render.r#unsafe = true;
    options
}

fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();
    builder.add_tag_attributes("img", &["title", "width", "height", "loading"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder.add_tags(&["input"]);
    builder.add_url_schemes(HashSet::from(["http", "https", "mailto"]));
    builder
}
