//! Inline rich text runs to HTML.

use super::links::{internal_target, page_link};
use super::{dates, math, RenderContext};
use crate::html::{escape, escape_angles};
use crate::media::is_emoji;
use blockwiki_types::{Annotations, Mention, RichText};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

/// Render runs concurrently and concatenate them in order.
pub async fn render_rich_text(runs: &[RichText], ctx: &RenderContext<'_>) -> String {
    join_all(runs.iter().map(|run| render_run(run, ctx)))
        .await
        .concat()
}

pub async fn render_run(run: &RichText, ctx: &RenderContext<'_>) -> String {
    match run {
        RichText::Text {
            content,
            annotations,
            link,
        } => {
            let text = replace_emoji(&escape_angles(content), ctx).await;
            let text = annotate(text, annotations);
            match link {
                Some(url) if url.starts_with('/') => match internal_target(url) {
                    Some(target) => {
                        ctx.link_to(&target);
                        page_link(ctx, &target, Some(&text))
                    }
                    None => {
                        warn!("Unresolvable internal link {}", url);
                        format!(r#"<a href="{}">{}</a>"#, escape(url), text)
                    }
                },
                Some(url) => format!(r#"<a href="{}">{}</a>"#, escape(url), text),
                None => text,
            }
        }
        RichText::Mention { mention, label } => match mention {
            Mention::Page { id } => {
                ctx.link_to(id);
                let label = label.as_deref().map(escape_angles);
                page_link(ctx, id, label.as_deref())
            }
            Mention::Date { start, .. } => dates::format_date(start, ctx.today),
            Mention::Unknown { kind } => {
                warn!("Unrecognized mention -- {}", kind);
                String::new()
            }
        },
        RichText::Equation { expression } => math::inline(expression),
        RichText::Unknown { kind } => {
            warn!("Unrecognized text -- {}", kind);
            String::new()
        }
    }
}

/// Wrap in annotation tags, bold outermost and code innermost.
fn annotate(mut text: String, annotations: &Annotations) -> String {
    let wrappers = [
        (annotations.code, "code"),
        (annotations.strikethrough, "strike"),
        (annotations.underline, "u"),
        (annotations.italic, "em"),
        (annotations.bold, "strong"),
    ];
    for (enabled, tag) in wrappers {
        if enabled {
            text = format!("<{tag}>{text}</{tag}>");
        }
    }
    text
}

/// Swap every emoji grapheme for its image, resolving each distinct emoji once.
///
/// Emoji without an image stay as text. Text-presentation symbols are left alone.
async fn replace_emoji(text: &str, ctx: &RenderContext<'_>) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for grapheme in text.graphemes(true) {
        if is_emoji(grapheme) && !distinct.contains(&grapheme) {
            distinct.push(grapheme);
        }
    }
    if distinct.is_empty() {
        return text.to_string();
    }

    let assets = join_all(distinct.iter().map(|emoji| ctx.media.emoji(emoji))).await;
    let images: HashMap<&str, String> = distinct
        .into_iter()
        .zip(assets)
        .filter_map(|(emoji, asset)| Some((emoji, asset?.img_tag())))
        .collect();

    text.graphemes(true)
        .map(|grapheme| images.get(grapheme).map(String::as_str).unwrap_or(grapheme))
        .collect()
}
