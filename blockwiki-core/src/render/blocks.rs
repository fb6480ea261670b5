//! Recursive block rendering.
//!
//! Children are rendered concurrently and joined in source order before the
//! parent's own markup is assembled.

use super::links::page_link;
use super::rich_text::render_rich_text;
use super::{math, RenderContext};
use crate::html::escape;
use blockwiki_types::{plain_text, Block, BlockId, BlockKind, Icon, ImageSource, ListKind};
use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::warn;

/// DOM id for a block: `b` + the first 8 hex characters of its id
pub fn anchor_id(id: &BlockId) -> String {
    format!("b{}", id.prefix(8))
}

/// Render a sequence of sibling blocks and concatenate them in order.
pub async fn render_blocks(blocks: &[Block], ctx: &RenderContext<'_>) -> String {
    join_all(blocks.iter().map(|block| render_block(block, ctx)))
        .await
        .concat()
}

pub fn render_block<'a>(block: &'a Block, ctx: &'a RenderContext<'a>) -> BoxFuture<'a, String> {
    async move {
        let children = join_all(block.children.iter().map(|child| render_block(child, ctx)))
            .await
            .join("\n");
        let anchor = anchor_id(&block.id);

        match &block.kind {
            BlockKind::List { list } => {
                let tag = list_tag(*list);
                format!(r#"<{tag} id="{anchor}">{children}</{tag}>"#)
            }
            BlockKind::ListItem { text, .. } => {
                let text = render_rich_text(text, ctx).await;
                format!(r#"<li id="{anchor}"><div class="list-item">{text}</div>{children}</li>"#)
            }
            BlockKind::Paragraph { text } => {
                let text = render_rich_text(text, ctx).await;
                format!(
                    r#"<div class="text" id="{anchor}">{text}<div class="children">{children}</div></div>"#
                )
            }
            BlockKind::Heading { level, text } => {
                let n = level.as_u8();
                let text = render_rich_text(text, ctx).await;
                format!(r#"<h{n} id="{anchor}">{text}</h{n}>"#)
            }
            BlockKind::Toggle { text } => {
                let text = render_rich_text(text, ctx).await;
                format!(r#"<details id="{anchor}"><summary>{text}</summary>{children}</details>"#)
            }
            BlockKind::Code { language, text } => {
                let language = language.to_lowercase();
                let class: String = language
                    .chars()
                    .map(|c| if c.is_whitespace() { '-' } else { c })
                    .collect();
                let code = ctx.highlighter.highlight(&plain_text(text), &language);
                format!(
                    r#"<pre id="{anchor}"><code class="language-{}">{code}</code></pre>"#,
                    escape(&class)
                )
            }
            BlockKind::Equation { expression } => math::display(expression),
            BlockKind::Image { source, caption } => {
                let caption = plain_text(caption);
                match source {
                    ImageSource::Hosted { url } => {
                        ctx.media.image(&block.id, url, &caption, &anchor).await
                    }
                    ImageSource::External { url } => {
                        let caption = escape(&caption);
                        format!(
                            r#"<figure id="{anchor}"><img alt="{caption}" src="{}"><figcaption>{caption}</figcaption></figure>"#,
                            escape(url)
                        )
                    }
                    ImageSource::Unknown { kind } => {
                        warn!("Unrecognized image source {} in block {}", kind, block.id);
                        String::new()
                    }
                }
            }
            BlockKind::ToDo { checked, text } => {
                let checked = if *checked { " checked" } else { "" };
                let text = render_rich_text(text, ctx).await;
                format!(
                    r#"<div class="to-do"><label><input type="checkbox" onclick="return false" disabled{checked}>{text}</label></div>"#
                )
            }
            BlockKind::Quote { text } => {
                let text = render_rich_text(text, ctx).await;
                format!("<blockquote><p>{text}</p>{children}</blockquote>")
            }
            BlockKind::Divider => "<hr />".to_string(),
            BlockKind::Unsupported => "[unsupported]".to_string(),
            BlockKind::Callout { icon, text } => {
                let icon = match icon {
                    Some(icon) => {
                        let icon = callout_icon(icon, ctx).await;
                        format!(r#"<span class="callout-icon">{icon}</span>"#)
                    }
                    None => String::new(),
                };
                let text = render_rich_text(text, ctx).await;
                format!(
                    r#"<div class="callout" id="{anchor}">{icon}<div class="callout-text">{text}</div>{children}</div>"#
                )
            }
            BlockKind::Embed { url } => match ctx.media.embed(url).await {
                Some(html) => format!(r#"<div class="embed tweet" id="{anchor}">{html}</div>"#),
                None => {
                    warn!("Unrecognized embed {}", url);
                    let url = escape(url);
                    format!(r#"<div class="embed" id="{anchor}"><a href="{url}">{url}</a></div>"#)
                }
            },
            BlockKind::LinkToPage { page_id } => {
                ctx.link_to(page_id);
                format!(
                    r#"<div class="link-to-page" id="{anchor}">{}</div>"#,
                    page_link(ctx, page_id, None)
                )
            }
            BlockKind::Unknown { .. } => {
                warn!("Unrecognized block -- {} ({})", block.kind.name(), block.id);
                String::new()
            }
        }
    }
    .boxed()
}

fn list_tag(list: ListKind) -> &'static str {
    match list {
        ListKind::Bulleted => "ul",
        ListKind::Numbered => "ol",
    }
}

async fn callout_icon(icon: &Icon, ctx: &RenderContext<'_>) -> String {
    match icon {
        Icon::Emoji { emoji } => match ctx.media.emoji(emoji).await {
            Some(asset) => asset.img_tag(),
            None => emoji.clone(),
        },
        Icon::External { url } => format!(r#"<img alt="" src="{}">"#, escape(url)),
    }
}
