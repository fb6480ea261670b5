//! Block tree and rich text to HTML.

mod blocks;
mod dates;
mod highlight;
mod links;
pub mod math;
mod rich_text;

pub use blocks::{anchor_id, render_block, render_blocks};
pub use dates::{format_date, relative_day};
pub use highlight::Highlighter;
pub use links::page_link;
pub use rich_text::{render_rich_text, render_run};

use crate::backlinks::BacklinkRegistry;
use crate::media::MediaResolver;
use crate::models::PageIndex;
use blockwiki_types::BlockId;
use chrono::NaiveDate;

/// Everything one page's render reads or writes.
pub struct RenderContext<'a> {
    /// Page being rendered; source of every backlink registered
    pub page_id: &'a BlockId,
    pub pages: &'a PageIndex,
    pub backlinks: &'a BacklinkRegistry,
    pub media: &'a MediaResolver,
    pub highlighter: &'a Highlighter,
    /// Reference day for relative date mentions
    pub today: NaiveDate,
}

impl RenderContext<'_> {
    /// Record a reference from the current page to `target`
    pub fn link_to(&self, target: &BlockId) {
        self.backlinks.register(self.page_id, target);
    }
}
