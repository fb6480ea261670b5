//! Emoji image assets.

use super::{persist_new, temp_path, MediaResolver};
use crate::html::escape;
use tracing::{debug, warn};

/// Image file for an emoji: its code points in lowercase hex, dash-joined.
///
/// 💡 -> `1f4a1.png`, ❤️ -> `2764-fe0f.png`
pub fn emoji_filename(emoji: &str) -> String {
    let codepoints: Vec<String> = emoji.chars().map(|c| format!("{:x}", c as u32)).collect();
    format!("{}.png", codepoints.join("-"))
}

/// BMP code points whose default presentation is emoji
const BMP_EMOJI_PRESENTATION: &[(u32, u32)] = &[
    (0x231A, 0x231B),
    (0x23E9, 0x23EC),
    (0x23F0, 0x23F0),
    (0x23F3, 0x23F3),
    (0x25FD, 0x25FE),
    (0x2614, 0x2615),
    (0x2648, 0x2653),
    (0x267F, 0x267F),
    (0x2693, 0x2693),
    (0x26A1, 0x26A1),
    (0x26AA, 0x26AB),
    (0x26BD, 0x26BE),
    (0x26C4, 0x26C5),
    (0x26CE, 0x26CE),
    (0x26D4, 0x26D4),
    (0x26EA, 0x26EA),
    (0x26F2, 0x26F3),
    (0x26F5, 0x26F5),
    (0x26FA, 0x26FA),
    (0x26FD, 0x26FD),
    (0x2705, 0x2705),
    (0x270A, 0x270B),
    (0x2728, 0x2728),
    (0x274C, 0x274C),
    (0x274E, 0x274E),
    (0x2753, 0x2755),
    (0x2757, 0x2757),
    (0x2795, 0x2797),
    (0x27B0, 0x27B0),
    (0x27BF, 0x27BF),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
];

/// True when `grapheme` is an emoji that displays as a picture.
///
/// Text-presentation symbols such as ™ or © only count when followed by U+FE0F.
pub fn is_emoji(grapheme: &str) -> bool {
    if emojis::get(grapheme).is_none() {
        return false;
    }
    let mut chars = grapheme.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return true;
    };
    let c = c as u32;
    c >= 0x1F000
        || BMP_EMOJI_PRESENTATION
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Human-readable alt text, e.g. "light bulb emoji"
pub fn emoji_alt(emoji: &str) -> String {
    match emojis::get(emoji) {
        Some(e) => format!("{} emoji", e.name()),
        None => "emoji".to_string(),
    }
}

/// An emoji image present in the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiAsset {
    pub filename: String,
    pub alt: String,
}

impl EmojiAsset {
    /// Inline image tag replacing the emoji in text
    pub fn img_tag(&self) -> String {
        format!(
            r#"<img class="emoji" alt="{}" src="/{}" />"#,
            escape(&self.alt),
            self.filename
        )
    }
}

impl MediaResolver {
    /// Copy the emoji's image into the output directory if it is not there yet.
    ///
    /// Returns `None` (and logs) when no image exists for the emoji.
    pub async fn emoji(&self, emoji: &str) -> Option<EmojiAsset> {
        let filename = emoji_filename(emoji);
        let asset = EmojiAsset {
            alt: emoji_alt(emoji),
            filename,
        };

        let _guard = self.locks.lock(&asset.filename).await;
        let dest = self.output_dir.join(&asset.filename);
        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            return Some(asset);
        }

        let source = self.emoji_dir.join(&asset.filename);
        if !tokio::fs::try_exists(&source).await.unwrap_or(false) {
            warn!("Unknown emoji {} ({:?} not found)", emoji, source);
            return None;
        }

        let tmp = temp_path(&dest);
        let copied = match tokio::fs::copy(&source, &tmp).await {
            Ok(_) => persist_new(&tmp, &dest).await.map(|_| ()),
            Err(e) => Err(e),
        };
        match copied {
            Ok(()) => {
                debug!("Copied emoji image {}", asset.filename);
                Some(asset)
            }
            Err(e) => {
                warn!("Failed to copy emoji image {:?}: {}", source, e);
                let _ = tokio::fs::remove_file(&tmp).await;
                None
            }
        }
    }
}
