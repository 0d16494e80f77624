//! Tagged fragments arriving on the watched feed.

use crate::{ChannelPost, FileRef, MessageRef, parse_win_percent};
use serde::{Deserialize, Serialize};
use signalpost_error::InputError;

/// Hashtags that route a channel post.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::IntoStaticStr,
)]
pub enum Tag {
    /// Raw stats text
    #[strum(serialize = "#stat")]
    Stat,
    /// Chart image
    #[strum(serialize = "#chart")]
    Chart,
    /// Stats document
    #[strum(serialize = "#file")]
    File,
    /// Win image with a strength caption
    #[strum(serialize = "#win")]
    Win,
    /// Promotional post rebroadcast verbatim
    #[strum(serialize = "#promo")]
    Promo,
}

impl Tag {
    /// The literal hashtag.
    pub fn marker(self) -> &'static str {
        self.into()
    }

    /// Whether `text` carries this tag.
    pub fn is_in(self, text: &str) -> bool {
        text.contains(self.marker())
    }

    /// `text` with the tag removed and surrounding whitespace trimmed.
    pub fn strip(self, text: &str) -> String {
        text.replace(self.marker(), "").trim().to_string()
    }
}

/// One routed piece of content.
///
/// Produced by [`Fragment::parse`], the single place where tags are matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fragment {
    /// Raw stats text for the next post
    Stats {
        /// Text without the tag
        text: String,
    },
    /// Chart image for the next post
    Chart {
        /// Image reference
        image: FileRef,
    },
    /// Stats document for the next post
    StatsFile {
        /// Document reference
        file: FileRef,
    },
    /// Win image with its strength
    Win {
        /// Image reference
        image: FileRef,
        /// Strength parsed from the caption
        percent: f64,
    },
    /// Promotional content to copy into every channel
    Promo {
        /// Original post to copy
        source: MessageRef,
        /// Text or caption without the tag
        text: String,
        /// Whether the post carries media (copied) or is plain text (re-sent)
        has_media: bool,
    },
}

impl Fragment {
    /// Route a channel post.
    ///
    /// Returns `Ok(None)` for untagged posts and for tags whose payload is
    /// missing (for example `#chart` without a photo). Tags are checked in the
    /// order `#stat`, text `#promo`, then captions `#chart`, `#file`, `#win`,
    /// `#promo`; the first match wins.
    ///
    /// # Errors
    ///
    /// A `#win` photo whose caption carries no usable percent token.
    pub fn parse(post: &ChannelPost) -> Result<Option<Self>, InputError> {
        if let Some(text) = post.text.as_deref() {
            if Tag::Stat.is_in(text) {
                return Ok(Some(Self::Stats {
                    text: Tag::Stat.strip(text),
                }));
            }
            if Tag::Promo.is_in(text) {
                return Ok(Some(Self::Promo {
                    source: post.message_ref(),
                    text: Tag::Promo.strip(text),
                    has_media: false,
                }));
            }
            return Ok(None);
        }

        let Some(caption) = post.caption.as_deref() else {
            return Ok(None);
        };

        if Tag::Chart.is_in(caption) {
            return Ok(post
                .photo
                .clone()
                .map(|image| Self::Chart { image }));
        }
        if Tag::File.is_in(caption) {
            return Ok(post
                .document
                .clone()
                .map(|file| Self::StatsFile { file }));
        }
        if Tag::Win.is_in(caption) {
            let Some(image) = post.photo.clone() else {
                return Ok(None);
            };
            let percent = parse_win_percent(caption)?;
            return Ok(Some(Self::Win { image, percent }));
        }
        if Tag::Promo.is_in(caption) {
            return Ok(Some(Self::Promo {
                source: post.message_ref(),
                text: Tag::Promo.strip(caption),
                has_media: true,
            }));
        }

        Ok(None)
    }
}
