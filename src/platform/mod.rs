pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

use crate::buttons::ButtonLayout;

/// A message observed on a channel feed, reduced to what the relay needs.
#[derive(Debug, Clone)]
pub struct ChannelMessage<M> {
    /// Feed-local identifier, monotonically increasing.
    pub id: i32,
    /// Present only for album members; shared by the whole group.
    pub grouped_id: Option<i64>,
    /// Raw text; empty when the message has none.
    pub text: String,
    /// Media payload, forwarded without inspection.
    pub media: Option<M>,
    /// Source button layout, when any markup was attached.
    pub buttons: Option<ButtonLayout>,
}

/// Channel feed operations the relay needs from the messaging transport.
///
/// Session establishment, reconnection and rate-limit handling all live
/// behind this boundary; the relay only issues calls through it.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Opaque handle to a media payload on the source feed.
    type Media: Clone + Send + Sync;

    /// Up to `limit` messages strictly older than `offset_id`, newest first.
    async fn recent_before(
        &self,
        channel: &str,
        offset_id: i32,
        limit: usize,
    ) -> Result<Vec<ChannelMessage<Self::Media>>>;

    /// Up to `limit` messages strictly newer than `offset_id`, oldest first.
    async fn recent_after(
        &self,
        channel: &str,
        offset_id: i32,
        limit: usize,
    ) -> Result<Vec<ChannelMessage<Self::Media>>>;

    /// Send several media payloads as one grouped message with a shared
    /// caption.
    async fn send_album(
        &self,
        channel: &str,
        media: Vec<Self::Media>,
        caption: &str,
        buttons: Option<&ButtonLayout>,
    ) -> Result<()>;

    /// Send one media payload with a caption.
    async fn send_media(
        &self,
        channel: &str,
        media: Self::Media,
        caption: &str,
        buttons: Option<&ButtonLayout>,
    ) -> Result<()>;

    /// Send a plain text message.
    async fn send_text(
        &self,
        channel: &str,
        text: &str,
        buttons: Option<&ButtonLayout>,
    ) -> Result<()>;
}
