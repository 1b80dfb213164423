use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::buttons;
use crate::config::{ALBUM_LOOKAHEAD, PLACEHOLDER, SOURCE_CHANNEL, TARGET_CHANNEL};
use crate::platform::{ChannelMessage, ChannelTransport};
use crate::sanitize::sanitize;

/// Forwards each new source-channel message to the target channel, with
/// mentions/links rewritten and any button layout replaced by the fixed one.
pub struct Relay<T: ChannelTransport> {
    transport: Arc<T>,
    source: String,
    target: String,
}

impl<T: ChannelTransport> Relay<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            source: SOURCE_CHANNEL.to_string(),
            target: TARGET_CHANNEL.to_string(),
        }
    }

    /// Handle one new-message event. Failures are logged with the message id
    /// and swallowed so the update loop keeps processing later events.
    pub async fn handle(&self, message: ChannelMessage<T::Media>) {
        let id = message.id;
        match self.forward(message).await {
            Ok(true) => info!("forwarded message {}", id),
            Ok(false) => {}
            Err(e) => error!("failed to forward message {}: {:#}", id, e),
        }
    }

    /// Issue at most one outbound send for the event. Returns whether
    /// anything was sent.
    async fn forward(&self, message: ChannelMessage<T::Media>) -> Result<bool> {
        let text = sanitize(&message.text);
        let markup = message
            .buttons
            .as_ref()
            .map(|existing| buttons::rewrite(Some(existing)));
        let markup = markup.as_ref();

        if message.grouped_id.is_some() {
            let album = self.collect_album(&message).await?;
            let media: Vec<T::Media> = album.into_iter().filter_map(|m| m.media).collect();
            self.transport
                .send_album(&self.target, media, &text, markup)
                .await?;
        } else if let Some(media) = message.media.clone() {
            self.transport
                .send_media(&self.target, media, &text, markup)
                .await?;
        } else if !text.is_empty() {
            self.transport
                .send_text(&self.target, &text, markup)
                .await?;
        } else if let Some(markup) = markup {
            self.transport
                .send_text(&self.target, PLACEHOLDER, Some(markup))
                .await?;
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    /// Reassemble the trigger's media group. Grouping is only visible through
    /// feed proximity, so the scan walks the neighbours on both sides of the
    /// trigger and stops at the first message outside the group. The result
    /// is media-bearing members only, oldest first.
    async fn collect_album(
        &self,
        trigger: &ChannelMessage<T::Media>,
    ) -> Result<Vec<ChannelMessage<T::Media>>> {
        let group = trigger
            .grouped_id
            .context("album trigger carries no group id")?;

        let mut members = vec![trigger.clone()];
        for candidate in self
            .transport
            .recent_before(&self.source, trigger.id, ALBUM_LOOKAHEAD)
            .await?
        {
            if candidate.grouped_id == Some(group) {
                members.push(candidate);
            } else {
                break;
            }
        }
        // The trigger may be any member of the group, not the newest one.
        for candidate in self
            .transport
            .recent_after(&self.source, trigger.id, ALBUM_LOOKAHEAD)
            .await?
        {
            if candidate.grouped_id == Some(group) {
                members.push(candidate);
            } else {
                break;
            }
        }

        members.sort_by_key(|m| m.id);
        members.retain(|m| m.media.is_some());
        Ok(members)
    }
}
