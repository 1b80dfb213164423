//! grammers-backed channel transport, plus the update loop that feeds new
//! source-channel messages into the relay.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use grammers_client::types::{Media, Message};
use grammers_client::{button, reply_markup, Client, InputMedia, InputMessage, Update};
use grammers_session::{PackedChat, Session};
use tracing::info;

use crate::buttons::ButtonLayout;
use crate::config::{Config, SOURCE_CHANNEL};
use crate::platform::{ChannelMessage, ChannelTransport};
use crate::relay::Relay;

/// Channel transport backed by a grammers user session.
pub struct TelegramTransport {
    client: Client,
    chats: HashMap<String, PackedChat>,
}

impl TelegramTransport {
    /// Connect, verify the session is signed in, and resolve every channel
    /// the relay talks to. Anything failing here is fatal at startup.
    pub async fn connect(config: &Config, channels: &[&str]) -> Result<Self> {
        let session = Session::load(&config.session_bytes()?)
            .context("SESSION_STRING does not decode to a valid session")?;

        let client = Client::connect(grammers_client::Config {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: Default::default(),
        })
        .await
        .context("failed to connect to Telegram")?;

        if !client.is_authorized().await? {
            bail!("session is not signed in; supply a logged-in SESSION_STRING");
        }

        let mut chats = HashMap::new();
        for name in channels {
            let chat = client
                .resolve_username(name)
                .await
                .with_context(|| format!("failed to resolve @{name}"))?
                .with_context(|| format!("channel @{name} not found"))?;
            chats.insert((*name).to_string(), chat.pack());
        }

        Ok(Self { client, chats })
    }

    /// Handle to the underlying client for the update loop.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    fn chat(&self, channel: &str) -> Result<PackedChat> {
        self.chats
            .get(channel)
            .copied()
            .with_context(|| format!("channel @{channel} was not resolved at startup"))
    }

    fn input(caption: &str, buttons: Option<&ButtonLayout>) -> InputMessage {
        let mut input = InputMessage::text(caption);
        if let Some(layout) = buttons {
            input = input.reply_markup(&markup_for(layout));
        }
        input
    }
}

fn markup_for(layout: &ButtonLayout) -> reply_markup::Inline {
    let rows: Vec<Vec<button::Inline>> = layout
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| button::url(b.label.clone(), b.url.clone()))
                .collect()
        })
        .collect();
    reply_markup::inline(rows)
}

fn convert(message: &Message) -> ChannelMessage<Media> {
    ChannelMessage {
        id: message.id(),
        grouped_id: message.raw.grouped_id,
        text: message.text().to_string(),
        media: message.media(),
        // The rewrite replaces the source layout wholesale, so only its
        // presence is carried over.
        buttons: message
            .raw
            .reply_markup
            .as_ref()
            .map(|_| ButtonLayout::default()),
    }
}

#[async_trait]
impl ChannelTransport for TelegramTransport {
    type Media = Media;

    async fn recent_before(
        &self,
        channel: &str,
        offset_id: i32,
        limit: usize,
    ) -> Result<Vec<ChannelMessage<Media>>> {
        let chat = self.chat(channel)?;
        let mut iter = self.client.iter_messages(chat).offset_id(offset_id).limit(limit);
        let mut out = Vec::new();
        while let Some(message) = iter.next().await? {
            out.push(convert(&message));
        }
        Ok(out)
    }

    async fn recent_after(
        &self,
        channel: &str,
        offset_id: i32,
        limit: usize,
    ) -> Result<Vec<ChannelMessage<Media>>> {
        // History is only iterable newest-first, so walk down from the head
        // of the feed to the offset, keeping only the last `limit` messages
        // seen so the window stays adjacent to the offset, then flip the
        // order.
        let chat = self.chat(channel)?;
        let mut iter = self.client.iter_messages(chat);
        let mut window = VecDeque::with_capacity(limit + 1);
        while let Some(message) = iter.next().await? {
            if message.id() <= offset_id {
                break;
            }
            window.push_back(convert(&message));
            if window.len() > limit {
                window.pop_front();
            }
        }
        let mut out = Vec::from(window);
        out.reverse();
        Ok(out)
    }

    async fn send_album(
        &self,
        channel: &str,
        media: Vec<Media>,
        caption: &str,
        buttons: Option<&ButtonLayout>,
    ) -> Result<()> {
        let chat = self.chat(channel)?;
        let mut items = Vec::with_capacity(media.len());
        for (i, m) in media.iter().enumerate() {
            // Telegram shows an album's caption on its first item.
            // grammers 0.7's album items (`InputMedia`) cannot carry a
            // reply markup, so `buttons` cannot be attached here.
            let _ = buttons;
            let input = if i == 0 {
                InputMedia::caption(caption)
            } else {
                InputMedia::caption("")
            };
            items.push(input.copy_media(m));
        }
        self.client
            .send_album(chat, items)
            .await
            .context("failed to send album")?;
        Ok(())
    }

    async fn send_media(
        &self,
        channel: &str,
        media: Media,
        caption: &str,
        buttons: Option<&ButtonLayout>,
    ) -> Result<()> {
        self.client
            .send_message(
                self.chat(channel)?,
                Self::input(caption, buttons).copy_media(&media),
            )
            .await
            .context("failed to send media")?;
        Ok(())
    }

    async fn send_text(
        &self,
        channel: &str,
        text: &str,
        buttons: Option<&ButtonLayout>,
    ) -> Result<()> {
        self.client
            .send_message(self.chat(channel)?, Self::input(text, buttons))
            .await
            .context("failed to send message")?;
        Ok(())
    }
}

/// Drive the client's update loop, relaying every new message that appears
/// on the source channel. Runs until the connection drops.
pub async fn run(client: Client, relay: Arc<Relay<TelegramTransport>>) -> Result<()> {
    info!("listening for new messages on @{}", SOURCE_CHANNEL);
    loop {
        let update = client
            .next_update()
            .await
            .context("update stream failed")?;
        let Update::NewMessage(message) = update else {
            continue;
        };
        if message.outgoing() {
            continue;
        }
        if message.chat().username() != Some(SOURCE_CHANNEL) {
            continue;
        }
        relay.handle(convert(&message)).await;
    }
}
