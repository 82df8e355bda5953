//! Paging state and fetch-and-render cycle for the keyword list.
//!
//! Every operation is one-shot: issue the request(s), then reload the
//! current page on success. Nothing is cached and nothing is retried.

use futures_util::future::join_all;

use super::api::{ClientError, KeywordApi};
use super::card::Card;
use crate::models::{CreateKeywordRequest, Keyword};

/// Records requested per page.
pub const PAGE_SIZE: u64 = 15;

const MISSING_INPUT_MESSAGE: &str = "Please provide both username and channel names.";
const INVALID_CHANNEL_MESSAGE: &str =
    "Channel names must be alphanumeric (e.g., channel01, channel02).";
const NOTHING_SELECTED_MESSAGE: &str = "Please select at least one item to delete.";

/// Keeps the local page cursor in sync with the server.
pub struct SyncController {
    api: KeywordApi,
    current_page: u64,
    total_pages: u64,
    cards: Vec<Card>,
}

impl SyncController {
    pub fn new(api: KeywordApi) -> Self {
        Self {
            api,
            current_page: 1,
            total_pages: 1,
            cards: Vec::new(),
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn page_label(&self) -> String {
        format!("Page {}", self.current_page)
    }

    // ── Fetching ────────────────────────────────────────────────────────────

    /// Fetch `page` and replace every card with the returned records.
    pub async fn refresh(&mut self, page: u64) -> Result<(), ClientError> {
        let result = match self.api.list(page, PAGE_SIZE).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Error fetching keywords: {}", e);
                return Err(e);
            }
        };

        self.total_pages = result.total_pages;
        self.cards = result.records.into_iter().map(Card::new).collect();
        Ok(())
    }

    /// Re-fetch the current page.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.refresh(self.current_page).await
    }

    /// Move the cursor to `page` and fetch it.
    pub async fn jump_to(&mut self, page: u64) -> Result<(), ClientError> {
        self.current_page = page.max(1);
        self.reload().await
    }

    /// Step back one page. Returns `false` when already on the first page.
    pub async fn previous_page(&mut self) -> Result<bool, ClientError> {
        if self.current_page <= 1 {
            return Ok(false);
        }
        self.current_page -= 1;
        self.reload().await?;
        Ok(true)
    }

    /// Step forward one page. Returns `false` when already on the last page.
    pub async fn next_page(&mut self) -> Result<bool, ClientError> {
        if self.current_page >= self.total_pages {
            return Ok(false);
        }
        self.current_page += 1;
        self.reload().await?;
        Ok(true)
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    /// Validate the form input and create one keyword per channel.
    ///
    /// Each channel is posted as its own request; all are awaited before the
    /// current page is reloaded.
    pub async fn submit(
        &mut self,
        username: &str,
        channel_text: &str,
    ) -> Result<Vec<Keyword>, ClientError> {
        let username = username.trim();
        let channels = parse_channel_list(channel_text);

        if username.is_empty() || channels.is_empty() {
            return Err(ClientError::Validation(MISSING_INPUT_MESSAGE.to_string()));
        }
        if !channels.iter().all(|c| is_valid_channel(c)) {
            return Err(ClientError::Validation(INVALID_CHANNEL_MESSAGE.to_string()));
        }

        let api = &self.api;
        let requests = channels.into_iter().map(|channel| {
            let request = CreateKeywordRequest {
                username: Some(username.to_string()),
                channels: Some(vec![channel]),
                available: Some(false),
                unavailable: Some(false),
                created: Some(false),
                created_by: Some(username.to_string()),
                created_at: None,
            };
            async move { api.create(&request).await }
        });

        let mut created = Vec::new();
        for result in join_all(requests).await {
            match result {
                Ok(body) => created.extend(body.created_records),
                Err(e) => {
                    tracing::error!("Error saving keywords: {}", e);
                    return Err(e);
                }
            }
        }

        self.reload().await?;
        Ok(created)
    }

    /// Delete one keyword, then reload.
    pub async fn delete_one(&mut self, id: &str) -> Result<(), ClientError> {
        self.api.delete(id).await?;
        self.reload().await
    }

    /// Delete every selected card concurrently, then reload.
    pub async fn delete_selected(&mut self) -> Result<usize, ClientError> {
        let ids: Vec<String> = self
            .cards
            .iter()
            .filter(|card| card.selected)
            .map(|card| card.id().to_string())
            .collect();

        self.delete_ids(&ids).await
    }

    /// Delete keywords by id concurrently, then reload. The ids need not be
    /// on the current page.
    ///
    /// All requests run to completion even if one fails; the first failure is
    /// returned and the page is left as it was.
    pub async fn delete_ids(&mut self, ids: &[String]) -> Result<usize, ClientError> {
        if ids.is_empty() {
            return Err(ClientError::Validation(NOTHING_SELECTED_MESSAGE.to_string()));
        }

        let api = &self.api;
        let results = join_all(ids.iter().map(|id| api.delete(id))).await;
        if let Some(err) = results.into_iter().find_map(Result::err) {
            tracing::error!("Error deleting keywords: {}", err);
            return Err(err);
        }

        self.reload().await?;
        Ok(ids.len())
    }

    // ── Selection ───────────────────────────────────────────────────────────

    /// Set the selection flag of one card. Returns `false` if no card has `id`.
    pub fn select(&mut self, id: &str, selected: bool) -> bool {
        match self.cards.iter_mut().find(|card| card.id() == id) {
            Some(card) => {
                card.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Propagate the select-all toggle to every card.
    pub fn set_all_selected(&mut self, selected: bool) {
        for card in &mut self.cards {
            card.selected = selected;
        }
    }
}

/// Split comma-separated channel input into trimmed tokens.
pub fn parse_channel_list(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(|token| token.trim().to_string()).collect()
}

/// Channel names are one or more ASCII letters or digits.
pub fn is_valid_channel(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}
