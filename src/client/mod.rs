//! Client side of the keyword resource: HTTP wrapper, card view and the
//! page-sync controller used by `keywordctl`.

mod api;
mod card;
mod controller;

pub use api::{ClientError, KeywordApi};
pub use card::Card;
pub use controller::{is_valid_channel, parse_channel_list, SyncController, PAGE_SIZE};
