//! Card view of a keyword record.

use crate::models::Keyword;

/// One rendered keyword plus its selection checkbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: Keyword,
    pub selected: bool,
}

impl Card {
    pub fn new(keyword: Keyword) -> Self {
        Self {
            keyword,
            selected: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.keyword.id
    }

    /// Channel names joined for display.
    pub fn channel_label(&self) -> String {
        self.keyword.channels.join(", ")
    }

    pub fn render(&self) -> String {
        let keyword = &self.keyword;
        let created_at = keyword
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "not set".to_string());

        format!(
            "[{}] Channel Name: {}  ({})\n    Available - {}\n    Unavailable - {}\n    Created - {}\n    Created By - {}\n    Created At - {}",
            if self.selected { "x" } else { " " },
            self.channel_label(),
            keyword.id,
            glyph(keyword.available),
            glyph(keyword.unavailable),
            glyph(keyword.created),
            keyword.created_by,
            created_at,
        )
    }
}

fn glyph(flag: bool) -> &'static str {
    if flag {
        "✅"
    } else {
        "❌"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn keyword() -> Keyword {
        Keyword {
            id: "k-1".to_string(),
            username: "bob".to_string(),
            channels: vec!["chan1".to_string(), "chan2".to_string()],
            available: true,
            unavailable: false,
            created: false,
            created_by: "bob".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_render_flags_and_channels() {
        let card = Card::new(keyword());
        let text = card.render();

        assert!(text.starts_with("[ ] Channel Name: chan1, chan2  (k-1)"));
        assert!(text.contains("Available - ✅"));
        assert!(text.contains("Unavailable - ❌"));
        assert!(text.contains("Created - ❌"));
        assert!(text.contains("Created By - bob"));
        assert!(text.contains("Created At - not set"));
    }

    #[test]
    fn test_render_selected_with_timestamp() {
        let mut keyword = keyword();
        keyword.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
        let card = Card {
            keyword,
            selected: true,
        };

        let text = card.render();
        assert!(text.starts_with("[x]"));
        assert!(text.contains("Created At - 2024-05-06T07:08:09+00:00"));
    }
}
