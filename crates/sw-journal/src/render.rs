//! Result cards
//!
//! A finished round is turned into a shareable 600×800 card: title with the
//! player's name, the category, an arrow, the item in large type and a dated
//! watermark in the corner.

use serde::{Deserialize, Serialize};

use crate::error::JournalResult;

/// Media type of the default card
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// What goes on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard<'a> {
    pub username: &'a str,
    pub category: &'a str,
    pub item: &'a str,
    pub date_str: &'a str,
}

/// Rendered image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    pub media_type: String,
    pub body: String,
}

impl RenderedArtifact {
    /// Suggested file extension for the media type
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            SVG_MEDIA_TYPE => "svg",
            "text/plain" => "txt",
            _ => "bin",
        }
    }
}

/// Turns a finished round into a displayable artifact
pub trait ResultRenderer: Send + Sync {
    fn render(&self, card: &ResultCard<'_>) -> JournalResult<RenderedArtifact>;
}

/// SVG card renderer
#[derive(Debug, Clone)]
pub struct CardRenderer {
    pub width: u32,
    pub height: u32,
    /// Title line; `{user}` is replaced by the player name
    pub title_template: String,
    pub watermark: String,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self {
            width: 600,
            height: 800,
            title_template: "Today, {user}'s task is".to_string(),
            watermark: "SweetGames".to_string(),
        }
    }
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

impl CardRenderer {
    pub fn with_title(mut self, template: impl Into<String>) -> Self {
        self.title_template = template.into();
        self
    }

    fn title(&self, username: &str) -> String {
        self.title_template.replace("{user}", username)
    }
}

impl ResultRenderer for CardRenderer {
    fn render(&self, card: &ResultCard<'_>) -> JournalResult<RenderedArtifact> {
        let w = self.width;
        let h = self.height;
        let cx = w / 2;
        // Layout is proportional to the 600×800 reference card
        let y = |ref_y: u32| ref_y * h / 800;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
        ));
        svg.push_str(
            "<defs><linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\
             <stop offset=\"0\" stop-color=\"#fdf2f8\"/>\
             <stop offset=\"1\" stop-color=\"#fae8ff\"/>\
             </linearGradient></defs>\n",
        );
        svg.push_str(&format!(
            "<rect width=\"{w}\" height=\"{h}\" fill=\"url(#bg)\"/>\n"
        ));
        svg.push_str(&format!(
            "<circle cx=\"{cx}\" cy=\"{}\" r=\"{}\" fill=\"rgba(236,72,153,0.1)\"/>\n",
            y(300),
            w / 3
        ));
        svg.push_str(&format!(
            "<text x=\"{cx}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"36\" font-weight=\"bold\" fill=\"#db2777\">{}</text>\n",
            y(150),
            xml_escape(&self.title(card.username))
        ));
        svg.push_str(&format!(
            "<text x=\"{cx}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"32\" fill=\"#9333ea\">{}</text>\n",
            y(300),
            xml_escape(card.category)
        ));
        svg.push_str(&format!(
            "<text x=\"{cx}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"40\" fill=\"#cbd5e1\">\u{25BC}</text>\n",
            y(360)
        ));
        svg.push_str(&format!(
            "<text x=\"{cx}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"64\" font-weight=\"bold\" fill=\"#be185d\">{}</text>\n",
            y(450),
            xml_escape(card.item)
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"16\" fill=\"#94a3b8\">{} \u{2022} {}</text>\n",
            w.saturating_sub(20),
            h.saturating_sub(20),
            xml_escape(&self.watermark),
            xml_escape(card.date_str)
        ));
        svg.push_str("</svg>\n");

        Ok(RenderedArtifact {
            media_type: SVG_MEDIA_TYPE.to_string(),
            body: svg,
        })
    }
}

/// Plain-text card, for terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ResultRenderer for TextRenderer {
    fn render(&self, card: &ResultCard<'_>) -> JournalResult<RenderedArtifact> {
        let body = format!(
            "Today, {}'s task is\n  {}\n  \u{25BC}\n  {}\n({})\n",
            card.username, card.category, card.item, card.date_str
        );
        Ok(RenderedArtifact {
            media_type: "text/plain".to_string(),
            body,
        })
    }
}
