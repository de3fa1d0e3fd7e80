//! Message layout for transfer alerts
//!
//! Produces Telegram MarkdownV2 text. Every interpolated value goes
//! through [`escape_markdown`]; the template's own markup does not.

use crate::types::TransferRecord;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::LazyLock;

/// Block explorer used for the navigation buttons
pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.monadexplorer.com";

/// Characters reserved by MarkdownV2
static RESERVED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_*\[\]()~`>#+\-=|{}.!]").unwrap());

/// Escape MarkdownV2 reserved characters with a backslash
pub fn escape_markdown(text: &str) -> String {
    RESERVED_REGEX.replace_all(text, r"\$0").into_owned()
}

/// Escape a MarkdownV2 inline link target
///
/// Inside `(...)` only `)` and `\` are reserved.
pub fn escape_link_url(url: &str) -> String {
    url.replace('\\', r"\\").replace(')', r"\)")
}

/// Prefix `0x` unless already present
pub fn ensure_hex_prefix(value: &str) -> String {
    if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

/// Shorten to `0x1234...abcd`; values of 10 chars or fewer are kept whole
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub url: String,
}

impl InlineButton {
    fn new(text: &str, url: String) -> Self {
        Self {
            text: text.to_string(),
            url,
        }
    }
}

/// A rendered alert, ready to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Normalized transaction hash
    pub tx_hash: String,
    /// MarkdownV2 body
    pub text: String,
    /// Block, From, To, TxHash buttons in that order
    pub buttons: Vec<InlineButton>,
}

impl NotificationMessage {
    /// Render the fixed alert layout for a transfer
    pub fn from_record(record: &TransferRecord, explorer_base: &str, unit: &str) -> Self {
        let base = explorer_base.trim_end_matches('/');

        let tx_hash = ensure_hex_prefix(&record.tx_hash);
        let from_addr = ensure_hex_prefix(&record.from_addr);
        let to_addr = ensure_hex_prefix(&record.to_addr);
        let block = record.block_number.to_string();

        let tx_url = format!("{base}/tx/{tx_hash}");
        let from_url = format!("{base}/address/{from_addr}");
        let to_url = format!("{base}/address/{to_addr}");
        let block_url = format!("{base}/block/{block}");

        let text = format!(
            "🚨 Large {unit} Transfer Alert\\!\n\n\
             💰 Amount: `{amount}`\n\
             📦 Block: `{block}`\n\
             📤 From: `{from}`\n\
             📥 To: `{to}`\n\
             🔍 [View Transaction]({link})",
            link = escape_link_url(&tx_url),
            unit = escape_markdown(unit),
            amount = escape_markdown(&format!("{} {unit}", record.amount)),
            block = escape_markdown(&block),
            from = escape_markdown(&truncate_address(&from_addr)),
            to = escape_markdown(&truncate_address(&to_addr)),
        );

        let buttons = vec![
            InlineButton::new("Block", block_url),
            InlineButton::new("From", from_url),
            InlineButton::new("To", to_url),
            InlineButton::new("TxHash", tx_url),
        ];

        Self {
            tx_hash,
            text,
            buttons,
        }
    }

    /// Inline keyboard with all buttons on one row
    pub fn reply_markup(&self) -> Value {
        json!({ "inline_keyboard": [self.buttons] })
    }

    /// Bot API `sendMessage` body
    pub fn payload(&self, chat_id: &str) -> Value {
        json!({
            "chat_id": chat_id,
            "text": self.text,
            "parse_mode": "MarkdownV2",
            "reply_markup": self.reply_markup(),
        })
    }
}
