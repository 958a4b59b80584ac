use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeType {
    Increased,
    Decreased,
}

impl ChangeType {
    /// Direction of a non-zero price difference (`new - old`).
    pub fn from_diff(diff: i128) -> Self {
        if diff > 0 {
            ChangeType::Increased
        } else {
            ChangeType::Decreased
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeKind {
    NewItem,
    Update { change_type: ChangeType, amount: u64 },
}

/// A committed price change, ready to be rendered for a notifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceChange {
    pub title: String,
    pub url: String,
    pub price: u64,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLanguage {
    En,
    #[default]
    Ja,
}

impl fmt::Display for MessageLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageLanguage::En => f.write_str("en"),
            MessageLanguage::Ja => f.write_str("ja"),
        }
    }
}

impl PriceChange {
    pub fn render(&self, language: MessageLanguage) -> String {
        match language {
            MessageLanguage::En => self.render_en(),
            MessageLanguage::Ja => self.render_ja(),
        }
    }

    fn render_en(&self) -> String {
        match self.kind {
            ChangeKind::NewItem => format!(
                "New item added: \"{}\" starts at {}.\nDetails: {}",
                self.title, self.price, self.url
            ),
            ChangeKind::Update {
                change_type,
                amount,
            } => {
                let direction = match change_type {
                    ChangeType::Increased => "increase",
                    ChangeType::Decreased => "decrease",
                };
                format!(
                    "Price update: \"{}\" is now {}.\n{} {}.\nDetails: {}",
                    self.title, self.price, amount, direction, self.url
                )
            }
        }
    }

    fn render_ja(&self) -> String {
        match self.kind {
            ChangeKind::NewItem => format!(
                "新しい商品が追加されました: 「{}」の初期価格は {} 円です。\n詳細はこちら: {}",
                self.title, self.price, self.url
            ),
            ChangeKind::Update {
                change_type,
                amount,
            } => {
                let direction = match change_type {
                    ChangeType::Increased => "値上がり",
                    ChangeType::Decreased => "値下がり",
                };
                format!(
                    "価格更新通知: 「{}」の新価格は {} 円です。\n{} 円の {}です。\n詳細はこちら: {}",
                    self.title, self.price, amount, direction, self.url
                )
            }
        }
    }
}
