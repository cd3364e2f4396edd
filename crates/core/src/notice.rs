//! The notice variant model.
//!
//! A persisted registry row carries a `kind` discriminator and a JSON
//! payload; this module is the typed face of that pair. Variants are a
//! closed enum resolved at decode time, not a class hierarchy: each kind
//! maps to one [`Payload`] shape, and the small capability set (level,
//! dismissibility, action count) lives on the decoded payload.

use courseboard_db::entities::notification;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity level of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
    /// Anything a stale row might carry that we no longer recognize.
    #[serde(other)]
    Unknown,
}

impl Level {
    /// CSS alert class for the level.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Info => "alert-info",
            Self::Warning => "alert-warning",
            Self::Danger => "alert-danger",
            Self::Unknown => "",
        }
    }

    /// Icon keyed off the level.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "fa-check",
            Self::Info => "fa-info-circle",
            Self::Warning => "fa-exclamation-triangle",
            Self::Danger => "fa-times-circle",
            Self::Unknown => "fa-question",
        }
    }
}

/// Variant discriminator stored in the `kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Admin-authored free-form message.
    Arbitrary,
    /// Computed warning about active guest self-enrolment.
    ManualGuest,
    /// Heading plus a collapsible list of keyed items.
    SimpleList,
}

impl NoticeKind {
    /// Resolve a stored tag. `None` means the tag is unknown (e.g. a
    /// stale kind left behind by a removed integration).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "arbitrary" => Some(Self::Arbitrary),
            "manualguest" => Some(Self::ManualGuest),
            "simplelist" => Some(Self::SimpleList),
            _ => None,
        }
    }

    /// The stable wire tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Arbitrary => "arbitrary",
            Self::ManualGuest => "manualguest",
            Self::SimpleList => "simplelist",
        }
    }

    /// The host table the subject object lives in.
    #[must_use]
    pub const fn object_table(self) -> &'static str {
        // Every current variant attaches to a course
        match self {
            Self::Arbitrary | Self::ManualGuest | Self::SimpleList => "course",
        }
    }
}

/// Payload of the `arbitrary` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitraryPayload {
    /// Severity level.
    pub level: Level,
    /// Admin-authored message (trusted HTML).
    pub message: String,
    /// Whether users may dismiss the notice.
    pub dismissable: bool,
    /// Advertised action count.
    #[serde(default)]
    pub actions: u32,
}

/// One keyed item of a `simplelist` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Stable item key.
    pub key: String,
    /// Item text (trusted HTML).
    pub text: String,
    /// Optional link target.
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload of the `simplelist` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SimpleListPayload {
    /// Text shown before the items.
    pub heading: String,
    /// Ordered keyed items.
    #[serde(default)]
    pub items: Vec<ListItem>,
}

impl SimpleListPayload {
    /// Add or replace an item by key.
    pub fn add_item(&mut self, item: ListItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.key == item.key) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    /// Look up an item by key.
    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<&ListItem> {
        self.items.iter().find(|i| i.key == key)
    }

    /// Remove an item by key. Returns whether anything was removed.
    pub fn remove_item(&mut self, key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.key != key);
        self.items.len() != before
    }
}

/// Why a stored row could not be turned into a [`Notice`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown notification kind: {0}")]
    UnknownKind(String),

    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decoded variant payload, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Arbitrary(ArbitraryPayload),
    ManualGuest,
    SimpleList(SimpleListPayload),
}

impl Payload {
    /// The kind this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> NoticeKind {
        match self {
            Self::Arbitrary(_) => NoticeKind::Arbitrary,
            Self::ManualGuest => NoticeKind::ManualGuest,
            Self::SimpleList(_) => NoticeKind::SimpleList,
        }
    }

    /// Decode a stored payload for a resolved kind.
    pub fn decode(kind: NoticeKind, data: &serde_json::Value) -> Result<Self, DecodeError> {
        let malformed = |source| DecodeError::MalformedPayload {
            kind: kind.tag().to_string(),
            source,
        };

        match kind {
            NoticeKind::Arbitrary => serde_json::from_value(data.clone())
                .map(Self::Arbitrary)
                .map_err(malformed),
            NoticeKind::ManualGuest => Ok(Self::ManualGuest),
            NoticeKind::SimpleList => serde_json::from_value(data.clone())
                .map(Self::SimpleList)
                .map_err(malformed),
        }
    }

    /// Encode for storage in the `data` column.
    pub fn encode(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Arbitrary(p) => serde_json::to_value(p),
            Self::ManualGuest => Ok(serde_json::json!({})),
            Self::SimpleList(p) => serde_json::to_value(p),
        }
    }

    /// Write-time validation; failures here never reach the database.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Arbitrary(p) => {
                if p.level == Level::Unknown {
                    return Err("you must set a level".to_string());
                }
                if p.message.trim().is_empty() {
                    return Err("you must set a message".to_string());
                }
                Ok(())
            }
            Self::ManualGuest => Ok(()),
            Self::SimpleList(p) => {
                if p.items.is_empty() {
                    // Tolerated, but almost certainly a caller bug
                    tracing::warn!("simplelist notice created without items");
                }
                Ok(())
            }
        }
    }

    /// Severity level of the notice.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::Arbitrary(p) => p.level,
            Self::ManualGuest => Level::Warning,
            Self::SimpleList(_) => Level::Info,
        }
    }

    /// Whether users may dismiss the notice.
    #[must_use]
    pub const fn is_dismissible(&self) -> bool {
        match self {
            Self::Arbitrary(p) => p.dismissable,
            Self::ManualGuest => true,
            Self::SimpleList(_) => false,
        }
    }

    /// The advertised "actions" count.
    #[must_use]
    pub fn actions(&self) -> u32 {
        match self {
            Self::Arbitrary(p) => p.actions,
            Self::ManualGuest => 0,
            #[allow(clippy::cast_possible_truncation)]
            Self::SimpleList(p) => p.items.len() as u32,
        }
    }
}

/// A decoded registry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Registry row ID.
    pub id: String,
    /// Variant kind.
    pub kind: NoticeKind,
    /// Host LMS context.
    pub context_id: i64,
    /// Subject object (course) id.
    pub object_id: i64,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Decoded variant payload.
    pub payload: Payload,
}

impl Notice {
    /// Decode a stored row.
    pub fn from_model(model: &notification::Model) -> Result<Self, DecodeError> {
        let kind = NoticeKind::from_tag(&model.kind)
            .ok_or_else(|| DecodeError::UnknownKind(model.kind.clone()))?;

        Ok(Self {
            id: model.id.clone(),
            kind,
            context_id: model.context_id,
            object_id: model.object_id,
            deleted: model.deleted,
            payload: Payload::decode(kind, &model.data)?,
        })
    }
}
