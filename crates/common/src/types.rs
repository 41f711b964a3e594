use serde::{Deserialize, Serialize};

/// Notification categories published by the host.
///
/// The variant identifier (see [`NotificationType::name`]) is what the
/// `allowed_types` filter matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    Download,
    Organize,
    Subscribe,
    SiteMessage,
    MediaServer,
    Manual,
    Plugin,
    Other,
}

impl NotificationType {
    pub const ALL: [NotificationType; 8] = [
        NotificationType::Download,
        NotificationType::Organize,
        NotificationType::Subscribe,
        NotificationType::SiteMessage,
        NotificationType::MediaServer,
        NotificationType::Manual,
        NotificationType::Plugin,
        NotificationType::Other,
    ];

    /// Stable identifier used in configuration (e.g. `"SiteMessage"`).
    pub fn name(&self) -> &'static str {
        match self {
            NotificationType::Download => "Download",
            NotificationType::Organize => "Organize",
            NotificationType::Subscribe => "Subscribe",
            NotificationType::SiteMessage => "SiteMessage",
            NotificationType::MediaServer => "MediaServer",
            NotificationType::Manual => "Manual",
            NotificationType::Plugin => "Plugin",
            NotificationType::Other => "Other",
        }
    }

    /// Look up a type by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Download => write!(f, "download"),
            NotificationType::Organize => write!(f, "organize"),
            NotificationType::Subscribe => write!(f, "subscribe"),
            NotificationType::SiteMessage => write!(f, "site message"),
            NotificationType::MediaServer => write!(f, "media server"),
            NotificationType::Manual => write!(f, "manual"),
            NotificationType::Plugin => write!(f, "plugin"),
            NotificationType::Other => write!(f, "other"),
        }
    }
}

/// One notification published by the host, destined for webhook delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Short title
    #[serde(default)]
    pub title: Option<String>,
    /// Message body
    #[serde(default)]
    pub text: Option<String>,
    /// Notification category, if the publisher set one
    #[serde(default, rename = "type")]
    pub message_type: Option<NotificationType>,
    /// Set when the message targets a specific channel. Such messages are
    /// delivered by another mechanism and bypass the webhook path.
    #[serde(default)]
    pub channel: Option<String>,
}

impl MessageRecord {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            text: Some(text.into()),
            message_type: None,
            channel: None,
        }
    }

    pub fn with_type(mut self, message_type: NotificationType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Title, or `""` when absent.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Text, or `""` when absent.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// A record is deliverable only if it has a non-empty title or text.
    pub fn has_content(&self) -> bool {
        !self.title_or_empty().is_empty() || !self.text_or_empty().is_empty()
    }

    /// Whether the record is routed to a dedicated channel.
    pub fn is_channel_routed(&self) -> bool {
        self.channel.as_deref().is_some_and(|c| !c.is_empty())
    }
}
