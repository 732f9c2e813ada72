//! Relay channels and their configuration names.

use serde::{Deserialize, Serialize};

/// A named destination for forwarded notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Key issuance and verification events.
    KeyTracking,
    /// Activity from developer-tier keys.
    DeveloperActivity,
    /// Every activity event.
    AllActivity,
}

impl Channel {
    /// Every channel, in discovery order.
    pub const ALL: [Channel; 3] = [
        Channel::KeyTracking,
        Channel::DeveloperActivity,
        Channel::AllActivity,
    ];

    /// URL path segment for the channel's relay route.
    pub fn slug(&self) -> &'static str {
        match self {
            Channel::KeyTracking => "key-tracking",
            Channel::DeveloperActivity => "developer-activity",
            Channel::AllActivity => "all-activity",
        }
    }

    /// Environment variable holding the channel's destination URL.
    pub fn env_var(&self) -> &'static str {
        match self {
            Channel::KeyTracking => "KEY_TRACKING_WEBHOOK",
            Channel::DeveloperActivity => "DEVELOPER_ACTIVITY_WEBHOOK",
            Channel::AllActivity => "ALL_ACTIVITY_WEBHOOK",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::KeyTracking.slug(), "key-tracking");
        assert_eq!(Channel::DeveloperActivity.env_var(), "DEVELOPER_ACTIVITY_WEBHOOK");
        assert_eq!(Channel::AllActivity.to_string(), "all-activity");
    }

    #[test]
    fn test_channel_serde() {
        assert_eq!(
            serde_json::to_string(&Channel::KeyTracking).unwrap(),
            "\"keyTracking\""
        );
        let parsed: Channel = serde_json::from_str("\"developerActivity\"").unwrap();
        assert_eq!(parsed, Channel::DeveloperActivity);
    }
}
