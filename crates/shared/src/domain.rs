use serde::{Deserialize, Serialize};

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

// Twitch-side identifiers are opaque strings, not numbers.
string_id_newtype!(ChannelId);
string_id_newtype!(EmoteId);
string_id_newtype!(RewardId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryId(pub i64);

/// Third-party emote provider a history record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmoteProvider {
    Bttv,
    Seventv,
}

/// What happened to the emote slot when the record was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmoteChangeType {
    Add,
    Remove,
    RemovedRandom,
}

impl EmoteProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            EmoteProvider::Bttv => "bttv",
            EmoteProvider::Seventv => "seventv",
        }
    }
}

impl EmoteChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EmoteChangeType::Add => "add",
            EmoteChangeType::Remove => "remove",
            EmoteChangeType::RemovedRandom => "removed_random",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Bttv,
    Seventv,
}

impl RewardType {
    pub fn as_str(self) -> &'static str {
        match self {
            RewardType::Bttv => "bttv",
            RewardType::Seventv => "seventv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emote_provider_uses_lowercase_wire_values() {
        assert_eq!(
            serde_json::to_string(&EmoteProvider::Seventv).expect("serialize"),
            "\"seventv\""
        );
        let parsed: EmoteProvider = serde_json::from_str("\"bttv\"").expect("deserialize");
        assert_eq!(parsed, EmoteProvider::Bttv);
    }

    #[test]
    fn change_type_uses_snake_case_wire_values() {
        assert_eq!(
            serde_json::to_string(&EmoteChangeType::RemovedRandom).expect("serialize"),
            "\"removed_random\""
        );
        let parsed: EmoteChangeType = serde_json::from_str("\"remove\"").expect("deserialize");
        assert_eq!(parsed, EmoteChangeType::Remove);
    }

    #[test]
    fn string_ids_serialize_transparently() {
        let channel = ChannelId::new("77829817");
        assert_eq!(
            serde_json::to_string(&channel).expect("serialize"),
            "\"77829817\""
        );
    }
}
