//! Storage key derivation.

const DATA_KEY_PREFIX: &str = "omnivault_data_";
const SETTINGS_KEY_PREFIX: &str = "omnivault_settings_";

/// Fixed slot for the last authenticated session.
pub const SESSION_KEY: &str = "omnivault_session";

/// Keys owned by one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub data: String,
    pub settings: String,
}

/// Maps identities to storage keys.
///
/// The two prefixes diverge before either ends, so a data key can never equal
/// a settings key, and equal prefixes keep distinct identities distinct.
pub struct KeyNamespace;

impl KeyNamespace {
    pub fn for_identity(identity: &str) -> StorageKeys {
        StorageKeys {
            data: Self::data_key(identity),
            settings: Self::settings_key(identity),
        }
    }

    pub fn data_key(identity: &str) -> String {
        format!("{DATA_KEY_PREFIX}{identity}")
    }

    pub fn settings_key(identity: &str) -> String {
        format!("{SETTINGS_KEY_PREFIX}{identity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_and_distinct() {
        let keys = KeyNamespace::for_identity("u1");
        assert_eq!(keys, KeyNamespace::for_identity("u1"));
        assert_eq!(keys.data, "omnivault_data_u1");
        assert_eq!(keys.settings, "omnivault_settings_u1");
        assert_ne!(keys.data, keys.settings);
    }

    #[test]
    fn identities_never_collide_across_namespaces() {
        let ids = ["", "u1", "u2", "settings_u1", "data_u1", "session"];
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            let keys = KeyNamespace::for_identity(id);
            assert!(seen.insert(keys.data));
            assert!(seen.insert(keys.settings));
        }
        assert!(!seen.contains(SESSION_KEY));
    }
}
