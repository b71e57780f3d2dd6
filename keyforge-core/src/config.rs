use serde::{Deserialize, Serialize};

use crate::path::DerivationPath;

/// The full set of labels one run derives.
///
/// The complete label set is the account list plus, for each session
/// account, one label per session role. Both lists are ordered and the
/// order is preserved in all output; it is semantically meaningful for
/// human review, not incidental. This is configuration, not derived data;
/// tests can substitute arbitrary label sets without touching the
/// derivation logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Technical-account labels, in output order.
    pub accounts: Vec<DerivationPath>,
    /// Names that run validators and get babe/gran/imon session keys,
    /// in output order.
    pub session_accounts: Vec<DerivationPath>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        // lionel is the root
        let accounts = [
            "lionel",
            "diego",
            "diego//stash",
            "pele",
            "pele//stash",
            "franz",
            "franz//stash",
            "johan",
            "ronaldo",
            "zinedine",
            "cristiano",
            "michel",
            "roberto",
        ];
        let session_accounts = ["diego", "pele", "franz"];
        Self {
            accounts: parse_all(&accounts),
            session_accounts: parse_all(&session_accounts),
        }
    }
}

fn parse_all(labels: &[&str]) -> Vec<DerivationPath> {
    labels
        .iter()
        .map(|label| label.parse().expect("static label is well-formed"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_account_order_is_preserved() {
        let config = LabelConfig::default();
        let names: Vec<String> =
            config.accounts.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "lionel",
                "diego",
                "diego//stash",
                "pele",
                "pele//stash",
                "franz",
                "franz//stash",
                "johan",
                "ronaldo",
                "zinedine",
                "cristiano",
                "michel",
                "roberto",
            ]
        );
    }

    #[test]
    fn session_accounts_are_a_subset_of_accounts() {
        let config = LabelConfig::default();
        for name in &config.session_accounts {
            assert!(config.accounts.contains(name), "{name} not in accounts");
        }
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{
            "accounts": ["alice", "alice//stash", "bob"],
            "session_accounts": ["alice"]
        }"#;
        let config: LabelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.accounts.len(), 3);
        assert_eq!(config.session_accounts.len(), 1);
        assert_eq!(config.accounts[1].to_string(), "alice//stash");
    }

    #[test]
    fn rejects_malformed_labels_in_json() {
        let json = r#"{ "accounts": ["alice//"], "session_accounts": [] }"#;
        assert!(serde_json::from_str::<LabelConfig>(json).is_err());
    }
}
