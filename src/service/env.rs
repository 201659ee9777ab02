//! Declarative environment assembly
//!
//! A factory lists its variables as [`EnvRule`]s; the list is evaluated once
//! per build. Optional settings left empty produce no entry at all.

use super::context::TopologyContext;
use crate::config::DeploymentConfig;
use serde::{Deserialize, Serialize};

/// Produces a variable's value from the configuration and topology
pub type EnvValue = fn(&DeploymentConfig, &TopologyContext) -> String;

/// Decides whether a variable is emitted
pub type EnvPredicate = fn(&DeploymentConfig, &TopologyContext) -> bool;

/// When a rule emits its variable
#[derive(Clone, Copy)]
pub enum Condition {
    /// Always, even when the value is empty
    Always,
    /// Only when the produced value is non-empty
    NonEmpty,
    /// Only when the predicate holds
    When(EnvPredicate),
}

/// One (predicate, key, value) environment rule
#[derive(Clone, Copy)]
pub struct EnvRule {
    pub key: &'static str,
    pub condition: Condition,
    pub value: EnvValue,
}

impl EnvRule {
    /// Emit `key` unconditionally
    pub fn always(key: &'static str, value: EnvValue) -> Self {
        Self {
            key,
            condition: Condition::Always,
            value,
        }
    }

    /// Emit `key` only when its value is non-empty
    pub fn if_present(key: &'static str, value: EnvValue) -> Self {
        Self {
            key,
            condition: Condition::NonEmpty,
            value,
        }
    }

    /// Emit `key` only when `predicate` holds
    pub fn when(key: &'static str, predicate: EnvPredicate, value: EnvValue) -> Self {
        Self {
            key,
            condition: Condition::When(predicate),
            value,
        }
    }

    /// Evaluate the rule
    pub fn evaluate(
        &self,
        config: &DeploymentConfig,
        ctx: &TopologyContext,
    ) -> Option<(&'static str, String)> {
        match self.condition {
            Condition::Always => Some((self.key, (self.value)(config, ctx))),
            Condition::NonEmpty => {
                let value = (self.value)(config, ctx);
                (!value.is_empty()).then_some((self.key, value))
            }
            Condition::When(predicate) => {
                predicate(config, ctx).then(|| (self.key, (self.value)(config, ctx)))
            }
        }
    }
}

impl std::fmt::Debug for EnvRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvRule").field("key", &self.key).finish()
    }
}

/// Ordered environment without duplicate keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvList(Vec<(String, String)>);

impl EnvList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Evaluate `rules` in order
    pub fn from_rules(rules: &[EnvRule], config: &DeploymentConfig, ctx: &TopologyContext) -> Self {
        let mut env = Self::new();
        for rule in rules {
            if let Some((key, value)) = rule.evaluate(config, ctx) {
                env.set(key, value);
            }
        }
        env
    }

    /// Set a variable; an existing key keeps its position and takes the new value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `KEY=value` strings, as used by compose files and the Docker API
    pub fn to_pairs(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use std::path::PathBuf;

    fn ctx() -> TopologyContext {
        TopologyContext::new(PathBuf::from("/srv/den"), Platform::Linux)
    }

    #[test]
    fn test_if_present_skips_empty() {
        let rules = [
            EnvRule::if_present("LDAP_USERNAME", |c, _| c.directory.username.clone()),
            EnvRule::always("PICKY_REALM", |c, _| c.identity.realm.clone()),
        ];

        let config = DeploymentConfig::default();
        let env = EnvList::from_rules(&rules, &config, &ctx());
        assert!(!env.contains("LDAP_USERNAME"));
        assert_eq!(env.get("PICKY_REALM"), Some(""));

        let mut config = DeploymentConfig::default();
        config.directory.username = "svc-den".to_string();
        let env = EnvList::from_rules(&rules, &config, &ctx());
        assert_eq!(env.get("LDAP_USERNAME"), Some("svc-den"));
    }

    #[test]
    fn test_predicate_rule() {
        let rules = [EnvRule::when(
            "PLATFORM_ROOT",
            |_, ctx| ctx.platform == Platform::Windows,
            |_, ctx| ctx.platform.mount_root("den-server"),
        )];

        let config = DeploymentConfig::default();
        assert!(EnvList::from_rules(&rules, &config, &ctx()).is_empty());

        let windows = TopologyContext::new(PathBuf::from("c:\\den"), Platform::Windows);
        let env = EnvList::from_rules(&rules, &config, &windows);
        assert_eq!(env.get("PLATFORM_ROOT"), Some("c:\\den-server"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut env = EnvList::new();
        env.set("A", "1");
        env.set("B", "2");
        env.set("A", "3");

        assert_eq!(env.len(), 2);
        assert_eq!(env.to_pairs(), vec!["A=3".to_string(), "B=2".to_string()]);
    }
}
