// ─── Rule Evaluation ───
// Ordered allow/disallow rules from version manifests, matched against the
// platform and the set of enabled launch features.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

/// OS constraints of a rule. `version` is an unanchored regex over the
/// platform version string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<HashMap<String, bool>>,
}

impl Rule {
    /// Whether this rule's constraints match `(platform, features)`.
    /// A rule with no constraints matches everything.
    fn applies(&self, platform: &Platform, features: &HashSet<String>) -> bool {
        if let Some(os) = &self.os {
            if let Some(name) = &os.name {
                if name != platform.name.as_str() {
                    return false;
                }
            }
            if let Some(arch) = &os.arch {
                if arch != &platform.arch {
                    return false;
                }
            }
            if let Some(version) = &os.version {
                match regex::Regex::new(version) {
                    Ok(re) => {
                        if !re.is_match(&platform.version) {
                            return false;
                        }
                    }
                    Err(e) => {
                        debug!("Unparseable os.version rule `{version}`: {e}");
                        return false;
                    }
                }
            }
        }

        if let Some(required) = &self.features {
            for (feature, expected) in required {
                if features.contains(feature) != *expected {
                    return false;
                }
            }
        }

        true
    }

    /// True when the rule constrains on launch features at all.
    pub fn references_features(&self) -> bool {
        self.features.as_ref().is_some_and(|f| !f.is_empty())
    }
}

/// Evaluate an ordered rule list. An empty list allows; otherwise the
/// verdict starts at disallow and the last applicable rule wins.
pub fn evaluate_rules(rules: &[Rule], platform: &Platform, features: &HashSet<String>) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut allowed = false;
    for rule in rules {
        if rule.applies(platform, features) {
            allowed = rule.action == RuleAction::Allow;
        }
    }
    allowed
}

/// True when any rule in the list constrains on launch features.
pub fn rules_reference_features(rules: &[Rule]) -> bool {
    rules.iter().any(Rule::references_features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OsFamily;

    fn linux_x64() -> Platform {
        Platform {
            name: OsFamily::Linux,
            version: "6.1.0".to_string(),
            arch: "x64".to_string(),
        }
    }

    fn allow(os: Option<OsConstraint>) -> Rule {
        Rule {
            action: RuleAction::Allow,
            os,
            features: None,
        }
    }

    fn disallow(os: Option<OsConstraint>) -> Rule {
        Rule {
            action: RuleAction::Disallow,
            os,
            features: None,
        }
    }

    #[test]
    fn empty_rules_allow() {
        assert!(evaluate_rules(&[], &linux_x64(), &HashSet::new()));
    }

    #[test]
    fn unconstrained_allow_and_disallow() {
        let features = HashSet::new();
        assert!(evaluate_rules(&[allow(None)], &linux_x64(), &features));
        assert!(!evaluate_rules(&[disallow(None)], &linux_x64(), &features));
    }

    #[test]
    fn last_applicable_rule_wins() {
        let rules = vec![
            allow(None),
            disallow(Some(OsConstraint {
                name: Some("linux".to_string()),
                ..Default::default()
            })),
        ];
        assert!(!evaluate_rules(&rules, &linux_x64(), &HashSet::new()));
    }

    #[test]
    fn mismatching_os_rule_does_not_apply() {
        let rules = vec![allow(Some(OsConstraint {
            name: Some("osx".to_string()),
            ..Default::default()
        }))];
        // Only rule does not apply, so the initial disallow stands.
        assert!(!evaluate_rules(&rules, &linux_x64(), &HashSet::new()));
    }

    #[test]
    fn os_version_is_regex_matched() {
        let rule = allow(Some(OsConstraint {
            name: Some("linux".to_string()),
            version: Some(r"^6\.".to_string()),
            ..Default::default()
        }));
        assert!(evaluate_rules(
            &[rule.clone()],
            &linux_x64(),
            &HashSet::new()
        ));

        let mut old = linux_x64();
        old.version = "5.15.2".to_string();
        assert!(!evaluate_rules(&[rule], &old, &HashSet::new()));
    }

    #[test]
    fn arch_constraint_must_equal() {
        let rule = allow(Some(OsConstraint {
            arch: Some("x64".to_string()),
            ..Default::default()
        }));
        assert!(evaluate_rules(&[rule.clone()], &linux_x64(), &HashSet::new()));

        let mut arm = linux_x64();
        arm.arch = "arm64".to_string();
        assert!(!evaluate_rules(&[rule], &arm, &HashSet::new()));
    }

    #[test]
    fn features_match_membership() {
        let rule = Rule {
            action: RuleAction::Allow,
            os: None,
            features: Some(HashMap::from([
                ("is_demo_user".to_string(), true),
                ("has_custom_resolution".to_string(), false),
            ])),
        };
        assert!(rule.references_features());

        let demo: HashSet<String> = ["is_demo_user".to_string()].into();
        assert!(evaluate_rules(&[rule.clone()], &linux_x64(), &demo));

        let both: HashSet<String> = [
            "is_demo_user".to_string(),
            "has_custom_resolution".to_string(),
        ]
        .into();
        assert!(!evaluate_rules(&[rule.clone()], &linux_x64(), &both));
        assert!(!evaluate_rules(&[rule], &linux_x64(), &HashSet::new()));
    }
}
