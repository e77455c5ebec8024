//! Explain registry for condition subjects.
//!
//! Maps subject names to human-readable matching semantics with an example condition.

use crate::{ConditionOperator, Subject};

/// Explanation entry for a condition subject.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub subject: Subject,
    /// Short description of the subject.
    pub title: &'static str,
    /// What the subject inspects and how its value is interpreted.
    pub description: &'static str,
    /// Operators the evaluator acts on; every other operator never matches.
    pub operators: &'static [ConditionOperator],
    pub example: ExampleCondition,
}

/// A condition that would raise, with the component data that trips it.
#[derive(Debug, Clone)]
pub struct ExampleCondition {
    pub operator: ConditionOperator,
    pub value: &'static str,
    /// Component attribute that makes the example condition match.
    pub matching: &'static str,
}

/// Look up an explanation by subject name.
///
/// Names are matched loosely (`cpe`, `package-url`, `SWID_TAG_ID`). Returns `None` if
/// the identifier is not a known subject.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    let subject: Subject = identifier.parse().ok()?;
    Some(explain(subject))
}

/// List all known subject names.
pub fn all_subjects() -> Vec<&'static str> {
    Subject::ALL.iter().map(|s| s.as_str()).collect()
}

const IS_IS_NOT: &[ConditionOperator] = &[ConditionOperator::Is, ConditionOperator::IsNot];
const MATCH_NO_MATCH: &[ConditionOperator] =
    &[ConditionOperator::Matches, ConditionOperator::NoMatch];
const NUMERIC: &[ConditionOperator] = &[
    ConditionOperator::NumericGreaterThan,
    ConditionOperator::NumericLessThan,
    ConditionOperator::NumericEqual,
    ConditionOperator::NumericNotEqual,
    ConditionOperator::NumericGreaterThanOrEqual,
    ConditionOperator::NumericLesserThanOrEqual,
];

pub fn explain(subject: Subject) -> Explanation {
    match subject {
        Subject::Coordinates => Explanation {
            subject,
            title: "Package Coordinates",
            description: "\
Matches the component's group, name and version against a JSON pattern.

The value is an object with optional `group`, `name` and `version` keys. Group and
name are glob patterns (`*` is a wildcard, matching is case-sensitive). Version is
either a glob or a comparator followed by a version: `>=1.2`, `<2`, `==1.0`,
`!=1.0`, `>`, `<=`.

MATCHES raises when every present part matches. NO_MATCH raises when at least one
present part does not match. A value that is not valid JSON matches nothing.",
            operators: MATCH_NO_MATCH,
            example: ExampleCondition {
                operator: ConditionOperator::Matches,
                value: r#"{"group":"org.apache.logging.*","name":"log4j-core","version":"<2.17.0"}"#,
                matching: "org.apache.logging.log4j/log4j-core@2.14.1",
            },
        },
        Subject::Cpe => Explanation {
            subject,
            title: "CPE",
            description: "\
Matches the component's CPE string by substring.

MATCHES raises when the CPE contains the value. NO_MATCH raises when the component
has a CPE that does not contain the value. Components without a CPE never raise.",
            operators: MATCH_NO_MATCH,
            example: ExampleCondition {
                operator: ConditionOperator::Matches,
                value: "cpe:2.3:a:acme",
                matching: "cpe:2.3:a:acme:widget:1.0",
            },
        },
        Subject::License => Explanation {
            subject,
            title: "License",
            description: "\
Compares the component's resolved license (an SPDX id) with the value.

IS raises when the ids are equal, IS_NOT when they differ. The special value
`unresolved` stands for a component whose license could not be resolved.",
            operators: IS_IS_NOT,
            example: ExampleCondition {
                operator: ConditionOperator::Is,
                value: "GPL-3.0-only",
                matching: "resolved license GPL-3.0-only",
            },
        },
        Subject::LicenseGroup => Explanation {
            subject,
            title: "License Group",
            description: "\
Checks membership of the component's resolved license in a license group.

The value is a license group id. IS raises when the license belongs to the group.
IS_NOT raises when the license is outside the group, and also when the component
has no resolved license at all. An unknown group contains nothing.",
            operators: IS_IS_NOT,
            example: ExampleCondition {
                operator: ConditionOperator::Is,
                value: "copyleft",
                matching: "resolved license AGPL-3.0-only, a member of `copyleft`",
            },
        },
        Subject::PackageUrl => Explanation {
            subject,
            title: "Package URL",
            description: "\
Matches the component's purl by substring.

MATCHES raises when the purl contains the value. NO_MATCH raises when the component
has a purl that does not contain the value.",
            operators: MATCH_NO_MATCH,
            example: ExampleCondition {
                operator: ConditionOperator::Matches,
                value: "pkg:npm/left-pad",
                matching: "pkg:npm/left-pad@1.3.0",
            },
        },
        Subject::Severity => Explanation {
            subject,
            title: "Vulnerability Severity",
            description: "\
Compares the severity of each vulnerability affecting the component with the value.

The value is a severity name: CRITICAL, HIGH, MEDIUM, LOW, INFO or UNASSIGNED. IS
raises once per vulnerability with that severity. IS_NOT raises once per
vulnerability with any other severity.",
            operators: IS_IS_NOT,
            example: ExampleCondition {
                operator: ConditionOperator::Is,
                value: "CRITICAL",
                matching: "affected by CVE-2021-44228 (CRITICAL)",
            },
        },
        Subject::SwidTagId => Explanation {
            subject,
            title: "SWID Tag Id",
            description: "\
Matches the component's SWID tag id by substring.

MATCHES raises when the tag id contains the value. NO_MATCH raises when the
component has a tag id that does not contain the value.",
            operators: MATCH_NO_MATCH,
            example: ExampleCondition {
                operator: ConditionOperator::Matches,
                value: "acme.com",
                matching: "swidgen-acme.com-widget-1.0",
            },
        },
        Subject::Version => Explanation {
            subject,
            title: "Version",
            description: "\
Compares the component version with the value using semantic version ordering.

Versions are read leniently: a leading `v` is dropped and missing minor or patch
parts count as zero, so `2` equals `2.0.0`. If either side cannot be read as a
version the condition does not raise.",
            operators: NUMERIC,
            example: ExampleCondition {
                operator: ConditionOperator::NumericLessThan,
                value: "1.1.1",
                matching: "version 1.1.0",
            },
        },
        Subject::ComponentHash => Explanation {
            subject,
            title: "Component Hash",
            description: "\
Compares one of the component's hashes with a known digest.

The value is JSON `{\"algorithm\": \"SHA-256\", \"value\": \"<hex>\"}`. Algorithm names
ignore case, `-` and `_`; digests ignore case. IS raises when the component's hash
for that algorithm equals the digest. IS_NOT raises when the component carries a
hash for that algorithm and it differs.",
            operators: IS_IS_NOT,
            example: ExampleCondition {
                operator: ConditionOperator::Is,
                value: r#"{"algorithm":"SHA-256","value":"9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"}"#,
                matching: "SHA-256 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
            },
        },
        Subject::Cwe => Explanation {
            subject,
            title: "CWE",
            description: "\
Checks the weakness classes of the vulnerabilities affecting the component.

The value is a comma separated list of CWE ids, written `CWE-79` or `79`. IS raises
once per vulnerability sharing at least one CWE with the list. IS_NOT raises once
per vulnerability sharing none.",
            operators: IS_IS_NOT,
            example: ExampleCondition {
                operator: ConditionOperator::Is,
                value: "CWE-79, CWE-89",
                matching: "affected by a vulnerability classified CWE-79",
            },
        },
        Subject::VulnerabilityId => Explanation {
            subject,
            title: "Vulnerability Id",
            description: "\
Compares the ids of the vulnerabilities affecting the component with the value.

Comparison ignores case. IS raises once per vulnerability with that id. IS_NOT
raises once per vulnerability with a different id.",
            operators: IS_IS_NOT,
            example: ExampleCondition {
                operator: ConditionOperator::Is,
                value: "CVE-2021-44228",
                matching: "affected by CVE-2021-44228",
            },
        },
    }
}
