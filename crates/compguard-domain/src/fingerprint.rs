use compguard_types::{ComponentId, ConditionId};
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a policy violation.
///
/// Identity fields are the violation key: component id and condition id.
pub fn fingerprint_for_violation(component: &ComponentId, condition: &ConditionId) -> String {
    let canonical = [component.as_str(), condition.as_str()].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
