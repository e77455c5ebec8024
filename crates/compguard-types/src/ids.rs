//! Stable identifiers that appear in reports, config and condition values.

/// Tool name stamped into every report.
pub const TOOL_NAME: &str = "compguard";

/// LICENSE condition value that matches a component without a resolved license.
pub const LICENSE_UNRESOLVED: &str = "unresolved";

// Violation type names as they appear in reports.
pub const TYPE_SECURITY: &str = "SECURITY";
pub const TYPE_OPERATIONAL: &str = "OPERATIONAL";
pub const TYPE_LICENSE: &str = "LICENSE";
