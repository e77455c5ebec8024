//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// The workspace root (parent of the xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(compguard_types::CompguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(compguard_settings::CompguardConfigV1)
}

fn generate_inventory_schema() -> schemars::Schema {
    schema_for!(compguard_store::Inventory)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "compguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "compguard.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "compguard.inventory.v1.json",
            generate: generate_inventory_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &missing {
        eprintln!("missing: {}", name);
    }
    for name in &mismatched {
        eprintln!("out of date: {}", name);
    }
    eprintln!("\nRun `cargo xtask schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Validate fixture documents against the generated schemas.
///
/// Each `tests/fixtures/<name>/` may hold `inventory.json` and `expected.report.json`.
/// Expected reports must also already be normalized, so golden comparisons are stable.
fn conformance() -> anyhow::Result<()> {
    let report_validator = jsonschema::validator_for(&schema_value(generate_report_schema())?)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {e}"))?;
    let inventory_validator =
        jsonschema::validator_for(&schema_value(generate_inventory_schema())?)
            .map_err(|e| anyhow::anyhow!("Failed to compile inventory schema: {e}"))?;

    let mut checked = 0;
    let mut errors = Vec::new();

    let mut fixtures: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    fixtures.sort();

    for dir in fixtures {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let inventory = dir.join("inventory.json");
        if inventory.exists() {
            let value = read_json(&inventory)?;
            for err in inventory_validator.iter_errors(&value) {
                errors.push(format!("{name}/inventory.json: {err}"));
            }
            if let Err(err) = compguard_store::fuzz::parse_and_index(&value.to_string()) {
                errors.push(format!("{name}/inventory.json: {err:#}"));
            }
            checked += 1;
        }

        let report = dir.join("expected.report.json");
        if report.exists() {
            let value = read_json(&report)?;
            for err in report_validator.iter_errors(&value) {
                errors.push(format!("{name}/expected.report.json: {err}"));
            }
            if compguard_test_util::normalize_nondeterministic(value.clone()) != value {
                errors.push(format!(
                    "{name}/expected.report.json: timestamps or tool version are not normalized"
                ));
            }
            checked += 1;
        }
    }

    if errors.is_empty() {
        println!("✓ {checked} fixture documents conform");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Conformance failed with {} errors", errors.len())
    }
}

fn schema_value(schema: schemars::Schema) -> anyhow::Result<serde_json::Value> {
    serde_json::to_value(schema).context("Failed to convert schema to JSON")
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Every subject must carry a non-empty explanation.
fn explain_coverage() -> anyhow::Result<()> {
    let subjects = compguard_types::all_subjects();
    let mut errors = Vec::new();

    for subject in &subjects {
        match compguard_types::lookup_explanation(subject) {
            Some(exp) => {
                if exp.title.is_empty() || exp.description.is_empty() {
                    errors.push(format!("Subject '{}' has an empty explanation", subject));
                }
                if !exp.operators.contains(&exp.example.operator) {
                    errors.push(format!(
                        "Subject '{}' example uses an operator it ignores",
                        subject
                    ));
                }
            }
            None => errors.push(format!("Subject '{}' has no explanation", subject)),
        }
    }

    if errors.is_empty() {
        println!("✓ {} subjects have explanations", subjects.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Explain coverage failed with {} errors", errors.len())
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  schemas           Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  conformance       Validate tests/fixtures documents against the schemas");
    eprintln!("  explain-coverage  Validate every condition subject has an explanation");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conformance" => conformance(),
        "explain-coverage" => explain_coverage(),
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
