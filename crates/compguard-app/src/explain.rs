//! The `explain` use case: look up condition subject documentation.

use compguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes the subject names that are known.
    NotFound {
        identifier: String,
        available_subjects: Vec<&'static str>,
    },
}

/// Look up an explanation for a condition subject.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_subjects: explain::all_subjects(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    let heading = format!("{} ({})", exp.title, exp.subject);
    out.push_str(&heading);
    out.push('\n');
    out.push_str(&"=".repeat(heading.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");

    out.push_str("Operators\n");
    out.push_str("---------\n");
    for op in exp.operators {
        out.push_str(&format!("  - {op}\n"));
    }
    out.push('\n');

    out.push_str("Example\n");
    out.push_str("-------\n\n");
    out.push_str("```json\n");
    out.push_str(&format!(
        "{{ \"subject\": \"{}\", \"operator\": \"{}\", \"value\": {} }}\n",
        exp.subject,
        exp.example.operator,
        json_string(exp.example.value)
    ));
    out.push_str("```\n\n");
    out.push_str("Raises for: ");
    out.push_str(exp.example.matching);
    out.push('\n');

    out
}

fn json_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_string()).to_string()
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, subjects: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown condition subject: {}\n\n", identifier));
    out.push_str("Available subjects:\n");
    for subject in subjects {
        out.push_str(&format!("  - {}\n", subject));
    }

    out
}
