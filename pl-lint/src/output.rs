//! Shared output formatting for run reports.
//!
//! Provides JSON and plain-text formatters for `RunReport`.
//! Color/terminal formatting belongs to the CLI layer.

use std::io::Write;

use crate::config::RunMode;
use crate::report::RunReport;

/// Format a `RunReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &RunReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `RunReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &RunReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    if report.documents.is_empty() && report.discrepancies.is_empty() {
        writeln!(writer, "No HTML files found.")?;
        return Ok(());
    }

    writeln!(writer, "Mode: {}", report.mode.name())?;
    if let RunMode::Expectation { expected_failures } = &report.mode {
        let listed: Vec<&str> = expected_failures.iter().map(String::as_str).collect();
        writeln!(writer, "Expected failures: {}", listed.join(", "))?;
    }
    writeln!(
        writer,
        "Found {} HTML file(s) to lint:",
        report.documents_count()
    )?;
    for doc in &report.documents {
        writeln!(writer, "  - {}", doc.id)?;
    }
    writeln!(writer)?;

    for doc in &report.documents {
        writeln!(writer, "Linting: {}", doc.id)?;
        if doc.has_errors() {
            writeln!(
                writer,
                "  \u{2717} FAILED with {} error(s):",
                doc.errors.len()
            )?;
            for error in &doc.errors {
                writeln!(writer, "    - {}", error.format_human_readable())?;
            }
        } else {
            writeln!(writer, "  \u{2713} PASSED")?;
        }
        writeln!(writer)?;
    }

    if !report.discrepancies.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  EXPECTATION MISMATCHES")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for discrepancy in &report.discrepancies {
            writeln!(writer, "{}", discrepancy.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    match (&report.mode, report.ok) {
        (RunMode::Strict, true) => {
            writeln!(
                writer,
                "\u{2713} All {} file(s) passed linting!",
                report.documents_count()
            )?;
        }
        (RunMode::Strict, false) => {
            writeln!(
                writer,
                "\u{2717} Linting failed! {} of {} file(s) have errors. \
                 Please fix the errors above.",
                report.failed_count(),
                report.documents_count()
            )?;
        }
        (RunMode::Expectation { .. }, true) => {
            writeln!(
                writer,
                "\u{2713} All {} file(s) matched expectations ({} expected failure(s))",
                report.documents_count(),
                report.failed_count()
            )?;
        }
        (RunMode::Expectation { .. }, false) => {
            writeln!(
                writer,
                "\u{2717} {} expectation mismatch(es) found",
                report.discrepancies.len()
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::validator::validate_run;

    fn render(report: &RunReport) -> String {
        let mut buf = Vec::new();
        write_human(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_human_no_documents() {
        let report = validate_run(Vec::<(String, String)>::new(), &ValidationConfig::default());
        assert_eq!(render(&report), "No HTML files found.\n");
    }

    #[test]
    fn test_human_strict_failure() {
        let report = validate_run(
            [
                ("good.html", "<p/>"),
                ("bad.html", "<div><pl-multiple-choice/></div>"),
            ],
            &ValidationConfig::default(),
        );
        let out = render(&report);
        assert!(out.contains("Linting: good.html\n  \u{2713} PASSED"));
        assert!(out.contains("Linting: bad.html\n  \u{2717} FAILED with 1 error(s):"));
        assert!(out.contains("    - 1:6: <pl-multiple-choice> must be the root element"));
        assert!(out.contains("Linting failed! 1 of 2 file(s) have errors"));
    }

    #[test]
    fn test_human_expectation_mismatch_section() {
        let mut config = ValidationConfig::default();
        config.mode = RunMode::expecting(["good.html"]);
        let report = validate_run([("good.html", "<p/>")], &config);
        let out = render(&report);
        assert!(out.contains("Mode: expectation"));
        assert!(out.contains("EXPECTATION MISMATCHES"));
        assert!(out.contains("good.html: [expectation mismatch] expected fail but passed"));
        assert!(out.contains("1 expectation mismatch(es) found"));
    }

    #[test]
    fn test_json_contract() {
        let report = validate_run(
            [("bad.html", "<div><span></div>")],
            &ValidationConfig::default(),
        );
        let mut buf = Vec::new();
        write_json(&report, &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(json["ok"], false);
        assert_eq!(json["mode"]["kind"], "strict");
        assert_eq!(json["documents"][0]["id"], "bad.html");
        assert_eq!(json["documents"][0]["errors"][0]["kind"], "SyntaxError");
        assert!(json["discrepancies"].as_array().unwrap().is_empty());
    }
}
