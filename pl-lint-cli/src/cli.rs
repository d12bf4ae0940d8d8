use std::io::Write;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use colored::{ColoredString, Colorize};
use pl_lint::{FsSourceConfig, RunMode, RunReport, ValidationConfig, output, validate_fs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
}

/// Check PL HTML files for XML syntax and `<pl-multiple-choice>` placement.
#[derive(Debug, Parser)]
#[command(name = "pl-lint", version, about)]
pub struct Cli {
    /// Directory to search for .html files
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub repo_root: PathBuf,

    /// Compare failures against --expected-failures instead of failing on any error
    /// (accepts true/false, 1/0, yes/no, on/off)
    #[arg(
        long,
        env = "PL_LINT_TEST_MODE",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub test_mode: bool,

    /// Comma-separated file names (or relative paths) expected to fail in test mode
    #[arg(long, env = "PL_LINT_EXPECTED_FAILURES", value_delimiter = ',')]
    pub expected_failures: Vec<String>,

    /// Glob pattern to exclude (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Maximum size of a single file in bytes
    #[arg(long, default_value_t = 10_485_760)]
    pub max_file_size: u64,

    /// Follow symbolic links while searching
    #[arg(long)]
    pub follow_links: bool,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = Format::Human)]
    pub format: Format,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Fold flags and environment into the library configs.
    #[must_use]
    pub fn configs(&self) -> (FsSourceConfig, ValidationConfig) {
        let mut fs_config = FsSourceConfig::default();
        fs_config.repo_root.clone_from(&self.repo_root);
        fs_config.exclude.clone_from(&self.exclude);
        fs_config.max_file_size = self.max_file_size;
        fs_config.follow_links = self.follow_links;

        let mut config = ValidationConfig::default();
        if self.test_mode {
            config.mode = RunMode::expecting(&self.expected_failures);
        }
        (fs_config, config)
    }
}

/// Run the linter; `Ok(false)` means the run completed but failed.
pub fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let (fs_config, config) = cli.configs();
    tracing::debug!(?cli, "parsed arguments");

    let mut stdout = std::io::stdout().lock();
    if cli.format == Format::Human {
        writeln!(
            stdout,
            "Scanning for HTML files in: {}",
            fs_config.repo_root.display()
        )?;
    }

    let report = validate_fs(&fs_config, &config)?;
    match cli.format {
        Format::Human => output::write_human(&report, &mut stdout)?,
        Format::Json => output::write_json(&report, &mut stdout)?,
    }
    stdout.flush()?;

    eprintln!("{}", verdict(&report));
    Ok(report.ok)
}

fn verdict(report: &RunReport) -> ColoredString {
    let line = format!(
        "pl-lint ({} mode): {} file(s), {} with errors, {} expectation mismatch(es)",
        report.mode.name(),
        report.documents_count(),
        report.failed_count(),
        report.discrepancies.len()
    );
    if report.ok {
        line.green().bold()
    } else {
        line.red().bold()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use clap::CommandFactory;
    use clap::builder::TypedValueParser;
    use std::ffi::OsStr;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pl-lint", "--repo-root", "/tmp/questions"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_strict_mode_by_default() {
        let cli = parse(&[]);
        let (fs_config, config) = cli.configs();
        assert_eq!(fs_config.repo_root, PathBuf::from("/tmp/questions"));
        assert_eq!(config.mode, RunMode::Strict);
        assert_eq!(cli.format, Format::Human);
    }

    #[test]
    fn test_test_mode_with_expected_failures() {
        let cli = parse(&["--test-mode", "--expected-failures", "bad.html,worse.html"]);
        let (_, config) = cli.configs();
        assert_eq!(config.mode, RunMode::expecting(["bad.html", "worse.html"]));
    }

    #[test]
    fn test_test_mode_accepts_boolish_values() {
        for (value, expected) in [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("true", true),
            ("0", false),
            ("no", false),
            ("off", false),
            ("false", false),
        ] {
            let flag = format!("--test-mode={value}");
            let cli = parse(&[flag.as_str()]);
            assert_eq!(cli.test_mode, expected, "{flag}");
        }
    }

    #[test]
    fn test_test_mode_env_fallback() {
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "test_mode")
            .unwrap();
        assert_eq!(
            arg.get_env().and_then(|v| v.to_str()),
            Some("PL_LINT_TEST_MODE")
        );

        // Env values go through the same parser as `--test-mode=<value>`.
        let parser = BoolishValueParser::new();
        for value in ["1", "yes", "ON"] {
            let parsed = parser.parse_ref(&command, Some(arg), OsStr::new(value));
            assert!(parsed.unwrap(), "{value}");
        }
        let parsed = parser.parse_ref(&command, Some(arg), OsStr::new("0"));
        assert!(!parsed.unwrap());
    }

    #[test]
    fn test_expected_failures_ignored_without_test_mode() {
        let cli = parse(&["--expected-failures", "bad.html"]);
        let (_, config) = cli.configs();
        assert_eq!(config.mode, RunMode::Strict);
    }

    #[test]
    fn test_source_options() {
        let cli = parse(&[
            "--exclude",
            "drafts/*",
            "--exclude",
            "*.tmp.html",
            "--max-file-size",
            "1024",
            "--format",
            "json",
            "-vv",
        ]);
        let (fs_config, _) = cli.configs();
        assert_eq!(fs_config.exclude, vec!["drafts/*", "*.tmp.html"]);
        assert_eq!(fs_config.max_file_size, 1024);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_verdict_mentions_counts() {
        let report = pl_lint::validate_run(
            [("a.html", "<p/>"), ("b.html", "<p>")],
            &ValidationConfig::default(),
        );
        colored::control::set_override(false);
        let text = verdict(&report).to_string();
        assert_eq!(
            text,
            "pl-lint (strict mode): 2 file(s), 1 with errors, 0 expectation mismatch(es)"
        );
    }
}
