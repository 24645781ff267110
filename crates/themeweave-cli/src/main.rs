//! `themeweave` - generate design tokens from theme documents.
//!
//! ```text
//! themeweave generate ocean.yaml --format all --out dist/
//! themeweave generate ocean.json --format css > ocean.css
//! themeweave validate ocean.yaml
//! themeweave formats
//! ```
//!
//! Log output goes to stderr; `RUST_LOG` overrides the level, `-v` raises it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use console::Style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use themeweave::processor::DEFAULT_THEME_ID;
use themeweave::{validate, FormatRegistry, GenerateOptions, ModeSelection, ThemeDocument};

const ALL_FORMATS: &str = "all";

/// Theme normalization and design token generation
#[derive(Debug, Parser)]
#[command(name = "themeweave", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a theme into one or all formats
    Generate(GenerateArgs),
    /// Check a theme document and report problems
    Validate {
        /// Theme document (.json, .yaml or .yml)
        theme: PathBuf,
    },
    /// List the available output formats
    Formats,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Theme document (.json, .yaml or .yml)
    theme: PathBuf,

    /// Format id, or `all`
    #[arg(short, long, default_value = ALL_FORMATS)]
    format: String,

    /// Output directory; a single format goes to stdout without it
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Options file (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the canonical pipeline on legacy documents
    #[arg(long)]
    force_v2: bool,

    /// Modes to generate
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Light,
    Dark,
    Both,
}

impl From<ModeArg> for ModeSelection {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Light => ModeSelection::Light,
            ModeArg::Dark => ModeSelection::Dark,
            ModeArg::Both => ModeSelection::Both,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {err:#}", Style::new().red().bold().apply_to("error:"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs a command; `Ok(false)` means it completed but found failures.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Validate { theme } => validate_theme(&theme),
        Command::Formats => {
            list_formats();
            Ok(true)
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn load_theme(path: &Path) -> Result<ThemeDocument> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = if is_json(path) {
        ThemeDocument::from_json(&text)
    } else {
        ThemeDocument::from_yaml(&text)
    };
    doc.with_context(|| format!("parsing {}", path.display()))
}

fn load_options(args: &GenerateArgs) -> Result<GenerateOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let parsed = if is_json(path) {
                GenerateOptions::from_json(&text)
            } else {
                GenerateOptions::from_yaml(&text)
            };
            parsed.with_context(|| format!("parsing {}", path.display()))?
        }
        None => GenerateOptions::default(),
    };
    if args.force_v2 {
        options.force_v2 = true;
    }
    if let Some(mode) = args.mode {
        options.mode = mode.into();
    }
    Ok(options)
}

/// File stem for generated files: the theme id, reduced to safe characters.
fn file_stem(doc: &ThemeDocument) -> String {
    let id = doc.id().filter(|id| !id.is_empty()).unwrap_or(DEFAULT_THEME_ID);
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// `ocean.css`, but `ocean.figma.json` where the format id and extension differ,
/// so formats sharing an extension do not overwrite each other.
fn file_name(stem: &str, format: &str, ext: &str) -> String {
    if format == ext {
        format!("{stem}.{ext}")
    } else {
        format!("{stem}.{format}.{ext}")
    }
}

fn write_output(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn generate(args: &GenerateArgs) -> Result<bool> {
    let doc = load_theme(&args.theme)?;
    let options = load_options(args)?;
    let registry = FormatRegistry::default();
    let stem = file_stem(&doc);
    debug!(theme = %args.theme.display(), format = %args.format, "generating");

    let ok = Style::new().green();
    let failed = Style::new().red();

    if args.format != ALL_FORMATS {
        let generated = registry.generate(&doc, &args.format, &options)?;
        match &args.out {
            Some(dir) => {
                let name = file_name(&stem, &generated.format, &generated.ext);
                let path = write_output(dir, &name, &generated.content)?;
                println!("{} {} -> {}", ok.apply_to("✓"), generated.format, path.display());
            }
            None => print!("{}", generated.content),
        }
        return Ok(true);
    }

    let dir = args.out.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut all_ok = true;
    for result in registry.generate_all(&doc, &options) {
        match result.content() {
            Some(content) => {
                let path = write_output(&dir, &file_name(&stem, &result.format, &result.ext), content)?;
                println!("{} {} -> {}", ok.apply_to("✓"), result.format, path.display());
            }
            None => {
                all_ok = false;
                let reason = result
                    .error()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                println!("{} {}: {reason}", failed.apply_to("✗"), result.format);
            }
        }
    }
    Ok(all_ok)
}

fn validate_theme(path: &Path) -> Result<bool> {
    let doc = load_theme(path)?;
    let report = validate(&doc);

    let error = Style::new().red().bold();
    let warning = Style::new().yellow().bold();
    for message in &report.errors {
        println!("{} {message}", error.apply_to("error:"));
    }
    for message in &report.warnings {
        println!("{} {message}", warning.apply_to("warning:"));
    }

    let summary = format!(
        "{}: {} error(s), {} warning(s)",
        path.display(),
        report.errors.len(),
        report.warnings.len()
    );
    if report.valid {
        println!("{} {summary}", Style::new().green().apply_to("valid"));
    } else {
        println!("{} {summary}", Style::new().red().apply_to("invalid"));
    }
    Ok(report.valid)
}

fn list_formats() {
    let id = Style::new().cyan().bold();
    let dim = Style::new().dim();
    for descriptor in FormatRegistry::default().formats() {
        println!(
            "{:<18} {:<18} {}",
            id.apply_to(&descriptor.id),
            descriptor.name,
            dim.apply_to(format!(".{} ({})", descriptor.ext, descriptor.content_type))
        );
        println!("{:<18} {}", "", descriptor.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = r##"
id: ocean
name: Ocean
category: cool
version: "2"
scales:
  teal:
    steps:
      light: ["#f0fdfa"]
      dark: ["#042f2e"]
semanticTokens:
  light:
    background: "#ffffff"
    foreground: "#111111"
    primary: { $ref: scales.teal.steps.light.0 }
  dark:
    background: "#09090b"
    foreground: "#fafafa"
    primary: { $ref: scales.teal.steps.dark.0 }
"##;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("themeweave").chain(args.iter().copied())).unwrap()
    }

    fn generate_args(cli: Cli) -> GenerateArgs {
        match cli.command {
            Command::Generate(args) => args,
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_generate_defaults() {
        let args = generate_args(parse(&["generate", "ocean.yaml"]));
        assert_eq!(args.theme, PathBuf::from("ocean.yaml"));
        assert_eq!(args.format, "all");
        assert!(args.out.is_none());
        assert!(!args.force_v2);
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = parse(&[
            "-vv", "generate", "t.json", "--format", "figma", "--out", "dist", "--force-v2", "--mode",
            "dark",
        ]);
        assert_eq!(cli.verbose, 2);
        let args = generate_args(cli);
        assert_eq!(args.format, "figma");
        assert_eq!(args.out, Some(PathBuf::from("dist")));
        assert!(args.force_v2);
        assert_eq!(args.mode, Some(ModeArg::Dark));
    }

    #[test]
    fn test_parse_rejects_bad_mode() {
        let result = Cli::try_parse_from(["themeweave", "generate", "t.json", "--mode", "sepia"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_other_commands() {
        assert!(matches!(parse(&["formats"]).command, Command::Formats));
        assert!(matches!(
            parse(&["validate", "x.yml"]).command,
            Command::Validate { .. }
        ));
    }

    #[test]
    fn test_generate_all_writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("ocean.yaml");
        fs::write(&theme, THEME).unwrap();
        let out = dir.path().join("dist");

        let cli = parse(&[
            "generate",
            theme.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ]);
        assert!(run(cli).unwrap());

        for file in [
            "ocean.css",
            "ocean.scss",
            "ocean.tailwind.ts",
            "ocean.figma.json",
            "ocean.style-dictionary.json",
        ] {
            assert!(out.join(file).exists(), "{file} missing");
        }
        let css = fs::read_to_string(out.join("ocean.css")).unwrap();
        assert!(css.contains("--primary: #f0fdfa;"));
    }

    #[test]
    fn test_generate_single_format_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("ocean.yaml");
        fs::write(&theme, THEME).unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"tailwind": {"variant": "javascript"}}"#).unwrap();

        let cli = parse(&[
            "generate",
            theme.to_str().unwrap(),
            "--format",
            "tailwind",
            "--config",
            config.to_str().unwrap(),
            "--out",
            dir.path().to_str().unwrap(),
        ]);
        assert!(run(cli).unwrap());
        let js = fs::read_to_string(dir.path().join("ocean.tailwind.js")).unwrap();
        assert!(js.contains("module.exports = {"));
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("ocean.yaml");
        fs::write(&theme, THEME).unwrap();

        let cli = parse(&["generate", theme.to_str().unwrap(), "--format", "xml"]);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("style-dictionary"));
    }

    #[test]
    fn test_validate_reports_invalid_theme() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        fs::write(&good, THEME).unwrap();
        assert!(run(parse(&["validate", good.to_str().unwrap()])).unwrap());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"id": "Bad Id", "semanticTokens": {}}"#).unwrap();
        assert!(!run(parse(&["validate", bad.to_str().unwrap()])).unwrap());
    }

    #[test]
    fn test_missing_theme_file() {
        let cli = parse(&["validate", "/nonexistent/theme.yaml"]);
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("reading /nonexistent/theme.yaml"));
    }

    #[test]
    fn test_file_name_keeps_formats_apart() {
        assert_eq!(file_name("ocean", "css", "css"), "ocean.css");
        assert_eq!(file_name("ocean", "figma", "json"), "ocean.figma.json");
        assert_eq!(file_name("ocean", "tailwind", "ts"), "ocean.tailwind.ts");
    }

    #[test]
    fn test_file_stem_sanitizes_id() {
        let doc = ThemeDocument::from_json(r#"{"id": "../evil id"}"#).unwrap();
        assert_eq!(file_stem(&doc), "---evil-id");
        let anonymous = ThemeDocument::from_json("{}").unwrap();
        assert_eq!(file_stem(&anonymous), "theme");
    }
}
