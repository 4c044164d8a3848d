use anyhow::{Context, Result};
use batch_renamer_core::{
    app_paths, apply_filter, apply_plan, generate_plan, load_catalog, load_config, save_config,
    AffixMode, AppConfig, EngineError, ExtensionMode, FilterSpec, RenamePlan, RenameRule,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "batch-renamer-cli")]
#[command(about = "Batch rename the files of one folder with prefix, suffix and extension rules")]
struct Cli {
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[arg(long, short, global = true, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    List(ListArgs),
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Init,
}

#[derive(Debug, Args)]
struct ListArgs {
    dir: PathBuf,
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Debug, Args)]
struct RenameArgs {
    dir: PathBuf,
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    prefix_mode: Option<AffixMode>,
    #[arg(long)]
    prefix: Option<String>,
    #[arg(long)]
    suffix_mode: Option<AffixMode>,
    #[arg(long)]
    suffix: Option<String>,
    #[arg(long)]
    ext_mode: Option<ExtensionMode>,
    #[arg(long)]
    ext: Option<String>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;
    setup_logging(cli.verbose || config.verbose, cli.quiet);

    match cli.command {
        Commands::List(args) => cmd_list(args, &config),
        Commands::Rename(args) => cmd_rename(args, &config),
        Commands::Config(config_args) => match config_args.action {
            ConfigAction::Show => cmd_config_show(&config),
            ConfigAction::Init => cmd_config_init(&config),
        },
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .init();
}

fn cmd_list(args: ListArgs, config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(&args.dir)?;
    println!("Loaded {} files", catalog.len());
    if catalog.skipped() > 0 {
        println!("Skipped {} unreadable entries", catalog.skipped());
    }

    let raw_filter = args.filter.as_deref().unwrap_or(&config.filter);
    let filtered = apply_filter(&catalog, &FilterSpec::from(raw_filter));
    if !raw_filter.trim().is_empty() {
        println!("Filtered: {} files", filtered.len());
    }
    for file in filtered.files() {
        println!("{}", file.name);
    }
    Ok(())
}

fn cmd_rename(args: RenameArgs, config: &AppConfig) -> Result<()> {
    let rule = merge_rule(&config.rule, &args);
    let raw_filter = args.filter.clone().unwrap_or_else(|| config.filter.clone());

    let catalog = load_catalog(&args.dir)?;
    let filtered = apply_filter(&catalog, &FilterSpec::from(raw_filter.as_str()));
    let plan = generate_plan(&catalog, &filtered, &rule)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if !args.apply {
        eprintln!("dry run: no files were changed. Pass --apply to rename.");
        return Ok(());
    }

    let report = apply_plan(&catalog, &plan)?;
    let renamed = report.outcome.success_count;
    if let Some(err) = report.outcome.error {
        return Err(batch_error(err, renamed));
    }
    info!(renamed, "rename applied");
    eprintln!(
        "Successfully renamed {} files (unchanged {})",
        renamed, report.outcome.skipped_count
    );
    Ok(())
}

fn batch_error(err: EngineError, renamed: usize) -> anyhow::Error {
    let context = match err {
        EngineError::DirectoryRead { .. } => {
            format!("renamed {renamed} file(s), but the folder could not be read back afterwards")
        }
        _ => format!("renamed {renamed} file(s) before stopping; the folder is partially renamed"),
    };
    anyhow::Error::new(err).context(context)
}

fn merge_rule(base: &RenameRule, args: &RenameArgs) -> RenameRule {
    let mut rule = base.clone();
    if let Some(mode) = args.prefix_mode {
        rule.prefix.mode = mode;
    }
    if let Some(value) = &args.prefix {
        rule.prefix.value = value.clone();
    }
    if let Some(mode) = args.suffix_mode {
        rule.suffix.mode = mode;
    }
    if let Some(value) = &args.suffix {
        rule.suffix.value = value.clone();
    }
    if let Some(mode) = args.ext_mode {
        rule.extension.mode = mode;
    }
    if let Some(value) = &args.ext {
        rule.extension.value = value.clone();
    }
    rule
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn cmd_config_init(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    save_config(config)
        .with_context(|| format!("could not initialize {}", paths.config_path.display()))?;
    println!("wrote {}", paths.config_path.display());
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    let rule = plan.rule();
    println!(
        "rule: prefix={}({}) suffix={}({}) extension={}({})",
        rule.prefix.mode,
        rule.prefix.value,
        rule.suffix.mode,
        rule.suffix.value,
        rule.extension.mode,
        rule.extension.value
    );
    println!("old -> new");
    for candidate in plan.candidates() {
        let marker = if candidate.changed { "" } else { " (unchanged)" };
        println!("{} -> {}{}", candidate.old_name, candidate.new_name, marker);
    }

    println!(
        "\nsummary: planned={} unchanged={}",
        plan.stats().planned,
        plan.stats().unchanged
    );
}

#[cfg(test)]
mod tests {
    use super::{batch_error, cmd_rename, merge_rule, Cli, Commands};
    use batch_renamer_core::{
        AffixMode, AffixRule, AppConfig, EngineError, ExtensionMode, RenameRule,
    };
    use clap::Parser;
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::tempdir;

    fn files_in(dir: &Path) -> HashSet<String> {
        fs::read_dir(dir)
            .expect("read dir")
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rename_args(argv: &[&str]) -> super::RenameArgs {
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        match cli.command {
            Commands::Rename(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_rename_modes_case_insensitively() {
        let args = rename_args(&[
            "batch-renamer-cli",
            "rename",
            "/tmp/photos",
            "--prefix-mode",
            "Add",
            "--prefix",
            "new_",
            "--ext-mode",
            "change",
            "--ext",
            "txt",
        ]);
        assert_eq!(args.prefix_mode, Some(AffixMode::Add));
        assert_eq!(args.ext_mode, Some(ExtensionMode::Change));
        assert!(!args.apply);
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = Cli::try_parse_from([
            "batch-renamer-cli",
            "rename",
            "/tmp/photos",
            "--suffix-mode",
            "change",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_config_rule() {
        let base = RenameRule {
            prefix: AffixRule::add("cfg_"),
            suffix: AffixRule::add("_cfg"),
            ..RenameRule::default()
        };
        let args = rename_args(&[
            "batch-renamer-cli",
            "rename",
            "/tmp/photos",
            "--prefix-mode",
            "remove",
        ]);

        let rule = merge_rule(&base, &args);
        assert_eq!(rule.prefix, AffixRule::remove("cfg_"));
        assert_eq!(rule.suffix, AffixRule::add("_cfg"));
        assert_eq!(rule.extension.mode, ExtensionMode::None);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["batch-renamer-cli", "-v", "-q", "config", "show"]);
        assert!(result.is_err());
    }

    #[test]
    fn rename_with_apply_renames_filtered_files() {
        let temp = tempdir().expect("tempdir");
        for name in ["a.txt", "b.jpg", "c.TXT"] {
            fs::write(temp.path().join(name), name).expect("write fixture");
        }
        let dir = temp.path().to_string_lossy().to_string();
        let args = rename_args(&[
            "batch-renamer-cli",
            "rename",
            &dir,
            "--filter",
            ".txt",
            "--prefix-mode",
            "add",
            "--prefix",
            "new_",
            "--apply",
        ]);

        cmd_rename(args, &AppConfig::default()).expect("rename should succeed");
        assert_eq!(
            files_in(temp.path()),
            set(&["new_a.txt", "b.jpg", "new_c.TXT"])
        );
    }

    #[test]
    fn rename_without_apply_leaves_folder_untouched() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("a.txt"), b"a").expect("write a");
        let dir = temp.path().to_string_lossy().to_string();
        let args = rename_args(&[
            "batch-renamer-cli",
            "rename",
            &dir,
            "--prefix-mode",
            "add",
            "--prefix",
            "new_",
        ]);

        cmd_rename(args, &AppConfig::default()).expect("dry run should succeed");
        assert_eq!(files_in(temp.path()), set(&["a.txt"]));
    }

    #[test]
    fn rename_failure_reports_partial_progress() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("a_old.txt"), b"old").expect("write old");
        fs::write(temp.path().join("a.txt"), b"current").expect("write current");
        let dir = temp.path().to_string_lossy().to_string();
        let args = rename_args(&[
            "batch-renamer-cli",
            "rename",
            &dir,
            "--suffix-mode",
            "remove",
            "--suffix",
            "_old",
            "--apply",
        ]);

        let err = cmd_rename(args, &AppConfig::default()).expect_err("collision should fail");
        assert!(err.to_string().contains("partially renamed"));
        assert_eq!(
            fs::read_to_string(temp.path().join("a.txt")).expect("read a"),
            "current"
        );
    }

    #[test]
    fn reload_failure_is_not_reported_as_partial_rename() {
        let err = EngineError::DirectoryRead {
            path: "/gone".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let message = batch_error(err, 2).to_string();
        assert!(message.contains("renamed 2 file(s)"));
        assert!(message.contains("could not be read back"));
        assert!(!message.contains("partially renamed"));

        let err = EngineError::Rename {
            from: "b.txt".to_string(),
            to: "new_b.txt".to_string(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        };
        let message = batch_error(err, 1).to_string();
        assert!(message.contains("renamed 1 file(s) before stopping"));
    }
}
