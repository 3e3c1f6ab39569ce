use crate::component::{
    self, create_component, delete_component, regenerate, regenerate_all, run_build, save_schema,
    GenerationReport, Outcome, Removal,
};
use crate::config::FactoryConfig;
use crate::generator::cheatsheet;
use crate::hot_reload::watch_blocks;
use crate::linter::{self, LintIssue, LintSeverity};
use crate::logging::{init_logging, LogConfig};
use crate::registry::builtin_registry;
use crate::schema::load_schema;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::mpsc;

/// Command-line interface for block-factory
///
/// Generates WordPress block sources (block.json, edit.js, render.php) from a
/// field schema.
#[derive(Parser)]
#[command(name = "block-factory")]
#[command(about = "Schema-driven WordPress block generator", long_about = None)]
pub struct Cli {
    /// Project config file (default: ./block-factory.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding one sub-directory per component
    #[arg(long, global = true)]
    pub blocks_dir: Option<PathBuf>,

    /// Directory the build writes compiled components to
    #[arg(long, global = true)]
    pub build_dir: Option<PathBuf>,

    /// Block name namespace
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new component and generate its initial artifacts
    Create {
        /// Display name; the slug is derived from it
        name: String,

        /// Dashicon name (default from config)
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// Replace a component's schema and regenerate its artifacts
    Save {
        /// Component slug
        slug: String,

        /// Schema JSON file
        #[arg(short, long)]
        schema: PathBuf,
    },
    /// Regenerate artifacts from the persisted schema
    ///
    /// Without a slug, every component under the blocks directory is
    /// regenerated.
    Generate {
        /// Component slug
        slug: Option<String>,

        /// Regenerate even when outputs are newer than the schema
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Lint a component schema
    ///
    /// Checks keys (format, duplicates, companion collisions), field types,
    /// repeaters and template tokens.
    Lint {
        /// Component slug
        #[arg(required_unless_present = "schema", conflicts_with = "schema")]
        slug: Option<String>,

        /// Schema JSON file to lint instead of a component
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Delete a component and its build output
    Delete {
        /// Component slug
        slug: String,
    },
    /// Run the asset build command
    Build {
        /// Skip regenerating stale components first
        #[arg(long, default_value_t = false)]
        no_generate: bool,
    },
    /// Regenerate components whenever their schema changes
    Watch,
    /// Print a component's field reference
    Cheatsheet {
        /// Component slug
        slug: String,
    },
}

impl Cli {
    /// Load the project config and apply command-line overrides.
    pub fn factory_config(&self) -> anyhow::Result<FactoryConfig> {
        let mut config = FactoryConfig::load(self.config.as_deref())?;
        if let Some(dir) = &self.blocks_dir {
            config.blocks_dir = dir.clone();
        }
        if let Some(dir) = &self.build_dir {
            config.build_dir = dir.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        Ok(config)
    }
}

/// Parse arguments, install logging and run the command.
///
/// # Errors
///
/// Returns an error if logging cannot be installed, the config cannot be
/// loaded or the command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_env();
    init_logging(&if cli.verbose {
        log_config.verbose()
    } else {
        log_config
    })?;
    execute(cli)
}

/// Execute an already-parsed command.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.factory_config()?;
    match cli.command {
        Commands::Create { name, icon } => {
            let report = create_component(&config, &name, icon.as_deref())
                .with_context(|| format!("Failed to create component '{name}'"))?;
            print_report(&report);
            println!("Next: block-factory save {} --schema <file>", report.slug);
            fail_on_write_errors(&report)
        }
        Commands::Save { slug, schema } => {
            let raw = std::fs::read_to_string(&schema)
                .with_context(|| format!("Failed to read schema: {}", schema.display()))?;
            let report = save_schema(&config, &slug, &raw)
                .with_context(|| format!("Failed to save schema for '{slug}'"))?;
            print_report(&report);
            fail_on_write_errors(&report)
        }
        Commands::Generate { slug: Some(slug), force } => {
            let report = regenerate(&config, &slug, force)
                .with_context(|| format!("Failed to generate '{slug}'"))?;
            print_report(&report);
            fail_on_write_errors(&report)
        }
        Commands::Generate { slug: None, force } => {
            let results = regenerate_all(&config, force)?;
            if results.is_empty() {
                println!("No components found in {}", config.blocks_path().display());
            }
            let mut failures = 0;
            for (slug, result) in &results {
                match result {
                    Ok(report) => {
                        print_report(report);
                        if !report.failed.is_empty() {
                            failures += 1;
                        }
                    }
                    Err(e) => {
                        println!("❌ {slug}: {e}");
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} of {} component(s) failed", results.len());
            }
            Ok(())
        }
        Commands::Lint {
            slug,
            schema,
            fail_on_error,
            errors_only,
        } => {
            let path = match (schema, slug) {
                (Some(path), _) => path,
                (None, Some(slug)) => {
                    component::validate_slug(&slug)?;
                    component::ArtifactKind::Schema.path_in(&config.component_dir(&slug))
                }
                (None, None) => bail!("Provide a component slug or --schema"),
            };
            let mut issues = linter::lint_file(&path, builtin_registry())
                .with_context(|| format!("Failed to lint {}", path.display()))?;
            if errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            linter::print_lint_issues(&issues);
            if fail_on_error {
                fail_if_lint_errors(&issues)?;
            }
            Ok(())
        }
        Commands::Delete { slug } => {
            let report = delete_component(&config, &slug)?;
            for (label, (path, removal)) in [("source", &report.source), ("build", &report.build)] {
                match removal {
                    Removal::Removed => println!("🗑️  Removed {label}: {}", path.display()),
                    Removal::AlreadyAbsent => {
                        println!("   No {label} directory: {}", path.display())
                    }
                }
            }
            Ok(())
        }
        Commands::Build { no_generate } => {
            if !no_generate {
                for (slug, result) in regenerate_all(&config, false)? {
                    match result {
                        Ok(report) => print_report(&report),
                        Err(e) => println!("❌ {slug}: {e}"),
                    }
                }
            }
            let report = run_build(&config);
            print!("{}", report.stdout);
            eprint!("{}", report.stderr);
            if !report.succeeded() {
                bail!("Build failed: {}", report.command.join(" "));
            }
            println!("✅ Build finished");
            Ok(())
        }
        Commands::Watch => {
            let (tx, rx) = mpsc::channel();
            let _watcher = watch_blocks(config.clone(), move |slug, result| {
                // The receiver lives until the process exits.
                let _ = tx.send((slug.to_string(), result));
            })
            .context("Failed to watch blocks directory")?;
            println!("👀 Watching {}", config.blocks_path().display());
            for (slug, result) in rx {
                match result {
                    Ok(report) => print_report(&report),
                    Err(e) => println!("❌ {slug}: {e}"),
                }
            }
            Ok(())
        }
        Commands::Cheatsheet { slug } => {
            component::validate_slug(&slug)?;
            let path = component::ArtifactKind::Schema.path_in(&config.component_dir(&slug));
            let schema = load_schema(&path)?;
            print!("{}", cheatsheet::render(&slug, &schema.fields)?);
            Ok(())
        }
    }
}

fn print_report(report: &GenerationReport) {
    let icon = match report.outcome {
        Outcome::FullyGenerated => "✅",
        Outcome::PartiallyGenerated => "⚠️ ",
        Outcome::Skipped => "⏭️ ",
    };
    println!("{icon} {}: {:?}", report.slug, report.outcome);
    for (kind, path) in &report.written {
        println!("   wrote {kind}: {}", path.display());
    }
    for failure in &report.failed {
        println!("   failed {}: {}", failure.artifact, failure.message);
    }
    for warning in &report.warnings {
        println!("   warning: {warning}");
    }
}

fn fail_on_write_errors(report: &GenerationReport) -> anyhow::Result<()> {
    if report.failed.is_empty() {
        return Ok(());
    }
    bail!(
        "{} artifact(s) of '{}' could not be written",
        report.failed.len(),
        report.slug
    )
}

fn fail_if_lint_errors(issues: &[LintIssue]) -> anyhow::Result<()> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if errors > 0 {
        bail!("Schema has {errors} lint error(s)");
    }
    Ok(())
}
