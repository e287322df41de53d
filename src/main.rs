use clap::{Parser, Subcommand};
use hook_indexer::categories::Registry;
use hook_indexer::config::{self, CONFIG_FILE, Project, Sorting};
use hook_indexer::sort::Field;
use hook_indexer::{output, pipeline, rebuild, scan};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Grouping and ordering overrides shared by the index and view commands.
#[derive(clap::Args, Clone)]
struct SortArgs {
    /// Regenerate even when the output is newer than every file in the base
    #[arg(short, long)]
    rebuild: bool,

    /// Field to group by (hook, title, subtitle, fulltitle, level, tag, category, author, date, filename)
    #[arg(long, value_name = "FIELD")]
    group_by: Option<String>,

    /// Field to sort by inside each group
    #[arg(long, value_name = "FIELD")]
    sort_by: Option<String>,

    /// Reverse both group and item order
    #[arg(long)]
    reverse: bool,
}

impl SortArgs {
    /// An explicit override changes the output, so it always rewrites.
    fn force(&self) -> bool {
        self.rebuild || self.group_by.is_some() || self.sort_by.is_some() || self.reverse
    }

    fn apply(&self, sorting: &mut Sorting) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(field) = &self.group_by {
            sorting.group_by = Field::from_str(field)?;
        }
        if let Some(field) = &self.sort_by {
            sorting.sort_by = Field::from_str(field)?;
        }
        if self.reverse {
            sorting.reverse = true;
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(name = "hook-indexer")]
#[command(about = "Title metadata, boards and indexes for a directory of exercises")]
#[command(long_about = "\
Title metadata, boards and indexes for a directory of exercises

Every folder under the base directory is a hook. Its Readme starts with a
title line carrying the metadata:

  ## Busca binaria cat:vetor #recursao date:2021-03-02 sub: versao iterativa
  │  │             │         │         │               └ subtitle (rest of line)
  │  │             │         │         └ date
  │  │             │         └ tag
  │  │             └ category
  │  └ title
  └ level

Layout:

  indexer.toml                 # Project config (optional)
  base/
  ├── .indexer.toml            # Base-level overrides (optional)
  ├── .categories.csv          # Category labels and counts
  ├── 000/
  │   ├── Readme.md            # Title line + body
  │   └── img/capa.png         # Cover (first image in the body)
  └── __drafts/                # Hidden: names starting with . or __

Run 'hook-indexer gen-config' to generate a documented indexer.toml.")]
#[command(version)]
struct Cli {
    /// Project config file; relative paths in it resolve against its directory
    #[arg(long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Base directory, overriding the configured one
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every hook with its parsed title fields
    Scan {
        /// Print the items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the board, one editable title per line
    Board {
        /// Board file, overriding the configured one
        #[arg(long)]
        file: Option<PathBuf>,
        /// Apply titles edited in the board back to the Readmes first
        #[arg(long)]
        set: bool,
        /// Comma-separated line order, e.g. "tag,title"
        #[arg(long, value_name = "FIELDS")]
        sort_by: Option<String>,
    },
    /// Write the markdown index (and the summary when configured)
    Index(SortArgs),
    /// Write the markdown table of covers
    View(SortArgs),
    /// Write one link file per hook
    Links,
    /// Recount the category registry
    Categories,
    /// Run everything: board edits, categories, index, summary, view, links
    Build {
        /// Regenerate even when outputs are up to date
        #[arg(short, long)]
        rebuild: bool,
    },
    /// Parse the base and report problems without writing anything
    Check,
    /// Exit 0 when DERIVED is missing or older than anything under SOURCE, 1 otherwise
    NeedsRebuild { source: PathBuf, derived: PathBuf },
    /// Print a stock indexer.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            println!("  error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, or only errors with `--quiet`.
fn init_logging(quiet: bool) {
    let level = if quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_project(cli: &Cli) -> Result<Project, config::ConfigError> {
    config::load_config(&cli.config, cli.base.as_deref())
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Scan { json } => {
            let project = load_project(&cli)?;
            let items = pipeline::load(&project)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                output::print_scan_output(&items, &project.root);
            }
        }
        Command::Board { file, set, sort_by } => {
            let mut project = load_project(&cli)?;
            if let Some(list) = sort_by {
                project.config.board.sort_by = Field::parse_list(list)?;
            }
            let mut items = pipeline::load(&project)?;
            let (updated, outcome) = pipeline::board(&project, &mut items, file.as_deref(), *set)?;
            for line in output::format_updates(&items, &updated) {
                println!("{}", line);
            }
            output::print_outcomes(&[outcome], &project.root);
        }
        Command::Index(args) => {
            let mut project = load_project(&cli)?;
            args.apply(&mut project.config.index.sorting)?;
            args.apply(&mut project.config.summary.sorting)?;
            let items = pipeline::load(&project)?;
            let registry = counted_registry(&project, &items)?;
            let outcomes = pipeline::index(&project, &items, Some(&registry), args.force())?;
            output::print_outcomes(&outcomes, &project.root);
        }
        Command::View(args) => {
            let mut project = load_project(&cli)?;
            args.apply(&mut project.config.view.sorting)?;
            let items = pipeline::load(&project)?;
            let registry = counted_registry(&project, &items)?;
            let outcome = pipeline::view(&project, &items, Some(&registry), args.force())?;
            output::print_outcomes(&[outcome], &project.root);
        }
        Command::Links => {
            let project = load_project(&cli)?;
            let items = pipeline::load(&project)?;
            output::print_outcomes(&[pipeline::links(&project, &items)?], &project.root);
        }
        Command::Categories => {
            let project = load_project(&cli)?;
            let items = pipeline::load(&project)?;
            let registry = pipeline::categories(&project, &items)?;
            output::print_categories(&registry);
        }
        Command::Build { rebuild } => {
            let project = load_project(&cli)?;
            println!("==> Building {}", project.base.display());
            let mut items = pipeline::load(&project)?;
            let report = pipeline::build(&project, &mut items, *rebuild)?;
            output::print_build_output(&report, &items, &project.root);
        }
        Command::Check => {
            let project = load_project(&cli)?;
            println!("==> Checking {}", project.base.display());
            let items = scan::read_items(&project.base, &project.config.readme, &project.title_format())?;
            let missing = scan::check_covers(&items);
            output::print_check_output(&items, &missing);
        }
        Command::NeedsRebuild { source, derived } => {
            return Ok(if rebuild::needs_rebuild(source, derived)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Registry with counts for the current items, not written back.
fn counted_registry(
    project: &Project,
    items: &[hook_indexer::item::Item],
) -> Result<Registry, Box<dyn std::error::Error>> {
    let mut registry = Registry::load(&project.categories_path())?;
    registry.refresh(items);
    Ok(registry)
}
