// PlanGrid CLI - headless planning grid operations

mod exit_codes;
mod grid;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use plangrid_config::settings::Settings;
use plangrid_engine::history::SaveClient;
use plangrid_engine::row::{format_grouped, month_label};
use plangrid_engine::session::{EditStatus, PlanSession, SaveError, Scenario};
use plangrid_engine::validation::CellBounds;
use plangrid_io::document::PlanDocument;
use plangrid_io::seed;

use exit_codes::{EXIT_ERROR, EXIT_READ_ONLY, EXIT_SUCCESS, EXIT_USAGE, EXIT_VALIDATION};

#[derive(Parser)]
#[command(name = "pgrid")]
#[command(about = "Hierarchical planning grid (CLI mode, headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demo plan document
    Init {
        /// Plan document to create
        plan: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Render the grid with per-row totals
    Show {
        /// Plan document
        plan: PathBuf,
    },

    /// Edit one cell and roll the change up to every ancestor
    #[command(after_help = "\
Examples:
  pgrid edit plan.json --row r3 --month Jan --value 6000
  pgrid edit plan.json --row r7 --month 11 --value 1550.5
  pgrid edit plan.json --row r4 --month Feb --value ''")]
    Edit {
        /// Plan document
        plan: PathBuf,

        /// Row id (e.g. r3)
        #[arg(long)]
        row: String,

        /// Month index 0-11 or label Jan..Dec
        #[arg(long)]
        month: String,

        /// Raw cell text; goes through the numeric input grammar
        #[arg(long)]
        value: String,
    },

    /// List out-of-range cells
    Validate {
        /// Plan document
        plan: PathBuf,
    },

    /// Record a save snapshot (refused while validation errors exist)
    Save {
        /// Plan document
        plan: PathBuf,

        /// Snapshot author (falls back to save.defaultAuthor)
        #[arg(long)]
        author: Option<String>,

        /// Optional snapshot note
        #[arg(long)]
        note: Option<String>,
    },

    /// List save snapshots, newest first
    History {
        /// Plan document
        plan: PathBuf,
    },

    /// Show or switch the budget/actuals scenario
    Scenario {
        /// Plan document
        plan: PathBuf,

        /// New scenario: budget or actuals (omit to show the current one)
        scenario: Option<String>,
    },

    /// Export the grid as CSV
    Export {
        /// Plan document
        plan: PathBuf,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::load();

    let code = match cli.command {
        Commands::Init { plan, force } => cmd_init(&plan, force),
        Commands::Show { plan } => cmd_show(&plan, &settings),
        Commands::Edit {
            plan,
            row,
            month,
            value,
        } => cmd_edit(&plan, &settings, &row, &month, &value),
        Commands::Validate { plan } => cmd_validate(&plan, &settings),
        Commands::Save { plan, author, note } => cmd_save(&plan, &settings, author, note),
        Commands::History { plan } => cmd_history(&plan),
        Commands::Scenario { plan, scenario } => cmd_scenario(&plan, scenario.as_deref()),
        Commands::Export { plan, output } => cmd_export(&plan, &output),
    };
    ExitCode::from(code)
}

fn bounds_from(settings: &Settings) -> CellBounds {
    CellBounds::with_max(settings.max_cell_value)
}

fn open_session(
    document: &PlanDocument,
    settings: &Settings,
) -> Result<PlanSession, String> {
    document
        .session()
        .map(|session| session.with_bounds(bounds_from(settings)))
        .map_err(|e| e.to_string())
}

fn cmd_init(path: &Path, force: bool) -> u8 {
    if path.exists() && !force {
        eprintln!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
        return EXIT_USAGE;
    }
    match seed::demo_document().store(path) {
        Ok(()) => {
            println!("wrote demo plan to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_show(path: &Path, settings: &Settings) -> u8 {
    let document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let tree = match document.tree() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    let context = &document.context;
    let mut status = format!(
        "{} {} • {}",
        context.year, context.scenario, context.market
    );
    if context.scenario.is_read_only() {
        status.push_str("  [read only]");
    }
    let bounds = bounds_from(settings);
    let errors = bounds.error_count(&tree);
    if errors > 0 {
        status.push_str(&format!(
            "  [{} error{}]",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }
    println!("{}", status);
    println!();
    print!("{}", grid::render(&tree, &bounds, settings.group_digits));
    EXIT_SUCCESS
}

fn cmd_edit(path: &Path, settings: &Settings, row: &str, month: &str, value: &str) -> u8 {
    let Some(month) = grid::parse_month(month) else {
        eprintln!("'{}' is not a month (use 0-11 or Jan..Dec)", month);
        return EXIT_USAGE;
    };
    let mut document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let mut session = match open_session(&document, settings) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    match session.edit_cell(row, month, value) {
        EditStatus::Applied { report } => {
            println!("{}", report.log_line());
            for cell in &report.cells_changed {
                let account = session
                    .tree()
                    .row(cell.row)
                    .map(|r| r.account.as_str())
                    .unwrap_or("?");
                println!(
                    "  {} {} = {}",
                    account,
                    month_label(cell.month),
                    format_grouped(session.tree().value(cell.row, cell.month))
                );
            }
            let errors = session.error_count();
            if errors > 0 {
                eprintln!(
                    "warning: {} cell{} out of range",
                    errors,
                    if errors == 1 { "" } else { "s" }
                );
            }
            document.absorb(&session);
            match document.store(path) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("error: {}", e);
                    EXIT_ERROR
                }
            }
        }
        EditStatus::BufferOnly => {
            eprintln!("'{}' is not a complete number; nothing committed", value);
            EXIT_USAGE
        }
        EditStatus::RejectedInput => {
            eprintln!("'{}' is not numeric input; edit dropped", value);
            EXIT_USAGE
        }
        EditStatus::ReadOnly => {
            eprintln!("scenario is read-only; switch to budget to edit");
            EXIT_READ_ONLY
        }
        EditStatus::AggregateRow => {
            eprintln!("'{}' is an aggregate row, computed from its children", row);
            EXIT_USAGE
        }
        EditStatus::UnknownRow => {
            eprintln!("no row with id '{}'", row);
            EXIT_USAGE
        }
    }
}

fn cmd_validate(path: &Path, settings: &Settings) -> u8 {
    let document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let tree = match document.tree() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    let bounds = bounds_from(settings);
    let invalid = bounds.invalid_cells(&tree);
    if invalid.is_empty() {
        println!("all cells within bounds");
        return EXIT_SUCCESS;
    }
    for cell in &invalid {
        let account = tree.row(cell.row).map(|r| r.account.as_str()).unwrap_or("?");
        println!(
            "{} {} = {} (allowed {} to {})",
            account,
            month_label(cell.month),
            format_grouped(tree.value(cell.row, cell.month)),
            format_grouped(bounds.min),
            format_grouped(bounds.max)
        );
    }
    println!(
        "{} error{} found",
        invalid.len(),
        if invalid.len() == 1 { "" } else { "s" }
    );
    EXIT_VALIDATION
}

fn cmd_save(path: &Path, settings: &Settings, author: Option<String>, note: Option<String>) -> u8 {
    let author = match author {
        Some(author) => author,
        None if !settings.default_author.is_empty() => settings.default_author.clone(),
        None => {
            eprintln!("--author required (or set save.defaultAuthor in settings)");
            return EXIT_USAGE;
        }
    };

    let mut document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let mut session = match open_session(&document, settings) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    let client = SaveClient::new(Duration::from_millis(settings.save_latency_ms));
    println!("saving…");
    match session.save_blocking(author, note, &client) {
        Ok(entry) => {
            println!(
                "saved {} (total revenue {})",
                entry.id,
                format_grouped(entry.total_revenue)
            );
            document.absorb(&session);
            match document.store(path) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("error: {}", e);
                    EXIT_ERROR
                }
            }
        }
        Err(e @ SaveError::ValidationErrors(_)) => {
            eprintln!("{}", e);
            EXIT_VALIDATION
        }
        Err(e @ SaveError::ReadOnly) => {
            eprintln!("{}", e);
            EXIT_READ_ONLY
        }
    }
}

fn cmd_history(path: &Path) -> u8 {
    let document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    if document.history.is_empty() {
        println!("no history");
        return EXIT_SUCCESS;
    }
    for (index, entry) in document.history.entries().iter().enumerate() {
        let note = entry.note.as_deref().unwrap_or("Save Point");
        let marker = if index == 0 { "  (current)" } else { "" };
        println!(
            "{}  {:<20}  {:>14}  {}{}",
            entry.timestamp.format("%b %d %H:%M"),
            entry.author,
            format_grouped(entry.total_revenue),
            note,
            marker
        );
    }
    EXIT_SUCCESS
}

fn cmd_scenario(path: &Path, scenario: Option<&str>) -> u8 {
    let mut document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    let Some(raw) = scenario else {
        println!("{}", document.context.scenario);
        return EXIT_SUCCESS;
    };
    let scenario = match raw.to_ascii_lowercase().as_str() {
        "budget" => Scenario::Budget,
        "actuals" => Scenario::Actuals,
        _ => {
            eprintln!("'{}' is not a scenario (budget or actuals)", raw);
            return EXIT_USAGE;
        }
    };
    document.context.scenario = scenario;
    match document.store(path) {
        Ok(()) => {
            println!("scenario set to {}", scenario);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_export(path: &Path, output: &Path) -> u8 {
    let document = match PlanDocument::load(path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let tree = match document.tree() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    match plangrid_io::csv::export(&tree, output) {
        Ok(()) => {
            println!("exported {} rows to {}", tree.len(), output.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}
