use backlens_core::analyze::{Analysis, AnalysisOptions, execute_analysis};
use backlens_core::config::{Config, expand_path};
use backlens_core::filter::{FilterCriteria, LinkType};
use backlens_core::history::{latest_snapshot, list_domains, list_snapshots, snapshot_path};
use backlens_core::host::clean_domain;
use backlens_core::report::{
    ReportFormat, ReportOptions, gather_report_data, render_report, save_report,
};
use backlens_core::snapshot::Snapshot;
use backlens_core::sort::{
    AnchorColumn, BacklinkColumn, DomainColumn, PageColumn, SortDirection, SortState,
};
use clap::ArgMatches;
use colored::Colorize;
use pager::Pager;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

// Helper functions shared by the handlers

/// The configuration directory from `--config`, tilde-expanded.
pub fn resolve_config_dir(dir: &str) -> PathBuf {
    expand_path(dir)
}

fn parse_sort<C>(args: &ArgMatches, name: &str, direction: SortDirection) -> Result<Option<SortState<C>>, String>
where
    C: FromStr + Copy + PartialEq,
    C::Err: Display,
{
    match args.get_one::<String>(name) {
        Some(value) => value
            .parse::<C>()
            .map(|column| Some(SortState::new(column, direction)))
            .map_err(|e| e.to_string()),
        None => Ok(None),
    }
}

/// Turn the shared report flags into filter criteria and table orderings.
pub fn build_report_options(args: &ArgMatches) -> Result<ReportOptions, String> {
    let link_type = match args.get_one::<String>("link-type") {
        Some(value) => value.parse::<LinkType>()?,
        None => LinkType::All,
    };

    let criteria = FilterCriteria {
        link_type,
        search_text: args
            .get_one::<String>("search")
            .cloned()
            .unwrap_or_default(),
        hide_multiple_per_domain: args.get_flag("hide-multiple-per-domain"),
    };

    let direction = if args.get_flag("ascending") {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };

    Ok(ReportOptions {
        criteria,
        top: args.get_one::<usize>("top").copied(),
        anchor_sort: parse_sort::<AnchorColumn>(args, "sort-anchors", direction)?.unwrap_or_default(),
        domain_sort: parse_sort::<DomainColumn>(args, "sort-domains", direction)?.unwrap_or_default(),
        page_sort: parse_sort::<PageColumn>(args, "sort-pages", direction)?.unwrap_or_default(),
        backlink_sort: parse_sort::<BacklinkColumn>(args, "sort-backlinks", direction)?,
    })
}

pub fn report_format(args: &ArgMatches) -> ReportFormat {
    args.get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text)
}

/// Load a saved analysis from a snapshot file, or from `DOMAIN[/FILENAME]`
/// in the data directory (the newest snapshot when no filename is given).
pub fn load_snapshot_source(source: &str, data_dir: &Path) -> backlens_core::Result<Analysis> {
    let direct = Path::new(source);
    let (path, fallback_domain) = if direct.is_file() {
        (direct.to_path_buf(), String::new())
    } else {
        match source.split_once('/') {
            Some((domain, filename)) => (snapshot_path(data_dir, domain, filename)?, domain.to_string()),
            None => (latest_snapshot(data_dir, source)?, source.to_string()),
        }
    };

    debug!("Loading snapshot {}", path.display());
    let snapshot = Snapshot::load(&path)?;
    Ok(Analysis::from_snapshot(snapshot, &fallback_domain))
}

fn fail(message: impl Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    std::process::exit(1);
}

fn load_config(config_dir: &Path) -> Config {
    Config::load(config_dir).unwrap_or_else(|e| fail(format!("Failed to load configuration: {}", e)))
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    let mut response = String::new();
    if io::stdout().flush().is_err() || io::stdin().read_line(&mut response).is_err() {
        return String::new();
    }
    response.trim().to_string()
}

fn print_warnings(analysis: &Analysis) {
    for warning in &analysis.warnings {
        eprintln!("{} {}", "⚠".yellow().bold(), warning.yellow());
    }
}

/// Render the report selected by `args` to the screen or to `--output`.
fn emit_report(analysis: &Analysis, args: &ArgMatches) {
    let options = build_report_options(args).unwrap_or_else(|e| fail(e));
    let format = report_format(args);

    let data = gather_report_data(analysis, &options);
    let report = render_report(&data, format).unwrap_or_else(|e| fail(format!("Failed to render report: {}", e)));

    if let Some(output) = args.get_one::<PathBuf>("output") {
        if let Err(e) = save_report(&report, output) {
            fail(format!("Failed to write {}: {}", output.display(), e));
        }
        println!(
            "{} Report saved to {}",
            "✓".green().bold(),
            output.display().to_string().bright_white()
        );
        return;
    }

    // machine formats are left unpaged so they can be piped
    if matches!(format, ReportFormat::Text | ReportFormat::Markdown) {
        Pager::with_pager("less -R").setup();
    } else {
        print_warnings(analysis);
    }
    print!("{}", report);
}

fn open_dashboard(analysis: Analysis) {
    if let Err(e) = backlens_tui::run(analysis) {
        fail(format!("Error running TUI: {}", e));
    }
}

pub fn handle_init(args: &ArgMatches, config_dir: &Path) {
    print_divider();
    println!("{}", "  BACKLENS INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let target = args
        .get_one::<String>("PATH")
        .map(|p| expand_path(p))
        .unwrap_or_else(|| config_dir.to_path_buf());
    let force = args.get_flag("force");

    println!(
        "{} Target: {}",
        "→".blue(),
        target.display().to_string().bright_white()
    );
    println!();

    let config_path = target.join(backlens_core::config::CONFIG_FILE);
    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("A configuration already exists:");
        println!(
            "  {} {}",
            "•".yellow(),
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Do you want to overwrite it? [y/N]:").to_lowercase();
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return;
        }
    }

    // Keep settings from an existing file, only the key is replaced
    let mut config = if config_path.exists() {
        load_config(&target)
    } else {
        Config::default()
    };

    match args.get_one::<String>("api-key") {
        Some(key) => config.api_key = key.trim().to_string(),
        None if !force => {
            let key = print_prompt("API key (leave blank to keep the current one):");
            println!();
            if !key.is_empty() {
                config.api_key = key;
            }
        }
        None => {}
    }

    let saved = config
        .save(&target)
        .unwrap_or_else(|e| fail(format!("Failed to write configuration: {}", e)));

    let data_dir = config.data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        fail(format!("Failed to create {}: {}", data_dir.display(), e));
    }

    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Config: {}",
        "✓".green().bold(),
        saved.display().to_string().bright_white()
    );
    println!(
        "{} Data directory: {}",
        "✓".green().bold(),
        data_dir.display().to_string().bright_white()
    );
    if config.has_api_key() {
        println!("{} API key configured", "✓".green().bold());
    } else {
        println!(
            "{} No API key yet, set one with {} or {}",
            "ℹ".blue(),
            "--api-key".cyan(),
            backlens_core::config::API_KEY_ENV.cyan()
        );
    }
    println!();
}

pub async fn handle_analyze(args: &ArgMatches, config_dir: &Path, quiet: bool) {
    let config = load_config(config_dir);
    let client = config.client().unwrap_or_else(|e| fail(e));

    let input = args.get_one::<String>("domain").map(String::as_str).unwrap_or_default();
    let domain = clean_domain(input);
    if domain.is_empty() {
        fail(format!("'{}' is not a domain", input));
    }

    // Validate report flags before spending API credits
    if let Err(e) = build_report_options(args) {
        fail(e);
    }

    let options = AnalysisOptions {
        domain,
        one_per_domain: args.get_flag("one-per-domain"),
        show_progress: !quiet,
    };

    let analysis = match execute_analysis(&client, options).await {
        Ok(analysis) => analysis,
        Err(e) => fail(format!("Analysis failed: {}", e)),
    };

    if !quiet {
        println!(
            "{} Analysed {} ({} backlinks)\n",
            "✓".green().bold(),
            analysis.domain.bright_white(),
            analysis.backlinks.len().to_string().cyan()
        );
    }

    if args.get_flag("ui") {
        open_dashboard(analysis);
    } else {
        emit_report(&analysis, args);
    }
}

pub fn handle_load(args: &ArgMatches, config_dir: &Path) {
    let config = load_config(config_dir);
    let source = args.get_one::<String>("SNAPSHOT").map(String::as_str).unwrap_or_default();

    let analysis = load_snapshot_source(source, &config.data_dir())
        .unwrap_or_else(|e| fail(format!("Failed to load {}: {}", source, e)));

    if args.get_flag("ui") {
        open_dashboard(analysis);
    } else {
        emit_report(&analysis, args);
    }
}

pub fn handle_ui(args: &ArgMatches, config_dir: &Path) {
    let config = load_config(config_dir);
    let source = args.get_one::<String>("snapshot").map(String::as_str).unwrap_or_default();

    let analysis = load_snapshot_source(source, &config.data_dir())
        .unwrap_or_else(|e| fail(format!("Failed to load {}: {}", source, e)));
    open_dashboard(analysis);
}

pub fn handle_history(args: &ArgMatches, config_dir: &Path) {
    let data_dir = match args.get_one::<String>("data-dir") {
        Some(dir) => expand_path(dir),
        None => load_config(config_dir).data_dir(),
    };

    match args.get_one::<String>("DOMAIN") {
        Some(domain) => {
            let domain = clean_domain(domain);
            let entries = list_snapshots(&data_dir, &domain).unwrap_or_else(|e| fail(e));
            if entries.is_empty() {
                println!("{} No saved analyses for {}", "ℹ".blue(), domain.bright_white());
                return;
            }

            println!("{}", format!("Analyses of {}", domain).bright_white().bold());
            println!("{}", "─".repeat(60).bright_black());
            for entry in entries {
                println!(
                    "  {}  {}",
                    entry.date.cyan(),
                    format!("{}/{}", domain, entry.filename).bright_white()
                );
            }
        }
        None => {
            let domains = list_domains(&data_dir).unwrap_or_else(|e| fail(e));
            if domains.is_empty() {
                println!(
                    "{} No saved analyses in {}",
                    "ℹ".blue(),
                    data_dir.display().to_string().bright_white()
                );
                return;
            }

            println!("{}", "Analysed domains".bright_white().bold());
            println!("{}", "─".repeat(60).bright_black());
            for summary in domains {
                println!(
                    "  {} {} analyses  last {}",
                    format!("{:<40}", summary.domain).bright_white(),
                    format!("{:>4}", summary.analyses_count).cyan(),
                    summary.last_analysis.dimmed()
                );
            }
        }
    }
}

pub async fn handle_balance(config_dir: &Path) {
    let config = load_config(config_dir);
    let client = config.client().unwrap_or_else(|e| fail(e));

    match client.balance().await {
        Ok(balance) => println!(
            "{} {} API credits remaining",
            "✓".green().bold(),
            balance.credits_remaining.to_string().cyan().bold()
        ),
        Err(e) => fail(format!("Failed to fetch balance: {}", e)),
    }
}
