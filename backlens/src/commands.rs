use crate::CLAP_STYLING;
use backlens_core::config::DEFAULT_CONFIG_DIR;
use clap::{arg, command};

/// Filtering, ordering and output flags shared by `analyze` and `load`.
fn report_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(--"link-type" <TYPE>)
            .required(false)
            .help("Only include links of this type: all, dofollow, nofollow")
            .default_value("all"),
    )
    .arg(
        arg!(-s --"search" <TEXT>)
            .required(false)
            .help("Case-insensitive text matched against anchor, title, source and target"),
    )
    .arg(
        arg!(--"hide-multiple-per-domain")
            .required(false)
            .help("Keep only the first backlink from each referring domain")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(--"top" <N>)
            .required(false)
            .help("Limit every table to the first N rows")
            .value_parser(clap::value_parser!(usize)),
    )
    .arg(
        arg!(--"sort-anchors" <COLUMN>)
            .required(false)
            .help("Order anchors by: text, count, dofollow, nofollow"),
    )
    .arg(
        arg!(--"sort-domains" <COLUMN>)
            .required(false)
            .help("Order referring domains by: domain, count, tld, dofollow, nofollow"),
    )
    .arg(
        arg!(--"sort-pages" <COLUMN>)
            .required(false)
            .help("Order target pages by: url, count, dofollow, nofollow"),
    )
    .arg(
        arg!(--"sort-backlinks" <COLUMN>)
            .required(false)
            .help("Order the backlink list by: anchor, type, source, target (default: provider order)"),
    )
    .arg(
        arg!(--"ascending")
            .required(false)
            .help("Sort the requested columns ascending instead of descending")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json, csv, markdown")
            .value_parser(["text", "json", "csv", "markdown", "md"])
            .default_value("text"),
    )
    .arg(
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Save report to file (default: display to screen)")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
    .arg(
        arg!(--"ui")
            .required(false)
            .help("Open the interactive dashboard instead of printing a report")
            .action(clap::ArgAction::SetTrue)
            .conflicts_with_all(["format", "output"]),
    )
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("backlens")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("backlens")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log debug output to stderr").required(false))
        .arg(
            arg!(-c --"config" <DIR>)
                .required(false)
                .global(true)
                .help("Configuration directory")
                .default_value(DEFAULT_CONFIG_DIR),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a backlens configuration with your API key")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the configuration (default: --config)"),
                )
                .arg(
                    arg!(--"api-key" <KEY>)
                        .required(false)
                        .help("API key for the backlink provider"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing configuration without asking.")
                        .required(false),
                ),
        )
        .subcommand(report_args(
            command!("analyze")
                .about("Fetch backlinks and authority metrics for a domain and report on them")
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("The domain to analyse, e.g. example.com"),
                )
                .arg(
                    arg!(--"one-per-domain")
                        .required(false)
                        .help("Ask the provider for a single backlink per referring domain")
                        .action(clap::ArgAction::SetTrue),
                ),
        ))
        .subcommand(report_args(
            command!("load")
                .about("Report on a saved analysis")
                .arg(
                    arg!(<SNAPSHOT>)
                        .required(true)
                        .help("A snapshot file, or DOMAIN[/FILENAME] in the data directory"),
                ),
        ))
        .subcommand(
            command!("history")
                .about("List analysed domains, or the saved analyses of one domain")
                .arg(arg!([DOMAIN]).required(false).help("Domain to list analyses for"))
                .arg(
                    arg!(--"data-dir" <DIR>)
                        .required(false)
                        .help("Directory of saved analyses (default: from config)"),
                ),
        )
        .subcommand(command!("balance").about("Show the remaining API credits"))
        .subcommand(
            command!("ui").about("Open the dashboard on a saved analysis").arg(
                arg!(--"snapshot" <SNAPSHOT>)
                    .required(true)
                    .help("A snapshot file, or DOMAIN[/FILENAME] in the data directory"),
            ),
        )
}
