pub mod analysis;
pub mod analyze;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod history;
pub mod host;
pub mod report;
pub mod snapshot;
pub mod sort;

use colored::Colorize;

pub use analysis::{
    AnchorBucket, DomainBucket, LinkCounts, PageBucket, aggregate_by_anchor, aggregate_by_domain,
    aggregate_by_page,
};
pub use analyze::{Analysis, AnalysisOptions, execute_analysis};
pub use error::{CoreError, Result};
pub use filter::{FilterCriteria, LinkType, filter_records};
pub use sort::{SortDirection, SortState, sort_buckets};

const BANNER: &str = r#"
  _                _    _
 | |__   __ _  ___| | _| | ___ _ __  ___
 | '_ \ / _` |/ __| |/ / |/ _ \ '_ \/ __|
 | |_) | (_| | (__|   <| |  __/ | | \__ \
 |_.__/ \__,_|\___|_|\_\_|\___|_| |_|___/
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed(),
        "backlink and domain authority analysis".italic()
    );
}
