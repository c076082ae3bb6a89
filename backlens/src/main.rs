use backlens::commands::command_argument_builder;
use backlens::handlers::{
    handle_analyze, handle_balance, handle_history, handle_init, handle_load, handle_ui,
    resolve_config_dir,
};
use backlens_core::config::DEFAULT_CONFIG_DIR;
use backlens_core::print_banner;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let config_dir = resolve_config_dir(
        chosen_command
            .get_one::<String>("config")
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONFIG_DIR),
    );

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command, &config_dir),
        Some(("analyze", primary_command)) => {
            handle_analyze(primary_command, &config_dir, quiet).await
        }
        Some(("load", primary_command)) => handle_load(primary_command, &config_dir),
        Some(("history", primary_command)) => handle_history(primary_command, &config_dir),
        Some(("balance", _)) => handle_balance(&config_dir).await,
        Some(("ui", primary_command)) => handle_ui(primary_command, &config_dir),
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
