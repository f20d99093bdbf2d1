use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use echoview::core::api::ApiClient;
use echoview::core::config::ViewConfig;
use echoview::core::logging;
use echoview::core::session::EchoView;

#[derive(Parser)]
#[command(name = "echoview", version, about = "Greeting + echo client for a local JSON backend")]
struct Cli {
    /// Backend origin, e.g. http://localhost:5000
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Initial contents of the text field
    #[arg(long, global = true)]
    text: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the greeting and print it
    Message,
    /// Send text to the echo endpoint and print the reply
    Echo {
        /// Text to send (defaults to the configured initial text)
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ViewConfig::load().with_overrides(cli.base_url, cli.text);
    config.validate()?;

    match cli.command {
        None => {
            let log_path = logging::init_file()?;
            echoview::tui::run(config, log_path).await
        }
        Some(command) => {
            logging::init_stderr()?;
            let view = EchoView::new(ApiClient::new(config));
            match command {
                Commands::Message => cmd_message(view).await,
                Commands::Echo { text } => cmd_echo(view, text).await,
            }
        }
    }
}

async fn cmd_message(mut view: EchoView) -> Result<()> {
    view.initialize();
    view.settle().await;

    if let Some(err) = &view.state().last_error {
        bail!("{}", err.error);
    }
    println!("{}", view.state().greeting);
    Ok(())
}

async fn cmd_echo(mut view: EchoView, text: Option<String>) -> Result<()> {
    if let Some(text) = text {
        view.update_input_text(text);
    }
    view.submit_echo();
    view.settle().await;

    if let Some(err) = &view.state().last_error {
        bail!("{}", err.error);
    }
    if let Some(json) = view.state().rendered_echo() {
        println!("{json}");
    }
    Ok(())
}
