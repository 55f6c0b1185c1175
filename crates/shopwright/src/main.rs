mod prompt;

use clap::{Parser, Subcommand};
use shopwright_engine::config::{ConfigLoader, ShopwrightConfig};
use shopwright_engine::flows::{DismissalReport, LoginFlow, PopupDismisser, ReturnFlow};
use shopwright_engine::{hints, intent};
use shopwright_h::ChromiumPage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "shopwright", version, about = "Resilient storefront automation")]
struct Args {
    /// Configuration file (default: ./shopwright.yaml, then ~/.shopwright/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Launch the browser in visible mode (not headless)
    #[arg(long, global = true)]
    visible: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed intent of a command as JSON
    Parse { command: String },
    /// Open a page and dismiss whatever popups cover it
    Dismiss {
        #[arg(long)]
        url: Option<Url>,
    },
    /// Log in with phone number and OTP
    Login {
        #[arg(long)]
        phone: Option<String>,
        /// Ask the configured hint service before each step
        #[arg(long)]
        hints: bool,
    },
    /// Run a return/replace command against the orders page, e.g. "return my red shoes"
    Act {
        command: String,
        #[arg(long)]
        url: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Command::Parse { command } = &args.command {
        println!("{}", serde_json::to_string_pretty(&intent::parse(command))?);
        return Ok(());
    }

    let config = ConfigLoader::load(args.config.as_deref()).await?;

    let mut page = ChromiumPage::new_with_visibility(args.visible);
    if let Err(e) = page.launch().await {
        eprintln!("Failed to launch browser: {}", e);
        return Err(e.into());
    }

    let outcome = run(&args.command, &config, &mut page).await;
    if let Err(e) = page.close().await {
        tracing::warn!("failed to close browser: {}", e);
    }
    outcome
}

async fn run(
    command: &Command,
    config: &ShopwrightConfig,
    page: &mut ChromiumPage,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Parse { .. } => Ok(()),
        Command::Dismiss { url } => {
            let target = url.as_ref().map_or(config.site.base_url.as_str(), Url::as_str);
            page.goto(target).await?;
            let report = PopupDismisser::new(&config.popups).dismiss(page).await;
            print_dismissal(&report);
            Ok(())
        }
        Command::Login { phone, hints: use_hints } => {
            let phone = match phone {
                Some(phone) => phone.clone(),
                None => prompt::ask("Mobile number").await?,
            };

            let mut flow = LoginFlow::new(config);
            if *use_hints {
                let mut hint_config = config.hints.clone();
                hint_config.enabled = true;
                match hints::from_config(&hint_config) {
                    Ok(Some(source)) => flow = flow.with_hints(source),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("continuing without hints: {}", e),
                }
            }

            page.goto(&config.site.base_url).await?;
            let report = flow.run(page, &phone, &prompt::StdinOtp).await?;
            if let Some(popups) = &report.popups {
                print_dismissal(popups);
            }
            for step in &report.steps {
                println!("{}", step);
            }
            println!("Logged in ({})", page.title().await.unwrap_or_default());
            Ok(())
        }
        Command::Act { command, url } => {
            let target = url
                .as_ref()
                .map_or(config.site.orders_url.as_str(), Url::as_str);
            page.goto(target).await?;

            let report = ReturnFlow::new(config).run(page, command).await?;
            println!(
                "{} {} -> record {} (score {:.1} of {} records)",
                report.intent.action,
                report.command,
                report.chosen.record_ref,
                report.chosen.score,
                report.scores.len()
            );
            println!("{}", report.action);
            for step in &report.confirmation {
                println!("{}", step);
            }
            if !report.confirmed() {
                println!("Confirmation not completed; finish it on the page.");
            }
            Ok(())
        }
    }
}

fn print_dismissal(report: &DismissalReport) {
    println!(
        "Dismissed {} popup(s) in {} round(s) [{:?}]: {}",
        report.count(),
        report.rounds,
        report.state,
        report.dismissed.join(", ")
    );
}
