//! Send a single notification from the command line.

use clap::Parser;
use planner_notify::{GmailMailer, LogMailer, Notifier, OutgoingMail};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "planner-notify", about = "Send a one-off planner notification")]
struct Cli {
    /// Recipient address.
    #[arg(long)]
    to: String,

    #[arg(long)]
    subject: String,

    #[arg(long, default_value = "")]
    body: String,

    /// OAuth access token with the gmail.send scope. Without one the
    /// message is only logged.
    #[arg(long, env = "PLANNER_GMAIL_TOKEN", hide_env_values = true)]
    gmail_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("planner=info")),
        )
        .init();

    let cli = Cli::parse();
    let mail = OutgoingMail::new(cli.to, cli.subject, cli.body);

    let delivered = match cli.gmail_token.filter(|t| !t.is_empty()) {
        Some(token) => Notifier::new(GmailMailer::new(token)).notify(&mail).await,
        None => Notifier::new(LogMailer::new()).notify(&mail).await,
    };

    if !delivered {
        anyhow::bail!("notification to {} was not delivered", mail.to);
    }
    Ok(())
}
