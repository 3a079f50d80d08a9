use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_api_client::HttpClinicBackend;
use clinic_core::{
    config::api_base_url_from_env_value,
    constants::API_URL_ENV,
    table::{Emphasis, LOADING_MESSAGE},
};

mod session;

use session::Session;

/// Main entry point for the interactive clinic directory
///
/// Loads the clinic list from the backend and then reads one command per line from stdin,
/// redrawing the filtered table after each. Type `help` for the command list.
///
/// # Environment Variables
/// - `CLINIC_API_URL`: backend origin (default: the hosted clinic directory backend)
/// - `RUST_LOG`: log filter; logs go to stderr
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the backend URL is invalid, or
/// - stdin/stdout fail.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_directory=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = api_base_url_from_env_value(std::env::var(API_URL_ENV).ok())?;
    tracing::info!("++ Clinic directory using {}", config.api_base_url());

    let emphasis = if std::io::stdout().is_terminal() {
        Emphasis::Ansi
    } else {
        Emphasis::Brackets
    };
    let mut session = Session::new(HttpClinicBackend::new(&config)?, emphasis);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_lines(&mut stdout, &[LOADING_MESSAGE.to_owned()]).await?;
    write_lines(&mut stdout, &session.start().await).await?;
    while !session.is_done() {
        stdout.write_all(session.prompt().as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if let Some(notice) = session.loading_notice(&line) {
            write_lines(&mut stdout, &[notice.to_owned()]).await?;
        }
        write_lines(&mut stdout, &session.handle(&line).await).await?;
    }

    Ok(())
}

async fn write_lines(stdout: &mut tokio::io::Stdout, lines: &[String]) -> anyhow::Result<()> {
    for line in lines {
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
