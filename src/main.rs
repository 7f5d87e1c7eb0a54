use std::io;

use subsift::config::CONFIG;
use subsift::fetcher::HttpFetcher;
use subsift::paginator::Paginator;
use subsift::session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = std::env::var("SUBSIFT_LOG")
        .ok()
        .and_then(|l| l.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::WARN);

    // Logs go to stderr so they never interleave with the prompts on stdout.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Bridge log crate -> tracing (library code and reqwest use `log`)
    tracing_log::LogTracer::init()?;

    let fetcher = HttpFetcher::new(&CONFIG)?;
    let paginator = Paginator::new(fetcher, &CONFIG);
    let mut session = Session::new(io::stdin().lock(), io::stdout(), paginator, &CONFIG);
    session.run().await?;
    Ok(())
}
