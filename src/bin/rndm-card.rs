use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "rndm-card", version)]
/// Render a catalog entry into a PNG share card.
struct Cli {
    /// Entry JSON (a persisted catalog record).
    #[arg(long)]
    entry: PathBuf,

    /// Directory the card is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Regular-weight font file. Defaults to a system sans-serif face.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold-weight font file. Only used together with `--font`.
    #[arg(long, requires = "font")]
    bold_font: Option<PathBuf>,

    /// Render without images that fail to load instead of aborting.
    #[arg(long)]
    degrade: bool,

    /// Per-image fetch timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Log export progress to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let json = std::fs::read_to_string(&cli.entry)
        .with_context(|| format!("read entry '{}'", cli.entry.display()))?;
    let entry = rndm_card::ShareableEntry::from_json(&json)
        .with_context(|| format!("parse entry '{}'", cli.entry.display()))?;

    let fonts = match &cli.font {
        Some(regular) => rndm_card::FontBook::from_files(regular, cli.bold_font.as_deref())?,
        None => rndm_card::FontBook::system().context("resolve a system font (try --font)")?,
    };

    let policy = if cli.degrade {
        rndm_card::AssetFailurePolicy::Degrade
    } else {
        rndm_card::AssetFailurePolicy::Abort
    };
    let opts = rndm_card::ExportOpts::default()
        .with_fetch_timeout(Duration::from_secs(cli.timeout_secs))
        .with_asset_failure_policy(policy);

    let exporter = rndm_card::Exporter::new(
        rndm_card::HttpFetcher::new()?,
        rndm_card::DirSink::new(&cli.out_dir),
        fonts,
    )
    .with_opts(opts);

    let saved = exporter.export(&entry).await?;
    match &saved.path {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => eprintln!("wrote {}", saved.file_name),
    }
    Ok(())
}
