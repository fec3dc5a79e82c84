/// Bucket Player - browse and play the audio files of a public bucket
use bucket_catalog::{CatalogClient, CatalogView};
use bucket_player::{config::AppConfig, render::format_file_line};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bucket-player")]
#[command(about = "Browse and play the audio files of a public bucket", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bucket base URL (overrides configuration)
    #[arg(long, global = true)]
    bucket_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List audio files in the bucket
    List {
        /// Only show files whose name contains this text (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Play audio files interactively
    Play {
        /// Only queue files whose name contains this text
        #[arg(short, long)]
        query: Option<String>,

        /// List number of the first track
        #[arg(short, long, default_value_t = 1)]
        track: usize,

        /// Start with shuffle on
        #[arg(short, long)]
        shuffle: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so listings can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bucket_player=info,bucket_catalog=info,bucket_playback=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bucket_url) = cli.bucket_url {
        config.catalog.bucket_url = bucket_url;
    }
    config.validate()?;

    match cli.command {
        Commands::List { query } => {
            list(&config, query.unwrap_or_default()).await?;
        }
        Commands::Play {
            query,
            track,
            shuffle,
        } => {
            play(&config, query.unwrap_or_default(), track, shuffle).await?;
        }
    }

    Ok(())
}

async fn list(config: &AppConfig, query: String) -> anyhow::Result<()> {
    let client = CatalogClient::new(config.catalog_config())?;
    let mut view = CatalogView::with_policy(client, config.refetch_policy());

    view.set_query(query).await;
    if let Some(message) = view.error() {
        anyhow::bail!("Could not load list: {}", message);
    }

    if view.files().is_empty() {
        println!("No tracks");
    }
    for (index, file) in view.files().iter().enumerate() {
        println!("{}", format_file_line(index, file));
    }

    Ok(())
}

#[cfg(feature = "audio-output")]
async fn play(config: &AppConfig, query: String, track: usize, shuffle: bool) -> anyhow::Result<()> {
    use bucket_player::{audio::RodioBackend, command::HELP, shell::Shell};
    use bucket_playback::PlaybackSession;
    use std::io::Write;
    use tokio::io::BufReader;

    let client = CatalogClient::new(config.catalog_config())?;
    let view = CatalogView::with_policy(client, config.refetch_policy());

    // Keep the stream alive for the whole session
    let (_stream, backend) = RodioBackend::open(config.status_interval())?;
    let mut session = PlaybackSession::new(backend);
    session.set_shuffle(shuffle || config.playback.shuffle);

    let mut shell = Shell::new(view, session);
    if let Some(message) = shell.search(&query).await {
        anyhow::bail!("Could not load list: {}", message);
    }

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", HELP)?;
    writeln!(stdout)?;

    let files = shell.view().files().len();
    if files == 0 {
        println!("No tracks");
        return Ok(());
    }

    shell.start(track.clamp(1, files) - 1).await;
    shell
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    Ok(())
}

#[cfg(not(feature = "audio-output"))]
async fn play(
    _config: &AppConfig,
    _query: String,
    _track: usize,
    _shuffle: bool,
) -> anyhow::Result<()> {
    anyhow::bail!(
        "bucket-player was built without audio output; rebuild with `--features audio-output`"
    )
}
