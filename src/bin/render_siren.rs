use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "render-siren", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the render server.
    Serve(ServeArgs),
    /// Send a manifest to a render server and save the returned canvas as a PNG.
    Render(RenderArgs),
    /// Composite a manifest locally (no server) and save it as a PNG.
    Composite(CompositeArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Server config JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address.
    #[arg(long)]
    bind: Option<String>,

    /// Serve connections on a worker pool of this many threads instead of one at a time.
    #[arg(long)]
    threads: Option<usize>,

    /// Per-read/write socket timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render server address.
    #[arg(long, default_value_t = format!("127.0.0.1:{}", render_siren::DEFAULT_PORT))]
    server: String,

    /// Connect/read/write timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Input manifest JSON.
    #[arg(long)]
    manifest: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Composite(args) => cmd_composite(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => render_siren::ServerConfig::from_json_file(path)?,
        None => render_siren::ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(threads) = args.threads {
        config.concurrency = render_siren::Concurrency::Pooled {
            threads: Some(threads),
        };
    }
    if let Some(ms) = args.timeout_ms {
        config.read_timeout_ms = Some(ms);
        config.write_timeout_ms = Some(ms);
    }

    let server = render_siren::RenderServer::bind(config).context("start render server")?;
    eprintln!("listening on {}", server.local_addr()?);
    server.serve()?;
    Ok(())
}

fn load_request(manifest: &Path) -> anyhow::Result<render_siren::InstructionSet> {
    let set = render_siren::load_manifest(manifest)
        .with_context(|| format!("load manifest '{}'", manifest.display()))?;
    Ok(set)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let set = load_request(&args.manifest)?;

    let mut client = render_siren::RenderClient::new(args.server.as_str())
        .with_context(|| format!("resolve server '{}'", args.server))?;
    if let Some(ms) = args.timeout_ms {
        client = client.with_timeout(std::time::Duration::from_millis(ms));
    }

    let canvas = client
        .render(&set)
        .with_context(|| format!("render on '{}'", client.addr()))?;
    render_siren::encode_file(&canvas, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let set = load_request(&args.manifest)?;
    let canvas = set.composite()?;
    render_siren::encode_file(&canvas, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
