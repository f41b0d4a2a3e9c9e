use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use snakeboard::{BoardConfig, BoardRenderer, FontHandle, DEFAULT_FONT_PATH};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snakeboard", version, about = "Render 10x10 serpentine game boards as PNG")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve POST /generate-board over HTTP
    #[cfg(feature = "server")]
    Serve(ServeArgs),
    /// Render a JSON player list to a PNG file
    Render(RenderArgs),
}

#[derive(Args)]
struct BoardArgs {
    /// Board side in pixels (multiple of 10)
    #[arg(long, env = "SNAKEBOARD_BOARD_SIZE", default_value_t = 800)]
    board_size: u32,

    /// TrueType font for token labels; the built-in face is used if it cannot be loaded
    #[arg(long, env = "SNAKEBOARD_FONT", default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,
}

#[cfg(feature = "server")]
#[derive(Args)]
struct ServeArgs {
    #[arg(long, env = "SNAKEBOARD_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long, env = "SNAKEBOARD_WORKERS")]
    workers: Option<usize>,

    #[command(flatten)]
    board: BoardArgs,
}

#[derive(Args)]
struct RenderArgs {
    /// JSON file with {"players": [...]}, or - for stdin
    #[arg(long, short, default_value = "-")]
    input: String,

    /// Where to write the PNG
    #[arg(long, short)]
    output: PathBuf,

    #[command(flatten)]
    board: BoardArgs,
}

impl BoardArgs {
    fn renderer(&self) -> Result<BoardRenderer> {
        let config = BoardConfig::with_size(self.board_size);
        config.validate()?;
        let font = FontHandle::load_or_builtin(&self.font, config.font_px());
        Ok(BoardRenderer::new(config, font)?)
    }
}

#[cfg(feature = "server")]
fn serve(args: ServeArgs) -> Result<()> {
    let renderer = args.board.renderer()?;
    let addr = format!("{}:{}", args.host, args.port);
    let server = snakeboard::server::BoardServer::bind(&addr, renderer)?;
    let workers = args.workers.unwrap_or_else(snakeboard::server::default_workers);
    server.run(workers)?;
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let renderer = args.board.renderer()?;
    let body = if args.input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read players from stdin")?;
        buf
    } else {
        std::fs::read(&args.input).with_context(|| format!("failed to read {}", args.input))?
    };
    let image = renderer.render_json(&body)?;
    std::fs::write(&args.output, image.as_bytes())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        "Wrote {}x{} board to {} (sha256 {})",
        image.width,
        image.height,
        args.output.display(),
        image.digest()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        #[cfg(feature = "server")]
        Command::Serve(args) => serve(args),
        Command::Render(args) => render(args),
    }
}
