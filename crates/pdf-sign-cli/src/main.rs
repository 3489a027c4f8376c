use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pdf_sign::geometry::bitmap_size_for_width;
use pdf_sign::{
    LayoutSnapshot, PageGeometryProvider, PageLayout, SessionConfig, SignatureSource,
    SigningSession, Size, SourceDocument, capture, capture_typed, sign_to_bytes, sign_to_file,
    to_native,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

mod logger;

#[derive(Parser)]
#[command(name = "pdfsign", about = "Place signatures on PDF pages", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page sizes and the layout geometry used for placement
    Info {
        /// Input PDF file
        input: PathBuf,

        /// Width pages are rendered at, in pixels
        #[arg(long)]
        render_width: Option<u32>,

        /// Session configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Place one signature and write a signed copy
    Sign(SignArgs),
}

#[derive(Args)]
struct SignArgs {
    /// Input PDF file
    input: PathBuf,

    /// Signature image (PNG or JPEG)
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    image: Option<PathBuf>,

    /// Text to render as a typed signature
    #[arg(long)]
    text: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    page: usize,

    /// Left edge in layout pixels, relative to the page
    #[arg(long)]
    x: Option<f32>,

    /// Top edge in layout pixels, relative to the page
    #[arg(long)]
    y: Option<f32>,

    /// Width in layout pixels
    #[arg(long)]
    width: Option<f32>,

    /// Height in layout pixels
    #[arg(long)]
    height: Option<f32>,

    /// Number of rotate steps to apply
    #[arg(long, default_value = "0")]
    rotate_steps: u32,

    /// Width pages are rendered at, in pixels
    #[arg(long)]
    render_width: Option<u32>,

    /// Output PDF file
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory receiving signed-<name> (defaults to the input's directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Session configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

async fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

/// Geometry of a virtual render: every page rasterised at `render_width`
/// and stacked the way the desktop surface stacks them
fn virtual_layout(
    document: &SourceDocument,
    config: &SessionConfig,
    render_width: u32,
) -> LayoutSnapshot {
    let pages: Vec<_> = document
        .page_sizes()
        .iter()
        .map(|native| (*native, bitmap_size_for_width(native, render_width)))
        .collect();
    PageLayout::new(render_width as f32, &config.layout).arrange(&pages)
}

async fn run_info(
    input: PathBuf,
    render_width: Option<u32>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref()).await?;
    let document = SourceDocument::load(&input)
        .await
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let render_width = render_width.unwrap_or(config.layout.render_width);
    let snapshot = virtual_layout(&document, &config, render_width);

    println!("{}", input.display());
    println!("  Pages: {}", document.page_count());
    println!("  Render width: {} px", render_width);
    for (native, page) in document.page_sizes().iter().zip(snapshot.pages()) {
        println!(
            "  Page {}: {} x {} pt (origin {}, {}), layout {} x {} px at y {}",
            page.page_index + 1,
            native.width,
            native.height,
            native.origin_x,
            native.origin_y,
            page.bitmap_rect.width,
            page.bitmap_rect.height,
            page.layout_rect.top
        );
    }
    Ok(())
}

async fn run_sign(args: SignArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref()).await?;
    let document = SourceDocument::load(&args.input)
        .await
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    if args.page == 0 || args.page > document.page_count() {
        bail!(
            "Page {} is out of range (document has {} pages)",
            args.page,
            document.page_count()
        );
    }

    let captured = match (&args.image, &args.text) {
        (Some(path), _) => capture::load_upload(path)
            .await
            .with_context(|| format!("Failed to read signature {}", path.display()))?,
        (None, Some(text)) => capture_typed(text, &config.typed)?,
        (None, None) => bail!("Either --image or --text is required"),
    };

    // Placement arguments override the configured defaults
    config.default_page = args.page - 1;
    let (default_x, default_y) = config.default_position;
    config.default_position = (args.x.unwrap_or(default_x), args.y.unwrap_or(default_y));
    let default_size = config.default_size(captured.source);
    let size = Size::new(
        args.width.unwrap_or(default_size.width),
        args.height.unwrap_or(default_size.height),
    );
    match captured.source {
        SignatureSource::Draw => config.draw_size = size,
        SignatureSource::Type => config.type_size = size,
        SignatureSource::Upload => config.upload_size = size,
    }
    if let Some(render_width) = args.render_width {
        config.layout.render_width = render_width;
    }
    config.validate()?;

    let snapshot = virtual_layout(&document, &config, config.layout.render_width);
    let mut session = SigningSession::new(config);
    let id = session.add_signature(captured, &snapshot, Instant::now())?;
    for _ in 0..args.rotate_steps {
        session.rotate(id)?;
    }

    if let Some(overlay) = session.overlays().get(id) {
        if let Some(page) = snapshot.page_geometry(overlay.page_index) {
            let native = to_native(&overlay.rect(), &page);
            println!(
                "Placing on page {} at ({:.2}, {:.2}) pt, {:.2} x {:.2} pt, rotated {}°",
                overlay.page_index + 1,
                native.x,
                native.y,
                native.width,
                native.height,
                overlay.rotation_degrees
            );
        }
    }

    let request = session.commit_request(&document, &snapshot);
    let path = match args.output {
        Some(output) => {
            let bytes = sign_to_bytes(request).await?;
            tokio::fs::write(&output, bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            output
        }
        None => {
            let out_dir = match args.out_dir {
                Some(dir) => dir,
                None => args
                    .input
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            };
            let file_name = args
                .input
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            sign_to_file(request, &out_dir, file_name).await?
        }
    };

    println!("Signed → {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::Info {
            input,
            render_width,
            config,
        } => run_info(input, render_width, config).await?,
        Commands::Sign(args) => run_sign(args).await?,
    }

    Ok(())
}
