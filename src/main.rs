use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use stencil_renderer::{
    Color, ColorStop, PointPx, RenderRequest, Rendered, RendererConfig, SizePx, StencilRenderer,
};

#[derive(Parser, Debug)]
#[command(
    name = "stencil-render",
    version,
    about = "Render tinted stencils and procedural images, with an on-disk cache.",
    long_about = None,
    propagate_version = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Parent directory of the cache folder
    #[arg(long, global = true)]
    cache_root: Option<PathBuf>,

    /// Directory of the main stencil namespace
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Render without reading or writing the cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tint a named stencil
    Named {
        name: String,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(short, long)]
        color: Color,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a top-to-bottom linear gradient
    Gradient {
        #[arg(short, long)]
        size: SizePx,
        #[arg(long)]
        start_color: Color,
        #[arg(long, default_value_t = 0.0)]
        start_location: f32,
        #[arg(long)]
        end_color: Color,
        #[arg(long, default_value_t = 1.0)]
        end_location: f32,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a flat square
    Square {
        #[arg(short, long)]
        color: Color,
        #[arg(short, long)]
        size: SizePx,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a flat circle inscribed in the given size
    Circle {
        #[arg(short, long)]
        color: Color,
        #[arg(short, long)]
        size: SizePx,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Resize an image file
    Resize {
        input: PathBuf,
        #[arg(short, long)]
        size: SizePx,
        /// Cache the result under this identifier
        #[arg(long)]
        identifier: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Draw one image file over another
    Merge {
        input: PathBuf,
        overlay: PathBuf,
        #[arg(short, long, default_value = "0,0", allow_hyphen_values = true)]
        position: PointPx,
        /// Cache the result under this identifier
        #[arg(long)]
        identifier: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Tint an image file (never cached)
    Tint {
        input: PathBuf,
        #[arg(short, long)]
        color: Color,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Delete every cached image (-v lists each removed file)
    Clear,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// Loads the config file, if any, then applies command-line overrides.
    fn renderer_config(&self) -> Result<RendererConfig> {
        let mut config = match &self.config {
            Some(path) => RendererConfig::from_file(path)?,
            None => RendererConfig::default(),
        };
        if let Some(root) = &self.cache_root {
            config.cache.root = Some(root.clone());
        }
        if let Some(root) = &self.assets {
            config.assets.root = Some(root.clone());
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let renderer = StencilRenderer::from_config(&cli.renderer_config()?);

    match &cli.command {
        Command::Named {
            name,
            namespace,
            color,
            output,
        } => {
            let request = RenderRequest::named_in(name, namespace.as_deref(), *color);
            write_output(renderer.render_or_fetch(&request), output)
        }
        Command::Gradient {
            size,
            start_color,
            start_location,
            end_color,
            end_location,
            output,
        } => {
            let request = RenderRequest::gradient(
                *size,
                ColorStop::new(*start_color, *start_location),
                ColorStop::new(*end_color, *end_location),
            );
            write_output(renderer.render_or_fetch(&request), output)
        }
        Command::Square {
            color,
            size,
            output,
        } => write_output(
            renderer.render_or_fetch(&RenderRequest::square(*color, *size)),
            output,
        ),
        Command::Circle {
            color,
            size,
            output,
        } => write_output(
            renderer.render_or_fetch(&RenderRequest::circle(*color, *size)),
            output,
        ),
        Command::Resize {
            input,
            size,
            identifier,
            output,
        } => {
            let image = read_image(input)?;
            let request = RenderRequest::resize(&image, *size, identifier.as_deref());
            write_output(renderer.render_or_fetch(&request), output)
        }
        Command::Merge {
            input,
            overlay,
            position,
            identifier,
            output,
        } => {
            let image = read_image(input)?;
            let overlay = read_image(overlay)?;
            let request =
                RenderRequest::merge(&image, &overlay, *position, identifier.as_deref());
            write_output(renderer.render_or_fetch(&request), output)
        }
        Command::Tint {
            input,
            color,
            output,
        } => {
            let image = read_image(input)?;
            write_output(
                renderer.render_or_fetch(&RenderRequest::tint(&image, *color)),
                output,
            )
        }
        Command::Clear => {
            let report = renderer.clear_cache(cli.verbose > 0);
            println!("removed {} cached images", report.removed.len());
            if report.failed > 0 {
                anyhow::bail!("{} cache entries could not be removed", report.failed);
            }
            Ok(())
        }
    }
}

fn read_image(path: &Path) -> Result<image::RgbaImage> {
    let image = image::open(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn write_output(rendered: Option<Rendered>, output: &Path) -> Result<()> {
    let rendered = rendered.context("nothing was rendered")?;
    rendered
        .image
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("{} ({:?})", output.display(), rendered.origin);
    Ok(())
}
