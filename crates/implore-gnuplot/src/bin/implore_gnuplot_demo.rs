//! implore-gnuplot demo
//!
//! Draws one quadratic curve per plot style on a single 2-D plot and saves
//! the result.

use std::path::PathBuf;

use clap::Parser;
use implore_gnuplot::{executable, OutputFormat, PlotConfig, PlotSession, Style};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "implore-gnuplot-demo", about = "Draw every plot style with gnuplot")]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "2dplot.png")]
    output: PathBuf,

    /// Output width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 1200)]
    height: u32,

    /// Output format (png, pdf, svg, jpeg, eps)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Keep the gnuplot window open after exit
    #[arg(long)]
    persist: bool,

    /// Path to the gnuplot executable
    #[arg(long)]
    gnuplot: Option<PathBuf>,

    /// TOML session configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if let Some(path) = &args.gnuplot {
        executable::set_custom_path(path)?;
    }

    let mut config = match &args.config {
        Some(path) => PlotConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => PlotConfig::new(2),
    };
    if args.persist {
        config = config.with_persist();
    }
    if let Some(format) = args.format {
        config = config.with_format(format);
    }

    let mut plot = PlotSession::new(config)?;
    plot.set_x_label("X")?;
    plot.set_y_label("Y")?;
    plot.set_grid()?;
    plot.set_y_range(0.0, 500.0)?;
    plot.set_x_range(0.0, 100.0)?;
    plot.set_title("every style on one 2d plot")?;
    plot.set_key_outside()?;

    let xs: Vec<f64> = (0..100).map(f64::from).collect();
    for (i, style) in Style::ALL.iter().enumerate() {
        let scale = i as f64;
        plot.add_func_2d(style.as_str(), *style, &xs, |x| x.powi(2) / 10.0 * scale)?;
    }

    plot.save(&args.output, args.width, args.height)?;
    plot.close()?;
    tracing::info!("Saved {:?}", args.output);
    Ok(())
}
