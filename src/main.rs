use clap::{Parser, Subcommand};
use image_swap::{StaticViewport, config, descriptor, manifest, output, render, select, swap};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Viewport reading shared by commands that make a selection.
#[derive(clap::Args, Clone)]
struct ViewportArgs {
    /// Viewport width in CSS px
    #[arg(long)]
    width: u32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Parser)]
#[command(name = "image-swap")]
#[command(about = "Pick image sources for a viewport from srcset-style descriptor lists")]
#[command(long_about = "\
Pick image sources for a viewport from srcset-style descriptor lists

Each image carries a comma-separated descriptor list. A descriptor is a URL
followed by optional size tokens:

  cat_480.jpg 480w, cat_480_2x.jpg 480w 2x, cat_768.jpg 768w

  <n>w   breakpoint width (px) this source is meant for
  <n>h   height (px)
  <r>x   pixel ratio (default 1)

The viewport width is mapped to the greatest configured breakpoint not above
it (widths below the smallest breakpoint use the smallest). Only descriptors
whose width equals that breakpoint are candidates; the pixel ratio then picks
between them. Images with no candidate are hidden behind a 1x1 placeholder.

Run 'image-swap gen-config' to print a documented image-swap.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "image-swap.toml", global = true)]
    config: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select a source from a single descriptor list
    Select {
        /// Descriptor list, e.g. "a.jpg 480w, a_2x.jpg 480w 2x"
        #[arg(long)]
        srcset: String,
        #[command(flatten)]
        viewport: ViewportArgs,
    },
    /// Run one swap pass over a targets manifest
    Run {
        /// Targets manifest (JSON)
        #[arg(long)]
        targets: PathBuf,
        #[command(flatten)]
        viewport: ViewportArgs,
        /// Print the pass report as JSON
        #[arg(long)]
        json: bool,
        /// Write the resulting <img> markup to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Validate descriptor lists in a targets manifest
    Check {
        /// Targets manifest (JSON)
        #[arg(long)]
        targets: PathBuf,
    },
    /// Print a stock image-swap.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Select { srcset, viewport } => {
            let config = config::load_config(&cli.config)?;
            let breakpoints = config.breakpoint_set()?;
            let (descriptors, errors) = descriptor::partition(descriptor::parse_list(&srcset));
            for error in &errors {
                println!("Invalid token: {}", error.raw_token);
            }
            let active = breakpoints.classify(viewport.width);
            let selection = select::select(
                active,
                viewport.dpr,
                &descriptors,
                &config.selection_policy(),
            );
            println!("Breakpoint: {}", active);
            println!("{}", format_selection(&selection));
        }
        Command::Run {
            targets,
            viewport,
            json,
            html,
        } => {
            let config = config::load_config(&cli.config)?;
            let manifest = manifest::load_manifest(&targets)?;
            let bound = manifest::bind_targets(&manifest, &config);
            let mut driver = swap::ImageSwap::new(config, bound)?;
            let report = driver.run(&StaticViewport::new(viewport.width, viewport.dpr));

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_pass_report(&report);
            }
            if let Some(path) = html {
                let markup = render::render_document("image-swap", driver.targets());
                std::fs::write(&path, markup.into_string())?;
                println!("==> Wrote {}", path.display());
            }
        }
        Command::Check { targets } => {
            let config = config::load_config(&cli.config)?;
            let manifest = manifest::load_manifest(&targets)?;
            let bound = manifest::bind_targets(&manifest, &config);
            output::print_check_report(&bound);

            let problems = bound
                .iter()
                .filter(|t| t.srcset.is_none() || !t.parse_errors.is_empty())
                .count();
            if problems > 0 {
                return Err(format!("{problems} target(s) with descriptor problems").into());
            }
            println!("==> Descriptor lists are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn format_selection(selection: &select::Selection) -> String {
    match selection {
        select::Selection::Apply {
            descriptor, reason, ..
        } => format!("Apply: {} ({:?})", descriptor, reason),
        select::Selection::Remove => "Remove: placeholder, hidden".to_string(),
        select::Selection::NoMatch { breakpoint } => {
            format!("No match: no descriptor with width {breakpoint}w, placeholder, hidden")
        }
        select::Selection::Unresolved => "Unresolved: current source kept".to_string(),
    }
}
