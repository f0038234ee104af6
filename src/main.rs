//! Kano: innovation assessment CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use kano::assessment::AssessmentEngine;
use kano::config::{load_config, starter_config, CONFIG_FILENAME};
use kano::dataset::synthetic::{self, CatalogKind};
use kano::dataset::Dataset;
use kano::reporter::{ConsoleReporter, DistributionSvgReporter, JsonReporter, SvgReporter};
use kano::rescale::{Rescaler, SCALE_FACTOR};
use kano::{Category, DEFAULT_PRECISION, MAX_PRECISION};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Kano: innovation assessment of product features
#[derive(Parser, Debug)]
#[command(name = "kano")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (also raises the log level to debug)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assess one product (or all products) of a dataset
    Assess {
        /// Dataset JSON file
        dataset: PathBuf,

        /// Product id or name to assess
        #[arg(long, short, required_unless_present = "all", conflicts_with = "all")]
        product: Option<String>,

        /// Assess every product in the dataset
        #[arg(long)]
        all: bool,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Quiet mode (one line per product)
        #[arg(long, short, conflicts_with = "json")]
        quiet: bool,

        /// Write the novelty x quality chart to this SVG file
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,

        /// Show the per-feature legend on the chart
        #[arg(long)]
        legend: bool,

        /// Decimal places for novelty and area
        #[arg(long, value_parser = precision_parser())]
        precision: Option<u32>,

        /// Feature where a lower raw value is better (repeatable)
        #[arg(long, value_name = "FEATURE")]
        inverse: Vec<String>,

        /// Evaluate features in parallel
        #[arg(long)]
        parallel: bool,

        /// Path to config file (default: search .kanorc.json in dataset dir and parents)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a single quality value on a Kano curve
    Evaluate {
        /// Quality in [-6, 6]
        #[arg(allow_negative_numbers = true)]
        quality: f64,

        /// Category: LQ, MB or A
        category: String,

        /// Decimal places for novelty and area
        #[arg(long, default_value_t = DEFAULT_PRECISION, value_parser = precision_parser())]
        precision: u32,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Rescale raw values into qualities in [-6, 6]
    Rescale {
        /// Raw measurements
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Lower raw values are better (negate the result)
        #[arg(long)]
        inverse: bool,

        /// Quality units per standard deviation
        #[arg(long, default_value_t = SCALE_FACTOR)]
        scale_factor: f64,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Check how closely one raw feature column follows a normal distribution
    Distribution {
        /// Dataset JSON file
        dataset: PathBuf,

        /// Feature column to inspect
        feature: String,

        /// Histogram bins (default: Sturges' rule)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        bins: Option<u16>,

        /// Write the histogram and probability plot to this SVG file
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file (default: search .kanorc.json in dataset dir and parents)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a synthetic dataset (bicycle, smartphone, car)
    Generate {
        /// Catalog kind
        kind: String,

        /// Number of products
        #[arg(long, default_value_t = 50)]
        products: usize,

        /// Random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Create .kanorc.json with sensible defaults
    Init {
        /// Decimal places for novelty and area
        #[arg(long, value_parser = precision_parser())]
        precision: Option<u32>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn precision_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=MAX_PRECISION as i64)
}

fn main() -> ExitCode {
    let args = Args::parse();
    kano::logging::init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let verbose = args.verbose;
    let no_color = args.no_color;

    match args.command {
        Commands::Assess {
            dataset,
            product,
            all,
            json,
            quiet,
            svg,
            legend,
            precision,
            inverse,
            parallel,
            config,
        } => {
            let options = AssessOptions {
                product,
                all,
                json,
                quiet,
                svg,
                legend,
                precision,
                inverse,
                parallel,
                config,
                verbose,
                no_color,
            };
            run_assess(&dataset, options)
        }
        Commands::Evaluate {
            quality,
            category,
            precision,
            json,
        } => run_evaluate(quality, &category, precision, json),
        Commands::Rescale {
            values,
            inverse,
            scale_factor,
            json,
        } => run_rescale(&values, inverse, scale_factor, json),
        Commands::Distribution {
            dataset,
            feature,
            bins,
            svg,
            json,
            config,
        } => run_distribution(
            &dataset,
            &feature,
            bins.map(usize::from),
            svg.as_deref(),
            json,
            config.as_deref(),
            no_color,
            verbose,
        ),
        Commands::Generate {
            kind,
            products,
            seed,
            out,
        } => run_generate(&kind, products, seed, out.as_deref()),
        Commands::Init { precision, dir } => run_init(precision, dir.as_deref()),
    }
}

struct AssessOptions {
    product: Option<String>,
    all: bool,
    json: bool,
    quiet: bool,
    svg: Option<PathBuf>,
    legend: bool,
    precision: Option<u32>,
    inverse: Vec<String>,
    parallel: bool,
    config: Option<PathBuf>,
    verbose: bool,
    no_color: bool,
}

fn run_assess(dataset_path: &Path, opts: AssessOptions) -> Result<ExitCode> {
    // Resolve work directory for config search
    let work_dir = dataset_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, opts.config.as_deref())?.merge_with_cli(
        opts.precision,
        &opts.inverse,
        opts.parallel,
    );

    let dataset = Dataset::load(dataset_path)?;
    let mut effective = config.effective_for_dataset(&dataset.name);
    if opts.legend {
        effective.chart.legend = true;
    }

    let engine = AssessmentEngine::new()
        .with_precision(effective.precision)
        .with_parallel(effective.parallel);

    let results = if opts.all {
        engine.assess_all(&dataset, &effective)?
    } else {
        let product = opts
            .product
            .as_deref()
            .context("--product is required unless --all is given")?;
        vec![engine.assess_product(&dataset, product, &effective)?]
    };

    if let Some(ref svg_path) = opts.svg {
        if results.len() == 1 {
            SvgReporter::new(effective.chart.clone()).write(&results[0], svg_path)?;
            if !opts.quiet && !opts.json {
                eprintln!("{}: Chart written to {}", "Info".blue(), svg_path.display());
            }
        } else {
            warn!("--svg is ignored with --all");
            eprintln!("{}: --svg only works with a single product", "Warning".yellow());
        }
    }

    if opts.json {
        let reporter = JsonReporter::new().pretty();
        println!("{}", reporter.report_many(&results)?);
    } else if opts.quiet {
        let reporter = ConsoleReporter::new();
        for result in &results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if opts.verbose {
            reporter = reporter.verbose();
        }
        if opts.no_color {
            reporter = reporter.without_colors();
        }

        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_evaluate(quality: f64, label: &str, precision: u32, json: bool) -> Result<ExitCode> {
    let category: Category = label.parse()?;
    let evaluation = AssessmentEngine::new()
        .with_precision(precision)
        .evaluate(quality, category)?;
    let quadrant = kano::Quadrant::classify(quality, evaluation.novelty);

    if json {
        let reporter = JsonReporter::new();
        println!(
            "{}",
            reporter.report_evaluation(quality, category, &evaluation)?
        );
    } else {
        let p = precision as usize;
        println!(
            "{} ({}): quality = {}, novelty = {:.p$}, area = {:.p$}, quadrant = {} ({})",
            category.name(),
            category.code(),
            quality,
            evaluation.novelty,
            evaluation.area,
            quadrant,
            quadrant.label()
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::too_many_arguments)]
fn run_distribution(
    dataset_path: &Path,
    feature: &str,
    bins: Option<usize>,
    svg: Option<&Path>,
    json: bool,
    config_path: Option<&Path>,
    no_color: bool,
    verbose: bool,
) -> Result<ExitCode> {
    let work_dir = dataset_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let config = load_config(work_dir, config_path)?;
    let dataset = Dataset::load(dataset_path)?;
    let chart = config.effective_for_dataset(&dataset.name).chart;

    let report = dataset.distribution(feature, bins)?;
    info!(
        dataset = %dataset.name,
        feature,
        r = report.probability_plot.r,
        "fitted normal distribution"
    );

    if let Some(svg_path) = svg {
        DistributionSvgReporter::new(chart).write(&report, svg_path)?;
        if !json {
            eprintln!("{}: Chart written to {}", "Info".blue(), svg_path.display());
        }
    }

    if json {
        println!("{}", JsonReporter::new().pretty().report_distribution(&report)?);
    } else {
        let mut reporter = ConsoleReporter::new();
        if verbose {
            reporter = reporter.verbose();
        }
        if no_color {
            reporter = reporter.without_colors();
        }
        reporter.report_distribution(&report);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_rescale(values: &[f64], inverse: bool, scale_factor: f64, json: bool) -> Result<ExitCode> {
    let rescaled = Rescaler::new()
        .with_scale_factor(scale_factor)
        .rescale(values, inverse)?;
    if json {
        println!("{}", JsonReporter::new().report_rescaled(&rescaled)?);
    } else {
        for (raw, quality) in values.iter().zip(&rescaled) {
            println!("{:>12} -> {:>7.3}", raw, quality);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_generate(kind: &str, products: usize, seed: Option<u64>, out: Option<&Path>) -> Result<ExitCode> {
    let kind: CatalogKind = kind.parse()?;
    if products < 2 {
        anyhow::bail!("--products must be at least 2 to give every feature some variance");
    }

    let dataset = synthetic::generate(kind, products, seed)?;
    match out {
        Some(path) => {
            dataset.save(path)?;
            info!(catalog = %kind, products, path = %path.display(), "generated dataset");
            eprintln!(
                "{}: {} {} products written to {}",
                "Info".blue(),
                products,
                kind,
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&dataset)?),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(precision: Option<u32>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = starter_config(precision.unwrap_or(DEFAULT_PRECISION));
    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    eprintln!("{}: Created {}", "Info".blue(), config_path.display());
    Ok(ExitCode::SUCCESS)
}
