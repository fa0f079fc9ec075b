//! epiplot: render plots of fitted epistasis models to SVG.
//!
//! Commands:
//! - `interactions`: coefficient bar chart with significance stars and site grid
//! - `correlation`, `predicted`, `residuals`, `best-fit`: regression diagnostics
//! - `nonlinear`: views of a model with a nonlinear scale
//! - `magnitude`: mean coefficient magnitude per interaction order
//! - `fdist`: F-distribution density or cumulative curve
//! - `pca`: genotypes in principal-component space
//! - `known-vs-learned`: compare two CSV columns
//! - `batch`: every applicable figure for one model, rendered in parallel
//! - `demo`: `batch` on a seeded synthetic model

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use epistasis_core::stats::FDistribution;
use epistasis_core::synthetic::{synthetic_model, synthetic_projection, SyntheticSpec};
use epistasis_core::{Figure, FittedModel, ModelError, PcaProjection};
use epistasis_plot::{
    diagnostics, magnitude_vs_order, principal_components, render_to_file, EpistasisPlotting,
    FDistributionPlotting, NonlinearPlotting, PlotConfig, RegressionPlotting, Significance,
};

#[derive(Parser)]
#[command(name = "epiplot", about = "Plots for fitted epistasis models")]
struct Cli {
    /// Log level for epiplot's own messages; RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Where a single figure comes from and goes to.
#[derive(Args, Debug)]
struct Output {
    /// Plot configuration (TOML). Missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SVG file to write.
    #[arg(long, short)]
    out: PathBuf,

    /// Also print the figure as JSON on stdout.
    #[arg(long, default_value_t = false)]
    dump_json: bool,
}

#[derive(Args, Debug)]
struct ModelOutput {
    /// Fitted model as JSON.
    #[arg(long)]
    model: PathBuf,

    #[command(flatten)]
    output: Output,
}

#[derive(Subcommand)]
enum Commands {
    /// Coefficient bar chart with significance stars and a site grid.
    Interactions {
        #[command(flatten)]
        io: ModelOutput,

        /// Significance mode: bon, p or none. Overrides the config.
        #[arg(long)]
        significance: Option<String>,

        /// Error bar length in standard errors.
        #[arg(long)]
        sigmas: Option<f64>,

        /// Plot log-transformed coefficients.
        #[arg(long, default_value_t = false)]
        log_space: bool,

        /// Color every term by order regardless of significance.
        #[arg(long, default_value_t = false)]
        colorall: bool,
    },
    /// Observed against predicted phenotypes.
    Correlation {
        #[command(flatten)]
        io: ModelOutput,
    },
    /// Sorted predictions against sorted observations.
    Predicted {
        #[command(flatten)]
        io: ModelOutput,
    },
    /// Residuals against predictions.
    Residuals {
        #[command(flatten)]
        io: ModelOutput,

        /// Draw residuals as a stem plot.
        #[arg(long, default_value_t = false)]
        stem: bool,
    },
    /// Observations with error bars and the fitted line.
    BestFit {
        #[command(flatten)]
        io: ModelOutput,
    },
    /// One view of a model with a nonlinear scale.
    Nonlinear {
        #[command(flatten)]
        io: ModelOutput,

        #[arg(long, value_enum, default_value_t = NonlinearView::Function)]
        view: NonlinearView,
    },
    /// Mean coefficient magnitude per interaction order.
    Magnitude {
        #[command(flatten)]
        io: ModelOutput,

        /// Average signed coefficients instead of absolute values.
        #[arg(long, default_value_t = false)]
        keep_sign: bool,
    },
    /// F-distribution density or cumulative curve.
    Fdist {
        /// Numerator degrees of freedom.
        #[arg(long)]
        dfn: f64,

        /// Denominator degrees of freedom.
        #[arg(long)]
        dfd: f64,

        /// Plot the cumulative distribution instead of the density.
        #[arg(long, default_value_t = false)]
        cdf: bool,

        #[command(flatten)]
        output: Output,
    },
    /// Genotypes in principal-component space.
    Pca {
        /// PCA projection as JSON.
        #[arg(long)]
        projection: PathBuf,

        /// Number of projected coordinates to use (at most 3).
        #[arg(long)]
        dimensions: Option<usize>,

        /// Leave out the principal-axis arrows.
        #[arg(long, default_value_t = false)]
        no_components: bool,

        #[command(flatten)]
        output: Output,
    },
    /// Compare known and learned values read from two CSV columns.
    KnownVsLearned {
        /// CSV file with a header row.
        #[arg(long)]
        csv: PathBuf,

        #[arg(long, default_value = "known")]
        known: String,

        #[arg(long, default_value = "learned")]
        learned: String,

        #[arg(long, value_enum, default_value_t = Comparison::Correlation)]
        kind: Comparison,

        #[command(flatten)]
        output: Output,
    },
    /// Render every applicable figure for a model into a directory.
    Batch {
        /// Fitted model as JSON.
        #[arg(long)]
        model: PathBuf,

        /// PCA projection as JSON; the PCA figure is skipped without it.
        #[arg(long)]
        projection: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory. Created if missing.
        #[arg(long, default_value = "figures")]
        out_dir: PathBuf,
    },
    /// Render every figure for a seeded synthetic model.
    Demo {
        #[arg(long, default_value_t = 4)]
        length: usize,

        #[arg(long, default_value_t = 3)]
        order: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Pass the linear stage through an exponential scale.
        #[arg(long, default_value_t = false)]
        nonlinear: bool,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "demo")]
        out_dir: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NonlinearView {
    Function,
    Linear,
    BestFit,
    Residuals,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Comparison {
    Correlation,
    Residuals,
}

/// Figures that need only a fitted model (and, for PCA, a projection).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlotKind {
    Interactions,
    Correlation,
    Predicted,
    Residuals,
    BestFit,
    Magnitude,
    NonlinearFunction,
    LinearPhenotypes,
    NonlinearBestFit,
    NonlinearResiduals,
    Pca,
}

impl PlotKind {
    fn file_stem(self) -> &'static str {
        match self {
            PlotKind::Interactions => "interactions",
            PlotKind::Correlation => "correlation",
            PlotKind::Predicted => "predicted",
            PlotKind::Residuals => "residuals",
            PlotKind::BestFit => "best_fit",
            PlotKind::Magnitude => "magnitude",
            PlotKind::NonlinearFunction => "nonlinear_function",
            PlotKind::LinearPhenotypes => "linear_phenotypes",
            PlotKind::NonlinearBestFit => "nonlinear_best_fit",
            PlotKind::NonlinearResiduals => "nonlinear_residuals",
            PlotKind::Pca => "pca",
        }
    }

    fn needs_nonlinear(self) -> bool {
        matches!(
            self,
            PlotKind::NonlinearFunction
                | PlotKind::LinearPhenotypes
                | PlotKind::NonlinearBestFit
                | PlotKind::NonlinearResiduals
        )
    }

    /// Every figure `batch` can draw for this model.
    /// `best_fit` with error bars needs standard deviations; without them it
    /// is left out rather than failing the whole batch.
    fn batch_kinds(model: &FittedModel, config: &PlotConfig, with_pca: bool) -> Vec<PlotKind> {
        let all = [
            PlotKind::Interactions,
            PlotKind::Correlation,
            PlotKind::Predicted,
            PlotKind::Residuals,
            PlotKind::BestFit,
            PlotKind::Magnitude,
            PlotKind::NonlinearFunction,
            PlotKind::LinearPhenotypes,
            PlotKind::NonlinearBestFit,
            PlotKind::NonlinearResiduals,
            PlotKind::Pca,
        ];
        all.into_iter()
            .filter(|k| !k.needs_nonlinear() || model.is_nonlinear())
            .filter(|k| *k != PlotKind::BestFit || model.stdeviations.is_some() || !config.best_fit.errorbars)
            .filter(|k| *k != PlotKind::Pca || with_pca)
            .collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Interactions {
            io,
            significance,
            sigmas,
            log_space,
            colorall,
        } => {
            let (model, mut config) = load_inputs(&io)?;
            if let Some(mode) = significance {
                config.interactions.significance = Significance::parse(Some(mode.as_str()))?;
            }
            if let Some(sigmas) = sigmas {
                config.interactions.sigmas = sigmas;
            }
            config.interactions.log_space |= log_space;
            config.interactions.colorall |= colorall;
            emit(&build_figure(PlotKind::Interactions, &model, None, &config)?, &io.output, &config)
        }
        Commands::Correlation { io } => run_model_plot(PlotKind::Correlation, &io),
        Commands::Predicted { io } => run_model_plot(PlotKind::Predicted, &io),
        Commands::Residuals { io, stem } => {
            let (model, mut config) = load_inputs(&io)?;
            config.residuals.stem |= stem;
            emit(&build_figure(PlotKind::Residuals, &model, None, &config)?, &io.output, &config)
        }
        Commands::BestFit { io } => run_model_plot(PlotKind::BestFit, &io),
        Commands::Nonlinear { io, view } => {
            let kind = match view {
                NonlinearView::Function => PlotKind::NonlinearFunction,
                NonlinearView::Linear => PlotKind::LinearPhenotypes,
                NonlinearView::BestFit => PlotKind::NonlinearBestFit,
                NonlinearView::Residuals => PlotKind::NonlinearResiduals,
            };
            run_model_plot(kind, &io)
        }
        Commands::Magnitude { io, keep_sign } => {
            let (model, mut config) = load_inputs(&io)?;
            config.magnitude.keep_sign |= keep_sign;
            emit(&build_figure(PlotKind::Magnitude, &model, None, &config)?, &io.output, &config)
        }
        Commands::Fdist { dfn, dfd, cdf, output } => {
            let config = load_config(output.config.as_deref())?;
            let plots = FDistributionPlotting::new(FDistribution::new(dfn, dfd));
            let fig = if cdf {
                plots.cdf(&config.distribution)?
            } else {
                plots.pdf(&config.distribution)?
            };
            emit(&fig, &output, &config)
        }
        Commands::Pca {
            projection,
            dimensions,
            no_components,
            output,
        } => {
            let mut config = load_config(output.config.as_deref())?;
            let projection = load_projection(&projection)?;
            if let Some(d) = dimensions {
                config.pca.dimensions = d;
            }
            if no_components {
                config.pca.with_components = false;
            }
            emit(&principal_components(&projection, &config.pca)?, &output, &config)
        }
        Commands::KnownVsLearned {
            csv,
            known,
            learned,
            kind,
            output,
        } => {
            let config = load_config(output.config.as_deref())?;
            let (known_values, learned_values) = read_columns(&csv, &known, &learned)?;
            let fig = match kind {
                Comparison::Correlation => {
                    diagnostics::correlation(&learned_values, &known_values, &config.correlation)?
                }
                Comparison::Residuals => {
                    diagnostics::residuals(&learned_values, &known_values, &config.residual_plot)?
                }
            };
            emit(&fig, &output, &config)
        }
        Commands::Batch {
            model,
            projection,
            config,
            out_dir,
        } => {
            let model = load_model(&model)?;
            let projection = projection.as_deref().map(load_projection).transpose()?;
            let config = load_config(config.as_deref())?;
            let written = run_batch(&model, projection.as_ref(), &config, &out_dir)?;
            println!("{} figures written to {}", written.len(), out_dir.display());
            Ok(())
        }
        Commands::Demo {
            length,
            order,
            seed,
            nonlinear,
            config,
            out_dir,
        } => {
            if order == 0 || order > length {
                bail!("--order must be between 1 and --length ({length}), got {order}");
            }
            let spec = SyntheticSpec {
                length,
                order,
                seed,
                nonlinear,
                ..Default::default()
            };
            let model = synthetic_model(&spec);
            let projection = synthetic_projection(&model, seed);
            let config = load_config(config.as_deref())?;
            info!(length, order, seed, nonlinear, "rendering demo figures");
            let written = run_batch(&model, Some(&projection), &config, &out_dir)?;
            println!("{} figures written to {}", written.len(), out_dir.display());
            Ok(())
        }
    }
}

/// Default filter: epiplot at `level`, library crates at warn. RUST_LOG wins.
fn log_filter(level: &str) -> String {
    format!("epiplot={level},epistasis_plot=warn")
}

fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(level)));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PlotConfig> {
    match path {
        Some(p) => PlotConfig::from_file(p).with_context(|| format!("loading plot config {}", p.display())),
        None => Ok(PlotConfig::default()),
    }
}

fn load_model(path: &Path) -> Result<FittedModel> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading model {}", path.display()))?;
    let model = FittedModel::from_json(&content).with_context(|| format!("parsing model {}", path.display()))?;
    model
        .validate()
        .with_context(|| format!("validating model {}", path.display()))?;
    debug!(
        genotypes = model.phenotypes.len(),
        terms = model.interactions.len(),
        nonlinear = model.is_nonlinear(),
        "model loaded"
    );
    Ok(model)
}

fn load_projection(path: &Path) -> Result<PcaProjection> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading projection {}", path.display()))?;
    let projection: PcaProjection =
        serde_json::from_str(&content).with_context(|| format!("parsing projection {}", path.display()))?;
    projection
        .validate()
        .with_context(|| format!("validating projection {}", path.display()))?;
    Ok(projection)
}

fn load_inputs(io: &ModelOutput) -> Result<(FittedModel, PlotConfig)> {
    Ok((load_model(&io.model)?, load_config(io.output.config.as_deref())?))
}

/// Read two numeric columns, by header name, from a CSV file.
fn read_columns(path: &Path, known: &str, learned: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("column '{name}' not found in {}", path.display()))
    };
    let known_idx = column(known)?;
    let learned_idx = column(learned)?;

    let mut known_values = Vec::new();
    let mut learned_values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading row {} of {}", row + 1, path.display()))?;
        let parse = |idx: usize, name: &str| -> Result<f64> {
            let field = record.get(idx).unwrap_or("").trim();
            field
                .parse::<f64>()
                .with_context(|| format!("row {}: '{field}' in column '{name}' is not a number", row + 1))
        };
        known_values.push(parse(known_idx, known)?);
        learned_values.push(parse(learned_idx, learned)?);
    }
    Ok((known_values, learned_values))
}

fn build_figure(
    kind: PlotKind,
    model: &FittedModel,
    projection: Option<&PcaProjection>,
    config: &PlotConfig,
) -> Result<Figure> {
    if kind.needs_nonlinear() && !model.is_nonlinear() {
        return Err(ModelError::NotNonlinear.into());
    }
    let regression = RegressionPlotting::new(model);
    let nonlinear = NonlinearPlotting::new(model);
    let fig = match kind {
        PlotKind::Interactions => EpistasisPlotting::new(model).interactions(&config.interactions)?,
        PlotKind::Correlation => regression.correlation(config.residuals.figsize)?,
        PlotKind::Predicted => regression.predicted_phenotypes(config.residuals.figsize)?,
        PlotKind::Residuals => regression.residuals(&config.residuals)?,
        PlotKind::BestFit => regression.best_fit(&config.best_fit)?,
        PlotKind::Magnitude => magnitude_vs_order(model, &config.magnitude)?,
        PlotKind::NonlinearFunction => nonlinear.nonlinear_function(&config.nonlinear_function)?,
        PlotKind::LinearPhenotypes => nonlinear.linear_phenotypes()?,
        PlotKind::NonlinearBestFit => nonlinear.best_fit(&config.best_fit)?,
        PlotKind::NonlinearResiduals => nonlinear.residuals(&config.residuals)?,
        PlotKind::Pca => match projection {
            Some(p) => principal_components(p, &config.pca)?,
            None => bail!("the pca figure needs a projection"),
        },
    };
    Ok(fig)
}

fn run_model_plot(kind: PlotKind, io: &ModelOutput) -> Result<()> {
    let (model, config) = load_inputs(io)?;
    let fig = build_figure(kind, &model, None, &config)?;
    emit(&fig, &io.output, &config)
}

/// Write the SVG and optionally print the figure JSON.
fn emit(fig: &Figure, output: &Output, config: &PlotConfig) -> Result<()> {
    render_to_file(fig, &output.out, config).with_context(|| format!("writing {}", output.out.display()))?;
    if output.dump_json {
        println!("{}", fig.to_json()?);
    }
    Ok(())
}

/// Render every applicable figure in parallel. Returns the written paths in
/// a stable order.
fn run_batch(
    model: &FittedModel,
    projection: Option<&PcaProjection>,
    config: &PlotConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let kinds = PlotKind::batch_kinds(model, config, projection.is_some());
    if !model.is_nonlinear() {
        debug!("linear model, skipping nonlinear figures");
    }
    if projection.is_none() {
        info!("no projection given, skipping the pca figure");
    }
    if config.best_fit.errorbars && model.stdeviations.is_none() {
        warn!("model has no stdeviations, skipping best_fit");
    }

    kinds
        .par_iter()
        .map(|&kind| {
            let fig = build_figure(kind, model, projection, config)
                .with_context(|| format!("building {}", kind.file_stem()))?;
            let path = out_dir.join(format!("{}.svg", kind.file_stem()));
            render_to_file(&fig, &path, config).with_context(|| format!("writing {}", path.display()))?;
            info!(figure = kind.file_stem(), path = %path.display(), "figure written");
            Ok(path)
        })
        .collect()
}
