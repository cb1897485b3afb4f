//! Gutenberg-Richter b-value analysis CLI
//!
//! The main entry point for gr-core, handling:
//! - Catalog loading and the b-value estimate
//! - Frequency-magnitude binning and the plot payload
//! - Map extent for the map collaborator
//! - Catalog query URLs for the retrieval collaborator

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use gr_common::{CatalogQuery, Error, OutputFormat, RunId, SeismicEvent};
use gr_config::{validate_analysis, AnalysisConfig, ConfigSnapshot};
use gr_core::analysis::{analyze, AnalysisError};
use gr_core::catalog::{magnitudes, read_catalog};
use gr_core::config::{load_config, ConfigOptions, ResolvedConfig};
use gr_core::exit_codes::ExitCode;
use gr_core::logging::{
    event_names, get_host_id, init_logging, LogConfig, LogContext, LogFormat, Stage,
};
use gr_core::log_event;
use gr_core::map::map_extent;
use gr_core::output::{render, render_error, ConfigReport, QueryRequest, Render, VersionInfo};
use gr_math::{estimate, histogram, BValueEstimate, MagnitudeCatalog};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Gutenberg-Richter b-value analysis of earthquake catalogs
#[derive(Parser)]
#[command(name = "gr-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to analysis.json (overrides GR_BVALUE_CONFIG and the search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate b and bin the catalog; emits the full plot payload
    Analyze(EstimateArgs),

    /// Estimate a, b and their uncertainties only
    Estimate(EstimateArgs),

    /// Bin the catalog into a frequency-magnitude distribution
    Histogram(HistogramArgs),

    /// Region, symbol sizes and depth range for the epicentre map
    Map(CatalogArg),

    /// Build the FDSN event request for the catalog retrieval collaborator
    Query(QueryArgs),

    /// Show or validate the analysis configuration
    Config(ConfigArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct CatalogArg {
    /// Catalog CSV (Origin Time,Latitude,Longitude,Magnitude,Depth)
    catalog: PathBuf,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[command(flatten)]
    input: CatalogArg,

    /// Magnitude of completeness (overrides the config file)
    #[arg(long, allow_negative_numbers = true)]
    mc: Option<f64>,

    /// Magnitude bin width (overrides the config file)
    #[arg(long)]
    mbin: Option<f64>,
}

#[derive(Args, Debug)]
struct HistogramArgs {
    #[command(flatten)]
    input: CatalogArg,

    /// Magnitude bin width (overrides the config file)
    #[arg(long)]
    mbin: Option<f64>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Contributing catalog
    #[arg(long)]
    catalog: Option<String>,

    /// FDSN event service endpoint
    #[arg(long, default_value = gr_common::query::DEFAULT_FDSN_BASE)]
    base_url: String,

    #[arg(long, allow_negative_numbers = true)]
    min_latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max_latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    min_longitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max_longitude: Option<f64>,

    /// Start of the time window (RFC 3339)
    #[arg(long)]
    start_time: Option<DateTime<Utc>>,

    /// End of the time window (RFC 3339)
    #[arg(long)]
    end_time: Option<DateTime<Utc>>,

    #[arg(long, allow_negative_numbers = true)]
    min_magnitude: Option<f64>,

    #[arg(long)]
    max_magnitude: Option<f64>,

    #[arg(long)]
    min_depth: Option<f64>,

    #[arg(long)]
    max_depth: Option<f64>,
}

impl QueryArgs {
    fn to_query(&self) -> CatalogQuery {
        let mut query = CatalogQuery::default();
        if let Some(catalog) = &self.catalog {
            query.catalog = catalog.clone();
        }
        let replace = |slot: &mut f64, value: Option<f64>| {
            if let Some(v) = value {
                *slot = v;
            }
        };
        replace(&mut query.min_latitude, self.min_latitude);
        replace(&mut query.max_latitude, self.max_latitude);
        replace(&mut query.min_longitude, self.min_longitude);
        replace(&mut query.max_longitude, self.max_longitude);
        replace(&mut query.min_magnitude, self.min_magnitude);
        replace(&mut query.max_magnitude, self.max_magnitude);
        replace(&mut query.min_depth_km, self.min_depth);
        replace(&mut query.max_depth_km, self.max_depth);
        if let Some(t) = self.start_time {
            query.start_time = t;
        }
        if let Some(t) = self.end_time {
            query.end_time = t;
        }
        query
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,

    /// Validate a configuration file (defaults to the resolved one)
    Validate {
        /// Path to analysis.json
        path: Option<PathBuf>,
    },
}

/// Per-invocation state shared by the command handlers.
struct Run<'a> {
    global: &'a GlobalOpts,
    run_id: RunId,
    log: LogContext,
}

impl Run<'_> {
    fn emit<T: Render + Serialize>(
        &self,
        config: Option<&ConfigSnapshot>,
        payload: &T,
    ) -> Result<(), Error> {
        let text = render(self.global.format, &self.run_id, config, payload)?;
        println!("{}", text);
        Ok(())
    }

    fn fail(&self, error: &Error) -> ExitCode {
        let exit_code = ExitCode::from(error);
        let event = match error {
            Error::DegenerateEstimate { .. } => event_names::ESTIMATE_DEGENERATE,
            Error::Config(_) | Error::InvalidConfig(_) => event_names::CONFIG_ERROR,
            _ => event_names::INTERNAL_ERROR,
        };
        log_event!(
            self.log,
            ERROR,
            event,
            Stage::Report,
            error.to_string(),
            code = error.code(),
            exit_code = exit_code.as_i32()
        );
        let use_color = !self.global.no_color && std::io::stderr().is_terminal();
        eprintln!(
            "{}",
            render_error(self.global.format, &self.run_id, error, use_color)
        );
        exit_code
    }

    fn load_config(&self, mc: Option<f64>, mbin: Option<f64>) -> Result<ResolvedConfig, Error> {
        let options = ConfigOptions {
            config_path: self.global.config.clone(),
            completeness_magnitude: mc,
            bin_width: mbin,
        };
        let config = load_config(&options).map_err(|e| e.to_common())?;
        match &config.paths.analysis {
            Some(path) => log_event!(
                self.log,
                INFO,
                event_names::CONFIG_LOADED,
                Stage::Load,
                "analysis config loaded",
                path = tracing::field::display(path.display()),
                source = tracing::field::display(config.paths.analysis_source)
            ),
            None => log_event!(
                self.log,
                DEBUG,
                event_names::CONFIG_DEFAULT_USED,
                Stage::Load,
                "no analysis.json found; using defaults"
            ),
        }
        Ok(config)
    }

    fn load_events(&self, path: &Path) -> Result<Vec<SeismicEvent>, Error> {
        let events = read_catalog(path).map_err(|e| e.to_common())?;
        log_event!(
            self.log,
            INFO,
            event_names::CATALOG_LOADED,
            Stage::Load,
            "catalog read",
            path = tracing::field::display(path.display()),
            events = events.len()
        );
        Ok(events)
    }

    fn load_magnitudes(&self, path: &Path) -> Result<MagnitudeCatalog, Error> {
        let events = self.load_events(path)?;
        magnitudes(&events).map_err(|e| Error::InvalidCatalog(e.to_string()))
    }

    fn log_estimate(&self, outcome: &BValueEstimate) {
        match outcome.fit() {
            Some(fit) => log_event!(
                self.log,
                INFO,
                event_names::ESTIMATE_FITTED,
                Stage::Estimate,
                "b-value fitted",
                b = fit.b,
                a = fit.a,
                n = fit.n
            ),
            None => log_event!(
                self.log,
                WARN,
                event_names::ESTIMATE_INSUFFICIENT,
                Stage::Estimate,
                "fewer than two events above the cutoff",
                selected = outcome.selected()
            ),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let code = if err.use_stderr() {
                ExitCode::ArgsError.as_i32()
            } else {
                ExitCode::Clean.as_i32()
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let cli_level = LogConfig::level_from_flags(cli.global.verbose, cli.global.quiet);
    // Machine payloads default to JSONL logs; GR_LOG_FORMAT can still say otherwise.
    let default_log_format = cli.global.format.is_machine().then_some(LogFormat::Jsonl);
    init_logging(&LogConfig::from_env(cli_level, default_log_format));

    let run_id = RunId::new();
    let run = Run {
        global: &cli.global,
        log: LogContext::new(run_id.to_string(), get_host_id()),
        run_id,
    };
    log_event!(
        run.log,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "gr-core started",
        version = env!("CARGO_PKG_VERSION")
    );

    let result = match &cli.command {
        Commands::Analyze(args) => run_analyze(&run, args),
        Commands::Estimate(args) => run_estimate(&run, args),
        Commands::Histogram(args) => run_histogram(&run, args),
        Commands::Map(args) => run_map(&run, args),
        Commands::Query(args) => run_query(&run, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&run),
            ConfigCommands::Validate { path } => run_config_validate(&run, path.as_deref()),
        },
        Commands::Version => run
            .emit(None, &VersionInfo::current())
            .map(|_| ExitCode::Clean),
    };

    let exit_code = result.unwrap_or_else(|e| run.fail(&e));
    log_event!(
        run.log,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Report,
        "gr-core finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(run: &Run, args: &EstimateArgs) -> Result<ExitCode, Error> {
    let config = run.load_config(args.mc, args.mbin)?;
    let catalog = run.load_magnitudes(&args.input.catalog)?;

    let report = analyze(&catalog, &config.analysis).map_err(|e: AnalysisError| e.to_common())?;
    log_event!(
        run.log,
        INFO,
        event_names::BIN_FINISHED,
        Stage::Bin,
        "distribution binned",
        bins = report.midpoints.len()
    );
    match &report.fit {
        Some(fit) => log_event!(
            run.log,
            INFO,
            event_names::ESTIMATE_FITTED,
            Stage::Estimate,
            fit.b_label.as_str(),
            a = fit.fit.a,
            n = fit.fit.n
        ),
        None => log_event!(
            run.log,
            WARN,
            event_names::ESTIMATE_INSUFFICIENT,
            Stage::Estimate,
            "fewer than two events above the cutoff",
            selected = report.selected
        ),
    }

    run.emit(Some(&config.snapshot()), &report)?;
    Ok(if report.is_insufficient() {
        ExitCode::InsufficientData
    } else {
        ExitCode::Clean
    })
}

fn run_estimate(run: &Run, args: &EstimateArgs) -> Result<ExitCode, Error> {
    let config = run.load_config(args.mc, args.mbin)?;
    let catalog = run.load_magnitudes(&args.input.catalog)?;

    let outcome = estimate(
        &catalog,
        config.analysis.bin_width,
        config.analysis.completeness_magnitude,
    )
    .map_err(|e| AnalysisError::from(e).to_common())?;
    run.log_estimate(&outcome);

    run.emit(Some(&config.snapshot()), &outcome)?;
    Ok(if outcome.is_insufficient() {
        ExitCode::InsufficientData
    } else {
        ExitCode::Clean
    })
}

fn run_histogram(run: &Run, args: &HistogramArgs) -> Result<ExitCode, Error> {
    let config = run.load_config(None, args.mbin)?;
    let catalog = run.load_magnitudes(&args.input.catalog)?;

    let distribution = histogram(&catalog, config.analysis.bin_width)
        .map_err(|e| AnalysisError::from(e).to_common())?;
    log_event!(
        run.log,
        INFO,
        event_names::BIN_FINISHED,
        Stage::Bin,
        "distribution binned",
        bins = distribution.len()
    );

    run.emit(Some(&config.snapshot()), &distribution)?;
    Ok(ExitCode::Clean)
}

fn run_map(run: &Run, args: &CatalogArg) -> Result<ExitCode, Error> {
    let events = run.load_events(&args.catalog)?;
    let extent = map_extent(&events).map_err(|e| e.to_common())?;
    run.emit(None, &extent)?;
    Ok(ExitCode::Clean)
}

fn run_query(run: &Run, args: &QueryArgs) -> Result<ExitCode, Error> {
    let query = args.to_query();
    let url = query
        .to_url(&args.base_url)
        .map_err(|e| Error::InvalidQuery(e.to_string()))?;
    let request = QueryRequest {
        query,
        base_url: args.base_url.clone(),
        url,
    };
    run.emit(None, &request)?;
    Ok(ExitCode::Clean)
}

fn run_config_show(run: &Run) -> Result<ExitCode, Error> {
    let config = run.load_config(None, None)?;
    let report = ConfigReport {
        command: "config show",
        snapshot: config.snapshot(),
        description: config.analysis.description.clone(),
        valid: None,
    };
    run.emit(None, &report)?;
    Ok(ExitCode::Clean)
}

fn run_config_validate(run: &Run, path: Option<&Path>) -> Result<ExitCode, Error> {
    let (snapshot, description) = match path {
        Some(path) => {
            let analysis = AnalysisConfig::from_file(path)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
            validate_analysis(&analysis).map_err(|e| Error::InvalidConfig(e.to_string()))?;
            let paths = gr_config::ConfigPaths {
                analysis: Some(path.to_path_buf()),
                analysis_source: gr_config::ConfigSource::CliArgument,
            };
            (ConfigSnapshot::new(&analysis, &paths), analysis.description)
        }
        None => {
            let config = run.load_config(None, None)?;
            (config.snapshot(), config.analysis.description)
        }
    };

    let report = ConfigReport {
        command: "config validate",
        snapshot,
        description,
        valid: Some(true),
    };
    run.emit(None, &report)?;
    Ok(ExitCode::Clean)
}
