//! Trendline CLI: detection, batch scan, and manual line commands.
//!
//! Commands:
//! - `detect`: find trend lines in one candle CSV (or a synthetic series)
//! - `scan`: detect over many CSV files in parallel, one summary per file
//! - `lines add|list|clear`: manage the per-owner manual line store

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use trendline_core::data::{
    high_low_series, load_candles_csv, lookback_bars, normalize_timeframe, repair_high_low, Candle,
};
use trendline_core::domain::{Line, LineKind, Side};
use trendline_core::manual::{ManualLineSpec, ManualLineStore, PresetBook};
use trendline_core::overlay::overlay_segments;
use trendline_core::synthetic::broadening_spikes;
use trendline_core::{apply_overrides, DetectConfig, DetectParams, FallbackOutcome};

#[derive(Parser)]
#[command(
    name = "trendline",
    about = "Trendline CLI: automatic trend-line, channel and triangle detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect lines in one candle series and print a summary.
    Detect {
        /// Candle CSV (time,open,high,low,close[,volume]).
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Use a synthetic broadening series of this many bars instead of a CSV.
        #[arg(long)]
        synthetic: Option<usize>,

        #[command(flatten)]
        detect: DetectArgs,

        /// Manual line store directory (enables merging stored lines).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Owner id for the manual line store.
        #[arg(long, requires = "store")]
        owner: Option<String>,

        /// Symbol used to look up manual and preset lines.
        #[arg(long)]
        symbol: Option<String>,

        /// Timeframe label (15m, 1h, 4h, ...). Also sets the default lookback.
        #[arg(long, default_value = "15m")]
        timeframe: String,

        /// Keep only the last N bars. Defaults to the timeframe's lookback.
        #[arg(long)]
        lookback: Option<usize>,

        /// Preset lines TOML file.
        #[arg(long)]
        presets: Option<PathBuf>,

        /// Print the line records as JSON (engine lines, then manual lines).
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print overlay segments (timestamps and prices) as JSON.
        #[arg(long, default_value_t = false, conflicts_with = "json")]
        overlay: bool,

        /// Extra `key=value` overrides: tol, anchors, span, zz.
        overrides: Vec<String>,
    },
    /// Detect over many CSV files in parallel.
    Scan {
        /// Candle CSV files.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        detect: DetectArgs,
    },
    /// Manual line store commands.
    Lines {
        #[command(subcommand)]
        action: LinesAction,
    },
}

/// Detector parameters shared by `detect` and `scan`.
#[derive(Args)]
struct DetectArgs {
    /// TOML config with `[detect]` and `[fallback]` tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the lenient parameter set.
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// Run the primary parameters only.
    #[arg(long, default_value_t = false)]
    no_fallback: bool,

    /// Total trend-line budget (split between resistance and support).
    #[arg(long)]
    max_lines: Option<usize>,

    /// Relative anchor tolerance.
    #[arg(long)]
    tol: Option<f64>,

    /// Minimum anchors per trend line.
    #[arg(long)]
    anchors: Option<usize>,

    /// Minimum span in bars.
    #[arg(long)]
    span: Option<usize>,

    /// Zigzag deviation.
    #[arg(long)]
    zz: Option<f64>,
}

#[derive(Args)]
struct StoreArgs {
    /// Manual line store directory.
    #[arg(long, default_value = "lines")]
    store: PathBuf,

    /// Owner id (letters, digits, '-' and '_').
    #[arg(long)]
    owner: String,

    /// Symbol, e.g. BTC/USDT.
    #[arg(long)]
    symbol: String,

    /// Timeframe label.
    #[arg(long, default_value = "15m")]
    timeframe: String,
}

#[derive(Subcommand)]
enum LinesAction {
    /// Resolve a line against a candle CSV and store it.
    Add {
        #[command(flatten)]
        target: StoreArgs,

        /// Candle CSV the endpoints snap to.
        #[arg(long)]
        csv: PathBuf,

        /// Start timestamp (epoch ms, RFC 3339, or YYYY-MM-DD[ HH:MM[:SS]]).
        #[arg(long)]
        from: String,

        /// End timestamp.
        #[arg(long)]
        to: String,

        /// Line type.
        #[arg(long, default_value = "support")]
        kind: LineKind,

        /// Price side the endpoints use: high or low.
        #[arg(long, default_value = "low")]
        side: Side,

        /// Display color.
        #[arg(long)]
        color: Option<String>,
    },
    /// Print stored lines as JSON.
    List {
        #[command(flatten)]
        target: StoreArgs,
    },
    /// Remove stored lines for the symbol and timeframe.
    Clear {
        #[command(flatten)]
        target: StoreArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            csv,
            synthetic,
            detect,
            store,
            owner,
            symbol,
            timeframe,
            lookback,
            presets,
            json,
            overlay,
            overrides,
        } => {
            let source = match (csv, synthetic) {
                (Some(path), _) => CandleSource::Csv(path),
                (None, Some(n)) => CandleSource::Synthetic(n),
                (None, None) => bail!("one of --csv or --synthetic is required"),
            };
            let manual = ManualSources {
                store,
                owner,
                symbol,
                presets,
            };
            let output = if overlay {
                Output::Overlay
            } else if json {
                Output::Json
            } else {
                Output::Summary
            };
            run_detect(source, &detect, &overrides, manual, &timeframe, lookback, output)
        }
        Commands::Scan { files, detect } => run_scan(&files, &detect),
        Commands::Lines { action } => match action {
            LinesAction::Add {
                target,
                csv,
                from,
                to,
                kind,
                side,
                color,
            } => run_lines_add(&target, &csv, from, to, kind, side, color),
            LinesAction::List { target } => run_lines_list(&target),
            LinesAction::Clear { target } => run_lines_clear(&target),
        },
    }
}

enum CandleSource {
    Csv(PathBuf),
    Synthetic(usize),
}

struct ManualSources {
    store: Option<PathBuf>,
    owner: Option<String>,
    symbol: Option<String>,
    presets: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Output {
    Summary,
    Json,
    Overlay,
}

/// Config file (or defaults), then `--lenient`, then explicit flags, then
/// `key=value` overrides. The result is validated.
fn build_config(args: &DetectArgs, overrides: &[String]) -> Result<DetectConfig> {
    let mut config = match &args.config {
        Some(path) => DetectConfig::from_file(path)?,
        None => DetectConfig::default(),
    };
    if args.lenient {
        config.detect = DetectParams {
            swing_window: config.detect.swing_window,
            ..DetectParams::lenient()
        };
    }
    if let Some(v) = args.max_lines {
        config.detect.max_lines = v;
    }
    if let Some(v) = args.tol {
        config.detect.tolerance = v;
    }
    if let Some(v) = args.anchors {
        config.detect.min_anchors = v;
    }
    if let Some(v) = args.span {
        config.detect.min_span = v;
    }
    if let Some(v) = args.zz {
        config.detect.zz_dev = v;
    }
    for skipped in apply_overrides(&mut config.detect, overrides) {
        log::warn!("ignoring override '{skipped}'");
    }
    if args.no_fallback {
        config.fallback.enabled = false;
    }
    config.detect.validate()?;
    log::debug!("detect params {}", config.detect.fingerprint());
    Ok(config)
}

fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let mut candles =
        load_candles_csv(path).with_context(|| format!("loading {}", path.display()))?;
    // Repairs are logged by the library.
    repair_high_low(&mut candles);
    Ok(candles)
}

/// Synthetic 15-minute candles built from the broadening series.
fn synthetic_candles(n: usize) -> Result<Vec<Candle>> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("synthetic start date")?;
    let (highs, lows) = broadening_spikes(n);
    Ok(highs
        .into_iter()
        .zip(lows)
        .enumerate()
        .map(|(i, (high, low))| {
            let mid = (high + low) / 2.0;
            Candle {
                time: start + chrono::Duration::minutes(15 * i as i64),
                open: mid,
                high,
                low,
                close: mid,
                volume: 0.0,
            }
        })
        .collect())
}

fn detect_candles(candles: &[Candle], config: &DetectConfig) -> Result<FallbackOutcome> {
    let (highs, lows) = high_low_series(candles);
    Ok(config.policy().detect(&highs, &lows, &config.detect)?)
}

fn format_summary(outcome: &FallbackOutcome) -> String {
    let s = &outcome.detection.summary;
    format!(
        "lines: {} | res {} | sup {} | ch {} | tri {} | fallback {}",
        s.total(),
        s.resistance,
        s.support,
        s.channels(),
        s.triangles(),
        if outcome.fallback_used { "yes" } else { "no" },
    )
}

fn run_detect(
    source: CandleSource,
    args: &DetectArgs,
    overrides: &[String],
    manual: ManualSources,
    timeframe: &str,
    lookback: Option<usize>,
    output: Output,
) -> Result<()> {
    let config = build_config(args, overrides)?;
    let timeframe = normalize_timeframe(timeframe);

    let mut candles = match &source {
        CandleSource::Csv(path) => load_candles(path)?,
        CandleSource::Synthetic(n) => synthetic_candles(*n)?,
    };
    let keep = lookback.unwrap_or_else(|| lookback_bars(timeframe));
    if candles.len() > keep {
        candles.drain(..candles.len() - keep);
    }

    let outcome = detect_candles(&candles, &config)?;
    let manual_lines = collect_manual_lines(&manual, timeframe, &candles)?;

    let mut lines = outcome.detection.lines.clone();
    lines.extend(manual_lines.iter().cloned());

    match output {
        Output::Summary => {
            println!("{}", format_summary(&outcome));
            if !manual_lines.is_empty() {
                println!("manual: {}", manual_lines.len());
            }
        }
        Output::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
        Output::Overlay => {
            let segments = overlay_segments(&candles, &lines);
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
    }
    Ok(())
}

fn collect_manual_lines(
    manual: &ManualSources,
    timeframe: &str,
    candles: &[Candle],
) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let Some(symbol) = manual.symbol.as_deref() else {
        if manual.store.is_some() || manual.presets.is_some() {
            log::warn!("--symbol not given; skipping manual lines");
        }
        return Ok(lines);
    };

    match (&manual.store, &manual.owner) {
        (Some(dir), Some(owner)) => {
            let store = ManualLineStore::new(dir);
            lines.extend(store.list(owner, symbol, timeframe)?);
        }
        (Some(_), None) => log::warn!("--owner not given; skipping stored lines"),
        _ => {}
    }
    if let Some(path) = &manual.presets {
        let book = PresetBook::from_file(path)?;
        lines.extend(book.lines_for(symbol, timeframe, candles)?);
    }
    Ok(lines)
}

fn run_scan(files: &[PathBuf], args: &DetectArgs) -> Result<()> {
    let config = build_config(args, &[])?;

    // par_iter + collect keeps input order.
    let results: Vec<Result<FallbackOutcome>> = files
        .par_iter()
        .map(|path| {
            let candles = load_candles(path)?;
            detect_candles(&candles, &config)
                .with_context(|| format!("detecting {}", path.display()))
        })
        .collect();

    let mut failed = 0;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(outcome) => println!("{}: {}", path.display(), format_summary(&outcome)),
            Err(err) => {
                eprintln!("{}: {err:#}", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} files failed", files.len());
        std::process::exit(1);
    }
    Ok(())
}

fn run_lines_add(
    target: &StoreArgs,
    csv: &Path,
    from: String,
    to: String,
    kind: LineKind,
    side: Side,
    color: Option<String>,
) -> Result<()> {
    let candles = load_candles(csv)?;
    let mut spec = ManualLineSpec::new(kind, side, from, to);
    if let Some(color) = color {
        spec.color = color;
    }
    let line = spec.resolve(&candles)?;
    let timeframe = normalize_timeframe(&target.timeframe);

    let store = ManualLineStore::new(&target.store);
    store.add(&target.owner, &target.symbol, timeframe, line.clone())?;
    println!(
        "added {} {}..{} (slope {:.6}) to {}",
        line.kind,
        line.i0,
        line.i1,
        line.slope,
        store.dir().display()
    );
    Ok(())
}

fn run_lines_list(target: &StoreArgs) -> Result<()> {
    let store = ManualLineStore::new(&target.store);
    let lines = store.list(
        &target.owner,
        &target.symbol,
        normalize_timeframe(&target.timeframe),
    )?;
    println!("{}", serde_json::to_string_pretty(&lines)?);
    Ok(())
}

fn run_lines_clear(target: &StoreArgs) -> Result<()> {
    let store = ManualLineStore::new(&target.store);
    let removed = store.clear(
        &target.owner,
        &target.symbol,
        normalize_timeframe(&target.timeframe),
    )?;
    println!("removed {removed} lines");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_flags() -> DetectArgs {
        DetectArgs {
            config: None,
            lenient: false,
            no_fallback: false,
            max_lines: None,
            tol: None,
            anchors: None,
            span: None,
            zz: None,
        }
    }

    fn config_file(dir: &Path) -> PathBuf {
        let path = dir.join("detect.toml");
        std::fs::write(
            &path,
            "[detect]\nmax_lines = 9\ntolerance = 0.03\nmin_span = 30\nswing_window = 4\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn config_file_values_survive_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let args = DetectArgs {
            config: Some(config_file(dir.path())),
            ..no_flags()
        };
        let config = build_config(&args, &[]).unwrap();
        assert_eq!(config.detect.max_lines, 9);
        assert_eq!(config.detect.tolerance, 0.03);
        assert_eq!(config.detect.min_span, 30);
        assert_eq!(config.detect.min_anchors, 3);
        assert!(config.fallback.enabled);
    }

    #[test]
    fn lenient_then_flags_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let args = DetectArgs {
            config: Some(config_file(dir.path())),
            lenient: true,
            no_fallback: true,
            anchors: Some(4),
            span: Some(15),
            ..no_flags()
        };
        let overrides = vec!["anchors=5".to_string(), "zz=0.02".to_string(), "bogus".to_string()];
        let config = build_config(&args, &overrides).unwrap();

        // --lenient replaces the file's thresholds but keeps its swing window.
        assert_eq!(config.detect.max_lines, 7);
        assert_eq!(config.detect.tolerance, 0.02);
        assert_eq!(config.detect.swing_window, 4);
        // Explicit flag beats --lenient; key=value beats the flag.
        assert_eq!(config.detect.min_span, 15);
        assert_eq!(config.detect.min_anchors, 5);
        assert_eq!(config.detect.zz_dev, 0.02);
        assert!(!config.fallback.enabled);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        let args = DetectArgs {
            anchors: Some(0),
            ..no_flags()
        };
        assert!(build_config(&args, &[]).is_err());
    }

    #[test]
    fn stored_lines_need_an_owner() {
        let dir = tempfile::tempdir().unwrap();
        let store = ManualLineStore::new(dir.path());
        let line = Line::new(LineKind::Support, 0.0, 100.0, 2, 8, Vec::new());
        store.add("42", "ETH/USDT", "15m", line).unwrap();

        let mut manual = ManualSources {
            store: Some(dir.path().to_path_buf()),
            owner: None,
            symbol: Some("ETH/USDT".to_string()),
            presets: None,
        };
        assert!(collect_manual_lines(&manual, "15m", &[]).unwrap().is_empty());

        manual.owner = Some("42".to_string());
        assert_eq!(collect_manual_lines(&manual, "15m", &[]).unwrap().len(), 1);
    }
}
