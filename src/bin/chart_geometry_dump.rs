use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use zone_chart::api::{ChartComposer, ComposerPhase, MetricKind, ThresholdTable, ValueTick};
use zone_chart::core::{Region, Viewport, points_from_records, records_from_json_str};
use zone_chart::telemetry;

const USAGE: &str = "usage: chart_geometry_dump --input <records.json> \
    [--metric <case_growth_rate|hospital_usage|positive_tests>] \
    [--thresholds <table.json>] [--width <px>] [--height <px>] [--output <path>]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    metric: MetricKind,
    thresholds: Option<PathBuf>,
    width: u32,
    height: u32,
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GeometryDump {
    phase: &'static str,
    metric: MetricKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartDump>,
}

#[derive(Debug, Serialize)]
struct ChartDump {
    points: usize,
    active_zone: String,
    last_value_label: String,
    truncation_point: String,
    confirmed_points: usize,
    projected_points: usize,
    regions: Vec<Region>,
    ticks: Vec<ValueTick>,
    hover_cells: usize,
}

fn main() {
    let _ = telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let records = records_from_json_str(&raw).map_err(|err| err.to_string())?;

    let thresholds = match &args.thresholds {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            let table = ThresholdTable::from_json_str(&raw).map_err(|err| err.to_string())?;
            table
                .require(args.metric)
                .map_err(|err| err.to_string())?
                .clone()
        }
        None => args.metric.thresholds().map_err(|err| err.to_string())?,
    };

    let config = args
        .metric
        .chart_config(Viewport::new(args.width, args.height));
    let points = points_from_records(&records, &config.metric_fields);
    let mut composer = ChartComposer::new(config, thresholds).map_err(|err| err.to_string())?;
    composer.set_series(points);
    composer.prepare().map_err(|err| err.to_string())?;

    let chart = match composer.phase() {
        ComposerPhase::Ready(geometry) => Some(ChartDump {
            points: geometry.scaled_points().len(),
            active_zone: geometry.active_zone.clone(),
            last_value_label: geometry.last_value_annotation.text.clone(),
            truncation_point: geometry.truncation.truncation_point.timestamp.to_rfc3339(),
            confirmed_points: geometry.truncation.confirmed.len(),
            projected_points: geometry.truncation.projected.len(),
            regions: geometry.regions.clone(),
            ticks: geometry.ticks.clone(),
            hover_cells: geometry.hover_cells().len(),
        }),
        _ => None,
    };
    let dump = GeometryDump {
        phase: composer.phase().name(),
        metric: args.metric,
        chart,
    };

    let json = serde_json::to_string_pretty(&dump)
        .map_err(|err| format!("failed to serialize geometry: {err}"))?;
    match &args.output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);

    let mut input = None::<PathBuf>;
    let mut metric = MetricKind::CaseGrowthRate;
    let mut thresholds = None::<PathBuf>;
    let mut width = zone_chart::api::DEFAULT_CHART_WIDTH;
    let mut height = zone_chart::api::DEFAULT_CHART_HEIGHT;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--input" => input = Some(PathBuf::from(value()?)),
            "--metric" => metric = parse_metric(&value()?)?,
            "--thresholds" => thresholds = Some(PathBuf::from(value()?)),
            "--width" => width = parse_px(&value()?)?,
            "--height" => height = parse_px(&value()?)?,
            "--output" => output = Some(PathBuf::from(value()?)),
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let input = input.ok_or_else(|| format!("missing --input\n{USAGE}"))?;
    Ok(CliArgs {
        input,
        metric,
        thresholds,
        width,
        height,
        output,
    })
}

fn parse_metric(raw: &str) -> Result<MetricKind, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|_| format!("unknown metric `{raw}`\n{USAGE}"))
}

fn parse_px(raw: &str) -> Result<u32, String> {
    raw.parse()
        .map_err(|err| format!("invalid pixel size `{raw}`: {err}"))
}
