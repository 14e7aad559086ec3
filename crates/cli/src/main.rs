use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use locellipse::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod batch;
mod provenance;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "locellipse")]
#[command(about = "Error-ellipse geometry from quadratic-form coefficients")]
struct Cmd {
    /// Optional run tag; propagated to provenance sidecars and logs
    #[arg(long, global = true)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

/// Coefficients of c0·x² + c1·x·y + c2·y² = c3 (x north, y east).
#[derive(Args, Clone, Debug)]
struct EllipseArgs {
    #[arg(
        long,
        num_args = 4,
        required = true,
        allow_negative_numbers = true,
        value_names = ["C0", "C1", "C2", "C3"]
    )]
    coeff: Vec<f64>,
    /// Replace c3 (κ²) after the axes are derived
    #[arg(long, allow_negative_numbers = true)]
    scale: Option<f64>,
}

#[derive(Subcommand)]
enum Action {
    /// Print the ellipse record (axis lengths, trend, area)
    Axes {
        #[command(flatten)]
        ellipse: EllipseArgs,
        #[arg(long)]
        json: bool,
    },
    /// Distance from the center to the perimeter along a direction
    Distance {
        #[command(flatten)]
        ellipse: EllipseArgs,
        /// Azimuth in degrees from the x (north) axis
        #[arg(long, allow_negative_numbers = true, conflicts_with = "direction")]
        azimuth: Option<f64>,
        /// Unit direction [north, east]
        #[arg(long, num_args = 2, allow_negative_numbers = true, value_names = ["N", "E"])]
        direction: Option<Vec<f64>>,
        /// Ignore the scale coefficient c3
        #[arg(long)]
        unscaled: bool,
    },
    /// Write perimeter offsets (north, east) to a CSV or Parquet table
    Boundary {
        #[command(flatten)]
        ellipse: EllipseArgs,
        #[arg(long, default_value_t = 100)]
        points: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Summarize a table of coefficient rows (columns c0..c3)
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Replace c3 (κ²) on every row
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Print reproducible random ellipses
    Sample {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 5)]
        count: u64,
    },
    /// Parse a text record (`name = value` lines) and print it as JSON
    Read {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Axes { ellipse, json } => axes(&ellipse, json),
        Action::Distance {
            ellipse,
            azimuth,
            direction,
            unscaled,
        } => distance(&ellipse, azimuth, direction, unscaled),
        Action::Boundary {
            ellipse,
            points,
            out,
        } => boundary(&ellipse, points, out, cmd.tag),
        Action::Batch { input, out, scale } => run_batch(input, out, scale, cmd.tag),
        Action::Sample { seed, count } => sample(seed, count),
        Action::Read { input } => read(input),
    }
}

fn build(args: &EllipseArgs) -> Result<Ellipse> {
    let mut e = Ellipse::new();
    e.initialize(Location::default(), Some(args.coeff.as_slice()))
        .context("initializing ellipse")?;
    batch::apply_scale(&mut e, args.scale);
    if !e.is_valid() {
        tracing::warn!(coeff = ?e.coefficients(), "coefficients do not describe a valid ellipse");
    }
    Ok(e)
}

fn axes(args: &EllipseArgs, as_json: bool) -> Result<()> {
    tracing::info!(coeff = ?args.coeff, scale = ?args.scale, "axes");
    let e = build(args)?;
    let record = e.to_record()?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        let mut text = KeyValueRecord::default();
        record.write_to(&mut text);
        print!("{text}");
    }
    Ok(())
}

fn distance(
    args: &EllipseArgs,
    azimuth: Option<f64>,
    direction: Option<Vec<f64>>,
    unscaled: bool,
) -> Result<()> {
    tracing::info!(coeff = ?args.coeff, ?azimuth, ?direction, unscaled, "distance");
    let e = build(args)?;
    let d = match (azimuth, direction) {
        (Some(az), None) => {
            let (s, c) = az.to_radians().sin_cos();
            e.distance_to_perimeter(&[c, s], !unscaled)?
        }
        (None, Some(v)) => e.distance_to_perimeter(&v, !unscaled)?,
        _ => bail!("pass exactly one of --azimuth or --direction"),
    };
    println!("{d}");
    Ok(())
}

fn boundary(args: &EllipseArgs, points: usize, out: PathBuf, tag: Option<String>) -> Result<()> {
    tracing::info!(coeff = ?args.coeff, points, out = %out.display(), "boundary");
    let e = build(args)?;
    let pts = e.boundary_points(points)?;
    if pts.is_empty() {
        tracing::warn!("invalid ellipse; boundary table is empty");
    }
    let mut df = batch::boundary_frame(&pts)?;
    batch::write_frame(&out, &mut df)?;
    let params = json!({
        "command": "boundary",
        "coeff": args.coeff,
        "scale": args.scale,
        "points": points,
        "record": e.to_record()?,
    });
    write_sidecar(&out, Payload::new(params, tag))?;
    Ok(())
}

fn run_batch(input: PathBuf, out: PathBuf, scale: Option<f64>, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?scale, "batch");
    let coeffs = batch::read_coefficients(&input)?;
    let rows = batch::summarize(&coeffs, scale)?;
    let invalid = rows.iter().filter(|r| !r.valid).count();
    tracing::info!(rows = rows.len(), invalid, "batch_summary");
    let mut df = batch::records_frame(&rows)?;
    batch::write_frame(&out, &mut df)?;
    let params = json!({
        "command": "batch",
        "input": input.to_string_lossy(),
        "scale": scale,
        "rows": rows.len(),
        "invalid_rows": invalid,
    });
    write_sidecar(&out, Payload::new(params, tag))?;
    Ok(())
}

#[derive(Serialize)]
struct SampleRow {
    seed: u64,
    index: u64,
    coeff: Coefficients,
    record: EllipseRecord,
}

fn sample(seed: u64, count: u64) -> Result<()> {
    tracing::info!(seed, count, "sample");
    let cfg = SampleCfg::default();
    for index in 0..count {
        let e = draw_ellipse(cfg, ReplayToken::new(seed, index))?;
        let coeff = *e.coefficients().context("sampled ellipse has coefficients")?;
        let row = SampleRow {
            seed,
            index,
            coeff,
            record: e.to_record()?,
        };
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

fn read(input: PathBuf) -> Result<()> {
    tracing::info!(input = %input.display(), "read");
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let mut kv = KeyValueRecord::parse(&text)?;
    if kv.class_name() != EllipseRecord::CLASS_NAME {
        bail!(
            "{} holds a `{}` record, expected `{}`",
            input.display(),
            kv.class_name(),
            EllipseRecord::CLASS_NAME
        );
    }
    let record = EllipseRecord::read_from(&mut kv)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
