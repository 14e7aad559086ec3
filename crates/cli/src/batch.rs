//! Table I/O for the `batch` and `boundary` commands (polars).
//!
//! Input tables carry one ellipse per row in columns `c0..c3`; output tables
//! carry the record fields plus a validity flag. `.parquet` outputs are written
//! as Parquet, anything else as CSV.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use locellipse::prelude::Vec2;
use locellipse::{Coefficients, Ellipse, EllipseRecord, Location};
use polars::prelude::*;

pub const COEFF_COLUMNS: [&str; 4] = ["c0", "c1", "c2", "c3"];

/// One summarized input row.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchRow {
    pub valid: bool,
    pub record: EllipseRecord,
}

/// Derive a record per coefficient row; `scale` overrides `c3` when given.
pub fn summarize(coeffs: &[Coefficients], scale: Option<f64>) -> Result<Vec<BatchRow>> {
    coeffs
        .iter()
        .enumerate()
        .map(|(row, &coeff)| {
            let mut e = Ellipse::with_coefficients(Location::default(), coeff);
            apply_scale(&mut e, scale);
            if !e.is_valid() {
                tracing::debug!(row, ?coeff, "row is not a valid ellipse");
            }
            let record = e
                .to_record()
                .with_context(|| format!("summarizing row {row}"))?;
            Ok(BatchRow {
                valid: e.is_valid(),
                record,
            })
        })
        .collect()
}

/// Replace `c3` with `scale`, but only on an ellipse that derived validly.
///
/// A form rejected at derivation keeps its invalid `c3`; rescaling it would
/// turn the not-available fill back into a positive scale.
pub fn apply_scale(e: &mut Ellipse, scale: Option<f64>) {
    let Some(k) = scale else {
        return;
    };
    if e.is_valid() {
        e.set_scale_factor(k);
    } else {
        tracing::debug!(coeff = ?e.coefficients(), "skipping scale override on invalid ellipse");
    }
}

/// Read `c0..c3` from a CSV table; missing cells become NaN.
pub fn read_coefficients(path: &Path) -> Result<Vec<Coefficients>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    let mut columns = Vec::with_capacity(COEFF_COLUMNS.len());
    for name in COEFF_COLUMNS {
        columns.push(column_f64(&df, name)?);
    }
    Ok((0..df.height())
        .map(|i| [columns[0][i], columns[1][i], columns[2][i], columns[3][i]])
        .collect())
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df
        .column(name)
        .with_context(|| format!("input table has no column `{name}`"))?
        .cast(&DataType::Float64)?;
    Ok(col
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

pub fn records_frame(rows: &[BatchRow]) -> Result<DataFrame> {
    let [format, major, minor, trend, area] = EllipseRecord::FIELDS;
    let df = polars::df!(
        "row" => (0..rows.len() as u64).collect::<Vec<_>>(),
        "valid" => rows.iter().map(|r| r.valid).collect::<Vec<_>>(),
        format => rows.iter().map(|r| r.record.format).collect::<Vec<_>>(),
        major => rows.iter().map(|r| r.record.major_axis_length).collect::<Vec<_>>(),
        minor => rows.iter().map(|r| r.record.minor_axis_length).collect::<Vec<_>>(),
        trend => rows.iter().map(|r| r.record.trend_degrees).collect::<Vec<_>>(),
        area => rows.iter().map(|r| r.record.area).collect::<Vec<_>>()
    )?;
    Ok(df)
}

/// Boundary offsets as `north, east` columns.
pub fn boundary_frame(points: &[Vec2<f64>]) -> Result<DataFrame> {
    let df = polars::df!(
        "north" => points.iter().map(|p| p.x).collect::<Vec<_>>(),
        "east" => points.iter().map(|p| p.y).collect::<Vec<_>>()
    )?;
    Ok(df)
}

/// Write `df` as Parquet when `path` ends in `.parquet`, else as CSV.
pub fn write_frame(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "parquet") {
        ParquetWriter::new(&mut file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn summarize_flags_invalid_rows() {
        let rows = summarize(
            &[[1.0, 0.0, 1.0, 1.0], [1.0, 0.0, -1.0, 1.0], [0.25, 0.0, 1.0, 1.0]],
            None,
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].valid);
        assert!(!rows[1].valid);
        assert_eq!(rows[1].record.area, 0.0);
        assert!((rows[2].record.major_axis_length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn summarize_applies_scale_override() {
        let rows = summarize(&[[0.25, 0.0, 1.0, 1.0]], Some(4.0)).unwrap();
        assert!((rows[0].record.major_axis_length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn scale_override_keeps_rejected_rows_invalid() {
        let rows = summarize(&[[1.0, 0.0, -1.0, 1.0], [1.0, 0.0, 1.0, 0.0]], Some(4.0)).unwrap();
        for row in &rows {
            assert!(!row.valid);
            assert_eq!(row.record.area, 0.0);
        }
    }

    #[test]
    fn apply_scale_leaves_invalid_ellipse_untouched() {
        let mut e = Ellipse::with_coefficients(Location::default(), [1.0, 0.0, -1.0, 1.0]);
        let before = *e.coefficients().unwrap();
        apply_scale(&mut e, Some(4.605));
        assert_eq!(e.coefficients(), Some(&before));
        assert!(!e.is_valid());

        let mut ok = Ellipse::with_coefficients(Location::default(), [1.0, 0.0, 1.0, 1.0]);
        apply_scale(&mut ok, Some(4.0));
        assert_eq!(ok.scale_factor(), Some(4.0));
        apply_scale(&mut ok, None);
        assert_eq!(ok.scale_factor(), Some(4.0));
    }

    #[test]
    fn csv_round_trip_through_tables() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("coeffs.csv");
        std::fs::write(&input, "c0,c1,c2,c3\n1.0,0.0,1.0,1.0\n0.25,0.0,1.0,4.0\n").unwrap();
        let coeffs = read_coefficients(&input).unwrap();
        assert_eq!(coeffs, vec![[1.0, 0.0, 1.0, 1.0], [0.25, 0.0, 1.0, 4.0]]);

        let rows = summarize(&coeffs, None).unwrap();
        let mut df = records_frame(&rows).unwrap();
        assert_eq!(df.shape(), (2, 7));
        let out = dir.path().join("out/records.csv");
        write_frame(&out, &mut df).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("row,valid,format,majorAxisLength,minorAxisLength,trendDegrees,area"));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "c0,c1,c2\n1.0,0.0,1.0\n").unwrap();
        let err = read_coefficients(&input).unwrap_err();
        assert!(format!("{err:#}").contains("c3"));
    }
}
