//! Five-field ellipse record for diagnostics and regression dumps.
//!
//! The record layout is owned by whoever consumes it; this module only knows
//! the field names, their order, and the schema version. Sinks and sources
//! plug in through `RecordWriter` / `RecordReader`. `KeyValueRecord` is the
//! in-crate text implementation (`name = value` lines, blank-line terminated).
//!
//! Code cross-refs: `Ellipse::to_record`, `conic::RECORD_FORMAT`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conic::{Ellipse, RECORD_FORMAT};
use crate::error::EllipseError;

/// Ordered field sink.
pub trait RecordWriter {
    fn write_int(&mut self, name: &str, value: i64);
    fn write_real(&mut self, name: &str, value: f64);
}

/// Field source keyed by name.
pub trait RecordReader {
    fn read_int(&mut self, name: &str) -> Result<i64, EllipseError>;
    fn read_real(&mut self, name: &str) -> Result<f64, EllipseError>;
}

/// Summary of an ellipse at its current scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EllipseRecord {
    pub format: i64,
    pub major_axis_length: f64,
    pub minor_axis_length: f64,
    pub trend_degrees: f64,
    pub area: f64,
}

impl EllipseRecord {
    /// Class tag used as the header of text records.
    pub const CLASS_NAME: &'static str = "Ellipse";
    /// Field names in write order.
    pub const FIELDS: [&'static str; 5] = [
        "format",
        "majorAxisLength",
        "minorAxisLength",
        "trendDegrees",
        "area",
    ];

    pub fn write_to<W: RecordWriter + ?Sized>(&self, w: &mut W) {
        let [format, major, minor, trend, area] = Self::FIELDS;
        w.write_int(format, self.format);
        w.write_real(major, self.major_axis_length);
        w.write_real(minor, self.minor_axis_length);
        w.write_real(trend, self.trend_degrees);
        w.write_real(area, self.area);
    }

    /// Read a record; the format field gates which layout follows.
    pub fn read_from<R: RecordReader + ?Sized>(r: &mut R) -> Result<Self, EllipseError> {
        let [format, major, minor, trend, area] = Self::FIELDS;
        let version = r.read_int(format)?;
        if version != RECORD_FORMAT {
            return Err(EllipseError::UnsupportedFormat { format: version });
        }
        Ok(Self {
            format: version,
            major_axis_length: r.read_real(major)?,
            minor_axis_length: r.read_real(minor)?,
            trend_degrees: r.read_real(trend)?,
            area: r.read_real(area)?,
        })
    }
}

impl<C> Ellipse<C> {
    /// Record at the current scale; trend converted to degrees.
    pub fn to_record(&self) -> Result<EllipseRecord, EllipseError> {
        Ok(EllipseRecord {
            format: RECORD_FORMAT,
            major_axis_length: self.major_axis_length()?,
            minor_axis_length: self.minor_axis_length()?,
            trend_degrees: self.major_axis_trend()?.to_degrees(),
            area: self.area(),
        })
    }

    pub fn write_record<W: RecordWriter + ?Sized>(&self, w: &mut W) -> Result<(), EllipseError> {
        self.to_record()?.write_to(w);
        Ok(())
    }
}

/// Ordered `name = value` text record with a `className` header.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValueRecord {
    class_name: String,
    entries: Vec<(String, String)>,
}

impl Default for KeyValueRecord {
    fn default() -> Self {
        Self::new(EllipseRecord::CLASS_NAME)
    }
}

impl KeyValueRecord {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite, keeping first-insertion order.
    pub fn put(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Parse one record: a `className = ...` line, then entries up to a blank
    /// line or end of input.
    pub fn parse(text: &str) -> Result<Self, EllipseError> {
        let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| EllipseError::missing("className"))?;
        let (key, class_name) = split_entry(header)?;
        if key != "className" {
            return Err(EllipseError::missing("className"));
        }
        let mut rec = Self::new(class_name);
        for line in lines {
            if line.trim().is_empty() {
                break;
            }
            let (k, v) = split_entry(line)?;
            rec.put(k, v.to_string());
        }
        Ok(rec)
    }

    fn field(&self, name: &str) -> Result<&str, EllipseError> {
        self.get(name).ok_or_else(|| EllipseError::missing(name))
    }
}

fn split_entry(line: &str) -> Result<(&str, &str), EllipseError> {
    match line.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim(), v.trim())),
        _ => Err(EllipseError::invalid(format!(
            "expected `name = value`, got {line:?}"
        ))),
    }
}

/// Three decimals; a rounded negative zero prints as `0.000`.
fn format_real(value: f64) -> String {
    let s = format!("{value:.3}");
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}

impl fmt::Display for KeyValueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "className = {}", self.class_name)?;
        for (k, v) in &self.entries {
            writeln!(f, "{k} = {v}")?;
        }
        writeln!(f)
    }
}

impl RecordWriter for KeyValueRecord {
    fn write_int(&mut self, name: &str, value: i64) {
        self.put(name, value.to_string());
    }

    fn write_real(&mut self, name: &str, value: f64) {
        self.put(name, format_real(value));
    }
}

impl RecordReader for KeyValueRecord {
    fn read_int(&mut self, name: &str) -> Result<i64, EllipseError> {
        let raw = self.field(name)?;
        raw.parse().map_err(|_| EllipseError::malformed(name, raw))
    }

    fn read_real(&mut self, name: &str) -> Result<f64, EllipseError> {
        let raw = self.field(name)?;
        raw.parse().map_err(|_| EllipseError::malformed(name, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conic::Location;

    fn circle() -> Ellipse {
        Ellipse::with_coefficients(Location::default(), [1.0, 0.0, 1.0, 1.0])
    }

    #[test]
    fn record_fields_follow_ellipse() {
        let mut e = Ellipse::from_principal_axes(Location::default(), 3.0, 2.0, 0.5).unwrap();
        e.set_scale_factor(4.0);
        let rec = e.to_record().unwrap();
        assert_eq!(rec.format, 1);
        assert!((rec.major_axis_length - 6.0).abs() < 1e-9);
        assert!((rec.minor_axis_length - 4.0).abs() < 1e-9);
        assert!((rec.trend_degrees - 0.5f64.to_degrees()).abs() < 1e-9);
        assert!((rec.area - std::f64::consts::PI * 24.0).abs() < 1e-9);
    }

    #[test]
    fn uninitialized_ellipse_has_no_record() {
        let e: Ellipse = Ellipse::new();
        assert_eq!(e.to_record(), Err(EllipseError::NotInitialized));
    }

    #[test]
    fn text_record_writes_fields_in_order() {
        let mut kv = KeyValueRecord::default();
        circle().write_record(&mut kv).unwrap();
        let keys: Vec<&str> = kv.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, EllipseRecord::FIELDS);
        assert_eq!(
            kv.to_string(),
            "className = Ellipse\n\
             format = 1\n\
             majorAxisLength = 1.000\n\
             minorAxisLength = 1.000\n\
             trendDegrees = 0.000\n\
             area = 3.142\n\n"
        );
    }

    #[test]
    fn text_record_parses_back() {
        let mut kv = KeyValueRecord::default();
        circle().write_record(&mut kv).unwrap();
        let mut parsed = KeyValueRecord::parse(&kv.to_string()).unwrap();
        assert_eq!(parsed, kv);
        let rec = EllipseRecord::read_from(&mut parsed).unwrap();
        assert_eq!(rec.major_axis_length, 1.0);
        assert_eq!(rec.area, 3.142);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let text = "className = Ellipse\nformat = 2\nmajorAxisLength = 1.0\n";
        let mut kv = KeyValueRecord::parse(text).unwrap();
        assert_eq!(
            EllipseRecord::read_from(&mut kv),
            Err(EllipseError::UnsupportedFormat { format: 2 })
        );
    }

    #[test]
    fn missing_and_malformed_fields() {
        let mut kv = KeyValueRecord::parse("className = Ellipse\nformat = 1\n").unwrap();
        assert_eq!(
            EllipseRecord::read_from(&mut kv),
            Err(EllipseError::MissingField {
                name: "majorAxisLength".into()
            })
        );
        let mut kv = KeyValueRecord::parse("className = Ellipse\nformat = one\n").unwrap();
        assert!(matches!(
            EllipseRecord::read_from(&mut kv),
            Err(EllipseError::MalformedField { .. })
        ));
        assert!(KeyValueRecord::parse("format 1").is_err());
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_real(-0.0), "0.000");
        assert_eq!(format_real(-0.0001), "0.000");
        assert_eq!(format_real(-1.5), "-1.500");
    }

    #[test]
    fn json_uses_camel_case_names() {
        let rec = circle().to_record().unwrap();
        let json = serde_json::to_value(rec).unwrap();
        assert_eq!(json["format"], 1);
        assert_eq!(json["majorAxisLength"], 1.0);
        assert_eq!(json["trendDegrees"], 0.0);
        let back: EllipseRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
