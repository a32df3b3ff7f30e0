//! Timeseries export to CSV, JSON lines and Parquet.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

#[cfg(feature = "parquet")]
use crate::types::ControlValues;
use crate::types::TimeseriesRecord;
use crate::{ResultsError, ResultsResult};

pub const CSV_HEADER: &str =
    "step,time,id,iq,Vdc,Idc,P_ac,Q_ac,id_ref,iq_ref,vdc_ref,v_conv_d,v_conv_q,saturated,nr_iterations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Jsonl,
    /// Requires the `parquet` feature.
    Parquet,
}

impl FromStr for ExportFormat {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "jsonl" => Ok(ExportFormat::Jsonl),
            "parquet" => Ok(ExportFormat::Parquet),
            other => Err(ResultsError::UnknownFormat(other.to_string())),
        }
    }
}

/// Export policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Replace an existing file instead of refusing to write.
    pub overwrite: bool,
}

fn check_target(path: &Path, config: &ExportConfig) -> ResultsResult<()> {
    if path.exists() && !config.overwrite {
        return Err(ResultsError::OutputExists {
            path: path.display().to_string(),
        });
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

pub fn to_csv(records: &[TimeseriesRecord]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for r in records {
        let c = r.controls;
        // Writing into a String cannot fail.
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            r.step,
            r.time,
            r.id,
            r.iq,
            r.vdc,
            r.idc,
            r.p_ac,
            r.q_ac,
            opt(c.map(|c| c.id_ref)),
            opt(c.map(|c| c.iq_ref)),
            opt(c.and_then(|c| c.vdc_ref)),
            opt(c.map(|c| c.v_conv_d)),
            opt(c.map(|c| c.v_conv_q)),
            c.map(|c| c.saturated.to_string()).unwrap_or_default(),
            r.nr_iterations,
        );
    }
    csv
}

pub fn export_csv(
    path: &Path,
    records: &[TimeseriesRecord],
    config: &ExportConfig,
) -> ResultsResult<()> {
    check_target(path, config)?;
    fs::write(path, to_csv(records))?;
    info!(path = %path.display(), rows = records.len(), "exported CSV");
    Ok(())
}

pub fn export_jsonl(
    path: &Path,
    records: &[TimeseriesRecord],
    config: &ExportConfig,
) -> ResultsResult<()> {
    check_target(path, config)?;
    let mut content = String::new();
    for record in records {
        content.push_str(&serde_json::to_string(record)?);
        content.push('\n');
    }
    fs::write(path, content)?;
    info!(path = %path.display(), rows = records.len(), "exported JSON lines");
    Ok(())
}

/// One column per CSV field; control columns are null on the initial row.
#[cfg(feature = "parquet")]
pub fn to_dataframe(records: &[TimeseriesRecord]) -> ResultsResult<polars::prelude::DataFrame> {
    use polars::prelude::{DataFrame, NamedFrom, Series};

    let values = |f: fn(&TimeseriesRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();
    let controls = |f: fn(&ControlValues) -> Option<f64>| {
        records
            .iter()
            .map(|r| r.controls.as_ref().and_then(f))
            .collect::<Vec<Option<f64>>>()
    };
    let counts = |f: fn(&TimeseriesRecord) -> usize| {
        records.iter().map(|r| f(r) as u64).collect::<Vec<u64>>()
    };
    let saturated: Vec<Option<bool>> = records
        .iter()
        .map(|r| r.controls.map(|c| c.saturated))
        .collect();

    DataFrame::new(vec![
        Series::new("step", counts(|r| r.step)),
        Series::new("time", values(|r| r.time)),
        Series::new("id", values(|r| r.id)),
        Series::new("iq", values(|r| r.iq)),
        Series::new("Vdc", values(|r| r.vdc)),
        Series::new("Idc", values(|r| r.idc)),
        Series::new("P_ac", values(|r| r.p_ac)),
        Series::new("Q_ac", values(|r| r.q_ac)),
        Series::new("id_ref", controls(|c| Some(c.id_ref))),
        Series::new("iq_ref", controls(|c| Some(c.iq_ref))),
        Series::new("vdc_ref", controls(|c| c.vdc_ref)),
        Series::new("v_conv_d", controls(|c| Some(c.v_conv_d))),
        Series::new("v_conv_q", controls(|c| Some(c.v_conv_q))),
        Series::new("saturated", saturated),
        Series::new("nr_iterations", counts(|r| r.nr_iterations)),
    ])
    .map_err(|e| ResultsError::Parquet(e.to_string()))
}

#[cfg(feature = "parquet")]
pub fn export_parquet(
    path: &Path,
    records: &[TimeseriesRecord],
    config: &ExportConfig,
) -> ResultsResult<()> {
    use polars::prelude::ParquetWriter;

    check_target(path, config)?;
    let mut df = to_dataframe(records)?;
    let mut file = fs::File::create(path)?;
    ParquetWriter::new(&mut file)
        .finish(&mut df)
        .map_err(|e| ResultsError::Parquet(e.to_string()))?;
    info!(path = %path.display(), rows = records.len(), "exported Parquet");
    Ok(())
}

#[cfg(not(feature = "parquet"))]
pub fn export_parquet(
    _path: &Path,
    _records: &[TimeseriesRecord],
    _config: &ExportConfig,
) -> ResultsResult<()> {
    Err(ResultsError::FormatDisabled { format: "parquet" })
}

pub fn export(
    path: &Path,
    format: ExportFormat,
    records: &[TimeseriesRecord],
    config: &ExportConfig,
) -> ResultsResult<()> {
    match format {
        ExportFormat::Csv => export_csv(path, records, config),
        ExportFormat::Jsonl => export_jsonl(path, records, config),
        ExportFormat::Parquet => export_parquet(path, records, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControlValues;

    fn rows() -> Vec<TimeseriesRecord> {
        vec![
            TimeseriesRecord {
                step: 0,
                time: 0.0,
                id: 0.0,
                iq: 0.0,
                vdc: 1.0,
                idc: 0.0,
                p_ac: 0.0,
                q_ac: 0.0,
                controls: None,
                nr_iterations: 0,
            },
            TimeseriesRecord {
                step: 1,
                time: 0.5,
                id: 0.25,
                iq: 0.0,
                vdc: 1.0,
                idc: 0.0,
                p_ac: 0.0,
                q_ac: 0.0,
                controls: Some(ControlValues {
                    id_ref: 0.5,
                    iq_ref: 0.0,
                    vdc_ref: None,
                    v_conv_d: 1.1,
                    v_conv_q: 0.0,
                    saturated: false,
                }),
                nr_iterations: 1,
            },
        ]
    }

    #[test]
    fn csv_layout() {
        let csv = to_csv(&rows());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,0,0,0,1,0,0,0,,,,,,,0");
        assert_eq!(lines[2], "1,0.5,0.25,0,1,0,0,0,0.5,0,,1.1,0,false,1");
    }

    #[test]
    fn csv_reports_vdc_reference() {
        let mut rows = rows();
        if let Some(c) = rows[1].controls.as_mut() {
            c.vdc_ref = Some(1.05);
        }
        let csv = to_csv(&rows);
        let line = csv.lines().nth(2).unwrap();
        assert_eq!(line, "1,0.5,0.25,0,1,0,0,0,0.5,0,1.05,1.1,0,false,1");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("jsonl".parse::<ExportFormat>().unwrap(), ExportFormat::Jsonl);
        assert_eq!("parquet".parse::<ExportFormat>().unwrap(), ExportFormat::Parquet);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[cfg(not(feature = "parquet"))]
    #[test]
    fn parquet_needs_feature() {
        let path = std::env::temp_dir()
            .join(format!("vd_parquet_off_{}.parquet", std::process::id()));
        let err = export(&path, ExportFormat::Parquet, &rows(), &ExportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ResultsError::FormatDisabled { .. }));
        assert!(!path.exists());
    }

    #[cfg(feature = "parquet")]
    #[test]
    fn parquet_columns_follow_csv_header() {
        use polars::prelude::{ParquetReader, SerReader};

        let dir = std::env::temp_dir().join(format!("vd_parquet_{}", std::process::id()));
        let path = dir.join("run.parquet");
        let config = ExportConfig { overwrite: true };
        export(&path, ExportFormat::Parquet, &rows(), &config).unwrap();

        let file = fs::File::open(&path).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names();
        assert_eq!(names.join(","), CSV_HEADER);
        assert_eq!(df.column("id_ref").unwrap().null_count(), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
