//! Result and summary export
//!
//! CSV for spreadsheets and plotting tools, JSON for everything else.
//! Non-finite numbers are written as `NaN` in CSV and `null` in JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::WellInfo;
use crate::petrophysics::volumetrics::ZoneVolumetrics;
use crate::petrophysics::{EvaluationOutput, EvaluationSettings};
use crate::types::{ResultTable, ZoneSummary};

fn fmt_num(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        "NaN".to_string()
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write the per-sample result table.
///
/// Columns: Depth, every input channel (sorted), Zone, the computed
/// properties, NetPay, Flags.
pub fn write_results_csv<W: Write>(results: &ResultTable, out: W) -> std::io::Result<()> {
    let mut out = BufWriter::new(out);

    let mut channels: Vec<&str> = results
        .rows()
        .iter()
        .flat_map(|r| r.sample.curves.keys().map(String::as_str))
        .collect();
    channels.sort_unstable();
    channels.dedup();

    let mut header = vec!["Depth".to_string()];
    header.extend(channels.iter().map(|c| csv_field(c)));
    header.extend(
        ["Zone", "Vsh", "PHID", "PHIT", "PHIE", "Sw", "NetPay", "Flags"]
            .iter()
            .map(ToString::to_string),
    );
    writeln!(out, "{}", header.join(","))?;

    for row in results.rows() {
        let mut fields = vec![fmt_num(row.depth())];
        fields.extend(
            channels
                .iter()
                .map(|c| row.sample.curve(c).map_or_else(String::new, fmt_num)),
        );
        fields.push(csv_field(&row.zone_name));
        fields.extend([row.vsh, row.phid, row.phit, row.phie, row.sw].map(fmt_num));
        fields.push(row.is_net_pay.to_string());
        fields.push(
            row.anomalies
                .iter()
                .map(|a| a.code())
                .collect::<Vec<_>>()
                .join("|"),
        );
        writeln!(out, "{}", fields.join(","))?;
    }
    out.flush()
}

/// Write the zone summary table.
pub fn write_summary_csv<W: Write>(summaries: &[ZoneSummary], out: W) -> std::io::Result<()> {
    let mut out = BufWriter::new(out);
    writeln!(
        out,
        "Zone,TopDepth,BaseDepth,GrossThickness,NetThickness,NetToGross,AvgVsh,AvgPHIE,AvgSw,Samples,NetSamples"
    )?;
    for s in summaries {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&s.zone_name),
            fmt_num(s.top),
            fmt_num(s.base),
            fmt_num(s.gross_thickness),
            fmt_num(s.net_thickness),
            fmt_num(s.net_to_gross),
            fmt_num(s.avg_vsh),
            fmt_num(s.avg_phie),
            fmt_num(s.avg_sw),
            s.sample_count,
            s.net_sample_count,
        )?;
    }
    out.flush()
}

/// Full evaluation report for JSON export.
#[derive(Debug, Serialize)]
pub struct EvaluationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub well: &'a WellInfo,
    pub settings: EvaluationSettings,
    pub depth_step: f64,
    pub summaries: &'a [ZoneSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumetrics: Option<&'a [ZoneVolumetrics]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<&'a ResultTable>,
}

impl<'a> EvaluationReport<'a> {
    pub fn new(well: &'a WellInfo, settings: EvaluationSettings, output: &'a EvaluationOutput) -> Self {
        Self {
            generated_at: Utc::now(),
            well,
            settings,
            depth_step: output.depth_step,
            summaries: &output.summaries,
            volumetrics: None,
            results: None,
        }
    }

    #[must_use]
    pub fn with_results(mut self, results: &'a ResultTable) -> Self {
        self.results = Some(results);
        self
    }

    #[must_use]
    pub fn with_volumetrics(mut self, volumetrics: &'a [ZoneVolumetrics]) -> Self {
        self.volumetrics = Some(volumetrics);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Create `path` and write into it with `f`.
pub fn write_file<F>(path: &Path, f: F) -> std::io::Result<()>
where
    F: FnOnce(File) -> std::io::Result<()>,
{
    f(File::create(path)?)
}
