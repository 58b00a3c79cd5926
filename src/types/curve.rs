//! Depth-indexed log curves: samples and the validated curve store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DataError, Zone};

/// Canonical channel mnemonics used by the model library.
pub mod channel {
    pub const DEPTH: &str = "Depth";
    /// Gamma ray (API)
    pub const GR: &str = "GR";
    /// Bulk density (g/cc)
    pub const RHOB: &str = "RHOB";
    /// Neutron porosity (v/v)
    pub const NPHI: &str = "NPHI";
    /// Deep resistivity (ohm.m)
    pub const RT: &str = "RT";
    /// Photoelectric factor (b/e)
    pub const PE: &str = "PE";
}

/// One depth point with its curve values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "Depth")]
    pub depth: f64,
    /// Channel values keyed by canonical mnemonic (`GR`, `RHOB`, ...).
    #[serde(flatten)]
    pub curves: BTreeMap<String, f64>,
}

impl Sample {
    pub fn new(depth: f64) -> Self {
        Self {
            depth,
            curves: BTreeMap::new(),
        }
    }

    /// Builder-style channel insert, mostly for tests and synthetic logs.
    #[must_use]
    pub fn with(mut self, channel: &str, value: f64) -> Self {
        self.curves.insert(channel.to_string(), value);
        self
    }

    /// Value of a channel, `None` if the channel is absent.
    pub fn curve(&self, channel: &str) -> Option<f64> {
        self.curves.get(channel).copied()
    }

    /// Value of a channel or NaN when absent.
    ///
    /// Only used for channels the store has already verified as present.
    pub(crate) fn value(&self, channel: &str) -> f64 {
        self.curve(channel).unwrap_or(f64::NAN)
    }
}

/// How repeated depths are resolved when building a [`CurveStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateDepthPolicy {
    /// Keep the first sample seen at a depth, drop the rest.
    #[default]
    KeepFirst,
    /// Reject the log with [`DataError::DuplicateDepth`].
    Error,
}

/// Counters reported by [`CurveStore::from_samples`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub null_rows_dropped: usize,
    pub duplicate_rows_dropped: usize,
}

/// Validated log: finite depths strictly increasing, no NaN channel values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveStore {
    samples: Vec<Sample>,
    /// Channel mnemonics present in at least one sample, sorted
    channels: Vec<String>,
}

impl CurveStore {
    /// Clean raw samples into a store.
    ///
    /// Drops rows whose depth or any `required` channel is missing or
    /// non-finite, sorts by depth, then resolves duplicate depths.
    pub fn from_samples(
        raw: Vec<Sample>,
        required: &[&str],
        duplicates: DuplicateDepthPolicy,
    ) -> Result<(Self, CleaningReport), DataError> {
        let mut report = CleaningReport {
            input_rows: raw.len(),
            ..CleaningReport::default()
        };

        if raw.is_empty() {
            return Err(DataError::EmptyCurveStore);
        }

        // A required channel that never appears is a schema problem, not a null.
        for &name in required {
            if name != channel::DEPTH && !raw.iter().any(|s| s.curves.contains_key(name)) {
                return Err(DataError::MissingChannel {
                    channel: name.to_string(),
                });
            }
        }

        let mut samples: Vec<Sample> = raw
            .into_iter()
            .map(|mut s| {
                // Non-finite values leave the sample; a missing required one drops the row below
                s.curves.retain(|_, v| v.is_finite());
                s
            })
            .filter(|s| {
                s.depth.is_finite()
                    && required
                        .iter()
                        .filter(|&&c| c != channel::DEPTH)
                        .all(|c| s.curves.contains_key(*c))
            })
            .collect();
        report.null_rows_dropped = report.input_rows - samples.len();

        if samples.is_empty() {
            return Err(DataError::EmptyCurveStore);
        }

        // Stable sort keeps file order among equal depths, so keep-first is well defined.
        samples.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let before = samples.len();
        match duplicates {
            DuplicateDepthPolicy::KeepFirst => samples.dedup_by(|b, a| a.depth == b.depth),
            DuplicateDepthPolicy::Error => {
                if let Some(w) = samples.windows(2).find(|w| w[0].depth == w[1].depth) {
                    return Err(DataError::DuplicateDepth { depth: w[0].depth });
                }
            }
        }
        report.duplicate_rows_dropped = before - samples.len();

        let channels = collect_channels(&samples);
        Ok((Self { samples, channels }, report))
    }

    /// Wrap samples that are already clean.
    ///
    /// Fails on an empty log, a non-finite depth or channel value, or depths
    /// that are not strictly increasing.
    pub fn new(samples: Vec<Sample>) -> Result<Self, DataError> {
        if samples.is_empty() {
            return Err(DataError::EmptyCurveStore);
        }
        for (index, s) in samples.iter().enumerate() {
            if !s.depth.is_finite() {
                return Err(DataError::NonFiniteDepth { index });
            }
            if let Some((name, _)) = s.curves.iter().find(|(_, v)| !v.is_finite()) {
                return Err(DataError::NullValue {
                    channel: name.clone(),
                    depth: s.depth,
                });
            }
        }
        if let Some(w) = samples.windows(2).find(|w| w[1].depth <= w[0].depth) {
            return Err(DataError::NonMonotonicDepth {
                previous: w[0].depth,
                next: w[1].depth,
            });
        }
        let channels = collect_channels(&samples);
        Ok(Self { samples, channels })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when at least one sample carries `name`; Depth is always present.
    pub fn has_channel(&self, name: &str) -> bool {
        name == channel::DEPTH || self.channels.iter().any(|c| c == name)
    }

    /// Check every sample carries each channel in `required`.
    ///
    /// A channel no sample carries is [`DataError::MissingChannel`]; one
    /// that is absent on some samples only is [`DataError::NullValue`] at
    /// the first such depth.
    pub fn require_channels(&self, required: &[&str]) -> Result<(), DataError> {
        for &name in required {
            if !self.has_channel(name) {
                return Err(DataError::MissingChannel {
                    channel: name.to_string(),
                });
            }
            if name == channel::DEPTH {
                continue;
            }
            if let Some(s) = self.samples.iter().find(|s| s.curve(name).is_none()) {
                return Err(DataError::NullValue {
                    channel: name.to_string(),
                    depth: s.depth,
                });
            }
        }
        Ok(())
    }

    /// First and last depth.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.depth, self.samples.last()?.depth))
    }

    /// Samples inside `zone` (both ends inclusive), in depth order.
    pub fn in_zone<'a>(&'a self, zone: &'a Zone) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |s| zone.contains(s.depth))
    }
}

fn collect_channels(samples: &[Sample]) -> Vec<String> {
    let mut names: Vec<String> = samples
        .iter()
        .flat_map(|s| s.curves.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(depth: f64, gr: f64) -> Sample {
        Sample::new(depth).with(channel::GR, gr)
    }

    #[test]
    fn test_from_samples_sorts_and_drops_nulls() {
        let raw = vec![
            sample(1002.0, 40.0),
            sample(1000.0, 30.0),
            Sample::new(1001.0),
            sample(1003.0, f64::NAN),
        ];
        let (store, report) =
            CurveStore::from_samples(raw, &[channel::DEPTH, channel::GR], DuplicateDepthPolicy::KeepFirst)
                .unwrap();
        let depths: Vec<f64> = store.samples().iter().map(|s| s.depth).collect();
        assert_eq!(depths, vec![1000.0, 1002.0]);
        assert_eq!(report.null_rows_dropped, 2);
        assert_eq!(report.duplicate_rows_dropped, 0);
    }

    #[test]
    fn test_duplicate_depth_keep_first() {
        let raw = vec![sample(1000.0, 30.0), sample(1000.0, 99.0), sample(1001.0, 35.0)];
        let (store, report) =
            CurveStore::from_samples(raw, &[channel::GR], DuplicateDepthPolicy::KeepFirst).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.samples()[0].curve(channel::GR), Some(30.0));
        assert_eq!(report.duplicate_rows_dropped, 1);
    }

    #[test]
    fn test_duplicate_depth_error() {
        let raw = vec![sample(1000.0, 30.0), sample(1000.0, 99.0)];
        let err = CurveStore::from_samples(raw, &[channel::GR], DuplicateDepthPolicy::Error)
            .unwrap_err();
        assert_eq!(err, DataError::DuplicateDepth { depth: 1000.0 });
    }

    #[test]
    fn test_missing_channel_is_reported_by_name() {
        let raw = vec![sample(1000.0, 30.0)];
        let err = CurveStore::from_samples(
            raw,
            &[channel::GR, channel::RHOB],
            DuplicateDepthPolicy::KeepFirst,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DataError::MissingChannel {
                channel: "RHOB".to_string()
            }
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = CurveStore::from_samples(vec![], &[], DuplicateDepthPolicy::KeepFirst).unwrap_err();
        assert_eq!(err, DataError::EmptyCurveStore);

        // All rows null in a required channel leaves nothing to evaluate
        let raw = vec![sample(1000.0, f64::NAN)];
        let err = CurveStore::from_samples(raw, &[channel::GR], DuplicateDepthPolicy::KeepFirst)
            .unwrap_err();
        assert_eq!(err, DataError::EmptyCurveStore);
    }

    #[test]
    fn test_new_rejects_unsorted() {
        let err = CurveStore::new(vec![sample(1001.0, 1.0), sample(1000.0, 1.0)]).unwrap_err();
        assert!(matches!(err, DataError::NonMonotonicDepth { .. }));
    }

    #[test]
    fn test_in_zone_is_inclusive() {
        let store = CurveStore::new((0..5).map(|i| sample(1000.0 + f64::from(i), 1.0)).collect())
            .unwrap();
        let zone = Zone::new("Z", 1001.0, 1003.0);
        let hits: Vec<f64> = store.in_zone(&zone).map(|s| s.depth).collect();
        assert_eq!(hits, vec![1001.0, 1002.0, 1003.0]);
    }

    #[test]
    fn test_new_rejects_non_finite_depth() {
        let err = CurveStore::new(vec![sample(1000.0, 1.0), sample(f64::NAN, 1.0)]).unwrap_err();
        assert_eq!(err, DataError::NonFiniteDepth { index: 1 });
    }

    #[test]
    fn test_new_rejects_null_value() {
        let samples = vec![
            sample(1000.0, 1.0).with(channel::RT, 10.0),
            sample(1001.0, 1.0).with(channel::RT, f64::NAN),
        ];
        let err = CurveStore::new(samples).unwrap_err();
        assert_eq!(
            err,
            DataError::NullValue {
                channel: "RT".to_string(),
                depth: 1001.0
            }
        );
    }

    #[test]
    fn test_from_samples_strips_optional_nulls() {
        let raw = vec![
            sample(1000.0, 30.0).with(channel::NPHI, f64::NAN),
            sample(1001.0, 35.0).with(channel::NPHI, 0.2),
        ];
        let (store, report) =
            CurveStore::from_samples(raw, &[channel::GR], DuplicateDepthPolicy::KeepFirst).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(report.null_rows_dropped, 0);
        assert_eq!(store.samples()[0].curve(channel::NPHI), None);
        assert!(CurveStore::new(store.samples().to_vec()).is_ok());
    }

    #[test]
    fn test_require_channels() {
        let store = CurveStore::new(vec![sample(1000.0, 1.0)]).unwrap();
        assert!(store.require_channels(&[channel::DEPTH, channel::GR]).is_ok());
        assert_eq!(
            store.require_channels(&[channel::RT]),
            Err(DataError::MissingChannel {
                channel: "RT".to_string()
            })
        );
    }

    #[test]
    fn test_require_channels_reports_gap_by_depth() {
        let store = CurveStore::new(vec![
            sample(1000.0, 1.0).with(channel::RT, 10.0),
            sample(1001.0, 1.0),
            sample(1002.0, 1.0).with(channel::RT, 12.0),
        ])
        .unwrap();
        assert!(store.has_channel(channel::RT));
        assert_eq!(
            store.require_channels(&[channel::GR, channel::RT]),
            Err(DataError::NullValue {
                channel: "RT".to_string(),
                depth: 1001.0
            })
        );
    }
}
