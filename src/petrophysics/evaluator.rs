//! Zone evaluator
//!
//! For each zone in table order: select samples with `top <= depth <= base`,
//! run the model library with that zone's own parameters, flag net pay and
//! tag every row with the zone name. Zone outputs are concatenated, so rows
//! stay contiguous per zone and in depth order within a zone.
//!
//! Samples outside every zone produce no rows. A sample inside two
//! overlapping zones produces one row per zone.

use tracing::{debug, info, warn};

use super::models::{self, SaturationInputs};
use crate::types::{
    channel, CurveStore, Cutoffs, DataError, EvaluationError, MethodSelection, NumericAnomaly,
    ResultSample, ResultTable, Sample, Zone, ZoneTable,
};

/// Applies one method selection and cutoff set to a zone table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoneEvaluator {
    methods: MethodSelection,
    cutoffs: Cutoffs,
}

impl ZoneEvaluator {
    pub fn new(methods: MethodSelection, cutoffs: Cutoffs) -> Self {
        Self { methods, cutoffs }
    }

    /// Evaluate every zone against the full curve store.
    ///
    /// Zone and cutoff problems, an empty store, or a channel the selected
    /// models need abort the run before any row is computed.
    pub fn evaluate(
        &self,
        store: &CurveStore,
        zones: &ZoneTable,
    ) -> Result<ResultTable, EvaluationError> {
        zones.validate()?;
        self.cutoffs.validate()?;
        if store.is_empty() {
            return Err(DataError::EmptyCurveStore.into());
        }
        store.require_channels(&self.methods.required_channels())?;

        let mut rows = Vec::new();
        for zone in zones {
            let start = rows.len();
            rows.extend(self.evaluate_zone(store, zone));
            let zone_rows = &rows[start..];

            if zone_rows.is_empty() {
                warn!(zone = %zone.name, top = zone.top, base = zone.base, "Zone matched no samples");
                continue;
            }

            let anomalies = zone_rows.iter().filter(|r| r.has_anomaly()).count();
            if anomalies > 0 {
                warn!(zone = %zone.name, rows = anomalies, "Numeric anomalies in zone (values kept as NaN or clipped)");
            }
            debug!(
                zone = %zone.name,
                samples = zone_rows.len(),
                net = zone_rows.iter().filter(|r| r.is_net_pay).count(),
                "Zone evaluated"
            );
        }

        info!(
            zones = zones.len(),
            rows = rows.len(),
            vsh = %self.methods.shale_volume,
            porosity = %self.methods.porosity,
            saturation = %self.methods.saturation,
            "Evaluation complete"
        );
        Ok(ResultTable::new(rows))
    }

    /// Result rows for one zone, in depth order.
    ///
    /// Assumes the store carries the required channels; missing values
    /// surface as NaN.
    pub fn evaluate_zone<'a>(
        &'a self,
        store: &'a CurveStore,
        zone: &'a Zone,
    ) -> impl Iterator<Item = ResultSample> + 'a {
        store
            .in_zone(zone)
            .map(move |sample| self.evaluate_sample(sample, zone))
    }

    /// Run the full model chain on one sample with one zone's parameters.
    pub fn evaluate_sample(&self, sample: &Sample, zone: &Zone) -> ResultSample {
        let mut anomalies = Vec::new();

        let vsh = models::shale_volume(
            self.methods.shale_volume,
            sample.value(channel::GR),
            zone.gr_clean,
            zone.gr_shale,
        );

        let phid = models::density_porosity(
            sample.value(channel::RHOB),
            zone.matrix_density,
            zone.fluid_density,
        );
        if !(0.0..=1.0).contains(&phid) {
            anomalies.push(NumericAnomaly::DensityPorosityOutOfRange);
        }

        let nphi = sample.curve(channel::NPHI).unwrap_or(f64::NAN);
        let phit = models::total_porosity(self.methods.porosity, phid, nphi);
        let phie = models::effective_porosity(phit, vsh);

        let inputs = SaturationInputs {
            rt: sample.value(channel::RT),
            rw: zone.rw,
            phie,
            vsh,
            a: zone.a,
            m: zone.m,
            n: zone.n,
        };
        let raw_sw = models::raw_water_saturation(self.methods.saturation, &inputs);
        let mut sw_undefined = false;
        if !(phie > 0.0) {
            anomalies.push(NumericAnomaly::NonPositiveEffectivePorosity);
            sw_undefined = true;
        }
        if !(inputs.rt > 0.0) {
            anomalies.push(NumericAnomaly::NonPositiveResistivity);
            sw_undefined = true;
        }
        if !raw_sw.is_finite() {
            // The domain guards above already explain a NaN
            if !sw_undefined {
                anomalies.push(NumericAnomaly::NonFiniteSaturation);
            }
        } else if !(0.0..=1.0).contains(&raw_sw) {
            anomalies.push(NumericAnomaly::SaturationClipped);
        }
        let sw = models::water_saturation(self.methods.saturation, &inputs);

        ResultSample {
            sample: sample.clone(),
            zone_name: zone.name.clone(),
            vsh,
            phid,
            phit,
            phie,
            sw,
            is_net_pay: models::net_pay_flag(vsh, phie, sw, &self.cutoffs),
            anomalies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConfigurationError, PorosityMethod, SwMethod, VshMethod};

    fn log(depths: impl IntoIterator<Item = f64>) -> CurveStore {
        CurveStore::new(
            depths
                .into_iter()
                .map(|d| {
                    Sample::new(d)
                        .with(channel::GR, 70.0)
                        .with(channel::RHOB, 2.4)
                        .with(channel::NPHI, 0.2)
                        .with(channel::RT, 50.0)
                })
                .collect(),
        )
        .unwrap()
    }

    fn evaluator() -> ZoneEvaluator {
        ZoneEvaluator::new(MethodSelection::default(), Cutoffs::new(0.6, 0.05, 0.6))
    }

    #[test]
    fn test_rows_only_inside_zones() {
        let store = log((0..20).map(|i| 1000.0 + f64::from(i)));
        let zones = ZoneTable::new(vec![Zone::new("A", 1002.0, 1004.0), Zone::new("B", 1010.0, 1011.0)]);
        let table = evaluator().evaluate(&store, &zones).unwrap();

        assert_eq!(table.len(), 5);
        let tags: Vec<&str> = table.rows().iter().map(|r| r.zone_name.as_str()).collect();
        assert_eq!(tags, vec!["A", "A", "A", "B", "B"]);
        let depths: Vec<f64> = table.rows().iter().map(ResultSample::depth).collect();
        assert_eq!(depths, vec![1002.0, 1003.0, 1004.0, 1010.0, 1011.0]);
    }

    #[test]
    fn test_overlapping_zones_duplicate_rows() {
        let store = log((0..10).map(|i| 1000.0 + f64::from(i)));
        let zones = ZoneTable::new(vec![Zone::new("A", 1000.0, 1005.0), Zone::new("B", 1005.0, 1009.0)]);
        let table = evaluator().evaluate(&store, &zones).unwrap();
        assert_eq!(table.len(), 6 + 5);
        let at_1005: Vec<&str> = table
            .rows()
            .iter()
            .filter(|r| r.depth() == 1005.0)
            .map(|r| r.zone_name.as_str())
            .collect();
        assert_eq!(at_1005, vec!["A", "B"]);
    }

    #[test]
    fn test_zone_parameters_are_per_zone() {
        let store = log([1000.0, 1001.0]);
        let mut shaly = Zone::new("Shaly", 1000.0, 1001.0);
        shaly.gr_clean = 40.0;
        shaly.gr_shale = 80.0;
        let clean = Zone::new("Clean", 1000.0, 1001.0);
        let table = evaluator()
            .evaluate(&store, &ZoneTable::new(vec![shaly, clean]))
            .unwrap();
        let shaly_vsh: Vec<f64> = table.zone_rows("Shaly").map(|r| r.vsh).collect();
        let clean_vsh: Vec<f64> = table.zone_rows("Clean").map(|r| r.vsh).collect();
        assert_eq!(shaly_vsh.len(), 2);
        assert!(shaly_vsh.iter().all(|&v| (v - 0.75).abs() < 1e-12));
        assert!(clean_vsh.iter().all(|&v| (v - 0.5).abs() < 1e-12));

        let mut hot = Zone::new("Hot", 1000.0, 1001.0);
        hot.gr_shale = 70.0;
        let table = evaluator().evaluate(&store, &ZoneTable::new(vec![hot])).unwrap();
        assert!(table.rows().iter().all(|r| r.vsh == 1.0 && !r.is_net_pay));
    }

    #[test]
    fn test_invalid_zone_aborts_with_name() {
        let store = log([1000.0]);
        let zones = ZoneTable::new(vec![Zone::new("Good", 0.0, 10.0), Zone::new("Bad", 10.0, 5.0)]);
        let err = evaluator().evaluate(&store, &zones).unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::Configuration(ConfigurationError::InvalidDepthRange { ref zone, .. }) if zone == "Bad"
        ));
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn test_missing_nphi_only_matters_for_neutron_density() {
        let store = CurveStore::new(vec![Sample::new(1000.0)
            .with(channel::GR, 70.0)
            .with(channel::RHOB, 2.4)
            .with(channel::RT, 50.0)])
        .unwrap();
        let zones = ZoneTable::new(vec![Zone::new("A", 990.0, 1010.0)]);
        assert!(evaluator().evaluate(&store, &zones).is_ok());

        let nd = ZoneEvaluator::new(
            MethodSelection {
                porosity: PorosityMethod::NeutronDensity,
                ..MethodSelection::default()
            },
            Cutoffs::default(),
        );
        let err = nd.evaluate(&store, &zones).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Data(DataError::MissingChannel {
                channel: "NPHI".into()
            })
        );
    }

    #[test]
    fn test_neutron_density_averages() {
        let store = log([1000.0]);
        let nd = ZoneEvaluator::new(
            MethodSelection {
                shale_volume: VshMethod::Linear,
                porosity: PorosityMethod::NeutronDensity,
                saturation: SwMethod::Archie,
            },
            Cutoffs::default(),
        );
        let row = nd.evaluate_sample(&store.samples()[0], &Zone::new("A", 0.0, 2000.0));
        let phid = 0.25 / 1.65;
        assert!((row.phit - (phid + 0.2) / 2.0).abs() < 1e-12);
        assert!((row.phie - row.phit * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_porosity_row_is_nan_not_fatal() {
        let store = CurveStore::new(vec![
            Sample::new(1000.0)
                .with(channel::GR, 30.0)
                .with(channel::RHOB, 2.9)
                .with(channel::RT, 50.0),
            Sample::new(1001.0)
                .with(channel::GR, 30.0)
                .with(channel::RHOB, 2.3)
                .with(channel::RT, 50.0),
        ])
        .unwrap();
        let zones = ZoneTable::new(vec![Zone::new("A", 1000.0, 1001.0)]);
        let table = evaluator().evaluate(&store, &zones).unwrap();

        let bad = &table.rows()[0];
        assert!(bad.phie < 0.0, "PHIE is left unclipped");
        assert!(bad.sw.is_nan());
        assert!(!bad.is_net_pay);
        assert!(bad.anomalies.contains(&NumericAnomaly::NonPositiveEffectivePorosity));
        assert!(bad.anomalies.contains(&NumericAnomaly::DensityPorosityOutOfRange));

        let good = &table.rows()[1];
        assert!(good.sw.is_finite());
        assert!(!good.has_anomaly());
        assert_eq!(table.anomaly_count(), 1);
    }

    #[test]
    fn test_saturation_clip_is_recorded() {
        let store = CurveStore::new(vec![Sample::new(1000.0)
            .with(channel::GR, 20.0)
            .with(channel::RHOB, 2.6)
            .with(channel::RT, 0.5)])
        .unwrap();
        let row = evaluator().evaluate_sample(&store.samples()[0], &Zone::new("A", 0.0, 2000.0));
        assert_eq!(row.sw, 1.0);
        assert_eq!(row.anomalies, vec![NumericAnomaly::SaturationClipped]);
    }

    #[test]
    fn test_non_finite_saturation_flagged_alongside_porosity_range() {
        // Negative Rw makes Archie take the square root of a negative number
        let store = CurveStore::new(vec![Sample::new(1000.0)
            .with(channel::GR, 70.0)
            .with(channel::RHOB, 0.9)
            .with(channel::RT, 50.0)])
        .unwrap();
        let mut zone = Zone::new("A", 0.0, 2000.0);
        zone.rw = -0.05;
        let row = evaluator().evaluate_sample(&store.samples()[0], &zone);
        assert!(row.phie > 0.0);
        assert!(row.sw.is_nan());
        assert_eq!(
            row.anomalies,
            vec![
                NumericAnomaly::DensityPorosityOutOfRange,
                NumericAnomaly::NonFiniteSaturation
            ]
        );
    }

    #[test]
    fn test_gap_in_required_channel_reports_depth() {
        let store = CurveStore::new(vec![
            Sample::new(1000.0)
                .with(channel::GR, 70.0)
                .with(channel::RHOB, 2.4)
                .with(channel::RT, 50.0),
            Sample::new(1001.0).with(channel::GR, 70.0).with(channel::RHOB, 2.4),
            Sample::new(1002.0)
                .with(channel::GR, 70.0)
                .with(channel::RHOB, 2.4)
                .with(channel::RT, 50.0),
        ])
        .unwrap();
        let zones = ZoneTable::new(vec![Zone::new("A", 1000.0, 1002.0)]);
        let err = evaluator().evaluate(&store, &zones).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Data(DataError::NullValue {
                channel: "RT".into(),
                depth: 1001.0
            })
        );
        assert!(!err.to_string().contains("missing"));
    }

    #[test]
    fn test_zone_with_no_samples_yields_no_rows() {
        let store = log([1000.0, 1001.0]);
        let zones = ZoneTable::new(vec![Zone::new("Deep", 3000.0, 3100.0)]);
        let table = evaluator().evaluate(&store, &zones).unwrap();
        assert!(table.is_empty());
    }
}
