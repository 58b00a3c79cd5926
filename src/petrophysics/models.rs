//! Petrophysical model library
//!
//! Pure, stateless estimators for each quantity:
//! - Shale volume from gamma ray (Linear, Larionov)
//! - Density, total and effective porosity
//! - Water saturation (Archie, Simandoux, Indonesian)
//! - Net pay flag
//!
//! Functions never panic. Inputs outside a model's domain yield NaN, which
//! the evaluator records as a per-row anomaly.

use crate::types::{Cutoffs, PorosityMethod, SwMethod, VshMethod};

// ============================================================================
// Shale Volume
// ============================================================================

/// Gamma ray index, unclipped.
///
/// Formula: IGR = (GR − GRclean) / (GRshale − GRclean)
pub fn gamma_ray_index(gr: f64, gr_clean: f64, gr_shale: f64) -> f64 {
    (gr - gr_clean) / (gr_shale - gr_clean)
}

/// Larionov (tertiary rocks) transform of the gamma ray index.
///
/// Formula: Vsh = 0.083 × (2^(3.7 × IGR) − 1)
///
/// Monotonic in IGR and below the linear estimate for 0 < IGR < 1.
pub fn larionov_tertiary(igr: f64) -> f64 {
    0.083 * (3.7 * igr).exp2() - 0.083
}

/// Shale volume, clipped to [0, 1].
pub fn shale_volume(method: VshMethod, gr: f64, gr_clean: f64, gr_shale: f64) -> f64 {
    let igr = gamma_ray_index(gr, gr_clean, gr_shale);
    let vsh = match method {
        VshMethod::Linear => igr,
        VshMethod::Larionov => larionov_tertiary(igr),
    };
    vsh.clamp(0.0, 1.0)
}

// ============================================================================
// Porosity
// ============================================================================

/// Density porosity, unclipped.
///
/// Formula: PHID = (ρma − ρb) / (ρma − ρfl)
pub fn density_porosity(rhob: f64, rho_matrix: f64, rho_fluid: f64) -> f64 {
    (rho_matrix - rhob) / (rho_matrix - rho_fluid)
}

/// Total porosity from density porosity, optionally averaged with neutron.
pub fn total_porosity(method: PorosityMethod, phid: f64, nphi: f64) -> f64 {
    match method {
        PorosityMethod::Density => phid,
        PorosityMethod::NeutronDensity => (nphi + phid) / 2.0,
    }
}

/// Effective porosity: PHIE = PHIT × (1 − Vsh). Not clipped.
pub fn effective_porosity(phit: f64, vsh: f64) -> f64 {
    phit * (1.0 - vsh)
}

// ============================================================================
// Water Saturation
// ============================================================================

/// Saturation inputs for one sample in one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationInputs {
    pub rt: f64,
    pub rw: f64,
    pub phie: f64,
    pub vsh: f64,
    pub a: f64,
    pub m: f64,
    pub n: f64,
}

/// Archie: Sw = ((a × Rw) / (Rt × φ^m))^(1/n)
pub fn sw_archie(rt: f64, rw: f64, phie: f64, a: f64, m: f64, n: f64) -> f64 {
    ((a * rw) / (rt * phie.powf(m))).powf(1.0 / n)
}

/// Simandoux (simplified): Sw = sqrt((Rw / Rt) / (φ² + Vsh))
pub fn sw_simandoux(rt: f64, rw: f64, phie: f64, vsh: f64) -> f64 {
    ((rw / rt) / (phie * phie + vsh)).sqrt()
}

/// Indonesian (simplified): Sw = (Rw / Rt)^(1/n) / (φ^m + Vsh²)
pub fn sw_indonesian(rt: f64, rw: f64, phie: f64, vsh: f64, m: f64, n: f64) -> f64 {
    (rw / rt).powf(1.0 / n) / (phie.powf(m) + vsh * vsh)
}

/// Water saturation before clipping.
///
/// NaN when PHIE ≤ 0 or Rt ≤ 0: no model is defined there. Other inputs
/// may still produce NaN or infinity (e.g. a negative base under a
/// fractional exponent).
pub fn raw_water_saturation(method: SwMethod, s: &SaturationInputs) -> f64 {
    if !(s.phie > 0.0) || !(s.rt > 0.0) {
        return f64::NAN;
    }
    match method {
        SwMethod::Archie => sw_archie(s.rt, s.rw, s.phie, s.a, s.m, s.n),
        SwMethod::Simandoux => sw_simandoux(s.rt, s.rw, s.phie, s.vsh),
        SwMethod::Indonesian => sw_indonesian(s.rt, s.rw, s.phie, s.vsh, s.m, s.n),
    }
}

/// Water saturation clipped to [0, 1]; non-finite results become NaN.
pub fn water_saturation(method: SwMethod, s: &SaturationInputs) -> f64 {
    let sw = raw_water_saturation(method, s);
    if sw.is_finite() {
        sw.clamp(0.0, 1.0)
    } else {
        f64::NAN
    }
}

// ============================================================================
// Net Pay
// ============================================================================

/// Net pay: Vsh ≤ cutoff, PHIE ≥ cutoff and Sw ≤ cutoff all hold.
///
/// Any NaN input fails its comparison, so anomalous rows are never pay.
pub fn net_pay_flag(vsh: f64, phie: f64, sw: f64, cutoffs: &Cutoffs) -> bool {
    vsh <= cutoffs.vsh && phie >= cutoffs.phi && sw <= cutoffs.sw
}
