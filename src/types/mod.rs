//! Shared data structures for zone-based log evaluation
//!
//! - Curve store: validated, depth-sorted raw measurements
//! - Zone table: named intervals with their own parameters
//! - Method selection and net pay cutoffs
//! - Result rows and zone summaries
//! - Error taxonomy for a run

mod curve;
mod error;
mod methods;
mod results;
mod zone;

pub use curve::*;
pub use error::*;
pub use methods::*;
pub use results::*;
pub use zone::*;
