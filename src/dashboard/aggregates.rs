use crate::models::Villa;
use serde::Serialize;

/// Summary figures shown above the villa list
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub total: usize,
    pub available: usize,
    /// Rented out
    pub unavailable: usize,
    pub commission_sum: f64,
}

impl Aggregates {
    pub fn from_villas(villas: &[Villa]) -> Self {
        let total = villas.len();
        let available = villas.iter().filter(|v| v.is_available).count();

        Self {
            total,
            available,
            unavailable: total - available,
            commission_sum: villas.iter().map(|v| v.commission).sum(),
        }
    }
}
