//! Mean/median helpers and the per-material summary used by both the
//! live-view overlay and the statistics bar chart.

use std::collections::HashMap;

use crate::material::Material;

/// One material's accumulated readings for the whole session. Never
/// evicted with the rolling window — only an explicit clear empties it.
/// Unbounded; at 2 Hz this grows a few hundred KB per day.
#[derive(Debug, Clone, Default)]
pub struct MaterialStats {
    pub rssi: Vec<f64>,
    pub noise: Vec<f64>,
    pub snr: Vec<f64>,
}

impl MaterialStats {
    pub fn push(&mut self, rssi: f64, noise: f64, snr: f64) {
        self.rssi.push(rssi);
        self.noise.push(noise);
        self.snr.push(snr);
    }

    pub fn is_empty(&self) -> bool {
        self.snr.is_empty()
    }
}

/// Medians and SNR mean for one material, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSummary {
    pub material: Material,
    pub rssi_median: f64,
    pub noise_median: f64,
    pub snr_median: f64,
    pub snr_mean: f64,
    pub sample_count: usize,
}

/// Summaries for every material with at least one reading, in the fixed
/// `Material::ALL` order.
pub fn summaries(acc: &HashMap<Material, MaterialStats>) -> Vec<MaterialSummary> {
    Material::ALL
        .iter()
        .filter_map(|&material| {
            let stats = acc.get(&material)?;
            if stats.is_empty() {
                return None;
            }
            Some(MaterialSummary {
                material,
                rssi_median: median(&stats.rssi),
                noise_median: median(&stats.noise),
                snr_median: median(&stats.snr),
                snr_mean: mean(&stats.snr),
                sample_count: stats.snr.len(),
            })
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of an unsorted slice. Even-length inputs average the two
/// middle values.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
