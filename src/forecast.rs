//! Mean-reversion projection of the headline metrics. Pure: reads a metrics
//! value, never touches engine state.

use serde::Serialize;

use crate::state::Metrics;

const GROWTH_TARGET: f64 = 2.1;
const GROWTH_RATE: f64 = 0.05;
const UNEMPLOYMENT_TARGET: f64 = 6.0;
const UNEMPLOYMENT_RATE: f64 = 0.03;
const INFLATION_TARGET: f64 = 2.0;
const INFLATION_RATE: f64 = 0.04;

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub gdp_growth: Vec<f64>,
    pub unemployment: Vec<f64>,
    pub inflation: Vec<f64>,
}

/// Project `weeks_ahead` weeks of mean reversion. A zero horizon yields
/// empty sequences rather than an error.
pub fn project(metrics: &Metrics, weeks_ahead: u32) -> Forecast {
    let mut gdp_growth = Vec::with_capacity(weeks_ahead as usize);
    let mut unemployment = Vec::with_capacity(weeks_ahead as usize);
    let mut inflation = Vec::with_capacity(weeks_ahead as usize);

    let mut growth = metrics.gdp_growth;
    let mut jobless = metrics.unemployment;
    let mut prices = metrics.inflation;
    for _ in 0..weeks_ahead {
        growth += (GROWTH_TARGET - growth) * GROWTH_RATE;
        jobless += (UNEMPLOYMENT_TARGET - jobless) * UNEMPLOYMENT_RATE;
        prices += (INFLATION_TARGET - prices) * INFLATION_RATE;
        gdp_growth.push(round_to(growth, 2));
        unemployment.push(round_to(jobless, 1));
        inflation.push(round_to(prices, 1));
    }

    Forecast {
        gdp_growth,
        unemployment,
        inflation,
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
