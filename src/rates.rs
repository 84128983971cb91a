/// Exchange rate resolution
///
/// This module handles:
/// - Fetching USD->currency rates from the exchange rate HTTP service
/// - Caching resolved rates (and failures) for the duration of one export
///
/// Rate direction matters: the service is asked for base USD against the
/// landed-cost currency, and conversion to USD *divides* the local amount
/// by that rate. Downstream formulas depend on this exact convention.

use log::{debug, warn};
use std::collections::HashMap;

/// A source of currency conversion rates
pub trait RateSource {
    /// Latest rate from `base` to `target`. Any transport, auth, or
    /// missing-symbol problem is an error; the caller decides whether
    /// that is fatal.
    fn latest_rate(&self, base: &str, target: &str) -> Result<f64, String>;
}

/// HTTP client for an exchangeratesapi.io-style endpoint
pub struct ExchangeRateApi {
    endpoint: String,
    api_key: String,
}

impl ExchangeRateApi {
    pub const DEFAULT_ENDPOINT: &'static str = "http://api.exchangeratesapi.io/v1/latest";

    pub fn new(api_key: &str) -> ExchangeRateApi {
        ExchangeRateApi { endpoint: Self::DEFAULT_ENDPOINT.to_string(), api_key: api_key.to_string() }
    }
}

impl RateSource for ExchangeRateApi {
    fn latest_rate(&self, base: &str, target: &str) -> Result<f64, String> {
        debug!("fetching exchange rate {} -> {}", base, target);

        let url = format!(
            "{}?access_key={}&base={}&symbols={}",
            self.endpoint, self.api_key, base, target
        );

        let response = ureq::get(&url)
            .call()
            .map_err(|e| format!("Rate request for {} failed: {}", target, e))?;

        let body: serde_json::Value = response
            .into_json()
            .map_err(|e| format!("Invalid rate response for {}: {}", target, e))?;

        body.get("rates")
            .and_then(|rates| rates.get(target))
            .and_then(|rate| rate.as_f64())
            .ok_or_else(|| format!("No rate for {} in response", target))
    }
}

/// Per-run rate cache keyed by currency code
///
/// Each distinct currency is looked up at most once per export; a failed
/// lookup is cached as a failure and not retried for the rest of the run.
pub struct RateCache<'a> {
    source: &'a dyn RateSource,
    cache: HashMap<String, Option<f64>>,
}

impl<'a> RateCache<'a> {
    pub fn new(source: &'a dyn RateSource) -> RateCache<'a> {
        RateCache { source, cache: HashMap::new() }
    }

    /// USD->currency rate, or None if resolution failed for this run.
    /// A zero or non-finite rate counts as a failure: it cannot divide
    /// an amount into a usable USD value.
    pub fn resolve(&mut self, currency: &str) -> Option<f64> {
        if let Some(cached) = self.cache.get(currency) {
            return *cached;
        }

        let rate = match self.source.latest_rate("USD", currency) {
            Ok(r) if r.is_finite() && r != 0.0 => Some(r),
            Ok(r) => {
                warn!("Unusable exchange rate {} for {}; treating as unresolved", r, currency);
                None
            }
            Err(e) => {
                warn!("Exchange rate lookup failed for {}: {}", currency, e);
                None
            }
        };

        self.cache.insert(currency.to_string(), rate);
        rate
    }

    /// Convert a local-currency amount to USD by dividing by the
    /// USD->currency rate. None if the rate is unresolved.
    pub fn convert_to_usd(&mut self, amount: f64, currency: &str) -> Option<f64> {
        self.resolve(currency).map(|rate| amount / rate)
    }
}
