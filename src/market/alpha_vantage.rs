use super::provider::{DailyBar, GlobalQuote, MarketDataError, QuoteDataProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage market data provider speaking the raw query API.
///
/// One request per call: no retry, no caching, client-default timeout.
pub struct AlphaVantageProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (stub servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value, MarketDataError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Alpha Vantage request failed with status {status}");
            return Err(MarketDataError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))
    }
}

#[async_trait]
impl QuoteDataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn global_quote(&self, symbol: &str) -> Result<GlobalQuote, MarketDataError> {
        log::debug!("Fetching global quote for {symbol}");

        let body = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;

        parse_global_quote(symbol, &body)
    }

    async fn daily_series(
        &self,
        symbol: &str,
        days: usize,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        log::debug!("Fetching daily series for {symbol}");

        let body = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
            ])
            .await?;

        parse_daily_series(&body, days)
    }
}

type Fields = Map<String, Value>;

/// Parse the `"Global Quote"` envelope, tolerating missing keys (they
/// default to zero) but not malformed ones.
fn parse_global_quote(symbol: &str, body: &Value) -> Result<GlobalQuote, MarketDataError> {
    let quote = body
        .get("Global Quote")
        .and_then(Value::as_object)
        .filter(|fields| !fields.is_empty())
        .ok_or(MarketDataError::NoData)?;

    Ok(GlobalQuote {
        symbol: string_field(quote, "01. symbol").unwrap_or_else(|| symbol.to_string()),
        price: float_field(quote, "05. price")?,
        change: float_field(quote, "09. change")?,
        change_percent: percent_field(quote, "10. change percent")?,
        volume: int_field(quote, "06. volume")?,
    })
}

fn parse_daily_series(body: &Value, days: usize) -> Result<Vec<DailyBar>, MarketDataError> {
    let series = body
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .filter(|entries| !entries.is_empty())
        .ok_or(MarketDataError::NoData)?;

    let mut bars = Vec::with_capacity(series.len());
    for (raw_date, values) in series {
        let fields = values
            .as_object()
            .ok_or_else(|| MarketDataError::Parse(format!("malformed entry for {raw_date}")))?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| MarketDataError::Parse(format!("bad date {raw_date:?}")))?;

        bars.push(DailyBar {
            date,
            open: float_field(fields, "1. open")?,
            high: float_field(fields, "2. high")?,
            low: float_field(fields, "3. low")?,
            close: float_field(fields, "4. close")?,
            volume: int_field(fields, "5. volume")?,
        });
    }

    // Newest first, bounded to the requested window.
    bars.sort_by(|a, b| b.date.cmp(&a.date));
    bars.truncate(days);
    Ok(bars)
}

fn string_field(fields: &Fields, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn raw_field<'a>(fields: &'a Fields, key: &str) -> Result<Option<&'a str>, MarketDataError> {
    match fields.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| MarketDataError::Parse(format!("{key} is not a string"))),
    }
}

fn float_field(fields: &Fields, key: &str) -> Result<f64, MarketDataError> {
    match raw_field(fields, key)? {
        None => Ok(0.0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MarketDataError::Parse(format!("{key}: bad number {raw:?}"))),
    }
}

/// Alpha Vantage reports change percent as e.g. `"1.2345%"`.
fn percent_field(fields: &Fields, key: &str) -> Result<f64, MarketDataError> {
    match raw_field(fields, key)? {
        None => Ok(0.0),
        Some(raw) => raw
            .trim()
            .trim_end_matches('%')
            .parse()
            .map_err(|_| MarketDataError::Parse(format!("{key}: bad percent {raw:?}"))),
    }
}

fn int_field(fields: &Fields, key: &str) -> Result<u64, MarketDataError> {
    match raw_field(fields, key)? {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MarketDataError::Parse(format!("{key}: bad integer {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote_body() -> Value {
        json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "189.3000",
                "06. volume": "48087680",
                "09. change": "1.3500",
                "10. change percent": "0.7183%"
            }
        })
    }

    #[test]
    fn test_parse_global_quote() {
        let quote = parse_global_quote("AAPL", &quote_body()).unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 189.30);
        assert_eq!(quote.change, 1.35);
        assert_eq!(quote.change_percent, 0.7183);
        assert_eq!(quote.volume, 48_087_680);
    }

    #[test]
    fn test_missing_numeric_keys_default_to_zero() {
        let body = json!({
            "Global Quote": { "01. symbol": "AAPL" }
        });
        let quote = parse_global_quote("AAPL", &body).unwrap();

        assert_eq!(quote.price, 0.0);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
        assert_eq!(quote.volume, 0);
    }

    #[test]
    fn test_empty_quote_payload_is_no_data() {
        let body = json!({ "Global Quote": {} });
        assert!(matches!(
            parse_global_quote("ZZZZ", &body),
            Err(MarketDataError::NoData)
        ));

        let body = json!({ "Note": "rate limited" });
        assert!(matches!(
            parse_global_quote("AAPL", &body),
            Err(MarketDataError::NoData)
        ));
    }

    #[test]
    fn test_malformed_number_is_parse_error() {
        let body = json!({
            "Global Quote": { "05. price": "not-a-price" }
        });
        assert!(matches!(
            parse_global_quote("AAPL", &body),
            Err(MarketDataError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_daily_series_orders_and_truncates() {
        let body = json!({
            "Time Series (Daily)": {
                "2024-01-02": {
                    "1. open": "187.15", "2. high": "188.44", "3. low": "183.89",
                    "4. close": "185.64", "5. volume": "82488700"
                },
                "2024-01-04": {
                    "1. open": "182.15", "2. high": "183.09", "3. low": "180.88",
                    "4. close": "181.91", "5. volume": "71983600"
                },
                "2024-01-03": {
                    "1. open": "184.22", "2. high": "185.88", "3. low": "183.43",
                    "4. close": "184.25", "5. volume": "58414500"
                }
            }
        });

        let bars = parse_daily_series(&body, 2).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date.to_string(), "2024-01-04");
        assert_eq!(bars[1].date.to_string(), "2024-01-03");
        assert_eq!(bars[0].close, 181.91);
        assert_eq!(bars[0].volume, 71_983_600);
    }

    #[test]
    fn test_missing_series_is_no_data() {
        let body = json!({ "Error Message": "Invalid API call" });
        assert!(matches!(
            parse_daily_series(&body, 30),
            Err(MarketDataError::NoData)
        ));
    }
}
