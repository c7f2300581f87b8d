//! AWS Lambda handler for property return analyses
//!
//! Accepts a JSON body through an API Gateway HTTP API (or a Function URL)
//! and returns either the flip XIRR report or the rental projection, with
//! optional parallel sweeps over sale prices or alternative assumption sets.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use property_returns::currency::format_amount;
use property_returns::projection::AggregateSummary;
use property_returns::scenario::{sale_price_sweep, ScenarioRunner};
use property_returns::{
    analyze_investment, analyze_rental, CurrencyCode, ExchangeRates, InvestmentAssumptions, RentalAssumptions,
    XirrReport, YearlyProjection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Xirr,
    Rental,
}

/// Input for one analysis
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Which engine to run (default: xirr)
    #[serde(default)]
    pub mode: AnalysisMode,

    /// Flip assumptions, required for xirr mode
    #[serde(default)]
    pub investment: Option<InvestmentAssumptions>,

    /// Rental assumptions, required for rental mode
    #[serde(default)]
    pub rental: Option<RentalAssumptions>,

    /// Alternative sale prices to evaluate alongside the base case
    #[serde(default)]
    pub sale_prices: Vec<f64>,

    /// Alternative rental assumption sets to summarise alongside the base case
    #[serde(default)]
    pub rental_scenarios: Vec<RentalAssumptions>,

    /// Display currency for the formatted figures (default: IDR)
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,

    /// IDR per unit of the display currency, overriding the fallback table
    #[serde(default)]
    pub exchange_rate: Option<f64>,
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::IDR
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepPoint {
    sale_price: f64,
    xirr: Option<f64>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioSummary {
    summary: Option<AggregateSummary>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct XirrResponse {
    report: XirrReport,
    net_profit_display: String,
    total_invested_display: String,
    sweep: Vec<SweepPoint>,
    execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RentalResponse {
    rows: Vec<YearlyProjection>,
    summary: AggregateSummary,
    total_profit_display: String,
    scenarios: Vec<ScenarioSummary>,
    execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn json_response<T: Serialize>(status: i64, body: &T) -> ApiGatewayV2httpResponse {
    let text = serde_json::to_string(body)
        .unwrap_or_else(|e| format!(r#"{{"error":"Failed to encode response: {}"}}"#, e));
    ApiGatewayV2httpResponse {
        status_code: status,
        body: Some(Body::Text(text)),
        ..Default::default()
    }
}

fn error_response(status: i64, message: &str) -> ApiGatewayV2httpResponse {
    json_response(status, &ErrorBody { error: message.to_string() })
}

fn run_xirr(request: &AnalysisRequest, rates: &ExchangeRates, start: std::time::Instant) -> ApiGatewayV2httpResponse {
    let Some(assumptions) = &request.investment else {
        return error_response(400, "xirr mode needs an `investment` object");
    };

    let report = match analyze_investment(assumptions) {
        Ok(r) => r,
        Err(e) => return error_response(422, &e.to_string()),
    };

    let sweep = sale_price_sweep(assumptions, &request.sale_prices)
        .into_iter()
        .map(|(sale_price, result)| match result {
            Ok(r) => SweepPoint { sale_price, xirr: Some(r.rate), error: None },
            Err(e) => SweepPoint { sale_price, xirr: None, error: Some(e.to_string()) },
        })
        .collect();

    let response = XirrResponse {
        net_profit_display: format_amount(report.result.net_profit, request.currency, rates),
        total_invested_display: format_amount(report.result.total_invested, request.currency, rates),
        report,
        sweep,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    json_response(200, &response)
}

fn run_rental(request: &AnalysisRequest, rates: &ExchangeRates, start: std::time::Instant) -> ApiGatewayV2httpResponse {
    let Some(assumptions) = &request.rental else {
        return error_response(400, "rental mode needs a `rental` object");
    };

    let (rows, summary) = match analyze_rental(assumptions) {
        Ok(r) => r,
        Err(e) => return error_response(422, &e.to_string()),
    };

    let scenarios = ScenarioRunner::run_batch(&request.rental_scenarios)
        .into_iter()
        .map(|result| match result {
            Ok(s) => ScenarioSummary { summary: Some(s), error: None },
            Err(e) => ScenarioSummary { summary: None, error: Some(e.to_string()) },
        })
        .collect();

    let response = RentalResponse {
        total_profit_display: format_amount(summary.total_profit, request.currency, rates),
        rows,
        summary,
        scenarios,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    json_response(200, &response)
}

/// Request text, decoding Function URL bodies sent as base64
fn request_body(body: Option<String>, is_base64_encoded: bool) -> Result<String, String> {
    let Some(body) = body else {
        return Ok("{}".to_string());
    };
    if !is_base64_encoded {
        return Ok(body);
    }
    let bytes = BASE64
        .decode(body.trim())
        .map_err(|e| format!("Invalid base64 body: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("Body is not UTF-8: {}", e))
}

async fn handler(event: LambdaEvent<ApiGatewayV2httpRequest>) -> Result<ApiGatewayV2httpResponse, Error> {
    let start = std::time::Instant::now();

    let body = match request_body(event.payload.body, event.payload.is_base64_encoded) {
        Ok(b) => b,
        Err(message) => return Ok(error_response(400, &message)),
    };
    let request: AnalysisRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
    };

    let rates = match request.exchange_rate {
        Some(idr) => ExchangeRates::fallback().with_rate(request.currency, idr),
        None => ExchangeRates::fallback(),
    };

    log::info!("Running {:?} analysis in {}", request.mode, request.currency);

    let response = match request.mode {
        AnalysisMode::Xirr => run_xirr(&request, &rates, start),
        AnalysisMode::Rental => run_rental(&request, &rates, start),
    };
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
