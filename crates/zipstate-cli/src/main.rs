use anyhow::{Context, Result};
use clap::Parser;
use reqwest::header;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zipstate::{LookupEvent, LookupRequest, LookupState};

const DEFAULT_ENDPOINT: &str = "http://localhost:8888/.netlify/functions/getCityState";

#[derive(Debug, Parser)]
#[command(
    name = "zipstate",
    version,
    about = "Resolve US zip codes to city/state pairs"
)]
struct Args {
    /// Zip codes to resolve (masked to the first five digits)
    #[arg(value_name = "ZIPCODE", required = true)]
    zipcodes: Vec<String>,
    /// Lookup endpoint URL (falls back to ZIPSTATE_ENDPOINT, then the default)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zipstate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let endpoint = args
        .endpoint
        .or_else(|| std::env::var("ZIPSTATE_ENDPOINT").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let client = reqwest::Client::new();

    for zipcode in &args.zipcodes {
        let mut state = LookupState::new();

        if let Some(request) = state.apply(LookupEvent::InputChanged(zipcode.clone())) {
            let event = match fetch_city_state(&client, &endpoint, &request).await {
                Ok(body) => LookupEvent::LookupSucceeded {
                    seq: request.seq,
                    body,
                },
                Err(err) => LookupEvent::LookupFailed {
                    seq: request.seq,
                    error: format!("{err:#}"),
                },
            };
            state.apply(event);
        }

        if state.is_loading() {
            tracing::warn!(zipcode = %state.zipcode(), "lookup did not resolve");
        }

        let rendered =
            serde_json::to_string(&state.snapshot()).context("failed to render snapshot")?;
        println!("{rendered}");
    }

    Ok(())
}

/// GET the collaborator lookup endpoint and return the raw body text.
///
/// The Accept header advertises JSON even though the collaborator answers
/// with XML text; the header does not constrain the response format.
async fn fetch_city_state(
    client: &reqwest::Client,
    endpoint: &str,
    request: &LookupRequest,
) -> Result<String> {
    let response = client
        .get(endpoint)
        .query(&[("zipcode", request.zipcode.as_str())])
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .with_context(|| format!("lookup request for {} failed", request.zipcode))?;

    response
        .text()
        .await
        .context("failed to read lookup response body")
}
