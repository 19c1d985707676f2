//! Refreshes an access token against a live token endpoint.
//!
//! Reads `OAUTH2_CLIENT_ID`, `OAUTH2_CLIENT_SECRET`, and `OAUTH2_REFRESH_TOKEN` from the
//! environment. `OAUTH2_WEB_ENDPOINT` overrides the default web endpoint.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
// self
use oauth2_token_router::{
	client::{Client, ReqwestTokenClient},
	config::Configuration,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = env::var("OAUTH2_CLIENT_ID").wrap_err("OAUTH2_CLIENT_ID is not set")?;
	let client_secret =
		env::var("OAUTH2_CLIENT_SECRET").wrap_err("OAUTH2_CLIENT_SECRET is not set")?;
	let refresh_token =
		env::var("OAUTH2_REFRESH_TOKEN").wrap_err("OAUTH2_REFRESH_TOKEN is not set")?;
	let mut configuration = Configuration::new(client_id, client_secret);

	if let Ok(endpoint) = env::var("OAUTH2_WEB_ENDPOINT") {
		configuration = configuration.with_web_endpoint(endpoint);
	}

	let client: ReqwestTokenClient = Client::new(configuration);
	let token = client.spawn_refresh_token(refresh_token).await?;

	println!("Refreshed token of type {}.", token.token_type);

	if let Some(expires_at) = token.expires_at() {
		println!("Access token expires at {expires_at}.");
	}
	if token.refresh_token.is_some() {
		println!("Provider rotated the refresh token.");
	}

	Ok(())
}
