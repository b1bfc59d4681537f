//! Walks the Lockme authorization-code flow against a local mock: build the redirect, exchange
//! the returned code, look up the profile, then call an arbitrary API endpoint.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use lockme_oauth2::{
	Lockme, LockmeOptions, ResourceOwner,
	client::{AuthorizationParams, PkceMethod, TokenGrant},
	oauth2::http::Method,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access_token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let me_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2.3/me").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":7,\"name\":\"Demo Escape Rooms\"}");
		})
		.await;
	let rooms_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2.3/rooms");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":1,\"name\":\"Vault\"}]");
		})
		.await;
	let client = Lockme::client(
		LockmeOptions::new("demo-client")
			.with_client_secret("demo-secret")
			.with_redirect_uri(Url::parse("https://app.example/lockme/callback")?)
			.with_pkce_method(PkceMethod::S256)
			.with_api_domain(server.url(""))
			.ignore_ssl_errors(true),
	)?;
	let authorization = client.authorization_request(AuthorizationParams::default());

	println!("Send the user to: {}", authorization.url);

	// The redirect handler would receive these from the query string.
	let returned_state = authorization.state.clone();

	authorization.validate_state(&returned_state)?;

	let token = client
		.access_token(TokenGrant::AuthorizationCode {
			code: "demo-code".into(),
			pkce_verifier: authorization.pkce_verifier().map(ToOwned::to_owned),
		})
		.await?;
	let owner = client.resource_owner(&token).await?;

	println!("Signed in as {:?} ({:?}).", owner.get("name"), owner.id());

	let rooms = client.execute_request(Method::GET, "/rooms", &token, None::<&Value>).await?;

	println!("Rooms: {rooms}");
	assert_eq!(rooms, json!([{ "id": 1, "name": "Vault" }]));

	token_mock.assert_calls_async(1).await;
	me_mock.assert_calls_async(1).await;
	rooms_mock.assert_calls_async(1).await;

	Ok(())
}
