use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use napster::storage::TokenStorage;
use napster::{AuthMethod, Client, ClientConfig, HttpTransport};
use serde_json::{Map, Value};
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "napsterctl")]
#[command(about = "Talk to the Napster API from the command line", long_about = None)]
struct Cli {
    /// Application API key
    #[arg(long, env = "NAPSTER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Application API secret
    #[arg(long, env = "NAPSTER_API_SECRET", hide_env_values = true)]
    api_secret: String,

    /// API root to send requests to
    #[arg(long, env = "NAPSTER_API_URL", default_value = napster::transport::DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a username and password, storing the issued tokens
    Login {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// POST to an API endpoint and print the JSON response
    Post {
        /// Endpoint path, e.g. /v2.2/me/favorites
        path: String,
        /// JSON object sent as the request body
        #[arg(short, long, default_value = "{}")]
        body: String,
        /// Extra request header, as KEY=VALUE
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
    /// Forget any stored tokens
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "napster=info,napsterctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(cli.api_key, cli.api_secret);
    let api_url = cli.api_url;

    match cli.command {
        Commands::Login { username, password } => {
            let username = match username {
                Some(username) => username,
                None => interactive_prompt("your username")?,
            };
            let password = match password {
                Some(password) => password,
                None => interactive_prompt("your password")?,
            };
            login(config.with_user(username, password), &api_url).await?;
        }
        Commands::Post {
            path,
            body,
            headers,
        } => {
            post(config, &api_url, &path, &body, &headers).await?;
        }
        Commands::Logout => {
            TokenStorage::clear().context("failed to remove stored tokens")?;
            tracing::info!("Logged out");
        }
    }

    Ok(())
}

fn connect(config: ClientConfig, api_url: &str) -> Result<Client> {
    let client = Client::with_transport(config, |credentials| {
        HttpTransport::with_base_url(credentials, api_url)
    })?;
    Ok(client)
}

async fn login(config: ClientConfig, api_url: &str) -> Result<()> {
    let mut client = connect(config, api_url)?;
    let response = client.authenticate(AuthMethod::PasswordGrant).await?;

    if !client.is_authenticated() {
        bail!("the API did not issue an access token: {response}");
    }

    TokenStorage::from_client(&client)
        .save()
        .context("failed to store tokens")?;

    match client.expires_in() {
        Some(expires_in) => tracing::info!(expires_in, "Logged in"),
        None => tracing::info!("Logged in"),
    }
    Ok(())
}

async fn post(
    config: ClientConfig,
    api_url: &str,
    path: &str,
    body: &str,
    headers: &[String],
) -> Result<()> {
    let mut client = connect(config, api_url)?;
    if let Some(storage) = TokenStorage::load().context("failed to read stored tokens")? {
        storage.apply_to(&mut client);
    }

    let body: Value = serde_json::from_str(body).context("the request body is not valid JSON")?;
    let options = request_options(headers, client.access_token())?;

    let response = client.post(path, body, Value::Object(options)).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Turns `KEY=VALUE` arguments into request options, adding a bearer token
/// unless an authorization header was given explicitly.
fn request_options(headers: &[String], access_token: Option<&str>) -> Result<Map<String, Value>> {
    let mut options = Map::new();
    for header in headers {
        let Some((name, value)) = header.split_once('=') else {
            bail!("header {header:?} should look like KEY=VALUE");
        };
        options.insert(name.trim().to_string(), Value::String(value.trim().to_string()));
    }

    let has_authorization = options
        .keys()
        .any(|name| name.eq_ignore_ascii_case("authorization"));
    if let (Some(token), false) = (access_token, has_authorization) {
        options.insert(
            "authorization".to_string(),
            Value::String(format!("Bearer {token}")),
        );
    }

    Ok(options)
}

/// Quick and dirty function to read input from the user.
fn interactive_prompt(prompt_type: &str) -> Result<String> {
    let mut response = String::new();
    print!("Please enter {prompt_type} for your Napster account: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut response)?;

    Ok(response.trim_end_matches(['\r', '\n']).to_string())
}
