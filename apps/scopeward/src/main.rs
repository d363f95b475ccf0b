mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scopeward_auth::{
    PrimaryAuthorizer, RequiredScopes, ScopeAuthorizer, TokenAuthority, TokenResponse,
};
use scopeward_scope::{Scope, ScopeRegistry};
use std::path::PathBuf;

use crate::config::AppConfig;

/// Scopeward - hierarchical scope reduction and scoped access tokens
#[derive(Parser)]
#[command(name = "scopeward")]
#[command(about = "Reduce scope sets and issue or verify scoped access tokens")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the minimal covering set of the given scopes, one per line
    Reduce {
        #[arg(required = true)]
        scopes: Vec<String>,
    },
    /// Reduce the given permissions and issue a bearer token
    Issue {
        /// Token subject (user name)
        #[arg(short, long)]
        subject: String,

        /// Token lifetime in days (default: `security.token_expire_days`)
        #[arg(long)]
        ttl_days: Option<i64>,

        scopes: Vec<String>,
    },
    /// Verify a token and print its claims
    Verify {
        token: String,

        /// Scope the token must grant (repeatable)
        #[arg(short, long = "require")]
        require: Vec<String>,
    },
    /// Validate configuration and exit
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(cli.verbose, &config.logging.level);

    let output = execute(cli.command, &config)?;
    println!("{output}");
    Ok(())
}

/// Run one subcommand and return what it prints on stdout.
fn execute(command: Commands, config: &AppConfig) -> Result<String> {
    let registry = config.registry();

    match command {
        Commands::Reduce { scopes } => {
            let scopes = parse_scopes(scopes)?;
            warn_unknown(&registry, &scopes);
            Ok(scopeward_scope::reduce(&scopes).join("\n"))
        }
        Commands::Issue {
            subject,
            ttl_days,
            scopes,
        } => {
            let scopes = parse_scopes(scopes)?;
            warn_unknown(&registry, &scopes);
            let authority = TokenAuthority::from_config(&config.security)?;

            let response = match ttl_days {
                None => authority.issue_for(&subject, &scopes)?,
                Some(days) => {
                    let ttl = days
                        .checked_mul(86_400)
                        .map(time::Duration::seconds)
                        .with_context(|| format!("ttl of {days} days is out of range"))?;
                    let reduced = scopeward_scope::reduce(&scopes);
                    TokenResponse::bearer(authority.issue(&subject, &reduced, ttl)?)
                }
            };
            Ok(serde_json::to_string_pretty(&response)?)
        }
        Commands::Verify { token, require } => {
            let authority = TokenAuthority::from_config(&config.security)?;
            let claims = authority.verify(&token)?;

            let required = RequiredScopes::new(parse_scopes(require)?);
            ScopeAuthorizer.check(&claims, &required)?;

            Ok(serde_json::to_string_pretty(&claims)?)
        }
        Commands::Check => {
            tracing::info!("Checking configuration...");
            config.security.validate()?;
            tracing::info!(known_scopes = registry.len(), "Configuration is valid");
            config.to_pretty_json()
        }
    }
}

/// Reject empty scope names before they reach the reducer or a token.
fn parse_scopes(raw: Vec<String>) -> Result<Vec<String>> {
    raw.into_iter()
        .map(|s| {
            Scope::try_from(s)
                .map(Scope::into_string)
                .context("invalid scope argument")
        })
        .collect()
}

fn warn_unknown(registry: &ScopeRegistry, scopes: &[String]) {
    if registry.is_empty() {
        return;
    }
    for scope in registry.unknown(scopes.iter().map(String::as_str)) {
        tracing::warn!(scope = %scope, "Scope is not registered");
    }
}
