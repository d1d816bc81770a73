use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use session::util::validation::password_strength;
use session::{
    AuthError, BackendKind, ConfigError, Credentials, FileTokenStore, SessionConfig, SessionContext, SignupData,
    SignupOutcome, TracingNavigator,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("unknown backend {0:?}; expected `mock` or `account`")]
    UnknownBackend(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("password is too weak")]
    WeakPassword,
    #[error("failed to render output as JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authctl", about = "Sign in, sign up, and inspect the stored session")]
struct Cli {
    /// Backend dialect, `mock` or `account`. Overrides AUTH_BACKEND.
    #[arg(long)]
    backend: Option<String>,

    /// Backend base URL. Overrides AUTH_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Session file. Overrides AUTH_TOKEN_FILE.
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Per-request timeout in seconds. Overrides AUTH_REQUEST_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        dob: Option<String>,
    },
    /// Confirm the six-digit code sent after signup.
    VerifyEmail {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Validate the stored token with the backend and print the user.
    Whoami,
    /// Print the cached user without contacting the backend.
    Status,
    /// Forget the stored session.
    Logout,
    /// Request a password reset code.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using a reset code.
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        #[arg(long, env = "AUTH_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Report which strength rules a password fails.
    CheckPassword { password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &CliError) {
    if let CliError::Auth(AuthError::Validation(fields)) = err {
        for field in &fields.0 {
            eprintln!("{}: {}", field.field, field.message);
        }
        return;
    }
    eprintln!("error: {err}");
}

fn build_config(cli: &Cli) -> Result<SessionConfig, CliError> {
    let mut config = SessionConfig::from_env()?;
    if let Some(raw) = &cli.backend {
        config.backend = BackendKind::parse(raw).ok_or_else(|| CliError::UnknownBackend(raw.clone()))?;
    }
    if let Some(url) = &cli.api_url {
        config.api_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(path) = &cli.token_file {
        config.token_file.clone_from(path);
    }
    if let Some(secs) = cli.timeout_secs.filter(|s| *s > 0) {
        config.request_timeout = Some(Duration::from_secs(secs));
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::CheckPassword { password } = &cli.command {
        return run_check_password(password);
    }

    let config = build_config(&cli)?;
    tracing::debug!(backend = config.backend.as_str(), api_url = %config.api_url, "session config loaded");
    let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let ctx = SessionContext::from_config(&config, store, Arc::new(TracingNavigator))?;

    match cli.command {
        Command::Login { email, password } => {
            let user = ctx.login(&Credentials::new(email, password)).await?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Signup { name, email, password, avatar, dob } => {
            let data = SignupData { name, email, password, avatar, dob };
            match ctx.signup(&data).await? {
                SignupOutcome::Authenticated(session) => print_json(&serde_json::to_value(session.user)?),
                SignupOutcome::VerificationRequired { email, message, verification_code } => {
                    let mut out = serde_json::json!({ "email": email, "message": message });
                    if let Some(code) = verification_code {
                        out["verification_code"] = Value::String(code);
                    }
                    print_json(&out)
                }
            }
        }
        Command::VerifyEmail { email, code } => {
            let ack = ctx.verify_email(&email, code.trim()).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::Whoami => {
            let user = ctx.mount().await.ok_or(CliError::NotSignedIn)?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Status => {
            let user = ctx.cached_user().ok_or(CliError::NotSignedIn)?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Logout => {
            ctx.logout();
            println!("signed out");
            Ok(())
        }
        Command::ForgotPassword { email } => {
            let ack = ctx.request_password_reset(&email).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::ResetPassword { email, token, new_password } => {
            let ack = ctx.confirm_password_reset(&email, &token, &new_password).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::CheckPassword { .. } => Ok(()),
    }
}

fn run_check_password(password: &str) -> Result<(), CliError> {
    let issues = password_strength(password);
    if issues.is_empty() {
        println!("ok");
        return Ok(());
    }
    for issue in &issues {
        eprintln!("- {issue}");
    }
    Err(CliError::WeakPassword)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
