mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use codechat::api::{ApiClient, ApiError};
use codechat::auth::{AuthService, NOT_AUTHENTICATED};
use codechat::config::{ApiConfig, DEFAULT_API_BASE_URL};
use codechat::session::SessionStore;
use codechat::session::cookie::FileCookieJar;
use codechat::session::storage::FileStorage;
use codechat::types::{AuthResponse, LoginData, SignupData};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", .0.message())]
    Api(#[from] ApiError),
    #[error("{0}")]
    Rejected(String),
    #[error("no state directory; pass --state-dir or set CODECHAT_STATE_DIR")]
    NoStateDir,
}

#[derive(Parser, Debug)]
#[command(name = "codechat", about = "Terminal client for the codechat code generator")]
struct Cli {
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    /// Where the session file and cookie jar live.
    #[arg(long, env = "CODECHAT_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CODECHAT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CODECHAT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Chats,
    Chat {
        chat_id: i64,
    },
    Generate {
        #[arg(long, default_value = "python")]
        language: String,
        /// Continue an existing chat instead of starting a new one.
        #[arg(long)]
        chat_id: Option<i64>,
        prompt: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_state_dir(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    explicit
        .or_else(|| dirs::config_dir().map(|dir| dir.join("codechat")))
        .ok_or(CliError::NoStateDir)
}

fn open_session(state_dir: &Path) -> SessionStore {
    SessionStore::new(
        FileStorage::new(state_dir.join("session.json")),
        FileCookieJar::new(state_dir.join("cookies.txt")),
    )
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let state_dir = resolve_state_dir(cli.state_dir)?;
    let session = Arc::new(open_session(&state_dir));
    let auth = AuthService::new(ApiClient::new(ApiConfig::new(cli.base_url)), session);

    match cli.command {
        Command::Signup { name, email, password } => {
            let response = auth.signup(&SignupData { name, email, password }).await?;
            report_auth(&response, auth.is_authenticated(), render::SIGNUP_FAILED, "Signed up")
        }
        Command::Login { email, password } => {
            let response = auth.login(&LoginData { email, password }).await?;
            report_auth(&response, auth.is_authenticated(), render::LOGIN_FAILED, "Logged in")
        }
        Command::Logout => {
            auth.logout();
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            let user = auth
                .current_user()
                .ok_or_else(|| CliError::Rejected(NOT_AUTHENTICATED.to_owned()))?;
            println!("{}", render::user_line(&user));
            Ok(())
        }
        Command::Chats => {
            let response = auth.get_chats().await?;
            if !response.success {
                return Err(CliError::Rejected(render::failure_message(&response.message, "Failed to load chats")));
            }
            print!("{}", render::chat_list(&response.data.unwrap_or_default()));
            Ok(())
        }
        Command::Chat { chat_id } => {
            let response = auth.get_chat(chat_id).await?;
            match response.data {
                Some(detail) if response.success => {
                    print!("{}", render::chat_detail(&detail));
                    Ok(())
                }
                _ => Err(CliError::Rejected(render::failure_message(
                    &response.message,
                    "Failed to load chat",
                ))),
            }
        }
        Command::Generate { language, chat_id, prompt } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                return Err(CliError::Rejected("Please enter a prompt".to_owned()));
            }
            let response = auth.generate_code(prompt.trim(), &language, chat_id).await?;
            match response.data {
                Some(generated) if response.success => {
                    println!("{}", generated.code);
                    eprintln!("(chat {})", generated.chat_id);
                    Ok(())
                }
                _ => Err(CliError::Rejected(render::failure_message(
                    &response.message,
                    render::GENERATE_FAILED,
                ))),
            }
        }
    }
}

/// `stored` is whether the session actually holds a token afterwards.
fn report_auth(response: &AuthResponse, stored: bool, fallback: &str, verb: &str) -> Result<(), CliError> {
    if !response.success {
        return Err(CliError::Rejected(render::failure_message(&response.message, fallback)));
    }
    match &response.data {
        Some(_) if !stored => return Err(CliError::Rejected(render::SESSION_NOT_SAVED.to_owned())),
        Some(data) => println!("{verb} as {}", render::user_line(&data.user)),
        None => println!("{verb}"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
