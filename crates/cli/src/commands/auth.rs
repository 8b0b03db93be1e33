// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{AccessTokens, AuthError, NoPrompt, SessionTokens, TerminalPrompt, TokenGrant};
use crate::cli::{AuthCommand, OutputFormat};
use crate::display::format_timestamp;
use crate::env::vars;
use crate::error::Result;

use super::Session;

pub fn run(session: &Session, cmd: AuthCommand) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match cmd {
        AuthCommand::Login { token, expires_in } => {
            let tokens = session.tokens(Box::new(TerminalPrompt));
            login(&tokens, token, expires_in, &mut out)
        }
        AuthCommand::Logout => logout(&session.tokens(Box::new(NoPrompt)), &mut out),
        AuthCommand::Status { output } => {
            status(&session.tokens(Box::new(NoPrompt)), Utc::now(), output, &mut out)
        }
    }
}

pub(crate) fn login(
    tokens: &SessionTokens,
    token: Option<String>,
    expires_in: i64,
    out: &mut impl Write,
) -> Result<()> {
    let session = match token {
        Some(access_token) => tokens.store(TokenGrant {
            access_token,
            expires_in_secs: expires_in,
        })?,
        None => {
            tokens.sign_in()?;
            tokens.stored().ok_or(AuthError::SignInRequired)?
        }
    };
    writeln!(out, "Signed in until {}", format_timestamp(session.expires_at))?;
    if tokens.uses_env_token() {
        eprintln!("warning: {} is set and takes precedence", vars::TILEBOARD_ACCESS_TOKEN);
    }
    Ok(())
}

pub(crate) fn logout(tokens: &SessionTokens, out: &mut impl Write) -> Result<()> {
    tokens.sign_out()?;
    writeln!(out, "Signed out")?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthStatus {
    signed_in: bool,
    source: &'static str,
    expires_at: Option<DateTime<Utc>>,
}

/// Reports the session without contacting the drive or prompting.
pub(crate) fn status(
    tokens: &SessionTokens,
    now: DateTime<Utc>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let stored = tokens.stored();
    let report = if tokens.uses_env_token() {
        AuthStatus {
            signed_in: true,
            source: "environment",
            expires_at: None,
        }
    } else {
        match &stored {
            Some(token) if token.is_fresh(now) => AuthStatus {
                signed_in: true,
                source: "session",
                expires_at: Some(token.expires_at),
            },
            Some(token) => AuthStatus {
                signed_in: false,
                source: "session",
                expires_at: Some(token.expires_at),
            },
            None => AuthStatus {
                signed_in: false,
                source: "none",
                expires_at: None,
            },
        }
    };

    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Text => match (report.source, report.signed_in, report.expires_at) {
            ("environment", ..) => {
                writeln!(out, "Signed in via {}", vars::TILEBOARD_ACCESS_TOKEN)?
            }
            (_, true, Some(at)) => writeln!(out, "Signed in until {}", format_timestamp(at))?,
            (_, false, Some(at)) => writeln!(
                out,
                "Session expired at {}\n  hint: run `tileboard auth login`",
                format_timestamp(at)
            )?,
            _ => writeln!(out, "Not signed in\n  hint: run `tileboard auth login`")?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
