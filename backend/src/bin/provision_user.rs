//! Create one account in the PostgreSQL store.
//!
//! The password is read from the first line of standard input so it never
//! appears in shell history or process listings:
//!
//! ```text
//! echo 'engineer123' | provision-user --username engineer --role engineer
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, BufRead};
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use defect_tracker::domain::ports::UserProvisioning;
use defect_tracker::domain::{CredentialService, PasswordHasher, Role};
use defect_tracker::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

/// `provision-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "provision-user",
    about = "Create a defect tracker account; the password is read from stdin",
    version
)]
struct CliArgs {
    /// Login name for the new account.
    #[arg(long, value_name = "name")]
    username: String,
    /// One of `engineer`, `manager`, or `leader`.
    #[arg(long, value_name = "role", value_parser = parse_role)]
    role: Role,
    /// Database connection URL. Falls back to `DEFECTS_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;
    let password = read_password(io::stdin().lock())?;

    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = CredentialService::new(
        Arc::new(DieselUserRepository::new(pool)),
        PasswordHasher::default(),
    );
    let user = service
        .register(&args.username, &password, args.role)
        .await
        .map_err(|error| io::Error::other(format!("provision failed: {error}")))?;

    println!("id={}", user.id());
    println!("username={}", user.username());
    println!("role={}", user.role());
    Ok(())
}

fn read_password(mut input: impl BufRead) -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;
    let trimmed = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned());
    if trimmed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "password must be supplied on standard input",
        ));
    }
    Ok(trimmed)
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    let value = match explicit {
        Some(value) => value,
        None => env::var("DEFECTS_DATABASE_URL").map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url or DEFECTS_DATABASE_URL",
            )
        })?,
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL must not be empty",
        ));
    }
    Ok(value)
}
