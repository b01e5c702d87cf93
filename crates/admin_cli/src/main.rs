use std::{error::Error, io::Write};

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, PeriodParams, users};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};
use tracing_subscriber::EnvFilter;

mod report;
mod seed;

#[derive(Parser, Debug)]
#[command(name = "gatunas_admin")]
#[command(about = "Admin utilities for Finanzas Gatunas (users, demo data, reports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./gatunas.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Fill an owner's ledger with six months of demo data.
    Seed(SeedArgs),
    /// Print a report as JSON.
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long)]
    owner: String,
    /// Reference date for the generated history, today by default.
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(value_enum)]
    kind: report::Kind,
    #[arg(long)]
    owner: String,
    #[arg(long)]
    month: Option<String>,
    #[arg(long)]
    year: Option<String>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn require_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if users::Entity::find_by_id(username.to_string())
        .one(db)
        .await?
        .is_none()
    {
        eprintln!("user not found: {username}");
        std::process::exit(1);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gatunas_admin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::Seed(args) => {
            require_user(&db, &args.owner).await?;
            let today = args.today.unwrap_or_else(|| Utc::now().date_naive());

            let engine = Engine::builder().database(db.clone()).build().await?;
            if seed::run(&engine, &args.owner, today).await? {
                println!("seeded demo data for {}", args.owner);
            } else {
                println!("demo data already present for {}", args.owner);
            }
        }
        Command::Report(args) => {
            require_user(&db, &args.owner).await?;

            let engine = Engine::builder().database(db.clone()).build().await?;
            let params = PeriodParams {
                month: args.month,
                year: args.year,
            };
            let json = report::render(
                &engine,
                &args.owner,
                args.kind,
                params,
                Utc::now().date_naive(),
            )
            .await?;
            println!("{json}");
        }
    }

    Ok(())
}
