use anyhow::{anyhow, Result};
use auditory_status_bot::database::connection::DatabaseManager;
use auditory_status_bot::database::models::{User, STAFF_ROLES};
use auditory_status_bot::utils::auditory_names::AUDITORY_NAMES;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "seed" => seed_auditories().await,
        "role" => match (args.get(2), args.get(3)) {
            (Some(user_id), Some(role)) => set_role(user_id, role).await,
            _ => {
                eprintln!("Usage: migrate role <telegram_id> <role>");
                std::process::exit(1);
            }
        },
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

/// The migration tool only needs the store, not the bot token.
fn database_url() -> Result<String> {
    env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| anyhow!("Missing required environment variables: DATABASE_URL"))
}

fn sqlite_path(url: &str) -> Option<&str> {
    url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))
}

async fn connect(url: &str) -> Result<DatabaseManager> {
    DatabaseManager::new(url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Auditory Status Bot - Database Migration Tool");
    println!("================================================");

    let url = database_url()?;
    println!("📊 Database URL: {}", mask_url(&url));

    if let Some(db_path) = sqlite_path(&url) {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                println!("📁 Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    println!("🚀 Running database migrations...");
    let db_manager = connect(&url).await?;

    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("💡 Run 'migrate seed' to load the auditory list");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    db_manager.close().await;
    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let url = database_url()?;
    println!("📊 Database URL: {}", mask_url(&url));
    let db_manager = connect(&url).await?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for (table, rows) in tables {
                println!("  • {table} ({rows} rows)");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    db_manager.close().await;
    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let url = database_url()?;
    let Some(db_path) = sqlite_path(&url) else {
        return Err(anyhow!("Reset is only supported for SQLite databases"));
    };
    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

/// Inserts every known auditory by canonical name; existing rows are kept.
async fn seed_auditories() -> Result<()> {
    let url = database_url()?;
    let db_manager = connect(&url).await?;
    db_manager.run_migrations().await?;

    let mut inserted = 0;
    for &(canonical, display) in AUDITORY_NAMES {
        let result = sqlx::query("INSERT OR IGNORE INTO auditories (name, is_active) VALUES (?, TRUE)")
            .bind(canonical)
            .execute(&db_manager.pool)
            .await?;
        if result.rows_affected() > 0 {
            inserted += 1;
            println!("  ➕ {canonical} ({display})");
        }
    }

    println!("✅ Seeded {inserted} new auditories ({} known)", AUDITORY_NAMES.len());
    db_manager.close().await;
    Ok(())
}

async fn set_role(user_id: &str, role: &str) -> Result<()> {
    let user_id: i64 = user_id
        .parse()
        .map_err(|_| anyhow!("Invalid telegram id: {user_id}"))?;
    if role != "user" && !STAFF_ROLES.contains(&role) {
        return Err(anyhow!(
            "Unknown role '{role}'. Expected one of: user, {}",
            STAFF_ROLES.join(", ")
        ));
    }

    let db_manager = connect(&database_url()?).await?;
    if User::set_role(&db_manager.pool, user_id, role).await? {
        println!("✅ User {user_id} now has role '{role}'");
    } else {
        println!("⚠️  User {user_id} not found. They need to send /start to the bot first.");
    }
    db_manager.close().await;
    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<(String, i64)>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{name}\""))
            .fetch_one(&db_manager.pool)
            .await?;
        tables.push((name, rows));
    }
    Ok(tables)
}

fn mask_url(url: &str) -> String {
    match sqlite_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🏫 Auditory Status Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up            Run database migrations (default)");
    println!("    check                  Check database connection and schema");
    println!("    reset                  Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    seed                   Insert the known auditories");
    println!("    role <id> <role>       Set a user's role (user, engineer, admin, manager)");
    println!("    help                   Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string, e.g. sqlite:./data/auditories.db");
    println!();
}
