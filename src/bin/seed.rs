//! Populates the category table with the launch set.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

const CATEGORIES: [(&str, &str); 10] = [
    (
        "Web Development",
        "Frontend and backend web development projects",
    ),
    (
        "Mobile App Development",
        "iOS and Android mobile application development",
    ),
    (
        "Graphic Design",
        "Logo design, branding, and visual content creation",
    ),
    (
        "Content Writing",
        "Blog posts, articles, and copywriting services",
    ),
    (
        "Digital Marketing",
        "SEO, social media marketing, and advertising campaigns",
    ),
    (
        "Data Analysis",
        "Data processing, analysis, and visualization projects",
    ),
    (
        "Video Editing",
        "Video production, editing, and motion graphics",
    ),
    (
        "UI/UX Design",
        "User interface and user experience design projects",
    ),
    ("Translation", "Document and content translation services"),
    ("Virtual Assistant", "Administrative and support services"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info".into()))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:bitskill.db".into());
    let options = SqliteConnectOptions::from_str(&database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run database migrations")?;

    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM categories").execute(&mut *tx).await?;
    for (name, description) in CATEGORIES {
        sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await?;
        tracing::info!(name, "category added");
    }
    tx.commit().await?;

    tracing::info!(count = CATEGORIES.len(), "database seeded");
    Ok(())
}
