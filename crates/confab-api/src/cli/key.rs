//! API key provisioning commands.

use anyhow::Context;
use rand::rngs::OsRng;
use rand::RngCore;
use sqlx::Row;
use uuid::Uuid;

use crate::http::extractors::auth::hash_api_key;
use crate::state::AppState;

/// Generate a fresh API key: `cfb_` followed by 32 random bytes as hex.
fn generate_api_key() -> String {
    let mut key_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut key_bytes);
    format!(
        "cfb_{}",
        key_bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
    )
}

/// `confab key create --user <uuid> [--name <label>]`
pub async fn create_key(state: &AppState, user: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let user_id: Uuid = user.parse().context("invalid user id (expected a UUID)")?;

    let key = generate_api_key();
    let key_hash = hash_api_key(&key);
    let id = Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO api_keys (id, user_id, key_hash, name, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id.to_string())
    .bind(&key_hash)
    .bind(name)
    .bind(&now)
    .execute(&state.db_pool.writer)
    .await?;

    if json {
        let out = serde_json::json!({
            "id": id,
            "user_id": user_id.to_string(),
            "name": name,
            "key": key,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} API key for user {} (save this -- it won't be shown again):",
            console::style("🔑").bold(),
            console::style(user_id).cyan()
        );
        println!();
        println!("  {}", console::style(&key).yellow().bold());
        println!();
    }

    Ok(())
}

/// `confab key list`
pub async fn list_keys(state: &AppState, json: bool) -> anyhow::Result<()> {
    let rows = sqlx::query(
        "SELECT id, user_id, name, created_at, last_used_at FROM api_keys ORDER BY created_at",
    )
    .fetch_all(&state.db_pool.reader)
    .await?;

    if json {
        let keys: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                serde_json::json!({
                    "id": row.get::<String, _>("id"),
                    "user_id": row.get::<String, _>("user_id"),
                    "name": row.get::<String, _>("name"),
                    "created_at": row.get::<String, _>("created_at"),
                    "last_used_at": row.get::<Option<String>, _>("last_used_at"),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("  No API keys. Create one with `confab key create --user <uuid>`.");
        return Ok(());
    }

    println!();
    for row in &rows {
        let name: String = row.get("name");
        let user_id: String = row.get("user_id");
        let created_at: String = row.get("created_at");
        let last_used: Option<String> = row.get("last_used_at");
        println!(
            "  {}  user {}  created {}  last used {}",
            console::style(&name).cyan(),
            user_id,
            created_at,
            last_used.as_deref().unwrap_or("never")
        );
    }
    println!();

    Ok(())
}
