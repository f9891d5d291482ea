//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `omnivault_core` linkage.
//! - Open the configured store once so migrations are exercised end to end.

use omnivault_core::{db, init_logging, CoreConfig, SettingsStore, SqliteKeyValueStore};

fn check_store() -> Result<String, String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(&config.log).map_err(|err| err.to_string())?;
    let conn = db::open_configured_db(&config).map_err(|err| err.to_string())?;
    let kv = SqliteKeyValueStore::configured(&conn, &config);
    // The empty identity reads defaults without touching the database.
    let settings = SettingsStore::new(&kv).load("");
    Ok(settings.user_name)
}

fn main() {
    println!("omnivault_core ping={}", omnivault_core::ping());
    println!("omnivault_core version={}", omnivault_core::core_version());

    match check_store() {
        Ok(user_name) => println!("omnivault_core store=ok default_user={user_name}"),
        Err(err) => {
            eprintln!("omnivault_core store=error {err}");
            std::process::exit(1);
        }
    }
}
