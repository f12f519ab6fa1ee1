use std::sync::Arc;

use botlist_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), botlist_core::Error> {
    botlist_core::logging::init("botlist")?;

    let cfg = Arc::new(Config::load()?);

    botlist_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| botlist_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
