use std::sync::Arc;

use dotenv::dotenv;
use quiz_summarizer::{
    bot::{schema, BotState},
    config::Config,
    generation,
};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
};

type WizardStorage = Arc<ErasedStorage<BotState>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting quiz summarizer bot...");

    let config = Config::from_env()?;
    let generator = generation::from_config(&config)?;

    let bot = Bot::from_env();

    log::info!("Opening dialogue storage at {}", config.database_path);
    let storage: WizardStorage = SqliteStorage::open(&config.database_path, Json)
        .await?
        .erase();

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![storage, generator, Arc::new(config)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    Ok(())
}
