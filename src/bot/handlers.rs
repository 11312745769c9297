use std::path::{Path, PathBuf};
use std::sync::Arc;

use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatAction, Document, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup},
};

use super::views::{self, Input, Screen};
use super::{BotState, HandlerResult, WizardDialogue};
use crate::config::Config;
use crate::generation::{is_pdf_upload, DocumentHandle, Generator};
use crate::wizard::{ContentType, Step, Wizard, WizardAction};

const USE_BUTTONS: &str = "Please pick one of the options below.";

pub async fn start(bot: Bot, dialogue: WizardDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, views::GREETING).await?;

    let wizard = Wizard::new();
    dialogue
        .update(BotState::Active {
            wizard: wizard.clone(),
        })
        .await?;
    send_screen(&bot, msg.chat.id, &wizard).await
}

pub async fn active(
    bot: Bot,
    dialogue: WizardDialogue,
    mut wizard: Wizard,
    msg: Message,
    generator: Arc<dyn Generator>,
    config: Arc<Config>,
) -> HandlerResult {
    let before = wizard.clone();

    if let Some(document) = msg.document() {
        receive_document(&bot, &msg, document, &config, &mut wizard).await?;
    } else if let Some(text) = msg.text() {
        match views::interpret(&wizard, text) {
            Some(Input::Action(action)) => {
                if !wizard.apply(action) {
                    bot.send_message(msg.chat.id, views::NOT_AVAILABLE).await?;
                }
            }
            Some(Input::Generate) => {
                generate(&bot, msg.chat.id, &mut wizard, generator.as_ref()).await?;
            }
            None => {
                bot.send_message(msg.chat.id, USE_BUTTONS).await?;
            }
        }
    } else {
        bot.send_message(msg.chat.id, USE_BUTTONS).await?;
    }

    dialogue
        .update(BotState::Active {
            wizard: wizard.clone(),
        })
        .await?;
    if let Some(path) = discarded_upload(&before, &wizard) {
        remove_upload(&path).await;
    }
    send_screen(&bot, msg.chat.id, &wizard).await
}

/// The stored upload `before` held that `after` no longer refers to.
fn discarded_upload(before: &Wizard, after: &Wizard) -> Option<PathBuf> {
    let old = before.document()?;
    match after.document() {
        Some(new) if new.path == old.path => None,
        _ => Some(old.path.clone()),
    }
}

async fn remove_upload(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => log::debug!("Removed upload {}", path.display()),
        Err(error) => log::warn!("Could not remove upload {}: {error}", path.display()),
    }
}

async fn receive_document(
    bot: &Bot,
    msg: &Message,
    document: &Document,
    config: &Config,
    wizard: &mut Wizard,
) -> HandlerResult {
    if wizard.step() != Step::Upload || wizard.state().content_type() != Some(ContentType::Pdf) {
        bot.send_message(msg.chat.id, views::NOT_AVAILABLE).await?;
        return Ok(());
    }

    let mime = document.mime_type.as_ref().map(|m| m.essence_str());
    let size = u64::from(document.file.size);
    if !is_pdf_upload(mime, size, config.max_document_bytes) {
        log::debug!("Rejected upload {:?} ({size} bytes)", document.file_name);
        bot.send_message(
            msg.chat.id,
            format!(
                "Please send a PDF file of at most {} MB.",
                config.max_document_bytes / 1024 / 1024
            ),
        )
        .await?;
        return Ok(());
    }

    let path = config
        .download_dir
        .join(format!("{}-{}.pdf", msg.chat.id.0, document.file.unique_id));
    if let Err(error) = download(bot, document, &config.download_dir, &path).await {
        log::error!("Download of {:?} failed: {error}", document.file_name);
        if path.exists() && wizard.document().map_or(true, |held| held.path != path) {
            remove_upload(&path).await;
        }
        bot.send_message(msg.chat.id, views::ERROR_NOTIFICATION).await?;
        return Ok(());
    }

    let file_name = document
        .file_name
        .clone()
        .unwrap_or_else(|| "document.pdf".to_string());
    log::info!("Stored {file_name} for chat {} at {}", msg.chat.id.0, path.display());

    wizard.apply(WizardAction::AttachDocument(DocumentHandle::new(
        path, file_name, size,
    )));
    Ok(())
}

async fn download(bot: &Bot, document: &Document, dir: &Path, path: &Path) -> HandlerResult {
    let file = bot.get_file(&document.file.id).await?;
    tokio::fs::create_dir_all(dir).await?;
    let mut destination = tokio::fs::File::create(path).await?;
    bot.download_file(&file.path, &mut destination).await?;
    Ok(())
}

async fn generate(
    bot: &Bot,
    chat_id: ChatId,
    wizard: &mut Wizard,
    generator: &dyn Generator,
) -> HandlerResult {
    let Some(job) = wizard.begin_generation() else {
        bot.send_message(chat_id, views::NOT_AVAILABLE).await?;
        return Ok(());
    };

    // Only cosmetic, so a failure here should not stop the generation.
    let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;

    let outcome = job.run(generator).await;
    if let Err(error) = wizard.finish_generation(outcome) {
        log::warn!("Generation for chat {} failed: {error}", chat_id.0);
        bot.send_message(chat_id, views::ERROR_NOTIFICATION).await?;
    }
    Ok(())
}

async fn send_screen(bot: &Bot, chat_id: ChatId, wizard: &Wizard) -> HandlerResult {
    let Screen { text, keyboard } = views::render(wizard);
    let markup: ReplyMarkup = if keyboard.is_empty() {
        KeyboardRemove::new().into()
    } else {
        KeyboardMarkup::new(
            keyboard
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
        )
        .into()
    };

    let chunks = views::split_message(&text);
    if let Some((last, rest)) = chunks.split_last() {
        for chunk in rest {
            bot.send_message(chat_id, chunk.clone()).await?;
        }
        bot.send_message(chat_id, last.clone())
            .reply_markup(markup)
            .await?;
    }
    Ok(())
}
