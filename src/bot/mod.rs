pub mod handlers;
pub mod views;

use teloxide::{
    dispatching::{dialogue::ErasedStorage, UpdateHandler},
    prelude::*,
};

use crate::wizard::Wizard;

pub type WizardDialogue = Dialogue<BotState, ErasedStorage<BotState>>;
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

/// Per-chat dialogue state, persisted between updates.
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum BotState {
    #[default]
    Start,
    Active {
        wizard: Wizard,
    },
}

pub fn schema() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .enter_dialogue::<Message, ErasedStorage<BotState>, BotState>()
        .branch(dptree::case![BotState::Start].endpoint(handlers::start))
        .branch(dptree::case![BotState::Active { wizard }].endpoint(handlers::active))
}
