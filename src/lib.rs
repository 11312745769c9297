//! A Telegram bot that turns PDFs, YouTube videos and web search topics into summaries or
//! multiple-choice quizzes.

pub mod bot;
pub mod config;
pub mod error;
pub mod generation;
pub mod quiz;
pub mod wizard;
