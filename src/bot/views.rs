//! What the chat shows for a wizard snapshot, and how button presses map back to actions.
//!
//! Everything here is a pure function of [`Wizard`], so screens can be checked without Telegram.

use crate::quiz::{Difficulty, Question, QuestionCount, QuizReport, QuizSession};
use crate::wizard::{ActionType, ContentSource, ContentType, GenerationResult, Step, Wizard, WizardAction};

pub const CONTINUE: &str = "Continue";
pub const BACK: &str = "Back";
pub const START_OVER: &str = "Start Over";
pub const SUMMARIZE: &str = "Summarize";
pub const MAKE_QUIZ: &str = "Generate Quiz";
pub const GENERATE: &str = "Generate";
pub const CLEAR_TOPIC: &str = "Clear Topic";
pub const PREVIOUS: &str = "Previous";
pub const NEXT: &str = "Next";
pub const FINISH: &str = "Finish Quiz";
pub const RETAKE: &str = "Retake Quiz";

pub const GREETING: &str = "Hi! Send me a PDF, a YouTube link or a topic and I will summarize it \
                            or quiz you on it.";
pub const ERROR_NOTIFICATION: &str = "Error processing content. Please try again.";
pub const NOT_AVAILABLE: &str = "That option is not available right now.";

/// Telegram rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Vec<Vec<String>>,
}

/// What a piece of user text asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Action(WizardAction),
    Generate,
}

pub fn render(wizard: &Wizard) -> Screen {
    let state = wizard.state();
    let header = format!(
        "Step {} of {}: {}",
        state.step().position(),
        Step::ALL.len(),
        state.step().label(state.content_type())
    );

    let (body, keyboard) = match state.step() {
        Step::Select => select_screen(),
        Step::Upload => upload_screen(wizard),
        Step::Configure => configure_screen(wizard),
        Step::Results => results_screen(wizard),
    };

    Screen {
        text: format!("{header}\n\n{body}"),
        keyboard,
    }
}

fn select_screen() -> (String, Vec<Vec<String>>) {
    let keyboard = ContentType::ALL
        .iter()
        .map(|c| vec![c.label().to_string()])
        .collect();
    ("What would you like to work with?".to_string(), keyboard)
}

fn upload_screen(wizard: &Wizard) -> (String, Vec<Vec<String>>) {
    let body = match wizard.state().content() {
        Some(ContentSource::Pdf { file: None }) => {
            "Send me a PDF document.".to_string()
        }
        Some(ContentSource::Pdf { file: Some(file) }) => format!(
            "Got {} ({:.2} MB). Send another file to replace it.",
            file.file_name,
            file.size_mb()
        ),
        Some(ContentSource::YouTube { url }) if url.trim().is_empty() => {
            "Send me a YouTube link.".to_string()
        }
        Some(ContentSource::YouTube { url }) => format!("Video: {}", url.trim()),
        Some(ContentSource::WebSearch { query }) if query.trim().is_empty() => {
            "What topic should the quiz be about?".to_string()
        }
        Some(ContentSource::WebSearch { query }) => format!("Topic: {}", query.trim()),
        None => String::new(),
    };

    let mut keyboard = Vec::new();
    if wizard.can_proceed() {
        keyboard.push(vec![CONTINUE.to_string()]);
    }
    keyboard.push(vec![BACK.to_string(), START_OVER.to_string()]);
    (body, keyboard)
}

fn configure_screen(wizard: &Wizard) -> (String, Vec<Vec<String>>) {
    let state = wizard.state();
    let web_search = state.content_type() == Some(ContentType::WebSearch);
    let config = state.quiz_config();

    if state.is_processing() {
        return ("Working on it...".to_string(), Vec::new());
    }

    let mut lines = Vec::new();
    let mut keyboard = Vec::new();

    if web_search {
        lines.push("Web search content can only be turned into a quiz.".to_string());
    } else {
        keyboard.push(vec![SUMMARIZE.to_string(), MAKE_QUIZ.to_string()]);
    }

    match state.action() {
        None => lines.push("Should I summarize it or make a quiz?".to_string()),
        Some(ActionType::Summarize) => lines.push("Action: Summarize".to_string()),
        Some(ActionType::Quiz) => {
            lines.push("Action: Quiz".to_string());
            lines.push(format!("Questions: {}", config.question_count.get()));
            lines.push(format!("Difficulty: {}", config.difficulty));
            keyboard.push(QuestionCount::ALL.iter().map(|c| count_label(*c)).collect());
            keyboard.push(Difficulty::ALL.iter().map(|d| d.label().to_string()).collect());

            if !web_search {
                match config.topic_filter() {
                    Some(topic) => {
                        lines.push(format!("Focus on: {topic}"));
                        keyboard.push(vec![CLEAR_TOPIC.to_string()]);
                    }
                    None => lines.push(
                        "Send a message to focus the quiz on a specific area.".to_string(),
                    ),
                }
            }
        }
    }

    if wizard.can_generate() {
        keyboard.push(vec![GENERATE.to_string()]);
    }
    keyboard.push(vec![BACK.to_string(), START_OVER.to_string()]);
    (lines.join("\n"), keyboard)
}

fn results_screen(wizard: &Wizard) -> (String, Vec<Vec<String>>) {
    let start_over = vec![vec![START_OVER.to_string()]];
    match (wizard.state().result(), wizard.session()) {
        (GenerationResult::Summary(summary), _) => (format!("Summary\n\n{summary}"), start_over),
        (GenerationResult::Questions(_), Some(session)) if session.is_completed() => (
            report_text(&QuizReport::from_session(session)),
            vec![vec![RETAKE.to_string(), START_OVER.to_string()]],
        ),
        (GenerationResult::Questions(_), Some(session)) => question_screen(session),
        _ => ("No data available.".to_string(), start_over),
    }
}

fn question_screen(session: &QuizSession) -> (String, Vec<Vec<String>>) {
    let question = session.current_question();
    let (number, total) = session.progress();
    let chosen = session.answer_for(question.id);

    let mut text = format!(
        "Question {number} of {total} ({})\n\n{}",
        question.difficulty, question.prompt
    );
    if let Some(chosen) = chosen {
        text.push_str(&format!("\n\nYour answer: {}", option_label(question, chosen)));
    }

    let mut keyboard: Vec<Vec<String>> = (0..question.options.len())
        .map(|i| vec![option_label(question, i)])
        .collect();

    let mut navigation = Vec::new();
    if session.current_index() > 0 {
        navigation.push(PREVIOUS.to_string());
    }
    if session.can_advance() {
        let next = if session.is_last_question() { FINISH } else { NEXT };
        navigation.push(next.to_string());
    }
    if !navigation.is_empty() {
        keyboard.push(navigation);
    }
    keyboard.push(vec![START_OVER.to_string()]);
    (text, keyboard)
}

pub fn report_text(report: &QuizReport) -> String {
    let mut text = format!(
        "Quiz complete!\n\nScore: {} / {} ({}%)\nEasy: {}  Medium: {}  Hard: {}\n\nReview:",
        report.score,
        report.total,
        report.percentage,
        report.breakdown.easy,
        report.breakdown.medium,
        report.breakdown.hard
    );
    for row in &report.review {
        let mark = if row.is_correct { "✅" } else { "❌" };
        text.push_str(&format!("\n\n{mark} {}. {}", row.number, row.prompt));
        match &row.chosen {
            Some(chosen) => text.push_str(&format!("\nYour answer: {chosen}")),
            None => text.push_str("\nYour answer: none"),
        }
        if !row.is_correct {
            text.push_str(&format!("\nCorrect answer: {}", row.correct));
        }
    }
    text
}

fn count_label(count: QuestionCount) -> String {
    format!("{} questions", count.get())
}

fn option_label(question: &Question, index: usize) -> String {
    let letter = (b'A' + index as u8) as char;
    format!("{letter}. {}", question.options[index])
}

/// Maps a message onto what it asks for at the current step. Free text counts as input where the
/// step takes input, otherwise it is not understood.
pub fn interpret(wizard: &Wizard, text: &str) -> Option<Input> {
    let text = text.trim();
    let state = wizard.state();

    if text == START_OVER || text == "/start" || text == "/reset" {
        return Some(Input::Action(WizardAction::Reset));
    }

    let action = match state.step() {
        Step::Select => ContentType::ALL
            .into_iter()
            .find(|c| c.label() == text)
            .map(WizardAction::SelectContent)?,

        Step::Upload => match (text, state.content()) {
            (CONTINUE, _) => WizardAction::Proceed,
            (BACK, _) => WizardAction::Back,
            (_, Some(ContentSource::YouTube { .. })) => WizardAction::SetVideoUrl(text.to_string()),
            (_, Some(ContentSource::WebSearch { .. })) => {
                WizardAction::SetSearchQuery(text.to_string())
            }
            _ => return None,
        },

        Step::Configure => match text {
            GENERATE => return Some(Input::Generate),
            BACK => WizardAction::Back,
            SUMMARIZE => WizardAction::ChooseAction(ActionType::Summarize),
            MAKE_QUIZ => WizardAction::ChooseAction(ActionType::Quiz),
            CLEAR_TOPIC => WizardAction::SetTopicFilter(None),
            _ => {
                if let Some(count) = QuestionCount::ALL.into_iter().find(|c| count_label(*c) == text) {
                    WizardAction::SetQuestionCount(count)
                } else if let Some(difficulty) = Difficulty::from_label(text) {
                    WizardAction::SetDifficulty(difficulty)
                } else if state.action() == Some(ActionType::Quiz)
                    && state.content_type() != Some(ContentType::WebSearch)
                {
                    WizardAction::SetTopicFilter(Some(text.to_string()))
                } else {
                    return None;
                }
            }
        },

        Step::Results => match text {
            NEXT | FINISH => WizardAction::NextQuestion,
            PREVIOUS => WizardAction::PreviousQuestion,
            RETAKE => WizardAction::RetakeQuiz,
            _ => {
                let question = wizard.session()?.current_question();
                (0..question.options.len())
                    .find(|i| option_label(question, *i) == text)
                    .map(WizardAction::Answer)?
            }
        },
    };
    Some(Input::Action(action))
}

/// Splits text into chunks Telegram accepts, preferring line breaks.
pub fn split_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if current.chars().count() + line.chars().count() > MESSAGE_LIMIT && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if line.chars().count() > MESSAGE_LIMIT {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(MESSAGE_LIMIT) {
                chunks.push(piece.iter().collect());
            }
        } else {
            current.push_str(line);
        }
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
