//! The content-to-quiz wizard.
//!
//! [`Wizard`] owns every wizard field and the quiz session that grows out of a generated
//! question list. Callers read snapshots through accessors and change things only through
//! [`Wizard::apply`] and the generation cycle ([`Wizard::generate`], or
//! [`Wizard::begin_generation`] / [`Wizard::finish_generation`] when the caller needs to do
//! something between the two halves).
//!
//! Transitions:
//!
//! | from      | action                         | to        | guard                          |
//! |-----------|--------------------------------|-----------|--------------------------------|
//! | Select    | `SelectContent`                | Upload    |                                |
//! | Upload    | `Proceed`                      | Configure | input present for content type |
//! | Upload    | `Back`                         | Select    |                                |
//! | Configure | generation settles with `Ok`   | Results   | action chosen, not processing  |
//! | Configure | `Back`                         | Upload    | not processing                 |
//! | any       | `Reset`                        | Select    |                                |

pub mod dispatch;

use std::fmt;

use crate::error::Result;
use crate::generation::{DocumentHandle, Generator};
use crate::quiz::{Difficulty, Question, QuestionCount, QuizConfig, QuizSession};

pub use dispatch::{plan, GenerationJob, GenerationRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Step {
    #[default]
    Select,
    Upload,
    Configure,
    Results,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Select, Step::Upload, Step::Configure, Step::Results];

    /// 1-based position in the step indicator.
    pub fn position(self) -> usize {
        match self {
            Step::Select => 1,
            Step::Upload => 2,
            Step::Configure => 3,
            Step::Results => 4,
        }
    }

    /// The input step is named after what it asks for.
    pub fn label(self, content: Option<ContentType>) -> &'static str {
        match (self, content) {
            (Step::Select, _) => "Select Type",
            (Step::Upload, Some(ContentType::Pdf)) => "Upload PDF",
            (Step::Upload, Some(ContentType::YouTube)) => "Enter URL",
            (Step::Upload, Some(ContentType::WebSearch)) => "Web Search",
            (Step::Upload, None) => "Input",
            (Step::Configure, _) => "Configure",
            (Step::Results, _) => "Results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContentType {
    Pdf,
    YouTube,
    WebSearch,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Pdf, ContentType::YouTube, ContentType::WebSearch];

    pub fn label(self) -> &'static str {
        match self {
            ContentType::Pdf => "PDF Document",
            ContentType::YouTube => "YouTube Video",
            ContentType::WebSearch => "Web Search",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The chosen content type together with the only input that makes sense for it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContentSource {
    Pdf { file: Option<DocumentHandle> },
    YouTube { url: String },
    WebSearch { query: String },
}

impl ContentSource {
    pub fn empty(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Pdf => ContentSource::Pdf { file: None },
            ContentType::YouTube => ContentSource::YouTube { url: String::new() },
            ContentType::WebSearch => ContentSource::WebSearch {
                query: String::new(),
            },
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentSource::Pdf { .. } => ContentType::Pdf,
            ContentSource::YouTube { .. } => ContentType::YouTube,
            ContentSource::WebSearch { .. } => ContentType::WebSearch,
        }
    }

    /// Whether the input is enough to leave the upload step.
    pub fn is_ready(&self) -> bool {
        match self {
            ContentSource::Pdf { file } => file.is_some(),
            ContentSource::YouTube { url } => !url.trim().is_empty(),
            ContentSource::WebSearch { query } => !query.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActionType {
    Summarize,
    Quiz,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GenerationResult {
    #[default]
    Empty,
    Summary(String),
    Questions(Vec<Question>),
}

impl GenerationResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, GenerationResult::Empty)
    }
}

/// Snapshot of every wizard-scoped field.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WizardState {
    step: Step,
    content: Option<ContentSource>,
    action: Option<ActionType>,
    quiz_config: QuizConfig,
    processing: bool,
    result: GenerationResult,
}

impl WizardState {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn content(&self) -> Option<&ContentSource> {
        self.content.as_ref()
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.content.as_ref().map(ContentSource::content_type)
    }

    pub fn action(&self) -> Option<ActionType> {
        self.action
    }

    pub fn quiz_config(&self) -> &QuizConfig {
        &self.quiz_config
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    SelectContent(ContentType),
    AttachDocument(DocumentHandle),
    SetVideoUrl(String),
    SetSearchQuery(String),
    Proceed,
    Back,
    ChooseAction(ActionType),
    SetQuestionCount(QuestionCount),
    SetDifficulty(Difficulty),
    SetTopicFilter(Option<String>),
    Reset,
    Answer(usize),
    NextQuestion,
    PreviousQuestion,
    RetakeQuiz,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Wizard {
    state: WizardState,
    session: Option<QuizSession>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// The uploaded document the wizard currently holds, if any.
    pub fn document(&self) -> Option<&DocumentHandle> {
        match &self.state.content {
            Some(ContentSource::Pdf { file }) => file.as_ref(),
            _ => None,
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.state.step == Step::Upload
            && self.state.content.as_ref().map_or(false, ContentSource::is_ready)
    }

    pub fn can_generate(&self) -> bool {
        self.state.step == Step::Configure && !self.state.processing && self.state.action.is_some()
    }

    /// Applies one user action. Returns `false` when the action's guard is not met, in which
    /// case nothing changes.
    pub fn apply(&mut self, action: WizardAction) -> bool {
        let taken = self.transition(&action);
        if taken {
            log::debug!("{action:?} -> {:?}", self.state.step);
        } else {
            log::debug!("{action:?} ignored in {:?}", self.state.step);
        }
        taken
    }

    fn transition(&mut self, action: &WizardAction) -> bool {
        let state = &mut self.state;
        match (state.step, action) {
            (_, WizardAction::Reset) => {
                self.reset();
                true
            }

            (Step::Select, WizardAction::SelectContent(content_type)) => {
                state.content = Some(ContentSource::empty(*content_type));
                state.result = GenerationResult::Empty;
                self.session = None;
                state.step = Step::Upload;
                true
            }

            (Step::Upload, WizardAction::AttachDocument(handle)) => match &mut state.content {
                Some(ContentSource::Pdf { file }) => {
                    *file = Some(handle.clone());
                    true
                }
                _ => false,
            },
            (Step::Upload, WizardAction::SetVideoUrl(new_url)) => match &mut state.content {
                Some(ContentSource::YouTube { url }) => {
                    *url = new_url.clone();
                    true
                }
                _ => false,
            },
            (Step::Upload, WizardAction::SetSearchQuery(new_query)) => match &mut state.content {
                Some(ContentSource::WebSearch { query }) => {
                    *query = new_query.clone();
                    true
                }
                _ => false,
            },
            (Step::Upload, WizardAction::Proceed) => {
                if !self.can_proceed() {
                    return false;
                }
                let state = &mut self.state;
                if state.content_type() == Some(ContentType::WebSearch) {
                    state.action = Some(ActionType::Quiz);
                }
                state.step = Step::Configure;
                true
            }
            (Step::Upload, WizardAction::Back) => {
                state.content = None;
                state.step = Step::Select;
                true
            }

            (Step::Configure, _) if state.processing => false,
            (Step::Configure, WizardAction::Back) => {
                state.step = Step::Upload;
                true
            }
            (Step::Configure, WizardAction::ChooseAction(ActionType::Summarize))
                if state.content_type() == Some(ContentType::WebSearch) =>
            {
                false
            }
            (Step::Configure, WizardAction::ChooseAction(choice)) => {
                state.action = Some(*choice);
                true
            }
            (Step::Configure, WizardAction::SetQuestionCount(count)) => {
                state.quiz_config.question_count = *count;
                true
            }
            (Step::Configure, WizardAction::SetDifficulty(difficulty)) => {
                state.quiz_config.difficulty = *difficulty;
                true
            }
            (Step::Configure, WizardAction::SetTopicFilter(topic)) => {
                state.quiz_config.set_topic_filter(topic.clone());
                true
            }

            (Step::Results, WizardAction::Answer(option)) => self
                .session
                .as_mut()
                .filter(|s| !s.is_completed())
                .map_or(false, |s| s.answer_current(*option)),
            (Step::Results, WizardAction::NextQuestion) => self
                .session
                .as_mut()
                .filter(|s| !s.is_completed())
                .map_or(false, QuizSession::advance),
            (Step::Results, WizardAction::PreviousQuestion) => self
                .session
                .as_mut()
                .filter(|s| !s.is_completed())
                .map_or(false, QuizSession::retreat),
            (Step::Results, WizardAction::RetakeQuiz) => match self.session.as_mut() {
                Some(session) => {
                    session.restart();
                    true
                }
                None => false,
            },

            _ => false,
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Starts a generation cycle: clears the previous result and session, marks the wizard as
    /// processing and returns the job to run. Returns `None` if generation is not allowed right
    /// now, which includes a call already being outstanding.
    pub fn begin_generation(&mut self) -> Option<GenerationJob> {
        if !self.can_generate() {
            log::debug!("Generation refused in {:?}", self.state.step);
            return None;
        }
        let state = &mut self.state;
        let action = state.action?;

        state.processing = true;
        state.result = GenerationResult::Empty;
        self.session = None;

        let request = state
            .content
            .as_ref()
            .and_then(|source| plan(source, action, &state.quiz_config));
        Some(GenerationJob::new(request))
    }

    /// Settles the outstanding generation cycle. On success the wizard moves to Results; on
    /// failure it stays in Configure with nothing half-written, ready for a retry, and the error
    /// is handed back for the user notification.
    pub fn finish_generation(&mut self, outcome: Result<GenerationResult>) -> Result<()> {
        if !self.state.processing {
            log::warn!("Dropping a generation outcome nobody is waiting for");
            return Ok(());
        }
        self.state.processing = false;

        match outcome {
            Ok(GenerationResult::Questions(questions)) if questions.is_empty() => {
                log::warn!("Generator returned no questions");
                self.state.result = GenerationResult::Empty;
            }
            Ok(GenerationResult::Questions(questions)) => {
                log::info!("Received {} questions", questions.len());
                self.session = QuizSession::new(questions.clone());
                self.state.result = GenerationResult::Questions(questions);
            }
            Ok(result) => {
                self.state.result = result;
            }
            Err(error) => {
                log::error!("Generation failed: {error}");
                return Err(error);
            }
        }
        self.state.step = Step::Results;
        Ok(())
    }

    /// Runs a whole generation cycle against `generator`. Does nothing if generation is not
    /// currently allowed.
    pub async fn generate(&mut self, generator: &dyn Generator) -> Result<()> {
        let Some(job) = self.begin_generation() else {
            return Ok(());
        };
        let outcome = job.run(generator).await;
        self.finish_generation(outcome)
    }
}
