//! Interactive quiz session.
//!
//! The session is a two-state machine (running, ended) driven one answer at
//! a time through [`QuizSession::step`], which takes the current
//! [`QuizState`] and returns the next one. [`QuizSession::run`] wraps the
//! step function in a read/print loop over any `BufRead`/`Write` pair, so
//! the binary passes stdin/stdout and tests pass in-memory buffers.
//!
//! Questions are shuffled once when the session is created and then asked
//! cyclically, forever, until the user types `end`.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::llm::LanguageModel;
use crate::models::Question;

/// Answer that ends the quiz (case-insensitive).
pub const END_COMMAND: &str = "end";

/// Answers scored as incorrect without asking the model.
pub const DONT_KNOW_ANSWERS: [&str; 5] = ["dont know", "i don't know", "no idea", "", "idk"];

pub fn is_end(answer: &str) -> bool {
    answer.trim().to_lowercase() == END_COMMAND
}

pub fn is_dont_know(answer: &str) -> bool {
    let normalized = answer.trim().to_lowercase();
    DONT_KNOW_ANSWERS.contains(&normalized.as_str())
}

/// Only an exact `correct` (ignoring case and surrounding whitespace) passes.
pub fn is_correct_verdict(response: &str) -> bool {
    response.trim().to_lowercase() == "correct"
}

pub fn judge_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"
You are a helpful assistant. Evaluate if the user's answer is correct or not.

Question: {question}
User's answer: {answer}

Reply only with "Correct" or "Incorrect".
"#
    )
}

pub fn reveal_prompt(question: &str) -> String {
    format!(
        r#"
What is the correct answer to this question? Please give a short answer or correct option letter.

Question: {question}
"#
    )
}

/// Ask the model whether `answer` is right.
pub async fn check_answer(
    model: &dyn LanguageModel,
    question: &Question,
    answer: &str,
) -> Result<bool> {
    let verdict = model.invoke(&judge_prompt(question.text(), answer)).await?;
    tracing::debug!(verdict = %verdict.trim(), "judge verdict");
    Ok(is_correct_verdict(&verdict))
}

/// Ask the model for the expected answer (or option letter), trimmed.
pub async fn get_correct_answer(model: &dyn LanguageModel, question: &Question) -> Result<String> {
    let answer = model.invoke(&reveal_prompt(question.text())).await?;
    Ok(answer.trim().to_string())
}

/// Run-scoped counters. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizState {
    /// Questions answered so far (the `end` answer is not counted).
    pub asked: usize,
    /// Answers judged correct.
    pub score: usize,
}

impl QuizState {
    fn record(self, correct: bool) -> Self {
        Self {
            asked: self.asked + 1,
            score: self.score + usize::from(correct),
        }
    }
}

/// What the user is told after an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// A don't-know answer; the model was not consulted.
    NoAnswer,
    Correct,
    Incorrect { correct_answer: String },
}

/// Result of feeding one answer to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Ended(QuizState),
    Answered { state: QuizState, feedback: Feedback },
}

pub struct QuizSession<'a> {
    model: &'a dyn LanguageModel,
    questions: Vec<Question>,
}

impl<'a> QuizSession<'a> {
    /// Shuffle `questions` with `rng` and start a session.
    ///
    /// Returns `None` when there are no questions to ask.
    pub fn new<R: Rng + ?Sized>(
        model: &'a dyn LanguageModel,
        mut questions: Vec<Question>,
        rng: &mut R,
    ) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        questions.shuffle(rng);
        Some(Self { model, questions })
    }

    /// Questions in asking order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question asked at `state`, cycling through the list.
    pub fn current_question(&self, state: QuizState) -> &Question {
        &self.questions[state.asked % self.questions.len()]
    }

    /// Grade one answer to the current question.
    ///
    /// Model errors are returned as-is; the caller decides whether they end
    /// the program.
    pub async fn step(&self, state: QuizState, answer: &str) -> Result<Step> {
        if is_end(answer) {
            return Ok(Step::Ended(state));
        }

        let question = self.current_question(state);

        if is_dont_know(answer) {
            return Ok(Step::Answered {
                state: state.record(false),
                feedback: Feedback::NoAnswer,
            });
        }

        if check_answer(self.model, question, answer.trim()).await? {
            return Ok(Step::Answered {
                state: state.record(true),
                feedback: Feedback::Correct,
            });
        }

        let correct_answer = get_correct_answer(self.model, question).await?;
        Ok(Step::Answered {
            state: state.record(false),
            feedback: Feedback::Incorrect { correct_answer },
        })
    }

    /// Read answers from `input` until `end` (or end of input) and print the
    /// dialogue to `output`. Returns the final state after printing the score.
    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, output: &mut W) -> Result<QuizState> {
        let mut state = QuizState::default();

        loop {
            writeln!(output, "Q{}: {}", state.asked + 1, self.current_question(state))?;
            write!(output, "Your answer: ")?;
            output.flush()?;

            let mut line = String::new();
            let answer = if input.read_line(&mut line)? == 0 {
                // stdin closed
                END_COMMAND
            } else {
                line.trim()
            };

            match self.step(state, answer).await? {
                Step::Ended(final_state) => {
                    state = final_state;
                    writeln!(output, "Ending quiz. Thanks for playing!")?;
                    break;
                }
                Step::Answered {
                    state: next,
                    feedback,
                } => {
                    match feedback {
                        Feedback::NoAnswer => writeln!(output, " Incorrect (no answer provided).\n")?,
                        Feedback::Correct => writeln!(output, " Correct!\n")?,
                        Feedback::Incorrect { correct_answer } => {
                            writeln!(output, " Incorrect. Correct answer: {}\n", correct_answer)?
                        }
                    }
                    state = next;
                }
            }
        }

        writeln!(output, "Final score: {} out of {}", state.score, state.asked)?;
        tracing::info!(score = state.score, asked = state.asked, "quiz finished");
        Ok(state)
    }
}
