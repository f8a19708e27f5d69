//! Built-in answer generators.

use crate::answers::AnswerSet;
use crate::resolver::AnswerGenerator;
use crate::types::{
    Answer, FieldDescriptor, QuestionType, EMAIL_FIELD_ID, OTHER_OPTION,
    OTHER_OPTION_RESPONSE_SUFFIX,
};
use chrono::Local;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Fills fields with plausible random values based on their question type.
pub struct RuleBasedGenerator {
    rng: StdRng,
}

impl RuleBasedGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn choose(&mut self, field: &FieldDescriptor) -> Answer {
        let labelled = field.labelled_options();
        let pool: Vec<&str> = if labelled.is_empty() {
            field.options.iter().flatten().map(String::as_str).collect()
        } else {
            labelled
        };
        pool.choose(&mut self.rng)
            .map(|o| Answer::One(o.to_string()))
            .unwrap_or_else(Answer::empty)
    }

    fn sample(&mut self, field: &FieldDescriptor) -> Answer {
        let pool = field.labelled_options();
        if pool.is_empty() {
            return Answer::Many(Vec::new());
        }
        let k = self.rng.gen_range(1..=pool.len());
        Answer::Many(
            pool.choose_multiple(&mut self.rng, k)
                .map(|o| o.to_string())
                .collect(),
        )
    }
}

impl Default for RuleBasedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerGenerator for RuleBasedGenerator {
    fn answer(&mut self, field: &FieldDescriptor) -> Answer {
        if field.is_pseudo() && field.id == EMAIL_FIELD_ID {
            return Answer::One(format!("user{}@example.com", self.rng.gen_range(1000..10000)));
        }

        let Some(question) = field.question_type() else {
            return Answer::empty();
        };

        match question {
            QuestionType::ShortAnswer | QuestionType::Paragraph => {
                if field.required {
                    "Ok!".into()
                } else {
                    Answer::empty()
                }
            }
            QuestionType::MultipleChoice
            | QuestionType::Dropdown
            | QuestionType::LinearScale
            | QuestionType::Grid => self.choose(field),
            QuestionType::Checkboxes => self.sample(field),
            QuestionType::Date => Local::now().format("%Y-%m-%d").to_string().into(),
            QuestionType::Time => Local::now().format("%H:%M").to_string().into(),
            _ => Answer::empty(),
        }
    }
}

/// Answers from a prepared [`AnswerSet`], falling back to another generator
/// for keys the set doesn't cover.
pub struct ScriptedGenerator<G = RuleBasedGenerator> {
    answers: AnswerSet,
    fallback: G,
}

impl ScriptedGenerator<RuleBasedGenerator> {
    pub fn new(answers: AnswerSet) -> Self {
        Self::with_fallback(answers, RuleBasedGenerator::new())
    }
}

impl<G: AnswerGenerator> ScriptedGenerator<G> {
    pub fn with_fallback(answers: AnswerSet, fallback: G) -> Self {
        Self { answers, fallback }
    }
}

impl<G: AnswerGenerator> AnswerGenerator for ScriptedGenerator<G> {
    fn answer(&mut self, field: &FieldDescriptor) -> Answer {
        let key = field.submission_key();
        let Some(value) = self.answers.get(&key) else {
            return self.fallback.answer(field);
        };

        // A set produced from a previous payload carries the "other" marker
        // plus its text under the companion key; feed the text back in.
        if value.as_str() == Some(OTHER_OPTION) {
            let companion = format!("{key}{OTHER_OPTION_RESPONSE_SUFFIX}");
            if let Some(text) = self.answers.get(&companion).and_then(|v| v.as_str()) {
                return text.into();
            }
        }

        Answer::from_json(value)
    }
}
