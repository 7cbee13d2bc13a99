use rand::Rng;
use serde_json::Value;

use crate::quiz::{shuffle, text, Question};

/// Open Trivia DB endpoint.
const TRIVIA_API_URL: &str = "https://opentdb.com/api.php";

/// How many questions a quiz round asks for.
pub const QUESTION_COUNT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("trivia request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("trivia service answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed trivia payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One record of the API's `results` array, after entity decoding.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    /// "boolean" or "multiple"; carried for completeness, scoring ignores it.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TriviaResponse {
    pub results: Vec<RawQuestion>,
}

/// Fetches one batch of questions. No retry; a failed fetch leaves the
/// session where it was and the caller decides how to surface the error.
pub async fn fetch_questions(client: &reqwest::Client) -> Result<Vec<Question>, LoadError> {
    let url = format!("{}?amount={}", TRIVIA_API_URL, QUESTION_COUNT);
    log::debug!("fetching {} questions from {}", QUESTION_COUNT, url);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(LoadError::Status(response.status()));
    }

    let body = response.text().await?;
    let payload = parse_payload(&body)?;
    Ok(build_questions(payload, &mut rand::thread_rng()))
}

/// Parses the raw body: JSON first, then entity decoding over the whole
/// payload, then the typed shape. Decoding before deserializing matches how
/// the API escapes every text field, keys included in principle.
pub fn parse_payload(body: &str) -> Result<TriviaResponse, LoadError> {
    let payload: Value = serde_json::from_str(body)?;
    let payload = text::decode_entities(payload);
    let response = serde_json::from_value(payload)?;
    Ok(response)
}

/// Turns raw records into presentable questions: incorrect answers plus the
/// correct one, shuffled, with "True" forced first for boolean questions.
pub fn build_questions<R: Rng + ?Sized>(payload: TriviaResponse, rng: &mut R) -> Vec<Question> {
    payload
        .results
        .into_iter()
        .map(|raw| {
            let mut answers = raw.incorrect_answers;
            answers.push(raw.correct_answer.clone());
            let answers = shuffle::true_first(shuffle::shuffle_answers(&answers, rng));
            Question::new(raw.question, raw.correct_answer, answers)
        })
        .collect()
}
