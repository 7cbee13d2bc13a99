mod quiz;

use dotenv::dotenv;
use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateHandler},
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId},
};

use quiz::{loader, Phase, QuizSession};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Idle,
    Active {
        session: QuizSession,
        message: MessageId,
    },
}

#[tokio::main]
async fn main() {
    dotenv().expect("Failed to load .env file");

    pretty_env_logger::init();
    log::info!("Starting trivia bot...");

    let bot = Bot::from_env();
    let client = reqwest::Client::new();

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![InMemStorage::<State>::new(), client])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let message_handler = Update::filter_message()
        .branch(dptree::case![State::Idle].endpoint(start_quiz))
        .branch(dptree::case![State::Active { session, message }].endpoint(remind_buttons));

    let callback_handler = Update::filter_callback_query()
        .branch(dptree::case![State::Idle].endpoint(retry_load))
        .branch(dptree::case![State::Active { session, message }].endpoint(handle_button));

    dialogue::enter::<Update, InMemStorage<State>, State, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

/// Any message while idle kicks off a fresh round.
async fn start_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    client: reqwest::Client,
    _msg: Message,
) -> HandlerResult {
    run_load(&bot, &dialogue, &client, QuizSession::new(), None).await
}

async fn remind_buttons(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Tap the answer buttons above; Check answers submits the round.",
    )
    .await?;
    Ok(())
}

/// "Try again" after a failed load. The session never left Loading, so this
/// is just another load attempt against the same failure message.
async fn retry_load(
    bot: Bot,
    dialogue: QuizDialogue,
    client: reqwest::Client,
    q: CallbackQuery,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;
    if q.data.as_deref() != Some("again") {
        return Ok(());
    }
    let reuse = q.message.as_ref().map(|m| m.id);
    run_load(&bot, &dialogue, &client, QuizSession::new(), reuse).await
}

async fn handle_button(
    bot: Bot,
    dialogue: QuizDialogue,
    client: reqwest::Client,
    (mut session, message): (QuizSession, MessageId),
    q: CallbackQuery,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;
    let Some(data) = q.data else {
        return Ok(());
    };
    let chat_id = dialogue.chat_id();

    match data.as_str() {
        "submit" => {
            session.submit();
            // no summary means the session wasn't Ready, so there is
            // nothing to redraw
            let Some(summary) = session.score_message() else {
                return Ok(());
            };
            bot.edit_message_text(
                chat_id,
                message,
                format!("{}\n\n{}", question_sheet(&session), summary),
            )
            .reply_markup(result_keyboard(&session))
            .await?;
            dialogue.update(State::Active { session, message }).await?;
        }
        "again" => {
            run_load(&bot, &dialogue, &client, session, Some(message)).await?;
        }
        other => {
            let Some((index, answer_index)) = parse_answer_data(other) else {
                return Ok(());
            };
            let Some(answer) = session
                .questions()
                .get(index)
                .and_then(|question| question.answers.get(answer_index))
                .cloned()
            else {
                return Ok(());
            };

            let previous = session.selection(index).map(str::to_string);
            session.select_answer(index, &answer);
            let changed = session.selection(index) != previous.as_deref();

            // Telegram rejects markup edits that change nothing
            if changed && session.phase() == Phase::Ready {
                bot.edit_message_reply_markup(chat_id, message)
                    .reply_markup(answer_keyboard(&session))
                    .await?;
            }
            dialogue.update(State::Active { session, message }).await?;
        }
    }
    Ok(())
}

const LOADING_TEXT: &str = "Fetching fresh questions...";

/// Resets the session, fetches a batch and redraws. On failure the chat gets
/// a retry button and the dialogue drops back to Idle; nothing is loaded and
/// no automatic retry happens.
async fn run_load(
    bot: &Bot,
    dialogue: &QuizDialogue,
    client: &reqwest::Client,
    mut session: QuizSession,
    reuse: Option<MessageId>,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();
    let token = session.reset();

    // editing without a markup also clears the old keyboard, so nothing is
    // clickable while the fetch is in flight
    let message = match reuse {
        Some(id) => {
            bot.edit_message_text(chat_id, id, LOADING_TEXT).await?;
            id
        }
        None => bot.send_message(chat_id, LOADING_TEXT).await?.id,
    };

    match loader::fetch_questions(client).await {
        Ok(questions) => {
            if !session.apply_load(token, questions) {
                return Ok(());
            }
            bot.edit_message_text(chat_id, message, question_sheet(&session))
                .reply_markup(answer_keyboard(&session))
                .await?;
            dialogue.update(State::Active { session, message }).await?;
        }
        Err(err) => {
            log::error!("failed to load questions: {}", err);
            bot.edit_message_text(
                chat_id,
                message,
                "Couldn't reach the trivia service. Nothing was loaded.",
            )
            .reply_markup(retry_keyboard())
            .await?;
            dialogue.update(State::Idle).await?;
        }
    }
    Ok(())
}

fn parse_answer_data(data: &str) -> Option<(usize, usize)> {
    let rest = data.strip_prefix("a:")?;
    let (index, answer_index) = rest.split_once(':')?;
    Some((index.parse().ok()?, answer_index.parse().ok()?))
}

fn question_sheet(session: &QuizSession) -> String {
    let mut sheet = String::from(
        "🎲 Trivia time! Pick an answer for every question, then hit Check answers.",
    );
    for (index, question) in session.questions().iter().enumerate() {
        sheet.push_str(&format!("\n\n{}. {}", index + 1, question.text));
    }
    sheet
}

fn answer_keyboard(session: &QuizSession) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    for (index, question) in session.questions().iter().enumerate() {
        for (answer_index, answer) in question.answers.iter().enumerate() {
            let label = if session.selection(index) == Some(answer.as_str()) {
                format!("🔘 {}. {}", index + 1, answer)
            } else {
                format!("{}. {}", index + 1, answer)
            };
            rows.push(vec![InlineKeyboardButton::callback(
                label,
                format!("a:{}:{}", index, answer_index),
            )]);
        }
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "Check answers",
        "submit",
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// Frozen view after submission: the correct answer, the user's wrong pick
/// and the rest get distinct markers, and the buttons go inert ("noop" is
/// never matched by the callback handler).
fn result_keyboard(session: &QuizSession) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    for (index, question) in session.questions().iter().enumerate() {
        for answer in &question.answers {
            let marker = if *answer == question.correct_answer {
                "✅"
            } else if session.selection(index) == Some(answer.as_str()) {
                "❌"
            } else {
                "▫️"
            };
            rows.push(vec![InlineKeyboardButton::callback(
                format!("{} {}. {}", marker, index + 1, answer),
                "noop",
            )]);
        }
    }
    rows.push(vec![InlineKeyboardButton::callback("Play again", "again")]);
    InlineKeyboardMarkup::new(rows)
}

fn retry_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Try again", "again",
    )]])
}
