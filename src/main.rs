//! Course Companion terminal client
//!
//! Line-oriented chat against the course-assistant backend: pick a
//! subject, ask questions, reset the conversation, or flag a response for
//! professor review. Errors are printed inline and never end the session.

use anyhow::Context;
use course_companion_client::api::{ApiClient, ChatApi};
use course_companion_client::config::Config;
use course_companion_client::session::{ChatSession, SendOutcome, SessionStore};
use course_companion_client::view::{transcript, MessageView, TranscriptLine};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

fn prompt(text: &str) -> anyhow::Result<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}

fn print_bot(view: &MessageView) {
    println!("{}", view.body);
    if let Some(sources) = view.sources_line() {
        println!("{}", sources);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let client = ApiClient::new(&config.api).context("Failed to build HTTP client")?;
    let chat = ChatApi::new(client);

    let subjects = chat.subjects().await.context("Failed to load subjects")?;
    if subjects.is_empty() {
        println!("No subjects with a knowledge base are available yet.");
        return Ok(());
    }

    println!("Available subjects:");
    for subject in &subjects {
        println!("  [{}] {}", subject.id, subject.name);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let subject_id = loop {
        prompt("Select a subject id: ")?;
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        match line.trim().parse::<i64>() {
            Ok(id) if subjects.iter().any(|s| s.id == id) => break id,
            _ => println!("Please enter one of the listed subject ids."),
        }
    };

    let mut store = SessionStore::new(chat);
    if let Err(e) = store.open(subject_id).await {
        // Surfaced but not necessarily fatal: the session may still be
        // usable (e.g. only the history replay failed).
        println!("Error: {}", e);
    }
    let Some(session) = store.get_mut(subject_id) else {
        return Ok(());
    };

    for line in transcript(session.history()) {
        match line {
            TranscriptLine::User(question) => println!("you: {}", question),
            TranscriptLine::Bot(view) => print_bot(&view),
        }
    }

    println!("Chat initialized. How can I help you today?");
    println!("Commands: /reset, /flag, /quit");

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" => break,
            "/reset" => match session.reset().await {
                Ok(()) => println!("Chat history has been reset."),
                Err(e) => println!("Error: {}", e),
            },
            "/flag" => {
                if let Err(e) = flag_last_response(session, &mut lines).await {
                    println!("Error: {}", e);
                }
            }
            question => match session.send(question).await {
                Ok(SendOutcome::Replied(view)) => print_bot(&view),
                Ok(SendOutcome::Busy) => {}
                Err(e) => println!("Error: {}", e),
            },
        }
    }

    Ok(())
}

/// Flag the most recent response and submit it with an optional edit
async fn flag_last_response(
    session: &mut ChatSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let Some(last) = session.history().last() else {
        println!("Nothing to flag yet.");
        return Ok(());
    };

    let response = last.response.clone();
    let prefill = session.flag_for_review(&response);

    println!("Flagging the last response for review.");
    println!("Question: {}", prefill);
    prompt("Press Enter to keep it, or type an edited version: ")?;

    let Some(edit) = lines.next_line().await? else {
        session.discard_feedback();
        return Ok(());
    };

    let edited = if edit.trim().is_empty() {
        prefill
    } else {
        edit.trim().to_string()
    };

    match session.submit_feedback(&edited).await {
        Ok(()) => println!("Thank you! Your question has been submitted for review."),
        Err(e) => println!("Error: {}", e),
    }
    Ok(())
}
