use anyhow::Result;
use newshub::auth::{AuthFlow, AuthNavigation};
use newshub::backend::HttpBackend;
use newshub::bookmark::{BookmarkFlow, SaveOutcome};
use newshub::engine::ConversationEngine;
use newshub::parser::source_hostname;
use newshub::prefs::PreferenceStore;
use newshub::types::{Message, Role};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

const HELP: &str = "\
Commands:
  /save          bookmark the latest answer
  /saved         list your bookmarks
  /delete <id>   remove a bookmark
  /login         sign in
  /signup        create an account
  /logout        sign out
  /theme         toggle light/dark
  /reset         start a new chat
  /quit          exit";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let backend = Arc::new(HttpBackend::from_env());
    let prefs = PreferenceStore::open_default();
    let engine = ConversationEngine::with_greeting(backend.clone());
    let bookmarks = BookmarkFlow::new(backend.clone(), prefs.clone());
    let auth = AuthFlow::new(backend, prefs.clone());

    println!("NewsHub ({} theme)", theme_label(&prefs));
    match prefs.identity() {
        Some(user) => println!("Signed in as {}", user.username),
        None => println!("Browsing as guest; /login to enable bookmarks"),
    }
    println!("{HELP}\n");
    for message in engine.thread() {
        render_message(&message);
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => {}
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/reset" => {
                engine.reset();
                println!("Started a new chat.");
            }
            "/theme" => {
                prefs.set_theme(prefs.theme().toggled());
                println!("Theme set to {}.", theme_label(&prefs));
            }
            "/logout" => {
                navigate(auth.logout());
            }
            "/login" => {
                let email = prompt("Email: ")?;
                let password = prompt("Password: ")?;
                match auth.login(email.trim(), password.trim()).await {
                    Ok(user) => {
                        println!("Welcome back, {}!", user.username);
                        navigate(AuthNavigation::Chat);
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "/signup" => {
                let username = prompt("Username: ")?;
                let email = prompt("Email: ")?;
                let password = prompt("Password: ")?;
                match auth
                    .signup(username.trim(), email.trim(), password.trim())
                    .await
                {
                    Ok(()) => {
                        println!("Account created.");
                        navigate(AuthNavigation::Login);
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "/save" => match latest_answer(&engine) {
                Some(message) => match bookmarks.save(&message).await {
                    SaveOutcome::Saved => println!("News saved successfully!"),
                    SaveOutcome::RedirectToLogin => navigate(AuthNavigation::Login),
                    SaveOutcome::Failed => {}
                },
                None => println!("Nothing to save yet."),
            },
            "/saved" => match prefs.identity() {
                Some(user) => match bookmarks.list(user.id).await {
                    Ok(items) if items.is_empty() => println!("No saved news yet."),
                    Ok(items) => {
                        for item in items {
                            println!("[{}] {}", item.id, item.question.as_deref().unwrap_or("-"));
                            println!("    {}", item.summary);
                            for source in &item.sources {
                                println!("    - {} ({})", source.title, source_hostname(&source.url));
                            }
                            println!("    saved {}", item.saved_at);
                        }
                    }
                    Err(err) => println!("Could not fetch saved news: {err}"),
                },
                None => navigate(AuthNavigation::Login),
            },
            other if other.starts_with("/delete") => {
                match other.trim_start_matches("/delete").trim().parse::<i64>() {
                    Ok(id) => match bookmarks.remove(id).await {
                        Ok(()) => println!("Removed."),
                        Err(err) => println!("Could not remove bookmark: {err}"),
                    },
                    Err(_) => println!("Usage: /delete <id>"),
                }
            }
            other if other.starts_with('/') => println!("Unknown command. {HELP}"),
            question => {
                engine.submit(question).await;
                if let Some(message) = engine.thread().last() {
                    render_message(message);
                }
            }
        }
    }

    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn navigate(target: AuthNavigation) {
    match target {
        AuthNavigation::Login => println!("-- login: use /login or /signup --"),
        AuthNavigation::Chat => println!("-- back to chat --"),
    }
}

fn latest_answer(engine: &ConversationEngine) -> Option<Message> {
    engine
        .thread()
        .into_iter()
        .rev()
        .find(|message| message.role == Role::Assistant && message.question.is_some())
}

fn render_message(message: &Message) {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "newshub",
    };
    match format_timestamp(message.created_at) {
        Some(ts) => println!("[{speaker} {ts}] {}", message.content),
        None => println!("[{speaker}] {}", message.content),
    }
    if !message.sources.is_empty() {
        println!("  Sources:");
        for (i, source) in message.sources.iter().enumerate() {
            println!(
                "  {}. {} ({})",
                i + 1,
                source.title,
                source_hostname(&source.url)
            );
        }
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn theme_label(prefs: &PreferenceStore) -> &'static str {
    match prefs.theme() {
        newshub::types::ThemeMode::Light => "light",
        newshub::types::ThemeMode::Dark => "dark",
    }
}
