use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use lectio::canon::{Canon, Testament};
use lectio::media::ScriptedMedia;
use lectio::player::{
    PlaybackSession, SessionCommands, SessionEvent, SessionObserver, SessionView,
};
use lectio::utils::Config;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Lectio - a scripture audio-playback navigator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Book to open at startup
    #[arg(value_name = "BOOK")]
    book: Option<String>,

    /// Chapter to open at startup
    #[arg(value_name = "CHAPTER")]
    chapter: Option<u32>,

    /// Translation identifier, e.g. kjv
    #[arg(short = 't', long)]
    translation: Option<String>,

    /// Audio CDN base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Autoplay policy: always, when-playback-intended, never
    #[arg(long)]
    autoplay: Option<String>,

    /// Scrub protocol: commit-on-release, continuous
    #[arg(long)]
    scrub: Option<String>,

    /// Simulated chapter length in seconds for the demo media handle
    #[arg(long, default_value = "180")]
    chapter_secs: f64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(translation) = &args.translation {
        config.locator.version = translation.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.locator.base_url = base_url.clone();
    }
    if let Some(policy) = &args.autoplay {
        config.playback.autoplay = policy.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(mode) = &args.scrub {
        config.playback.scrub_mode = mode.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(book) = &args.book {
        config.general.start_book = book.clone();
    }
    if let Some(chapter) = args.chapter {
        config.general.start_chapter = chapter;
    }
    config.validate()?;

    let log_level = if args.debug {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting Lectio v{}", env!("CARGO_PKG_VERSION"));

    let canon = Arc::new(Canon::builtin().clone());
    let media = ScriptedMedia::new(args.chapter_secs);
    let mut session = PlaybackSession::new(
        Arc::clone(&canon),
        media,
        config.locator.clone(),
        config.playback.clone(),
    );
    session.add_observer(Box::new(ConsoleObserver));

    session.go_to_position(&config.general.start_book, config.general.start_chapter);

    // Read stdin on a plain thread; commands join the handle's events in
    // the select loop below, so everything the session sees is serialized
    // onto this one task.
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        use std::io::BufRead;
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if command_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(250));
    print_help();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                session.media_mut().tick(0.25);
            }
            line = command_rx.recv() => {
                match line {
                    Some(line) => {
                        if !dispatch(&mut session, &canon, line.trim()) {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
        pump(&mut session);
    }

    info!("Shutting down");
    Ok(())
}

/// Drain handle events into the session until quiescent.
fn pump(session: &mut PlaybackSession<ScriptedMedia>) {
    loop {
        let events = session.media_mut().take_events();
        if events.is_empty() {
            return;
        }
        for (generation, event) in events {
            session.handle_media_event(generation, event);
        }
    }
}

fn dispatch(session: &mut PlaybackSession<ScriptedMedia>, canon: &Canon, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some(command) => command,
        None => return true,
    };
    let rest = parts.collect::<Vec<_>>().join(" ");

    match command {
        "play" => session.play(),
        "pause" => session.pause(),
        "pp" | "toggle" => session.play_pause(),
        "next" | "n" => session.advance(),
        "prev" | "p" => session.retreat(),
        "ff" => session.fast_forward(),
        "rw" => session.rewind(),
        "retry" => session.retry(),
        "dismiss" => session.dismiss_error(),

        "book" => {
            if rest.is_empty() {
                println!("usage: book <name>");
            } else {
                session.go_to_book(&rest);
            }
        }
        "ch" | "chapter" => match rest.parse::<u32>() {
            Ok(chapter) => session.go_to_chapter(chapter),
            Err(_) => println!("usage: ch <number>"),
        },
        "seek" => match rest.parse::<f64>() {
            Ok(seconds) => session.seek(seconds),
            Err(_) => println!("usage: seek <seconds>"),
        },
        "ver" | "version" => {
            if rest.is_empty() {
                println!("usage: ver <translation>");
            } else {
                session.select_version(&rest);
            }
        }

        "books" => {
            println!("Old Testament:");
            for entry in canon.books_of(Testament::Old) {
                println!("  {} ({})", entry.name, entry.chapters);
            }
            println!("New Testament:");
            for entry in canon.books_of(Testament::New) {
                println!("  {} ({})", entry.name, entry.chapters);
            }
        }
        "status" | "s" => {
            let snapshot = session.snapshot();
            let duration = snapshot
                .metrics
                .duration
                .map(format_time)
                .unwrap_or_else(|| "?".to_string());
            println!(
                "{} {} ({}) - {:?} at {}/{}",
                snapshot.position.book,
                snapshot.position.chapter,
                snapshot.position.version,
                snapshot.state,
                format_time(snapshot.metrics.current_time),
                duration
            );
            if let Some(error) = snapshot.last_error {
                println!("  error: {}", error);
            }
        }

        "help" | "?" => print_help(),
        "quit" | "q" | "exit" => return false,
        other => println!("unknown command '{}', try 'help'", other),
    }
    true
}

fn print_help() {
    println!("commands:");
    println!("  play | pause | pp          transport");
    println!("  next | prev | ff | rw      navigation and skips");
    println!("  book <name> | ch <n>       jump to a book or chapter");
    println!("  seek <secs> | ver <id>     seek or switch translation");
    println!("  retry | dismiss            error recovery");
    println!("  books | status | help      information");
    println!("  quit                       exit");
}

/// Format seconds as m:ss for display.
fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Observer that narrates session changes to the console log
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::StateChanged(state) => info!("State: {:?}", state),
            SessionEvent::PositionChanged(position) => {
                info!(
                    "Position: {} {} ({})",
                    position.book, position.chapter, position.version
                );
            }
            SessionEvent::DurationChanged(duration) => {
                info!("Duration: {}", format_time(*duration));
            }
            SessionEvent::TimeChanged(seconds) => {
                log::debug!("Time: {}", format_time(*seconds));
            }
            SessionEvent::ErrorRaised(error) => error!("{}", error),
            SessionEvent::ErrorCleared => info!("Error cleared"),
        }
    }
}
