use anyhow::Context;
use clap::Parser;
use gridbot_client::view::controls;
use gridbot_client::{
    ClientConfig, Controller, Document, Element, Navigator, UiEvent, DEFAULT_BASE_URL,
};
use gridbot_protocol::targets;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "gridbot-term", about = "Terminal client for the gridbot puzzle server")]
pub struct Cli {
    /// Game server address; `/state`, `/command` and `/export` live under it.
    #[arg(long, env = "GRIDBOT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How long an error message stays on screen.
    #[arg(long, env = "GRIDBOT_MESSAGE_TIMEOUT_MS", default_value_t = 4000)]
    pub message_timeout_ms: u64,

    /// Render every snapshot in arrival order, even answers to older requests.
    #[arg(long)]
    pub keep_stale: bool,

    /// Log filter (tracing `EnvFilter` syntax). Logs go to stderr.
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log: String,
}

impl Cli {
    pub fn into_config(self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url,
            message_timeout: Duration::from_millis(self.message_timeout_ms),
            discard_stale_snapshots: !self.keep_stale,
        }
    }
}

pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Keyboard shortcuts for the standard controls. Any other input is taken as
/// the id of the element to click.
pub const KEYS: [(&str, &str, &str); 7] = [
    ("w", "up", controls::MOVE_UP),
    ("a", "left", controls::MOVE_LEFT),
    ("d", "right", controls::MOVE_RIGHT),
    ("s", "down", controls::MOVE_DOWN),
    ("p", "pick", controls::PICK_UP),
    ("o", "drop", controls::DROP),
    ("e", "export", targets::EXPORT_BTN),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Click(UiEvent),
    Help,
    Quit,
    Nothing,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Nothing,
        "q" | "quit" | "exit" => Input::Quit,
        "?" | "h" | "help" => Input::Help,
        _ => {
            let target = KEYS
                .iter()
                .find(|(key, word, _)| line == *key || line == *word)
                .map_or(line, |(_, _, id)| *id);
            Input::Click(UiEvent::click(target))
        }
    }
}

pub fn help_text() -> String {
    let mut out = String::from("keys:");
    for (key, word, _) in KEYS {
        let _ = write!(out, " {key}/{word}");
    }
    out.push_str(" q/quit ?/help (or type an element id)\n");
    out
}

/// Draws the page as text: one line per grid row, then holding and message.
pub fn present(doc: &Document) -> String {
    let mut out = String::new();

    if let Some(grid) = doc.get(targets::GRID) {
        let mut rows: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for cell in &grid.children {
            let y = cell.data("y").and_then(|y| y.parse().ok()).unwrap_or(0);
            rows.entry(y).or_default().push(cell_label(cell));
        }
        if rows.is_empty() {
            out.push_str("(no grid)\n");
        }
        for cells in rows.values() {
            for label in cells {
                let _ = write!(out, "[{label:<4}]");
            }
            out.push('\n');
        }
    }

    if let Some(holding) = doc.get(targets::HOLDING) {
        let held: String = holding.children.iter().map(marker_letter).collect();
        let shown = if held.is_empty() { holding.text.as_str() } else { held.as_str() };
        let _ = writeln!(out, "holding: {shown}");
    }

    if let Some(message) = doc.get(targets::MESSAGE) {
        if message.has_class("show") {
            let bullet = if message.has_class("success") { '*' } else { '!' };
            let _ = writeln!(out, "{bullet} {}", message.text);
        }
    }

    out
}

fn cell_label(cell: &Element) -> String {
    cell.children
        .iter()
        .map(|child| {
            if child.has_class("robot") {
                '@'
            } else {
                marker_letter(child)
            }
        })
        .collect()
}

fn marker_letter(marker: &Element) -> char {
    marker
        .classes
        .iter()
        .find(|class| *class != "circle")
        .and_then(|color| color.chars().next())
        .map_or('?', |c| c.to_ascii_uppercase())
}

/// Opens export links in the desktop browser.
#[derive(Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&mut self, url: &Url) -> anyhow::Result<()> {
        println!("export: {url}");
        open::that(url.as_str()).with_context(|| format!("open {url}"))
    }
}

async fn read_input(tx: mpsc::Sender<UiEvent>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        match parse_input(&line) {
            Input::Click(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Input::Help => print!("{}", help_text()),
            Input::Quit => break,
            Input::Nothing => {}
        }
    }
    Ok(())
}

pub async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let controller = Controller::new(&config, BrowserNavigator)?;
    let (tx, rx) = mpsc::channel(32);

    let input = tokio::spawn(async move {
        if let Err(err) = read_input(tx).await {
            tracing::error!("input closed: {err:#}");
        }
    });

    print!("{}", help_text());
    controller
        .run(rx, |doc| {
            println!();
            print!("{}", present(doc));
        })
        .await;

    input.await.context("input task")?;
    Ok(())
}
