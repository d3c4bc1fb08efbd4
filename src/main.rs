//! BiasLens CLI
//!
//! Usage:
//!   biaslens --text "your text here"          # Single analysis
//!   biaslens --file article.txt               # Analyze a file
//!   biaslens --interactive                    # One analysis per stdin line
//!   biaslens --serve                          # HTTP API server
//!   biaslens --text "text" --json             # JSON output
//!   biaslens --user alice --show-history      # Saved history + analytics

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use biaslens::config::Config;
use biaslens::core::{
    run_server, summarize_history, AnalysisSource, Analyzer, AppState, FileStore, HistoryService,
    KeyValueStore, MemoryStore, TermHits,
};
use biaslens::types::{AnalysisResult, Bias, HistoryItem};
use biaslens::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "biaslens",
    version = VERSION,
    about = "BiasLens - Detect political bias and emotional framing in text",
    long_about = "BiasLens classifies text as Left, Right or Neutral leaning.\n\n\
                  With an API key it asks a remote model for the analysis and\n\
                  falls back to a keyword heuristic on any failure. Without a\n\
                  key the heuristic is used directly.\n\n\
                  Modes:\n  \
                  --text / --file  Single analysis\n  \
                  --interactive    One analysis per input line\n  \
                  --serve          HTTP API server mode"
)]
struct Args {
    /// Text to analyze (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Read the text to analyze from a file
    #[arg(short, long)]
    file: Option<String>,

    /// Interactive mode - analyze each line read from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (overrides config; default: 127.0.0.1:3000)
    #[arg(long)]
    addr: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Remote provider API key (overrides config)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Fix the heuristic random source for reproducible scores
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for history files (overrides config; --user runs default to ./history)
    #[arg(long)]
    history_dir: Option<String>,

    /// Save analyses to this user's history
    #[arg(short, long)]
    user: Option<String>,

    /// Print the user's saved history and analytics, then exit
    #[arg(long, requires = "user")]
    show_history: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show matched terms and sentence highlights
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    // Per-user CLI runs always persist; the server may stay in memory
    let persist = args.user.is_some() && !args.serve;
    let store: Arc<dyn KeyValueStore> = match config.history.resolve_dir(persist) {
        Some(dir) => {
            debug!(dir, "history stored on disk");
            Arc::new(FileStore::new(dir))
        }
        None => Arc::new(MemoryStore::new()),
    };

    if args.show_history {
        return show_history(&args, store);
    }

    let mut analyzer = Analyzer::from_config(&config.provider).context("building analyzer")?;
    if let Some(seed) = args.seed {
        analyzer = analyzer.with_seed(seed);
    }

    if args.serve {
        let state = AppState::new(analyzer, store);
        run_server(&config.server.address, state)
            .await
            .context("API server failed")?;
        return Ok(());
    }

    let history = HistoryService::new(store);
    if let Some(text) = single_input(&args)? {
        analyze_and_print(&analyzer, &history, &text, &args).await
    } else {
        run_interactive(&analyzer, &history, &args).await
    }
}

/// Config file first, then CLI overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path))?,
        None => Config::default(),
    };
    if let Some(key) = &args.api_key {
        config.provider.api_key = Some(key.clone());
    }
    if let Some(addr) = &args.addr {
        config.server.address = addr.clone();
    }
    if let Some(dir) = &args.history_dir {
        config.history.dir = Some(dir.clone());
    }
    Ok(config)
}

/// Text from --text or --file, if either was given
fn single_input(args: &Args) -> Result<Option<String>> {
    match (&args.text, &args.file) {
        (Some(_), Some(_)) => bail!("use either --text or --file, not both"),
        (Some(text), None) => Ok(Some(text.clone())),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            Ok(Some(text))
        }
        (None, None) => Ok(None),
    }
}

/// Analyze one text, save it if a user is set, print it
async fn analyze_and_print(
    analyzer: &Analyzer,
    history: &HistoryService,
    text: &str,
    args: &Args,
) -> Result<()> {
    if text.trim().is_empty() {
        bail!("nothing to analyze: text is empty");
    }

    let (result, source) = analyzer.analyze_traced(text).await;

    if let Some(user) = &args.user {
        history
            .save(user, HistoryItem::new(result.clone(), text))
            .context("saving history")?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if args.verbose {
        print_verbose(text, &result, source, args.no_color);
    } else if args.no_color {
        println!("{}", result.to_parseable_string());
    } else {
        println!("{}", result.to_terminal_string());
        println!("  {}", result.summary);
    }
    Ok(())
}

/// Run interactive mode
async fn run_interactive(analyzer: &Analyzer, history: &HistoryService, args: &Args) -> Result<()> {
    print_header(args.no_color);
    println!("Type or paste text and press Enter to analyze. Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut count = 0usize;

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        analyze_and_print(analyzer, history, line, args).await?;
        count += 1;
    }

    println!("\nSession ended. Analyses: {}", count);
    Ok(())
}

/// Print saved history and aggregate stats for --user
fn show_history(args: &Args, store: Arc<dyn KeyValueStore>) -> Result<()> {
    let Some(user) = &args.user else {
        bail!("--show-history needs --user");
    };
    let history = HistoryService::new(store);
    let items = history.list(user).context("reading history")?;
    let analytics = summarize_history(&items);

    if args.json {
        #[derive(serde::Serialize)]
        struct HistoryOutput<'a> {
            items: &'a [HistoryItem],
            analytics: &'a biaslens::types::UserAnalytics,
        }
        let output = HistoryOutput { items: &items, analytics: &analytics };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} analyses | left={} right={} neutral={}",
        analytics.total_analyses,
        analytics.bias_distribution.left,
        analytics.bias_distribution.right,
        analytics.bias_distribution.neutral
    );
    for trend in &analytics.monthly_trends {
        println!("  {}: {} analyses, avg score {:+.1}", trend.month, trend.count, trend.avg_bias_score);
    }
    println!();
    for item in &items {
        let (color, reset) = colors(item.analysis.bias, args.no_color);
        println!(
            "{}{} {:>8} {:+4}{}  {}",
            color,
            item.analysis.timestamp.format("%Y-%m-%d %H:%M"),
            item.analysis.bias,
            item.analysis.bias_score,
            reset,
            preview(&item.input_text, 60)
        );
        if let Some(notes) = &item.user_notes {
            println!("    notes: {}", notes);
        }
    }
    Ok(())
}

fn colors(bias: Bias, no_color: bool) -> (&'static str, &'static str) {
    if no_color {
        ("", "")
    } else {
        (bias.color_code(), Bias::color_reset())
    }
}

/// First `max` chars on one line
fn preview(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max).collect();
        format!("{}…", cut)
    }
}

/// Print header
fn print_header(no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  BiasLens v{} - Interactive", VERSION);
        println!("========================================");
    } else {
        println!("\x1b[1m╔══════════════════════════════════════╗\x1b[0m");
        println!("\x1b[1m║   BiasLens v{} - Interactive      ║\x1b[0m", VERSION);
        println!("\x1b[1m╚══════════════════════════════════════╝\x1b[0m");
    }
    println!();
}

/// Print verbose output with term breakdown
fn print_verbose(text: &str, result: &AnalysisResult, source: AnalysisSource, no_color: bool) {
    let (color, reset) = colors(result.bias, no_color);
    let hits = TermHits::find(text);
    let origin = match source {
        AnalysisSource::Remote => "remote model",
        AnalysisSource::Heuristic => "heuristic",
    };

    println!("{}┌─────────────────────────────────────{}", color, reset);
    println!(
        "{}│ bias = {}  score = {:+}  confidence = {}% ({}){}",
        color, result.bias, result.bias_score, result.confidence, origin, reset
    );
    println!("{}├─────────────────────────────────────{}", color, reset);
    println!("{}│ Terms:{}", color, reset);
    println!("{}│   left:       {:?}{}", color, hits.left, reset);
    println!("{}│   right:      {:?}{}", color, hits.right, reset);
    println!("{}│   emotional:  {:?}{}", color, hits.emotional, reset);
    println!("{}├─────────────────────────────────────{}", color, reset);
    println!(
        "{}│ Tone: anger={} fear={} joy={} neutral={}{}",
        color,
        result.emotional_tone.anger,
        result.emotional_tone.fear,
        result.emotional_tone.joy,
        result.emotional_tone.neutral,
        reset
    );
    if let Some(src) = result.source_detection.as_ref().filter(|s| s.detected) {
        println!(
            "{}│ Source: {} (leans {}, reliability {}){}",
            color,
            src.source_name.as_deref().unwrap_or("?"),
            src.known_bias.map(|b| b.to_string()).unwrap_or_else(|| "?".to_string()),
            src.reliability.unwrap_or(0),
            reset
        );
    }
    if !result.sentence_highlights.is_empty() {
        println!("{}├─────────────────────────────────────{}", color, reset);
        for h in &result.sentence_highlights {
            let (hc, hr) = colors(h.bias, no_color);
            println!(
                "{}│ {}[{:>3}..{:<3}] {:<7} {:>2}%{} {}",
                color, hc, h.start_index, h.end_index, h.bias, h.intensity, hr, preview(&h.text, 50)
            );
        }
    }
    println!("{}├─────────────────────────────────────{}", color, reset);
    println!("{}│ {}{}", color, result.explanation, reset);
    println!("{}│ {}{}", color, result.summary, reset);
    println!("{}└─────────────────────────────────────{}", color, reset);
}
