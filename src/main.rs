mod app;
mod clipboard;
mod config;
mod designer;
mod form;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup, Section};
use config::AppConfig;
use form::{FormField, Outcome};

#[derive(Parser, Debug)]
#[command(name = "primerdeck")]
#[command(version = "0.1.0")]
#[command(about = "A terminal-friendly front end for bisulfite primer design")]
struct Args {
    /// Validate input and print a JSON verdict instead of running the TUI
    #[arg(long)]
    check: bool,

    /// Validate input, run the configured designer, and print its output
    #[arg(long)]
    design: bool,

    /// DNA sequence (read from stdin when omitted)
    #[arg(short, long)]
    sequence: Option<String>,

    /// Product size range, e.g. 70-150 (defaults when omitted)
    #[arg(short, long)]
    range: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.check {
        return run_check(&args);
    }

    if args.design {
        return run_design(&args).await;
    }

    run_tui().await
}

fn read_sequence(args: &Args) -> Result<String> {
    if let Some(seq) = &args.sequence {
        return Ok(seq.clone());
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Non-interactive validation with a JSON verdict (for scripting)
fn run_check(args: &Args) -> Result<()> {
    let sequence = read_sequence(args)?;
    let range = args.range.as_deref().unwrap_or("");

    let output = match form::validate_submission(&sequence, range) {
        Outcome::Accepted {
            sequence,
            lower,
            upper,
        } => serde_json::json!({
            "valid": true,
            "sequence": sequence,
            "range": [lower, upper],
        }),
        Outcome::Rejected(err) => {
            let field = match err.field {
                FormField::Sequence => "sequence",
                FormField::SizeRange => "product_size_range",
            };
            let output = serde_json::json!({
                "valid": false,
                "field": field,
                "message": err.message,
            });
            println!("{}", serde_json::to_string(&output)?);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// Validate, then hand straight off to the designer command
async fn run_design(args: &Args) -> Result<()> {
    let sequence = read_sequence(args)?;
    let range = args.range.as_deref().unwrap_or("");

    let (sequence, lower, upper) = match form::validate_submission(&sequence, range) {
        Outcome::Accepted {
            sequence,
            lower,
            upper,
        } => (sequence, lower, upper),
        Outcome::Rejected(err) => anyhow::bail!("{}", err.message),
    };

    let config = AppConfig::load()?;
    let command = config
        .designer_command
        .as_deref()
        .ok_or(designer::DesignerError::NotConfigured)?;

    let output = designer::run(command, &sequence, lower, upper, &config.params).await?;
    print!("{}", output);
    Ok(())
}

async fn run_tui() -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        KeyCode::Char('q')
                            if app.popup == Popup::None && app.section == Section::Results =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Timed cosmetic resets (copy label, status, delayed scroll)
        app.tick();
    }
}
