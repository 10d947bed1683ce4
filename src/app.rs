use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::designer::{self, PrimerCard};
use crate::form::{FormField, FormState, Outcome};
use crate::theme::Theme;

/// How long the copy affordance shows its confirmation mark
const COPY_FEEDBACK: Duration = Duration::from_millis(1500);

/// Delay before jumping to freshly arrived results
const RESULTS_SCROLL_DELAY: Duration = Duration::from_millis(300);

/// Back-to-top hint appears once the results are scrolled past this many rows
pub const BACK_TO_TOP_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Sequence,
    SizeRange,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Alert,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    // Form state (sequence + size range + inline error)
    pub form: FormState,
    pub show_field_info: bool,

    // Config & palette
    pub config: AppConfig,
    pub theme: Theme,

    // Results
    pub cards: Vec<PrimerCard>,
    pub selected_card: usize,
    pub results_scroll: usize,

    // Copy affordance feedback (card index + when it was copied)
    pub copied_card: Option<(usize, Instant)>,
    pub alert_message: String,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // One-shot delayed jump to the results section
    scroll_to_results_at: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let theme = Theme::load(config.dark_mode);

        Self {
            section: Section::Sequence,
            popup: Popup::None,

            form: FormState::default(),
            show_field_info: false,

            config,
            theme,

            cards: Vec::new(),
            selected_card: 0,
            results_scroll: 0,

            copied_card: None,
            alert_message: String::new(),

            status_message: None,
            status_message_time: None,

            scroll_to_results_at: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return Ok(());
        }

        // Global keys first; plain characters belong to the focused field
        match key.code {
            KeyCode::Tab => {
                self.section = match self.section {
                    Section::Sequence => Section::SizeRange,
                    Section::SizeRange => {
                        if self.cards.is_empty() {
                            Section::Sequence
                        } else {
                            Section::Results
                        }
                    }
                    Section::Results => Section::Sequence,
                };
                return Ok(());
            }
            KeyCode::BackTab => {
                self.section = match self.section {
                    Section::Sequence => {
                        if self.cards.is_empty() {
                            Section::SizeRange
                        } else {
                            Section::Results
                        }
                    }
                    Section::SizeRange => Section::Sequence,
                    Section::Results => Section::SizeRange,
                };
                return Ok(());
            }
            KeyCode::F(1) => {
                self.popup = Popup::Help;
                return Ok(());
            }
            KeyCode::F(2) => {
                return self.submit().await;
            }
            KeyCode::F(3) => {
                self.show_field_info = !self.show_field_info;
                return Ok(());
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toggle_dark_mode();
                return Ok(());
            }
            _ => {}
        }

        match self.section {
            Section::Sequence => self.handle_sequence_key(key),
            Section::SizeRange => self.handle_size_range_key(key).await?,
            Section::Results => self.handle_results_key(key),
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::Alert => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.popup = Popup::None;
                    self.alert_message.clear();
                }
            }
            Popup::None => {}
        }
    }

    fn handle_sequence_key(&mut self, key: KeyEvent) {
        match key.code {
            // Pasted FASTA often carries line breaks; validation flags them
            KeyCode::Enter => self.form.sequence.push('\n'),
            KeyCode::Backspace => {
                self.form.sequence.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.sequence.push(c);
            }
            _ => {}
        }
    }

    async fn handle_size_range_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => self.submit().await?,
            KeyCode::Backspace => {
                self.form.size_range.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.size_range.push(c);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.cards.is_empty() {
                    self.selected_card = (self.selected_card + 1) % self.cards.len();
                    self.results_scroll = self.card_line_offset(self.selected_card);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.cards.is_empty() {
                    self.selected_card = self
                        .selected_card
                        .checked_sub(1)
                        .unwrap_or(self.cards.len() - 1);
                    self.results_scroll = self.card_line_offset(self.selected_card);
                }
            }
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to_top(),
            KeyCode::Char('c') | KeyCode::Char('y') | KeyCode::Enter => self.copy_selected_card(),
            _ => {}
        }
    }

    /// Jump back to the first card (the back-to-top affordance)
    pub fn scroll_to_top(&mut self) {
        self.selected_card = 0;
        self.results_scroll = 0;
    }

    /// Whether the back-to-top hint should be visible
    pub fn back_to_top_visible(&self) -> bool {
        self.results_scroll > BACK_TO_TOP_ROWS
    }

    /// Line offset of a card within the flattened results view
    fn card_line_offset(&self, idx: usize) -> usize {
        self.cards[..idx]
            .iter()
            .map(|c| c.body.lines().count() + 2) // title + body + separator
            .sum()
    }

    /// Validate the form; on acceptance hand off to the designer.
    ///
    /// Rejections are reported only through the inline field error — no
    /// designer run, no status line, nothing else changes.
    pub async fn submit(&mut self) -> Result<()> {
        let (sequence, lower, upper) = match self.form.submit() {
            Outcome::Rejected(err) => {
                self.section = match err.field {
                    FormField::Sequence => Section::Sequence,
                    FormField::SizeRange => Section::SizeRange,
                };
                return Ok(());
            }
            Outcome::Accepted {
                sequence,
                lower,
                upper,
            } => (sequence, lower, upper),
        };

        let command = match self.config.designer_command.clone() {
            Some(cmd) => cmd,
            None => {
                self.set_status("No designer command configured (see config.toml)");
                return Ok(());
            }
        };

        self.set_status(format!("Designing primers for {} bp...", sequence.len()));
        match designer::run(&command, &sequence, lower, upper, &self.config.params).await {
            Ok(output) => {
                self.cards = designer::parse_cards(&output);
                self.selected_card = 0;
                self.copied_card = None;

                if self.cards.is_empty() {
                    self.set_status("Designer returned no primer sets");
                } else {
                    self.set_status(format!("{} primer set(s) designed", self.cards.len()));
                    self.scroll_to_results_at = Some(Instant::now());
                    if self.config.notifications {
                        let _ = notify_done(self.cards.len());
                    }
                }
            }
            Err(e) => {
                tracing::error!("Design run failed: {}", e);
                self.set_status(format!("Design failed: {}", e));
            }
        }
        Ok(())
    }

    /// Copy the selected primer card to the system clipboard
    fn copy_selected_card(&mut self) {
        let Some(card) = self.cards.get(self.selected_card) else {
            return;
        };

        match crate::clipboard::copy(&card.copy_text()) {
            Ok(()) => {
                self.copied_card = Some((self.selected_card, Instant::now()));
            }
            Err(e) => {
                tracing::error!("Copy failed: {}", e);
                self.alert_message = "Unable to copy. Please try manually.".to_string();
                self.popup = Popup::Alert;
            }
        }
    }

    /// Toggle the palette and persist the preference immediately
    pub fn toggle_dark_mode(&mut self) {
        self.config.dark_mode = !self.config.dark_mode;
        self.theme = Theme::load(self.config.dark_mode);
        if let Err(e) = self.config.save() {
            tracing::warn!("Could not save config: {}", e);
        }
    }

    /// Periodic housekeeping driven from the event loop
    pub fn tick(&mut self) {
        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        // Revert the copy confirmation mark
        if let Some((_, at)) = self.copied_card {
            if at.elapsed() >= COPY_FEEDBACK {
                self.copied_card = None;
            }
        }

        // Delayed jump to results once they have arrived
        if let Some(at) = self.scroll_to_results_at {
            if at.elapsed() >= RESULTS_SCROLL_DELAY {
                self.scroll_to_results_at = None;
                self.section = Section::Results;
                self.scroll_to_top();
            }
        }
    }
}

fn notify_done(sets: usize) -> Result<()> {
    notify_rust::Notification::new()
        .summary("primerdeck")
        .body(&format!("{} primer set(s) ready", sets))
        .icon("applications-science")
        .show()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(AppConfig::default())
    }

    fn bases(n: usize) -> String {
        "ACGT".chars().cycle().take(n).collect()
    }

    #[tokio::test]
    async fn test_rejected_submit_focuses_offending_field() {
        let mut app = app();
        app.form.sequence = bases(80);
        app.form.size_range = "40-100".to_string();

        app.submit().await.unwrap();
        assert_eq!(app.section, Section::SizeRange);
        assert!(app.form.error_for(FormField::SizeRange).is_some());
        assert!(app.cards.is_empty());
        // Inline text is the only failure report
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_accepted_submit_without_designer_normalizes() {
        let mut app = app();
        app.form.sequence = format!(" {} ", bases(80).to_lowercase());

        app.submit().await.unwrap();
        assert!(app.form.error.is_none());
        assert_eq!(app.form.sequence, bases(80));
        // No designer configured: a status explains, nothing else happens
        assert!(app
            .status_message
            .as_deref()
            .unwrap_or_default()
            .contains("No designer command"));
    }

    #[test]
    fn test_copy_feedback_expires() {
        let mut app = app();
        app.copied_card = Some((0, Instant::now() - Duration::from_secs(2)));
        app.tick();
        assert!(app.copied_card.is_none());
    }

    #[test]
    fn test_delayed_jump_to_results() {
        let mut app = app();
        app.cards = vec![PrimerCard {
            title: "Set 1".to_string(),
            body: String::new(),
        }];
        app.scroll_to_results_at = Some(Instant::now() - Duration::from_secs(1));

        app.tick();
        assert_eq!(app.section, Section::Results);
        assert_eq!(app.results_scroll, 0);
    }

    #[test]
    fn test_back_to_top_threshold() {
        let mut app = app();
        app.results_scroll = BACK_TO_TOP_ROWS;
        assert!(!app.back_to_top_visible());
        app.results_scroll = BACK_TO_TOP_ROWS + 1;
        assert!(app.back_to_top_visible());

        app.scroll_to_top();
        assert!(!app.back_to_top_visible());
    }

    #[test]
    fn test_card_selection_tracks_scroll() {
        let mut app = app();
        app.cards = (0..3)
            .map(|i| PrimerCard {
                title: format!("Set {}", i + 1),
                body: "Forward: ACGT\nReverse: TGCA".to_string(),
            })
            .collect();

        app.section = Section::Results;
        app.handle_results_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(app.selected_card, 1);
        // Each card occupies title + 2 body lines + separator
        assert_eq!(app.results_scroll, 4);
    }
}
