use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup, Section};
use crate::form::FormField;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Form grows two extra rows when inline errors/info are showing
    let form_height = 12
        + if app.form.error.is_some() { 1 } else { 0 }
        + if app.show_field_info { 2 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                  // Info line
            Constraint::Length(form_height as u16), // Form
            Constraint::Min(4),                     // Results
            Constraint::Length(1),                  // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_form(f, app, chunks[1]);
    draw_results(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, app),
        Popup::Alert => draw_alert_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(t.warning)))
    } else {
        let mode = if app.config.dark_mode { "dark" } else { "light" };
        Line::from(vec![
            Span::styled("primerdeck", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" │ bisulfite primer design │ {} mode", mode),
                Style::default().fg(t.text_dim),
            ),
        ])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let seq_error = app.form.error_for(FormField::Sequence);
    let range_error = app.form.error_for(FormField::SizeRange);

    let mut constraints = vec![Constraint::Min(5)]; // Sequence field
    if seq_error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if app.show_field_info {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3)); // Size range field
    if range_error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if app.show_field_info {
        constraints.push(Constraint::Length(1));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = rows.iter().copied();

    if let Some(row) = next.next() {
        draw_sequence_field(f, app, row);
    }
    if seq_error.is_some() {
        if let (Some(row), Some(msg)) = (next.next(), seq_error) {
            draw_field_error(f, app, row, msg);
        }
    }
    if app.show_field_info {
        if let Some(row) = next.next() {
            draw_field_info(f, app, row, "Paste the genomic region of interest; A/C/G/T only after cleanup.");
        }
    }
    if let Some(row) = next.next() {
        draw_size_range_field(f, app, row);
    }
    if range_error.is_some() {
        if let (Some(row), Some(msg)) = (next.next(), range_error) {
            draw_field_error(f, app, row, msg);
        }
    }
    if app.show_field_info {
        if let Some(row) = next.next() {
            draw_field_info(f, app, row, "Amplicon size as min-max; minimum 50 bp, defaults to 70-150.");
        }
    }
}

fn draw_sequence_field(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let is_active = app.section == Section::Sequence;
    let border_color = if is_active { t.accent } else { t.inactive };
    let title_style = if is_active {
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.inactive)
    };

    let block = Block::default()
        .title(Span::styled(" DNA Sequence ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let content: Paragraph = if app.form.sequence.is_empty() {
        Paragraph::new(Span::styled(
            "Paste sequence here (e.g. ACGTACGT...)",
            Style::default().fg(t.text_dim),
        ))
    } else {
        Paragraph::new(app.form.sequence.as_str()).style(Style::default().fg(t.text))
    };

    f.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

fn draw_size_range_field(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let is_active = app.section == Section::SizeRange;
    let border_color = if is_active { t.accent } else { t.inactive };
    let title_style = if is_active {
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.inactive)
    };

    let block = Block::default()
        .title(Span::styled(" Product Size Range ", title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let content = if app.form.size_range.is_empty() {
        Paragraph::new(Span::styled("70-150", Style::default().fg(t.text_dim)))
    } else {
        Paragraph::new(app.form.size_range.as_str()).style(Style::default().fg(t.text))
    };

    f.render_widget(content.block(block), area);
}

fn draw_field_error(f: &mut Frame, app: &App, area: Rect, message: &str) {
    let line = Line::from(Span::styled(
        format!(" {}", message),
        Style::default().fg(app.theme.danger),
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn draw_field_info(f: &mut Frame, app: &App, area: Rect, info: &str) {
    let line = Line::from(Span::styled(
        format!("   {}", info),
        Style::default().fg(app.theme.text_dim).add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let is_active = app.section == Section::Results;
    let border_color = if is_active { t.accent } else { t.inactive };
    let title_style = if is_active {
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.inactive)
    };

    let title = if app.back_to_top_visible() {
        " Results │ (g) back to top "
    } else {
        " Results "
    };

    let block = Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.cards.is_empty() {
        let help = Paragraph::new("No primer sets yet. Fill in the form and press F2.")
            .style(Style::default().fg(t.text_dim))
            .block(block);
        f.render_widget(help, area);
        return;
    }

    // Flatten cards into lines, then window by the scroll offset
    let mut lines: Vec<Line> = Vec::new();
    for (i, card) in app.cards.iter().enumerate() {
        let selected = is_active && i == app.selected_card;
        let copy_icon = match app.copied_card {
            Some((idx, _)) if idx == i => "✅",
            _ => "📋",
        };

        let title_style = if selected {
            Style::default().fg(t.header).bg(t.bg_selected).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.header)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{} ", copy_icon), Style::default().fg(t.success)),
            Span::styled(card.title.clone(), title_style),
        ]));
        for body_line in card.body.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {}", body_line),
                Style::default().fg(t.text),
            )));
        }
        lines.push(Line::from(""));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let start = app.results_scroll.min(lines.len().saturating_sub(1));
    let end = (start + inner_height).min(lines.len());

    let content = Paragraph::new(lines[start..end].to_vec()).block(block);
    f.render_widget(content, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let hints: Vec<(&str, &str)> = match app.section {
        Section::Sequence | Section::SizeRange => vec![
            ("Tab", "Next"),
            ("F2", "Design"),
            ("F3", "Info"),
            ("^D", "Theme"),
            ("F1", "Help"),
            ("^C", "Quit"),
        ],
        Section::Results => vec![
            ("↑↓", "Card"),
            ("c", "Copy"),
            ("g", "Top"),
            ("Tab", "Form"),
            ("^D", "Theme"),
            ("q", "Quit"),
        ],
    };

    let max_hints = if area.width < 60 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(t.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(t.text_dim)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let t = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(60, 60, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Help ", Style::default().fg(t.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    let entries = [
        ("Tab / Shift-Tab", "Move between sequence, size range, results"),
        ("F2", "Validate input and run the designer"),
        ("Enter (size range)", "Same as F2"),
        ("F3", "Toggle field hints"),
        ("Ctrl+D", "Toggle dark mode (persisted)"),
        ("j/k, ↑/↓", "Select primer card"),
        ("c / y / Enter", "Copy selected card to clipboard"),
        ("g / Home", "Back to top of results"),
        ("F1 / Esc", "Close this help"),
        ("Ctrl+C", "Quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:<20}", key), Style::default().fg(t.accent)),
                Span::styled(*desc, Style::default().fg(t.text)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}

fn draw_alert_popup(f: &mut Frame, app: &App) {
    let t = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(50, 20, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Clipboard ", Style::default().fg(t.danger)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.danger));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.alert_message),
            Style::default().fg(t.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to dismiss",
            Style::default().fg(t.text_dim),
        )),
    ];

    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Centered rect helper for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
