//! Recommendation results: ranked table and success-rate chart.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::domain::ScoredDoctor;
use crate::tui::styles::MedicalTheme;

/// Results screen state
#[derive(Debug, Clone, Default)]
pub enum ResultsState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the service
    Sending,
    /// Ranked doctors for the last request
    Complete {
        doctors: Vec<ScoredDoctor>,
        requested: i64,
    },
    /// Display text for a failed request
    Error { message: String },
}

/// Render the results screen
pub fn render_results(f: &mut Frame, area: Rect, state: &ResultsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_results_header(f, chunks[0], state);
    match state {
        ResultsState::Idle => render_message(f, chunks[1], "No request submitted yet", MedicalTheme::text_muted()),
        ResultsState::Sending => render_message(
            f,
            chunks[1],
            "Requesting recommendations...",
            MedicalTheme::info(),
        ),
        ResultsState::Complete { doctors, .. } => render_ranking(f, chunks[1], doctors),
        ResultsState::Error { message } => render_error(f, chunks[1], message),
    }
    render_results_footer(f, chunks[2], state);
}

fn render_results_header(f: &mut Frame, area: Rect, state: &ResultsState) {
    let status = match state {
        ResultsState::Complete { requested, .. } => Span::styled(
            format!(" │ Top {requested} recommended doctors"),
            MedicalTheme::success(),
        ),
        ResultsState::Error { .. } => Span::styled(" │ Request failed", MedicalTheme::danger()),
        _ => Span::styled(" │ Ranked by predicted success", MedicalTheme::text_secondary()),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Recommendations", MedicalTheme::title()),
        status,
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_message(f: &mut Frame, area: Rect, text: &str, style: ratatui::style::Style) {
    let content = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, style))])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );

    f.render_widget(content, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::danger())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Error ", MedicalTheme::danger()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_ranking(f: &mut Frame, area: Rect, doctors: &[ScoredDoctor]) {
    if doctors.is_empty() {
        render_message(f, area, "The service returned no doctors", MedicalTheme::warning());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(doctors.len() as u16 + 3), // Table
            Constraint::Min(8),                           // Chart
        ])
        .split(area);

    render_table(f, chunks[0], doctors);
    render_success_chart(f, chunks[1], doctors);
}

fn render_table(f: &mut Frame, area: Rect, doctors: &[ScoredDoctor]) {
    let header = Row::new(
        ["#", "ID", "Doctor", "Specialty", "Years", "Rating", "Success", "Score"]
            .into_iter()
            .map(Cell::from),
    )
    .style(MedicalTheme::header());

    let rows = doctors.iter().enumerate().map(|(rank, d)| {
        Row::new(vec![
            Cell::from((rank + 1).to_string()),
            Cell::from(d.doctor_id.to_string()),
            Cell::from(d.doctor_name.clone()),
            Cell::from(d.specialty.clone()),
            Cell::from(format!("{}", d.years_experience)),
            Cell::from(format!("{:.1}", d.rating)),
            Cell::from(format!("{:.0}%", d.success_rate * 100.0)),
            Cell::from(format!("{:.3}", d.score)).style(MedicalTheme::score(d.score)),
        ])
        .style(MedicalTheme::text())
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Min(18),
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(Span::styled(" Top Doctors ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(table, area);
}

fn render_success_chart(f: &mut Frame, area: Rect, doctors: &[ScoredDoctor]) {
    let bars: Vec<Bar> = success_rate_bars(doctors)
        .into_iter()
        .map(|(name, pct)| {
            Bar::default()
                .value(pct)
                .label(Line::from(name))
                .text_value(format!("{pct}%"))
                .style(MedicalTheme::bar())
                .value_style(MedicalTheme::bar_value())
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let count = u16::try_from(bars.len()).unwrap_or(u16::MAX).max(1);
    let bar_width = (inner_width / count).saturating_sub(1).clamp(3, 20);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" Success Rate by Doctor ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(100);

    f.render_widget(chart, area);
}

/// Chart points: doctor name and success rate as a whole percentage.
pub fn success_rate_bars(doctors: &[ScoredDoctor]) -> Vec<(String, u64)> {
    doctors
        .iter()
        .map(|d| {
            let pct = (d.success_rate * 100.0).round().clamp(0.0, 100.0) as u64;
            (d.doctor_name.clone(), pct)
        })
        .collect()
}

fn render_results_footer(f: &mut Frame, area: Rect, state: &ResultsState) {
    let hints = match state {
        ResultsState::Error { .. } => vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Edit Request ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ],
        ResultsState::Sending => vec![Span::styled(
            "Waiting for the service...",
            MedicalTheme::text_muted(),
        )],
        _ => vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Request ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ],
    };

    let footer = Paragraph::new(Line::from(hints)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
