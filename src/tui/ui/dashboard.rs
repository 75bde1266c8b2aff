//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::HealthResponse;
use crate::tui::styles::MedicalTheme;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub api_url: String,
    /// Probe in flight
    pub probing: bool,
    /// `GET /` result, `None` until the first probe finishes
    pub liveness: Option<Result<String, String>>,
    /// `GET /health` result
    pub health: Option<Result<HealthResponse, String>>,
    /// Doctors returned by the last successful request
    pub last_result_count: Option<usize>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("docrank", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Smart Doctor Recommendation Dashboard",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50), // Service status
            Constraint::Percentage(50), // Actions
        ])
        .margin(1)
        .split(area);

    render_service_status(f, chunks[0], state);
    render_actions(f, chunks[1], state);
}

fn render_service_status(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  API: ", MedicalTheme::text_secondary()),
            Span::styled(state.api_url.clone(), MedicalTheme::text()),
        ]),
        Line::from(""),
    ];

    if state.probing {
        lines.push(Line::from(Span::styled(
            "  Checking service...",
            MedicalTheme::info(),
        )));
    }

    match &state.liveness {
        Some(Ok(message)) => lines.push(Line::from(vec![
            Span::styled("  OK ", MedicalTheme::success()),
            Span::styled(message.clone(), MedicalTheme::text()),
        ])),
        Some(Err(e)) => lines.push(Line::from(vec![
            Span::styled("  FAIL ", MedicalTheme::danger()),
            Span::styled(e.clone(), MedicalTheme::danger()),
        ])),
        None => {}
    }

    match &state.health {
        Some(Ok(health)) => {
            lines.push(format_status_item("Model Loaded", health.model_loaded));
            lines.push(format_status_item("Doctors Loaded", health.doctors_loaded));
            let style = if health.status == "healthy" {
                MedicalTheme::success()
            } else {
                MedicalTheme::warning()
            };
            lines.push(Line::from(vec![
                Span::styled("  Status: ", MedicalTheme::text_secondary()),
                Span::styled(health.status.clone(), style),
            ]));
        }
        Some(Err(e)) => lines.push(Line::from(vec![
            Span::styled("  Health: ", MedicalTheme::text_secondary()),
            Span::styled(e.clone(), MedicalTheme::danger()),
        ])),
        None => {}
    }

    let block = Block::default()
        .title(Span::styled(" Service Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let status = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(status, area);
}

fn render_actions(f: &mut Frame, area: Rect, state: &DashboardState) {
    let mut actions = vec![
        Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Recommendation", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Refresh Status", MedicalTheme::key_desc()),
        ]),
    ];

    if state.last_result_count.is_some() {
        actions.push(Line::from(vec![
            Span::styled("[V] ", MedicalTheme::key_hint()),
            Span::styled("View Last Results", MedicalTheme::key_desc()),
        ]));
    }

    actions.push(Line::from(vec![
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]));

    if let Some(count) = state.last_result_count {
        actions.push(Line::from(""));
        actions.push(Line::from(vec![
            Span::styled("Last request: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{count} doctors"), MedicalTheme::text()),
        ]));
    }

    let block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(actions).block(block), area);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("FAIL", MedicalTheme::danger())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}
