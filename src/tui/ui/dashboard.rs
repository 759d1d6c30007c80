//! Dashboard view: system status and quick actions.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::styles::ClinicTheme;

/// Dashboard state for rendering.
pub struct DashboardState {
    pub models_loaded: bool,
    pub exercise_model_source: String,
    pub outcome_enabled: bool,
    pub session_assessments: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            models_loaded: false,
            exercise_model_source: String::new(),
            outcome_enabled: false,
            session_assessments: 0,
        }
    }
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
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Flexion", ClinicTheme::title()),
        Span::styled(" │ ", ClinicTheme::text_muted()),
        Span::styled(
            "Knee-Pain Exercise Recommendations",
            ClinicTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // System status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let status_items = vec![
        format_status_item("Models loaded", state.models_loaded),
        Line::from(vec![
            Span::styled("  Exercise model: ", ClinicTheme::text_secondary()),
            Span::styled(
                state.exercise_model_source.clone(),
                ClinicTheme::text_muted(),
            ),
        ]),
        format_status_item("Outcome estimation", state.outcome_enabled),
        Line::from(vec![
            Span::styled("  Assessments this session: ", ClinicTheme::text_secondary()),
            Span::styled(state.session_assessments.to_string(), ClinicTheme::text()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" System Status ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", ClinicTheme::key_hint()),
            Span::styled("New Assessment", ClinicTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[R] ", ClinicTheme::key_hint()),
            Span::styled("Last Results", ClinicTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("ON ", ClinicTheme::success())
    } else {
        ("OFF", ClinicTheme::text_muted())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), ClinicTheme::text()),
    ])
}
