//! Results view: ranked recommendations and the outcome estimate.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::RecommendationReport;
use crate::tui::styles::ClinicTheme;

/// Pipeline stage shown while the worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStage {
    Encoding,
    Classifying,
    Estimating,
}

impl WorkStage {
    fn label(self) -> &'static str {
        match self {
            Self::Encoding => "Encoding",
            Self::Classifying => "Classifying",
            Self::Estimating => "Estimating",
        }
    }

    fn percent(self) -> u16 {
        match self {
            Self::Encoding => 20,
            Self::Classifying => 60,
            Self::Estimating => 90,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Encoding => "Encoding answers into model feature rows...",
            Self::Classifying => "Scoring exercise groups and ranking...",
            Self::Estimating => "Predicting pain reduction and time to effect...",
        }
    }
}

/// Results screen state.
#[derive(Debug, Clone, Default)]
pub enum ResultsState {
    #[default]
    Idle,
    Working {
        stage: WorkStage,
    },
    Complete {
        report: RecommendationReport,
    },
    Error {
        message: String,
    },
}

/// Render the results view.
pub fn render_results(f: &mut Frame, area: Rect, state: &ResultsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0]);
    match state {
        ResultsState::Idle => render_idle(f, chunks[1]),
        ResultsState::Working { stage } => render_progress(f, chunks[1], *stage),
        ResultsState::Complete { report } => render_report(f, chunks[1], report),
        ResultsState::Error { message } => render_error(f, chunks[1], message),
    }
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Recommended Exercises", ClinicTheme::title()),
        Span::styled(" │ Ranked by group confidence", ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No assessment yet",
            ClinicTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the intake form to get recommendations",
            ClinicTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, stage: WorkStage) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", ClinicTheme::text_secondary()),
        Span::styled(stage.label(), ClinicTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(ClinicTheme::info())
        .percent(stage.percent())
        .label(format!("{}%", stage.percent()));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        stage.description(),
        ClinicTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_report(f: &mut Frame, area: Rect, report: &RecommendationReport) {
    let mut constraints: Vec<Constraint> = report
        .recommendations
        .iter()
        .map(|rec| Constraint::Length(rec.exercises.len().max(1) as u16 + 2))
        .collect();
    constraints.push(Constraint::Length(4)); // Outcome line
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for (i, rec) in report.recommendations.iter().enumerate() {
        let title = Line::from(vec![
            Span::styled(format!(" {} ", rec.group), ClinicTheme::group(rec.group)),
            Span::styled(
                format!("(Confidence: {:.1}%) ", rec.confidence),
                ClinicTheme::confidence(rec.confidence),
            ),
        ]);

        let lines: Vec<Line> = if rec.exercises.is_empty() {
            vec![Line::from(Span::styled(
                " No specific exercise mapped to this group",
                ClinicTheme::text_muted(),
            ))]
        } else {
            rec.exercises
                .iter()
                .map(|ex| {
                    Line::from(vec![
                        Span::styled(" • ", ClinicTheme::key_hint()),
                        Span::styled(ex.as_str(), ClinicTheme::text()),
                    ])
                })
                .collect()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if i == 0 {
                ClinicTheme::border_focused()
            } else {
                ClinicTheme::border()
            });

        f.render_widget(Paragraph::new(lines).block(block), chunks[i]);
    }

    let outcome_area = chunks[report.recommendations.len()];
    if let Some(summary) = report.outcome_summary() {
        let outcome = Paragraph::new(Line::from(Span::styled(summary, ClinicTheme::info())))
            .block(
                Block::default()
                    .title(Span::styled(" Expected Effect ", ClinicTheme::subtitle()))
                    .borders(Borders::ALL)
                    .border_style(ClinicTheme::border()),
            )
            .wrap(ratatui::widgets::Wrap { trim: true });
        f.render_widget(outcome, outcome_area);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Assessment failed", ClinicTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, ClinicTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &ResultsState) {
    let content = match state {
        ResultsState::Complete { .. } => Line::from(vec![
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Back to Dashboard ", ClinicTheme::key_desc()),
            Span::styled("[N] ", ClinicTheme::key_hint()),
            Span::styled("New Assessment", ClinicTheme::key_desc()),
        ]),
        ResultsState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Edit Answers ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Cancel", ClinicTheme::key_desc()),
        ]),
        _ => Line::from(vec![Span::styled(
            "Processing...",
            ClinicTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}
