//! Intake form: patient-reported knee-pain attributes.
//!
//! Three kinds of fields drive the form, all generated from the
//! questionnaire table: bounded numeric inputs, single-select questions, and
//! the multi-select symptom checklist.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    NumericKey, PatientProfile, CATEGORICAL_FIELDS, NUMERIC_FIELDS, SYMPTOM_CHOICES,
};
use crate::tui::styles::ClinicTheme;

/// One form field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Numeric {
        key: NumericKey,
        value: String,
        hint: &'static str,
        min: f64,
        max: f64,
    },
    Select {
        options: &'static [&'static str],
        selected: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IntakeField {
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Intake form state.
pub struct IntakeFormState {
    pub fields: Vec<IntakeField>,
    pub symptom_selected: Vec<bool>,
    pub symptom_cursor: usize,
    /// Cursor over fields; `fields.len()` addresses the symptom checklist.
    pub cursor: usize,
    pub error_message: Option<String>,
}

impl Default for IntakeFormState {
    fn default() -> Self {
        let mut fields: Vec<IntakeField> = NUMERIC_FIELDS
            .iter()
            .map(|f| IntakeField {
                label: f.label,
                kind: FieldKind::Numeric {
                    key: f.key,
                    value: String::new(),
                    hint: f.hint,
                    min: f.min,
                    max: f.max,
                },
            })
            .collect();

        fields.extend(CATEGORICAL_FIELDS.iter().map(|f| IntakeField {
            label: f.prompt,
            kind: FieldKind::Select {
                options: f.options,
                selected: 0,
            },
        }));

        Self {
            fields,
            symptom_selected: vec![false; SYMPTOM_CHOICES.len()],
            symptom_cursor: 0,
            cursor: 0,
            error_message: None,
        }
    }
}

impl IntakeFormState {
    fn positions(&self) -> usize {
        // All fields plus the symptom checklist.
        self.fields.len() + 1
    }

    fn on_symptoms(&self) -> bool {
        self.cursor == self.fields.len()
    }

    /// Move to the next field.
    pub fn next_field(&mut self) {
        self.cursor = (self.cursor + 1) % self.positions();
    }

    /// Move to the previous field.
    pub fn prev_field(&mut self) {
        if self.cursor == 0 {
            self.cursor = self.positions() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    /// Type into the focused numeric field.
    pub fn input_char(&mut self, c: char) {
        if self.on_symptoms() {
            return;
        }
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.cursor].kind {
            if c.is_ascii_digit() {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character of the focused numeric field.
    pub fn delete_char(&mut self) {
        if self.on_symptoms() {
            return;
        }
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.cursor].kind {
            value.pop();
        }
    }

    /// Clear the focused numeric field.
    pub fn clear_field(&mut self) {
        if self.on_symptoms() {
            return;
        }
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.cursor].kind {
            value.clear();
        }
    }

    /// Cycle the focused select, or move the symptom cursor.
    pub fn cycle(&mut self, forward: bool) {
        if self.on_symptoms() {
            let n = self.symptom_selected.len();
            self.symptom_cursor = if forward {
                (self.symptom_cursor + 1) % n
            } else {
                (self.symptom_cursor + n - 1) % n
            };
            return;
        }
        if let FieldKind::Select { options, selected } = &mut self.fields[self.cursor].kind {
            let n = options.len();
            *selected = if forward {
                (*selected + 1) % n
            } else {
                (*selected + n - 1) % n
            };
            self.error_message = None;
        }
    }

    /// Toggle the symptom under the cursor.
    pub fn toggle_symptom(&mut self) {
        if self.on_symptoms() {
            let flag = &mut self.symptom_selected[self.symptom_cursor];
            *flag = !*flag;
        }
    }

    /// Load sample data (typical patient above the age gate).
    pub fn load_sample_data(&mut self) {
        let sample = ["5", "55", "66", "150"];
        let mut samples = sample.iter();
        for field in &mut self.fields {
            if let FieldKind::Numeric { value, .. } = &mut field.kind {
                if let Some(v) = samples.next() {
                    *value = (*v).to_string();
                }
            }
        }
        self.symptom_selected.fill(false);
        if let Some(first) = self.symptom_selected.first_mut() {
            *first = true;
        }
    }

    /// Validate and convert the form to a profile.
    ///
    /// # Errors
    /// Returns a user-visible message for the first invalid field.
    pub fn to_profile(&self) -> Result<PatientProfile, String> {
        let mut pain_level: u8 = 0;
        let mut age: u8 = 0;
        let mut height_in: u16 = 0;
        let mut weight_lb: u16 = 0;
        let mut answers = Vec::with_capacity(CATEGORICAL_FIELDS.len());

        for field in &self.fields {
            match &field.kind {
                FieldKind::Numeric {
                    key,
                    value,
                    min,
                    max,
                    ..
                } => {
                    let parsed: u32 = value
                        .trim()
                        .parse()
                        .map_err(|_| format!("{}: Invalid number", field.label))?;
                    if f64::from(parsed) < *min || f64::from(parsed) > *max {
                        return Err(format!(
                            "{}: Value must be between {} and {}",
                            field.label, min, max
                        ));
                    }
                    match key {
                        NumericKey::PainLevel => pain_level = parsed as u8,
                        NumericKey::Age => age = parsed as u8,
                        NumericKey::HeightIn => height_in = parsed as u16,
                        NumericKey::WeightLb => weight_lb = parsed as u16,
                    }
                }
                FieldKind::Select { options, selected } => {
                    answers.push(options[*selected].to_string());
                }
            }
        }

        let symptoms = SYMPTOM_CHOICES
            .iter()
            .zip(self.symptom_selected.iter())
            .filter(|(_, &on)| on)
            .map(|(name, _)| (*name).to_string())
            .collect();

        Ok(PatientProfile {
            pain_level,
            age,
            height_in,
            weight_lb,
            answers,
            symptoms,
        })
    }
}

/// Render the intake form.
pub fn render_intake_form(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_body(f, chunks[1], state);
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Knee Pain Assessment", ClinicTheme::title()),
        Span::styled(" │ Patient-reported attributes", ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_body(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .margin(1)
        .split(area);

    let numeric_count = NUMERIC_FIELDS.len();

    // Left column: numeric fields, then the symptom checklist.
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            (0..numeric_count)
                .map(|_| Constraint::Length(3))
                .chain(std::iter::once(Constraint::Min(0)))
                .collect::<Vec<_>>(),
        )
        .split(columns[0]);

    for i in 0..numeric_count {
        render_field(f, left[i], &state.fields[i], state.cursor == i);
    }
    render_symptoms(f, left[numeric_count], state);

    // Right column: the single-select questions.
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            (numeric_count..state.fields.len())
                .map(|_| Constraint::Length(3))
                .chain(std::iter::once(Constraint::Min(0)))
                .collect::<Vec<_>>(),
        )
        .split(columns[1]);

    for (slot, i) in (numeric_count..state.fields.len()).enumerate() {
        render_field(f, right[slot], &state.fields[i], state.cursor == i);
    }
}

fn render_field(f: &mut Frame, area: Rect, field: &IntakeField, is_selected: bool) {
    let border_style = if is_selected {
        ClinicTheme::border_focused()
    } else {
        ClinicTheme::border()
    };
    let title_style = if is_selected {
        ClinicTheme::focused()
    } else {
        ClinicTheme::text_secondary()
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = match &field.kind {
        FieldKind::Numeric { value, hint, .. } => {
            let value_display = if value.is_empty() {
                Span::styled(*hint, ClinicTheme::text_muted())
            } else {
                Span::styled(value.as_str(), ClinicTheme::text())
            };
            Line::from(vec![
                Span::raw(" "),
                value_display,
                if is_selected {
                    Span::styled("▌", ClinicTheme::focused())
                } else {
                    Span::raw("")
                },
            ])
        }
        FieldKind::Select { options, selected } => Line::from(vec![
            Span::styled(if is_selected { " ◂ " } else { "   " }, ClinicTheme::key_hint()),
            Span::styled(options[*selected], ClinicTheme::text()),
            Span::styled(if is_selected { " ▸" } else { "" }, ClinicTheme::key_hint()),
        ]),
    };

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_symptoms(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let focused = state.cursor == state.fields.len();
    let border_style = if focused {
        ClinicTheme::border_focused()
    } else {
        ClinicTheme::border()
    };
    let title_style = if focused {
        ClinicTheme::focused()
    } else {
        ClinicTheme::text_secondary()
    };

    let lines: Vec<Line> = SYMPTOM_CHOICES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mark = if state.symptom_selected[i] { "[x]" } else { "[ ]" };
            let style = if focused && i == state.symptom_cursor {
                ClinicTheme::focused()
            } else if state.symptom_selected[i] {
                ClinicTheme::text()
            } else {
                ClinicTheme::text_secondary()
            };
            Line::from(Span::styled(format!(" {mark} {name}"), style))
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Accompanying symptoms ", title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicTheme::danger()),
            Span::styled(err.clone(), ClinicTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicTheme::key_hint()),
            Span::styled("Navigate ", ClinicTheme::key_desc()),
            Span::styled("[◂▸] ", ClinicTheme::key_hint()),
            Span::styled("Choose ", ClinicTheme::key_desc()),
            Span::styled("[Space] ", ClinicTheme::key_hint()),
            Span::styled("Toggle ", ClinicTheme::key_desc()),
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Submit ", ClinicTheme::key_desc()),
            Span::styled("[S] ", ClinicTheme::key_hint()),
            Span::styled("Sample ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Back", ClinicTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}
