//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::api::RecommendRequest;
use crate::domain::Gender;
use crate::tui::styles::MedicalTheme;

const MAX_TEXT_LEN: usize = 64;

/// How a field accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Digits only, checked against an inclusive range on submit
    Integer { min: i64, max: i64 },
    /// Female/Male toggle
    Gender,
    /// Free text
    Text,
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

const AGE: usize = 0;
const GENDER: usize = 1;
const LOCATION: usize = 2;
const CONDITIONS: usize = 3;
const TOP_N: usize = 4;

impl Default for PatientFormState {
    fn default() -> Self {
        let mut state = Self {
            fields: vec![
                FormField {
                    label: "Age",
                    hint: "years (1-120)",
                    kind: FieldKind::Integer { min: 1, max: 120 },
                    value: String::new(),
                },
                FormField {
                    label: "Gender",
                    hint: "[Space] to toggle",
                    kind: FieldKind::Gender,
                    value: String::new(),
                },
                FormField {
                    label: "Location",
                    hint: "city",
                    kind: FieldKind::Text,
                    value: String::new(),
                },
                FormField {
                    label: "Chronic Conditions",
                    hint: "e.g. Diabetes, or none",
                    kind: FieldKind::Text,
                    value: String::new(),
                },
                FormField {
                    label: "Number of Top Doctors",
                    hint: "1-10",
                    kind: FieldKind::Integer { min: 1, max: 10 },
                    value: String::new(),
                },
            ],
            selected_field: 0,
            error_message: None,
        };
        state.load_sample_data();
        state
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accepted = match field.kind {
            FieldKind::Integer { .. } => c.is_ascii_digit() && field.value.len() < 4,
            FieldKind::Gender => {
                if c == ' ' {
                    field.value = toggle_gender(&field.value);
                }
                false
            }
            FieldKind::Text => !c.is_control() && field.value.chars().count() < MAX_TEXT_LEN,
        };

        if accepted {
            field.value.push(c);
        }
        self.error_message = None;
    }

    /// Flip the gender field, or step an integer field by `delta`.
    pub fn adjust(&mut self, delta: i64) {
        let field = &mut self.fields[self.selected_field];
        match field.kind {
            FieldKind::Gender => field.value = toggle_gender(&field.value),
            FieldKind::Integer { min, max } => {
                let current = field.value.parse::<i64>().unwrap_or(min);
                field.value = (current + delta).clamp(min, max).to_string();
            }
            FieldKind::Text => {}
        }
        self.error_message = None;
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if field.kind != FieldKind::Gender {
            field.value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if field.kind != FieldKind::Gender {
            field.value.clear();
        }
    }

    /// Wipe all field buffers from memory and clear values.
    ///
    /// Called right after a request is handed to the worker so patient
    /// inputs do not persist in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Validate and convert to a request body
    pub fn to_request(&self) -> Result<RecommendRequest, String> {
        let age = self.integer(AGE)?;
        let gender = match self.fields[GENDER].value.as_str() {
            "Male" => Gender::Male,
            _ => Gender::Female,
        };
        let top_n = self.integer(TOP_N)?;

        Ok(RecommendRequest {
            age,
            gender: i64::from(gender.code()),
            location: self.fields[LOCATION].value.clone(),
            chronic_conditions: self.fields[CONDITIONS].value.clone(),
            top_n,
        })
    }

    fn integer(&self, index: usize) -> Result<i64, String> {
        let field = &self.fields[index];
        let value: i64 = field
            .value
            .parse()
            .map_err(|_| format!("{}: Invalid number", field.label))?;

        if let FieldKind::Integer { min, max } = field.kind {
            if value < min || value > max {
                return Err(format!(
                    "{}: Value must be between {} and {}",
                    field.label, min, max
                ));
            }
        }

        Ok(value)
    }

    /// Reset to the standard example patient
    pub fn load_sample_data(&mut self) {
        let gender = Gender::Female.to_string();
        let sample: [&str; 5] = ["35", &gender, "Lahore", "Diabetes", "3"];
        for (field, val) in self.fields.iter_mut().zip(sample) {
            field.value = val.to_string();
        }
        self.error_message = None;
    }
}

fn toggle_gender(current: &str) -> String {
    let gender = if current == Gender::Male.to_string() {
        Gender::Male
    } else {
        Gender::Female
    };
    gender.toggled().to_string()
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Details", MedicalTheme::title()),
        Span::styled(
            " │ Enter patient details to get Top-N doctor recommendations",
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

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), MedicalTheme::text())
        };

        let mut spans = vec![Span::raw(" "), value_display];
        if is_selected {
            match field.kind {
                FieldKind::Gender => spans.push(Span::styled("  ◂ ▸", MedicalTheme::cursor())),
                _ => spans.push(Span::styled("▌", MedicalTheme::cursor())),
            }
        }

        let content = Paragraph::new(Line::from(spans)).block(block);
        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Adjust ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Get Recommendations ", MedicalTheme::key_desc()),
            Span::styled("[F2] ", MedicalTheme::key_hint()),
            Span::styled("Defaults ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
