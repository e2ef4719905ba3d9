use std::str::FromStr;

use anyhow::Result;
use bigdecimal::BigDecimal;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::Project;
use crate::ui::components::date_input::DateInputState;

#[derive(Debug)]
pub enum ProjectWizardAction {
    Cancel,
    Save(Project),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ProjectField {
    Name,
    Sector,
    Budget,
    StartDate,
    EndDate,
}

impl ProjectField {
    const ALL: [ProjectField; 5] = [
        ProjectField::Name,
        ProjectField::Sector,
        ProjectField::Budget,
        ProjectField::StartDate,
        ProjectField::EndDate,
    ];

    fn label(self) -> &'static str {
        match self {
            ProjectField::Name => "Name",
            ProjectField::Sector => "Sector",
            ProjectField::Budget => "Budget",
            ProjectField::StartDate => "Start Date",
            ProjectField::EndDate => "End Date",
        }
    }
}

pub struct ProjectWizardState {
    pub project: Project,
    pub budget_input: String,
    pub current_field: ProjectField,
    pub editing: bool,
    pub start_date_state: DateInputState,
    pub end_date_state: DateInputState,
    pub error: Option<String>,
}

impl ProjectWizardState {
    pub fn new() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::from_existing(Project::new("", "", BigDecimal::from(0), today, today))
    }

    pub fn from_existing(project: Project) -> Self {
        Self {
            budget_input: project.budget.to_string(),
            current_field: ProjectField::Name,
            editing: false,
            start_date_state: DateInputState::new(project.start_date),
            end_date_state: DateInputState::new(project.end_date),
            error: None,
            project,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            match self.current_field {
                ProjectField::StartDate => self.start_date_state.toggle_editing(),
                ProjectField::EndDate => self.end_date_state.toggle_editing(),
                _ => {}
            }
        } else {
            self.start_date_state.editing = false;
            self.end_date_state.editing = false;
        }
    }

    pub fn next_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = ProjectField::ALL[(i + 1) % ProjectField::ALL.len()];
    }

    pub fn previous_field(&mut self) {
        let len = ProjectField::ALL.len();
        let i = self.current_field as usize;
        self.current_field = ProjectField::ALL[(i + len - 1) % len];
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let text = match self.current_field {
            ProjectField::Name => &mut self.project.name,
            ProjectField::Sector => &mut self.project.sector,
            ProjectField::Budget => &mut self.budget_input,
            ProjectField::StartDate => {
                self.start_date_state.handle_input(key);
                self.project.start_date = self.start_date_state.date;
                return;
            }
            ProjectField::EndDate => {
                self.end_date_state.handle_input(key);
                self.project.end_date = self.end_date_state.date;
                return;
            }
        };

        match key {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => {}
        }
    }

    /// Parses the budget and checks the record the same way the store will.
    pub fn build(&self) -> Result<Project, String> {
        let budget = BigDecimal::from_str(self.budget_input.trim())
            .map_err(|_| format!("budget \"{}\" is not a number", self.budget_input))?;

        let project = Project {
            budget,
            ..self.project.clone()
        };
        project.validate().map_err(|e| e.to_string())?;

        Ok(project)
    }

    fn display_value(&self, field: ProjectField) -> String {
        match field {
            ProjectField::Name => self.project.name.clone(),
            ProjectField::Sector => self.project.sector.clone(),
            ProjectField::Budget => self.budget_input.clone(),
            ProjectField::StartDate => self.start_date_state.get_display_string(),
            ProjectField::EndDate => self.end_date_state.get_display_string(),
        }
    }
}

impl Default for ProjectWizardState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = if state.project.is_saved() {
        "Project Editing Wizard"
    } else {
        "Project Creation Wizard"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let (help_text, help_style) = match &state.error {
        Some(error) => (error.clone(), Style::default().fg(Color::Red)),
        None => {
            let text = if state.editing {
                match state.current_field {
                    ProjectField::StartDate | ProjectField::EndDate => {
                        "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing"
                    }
                    _ => "Enter - Save field | Esc - Cancel editing",
                }
            } else {
                "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
            };
            (text.to_string(), Style::default().fg(Color::Gray))
        }
    };

    let help = Paragraph::new(help_text)
        .style(help_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState, area: Rect) {
    let items: Vec<ListItem> = ProjectField::ALL
        .iter()
        .map(|&field| {
            let value = state.display_value(field);
            let selected = field == state.current_field;

            let content = if selected && state.editing {
                let is_text = !matches!(field, ProjectField::StartDate | ProjectField::EndDate);
                let shown = if is_text { format!("{}|", value) } else { value };

                Spans::from(vec![
                    Span::styled(
                        format!("{}: ", field.label()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(shown, Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

pub fn handle_key(state: &mut ProjectWizardState, code: KeyCode) -> Option<ProjectWizardAction> {
    match code {
        KeyCode::Esc if state.editing => state.toggle_editing(),
        KeyCode::Esc => return Some(ProjectWizardAction::Cancel),
        KeyCode::Enter => {
            state.error = None;
            state.toggle_editing();
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => match state.build() {
            Ok(project) => return Some(ProjectWizardAction::Save(project)),
            Err(message) => state.set_error(message),
        },
        _ if state.editing => state.edit_current_field(code),
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn type_text(state: &mut ProjectWizardState, text: &str) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
    }

    fn fill_field(state: &mut ProjectWizardState, field: ProjectField, text: &str) {
        while state.current_field != field {
            handle_key(state, KeyCode::Down);
        }
        handle_key(state, KeyCode::Enter);
        type_text(state, text);
        handle_key(state, KeyCode::Enter);
    }

    fn saved_project() -> Project {
        let mut project = Project::new(
            "Port Expansion",
            "Maritime",
            BigDecimal::from_str("900000.00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        );
        project.id = Some(5);
        project
    }

    #[test]
    fn creates_project_from_typed_fields() {
        let mut state = ProjectWizardState::new();
        state.budget_input.clear();

        fill_field(&mut state, ProjectField::Name, "Solar Farm");
        fill_field(&mut state, ProjectField::Sector, "Energy");
        fill_field(&mut state, ProjectField::Budget, "250000.75");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ProjectWizardAction::Save(project)) => {
                assert_eq!(project.id, None);
                assert_eq!(project.name, "Solar Farm");
                assert_eq!(project.sector, "Energy");
                assert_eq!(project.budget, BigDecimal::from_str("250000.75").unwrap());
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn editing_keeps_the_id_and_dates() {
        let mut state = ProjectWizardState::from_existing(saved_project());
        assert_eq!(state.budget_input, "900000.00");

        fill_field(&mut state, ProjectField::EndDate, "2027");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ProjectWizardAction::Save(project)) => {
                assert_eq!(project.id, Some(5));
                assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
                assert_eq!(project.end_date, NaiveDate::from_ymd_opt(2027, 4, 1).unwrap());
            }
            other => panic!("expected save, got {:?}", other),
        }
    }

    #[test]
    fn invalid_budget_stays_in_wizard() {
        let mut state = ProjectWizardState::from_existing(saved_project());
        state.budget_input = "12.345".to_string();

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        let error = state.error.clone().unwrap();
        assert!(error.contains("decimal places"), "{}", error);

        state.budget_input = "lots".to_string();
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert!(state.error.as_deref().unwrap().contains("not a number"));
    }

    #[test]
    fn blank_name_is_reported() {
        let mut state = ProjectWizardState::new();
        state.project.sector = "Health".to_string();

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert!(state.error.as_deref().unwrap().contains("name may not be blank"));
    }

    #[test]
    fn field_navigation_wraps() {
        let mut state = ProjectWizardState::new();

        handle_key(&mut state, KeyCode::Up);
        assert_eq!(state.current_field, ProjectField::EndDate);

        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.current_field, ProjectField::Name);
    }

    #[test]
    fn escape_cancels_editing_before_the_wizard() {
        let mut state = ProjectWizardState::new();
        handle_key(&mut state, KeyCode::Enter);
        type_text(&mut state, "s");
        assert_eq!(state.project.name, "s");

        assert!(handle_key(&mut state, KeyCode::Esc).is_none());
        assert!(!state.editing);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Esc),
            Some(ProjectWizardAction::Cancel)
        ));
    }
}
