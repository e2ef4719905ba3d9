use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::db::ProjectStore;
use crate::models::Project;
use crate::ui::centered_rect;

// Represents the state of the project selection screen
pub struct ProjectsState {
    projects: Vec<Project>,
    list_state: ListState,
    show_delete_confirmation: bool,
    status: Option<String>,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            show_delete_confirmation: false,
            status: None,
        }
    }

    /// Status line shown under the list, e.g. the outcome of the last save.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.projects.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.projects.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<i32> {
        self.selected_project().and_then(|p| p.id)
    }
}

#[derive(Debug, PartialEq)]
pub enum ProjectAction {
    Exit,
    NewProject,
    EditProject(i32),   // Contains project_id
    DeleteProject(i32), // Contains project_id
}

pub async fn load_projects<S: ProjectStore>(store: &S) -> Result<Vec<Project>> {
    store.get_projects().await
}

fn format_dates(project: &Project) -> String {
    format!(
        "{} to {}",
        project.start_date.format("%Y-%m-%d"),
        project.end_date.format("%Y-%m-%d")
    )
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            ListItem::new(Spans::from(vec![
                Span::styled(
                    project.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  [{}]", project.sector)),
                Span::raw(format!("  {}", project.budget)),
                Span::styled(
                    format!("  ({})", format_dates(project)),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(projects_list, chunks[0], &mut state.list_state);

    let keys = if state.selected_project().is_some() {
        "<N> New Project | <E> Edit Project | <D> Delete Project | <Q> Quit"
    } else {
        "<N> New Project | <Q> Quit"
    };
    let footer = match &state.status {
        Some(status) => format!("{}    {}", keys, status),
        None => keys.to_string(),
    };

    let buttons = Paragraph::new(footer)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        let label = state
            .selected_project()
            .map(|p| p.to_string())
            .unwrap_or_default();
        render_delete_confirmation(frame, size, &label);
    }
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect, label: &str) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(format!("Delete project \"{}\"?", label)),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

pub fn handle_input(state: &mut ProjectsState) -> Result<Option<ProjectAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

pub fn handle_key(state: &mut ProjectsState, code: KeyCode) -> Option<ProjectAction> {
    if state.show_delete_confirmation {
        match code {
            KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state.selected_project_id().map(ProjectAction::DeleteProject);
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                state.toggle_delete_confirmation();
            }
            _ => {}
        }
        return None;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectAction::Exit),
        KeyCode::Char('n') => return Some(ProjectAction::NewProject),
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_project_id().map(ProjectAction::EditProject);
        }
        KeyCode::Char('d') => {
            if state.selected_project().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn saved(id: i32, name: &str) -> Project {
        let mut project = Project::new(
            name,
            "Transport",
            BigDecimal::from(1000),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        project.id = Some(id);
        project
    }

    fn state() -> ProjectsState {
        ProjectsState::new(vec![saved(1, "Airport"), saved(2, "Bypass"), saved(3, "Canal")])
    }

    #[test]
    fn navigation_wraps() {
        let mut state = state();
        assert_eq!(state.selected_project_id(), Some(1));

        handle_key(&mut state, KeyCode::Up);
        assert_eq!(state.selected_project_id(), Some(3));

        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.selected_project_id(), Some(1));
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut state = state();
        handle_key(&mut state, KeyCode::Down);

        assert_eq!(handle_key(&mut state, KeyCode::Char('d')), None);
        assert!(state.show_delete_confirmation);

        // Other keys are swallowed while the popup is open.
        assert_eq!(handle_key(&mut state, KeyCode::Char('n')), None);
        assert!(!state.show_delete_confirmation);

        handle_key(&mut state, KeyCode::Char('d'));
        assert_eq!(
            handle_key(&mut state, KeyCode::Char('y')),
            Some(ProjectAction::DeleteProject(2))
        );
    }

    #[test]
    fn empty_list_only_offers_new_and_exit() {
        let mut state = ProjectsState::new(Vec::new());

        assert_eq!(handle_key(&mut state, KeyCode::Enter), None);
        assert_eq!(handle_key(&mut state, KeyCode::Char('d')), None);
        assert!(!state.show_delete_confirmation);
        assert_eq!(handle_key(&mut state, KeyCode::Char('n')), Some(ProjectAction::NewProject));
        assert_eq!(handle_key(&mut state, KeyCode::Esc), Some(ProjectAction::Exit));
    }

    #[test]
    fn enter_edits_selected_project() {
        let mut state = state();
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Down);
        assert_eq!(handle_key(&mut state, KeyCode::Enter), Some(ProjectAction::EditProject(3)));
    }
}
