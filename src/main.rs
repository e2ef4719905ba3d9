mod cli;
mod config;
mod db;
mod logging;
mod models;
mod ui;

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::cli::{Cli, Commands};
use crate::db::{MemoryStore, ProjectStore};
use crate::models::Project;
use crate::ui::{
    project_wizard::{
        handle_input as handle_project_wizard_input, render_project_wizard, ProjectWizardAction,
        ProjectWizardState,
    },
    projects::{
        handle_input as handle_projects_input, load_projects, render_projects, ProjectAction,
        ProjectsState,
    },
};

// Represents the current screen in the app
enum AppScreen {
    Projects,
    ProjectWizard,
}

// Main application state
struct AppState<S> {
    store: S,
    screen: AppScreen,
    projects_state: Option<ProjectsState>,
    project_wizard_state: Option<ProjectWizardState>,
}

impl<S: ProjectStore> AppState<S> {
    fn new(store: S) -> Self {
        Self {
            store,
            screen: AppScreen::Projects,
            projects_state: None,
            project_wizard_state: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?;

    match cli.command {
        None | Some(Commands::Tui) => {
            logging::init_for_tui(&config)?;
            if cli.memory {
                run_tui(MemoryStore::new()).await
            } else {
                let db = db::init(&config).await?;
                run_tui(db).await
            }
        }
        Some(Commands::Migrate) => {
            logging::init_stderr()?;
            if cli.memory {
                tracing::warn!("the in-memory store needs no migrations");
                return Ok(());
            }
            db::init(&config).await?.migrate().await
        }
        Some(command) => {
            logging::init_stderr()?;
            if cli.memory {
                run_command(&MemoryStore::new(), command).await
            } else {
                let db = db::init(&config).await?;
                run_command(&db, command).await
            }
        }
    }
}

async fn run_command<S: ProjectStore>(store: &S, command: Commands) -> Result<()> {
    match command {
        Commands::List { json } => {
            let projects = store.get_projects().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            } else {
                for project in &projects {
                    print_project(project);
                }
            }
        }
        Commands::Show { id, json } => {
            let project = store.get_project(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&project)?);
            } else {
                print_project(&project);
            }
        }
        Commands::Add {
            name,
            sector,
            budget,
            start_date,
            end_date,
        } => {
            let mut project = Project::new(name, sector, budget, start_date, end_date);
            let id = store.save_project(&mut project).await?;
            println!("{}", id);
        }
        Commands::Delete { id } => {
            store.delete_project(id).await?;
        }
        Commands::Tui | Commands::Migrate => unreachable!("handled before dispatch"),
    }

    Ok(())
}

fn print_project(project: &Project) {
    println!(
        "{:>5}  {:<40}  {:<20}  {:>18}  {} to {}",
        project.id.map(|id| id.to_string()).unwrap_or_default(),
        project.label(),
        project.sector,
        project.budget.to_string(),
        project.start_date,
        project.end_date,
    );
}

async fn run_tui<S: ProjectStore>(store: S) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(store);
    let result = match load_projects_screen(&mut app_state, None).await {
        Ok(()) => run_app(&mut terminal, &mut app_state).await,
        Err(err) => Err(err),
    };

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("terminal UI stopped: {:#}", err);
    }
    result
}

async fn run_app<B: Backend, S: ProjectStore>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| match app_state.screen {
            AppScreen::Projects => {
                if let Some(state) = &mut app_state.projects_state {
                    render_projects(f, state);
                }
            }
            AppScreen::ProjectWizard => {
                if let Some(state) = &mut app_state.project_wizard_state {
                    render_project_wizard(f, state);
                }
            }
        })?;

        let should_quit = match app_state.screen {
            AppScreen::Projects => handle_projects_screen(app_state).await?,
            AppScreen::ProjectWizard => handle_project_wizard_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

async fn load_projects_screen<S: ProjectStore>(
    app_state: &mut AppState<S>,
    status: Option<String>,
) -> Result<()> {
    let projects = load_projects(&app_state.store).await?;

    let state = ProjectsState::new(projects);
    app_state.projects_state = Some(match status {
        Some(status) => state.with_status(status),
        None => state,
    });
    app_state.project_wizard_state = None;
    app_state.screen = AppScreen::Projects;

    Ok(())
}

async fn handle_projects_screen<S: ProjectStore>(app_state: &mut AppState<S>) -> Result<bool> {
    let Some(state) = &mut app_state.projects_state else {
        return Ok(false);
    };

    match handle_projects_input(state)? {
        Some(ProjectAction::Exit) => return Ok(true),
        Some(ProjectAction::NewProject) => {
            app_state.project_wizard_state = Some(ProjectWizardState::new());
            app_state.screen = AppScreen::ProjectWizard;
        }
        Some(ProjectAction::EditProject(project_id)) => {
            let project = app_state.store.get_project(project_id).await?;
            app_state.project_wizard_state = Some(ProjectWizardState::from_existing(project));
            app_state.screen = AppScreen::ProjectWizard;
        }
        Some(ProjectAction::DeleteProject(project_id)) => {
            let status = match app_state.store.delete_project(project_id).await {
                Ok(()) => "Project deleted".to_string(),
                Err(err) => format!("Delete failed: {}", err),
            };
            load_projects_screen(app_state, Some(status)).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_project_wizard_screen<S: ProjectStore>(
    app_state: &mut AppState<S>,
) -> Result<bool> {
    let Some(state) = &mut app_state.project_wizard_state else {
        return Ok(false);
    };

    match handle_project_wizard_input(state)? {
        Some(ProjectWizardAction::Cancel) => {
            load_projects_screen(app_state, None).await?;
        }
        Some(ProjectWizardAction::Save(mut project)) => {
            let saved = app_state.store.save_project(&mut project).await;
            match saved {
                Ok(_) => {
                    let status = format!("Saved \"{}\"", project);
                    load_projects_screen(app_state, Some(status)).await?;
                }
                // Stay in the wizard; the error replaces the help line.
                Err(err) => state.set_error(format!("Save failed: {}", err)),
            }
        }
        None => {}
    }

    Ok(false)
}
