use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::Config;
use crate::models::{Project, ValidationErrors};

mod memory;

pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("project {0} does not exist")]
    NotFound(i32),

    #[error("project has not been saved yet")]
    Unsaved,

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Maps [`Project`] records to storage. Implementations validate records
/// before writing them and assign ids on insert.
#[allow(async_fn_in_trait)]
pub trait ProjectStore {
    async fn get_projects(&self) -> Result<Vec<Project>>;

    async fn get_project(&self, id: i32) -> Result<Project>;

    /// Inserts the record and returns the id it was assigned. Any id already
    /// present on `project` is ignored.
    async fn create_project(&self, project: &Project) -> Result<i32>;

    async fn update_project(&self, project: &Project) -> Result<()>;

    async fn delete_project(&self, id: i32) -> Result<()>;

    /// Inserts or updates depending on whether the record has an id yet.
    async fn save_project(&self, project: &mut Project) -> Result<i32> {
        match project.id {
            Some(id) => {
                self.update_project(project).await?;
                Ok(id)
            }
            None => {
                let id = self.create_project(project).await?;
                project.id = Some(id);
                Ok(id)
            }
        }
    }
}

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let url = config
            .database_url()
            .context("DATABASE_URL is not set (use --memory to run without a database)")?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .context("failed to connect to the database")?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

impl ProjectStore for Database {
    async fn get_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, sector, budget, start_date, end_date
            FROM projects
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        log::debug!("loaded {} projects", projects.len());
        Ok(projects)
    }

    async fn get_project(&self, id: i32) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, sector, budget, start_date, end_date
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?
        .ok_or(StoreError::NotFound(id))?;

        Ok(project)
    }

    async fn create_project(&self, project: &Project) -> Result<i32> {
        project.validate().map_err(StoreError::from)?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO projects (name, sector, budget, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(&project.sector)
        .bind(&project.budget)
        .bind(project.start_date)
        .bind(project.end_date)
        .fetch_one(self.get_pool())
        .await?;

        tracing::info!(id, name = %project.name, "project created");
        Ok(id)
    }

    async fn update_project(&self, project: &Project) -> Result<()> {
        let id = project.id.ok_or(StoreError::Unsaved)?;
        project.validate().map_err(StoreError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $1, sector = $2, budget = $3, start_date = $4, end_date = $5
            WHERE id = $6
            "#,
        )
        .bind(&project.name)
        .bind(&project.sector)
        .bind(&project.budget)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(id)
        .execute(self.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id).into());
        }

        tracing::info!(id, "project updated");
        Ok(())
    }

    async fn delete_project(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id).into());
        }

        tracing::info!(id, "project deleted");
        Ok(())
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;
    log::debug!("connection pool ready (max {} connections)", config.max_connections);
    Ok(db)
}
