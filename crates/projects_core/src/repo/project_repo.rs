//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/fetch/update/delete over the Project aggregate.
//! - Provide child writes for materials, steps and category links, including
//!   a single-transaction insert-and-link for new categories.
//! - Run every operation as one connection plus one transaction.
//!
//! # Invariants
//! - Write paths validate before any SQL runs.
//! - An aggregate fetch reads the project and all three child collections in
//!   the same transaction.
//! - Zero affected rows on update/delete is reported as `false`, not an error.
//! - Any statement failure rolls back the whole operation.

use crate::db::schema::{
    CATEGORY_TABLE, MATERIAL_TABLE, PROJECT_CATEGORY_TABLE, PROJECT_TABLE, STEP_TABLE,
};
use crate::db::statement::{execute, query_all, query_optional};
use crate::db::{
    columns_for, in_transaction, last_insert_id, Binding, ConnectionError, ConnectionProvider,
    DbError, DbResult, RowShape,
};
use crate::model::project::{
    Category, Material, Project, ProjectId, ProjectValidationError, Step,
};
use crate::repo::mapping::{category_bindings, material_bindings, project_bindings, step_bindings};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProjectValidationError),
    Connection(ConnectionError),
    /// A statement in the unit of work failed; the transaction was rolled back.
    Persistence {
        operation: &'static str,
        source: DbError,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Connection(err) => write!(f, "{err}"),
            Self::Persistence { operation, source } => write!(f, "{operation} failed: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Connection(err) => Some(err),
            Self::Persistence { source, .. } => Some(source),
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ConnectionError> for RepoError {
    fn from(value: ConnectionError) -> Self {
        Self::Connection(value)
    }
}

/// Repository interface for the Project aggregate.
pub trait ProjectRepository {
    /// Inserts a project and returns it with the store-assigned id.
    fn insert_project(&self, project: &Project) -> RepoResult<Project>;
    /// Lists all projects by ascending id, without child collections.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Loads one project with its materials, steps and categories.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Overwrites all mutable attributes; `false` when the id is unknown.
    fn update_project(&self, project: &Project) -> RepoResult<bool>;
    /// Deletes by id; `false` when the id is unknown.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool>;
    fn insert_material(&self, material: &Material) -> RepoResult<Material>;
    fn insert_step(&self, step: &Step) -> RepoResult<Step>;
    fn insert_category(&self, category: &Category) -> RepoResult<Category>;
    /// Links an existing category to an existing project.
    fn link_category(&self, project_id: ProjectId, category_id: i64) -> RepoResult<()>;
    /// Inserts a new category and links it to `project_id` as one unit.
    fn insert_and_link_category(
        &self,
        project_id: ProjectId,
        category: &Category,
    ) -> RepoResult<Category>;
    fn fetch_all_categories(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed project repository. Opens a fresh connection per call.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    provider: ConnectionProvider,
}

impl SqliteProjectRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    fn run<T>(
        &self,
        operation: &'static str,
        work: impl FnOnce(&Connection) -> DbResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let conn = self.provider.acquire()?;

        match in_transaction(&conn, operation, |tx| work(tx)) {
            Ok(value) => {
                info!(
                    "event={operation} module=repo status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(source) => {
                error!(
                    "event={operation} module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(RepoError::Persistence { operation, source })
            }
        }
    }
}

impl ProjectRepository for SqliteProjectRepository {
    fn insert_project(&self, project: &Project) -> RepoResult<Project> {
        project.validate()?;

        let project_id = self.run("insert_project", |conn| {
            execute(
                conn,
                &format!(
                    "INSERT INTO {PROJECT_TABLE}
                        (project_name, estimated_hours, actual_hours, difficulty, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5);"
                ),
                &project_bindings(project),
            )?;
            last_insert_id(conn, PROJECT_TABLE)
        })?;

        Ok(Project {
            project_id: Some(project_id),
            ..project.clone()
        })
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        self.run("fetch_all_projects", |conn| {
            query_all::<Project>(
                conn,
                &format!("{} ORDER BY project_id ASC;", select_from::<Project>(PROJECT_TABLE)),
                &[],
            )
        })
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        self.run("fetch_project_by_id", |conn| {
            let found = query_optional::<Project>(
                conn,
                &format!("{} WHERE project_id = ?1;", select_from::<Project>(PROJECT_TABLE)),
                &[Binding::integer(Some(project_id))],
            )?;

            let Some(mut project) = found else {
                return Ok(None);
            };
            project.materials = fetch_materials(conn, project_id)?;
            project.steps = fetch_steps(conn, project_id)?;
            project.categories = fetch_categories(conn, project_id)?;
            Ok(Some(project))
        })
    }

    fn update_project(&self, project: &Project) -> RepoResult<bool> {
        let project_id = project.project_id.ok_or(ProjectValidationError::MissingId)?;
        project.validate()?;

        let mut bindings = project_bindings(project);
        bindings.push(Binding::integer(Some(project_id)));

        self.run("update_project", |conn| {
            let changed = execute(
                conn,
                &format!(
                    "UPDATE {PROJECT_TABLE}
                     SET
                        project_name = ?1,
                        estimated_hours = ?2,
                        actual_hours = ?3,
                        difficulty = ?4,
                        notes = ?5
                     WHERE project_id = ?6;"
                ),
                &bindings,
            )?;
            Ok(changed == 1)
        })
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        self.run("delete_project", |conn| {
            let changed = execute(
                conn,
                &format!("DELETE FROM {PROJECT_TABLE} WHERE project_id = ?1;"),
                &[Binding::integer(Some(project_id))],
            )?;
            Ok(changed == 1)
        })
    }

    fn insert_material(&self, material: &Material) -> RepoResult<Material> {
        material.validate()?;

        let material_id = self.run("insert_material", |conn| {
            execute(
                conn,
                &format!(
                    "INSERT INTO {MATERIAL_TABLE} (project_id, name, cost, num_required)
                     VALUES (?1, ?2, ?3, ?4);"
                ),
                &material_bindings(material),
            )?;
            last_insert_id(conn, MATERIAL_TABLE)
        })?;

        Ok(Material {
            material_id: Some(material_id),
            ..material.clone()
        })
    }

    fn insert_step(&self, step: &Step) -> RepoResult<Step> {
        step.validate()?;

        let step_id = self.run("insert_step", |conn| {
            execute(
                conn,
                &format!(
                    "INSERT INTO {STEP_TABLE} (project_id, step_text, step_order)
                     VALUES (?1, ?2, ?3);"
                ),
                &step_bindings(step),
            )?;
            last_insert_id(conn, STEP_TABLE)
        })?;

        Ok(Step {
            step_id: Some(step_id),
            ..step.clone()
        })
    }

    fn insert_category(&self, category: &Category) -> RepoResult<Category> {
        category.validate()?;

        let category_id =
            self.run("insert_category", |conn| insert_category_row(conn, category))?;

        Ok(Category {
            category_id: Some(category_id),
            ..category.clone()
        })
    }

    fn link_category(&self, project_id: ProjectId, category_id: i64) -> RepoResult<()> {
        self.run("link_category", |conn| {
            link_category_row(conn, project_id, category_id)
        })
    }

    fn insert_and_link_category(
        &self,
        project_id: ProjectId,
        category: &Category,
    ) -> RepoResult<Category> {
        category.validate()?;

        let category_id = self.run("insert_and_link_category", |conn| {
            let category_id = insert_category_row(conn, category)?;
            link_category_row(conn, project_id, category_id)?;
            Ok(category_id)
        })?;

        Ok(Category {
            category_id: Some(category_id),
            ..category.clone()
        })
    }

    fn fetch_all_categories(&self) -> RepoResult<Vec<Category>> {
        self.run("fetch_all_categories", |conn| {
            query_all::<Category>(
                conn,
                &format!(
                    "{} ORDER BY category_id ASC;",
                    select_from::<Category>(CATEGORY_TABLE)
                ),
                &[],
            )
        })
    }
}

fn insert_category_row(conn: &Connection, category: &Category) -> DbResult<i64> {
    execute(
        conn,
        &format!("INSERT INTO {CATEGORY_TABLE} (category_name) VALUES (?1);"),
        &category_bindings(category),
    )?;
    last_insert_id(conn, CATEGORY_TABLE)
}

fn link_category_row(conn: &Connection, project_id: ProjectId, category_id: i64) -> DbResult<()> {
    execute(
        conn,
        &format!(
            "INSERT INTO {PROJECT_CATEGORY_TABLE} (project_id, category_id)
             VALUES (?1, ?2);"
        ),
        &[
            Binding::integer(Some(project_id)),
            Binding::integer(Some(category_id)),
        ],
    )?;
    Ok(())
}

fn select_from<S: RowShape>(table: &str) -> String {
    format!("SELECT {} FROM {table}", columns_for::<S>().join(", "))
}

fn fetch_materials(conn: &Connection, project_id: ProjectId) -> DbResult<Vec<Material>> {
    query_all::<Material>(
        conn,
        &format!(
            "{} WHERE project_id = ?1 ORDER BY material_id ASC;",
            select_from::<Material>(MATERIAL_TABLE)
        ),
        &[Binding::integer(Some(project_id))],
    )
}

fn fetch_steps(conn: &Connection, project_id: ProjectId) -> DbResult<Vec<Step>> {
    query_all::<Step>(
        conn,
        &format!(
            "{} WHERE project_id = ?1 ORDER BY step_order ASC, step_id ASC;",
            select_from::<Step>(STEP_TABLE)
        ),
        &[Binding::integer(Some(project_id))],
    )
}

fn fetch_categories(conn: &Connection, project_id: ProjectId) -> DbResult<Vec<Category>> {
    let columns = columns_for::<Category>()
        .iter()
        .map(|column| format!("c.{column} AS {column}"))
        .collect::<Vec<_>>()
        .join(", ");

    query_all::<Category>(
        conn,
        &format!(
            "SELECT {columns}
             FROM {CATEGORY_TABLE} c
             INNER JOIN {PROJECT_CATEGORY_TABLE} pc USING (category_id)
             WHERE pc.project_id = ?1
             ORDER BY c.category_id ASC;"
        ),
        &[Binding::integer(Some(project_id))],
    )
}
