//! Project use-case service.
//!
//! # Responsibility
//! - Provide the entry points the interactive shell calls.
//! - Apply input-layer rules (difficulty range) before persistence.
//! - Turn "no such project" repository outcomes into typed errors.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or transactions.
//! - Service layer remains storage-agnostic.

use crate::model::project::{Category, Material, Project, ProjectId, ProjectValidationError, Step};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

pub const DIFFICULTY_RANGE: RangeInclusive<i32> = 1..=5;

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ServiceError {
    ProjectNotFound(ProjectId),
    InvalidDifficulty(i32),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project with ID={id} does not exist"),
            Self::InvalidDifficulty(value) => write!(
                f,
                "difficulty must be between {} and {}, got {value}",
                DIFFICULTY_RANGE.start(),
                DIFFICULTY_RANGE.end()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Checks the input-layer difficulty rule; `None` is accepted.
pub fn validate_difficulty(difficulty: Option<i32>) -> ServiceResult<()> {
    match difficulty {
        Some(value) if !DIFFICULTY_RANGE.contains(&value) => {
            Err(ServiceError::InvalidDifficulty(value))
        }
        _ => Ok(()),
    }
}

/// Use-case service wrapper for project persistence.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and inserts a new project.
    pub fn add_project(&self, project: &Project) -> ServiceResult<Project> {
        validate_difficulty(project.difficulty)?;
        Ok(self.repo.insert_project(project)?)
    }

    pub fn fetch_all_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Loads the full aggregate, failing when the id is unknown.
    pub fn fetch_project_by_id(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ServiceError::ProjectNotFound(project_id))
    }

    /// Overwrites all mutable attributes of an existing project.
    pub fn modify_project_details(&self, project: &Project) -> ServiceResult<()> {
        let project_id = project
            .project_id
            .ok_or(RepoError::Validation(ProjectValidationError::MissingId))?;
        validate_difficulty(project.difficulty)?;
        if !self.repo.update_project(project)? {
            return Err(ServiceError::ProjectNotFound(project_id));
        }
        Ok(())
    }

    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if !self.repo.delete_project(project_id)? {
            return Err(ServiceError::ProjectNotFound(project_id));
        }
        Ok(())
    }

    pub fn add_material(&self, material: &Material) -> ServiceResult<Material> {
        Ok(self.repo.insert_material(material)?)
    }

    pub fn add_step(&self, step: &Step) -> ServiceResult<Step> {
        Ok(self.repo.insert_step(step)?)
    }

    /// Links a category to a project, creating the category when it has no id.
    ///
    /// A new category is only kept when the link succeeds.
    pub fn assign_category(
        &self,
        project_id: ProjectId,
        category: &Category,
    ) -> ServiceResult<Category> {
        match category.category_id {
            Some(category_id) => {
                self.repo.link_category(project_id, category_id)?;
                Ok(category.clone())
            }
            None => Ok(self.repo.insert_and_link_category(project_id, category)?),
        }
    }

    pub fn fetch_all_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.fetch_all_categories()?)
    }
}
