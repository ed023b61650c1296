//! Project aggregate and its child entities.
//!
//! # Responsibility
//! - Define the Project root entity and the Material/Step/Category children.
//! - Provide write-path validation shared by repository and service layers.
//!
//! # Invariants
//! - `project_id` is `None` only before the store assigns it on insert.
//! - Child collections are populated only by an explicit aggregate fetch.
//! - Categories are shared reference data; a Project links them, never owns them.

use crate::model::decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned integer identifier.
pub type ProjectId = i64;

/// Root entity of the projects hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    /// 1..=5 at the input layer; storage accepts any integer.
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Material needed by exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub material_id: Option<i64>,
    pub project_id: ProjectId,
    pub name: String,
    pub cost: Option<Decimal>,
    pub num_required: Option<i32>,
}

/// Ordered instruction belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_id: Option<i64>,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i32,
}

/// Shared label linked to projects through `project_category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: Option<i64>,
    pub category_name: String,
}

/// Write-path validation failures for project data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// The operation needs a stored identifier.
    MissingId,
    EmptyName,
    NegativeHours {
        field: &'static str,
        value: Decimal,
    },
    EmptyMaterialName,
    EmptyStepText,
    EmptyCategoryName,
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "project has no identifier"),
            Self::EmptyName => write!(f, "project name must not be empty"),
            Self::NegativeHours { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::EmptyMaterialName => write!(f, "material name must not be empty"),
            Self::EmptyStepText => write!(f, "step text must not be empty"),
            Self::EmptyCategoryName => write!(f, "category name must not be empty"),
        }
    }
}

impl Error for ProjectValidationError {}

impl Project {
    /// Creates an unsaved project with only a name.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Validates attributes that every persisted project must satisfy.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.project_name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        for (field, hours) in [
            ("estimated hours", self.estimated_hours),
            ("actual hours", self.actual_hours),
        ] {
            if let Some(value) = hours.filter(|value| value.is_negative()) {
                return Err(ProjectValidationError::NegativeHours { field, value });
            }
        }
        Ok(())
    }
}

impl Material {
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyMaterialName);
        }
        Ok(())
    }
}

impl Step {
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.step_text.trim().is_empty() {
            return Err(ProjectValidationError::EmptyStepText);
        }
        Ok(())
    }
}

impl Category {
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            category_id: None,
            category_name: category_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.category_name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyCategoryName);
        }
        Ok(())
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.project_id {
            Some(id) => write!(f, "{id} : {}", self.project_name),
            None => write!(f, "(unsaved) : {}", self.project_name),
        }
    }
}
