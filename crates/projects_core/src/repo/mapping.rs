//! Field tables and parameter lists for the persisted entities.
//!
//! # Responsibility
//! - Declare, once per entity, which attributes map to which columns.
//! - Declare the write-side bindings in the fixed order used by the SQL.
//!
//! # Invariants
//! - Attribute names are the camelCase form of their column names.
//! - Binding order matches the column order of the matching INSERT.

use crate::db::{Binding, ExtractedRow, ExtractionError, Field, FieldType, RowShape};
use crate::model::project::{Category, Material, Project, Step};

impl RowShape for Project {
    const FIELDS: &'static [Field] = &[
        Field::required("projectId", FieldType::Integer),
        Field::required("projectName", FieldType::Text),
        Field::nullable("estimatedHours", FieldType::Decimal),
        Field::nullable("actualHours", FieldType::Decimal),
        Field::nullable("difficulty", FieldType::Integer),
        Field::nullable("notes", FieldType::Text),
    ];

    fn build(row: &ExtractedRow) -> Result<Self, ExtractionError> {
        Ok(Self {
            project_id: Some(row.integer("projectId")?),
            project_name: row.text("projectName")?,
            estimated_hours: row.optional_decimal("estimatedHours")?,
            actual_hours: row.optional_decimal("actualHours")?,
            difficulty: row.optional_integer("difficulty")?,
            notes: row.optional_text("notes")?,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        })
    }
}

impl RowShape for Material {
    const FIELDS: &'static [Field] = &[
        Field::required("materialId", FieldType::Integer),
        Field::required("projectId", FieldType::Integer),
        Field::required("name", FieldType::Text),
        Field::nullable("cost", FieldType::Decimal),
        Field::nullable("numRequired", FieldType::Integer),
    ];

    fn build(row: &ExtractedRow) -> Result<Self, ExtractionError> {
        Ok(Self {
            material_id: Some(row.integer("materialId")?),
            project_id: row.integer("projectId")?,
            name: row.text("name")?,
            cost: row.optional_decimal("cost")?,
            num_required: row.optional_integer("numRequired")?,
        })
    }
}

impl RowShape for Step {
    const FIELDS: &'static [Field] = &[
        Field::required("stepId", FieldType::Integer),
        Field::required("projectId", FieldType::Integer),
        Field::required("stepText", FieldType::Text),
        Field::required("stepOrder", FieldType::Integer),
    ];

    fn build(row: &ExtractedRow) -> Result<Self, ExtractionError> {
        Ok(Self {
            step_id: Some(row.integer("stepId")?),
            project_id: row.integer("projectId")?,
            step_text: row.text("stepText")?,
            step_order: row.integer("stepOrder")?,
        })
    }
}

impl RowShape for Category {
    const FIELDS: &'static [Field] = &[
        Field::required("categoryId", FieldType::Integer),
        Field::required("categoryName", FieldType::Text),
    ];

    fn build(row: &ExtractedRow) -> Result<Self, ExtractionError> {
        Ok(Self {
            category_id: Some(row.integer("categoryId")?),
            category_name: row.text("categoryName")?,
        })
    }
}

/// `project_name, estimated_hours, actual_hours, difficulty, notes`.
pub(crate) fn project_bindings(project: &Project) -> Vec<Binding> {
    vec![
        Binding::text(Some(project.project_name.as_str())),
        Binding::decimal(project.estimated_hours),
        Binding::decimal(project.actual_hours),
        Binding::integer(project.difficulty),
        Binding::text(project.notes.as_deref()),
    ]
}

/// `project_id, name, cost, num_required`.
pub(crate) fn material_bindings(material: &Material) -> Vec<Binding> {
    vec![
        Binding::integer(Some(material.project_id)),
        Binding::text(Some(material.name.as_str())),
        Binding::decimal(material.cost),
        Binding::integer(material.num_required),
    ]
}

/// `project_id, step_text, step_order`.
pub(crate) fn step_bindings(step: &Step) -> Vec<Binding> {
    vec![
        Binding::integer(Some(step.project_id)),
        Binding::text(Some(step.step_text.as_str())),
        Binding::integer(Some(step.step_order)),
    ]
}

/// `category_name`.
pub(crate) fn category_bindings(category: &Category) -> Vec<Binding> {
    vec![Binding::text(Some(category.category_name.as_str()))]
}

#[cfg(test)]
mod tests {
    use super::project_bindings;
    use crate::db::{columns_for, ParamType, ParamValue};
    use crate::model::decimal::Decimal;
    use crate::model::project::{Category, Material, Project, Step};

    #[test]
    fn columns_follow_schema_names() {
        assert_eq!(
            columns_for::<Project>(),
            vec![
                "project_id",
                "project_name",
                "estimated_hours",
                "actual_hours",
                "difficulty",
                "notes"
            ]
        );
        assert_eq!(
            columns_for::<Material>(),
            vec!["material_id", "project_id", "name", "cost", "num_required"]
        );
        assert_eq!(
            columns_for::<Step>(),
            vec!["step_id", "project_id", "step_text", "step_order"]
        );
        assert_eq!(
            columns_for::<Category>(),
            vec!["category_id", "category_name"]
        );
    }

    #[test]
    fn project_bindings_keep_fixed_order_and_nulls() {
        let mut project = Project::new("Build shed");
        project.estimated_hours = Some(Decimal::from_hundredths(1000));
        project.difficulty = Some(3);

        let bindings = project_bindings(&project);
        let declared: Vec<_> = bindings.iter().map(|b| b.declared).collect();
        assert_eq!(
            declared,
            vec![
                ParamType::Text,
                ParamType::Decimal,
                ParamType::Decimal,
                ParamType::Integer,
                ParamType::Text
            ]
        );
        assert_eq!(bindings[0].value, ParamValue::Text("Build shed".to_string()));
        assert_eq!(bindings[2].value, ParamValue::Null);
        assert_eq!(bindings[3].value, ParamValue::Integer(3));
        assert_eq!(bindings[4].value, ParamValue::Null);
    }
}
