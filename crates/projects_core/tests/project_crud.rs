use projects_core::{
    ConnectionProvider, Decimal, Project, ProjectRepository, ProjectService,
    ProjectValidationError, RepoError, ServiceError, SqliteProjectRepository, StoreConfig,
};

fn store() -> (tempfile::TempDir, SqliteProjectRepository) {
    let dir = tempfile::tempdir().unwrap();
    let provider = ConnectionProvider::new(StoreConfig::new(dir.path(), "projects").unwrap());
    provider.initialize().unwrap();
    (dir, SqliteProjectRepository::new(provider))
}

fn decimal(text: &str) -> Decimal {
    text.parse().unwrap()
}

fn build_shed() -> Project {
    Project {
        estimated_hours: Some(decimal("10.00")),
        actual_hours: Some(decimal("0.00")),
        difficulty: Some(3),
        notes: Some("none".to_string()),
        ..Project::new("Build shed")
    }
}

#[test]
fn insert_then_fetch_returns_identical_project_with_empty_children() {
    let (_dir, repo) = store();

    let inserted = repo.insert_project(&build_shed()).unwrap();
    let project_id = inserted.project_id.unwrap();
    assert!(project_id > 0);

    let fetched = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(fetched, inserted);
    assert_eq!(fetched.project_name, "Build shed");
    assert_eq!(fetched.estimated_hours.unwrap().to_string(), "10.00");
    assert_eq!(fetched.actual_hours.unwrap().to_string(), "0.00");
    assert_eq!(fetched.difficulty, Some(3));
    assert_eq!(fetched.notes.as_deref(), Some("none"));
    assert!(fetched.materials.is_empty());
    assert!(fetched.steps.is_empty());
    assert!(fetched.categories.is_empty());
}

#[test]
fn fractional_hours_and_nulls_round_trip() {
    let (_dir, repo) = store();

    let project = Project {
        estimated_hours: Some(decimal("12.75")),
        actual_hours: None,
        difficulty: None,
        notes: None,
        ..Project::new("Paint fence")
    };
    let inserted = repo.insert_project(&project).unwrap();

    let fetched = repo
        .fetch_project_by_id(inserted.project_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(fetched.estimated_hours, Some(decimal("12.75")));
    assert_eq!(fetched.actual_hours, None);
    assert_eq!(fetched.difficulty, None);
    assert_eq!(fetched.notes, None);
}

#[test]
fn fetch_all_on_empty_store_is_empty() {
    let (_dir, repo) = store();
    assert!(repo.fetch_all_projects().unwrap().is_empty());
}

#[test]
fn fetch_all_returns_every_project_by_ascending_id() {
    let (_dir, repo) = store();

    let names = ["Deck", "Birdhouse", "Arbor", "Workbench"];
    for name in names {
        repo.insert_project(&Project::new(name)).unwrap();
    }

    let projects = repo.fetch_all_projects().unwrap();
    assert_eq!(projects.len(), names.len());
    let ids: Vec<_> = projects.iter().map(|p| p.project_id.unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    let fetched_names: Vec<_> = projects.iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(fetched_names, names);
}

#[test]
fn fetch_by_unknown_id_is_none() {
    let (_dir, repo) = store();
    assert!(repo.fetch_project_by_id(404).unwrap().is_none());
}

#[test]
fn update_overwrites_all_attributes() {
    let (_dir, repo) = store();
    let mut project = repo.insert_project(&build_shed()).unwrap();

    project.project_name = "Build bigger shed".to_string();
    project.estimated_hours = Some(decimal("20.5"));
    project.actual_hours = Some(decimal("3.25"));
    project.difficulty = Some(5);
    project.notes = None;
    assert!(repo.update_project(&project).unwrap());

    let fetched = repo
        .fetch_project_by_id(project.project_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(fetched, project);
}

#[test]
fn update_unknown_id_returns_false_and_changes_nothing() {
    let (_dir, repo) = store();
    let existing = repo.insert_project(&build_shed()).unwrap();

    let ghost = Project {
        project_id: Some(existing.project_id.unwrap() + 100),
        ..Project::new("Ghost")
    };
    assert!(!repo.update_project(&ghost).unwrap());

    let all = repo.fetch_all_projects().unwrap();
    assert_eq!(all, vec![existing]);
}

#[test]
fn update_without_id_is_a_validation_error() {
    let (_dir, repo) = store();
    let err = repo.update_project(&build_shed()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ProjectValidationError::MissingId)
    ));
}

#[test]
fn delete_existing_then_fetch_is_none() {
    let (_dir, repo) = store();
    let project_id = repo
        .insert_project(&build_shed())
        .unwrap()
        .project_id
        .unwrap();

    assert!(repo.delete_project(project_id).unwrap());
    assert!(repo.fetch_project_by_id(project_id).unwrap().is_none());
    assert!(!repo.delete_project(project_id).unwrap());
}

#[test]
fn delete_unknown_id_returns_false() {
    let (_dir, repo) = store();
    assert!(!repo.delete_project(7).unwrap());
}

#[test]
fn invalid_projects_are_rejected_before_persistence() {
    let (_dir, repo) = store();

    let blank = Project::new("   ");
    assert!(matches!(
        repo.insert_project(&blank).unwrap_err(),
        RepoError::Validation(ProjectValidationError::EmptyName)
    ));

    let negative = Project {
        actual_hours: Some(decimal("-1")),
        ..Project::new("Negative")
    };
    assert!(matches!(
        repo.insert_project(&negative).unwrap_err(),
        RepoError::Validation(ProjectValidationError::NegativeHours { .. })
    ));

    assert!(repo.fetch_all_projects().unwrap().is_empty());
}

#[test]
fn service_reports_missing_projects_and_bad_difficulty() {
    let (_dir, repo) = store();
    let service = ProjectService::new(repo);

    let too_hard = Project {
        difficulty: Some(6),
        ..Project::new("Cathedral")
    };
    assert!(matches!(
        service.add_project(&too_hard).unwrap_err(),
        ServiceError::InvalidDifficulty(6)
    ));

    let created = service.add_project(&build_shed()).unwrap();
    let project_id = created.project_id.unwrap();
    assert_eq!(service.fetch_project_by_id(project_id).unwrap(), created);

    assert!(matches!(
        service.fetch_project_by_id(project_id + 1).unwrap_err(),
        ServiceError::ProjectNotFound(id) if id == project_id + 1
    ));

    let ghost = Project {
        project_id: Some(project_id + 1),
        ..Project::new("Ghost")
    };
    assert!(matches!(
        service.modify_project_details(&ghost).unwrap_err(),
        ServiceError::ProjectNotFound(_)
    ));

    service.delete_project(project_id).unwrap();
    assert!(matches!(
        service.delete_project(project_id).unwrap_err(),
        ServiceError::ProjectNotFound(_)
    ));
    assert!(service.fetch_all_projects().unwrap().is_empty());
}
