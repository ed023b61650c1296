use projects_core::{
    Category, ConnectionProvider, Material, Project, ProjectRepository, ProjectService, RepoError,
    ServiceError, SqliteProjectRepository, Step, StoreConfig,
};
use rusqlite::Connection;

fn store() -> (tempfile::TempDir, ConnectionProvider) {
    let dir = tempfile::tempdir().unwrap();
    let provider = ConnectionProvider::new(StoreConfig::new(dir.path(), "projects").unwrap());
    provider.initialize().unwrap();
    (dir, provider)
}

fn material(project_id: i64, name: &str, cost: &str, num_required: i32) -> Material {
    Material {
        material_id: None,
        project_id,
        name: name.to_string(),
        cost: Some(cost.parse().unwrap()),
        num_required: Some(num_required),
    }
}

fn step(project_id: i64, step_text: &str, step_order: i32) -> Step {
    Step {
        step_id: None,
        project_id,
        step_text: step_text.to_string(),
        step_order,
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn aggregate_fetch_returns_exactly_the_linked_children() {
    let (_dir, provider) = store();
    let repo = SqliteProjectRepository::new(provider);

    let shed = repo.insert_project(&Project::new("Build shed")).unwrap();
    let other = repo.insert_project(&Project::new("Other")).unwrap();
    let shed_id = shed.project_id.unwrap();
    let other_id = other.project_id.unwrap();

    let boards = repo
        .insert_material(&material(shed_id, "2x4 boards", "4.25", 20))
        .unwrap();
    let screws = repo
        .insert_material(&material(shed_id, "screws", "0.10", 200))
        .unwrap();
    repo.insert_material(&material(other_id, "paint", "25", 1))
        .unwrap();
    let frame = repo.insert_step(&step(shed_id, "Build the frame", 1)).unwrap();

    let mut linked = Vec::new();
    for name in ["Outdoor", "Woodwork", "Storage"] {
        let category = repo.insert_category(&Category::new(name)).unwrap();
        repo.link_category(shed_id, category.category_id.unwrap())
            .unwrap();
        linked.push(category);
    }
    let unrelated = repo.insert_category(&Category::new("Indoor")).unwrap();
    repo.link_category(other_id, unrelated.category_id.unwrap())
        .unwrap();

    let fetched = repo.fetch_project_by_id(shed_id).unwrap().unwrap();
    assert_eq!(fetched.materials, vec![boards, screws]);
    assert_eq!(fetched.steps, vec![frame]);
    assert_eq!(fetched.categories, linked);
    assert_eq!(
        fetched.materials[0].cost.unwrap().to_string(),
        "4.25"
    );

    let listed = repo.fetch_all_projects().unwrap();
    assert!(listed.iter().all(|project| project.materials.is_empty()
        && project.steps.is_empty()
        && project.categories.is_empty()));
}

#[test]
fn steps_are_returned_by_step_order() {
    let (_dir, provider) = store();
    let repo = SqliteProjectRepository::new(provider);
    let project_id = repo
        .insert_project(&Project::new("Birdhouse"))
        .unwrap()
        .project_id
        .unwrap();

    repo.insert_step(&step(project_id, "Paint", 3)).unwrap();
    repo.insert_step(&step(project_id, "Cut panels", 1)).unwrap();
    repo.insert_step(&step(project_id, "Assemble", 2)).unwrap();

    let fetched = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    let texts: Vec<_> = fetched.steps.iter().map(|s| s.step_text.as_str()).collect();
    assert_eq!(texts, ["Cut panels", "Assemble", "Paint"]);
}

#[test]
fn delete_cascades_children_but_keeps_categories() {
    let (_dir, provider) = store();
    let repo = SqliteProjectRepository::new(provider.clone());

    let project_id = repo
        .insert_project(&Project::new("Build shed"))
        .unwrap()
        .project_id
        .unwrap();
    repo.insert_material(&material(project_id, "boards", "4.25", 20))
        .unwrap();
    repo.insert_step(&step(project_id, "Frame", 1)).unwrap();
    let category = repo.insert_category(&Category::new("Outdoor")).unwrap();
    repo.link_category(project_id, category.category_id.unwrap())
        .unwrap();

    assert!(repo.delete_project(project_id).unwrap());

    let conn = provider.acquire().unwrap();
    assert_eq!(count(&conn, "material"), 0);
    assert_eq!(count(&conn, "step"), 0);
    assert_eq!(count(&conn, "project_category"), 0);
    assert_eq!(repo.fetch_all_categories().unwrap(), vec![category]);
}

#[test]
fn children_of_unknown_project_are_rejected() {
    let (_dir, provider) = store();
    let repo = SqliteProjectRepository::new(provider.clone());

    let err = repo
        .insert_material(&material(99, "boards", "1.00", 1))
        .unwrap_err();
    assert!(matches!(err, RepoError::Persistence { operation: "insert_material", .. }));

    let category = repo.insert_category(&Category::new("Outdoor")).unwrap();
    let err = repo
        .link_category(99, category.category_id.unwrap())
        .unwrap_err();
    assert!(matches!(err, RepoError::Persistence { operation: "link_category", .. }));

    let conn = provider.acquire().unwrap();
    assert_eq!(count(&conn, "material"), 0);
    assert_eq!(count(&conn, "project_category"), 0);
}

#[test]
fn duplicate_category_names_and_links_are_rejected() {
    let (_dir, provider) = store();
    let repo = SqliteProjectRepository::new(provider);
    let project_id = repo
        .insert_project(&Project::new("Deck"))
        .unwrap()
        .project_id
        .unwrap();

    let outdoor = repo.insert_category(&Category::new("Outdoor")).unwrap();
    assert!(matches!(
        repo.insert_category(&Category::new("Outdoor")).unwrap_err(),
        RepoError::Persistence { .. }
    ));

    let category_id = outdoor.category_id.unwrap();
    repo.link_category(project_id, category_id).unwrap();
    assert!(matches!(
        repo.link_category(project_id, category_id).unwrap_err(),
        RepoError::Persistence { .. }
    ));

    let fetched = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(fetched.categories, vec![outdoor]);
}

#[test]
fn service_assigns_new_and_existing_categories() {
    let (_dir, provider) = store();
    let service = ProjectService::new(SqliteProjectRepository::new(provider));

    let first = service.add_project(&Project::new("Deck")).unwrap();
    let second = service.add_project(&Project::new("Fence")).unwrap();
    let first_id = first.project_id.unwrap();
    let second_id = second.project_id.unwrap();

    let outdoor = service
        .assign_category(first_id, &Category::new("Outdoor"))
        .unwrap();
    assert!(outdoor.category_id.is_some());
    let reused = service.assign_category(second_id, &outdoor).unwrap();
    assert_eq!(reused, outdoor);

    assert_eq!(service.fetch_all_categories().unwrap(), vec![outdoor.clone()]);
    for project_id in [first_id, second_id] {
        let fetched = service.fetch_project_by_id(project_id).unwrap();
        assert_eq!(fetched.categories, vec![outdoor.clone()]);
    }

    service
        .add_material(&material(first_id, "planks", "3.50", 40))
        .unwrap();
    service.add_step(&step(first_id, "Lay joists", 1)).unwrap();
    let deck = service.fetch_project_by_id(first_id).unwrap();
    assert_eq!(deck.materials.len(), 1);
    assert_eq!(deck.steps.len(), 1);

    assert!(matches!(
        service.fetch_project_by_id(second_id + 10).unwrap_err(),
        ServiceError::ProjectNotFound(_)
    ));
}

#[test]
fn assigning_new_category_to_missing_project_keeps_nothing() {
    let (_dir, provider) = store();
    let service = ProjectService::new(SqliteProjectRepository::new(provider));

    let err = service
        .assign_category(999, &Category::new("Outdoor"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::Persistence { .. })));
    assert!(service.fetch_all_categories().unwrap().is_empty());

    // The same name is still free for a real project.
    let project_id = service
        .add_project(&Project::new("Deck"))
        .unwrap()
        .project_id
        .unwrap();
    let outdoor = service
        .assign_category(project_id, &Category::new("Outdoor"))
        .unwrap();
    assert_eq!(service.fetch_all_categories().unwrap(), vec![outdoor]);
}

#[test]
fn blank_child_entities_fail_validation() {
    let (_dir, provider) = store();
    let repo = SqliteProjectRepository::new(provider);

    assert!(matches!(
        repo.insert_material(&material(1, " ", "1.00", 1)).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        repo.insert_step(&step(1, "", 1)).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert!(matches!(
        repo.insert_category(&Category::new("")).unwrap_err(),
        RepoError::Validation(_)
    ));
}
