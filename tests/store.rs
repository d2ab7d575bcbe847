use employee_manager::{EmployeeDraft, EmployeeStore, Salary, Statement};
use tempfile::TempDir;

fn insert(store: &EmployeeStore, name: &str, title: &str, salary: &str) {
    let rows = store
        .run(&Statement::Insert(EmployeeDraft::from_input(name, title, salary)))
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn insert_assigns_increasing_ids() {
    let store = EmployeeStore::open_in_memory().unwrap();
    insert(&store, "Ana", "Clerk", "1000");
    insert(&store, "Beto", "Clerk", "1200");

    let rows = store.fetch_all().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].id < rows[1].id);
    assert_eq!(rows[0].name, "Ana");
    assert_eq!(rows[1].salary, Salary::Amount(1200.0));
}

#[test]
fn deleted_ids_are_not_reused() {
    let store = EmployeeStore::open_in_memory().unwrap();
    insert(&store, "Ana", "Clerk", "1000");
    let first = store.fetch_all().unwrap()[0].id;

    store.run(&Statement::Delete { id: first }).unwrap();
    insert(&store, "Beto", "Clerk", "1200");

    let rows = store.fetch_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].id, first);
}

#[test]
fn update_rewrites_attributes_but_keeps_id() {
    let store = EmployeeStore::open_in_memory().unwrap();
    insert(&store, "Ana", "Clerk", "1000");
    let id = store.fetch_all().unwrap()[0].id;

    store
        .run(&Statement::Update {
            id,
            draft: EmployeeDraft::from_input("Ana Maria", "Manager", "2500.5"),
        })
        .unwrap();

    let rows = store.fetch_all().unwrap();
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].name, "Ana Maria");
    assert_eq!(rows[0].title, "Manager");
    assert_eq!(rows[0].salary.amount(), Some(2500.5));
}

#[test]
fn missing_rows_are_reported_on_update_and_delete() {
    let store = EmployeeStore::open_in_memory().unwrap();

    let err = store.run(&Statement::Delete { id: 99 }).unwrap_err();
    assert_eq!(err.to_string(), "Employee 99 not found.");

    let err = store
        .run(&Statement::Update {
            id: 99,
            draft: EmployeeDraft::from_input("x", "y", "1"),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Employee 99 not found.");
}

#[test]
fn search_matches_substrings_with_like_semantics() {
    let store = EmployeeStore::open_in_memory().unwrap();
    insert(&store, "Ana", "Clerk", "1000");
    insert(&store, "Beto", "Clerk", "1200");
    insert(&store, "Juan", "Driver", "900");

    let names: Vec<String> = store
        .search_by_name("an")
        .unwrap()
        .into_iter()
        .map(|employee| employee.name)
        .collect();
    assert_eq!(names, vec!["Ana", "Juan"]);

    assert!(store.search_by_name("zzz").unwrap().is_empty());
}

#[test]
fn non_numeric_salary_survives_as_text() {
    let store = EmployeeStore::open_in_memory().unwrap();
    insert(&store, "Ana", "Clerk", "");
    insert(&store, "Beto", "Clerk", "negotiable");

    let rows = store.fetch_all().unwrap();
    assert_eq!(rows[0].salary, Salary::Text(String::new()));
    assert_eq!(rows[1].salary, Salary::Text("negotiable".into()));
}

#[test]
fn schema_creation_is_idempotent_and_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("employees.db");

    {
        let store = EmployeeStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        insert(&store, "Ana", "Clerk", "1000");
    }

    let store = EmployeeStore::open(&path).unwrap();
    let rows = store.fetch_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Ana");
    assert_eq!(rows[0].salary.to_string(), "1000.00");
}
