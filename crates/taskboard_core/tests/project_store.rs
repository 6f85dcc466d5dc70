use chrono::NaiveDate;
use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    EntityId, KeyValueStore, MemoryKeyValueStore, Project, ProjectStore, Section,
    SqliteKeyValueStore, StoreError, StoreResult, Task, PROJECTS_KEY,
};

/// Medium that rejects every write, like a full browser storage quota.
struct ReadOnlyStore {
    inner: MemoryKeyValueStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove_item(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.inner.keys_with_prefix(prefix)
    }
}

fn sample_projects() -> Vec<Project> {
    let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let mut task = Task::new("Draft outline");
    task.priority = Some("high".to_string());
    task.labels = vec!["writing".to_string()];
    vec![
        Project::new("Book", day).with_section(Section::new("Todo").with_task(task)),
        Project::new("Garden", day),
    ]
}

#[test]
fn saved_projects_list_back_in_order() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteKeyValueStore::try_new(&conn).unwrap();
    let memory = MemoryKeyValueStore::new();
    let projects = sample_projects();

    for store in [
        ProjectStore::new(&sqlite as &dyn KeyValueStore),
        ProjectStore::new(&memory as &dyn KeyValueStore),
    ] {
        store.save(&projects);
        assert_eq!(store.list(), projects);
    }
}

#[test]
fn missing_document_lists_empty() {
    let memory = MemoryKeyValueStore::new();
    let store = ProjectStore::new(&memory);

    assert!(store.list().is_empty());
    assert!(store.try_list().unwrap().is_empty());
}

#[test]
fn malformed_document_lists_empty() {
    let memory = MemoryKeyValueStore::new();
    memory.set_item(PROJECTS_KEY, "{not json").unwrap();
    let store = ProjectStore::new(&memory);

    assert!(store.list().is_empty());
    assert!(matches!(store.try_list(), Err(StoreError::Corrupt(_))));
}

#[test]
fn legacy_snapshot_gets_stable_ids() {
    let memory = MemoryKeyValueStore::new();
    memory
        .set_item(
            PROJECTS_KEY,
            r#"[{"id":1716000000000,"name":"Old","date":"2024-05-18T09:30:00.000Z",
                "sessions":[{"id":1716000000001,"name":"Todo","tasks":[
                    "plain title",
                    {"id":1716000000002.5,"title":"full task","dueDate":"","labels":["a"]}
                ]}]}]"#,
        )
        .unwrap();
    let store = ProjectStore::new(&memory);

    let first = store.list();
    let second = store.list();
    assert_eq!(first, second);

    let project = &first[0];
    assert_eq!(project.id, EntityId::from_legacy_integer(1716000000000));
    assert_eq!(project.date, NaiveDate::from_ymd_opt(2024, 5, 18).unwrap());
    let tasks = &project.sessions[0].tasks;
    assert_eq!(tasks[0].title, "plain title");
    assert_eq!(tasks[1].id, EntityId::from_legacy_float(1716000000002.5));
    assert_eq!(tasks[1].due_date, None);
}

#[test]
fn save_failure_is_swallowed() {
    let store = ReadOnlyStore {
        inner: MemoryKeyValueStore::new(),
    };
    let projects = ProjectStore::new(&store);

    projects.save(&sample_projects());
    assert!(projects.list().is_empty());
    assert!(matches!(
        projects.try_save(&sample_projects()),
        Err(StoreError::Unavailable(_))
    ));
}
