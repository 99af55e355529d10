//! In-memory backend shared by the integration tests.
#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use serde_json::Value;
use sis_client::{ClientError, ObjectStore, RecordWriter, RemoteCollection};
use sis_model::{College, Entity, NewStudent, PageQuery, SearchEnvelope, SortDirection, Student};

/// Request counters, one per operation.
#[derive(Debug, Default)]
pub struct Counters {
    pub searches: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub uploads: AtomicUsize,
    pub removes: AtomicUsize,
}

impl Counters {
    pub fn writes(&self) -> usize {
        self.creates.load(AtomicOrdering::SeqCst)
            + self.updates.load(AtomicOrdering::SeqCst)
            + self.deletes.load(AtomicOrdering::SeqCst)
    }
}

/// Backend holding rows of one entity, sorted by the requested column and
/// then by key ascending.
#[derive(Debug)]
pub struct FakeBackend<E> {
    rows: Mutex<Vec<E>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pub counters: Counters,
    search_delay: Option<Duration>,
    write_delay: Option<Duration>,
    fail_searches: AtomicBool,
    rejection: Mutex<Option<String>>,
}

impl<E: Entity> FakeBackend<E> {
    pub fn new(rows: Vec<E>) -> Self {
        Self {
            rows: Mutex::new(rows),
            objects: Mutex::new(HashMap::new()),
            counters: Counters::default(),
            search_delay: None,
            write_delay: None,
            fail_searches: AtomicBool::new(false),
            rejection: Mutex::new(None),
        }
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, AtomicOrdering::SeqCst);
    }

    /// Answer the next write with `{success: false, message}`.
    pub fn reject_next_write(&self, message: &str) {
        *self.rejection.lock().expect("rejection lock") = Some(message.to_string());
    }

    pub fn rows(&self) -> Vec<E> {
        self.rows.lock().expect("rows lock").clone()
    }

    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .expect("objects lock")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn put_object(&self, key: &str) {
        self.objects
            .lock()
            .expect("objects lock")
            .insert(key.to_string(), vec![0]);
    }

    pub fn searches(&self) -> usize {
        self.counters.searches.load(AtomicOrdering::SeqCst)
    }

    async fn write_step(&self) -> sis_client::Result<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        match self.rejection.lock().expect("rejection lock").take() {
            Some(message) => Err(ClientError::Rejected { message }),
            None => Ok(()),
        }
    }
}

fn matches_search<E: Entity>(row: &E, term: Option<&str>) -> bool {
    let Some(term) = term else {
        return true;
    };
    let term = term.to_lowercase();
    row.cells()
        .iter()
        .any(|cell| cell.to_lowercase().contains(&term))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.to_lowercase().cmp(&b.to_lowercase()),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn compare_rows<E: Entity>(a: &E, b: &E, column: &str, direction: SortDirection) -> Ordering {
    let left = serde_json::to_value(a).expect("row serializes");
    let right = serde_json::to_value(b).expect("row serializes");
    let primary = compare_values(left.get(column), right.get(column));
    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.key().cmp(b.key()))
}

impl<E: Entity> RemoteCollection<E> for FakeBackend<E> {
    async fn search(&self, query: &PageQuery) -> sis_client::Result<SearchEnvelope<E>> {
        self.counters.searches.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_searches.load(AtomicOrdering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        let mut matching: Vec<E> = self
            .rows()
            .into_iter()
            .filter(|row| matches_search(row, query.search_term()))
            .collect();
        matching.sort_by(|a, b| compare_rows(a, b, &query.sort_column, query.sort_direction));
        let total_count = matching.len();
        let rows = matching
            .into_iter()
            .skip(query.offset())
            .take(query.page_size)
            .collect();
        Ok(SearchEnvelope { rows, total_count })
    }
}

impl<E: Entity> RecordWriter<E> for FakeBackend<E> {
    async fn create(&self, payload: &E::Create) -> sis_client::Result<String> {
        self.counters.creates.fetch_add(1, AtomicOrdering::SeqCst);
        self.write_step().await?;
        let row: E = serde_json::from_value(serde_json::to_value(payload)?)?;
        self.rows.lock().expect("rows lock").push(row);
        Ok(format!("{} added successfully.", E::DISPLAY_NAME))
    }

    async fn update(&self, payload: &E::Update) -> sis_client::Result<String> {
        self.counters.updates.fetch_add(1, AtomicOrdering::SeqCst);
        self.write_step().await?;
        let Value::Object(changes) = serde_json::to_value(payload)? else {
            return Err(ClientError::Decode("update payload is not an object".to_string()));
        };
        let key = changes
            .get(E::KEY_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut rows = self.rows.lock().expect("rows lock");
        let Some(position) = rows.iter().position(|row| row.key() == key) else {
            return Err(ClientError::Rejected {
                message: format!("{} not found.", E::DISPLAY_NAME),
            });
        };
        let mut merged = serde_json::to_value(&rows[position])?;
        for (field, value) in changes {
            if value.is_null() {
                continue;
            }
            let field = match field.strip_prefix("new_") {
                // Rows carry the stored image under its create-side name.
                Some("image_path") => "profile_image_path".to_string(),
                Some(stripped) => stripped.to_string(),
                None => field,
            };
            merged[field.as_str()] = value;
        }
        rows[position] = serde_json::from_value(merged)?;
        Ok(format!("{} updated successfully.", E::DISPLAY_NAME))
    }

    async fn delete(&self, key: &E::Key) -> sis_client::Result<String> {
        self.counters.deletes.fetch_add(1, AtomicOrdering::SeqCst);
        self.write_step().await?;
        let key = key.to_string();
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|row| row.key() != key);
        if rows.len() == before {
            return Err(ClientError::Rejected {
                message: format!("{} not found.", E::DISPLAY_NAME),
            });
        }
        Ok(format!("{} deleted successfully.", E::DISPLAY_NAME))
    }
}

impl<E: Entity> ObjectStore for FakeBackend<E> {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> sis_client::Result<String> {
        self.counters.uploads.fetch_add(1, AtomicOrdering::SeqCst);
        self.objects
            .lock()
            .expect("objects lock")
            .insert(key.to_string(), bytes);
        Ok(key.to_string())
    }

    async fn remove(&self, key: &str) -> sis_client::Result<()> {
        self.counters.removes.fetch_add(1, AtomicOrdering::SeqCst);
        self.objects.lock().expect("objects lock").remove(key);
        Ok(())
    }
}

/// `count` colleges `C001`, `C002`, ... named "College N".
pub fn colleges(count: usize) -> Vec<College> {
    (1..=count)
        .map(|n| College {
            college_code: format!("C{n:03}"),
            college_name: format!("College {n}"),
        })
        .collect()
}

/// A valid student create payload.
pub fn new_student(id_number: &str) -> NewStudent {
    NewStudent {
        id_number: id_number.to_string(),
        first_name: "Juan".to_string(),
        middle_name: String::new(),
        last_name: "Dela Cruz".to_string(),
        gender: "Male".to_string(),
        year_level: Some(2),
        program_code: "BSCS".to_string(),
        image_path: None,
    }
}

/// Students created from [`new_student`] payloads.
pub fn students(ids: &[&str]) -> Vec<Student> {
    ids.iter()
        .map(|id| {
            let payload = serde_json::to_value(new_student(id)).expect("payload serializes");
            serde_json::from_value(payload).expect("student parses")
        })
        .collect()
}
