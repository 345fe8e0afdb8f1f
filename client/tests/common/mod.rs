//! FILENAME: client/tests/common/mod.rs

use client::{ApiError, CollectionApi};
use engine::Record;
use serde_json::Value;
use std::sync::Mutex;

/// How the fake collection should fail, when asked to.
#[derive(Debug, Clone)]
pub enum Failure {
    Auth,
    Rejected(u16, String),
}

/// In-memory stand-in for the HTTP collection. Behaves like the real
/// server: assigns ids on create, merges updates, honors the list limit.
pub struct MemoryApi {
    rows: Mutex<Vec<Record>>,
    next_id: Mutex<i64>,
    fail: Mutex<Option<Failure>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        MemoryApi {
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            fail: Mutex::new(None),
        }
    }

    pub fn with_rows(rows: Vec<Record>) -> Self {
        let next = rows
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;
        MemoryApi {
            rows: Mutex::new(rows),
            next_id: Mutex::new(next),
            fail: Mutex::new(None),
        }
    }

    /// Makes every subsequent call fail until `clear_failure`.
    pub fn set_failure(&self, failure: Failure) {
        *self.fail.lock().unwrap() = Some(failure);
    }

    pub fn clear_failure(&self) {
        *self.fail.lock().unwrap() = None;
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match self.fail.lock().unwrap().clone() {
            Some(Failure::Auth) => Err(ApiError::Auth("token rejected".to_string())),
            Some(Failure::Rejected(status, message)) => {
                Err(ApiError::Rejected { status, message })
            }
            None => Ok(()),
        }
    }
}

impl CollectionApi for MemoryApi {
    async fn list(&self, _endpoint: &str, limit: usize) -> Result<Vec<Record>, ApiError> {
        self.check_failure()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().take(limit).cloned().collect())
    }

    async fn create(&self, _endpoint: &str, payload: &Record) -> Result<Option<Record>, ApiError> {
        self.check_failure()?;
        let mut next_id = self.next_id.lock().unwrap();
        let mut record = payload.clone();
        record.insert("id".to_string(), Value::from(*next_id));
        *next_id += 1;
        self.rows.lock().unwrap().push(record.clone());
        Ok(Some(record))
    }

    async fn update(
        &self,
        _endpoint: &str,
        id: i64,
        payload: &Record,
    ) -> Result<Option<Record>, ApiError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
            .ok_or(ApiError::Rejected {
                status: 404,
                message: "Not Found".to_string(),
            })?;
        for (key, value) in payload {
            row.insert(key.clone(), value.clone());
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, _endpoint: &str, id: i64) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.get("id").and_then(Value::as_i64) != Some(id));
        if rows.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                message: "Not Found".to_string(),
            });
        }
        Ok(())
    }
}

pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}
