pub mod blog;
pub mod comment;
pub mod user;

use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

/// Fresh document id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Adds `id` to a back-reference list unless it is already there
pub fn push_id(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

/// Removes every occurrence of `id` from a back-reference list
pub fn pull_id(ids: &mut Vec<String>, id: &str) {
    ids.retain(|existing| existing != id);
}
