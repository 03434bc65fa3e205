use crate::domain::table::Row;
use serde::{Deserialize, Serialize};

/// Rows nested under `data`, as returned by the wrapped fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub data: Vec<Row>,
}
