use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub message: &'static str,
    pub updated: u64,
}
