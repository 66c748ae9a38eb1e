use serde::{Deserialize, Serialize};

/// CSV 导入响应，errors 最多 5 条
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportCsvResponse {
    pub message: String,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}
