use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 只允许修改文本元数据；abstract/keywords 传空串表示清空
#[derive(Debug, Deserialize, Default)]
pub struct UpdateFinancialPaperRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinancialPaperResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub pdf_file: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaperAnalysisResponse {
    pub paper_id: i32,
    pub title: String,
    pub title_word_count: usize,
    pub abstract_word_count: usize,
    pub abstract_char_count: usize,
    pub keyword_count: usize,
    pub keywords: Vec<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
}
