use crate::models::FinancialPaper;

/// 固定的建议文本，分析接口不做真正的内容分析
pub const RECOMMENDATIONS: [&str; 3] = [
    "Cross-check the paper's conclusions against recent stock daily prices.",
    "Review the keywords for sectors or factors worth back-testing.",
    "Full-text analysis is not available yet; read the attached PDF for details.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperAnalysis {
    pub paper_id: i32,
    pub title: String,
    pub title_word_count: usize,
    pub abstract_word_count: usize,
    pub abstract_char_count: usize,
    pub keywords: Vec<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// 按中英文逗号、分号拆分关键词
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split([',', '，', ';', '；'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn analyze(paper: &FinancialPaper) -> PaperAnalysis {
    let abstract_text = paper.abstract_text.as_deref().unwrap_or("");
    let keywords = paper
        .keywords
        .as_deref()
        .map(split_keywords)
        .unwrap_or_default();

    let title_word_count = paper.title.split_whitespace().count();
    let abstract_word_count = abstract_text.split_whitespace().count();
    let abstract_char_count = abstract_text.trim().chars().count();

    let author = if paper.author.trim().is_empty() {
        "an unknown author"
    } else {
        paper.author.trim()
    };
    let summary = format!(
        "\"{}\" by {} has {} keyword(s) and a {}-word abstract.",
        paper.title.trim(),
        author,
        keywords.len(),
        abstract_word_count
    );

    PaperAnalysis {
        paper_id: paper.id,
        title: paper.title.clone(),
        title_word_count,
        abstract_word_count,
        abstract_char_count,
        keywords,
        summary,
        recommendations: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
    }
}
