use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::api_models::financial_paper::{
    FinancialPaperResponse, PaperAnalysisResponse, UpdateFinancialPaperRequest,
};
use crate::app::AppState;
use crate::handler::error::{map_db_err, multipart_err, pool_err, AppError};
use crate::models::{FinancialPaper, NewFinancialPaper, UpdateFinancialPaper};
use crate::repositories::financial_paper;
use crate::services::paper_analysis::{self, PaperAnalysis};
use crate::services::paper_storage::{self, PaperStorageError};

const TITLE_MAX_CHARS: usize = 255;
const AUTHOR_MAX_CHARS: usize = 100;

impl From<FinancialPaper> for FinancialPaperResponse {
    fn from(p: FinancialPaper) -> Self {
        Self {
            id: p.id,
            title: p.title,
            author: p.author,
            abstract_text: p.abstract_text,
            keywords: p.keywords,
            pdf_file: p.pdf_file,
            uploaded_at: p.uploaded_at,
        }
    }
}

impl From<PaperAnalysis> for PaperAnalysisResponse {
    fn from(a: PaperAnalysis) -> Self {
        Self {
            paper_id: a.paper_id,
            title: a.title,
            title_word_count: a.title_word_count,
            abstract_word_count: a.abstract_word_count,
            abstract_char_count: a.abstract_char_count,
            keyword_count: a.keywords.len(),
            keywords: a.keywords,
            summary: a.summary,
            recommendations: a.recommendations,
        }
    }
}

fn storage_err(err: PaperStorageError) -> AppError {
    tracing::error!("paper storage error: {}", err);
    AppError::InternalServerError
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::BadRequest(format!(
            "title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(title.to_string())
}

fn check_author(raw: &str) -> Result<String, AppError> {
    let author = raw.trim();
    if author.chars().count() > AUTHOR_MAX_CHARS {
        return Err(AppError::BadRequest(format!(
            "author must be at most {} characters",
            AUTHOR_MAX_CHARS
        )));
    }
    Ok(author.to_string())
}

/// upload_pdf 的 multipart 表单
#[derive(Debug, Default)]
struct PaperUploadForm {
    title: Option<String>,
    author: Option<String>,
    abstract_text: Option<String>,
    keywords: Option<String>,
    /// (客户端文件名, 内容)
    pdf_file: Option<(String, Bytes)>,
}

#[derive(Debug)]
struct ValidPaperUpload {
    title: String,
    author: String,
    abstract_text: Option<String>,
    keywords: Option<String>,
    file_name: String,
    bytes: Bytes,
}

impl PaperUploadForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = Some(field.text().await.map_err(multipart_err)?),
                "author" => form.author = Some(field.text().await.map_err(multipart_err)?),
                "abstract" => form.abstract_text = Some(field.text().await.map_err(multipart_err)?),
                "keywords" => form.keywords = Some(field.text().await.map_err(multipart_err)?),
                "pdf_file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await.map_err(multipart_err)?;
                    form.pdf_file = Some((file_name, data));
                }
                other => tracing::debug!("ignoring multipart field {}", other),
            }
        }
        Ok(form)
    }

    /// 标题、文件必填，只接受 .pdf
    fn validate(self) -> Result<ValidPaperUpload, AppError> {
        let title = check_title(self.title.as_deref().unwrap_or_default())?;
        let author = check_author(self.author.as_deref().unwrap_or_default())?;

        let (file_name, bytes) = match self.pdf_file {
            Some((name, data)) if !name.trim().is_empty() => (name, data),
            _ => return Err(AppError::BadRequest("pdf_file is required".to_string())),
        };
        if !paper_storage::is_pdf_file_name(&file_name) {
            return Err(AppError::BadRequest(format!(
                "only PDF files are accepted, got '{}'",
                file_name
            )));
        }
        if bytes.is_empty() {
            return Err(AppError::BadRequest("pdf_file is empty".to_string()));
        }

        Ok(ValidPaperUpload {
            title,
            author,
            abstract_text: non_blank(self.abstract_text),
            keywords: non_blank(self.keywords),
            file_name,
            bytes,
        })
    }
}

fn insert_paper(state: &AppState, new_paper: &NewFinancialPaper) -> Result<FinancialPaper, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    financial_paper::create(&mut conn, new_paper).map_err(map_db_err)
}

/// 论文列表，最新上传在前
pub async fn list_papers(
    State(state): State<AppState>,
) -> Result<Json<Vec<FinancialPaperResponse>>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let items = financial_paper::list_all(&mut conn).map_err(map_db_err)?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// 上传 PDF 论文
///
/// 校验全部通过后才写文件；入库失败时删除已写入的文件。
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FinancialPaperResponse>), AppError> {
    let upload = PaperUploadForm::read(&mut multipart).await?.validate()?;
    let media_root = state.config.media_root.as_path();

    let stored = paper_storage::save_pdf(media_root, &upload.file_name, &upload.bytes)
        .await
        .map_err(storage_err)?;
    tracing::info!(
        "Stored paper {} ({} bytes) at {}",
        upload.file_name,
        upload.bytes.len(),
        stored
    );

    let new_paper = NewFinancialPaper {
        title: upload.title,
        author: upload.author,
        abstract_text: upload.abstract_text,
        keywords: upload.keywords,
        pdf_file: stored.clone(),
    };

    match insert_paper(&state, &new_paper) {
        Ok(created) => Ok((StatusCode::CREATED, Json(created.into()))),
        Err(e) => {
            if let Err(rm) = paper_storage::remove_stored(media_root, &stored).await {
                tracing::warn!("Failed to remove orphaned file {}: {}", stored, rm);
            }
            Err(e)
        }
    }
}

pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FinancialPaperResponse>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let found = financial_paper::find_by_id(&mut conn, id).map_err(map_db_err)?;
    Ok(Json(found.into()))
}

pub async fn patch_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateFinancialPaperRequest>,
) -> Result<Json<FinancialPaperResponse>, AppError> {
    // 空串表示清空 abstract / keywords
    let clearable = |v: Option<String>| v.map(|s| non_blank(Some(s)));
    let update_data = UpdateFinancialPaper {
        title: payload.title.as_deref().map(check_title).transpose()?,
        author: payload.author.as_deref().map(check_author).transpose()?,
        abstract_text: clearable(payload.abstract_text),
        keywords: clearable(payload.keywords),
    };

    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let unchanged = update_data.title.is_none()
        && update_data.author.is_none()
        && update_data.abstract_text.is_none()
        && update_data.keywords.is_none();
    let paper = if unchanged {
        financial_paper::find_by_id(&mut conn, id)
    } else {
        financial_paper::update_by_id(&mut conn, id, &update_data)
    }
    .map_err(map_db_err)?;
    Ok(Json(paper.into()))
}

/// 删除记录，文件删除失败只记日志
pub async fn delete_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let deleted = {
        let mut conn = state.db_pool.get().map_err(pool_err)?;
        financial_paper::delete_by_id(&mut conn, id).map_err(map_db_err)?
    };
    let paper = deleted.ok_or(AppError::NotFound)?;

    if let Err(e) = paper_storage::remove_stored(&state.config.media_root, &paper.pdf_file).await {
        tracing::warn!("Failed to remove file {} of paper {}: {}", paper.pdf_file, id, e);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// 对论文文本字段做简单统计，不落库
pub async fn analyze_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PaperAnalysisResponse>, AppError> {
    let mut conn = state.db_pool.get().map_err(pool_err)?;
    let paper = financial_paper::find_by_id(&mut conn, id).map_err(map_db_err)?;
    Ok(Json(paper_analysis::analyze(&paper).into()))
}
