use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// 论文文件存放在 media_root 下的子目录
pub const PAPER_DIR: &str = "papers";

const MAX_FILE_NAME_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum PaperStorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid stored path: {0}")]
    InvalidPath(String),
}

/// 扩展名为 .pdf（不区分大小写）
pub fn is_pdf_file_name(name: &str) -> bool {
    Path::new(name.trim())
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// 去掉客户端路径，只保留安全字符；结果始终以 .pdf 结尾
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "paper.pdf".to_string();
    }
    // 过长时保留末尾，扩展名不丢
    let len = cleaned.chars().count();
    let mut out: String = if len > MAX_FILE_NAME_CHARS {
        cleaned.chars().skip(len - MAX_FILE_NAME_CHARS).collect()
    } else {
        cleaned.to_string()
    };
    if !is_pdf_file_name(&out) {
        out.push_str(".pdf");
    }
    out
}

/// 写入 `<media_root>/papers/<uuid>_<name>`，返回相对 media_root 的路径
pub async fn save_pdf(
    media_root: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, PaperStorageError> {
    let dir = media_root.join(PAPER_DIR);
    tokio::fs::create_dir_all(&dir).await?;

    let stored_name = format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(original_name)
    );
    tokio::fs::write(dir.join(&stored_name), bytes).await?;

    Ok(format!("{}/{}", PAPER_DIR, stored_name))
}

fn resolve(media_root: &Path, relative: &str) -> Result<PathBuf, PaperStorageError> {
    let rel = Path::new(relative);
    let safe = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !safe || relative.is_empty() {
        return Err(PaperStorageError::InvalidPath(relative.to_string()));
    }
    Ok(media_root.join(rel))
}

/// 删除已存储的文件，文件不存在视为成功
pub async fn remove_stored(media_root: &Path, relative: &str) -> Result<(), PaperStorageError> {
    let path = resolve(media_root, relative)?;
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
