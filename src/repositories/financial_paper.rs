use diesel::prelude::*;

use crate::models::{FinancialPaper, NewFinancialPaper, UpdateFinancialPaper};
use crate::repositories::PgPoolConn;
use crate::schema::financial_papers::dsl::*;

pub fn create(
    conn: &mut PgPoolConn,
    new_paper: &NewFinancialPaper,
) -> Result<FinancialPaper, diesel::result::Error> {
    diesel::insert_into(financial_papers)
        .values(new_paper)
        .get_result(conn)
}

pub fn find_by_id(conn: &mut PgPoolConn, paper_id: i32) -> Result<FinancialPaper, diesel::result::Error> {
    financial_papers.find(paper_id).first(conn)
}

/// 最新上传的排在前面
pub fn list_all(conn: &mut PgPoolConn) -> Result<Vec<FinancialPaper>, diesel::result::Error> {
    financial_papers
        .order((uploaded_at.desc(), id.desc()))
        .load(conn)
}

pub fn update_by_id(
    conn: &mut PgPoolConn,
    paper_id: i32,
    update_data: &UpdateFinancialPaper,
) -> Result<FinancialPaper, diesel::result::Error> {
    diesel::update(financial_papers.find(paper_id))
        .set(update_data)
        .get_result(conn)
}

/// 删除记录并返回它，便于调用方清理磁盘上的文件
pub fn delete_by_id(
    conn: &mut PgPoolConn,
    paper_id: i32,
) -> Result<Option<FinancialPaper>, diesel::result::Error> {
    diesel::delete(financial_papers.find(paper_id))
        .get_result(conn)
        .optional()
}
