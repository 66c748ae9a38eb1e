use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::financial_papers;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = financial_papers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FinancialPaper {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub pdf_file: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = financial_papers)]
pub struct NewFinancialPaper {
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub pdf_file: String,
}

/// Metadata-only changes; the stored file is never replaced in place.
#[derive(AsChangeset, Debug, Default, Clone)]
#[diesel(table_name = financial_papers)]
pub struct UpdateFinancialPaper {
    pub title: Option<String>,
    pub author: Option<String>,
    pub abstract_text: Option<Option<String>>,
    pub keywords: Option<Option<String>>,
}
