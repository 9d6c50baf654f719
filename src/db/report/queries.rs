use super::blocking_queries;
#[cfg(test)]
use super::schema::NewReport;
use super::schema::Report;
use crate::Result;
use deadpool_sqlite::Pool;

#[cfg(test)]
pub async fn insert(report: NewReport, pool: &Pool) -> Result<Report> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::insert(&report, conn))
        .await?
}

pub async fn select_by_id(id: i64, pool: &Pool) -> Result<Report> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_id(id, conn))
        .await?
}

pub async fn select_by_user_id(user_id: i64, pool: &Pool) -> Result<Vec<Report>> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_user_id(user_id, conn))
        .await?
}
