use super::blocking_queries;
use super::schema::Light;
#[cfg(test)]
use super::schema::NewLight;
use crate::Result;
use deadpool_sqlite::Pool;

#[cfg(test)]
pub async fn upsert(light: NewLight, pool: &Pool) -> Result<Light> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::upsert(&light, conn))
        .await?
}

pub async fn select_all(pool: &Pool) -> Result<Vec<Light>> {
    pool.get()
        .await?
        .interact(|conn| blocking_queries::select_all(conn))
        .await?
}

pub async fn select_by_id(id: i64, pool: &Pool) -> Result<Light> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_id(id, conn))
        .await?
}
