use super::blocking_queries;
use super::schema::AccessToken;
use crate::Result;
use deadpool_sqlite::Pool;

pub async fn insert(user_id: i64, secret: impl Into<String>, pool: &Pool) -> Result<AccessToken> {
    let secret = secret.into();
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::insert(user_id, &secret, conn))
        .await?
}

pub async fn delete_by_secret(secret: impl Into<String>, pool: &Pool) -> Result<usize> {
    let secret = secret.into();
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::delete_by_secret(&secret, conn))
        .await?
}
