use super::blocking_queries;
use super::schema::User;
#[cfg(test)]
use super::schema::Role;
use crate::Result;
use deadpool_sqlite::Pool;

pub async fn insert(
    name: impl Into<String>,
    password: impl Into<String>,
    pool: &Pool,
) -> Result<User> {
    let name = name.into();
    let password = password.into();
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::insert(&name, &password, conn))
        .await?
}

pub async fn select_by_name(name: impl Into<String>, pool: &Pool) -> Result<Option<User>> {
    let name = name.into();
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_name(&name, conn))
        .await?
}

#[cfg(test)]
pub async fn set_roles(id: i64, roles: Vec<Role>, pool: &Pool) -> Result<User> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::set_roles(id, &roles, conn))
        .await?
}
