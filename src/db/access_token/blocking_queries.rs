use super::schema::{self, AccessToken, Columns};
use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};

pub fn insert(user_id: i64, secret: &str, conn: &Connection) -> Result<AccessToken> {
    let sql = format!(
        r#"
            INSERT INTO {table} ({user_id}, {secret})
            VALUES (?1, ?2)
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        user_id = Columns::UserId.as_str(),
        secret = Columns::Secret.as_str(),
        projection = AccessToken::projection(),
    );
    conn.query_row(&sql, params![user_id, secret], AccessToken::mapper())
        .map_err(Into::into)
}

pub fn select_by_secret(secret: &str, conn: &Connection) -> Result<Option<AccessToken>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {secret} = ?1
        "#,
        projection = AccessToken::projection(),
        table = schema::TABLE_NAME,
        secret = Columns::Secret.as_str(),
    );
    conn.query_row(&sql, params![secret], AccessToken::mapper())
        .optional()
        .map_err(Into::into)
}

pub fn delete_by_secret(secret: &str, conn: &Connection) -> Result<usize> {
    let sql = format!(
        r#"
            DELETE FROM {table}
            WHERE {secret} = ?1
        "#,
        table = schema::TABLE_NAME,
        secret = Columns::Secret.as_str(),
    );
    conn.execute(&sql, params![secret]).map_err(Into::into)
}

#[cfg(test)]
mod test {
    use crate::db::test::conn;
    use crate::db::user;
    use crate::Result;

    #[test]
    fn insert_and_select() -> Result<()> {
        let conn = conn();
        let user = user::blocking_queries::insert("citizen", "hash", &conn)?;
        let token = super::insert(user.id, "secret", &conn)?;
        assert_eq!(user.id, token.user_id);
        assert_eq!(Some(token), super::select_by_secret("secret", &conn)?);
        assert_eq!(None, super::select_by_secret("other", &conn)?);
        Ok(())
    }

    #[test]
    fn delete_by_secret() -> Result<()> {
        let conn = conn();
        let user = user::blocking_queries::insert("citizen", "hash", &conn)?;
        super::insert(user.id, "secret", &conn)?;
        assert_eq!(1, super::delete_by_secret("secret", &conn)?);
        assert_eq!(None, super::select_by_secret("secret", &conn)?);
        assert_eq!(0, super::delete_by_secret("secret", &conn)?);
        Ok(())
    }
}
