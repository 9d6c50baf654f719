use crate::db;
use crate::db::user::schema::Role;
use crate::{Error, Result};
use rusqlite::Connection;
use tracing::info;

pub fn run(args: &[String], conn: Connection) -> Result<()> {
    let first_arg = match args.first() {
        Some(some) => some,
        None => Err(Error::Cli("No DB actions passed".into()))?,
    };

    match first_arg.as_str() {
        // Migrations are applied on every start
        "migrate" => {}
        "grant-admin" => grant_admin(args.get(1), &conn)?,
        _ => Err(Error::Cli(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

fn grant_admin(name: Option<&String>, conn: &Connection) -> Result<()> {
    let Some(name) = name else {
        return Err(Error::Cli("Usage: db grant-admin <user-name>".into()));
    };
    let user = db::user::blocking_queries::select_by_name(name, conn)?
        .ok_or_else(|| Error::Cli(format!("User {name} doesn't exist")))?;
    let mut roles = user.roles.clone();
    if !roles.contains(&Role::Admin) {
        roles.push(Role::Admin);
    }
    let user = db::user::blocking_queries::set_roles(user.id, &roles, conn)?;
    info!(user_id = user.id, user_name = user.name, "Granted admin role");
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::db;
    use crate::db::test::conn;
    use crate::{Error, Result};

    #[test]
    fn grant_admin() -> Result<()> {
        let conn = conn();
        let user = db::user::blocking_queries::insert("operator", "hash", &conn)?;
        assert!(!user.is_admin());
        super::grant_admin(Some(&"operator".to_string()), &conn)?;
        super::grant_admin(Some(&"operator".to_string()), &conn)?;
        let user = db::user::blocking_queries::select_by_id(user.id, &conn)?;
        assert!(user.is_admin());
        assert_eq!(2, user.roles.len());
        Ok(())
    }

    #[test]
    fn unknown_action() {
        assert!(matches!(
            super::run(&["drop".into()], conn()),
            Err(Error::Cli(_))
        ));
        assert!(matches!(super::run(&[], conn()), Err(Error::Cli(_))));
        assert!(matches!(
            super::run(&["grant-admin".into(), "ghost".into()], conn()),
            Err(Error::Cli(_))
        ));
    }
}
