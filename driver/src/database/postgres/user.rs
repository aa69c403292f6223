use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::clock::BEIJING_OFFSET;
use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    AvatarUrl, CreatedAt, Department, Email, NickName, OpenId, PhoneNumber, UpdatedAt, User,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_open_id(
        &self,
        con: &mut PostgresTransaction,
        open_id: &OpenId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_open_id(con, open_id).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn register(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<User, KernelError> {
        PgUserInternal::register(con, user).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::update(con, user).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    open_id: String,
    nick_name: Option<String>,
    avatar_url: Option<String>,
    phone_number: Option<String>,
    department: Option<String>,
    email: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User::new(
            OpenId::new(value.open_id),
            value.nick_name.map(NickName::new),
            value.avatar_url.map(AvatarUrl::new),
            value.phone_number.map(PhoneNumber::new),
            value.department.map(Department::new),
            value.email.map(Email::new),
            CreatedAt::new(value.created_at.to_offset(BEIJING_OFFSET)),
            UpdatedAt::new(value.updated_at.to_offset(BEIJING_OFFSET)),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_open_id(
        con: &mut PgConnection,
        open_id: &OpenId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT open_id, nick_name, avatar_url, phone_number, department, email, created_at, updated_at
            FROM users
            WHERE open_id = $1
            "#,
        )
        .bind(open_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn register(con: &mut PgConnection, user: &User) -> error_stack::Result<User, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            INSERT INTO users (open_id, nick_name, avatar_url, phone_number, department, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (open_id) DO UPDATE
            SET phone_number = COALESCE(EXCLUDED.phone_number, users.phone_number),
                updated_at   = CASE
                                   WHEN EXCLUDED.phone_number IS NULL THEN users.updated_at
                                   ELSE EXCLUDED.updated_at
                               END
            RETURNING open_id, nick_name, avatar_url, phone_number, department, email, created_at, updated_at
            "#,
        )
        .bind(user.open_id().as_ref())
        .bind(user.nick_name().clone().map(String::from))
        .bind(user.avatar_url().clone().map(String::from))
        .bind(user.phone_number().clone().map(String::from))
        .bind(user.department().clone().map(String::from))
        .bind(user.email().clone().map(String::from))
        .bind(user.created_at().as_ref())
        .bind(user.updated_at().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(User::from(row))
    }

    async fn update(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE users
            SET nick_name = $2, avatar_url = $3, phone_number = $4, department = $5, email = $6, updated_at = $7
            WHERE open_id = $1
            "#,
        )
        .bind(user.open_id().as_ref())
        .bind(user.nick_name().clone().map(String::from))
        .bind(user.avatar_url().clone().map(String::from))
        .bind(user.phone_number().clone().map(String::from))
        .bind(user.department().clone().map(String::from))
        .bind(user.email().clone().map(String::from))
        .bind(user.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::UserQuery;
    use kernel::interface::update::UserModifier;
    use kernel::prelude::entity::{CreatedAt, NickName, OpenId, PhoneNumber, UpdatedAt, User};
    use kernel::KernelError;

    use crate::database::postgres::{PostgresDatabase, PostgresUserRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;
        let open_id = OpenId::new(format!("user-{}", uuid::Uuid::new_v4()));

        let user = User::new(
            open_id.clone(),
            None,
            None,
            Some(PhoneNumber::new("13800000000")),
            None,
            None,
            CreatedAt::new(datetime!(2024-03-01 09:00 +8)),
            UpdatedAt::new(datetime!(2024-03-01 09:00 +8)),
        );
        let registered = PostgresUserRepository.register(&mut con, &user).await?;
        assert_eq!(registered, user);
        let found = PostgresUserRepository
            .find_by_open_id(&mut con, &open_id)
            .await?;
        assert_eq!(found, Some(user.clone()));

        let mut user = user;
        user.substitute(|user| {
            *user.nick_name = Some(NickName::new("reader"));
            *user.updated_at = UpdatedAt::new(datetime!(2024-03-02 09:00 +8));
        });
        PostgresUserRepository.update(&mut con, &user).await?;
        let found = PostgresUserRepository
            .find_by_open_id(&mut con, &open_id)
            .await?;
        assert_eq!(found, Some(user.clone()));

        let again = User::new(
            open_id.clone(),
            None,
            None,
            None,
            None,
            None,
            CreatedAt::new(datetime!(2024-03-03 09:00 +8)),
            UpdatedAt::new(datetime!(2024-03-03 09:00 +8)),
        );
        let registered = PostgresUserRepository.register(&mut con, &again).await?;
        assert_eq!(registered, user);

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn concurrent_first_registrations() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let open_id = OpenId::new(format!("user-{}", uuid::Uuid::new_v4()));
        let user = |phone: Option<&str>| {
            User::new(
                open_id.clone(),
                None,
                None,
                phone.map(PhoneNumber::new),
                None,
                None,
                CreatedAt::new(datetime!(2024-03-01 09:00 +8)),
                UpdatedAt::new(datetime!(2024-03-01 09:00 +8)),
            )
        };

        let mut first = db.transact().await?;
        PostgresUserRepository
            .register(&mut first, &user(Some("13800000000")))
            .await?;

        // Blocks on the uncommitted row until `first` commits.
        let second = {
            let db = db.clone();
            let user = user(None);
            tokio::spawn(async move {
                let mut con = db.transact().await?;
                let stored = PostgresUserRepository.register(&mut con, &user).await?;
                con.commit().await?;
                Ok::<_, error_stack::Report<KernelError>>(stored)
            })
        };
        first.commit().await?;
        let stored = second.await.expect("registration task panicked")?;
        assert_eq!(
            stored.phone_number().clone().map(String::from).as_deref(),
            Some("13800000000")
        );
        Ok(())
    }
}
