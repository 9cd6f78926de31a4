#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
    use uuid::Uuid;

    use quill_core::domain::{NewPost, PostUpdate};
    use quill_core::error::DomainError;
    use quill_core::ports::{CategoryRepository, PostRepository, ProfileRepository};

    use crate::database::entity::{category, post, profile};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresPostRepository, PostgresProfileRepository,
    };

    fn post_row(author_id: Uuid, slug: &str, published: bool, age_hours: i64) -> post::Model {
        let at = Utc::now() - TimeDelta::hours(age_hours);
        post::Model {
            id: Uuid::new_v4(),
            title: format!("Post {slug}"),
            slug: slug.to_owned(),
            content: "Body".to_owned(),
            excerpt: None,
            featured_image: None,
            published,
            author_id,
            created_at: at.into(),
            updated_at: at.into(),
        }
    }

    fn profile_row(id: Uuid, name: &str) -> profile::Model {
        let now = Utc::now();
        profile::Model {
            id,
            email: format!("{name}@example.com"),
            full_name: Some(name.to_owned()),
            avatar_url: None,
            password_hash: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn draft(slug: &str) -> NewPost {
        NewPost {
            title: "Hello".to_owned(),
            slug: slug.to_owned(),
            content: "World".to_owned(),
            excerpt: None,
            featured_image: None,
            published: false,
        }
    }

    fn changes(slug: &str, published: bool) -> PostUpdate {
        PostUpdate {
            title: "Hello".to_owned(),
            slug: slug.to_owned(),
            content: "World".to_owned(),
            excerpt: None,
            featured_image: None,
            published,
        }
    }

    #[tokio::test]
    async fn test_list_published_attaches_authors_from_one_batch() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            post_row(alice, "first", true, 1),
            post_row(bob, "second", true, 2),
            post_row(alice, "third", true, 3),
        ];

        // Exactly one profiles result is appended: a per-post author
        // lookup would exhaust the mock and lose authors.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![rows])
            .append_query_results(vec![vec![
                profile_row(alice, "Alice"),
                profile_row(bob, "Bob"),
            ]])
            .into_connection();

        let listed = PostgresPostRepository::new(db).list_published().await;

        assert_eq!(listed.len(), 3);
        assert_eq!(
            listed[0].author.as_ref().unwrap().full_name.as_deref(),
            Some("Alice")
        );
        assert_eq!(
            listed[1].author.as_ref().unwrap().full_name.as_deref(),
            Some("Bob")
        );
        assert_eq!(listed[2].author.as_ref().unwrap().id, alice);
        assert_eq!(listed[0].post.slug, "first");
    }

    #[tokio::test]
    async fn test_list_published_missing_profile_degrades_to_anonymous() {
        let (alice, ghost) = (Uuid::new_v4(), Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                post_row(alice, "kept", true, 1),
                post_row(ghost, "orphaned", true, 2),
            ]])
            .append_query_results(vec![vec![profile_row(alice, "Alice")]])
            .into_connection();

        let listed = PostgresPostRepository::new(db).list_published().await;

        assert_eq!(listed.len(), 2);
        assert!(listed[0].author.is_some());
        assert!(listed[1].author.is_none());
    }

    #[tokio::test]
    async fn test_list_published_collapses_store_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
                "connection refused".to_owned(),
            ))])
            .into_connection();

        let listed = PostgresPostRepository::new(db).list_published().await;

        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_slug_returns_published_match() {
        let alice = Uuid::new_v4();
        let row = post_row(alice, "hello", true, 1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .append_query_results(vec![vec![profile_row(alice, "Alice")]])
            .into_connection();

        let found = PostgresPostRepository::new(db)
            .get_by_slug("hello")
            .await
            .unwrap();

        assert_eq!(found.post.id, row.id);
        assert_eq!(found.author.unwrap().id, alice);
    }

    #[tokio::test]
    async fn test_get_by_slug_absent_resolves_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        assert!(
            PostgresPostRepository::new(db)
                .get_by_slug("nope")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_get_by_slug_collision_resolves_none() {
        let author = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                post_row(author, "dup", true, 1),
                post_row(author, "dup", true, 2),
            ]])
            .into_connection();

        assert!(
            PostgresPostRepository::new(db)
                .get_by_slug("dup")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_get_by_slug_missing_author_degrades() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_row(Uuid::new_v4(), "hello", true, 1)]])
            .append_query_results(vec![Vec::<profile::Model>::new()])
            .into_connection();

        let found = PostgresPostRepository::new(db)
            .get_by_slug("hello")
            .await
            .unwrap();

        assert!(found.author.is_none());
    }

    #[tokio::test]
    async fn test_list_by_author_includes_drafts() {
        let alice = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                post_row(alice, "published", true, 1),
                post_row(alice, "draft", false, 2),
            ]])
            .into_connection();

        let listed = PostgresPostRepository::new(db).list_by_author(alice).await;

        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|p| !p.published));
        assert!(listed.iter().all(|p| p.author_id == alice));
    }

    #[tokio::test]
    async fn test_find_by_id_returns_post() {
        let row = post_row(Uuid::new_v4(), "hello", false, 1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .into_connection();

        let found = PostgresPostRepository::new(db).find_by_id(row.id).await;

        assert_eq!(found.unwrap().slug, "hello");
    }

    #[tokio::test]
    async fn test_create_validates_before_touching_store() {
        // No results are appended: any store call would fail the test
        // with a store error instead of the expected validation error.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let mut fields = draft("hello");
        fields.title = String::new();

        let err = PostgresPostRepository::new(db)
            .create(Uuid::new_v4(), fields)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_returns_inserted_post() {
        let alice = Uuid::new_v4();
        let inserted = post_row(alice, "hello", false, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![inserted.clone()]])
            .into_connection();

        let created = PostgresPostRepository::new(db)
            .create(alice, draft("hello"))
            .await
            .unwrap();

        assert_eq!(created.slug, "hello");
        assert_eq!(created.author_id, alice);
    }

    #[tokio::test]
    async fn test_create_maps_unique_violation_to_duplicate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"posts_slug_key\"".to_owned(),
            ))])
            .into_connection();

        let err = PostgresPostRepository::new(db)
            .create(Uuid::new_v4(), draft("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_non_author() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let row = post_row(owner, "hello", false, 1);

        // Only the ownership fetch is answered; an attempted UPDATE would
        // surface as a store error, not the expected Unauthorized.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .into_connection();

        let err = PostgresPostRepository::new(db)
            .update(row.id, intruder, changes("hello", true))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn test_update_applies_changes_for_owner() {
        let owner = Uuid::new_v4();
        let row = post_row(owner, "hello", false, 1);
        let mut updated = row.clone();
        updated.published = true;
        updated.updated_at = Utc::now().into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .append_query_results(vec![vec![updated]])
            .into_connection();

        let result = PostgresPostRepository::new(db)
            .update(row.id, owner, changes("hello", true))
            .await
            .unwrap();

        assert!(result.published);
        assert_eq!(result.id, row.id);
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let err = PostgresPostRepository::new(db)
            .update(Uuid::new_v4(), Uuid::new_v4(), changes("hello", true))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { entity: "post", .. }));
    }

    #[tokio::test]
    async fn test_delete_rejects_non_author() {
        let owner = Uuid::new_v4();
        let row = post_row(owner, "hello", true, 1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .into_connection();

        let err = PostgresPostRepository::new(db)
            .delete(row.id, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn test_delete_removes_owned_post() {
        let owner = Uuid::new_v4();
        let row = post_row(owner, "hello", true, 1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert!(
            PostgresPostRepository::new(db)
                .delete(row.id, owner)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_profile_find_by_email_collapses_store_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
                "connection refused".to_owned(),
            ))])
            .into_connection();

        assert!(
            PostgresProfileRepository::new(db)
                .find_by_email("alice@example.com")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_profile_create_maps_duplicate_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"profiles_email_key\"".to_owned(),
            ))])
            .into_connection();

        let profile =
            quill_core::domain::Profile::new("alice@example.com".to_owned(), None, "hash".into());
        let err = PostgresProfileRepository::new(db)
            .create(profile)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_categories_for_post() {
        let now = Utc::now();
        let rows = vec![
            category::Model {
                id: Uuid::new_v4(),
                name: "Design".to_owned(),
                slug: "design".to_owned(),
                description: None,
                created_at: now.into(),
            },
            category::Model {
                id: Uuid::new_v4(),
                name: "Rust".to_owned(),
                slug: "rust".to_owned(),
                description: Some("Systems".to_owned()),
                created_at: now.into(),
            },
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![rows])
            .into_connection();

        let categories = PostgresCategoryRepository::new(db)
            .for_post(Uuid::new_v4())
            .await;

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Design");
    }

    #[tokio::test]
    async fn test_categories_list_collapses_store_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
                "connection refused".to_owned(),
            ))])
            .into_connection();

        assert!(PostgresCategoryRepository::new(db).list().await.is_empty());
    }
}
