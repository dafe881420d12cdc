//! Integration tests for the catalog service
//!
//! These tests drive the resolver engine against an in-memory store:
//! - Authorization runs before validation, validation before persistence
//! - Filters, derived counts and author reuse
//! - Account creation and login
//! - Live notification of added books

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use futures::StreamExt;
use serde_json::json;
use tokio::time::timeout;

use bookshelf::services::{ErrorKind, NewUser, Principal};
use common::{PASSWORD, catalog, catalog_with_db, login_as, new_book};

// ============================================================================
// Adding books
// ============================================================================

mod add_book {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_short_titles_are_rejected_and_nothing_is_stored() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        for title in ["", "D", "Du"] {
            let err = catalog
                .add_book(Some(&principal), new_book(title, "Frank Herbert", &["sci-fi"]))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            assert_eq!(err.message(), "Book title too short");
        }

        assert_eq!(catalog.book_count().await.unwrap(), 0);
        assert_eq!(catalog.author_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_genres_fail_before_the_author_is_created() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        let err = catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &[]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.message(), "Books require at least 1 genre");
        assert_eq!(catalog.author_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_short_author_name_is_rejected() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        let err = catalog
            .add_book(Some(&principal), new_book("Dune", "FH", &["sci-fi"]))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Author name too short");
        assert_eq!(
            err.diagnostics().get("field"),
            Some(&json!("author"))
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_add_is_rejected_before_validation() {
        let catalog = catalog().await;

        // invalid input too, but authorization wins
        let err = catalog
            .add_book(None, new_book("D", "FH", &[]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert_eq!(err.message(), "not authenticated");
        assert_eq!(catalog.book_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_existing_author_is_reused() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        let dune = catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap();
        let messiah = catalog
            .add_book(
                Some(&principal),
                new_book("Dune Messiah", "Frank Herbert", &["sci-fi"]),
            )
            .await
            .unwrap();

        assert_eq!(dune.author.id, messiah.author.id);
        assert_eq!(catalog.author_count().await.unwrap(), 1);
        assert_eq!(catalog.book_count().await.unwrap(), 2);
        assert_eq!(catalog.author_book_count(&dune.author.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rejected_book_insert_is_a_persist_failure() {
        let (catalog, db) = catalog_with_db().await;
        let principal = login_as(&catalog, "mluukkai").await;
        let mut added = Box::pin(catalog.book_added());

        sqlx::query("DROP TABLE books")
            .execute(db.pool())
            .await
            .unwrap();

        let err = catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PersistFailed);
        assert_eq!(err.message(), "Could not add book");
        assert_eq!(
            err.diagnostics().get("invalidArgs"),
            Some(&json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "published": 1965,
                "genres": ["sci-fi"],
            }))
        );
        assert!(err.cause().is_some());

        // nothing is announced for a book that was never stored
        assert!(
            timeout(Duration::from_millis(50), added.next())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_concurrent_adds_for_a_new_author_create_it_once() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        let (first, second) = tokio::join!(
            catalog.add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"])),
            catalog.add_book(
                Some(&principal),
                new_book("Children of Dune", "Frank Herbert", &["sci-fi"]),
            ),
        );

        assert_eq!(first.unwrap().author.id, second.unwrap().author.id);
        assert_eq!(catalog.author_count().await.unwrap(), 1);
    }
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_genre_filter_matches_membership_only() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        catalog
            .add_book(
                Some(&principal),
                new_book("Dune", "Frank Herbert", &["sci-fi", "classic"]),
            )
            .await
            .unwrap();
        catalog
            .add_book(Some(&principal), new_book("Emma", "Jane Austen", &["romance"]))
            .await
            .unwrap();

        let titles = |books: Vec<bookshelf::db::BookRecord>| {
            books.into_iter().map(|b| b.title).collect::<Vec<_>>()
        };

        assert_eq!(
            titles(catalog.all_books(None, Some("classic")).await.unwrap()),
            vec!["Dune"]
        );
        assert_eq!(
            titles(catalog.all_books(None, Some("romance")).await.unwrap()),
            vec!["Emma"]
        );
        // substring of a genre is not membership
        assert!(catalog.all_books(None, Some("sci")).await.unwrap().is_empty());
        assert_eq!(catalog.all_books(None, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_author_filter_and_unknown_author() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap();
        catalog
            .add_book(Some(&principal), new_book("Emma", "Jane Austen", &["romance"]))
            .await
            .unwrap();

        let by_austen = catalog.all_books(Some("Jane Austen"), None).await.unwrap();
        assert_eq!(by_austen.len(), 1);
        assert_eq!(by_austen[0].author.name, "Jane Austen");

        assert!(
            catalog
                .all_books(Some("Jane Austen"), Some("sci-fi"))
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            catalog
                .all_books(Some("Nobody Atall"), None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_empty_filters_count_as_absent() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap();

        assert_eq!(catalog.all_books(Some(""), Some("")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_me_requires_a_principal() {
        let catalog = catalog().await;
        assert_eq!(catalog.me(None).await.unwrap(), None);

        let principal = login_as(&catalog, "mluukkai").await;
        let me = catalog.me(Some(&principal)).await.unwrap().unwrap();
        assert_eq!(me.username, "mluukkai");
        assert_eq!(me.favorite_genre, "sci-fi");
    }

    #[tokio::test]
    async fn test_me_for_a_vanished_user_is_none() {
        let catalog = catalog().await;
        let ghost = Principal {
            id: "does-not-exist".to_string(),
            username: "ghost".to_string(),
        };
        assert_eq!(catalog.me(Some(&ghost)).await.unwrap(), None);
    }
}

// ============================================================================
// Editing authors
// ============================================================================

mod edit_author {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_sets_birth_year() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;
        catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap();

        let edited = catalog
            .edit_author(Some(&principal), "Frank Herbert", 1920)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.born, Some(1920));

        let authors = catalog.all_authors().await.unwrap();
        assert_eq!(authors[0].born, Some(1920));
    }

    #[tokio::test]
    async fn test_unknown_author_is_none() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;

        let edited = catalog
            .edit_author(Some(&principal), "Nobody Atall", 1900)
            .await
            .unwrap();
        assert_eq!(edited, None);
    }

    #[tokio::test]
    async fn test_rejected_update_is_a_persist_failure() {
        let (catalog, db) = catalog_with_db().await;
        let principal = login_as(&catalog, "mluukkai").await;
        catalog
            .add_book(Some(&principal), new_book("Dune", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap();

        sqlx::query(
            "CREATE TRIGGER authors_read_only BEFORE UPDATE ON authors \
             BEGIN SELECT RAISE(ABORT, 'authors are read-only'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = catalog
            .edit_author(Some(&principal), "Frank Herbert", 1920)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PersistFailed);
        assert_eq!(err.message(), "Editing Author failed");
        assert_eq!(
            err.diagnostics().get("invalidArgs"),
            Some(&json!("Frank Herbert"))
        );
        assert!(err.cause().is_some());
        assert_eq!(catalog.all_authors().await.unwrap()[0].born, None);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let catalog = catalog().await;
        let err = catalog
            .edit_author(None, "Frank Herbert", 1920)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }
}

// ============================================================================
// Accounts
// ============================================================================

mod accounts {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_create_then_login_round_trips() {
        let catalog = catalog().await;
        let created = catalog
            .create_user(NewUser {
                username: "hellas".to_string(),
                password: Some(PASSWORD.to_string()),
                favorite_genre: None,
            })
            .await
            .unwrap();
        assert_eq!(created.favorite_genre, "Genre1");

        let token = catalog.login("hellas", PASSWORD).await.unwrap();
        let principal = catalog.credentials().resolve_principal(&token).unwrap();
        assert_eq!(principal.id, created.id);
        assert_eq!(principal.username, "hellas");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_fail_identically() {
        let catalog = catalog().await;
        login_as(&catalog, "mluukkai").await;

        let unknown = catalog.login("nobody", PASSWORD).await.unwrap_err();
        let wrong = catalog.login("mluukkai", "wrong").await.unwrap_err();

        assert_eq!(unknown.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(unknown.kind(), wrong.kind());
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(unknown.diagnostics(), wrong.diagnostics());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_persist_failure() {
        let catalog = catalog().await;
        login_as(&catalog, "mluukkai").await;

        let err = catalog
            .create_user(NewUser {
                username: "mluukkai".to_string(),
                password: Some("other".to_string()),
                favorite_genre: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PersistFailed);
        assert_eq!(err.message(), "Creating the user failed");
        assert_eq!(
            err.diagnostics().get("invalidArgs"),
            Some(&json!("mluukkai"))
        );
        assert_eq!(err.diagnostics().get("reason"), Some(&json!("duplicate")));
        assert!(err.cause().is_some());
    }

    #[tokio::test]
    async fn test_missing_password_is_invalid_input() {
        let catalog = catalog().await;
        let err = catalog
            .create_user(NewUser {
                username: "hellas".to_string(),
                password: None,
                favorite_genre: None,
            })
            .await
            .unwrap_err();

        assert_matches!(err.kind(), ErrorKind::InvalidInput);
        // nothing was stored
        let login = catalog.login("hellas", "").await.unwrap_err();
        assert_eq!(login.kind(), ErrorKind::InvalidCredentials);
    }
}

// ============================================================================
// Notifications
// ============================================================================

mod notifications {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_added_book() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;
        let mut added = Box::pin(catalog.book_added());

        let book = catalog
            .add_book(
                Some(&principal),
                new_book("Dune", "Frank Herbert", &["sci-fi", "classic"]),
            )
            .await
            .unwrap();

        let received = timeout(Duration::from_secs(1), added.next())
            .await
            .expect("book delivered")
            .expect("stream open");
        assert_eq!(received, book);
        assert_eq!(received.author.name, "Frank Herbert");
    }

    #[tokio::test]
    async fn test_failed_add_publishes_nothing() {
        let catalog = catalog().await;
        let principal = login_as(&catalog, "mluukkai").await;
        let mut added = Box::pin(catalog.book_added());

        catalog
            .add_book(Some(&principal), new_book("Du", "Frank Herbert", &["sci-fi"]))
            .await
            .unwrap_err();

        assert!(
            timeout(Duration::from_millis(50), added.next())
                .await
                .is_err()
        );
    }
}
