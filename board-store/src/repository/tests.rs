//! Repository Integration Tests
//!
//! Tests for the SQLite repositories with an in-memory database.

#[cfg(test)]
mod tests {
    use crate::domain::{
        Board, BoardPatch, Card, CardPatch, DomainError, Filter, List, ListPatch, Member,
        MemberPatch, Subtask, SubtaskPatch, TaskStatus,
    };
    use crate::repository::{init_db, PositioningOperations, Repositories, Repository};
    use std::path::PathBuf;

    async fn setup_test_db() -> Repositories {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        db_state.repositories()
    }

    async fn seed_board(repos: &Repositories) -> (Board, List, List) {
        let board = repos
            .boards
            .create(&Board::new("biz_1".to_string(), "Launch".to_string(), Some("user_a".to_string())))
            .await
            .expect("Failed to create board");
        let todo = repos.lists.create(&List::new(board.id, "Todo".to_string())).await.unwrap();
        let done = repos.lists.create(&List::new(board.id, "Done".to_string())).await.unwrap();
        (board, todo, done)
    }

    #[tokio::test]
    async fn test_create_and_find_board() {
        let repos = setup_test_db().await;

        let created = repos
            .boards
            .create(&Board::new("biz_1".to_string(), "Launch".to_string(), Some("user_a".to_string())))
            .await
            .expect("Failed to create");
        assert!(created.id > 0);

        let found = repos.boards.find_by_id(&created.id).await.expect("Find failed");
        let found = found.expect("Board missing");
        assert_eq!(found.title, "Launch");
        assert_eq!(found.members, vec!["user_a".to_string()]);
        assert_eq!(found.task_count, 0);
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let repos = setup_test_db().await;
        let result = repos
            .boards
            .create(&Board::new("biz_1".to_string(), "  ".to_string(), None))
            .await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_boards_by_company() {
        let repos = setup_test_db().await;
        for (company, title) in [("biz_1", "A"), ("biz_2", "B"), ("biz_1", "C")] {
            repos
                .boards
                .create(&Board::new(company.to_string(), title.to_string(), None))
                .await
                .unwrap();
        }

        let boards = repos
            .boards
            .list(&Filter::all().eq("company_id", "biz_1").order_by_desc("id"))
            .await
            .unwrap();
        let titles: Vec<&str> = boards.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[tokio::test]
    async fn test_unknown_filter_column_rejected() {
        let repos = setup_test_db().await;
        let result = repos.cards.list(&Filter::all().eq("description", "x")).await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_append_order_per_parent() {
        let repos = setup_test_db().await;
        let (_, todo, done) = seed_board(&repos).await;
        assert_eq!((todo.order, done.order), (0, 1));

        let a = repos.cards.create(&Card::new(todo.id, "A".to_string(), None)).await.unwrap();
        let b = repos.cards.create(&Card::new(todo.id, "B".to_string(), None)).await.unwrap();
        let c = repos.cards.create(&Card::new(done.id, "C".to_string(), None)).await.unwrap();
        assert_eq!((a.order, b.order, c.order), (0, 1, 0));
    }

    #[tokio::test]
    async fn test_create_under_missing_parent() {
        let repos = setup_test_db().await;
        let result = repos.cards.create(&Card::new(99, "Orphan".to_string(), None)).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));

        let result = repos.lists.create(&List::new(99, "Orphan".to_string())).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_card_moves_and_round_trips_fields() {
        let repos = setup_test_db().await;
        let (_, todo, done) = seed_board(&repos).await;
        let card = repos.cards.create(&Card::new(todo.id, "Ship".to_string(), None)).await.unwrap();

        let updated = repos
            .cards
            .update(
                &card.id,
                &CardPatch {
                    list_id: Some(done.id),
                    order: Some(3),
                    status: Some(TaskStatus::Done),
                    assigned_to: Some(vec!["user_a".to_string(), "user_b".to_string()]),
                    description: Some(Some("notes".to_string())),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");
        assert_eq!(updated.list_id, done.id);

        let stored = repos.cards.find_by_id(&card.id).await.unwrap().unwrap();
        assert_eq!(stored.list_id, done.id);
        assert_eq!(stored.order, 3);
        assert_eq!(stored.status, TaskStatus::Done);
        assert_eq!(stored.assigned_to.len(), 2);
        assert_eq!(stored.description.as_deref(), Some("notes"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repos = setup_test_db().await;
        let result = repos.lists.update(&42, &ListPatch::default()).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_board_task_count() {
        let repos = setup_test_db().await;
        let (board, todo, done) = seed_board(&repos).await;
        repos.cards.create(&Card::new(todo.id, "A".to_string(), None)).await.unwrap();
        repos.cards.create(&Card::new(done.id, "B".to_string(), None)).await.unwrap();

        let found = repos.boards.find_by_id(&board.id).await.unwrap().unwrap();
        assert_eq!(found.task_count, 2);

        let renamed = repos
            .boards
            .update(&board.id, &BoardPatch { title: Some("Relaunch".to_string()), members: None })
            .await
            .unwrap();
        assert_eq!(renamed.task_count, 2);
    }

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let repos = setup_test_db().await;
        let (board, todo, _) = seed_board(&repos).await;
        let card = repos.cards.create(&Card::new(todo.id, "A".to_string(), None)).await.unwrap();
        repos.subtasks.create(&Subtask::new(card.id, "Step".to_string())).await.unwrap();

        repos.boards.delete(&board.id).await.expect("Delete failed");

        assert!(repos.boards.find_by_id(&board.id).await.unwrap().is_none());
        assert!(repos.lists.list(&Filter::all()).await.unwrap().is_empty());
        assert!(repos.cards.list(&Filter::all()).await.unwrap().is_empty());
        assert!(repos.subtasks.list(&Filter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_list_and_card_cascade() {
        let repos = setup_test_db().await;
        let (_, todo, done) = seed_board(&repos).await;
        let a = repos.cards.create(&Card::new(todo.id, "A".to_string(), None)).await.unwrap();
        let b = repos.cards.create(&Card::new(done.id, "B".to_string(), None)).await.unwrap();
        repos.subtasks.create(&Subtask::new(a.id, "a1".to_string())).await.unwrap();
        repos.subtasks.create(&Subtask::new(b.id, "b1".to_string())).await.unwrap();

        repos.lists.delete(&todo.id).await.unwrap();
        let cards = repos.cards.list(&Filter::all()).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, b.id);

        repos.cards.delete(&b.id).await.unwrap();
        assert!(repos.subtasks.list(&Filter::all()).await.unwrap().is_empty());

        // Deleting again is fine
        repos.cards.delete(&b.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_reindex_and_next_position() {
        let repos = setup_test_db().await;
        let (_, todo, _) = seed_board(&repos).await;
        for order in [5, 9, 2] {
            let mut card = Card::new(todo.id, format!("Card {}", order), None);
            card.order = order;
            repos.cards.create(&card).await.unwrap();
        }
        assert_eq!(repos.cards.next_position(todo.id).await.unwrap(), 10);

        repos.cards.reindex(todo.id).await.expect("Reindex failed");
        let cards = repos
            .cards
            .list(&Filter::all().eq("list_id", todo.id).order_by("order"))
            .await
            .unwrap();
        let ranked: Vec<(String, i32)> = cards.iter().map(|c| (c.title.clone(), c.order)).collect();
        assert_eq!(
            ranked,
            vec![
                ("Card 2".to_string(), 0),
                ("Card 5".to_string(), 1),
                ("Card 9".to_string(), 2)
            ]
        );
        assert_eq!(repos.cards.next_position(todo.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_subtask_toggle() {
        let repos = setup_test_db().await;
        let (_, todo, _) = seed_board(&repos).await;
        let card = repos.cards.create(&Card::new(todo.id, "A".to_string(), None)).await.unwrap();
        let step = repos.subtasks.create(&Subtask::new(card.id, "Step".to_string())).await.unwrap();

        let toggled = repos
            .subtasks
            .update(&step.id, &SubtaskPatch { completed: Some(true), ..Default::default() })
            .await
            .unwrap();
        assert!(toggled.completed);
        let stored = repos.subtasks.find_by_id(&step.id).await.unwrap().unwrap();
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn test_member_upsert() {
        let repos = setup_test_db().await;
        let mut member = Member::new("user_1".to_string(), "biz_1".to_string(), "ada".to_string());
        repos.members.create(&member).await.expect("Insert failed");

        member.name = Some("Ada Lovelace".to_string());
        member.last_seen += 1000;
        repos.members.create(&member).await.expect("Upsert failed");

        let members = repos.members.list(&Filter::all().eq("company_id", "biz_1")).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name(), "Ada Lovelace");
        assert_eq!(members[0].last_seen, member.last_seen);

        let touched = repos
            .members
            .update(&member.id, &MemberPatch { last_seen: Some(1), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(touched.last_seen, 1);
    }

    #[tokio::test]
    async fn test_member_requires_identity() {
        let repos = setup_test_db().await;
        let result = repos
            .members
            .create(&Member::new(String::new(), "biz_1".to_string(), "ada".to_string()))
            .await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_uninitialized_state_errors() {
        let state = crate::repository::DbState::new(PathBuf::from("unused.db"));
        assert!(!state.is_initialized().await);
        let result = state.repositories().boards.list(&Filter::all()).await;
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.db");
        {
            let repos = init_db(&path).await.unwrap().repositories();
            repos
                .boards
                .create(&Board::new("biz_1".to_string(), "Kept".to_string(), None))
                .await
                .unwrap();
        }
        let repos = init_db(&path).await.unwrap().repositories();
        let boards = repos.boards.list(&Filter::all()).await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].title, "Kept");
    }
}
