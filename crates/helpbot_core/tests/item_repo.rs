use helpbot_core::db::open_db_in_memory;
use helpbot_core::{
    FileRef, ItemKind, ItemListQuery, ItemRepository, ItemValidationError, NewItem, RepoError,
    SqliteItemRepository, TagCount,
};
use rusqlite::Connection;

fn pdf(file_id: &str) -> FileRef {
    FileRef {
        file_id: file_id.to_string(),
        file_name: Some("handbook.pdf".to_string()),
        mime_type: Some("application/pdf".to_string()),
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn create_and_get_link_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteItemRepository::new(&mut conn);

    let id = repo
        .create_item(
            &NewItem::link("https://docs.rs/rusqlite", "rusqlite docs")
                .with_tags(tags(&["db", "rust"]))
                .with_description("bindings")
                .added_by(42),
        )
        .unwrap();

    let item = repo.get_item(id).unwrap().unwrap();
    assert_eq!(item.kind(), ItemKind::Link);
    assert_eq!(item.url.as_deref(), Some("https://docs.rs/rusqlite"));
    assert_eq!(item.title, "rusqlite docs");
    assert_eq!(item.description, "bindings");
    assert_eq!(item.tags, vec!["db", "rust"]);
    assert_eq!(item.added_by, Some(42));
    assert!(item.added_at.ends_with('Z'));
    assert!(repo.get_item(id + 100).unwrap().is_none());
}

#[test]
fn create_rejects_invalid_items_before_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteItemRepository::new(&mut conn);

    let err = repo
        .create_item(&NewItem::link("ftp://example.com", "ftp"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ItemValidationError::InvalidUrl(_))
    ));

    let err = repo
        .create_item(&NewItem::note("n").with_tags(tags(&["#Loud"])))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ItemValidationError::InvalidTag(_))
    ));

    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn delete_removes_item_and_tag_links() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut repo = SqliteItemRepository::new(&mut conn);
        let id = repo
            .create_item(&NewItem::note("standup notes").with_tags(tags(&["team"])))
            .unwrap();
        assert!(repo.delete_item(id).unwrap());
        assert!(!repo.delete_item(id).unwrap());
        assert!(repo.get_item(id).unwrap().is_none());
        assert!(repo.list_tags().unwrap().is_empty());
        id
    };

    assert_eq!(count_links(&conn, id), 0);
}

#[test]
fn list_recent_is_newest_first_and_filters_files() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteItemRepository::new(&mut conn);

    let link = repo
        .create_item(&NewItem::link("https://a.example", "a"))
        .unwrap();
    let file = repo
        .create_item(&NewItem::file(pdf("BQACAgIAAxk"), "handbook"))
        .unwrap();
    let note = repo.create_item(&NewItem::note("b")).unwrap();

    let all = repo.list_recent(&ItemListQuery::default()).unwrap();
    let ids = all.iter().map(|item| item.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![note, file, link]);

    let files = repo
        .list_recent(&ItemListQuery {
            files_only: true,
            ..ItemListQuery::default()
        })
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].id, file);
    assert_eq!(files[0].file.as_ref().unwrap().file_id, "BQACAgIAAxk");

    let second_page = repo
        .list_recent(&ItemListQuery {
            files_only: false,
            limit: Some(1),
            offset: 1,
        })
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, file);
}

#[test]
fn list_by_tag_matches_exact_tag_only() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteItemRepository::new(&mut conn);

    let ai = repo
        .create_item(&NewItem::link("https://a.example", "a").with_tags(tags(&["ai"])))
        .unwrap();
    repo.create_item(&NewItem::link("https://b.example", "b").with_tags(tags(&["aix"])))
        .unwrap();

    let hits = repo.list_by_tag("#AI", None, 0).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, ai);
    assert!(repo.list_by_tag("#", None, 0).unwrap().is_empty());
    assert!(repo.list_by_tag("missing", None, 0).unwrap().is_empty());
}

#[test]
fn list_tags_counts_items_most_used_first() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteItemRepository::new(&mut conn);

    repo.create_item(&NewItem::note("one").with_tags(tags(&["ops", "rust"])))
        .unwrap();
    repo.create_item(&NewItem::note("two").with_tags(tags(&["rust"])))
        .unwrap();
    repo.create_item(&NewItem::note("three").with_tags(tags(&["alpha"])))
        .unwrap();

    let counts = repo.list_tags().unwrap();
    assert_eq!(
        counts,
        vec![
            TagCount {
                name: "rust".to_string(),
                items: 2
            },
            TagCount {
                name: "alpha".to_string(),
                items: 1
            },
            TagCount {
                name: "ops".to_string(),
                items: 1
            },
        ]
    );
}

#[test]
fn list_all_returns_insertion_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteItemRepository::new(&mut conn);

    let first = repo.create_item(&NewItem::note("first")).unwrap();
    let second = repo.create_item(&NewItem::note("second")).unwrap();

    let ids = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![first, second]);
}

fn count_links(conn: &Connection, item_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM item_tags WHERE item_id = ?1;",
        [item_id],
        |row| row.get(0),
    )
    .unwrap()
}
