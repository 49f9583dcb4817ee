use helpbot_core::db::open_db_in_memory;
use helpbot_core::{
    Actor, AdminAction, FileRef, FileUpload, ItemKind, ItemService, ItemServiceError,
    SaveOutcome, SqliteItemRepository,
};

const ADMIN: Actor = Actor {
    user_id: 1,
    is_admin: true,
};
const MEMBER: Actor = Actor {
    user_id: 2,
    is_admin: false,
};

fn saved_ids(outcome: SaveOutcome) -> Vec<i64> {
    match outcome {
        SaveOutcome::Saved(ids) => ids,
        SaveOutcome::LinkRequired => panic!("expected items to be saved"),
    }
}

fn upload(caption: Option<&str>, file_name: Option<&str>) -> FileUpload {
    FileUpload {
        file: FileRef {
            file_id: "AgACAgIAAxk".to_string(),
            file_name: file_name.map(str::to_string),
            mime_type: Some("image/jpeg".to_string()),
        },
        caption: caption.map(str::to_string),
    }
}

#[test]
fn each_url_in_a_message_becomes_one_item() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = ItemService::new(SqliteItemRepository::new(&mut conn));

    let ids = saved_ids(
        service
            .save_text(
                MEMBER,
                "two reads https://a.example/x www.b.example #Reading #rust",
            )
            .unwrap(),
    );
    assert_eq!(ids.len(), 2);

    let first = service.get_item(ids[0]).unwrap().unwrap();
    let second = service.get_item(ids[1]).unwrap().unwrap();
    assert_eq!(first.url.as_deref(), Some("https://a.example/x"));
    assert_eq!(second.url.as_deref(), Some("https://www.b.example"));
    assert_eq!(first.title, "two reads");
    assert_eq!(first.tags, vec!["reading", "rust"]);
    assert_eq!(second.tags, first.tags);
    assert_eq!(first.added_by, Some(2));
}

#[test]
fn link_without_text_is_titled_by_its_short_url() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = ItemService::new(SqliteItemRepository::new(&mut conn));

    let ids = saved_ids(
        service
            .save_text(MEMBER, "https://www.example.com/docs/ #docs")
            .unwrap(),
    );
    let item = service.get_item(ids[0]).unwrap().unwrap();
    assert_eq!(item.title, "example.com/docs/");
}

#[test]
fn text_without_links_needs_an_admin() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = ItemService::new(SqliteItemRepository::new(&mut conn));

    assert_eq!(
        service.save_text(MEMBER, "just a thought #idea").unwrap(),
        SaveOutcome::LinkRequired
    );

    let ids = saved_ids(service.save_text(ADMIN, "just a thought #idea").unwrap());
    let note = service.get_item(ids[0]).unwrap().unwrap();
    assert_eq!(note.kind(), ItemKind::Note);
    assert_eq!(note.title, "just a thought");
    assert_eq!(note.tags, vec!["idea"]);

    let ids = saved_ids(service.save_text(ADMIN, "#only #tags").unwrap());
    assert_eq!(service.get_item(ids[0]).unwrap().unwrap().title, "Note");
}

#[test]
fn files_are_admin_only_and_titled_from_caption() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = ItemService::new(SqliteItemRepository::new(&mut conn));

    let err = service
        .save_file(MEMBER, upload(Some("Team photo"), None))
        .unwrap_err();
    assert!(matches!(
        err,
        ItemServiceError::Forbidden(AdminAction::SaveFile)
    ));

    let id = service
        .save_file(ADMIN, upload(Some("Team photo #offsite"), Some("IMG_1.jpg")))
        .unwrap();
    let item = service.get_item(id).unwrap().unwrap();
    assert_eq!(item.kind(), ItemKind::File);
    assert_eq!(item.title, "Team photo");
    assert_eq!(item.tags, vec!["offsite"]);
    assert!(item.file.as_ref().unwrap().is_image());

    let id = service
        .save_file(ADMIN, upload(Some("#offsite"), Some("IMG_2.jpg")))
        .unwrap();
    assert_eq!(service.get_item(id).unwrap().unwrap().title, "IMG_2.jpg");

    let id = service.save_file(ADMIN, upload(None, None)).unwrap();
    assert_eq!(service.get_item(id).unwrap().unwrap().title, "File");
}

#[test]
fn delete_export_and_broadcast_require_admin() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = ItemService::new(SqliteItemRepository::new(&mut conn));
    let id = saved_ids(service.save_text(MEMBER, "https://a.example").unwrap())[0];

    assert!(matches!(
        service.delete_item(MEMBER, id).unwrap_err(),
        ItemServiceError::Forbidden(AdminAction::Delete)
    ));
    assert!(matches!(
        service.export_items(MEMBER).unwrap_err(),
        ItemServiceError::Forbidden(AdminAction::Export)
    ));
    assert!(matches!(
        service.item_for_broadcast(MEMBER, id).unwrap_err(),
        ItemServiceError::Forbidden(AdminAction::Broadcast)
    ));

    assert_eq!(service.item_for_broadcast(ADMIN, id).unwrap().id, id);
    assert_eq!(service.export_items(ADMIN).unwrap().len(), 1);
    assert!(service.delete_item(ADMIN, id).unwrap());
    assert!(!service.delete_item(ADMIN, id).unwrap());
    assert!(matches!(
        service.item_for_broadcast(ADMIN, id).unwrap_err(),
        ItemServiceError::NotFound(missing) if missing == id
    ));
}

#[test]
fn browse_by_tag_and_recent_pages() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = ItemService::new(SqliteItemRepository::new(&mut conn));
    for idx in 0..3 {
        service
            .save_text(MEMBER, &format!("https://a.example/{idx} #docs"))
            .unwrap();
    }
    service.save_text(MEMBER, "https://b.example #misc").unwrap();

    let page = service.by_tag("#Docs", Some(2), 0).unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.next_offset(0), Some(2));
    assert!(matches!(
        service.by_tag("  # ", None, 0).unwrap_err(),
        ItemServiceError::InvalidTag(_)
    ));

    let recent = service.recent(false, None, 0).unwrap();
    assert_eq!(recent.applied_limit, 25);
    assert_eq!(recent.items.len(), 4);
    assert_eq!(recent.next_offset(0), None);
    assert!(service.recent(true, None, 0).unwrap().items.is_empty());

    let tags = service.list_tags().unwrap();
    assert_eq!(tags[0].name, "docs");
    assert_eq!(tags[0].items, 3);
}
