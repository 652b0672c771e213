use blackbook_core::db::open_db_in_memory;
use blackbook_core::service::named_service::{NamedResourceInput, NamedResourceService};
use blackbook_core::service::relationship_service::{
    RelationshipInput, RelationshipService, RelationshipUpdate,
};
use blackbook_core::service::universe_service::UniverseService;
use blackbook_core::service::user_service::UserService;
use blackbook_core::{ErrorStatus, NewUser, Page, ResourceId, ResourceKind, UniverseId, User};
use rusqlite::Connection;

fn register(conn: &Connection, name: &str) -> User {
    UserService::sqlite(conn)
        .register(&NewUser::new(name, format!("{name}@example.com")))
        .unwrap()
}

fn character(conn: &Connection, actor: &User, universe_id: UniverseId, name: &str) -> ResourceId {
    NamedResourceService::sqlite(conn, ResourceKind::Character)
        .unwrap()
        .create(
            actor.id,
            universe_id,
            &NamedResourceInput {
                name: name.to_string(),
                description: String::new(),
            },
        )
        .unwrap()
        .id
}

fn father_and_son(first: ResourceId, second: ResourceId) -> RelationshipInput {
    RelationshipInput {
        first_character_id: first,
        first_name: "Father".to_string(),
        second_character_id: second,
        second_name: "Son".to_string(),
    }
}

#[test]
fn relationship_is_seen_from_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universe = UniverseService::sqlite(&conn)
        .create(owner.id, "Tatooine")
        .unwrap();
    let anakin = character(&conn, &owner, universe.id, "Anakin");
    let luke = character(&conn, &owner, universe.id, "Luke");
    let service = RelationshipService::sqlite(&conn).unwrap();

    let relationship = service
        .create(owner.id, universe.id, &father_and_son(anakin, luke))
        .unwrap();

    let from_luke = service.view_as(owner.id, luke, relationship.id).unwrap();
    assert_eq!(from_luke.name, "Son");
    assert_eq!(from_luke.target_character_id, anakin);
    assert_eq!(from_luke.target_name, "Father");

    let from_anakin = service.for_character(owner.id, anakin).unwrap();
    assert_eq!(from_anakin.len(), 1);
    assert_eq!(from_anakin[0].name, "Father");
    assert_eq!(from_anakin[0].target_character_id, luke);

    let listed = service.list(owner.id, universe.id, Page::default()).unwrap();
    assert_eq!(listed.total, 1);
}

#[test]
fn viewing_as_an_uninvolved_character_is_a_bad_request() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universe = UniverseService::sqlite(&conn)
        .create(owner.id, "Tatooine")
        .unwrap();
    let anakin = character(&conn, &owner, universe.id, "Anakin");
    let luke = character(&conn, &owner, universe.id, "Luke");
    let leia = character(&conn, &owner, universe.id, "Leia");
    let service = RelationshipService::sqlite(&conn).unwrap();
    let relationship = service
        .create(owner.id, universe.id, &father_and_son(anakin, luke))
        .unwrap();

    let err = service.view_as(owner.id, leia, relationship.id).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::BadRequest);
    assert_eq!(
        err.message(),
        format!(
            "The character with ID {leia} is not part of the relationship with ID {}.",
            relationship.id
        )
    );
}

#[test]
fn creation_validates_both_characters() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universes = UniverseService::sqlite(&conn);
    let universe = universes.create(owner.id, "Home").unwrap();
    let elsewhere = universes.create(owner.id, "Elsewhere").unwrap();
    let anakin = character(&conn, &owner, universe.id, "Anakin");
    let drifter = character(&conn, &owner, elsewhere.id, "Drifter");
    let service = RelationshipService::sqlite(&conn).unwrap();

    let err = service
        .create(owner.id, universe.id, &father_and_son(anakin, 9_999))
        .unwrap_err();
    assert_eq!(err.message(), "No character with ID 9999 exists.");

    let err = service
        .create(owner.id, universe.id, &father_and_son(anakin, drifter))
        .unwrap_err();
    assert_eq!(
        err.message(),
        format!(
            "The character with ID {drifter} does not belong to the universe with ID {}.",
            universe.id
        )
    );

    let err = service
        .create(owner.id, universe.id, &father_and_son(anakin, anakin))
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::UnprocessableEntity);
    assert_eq!(
        err.messages(),
        vec!["A character cannot be related to itself".to_string()]
    );
}

#[test]
fn only_members_rename_or_delete() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let stranger = register(&conn, "stranger");
    let universe = UniverseService::sqlite(&conn)
        .create(owner.id, "Tatooine")
        .unwrap();
    let anakin = character(&conn, &owner, universe.id, "Anakin");
    let luke = character(&conn, &owner, universe.id, "Luke");
    let service = RelationshipService::sqlite(&conn).unwrap();
    let relationship = service
        .create(owner.id, universe.id, &father_and_son(anakin, luke))
        .unwrap();

    let rename = RelationshipUpdate {
        first_name: Some("Parent".to_string()),
        second_name: None,
    };
    let err = service.rename(stranger.id, relationship.id, &rename).unwrap_err();
    assert_eq!(
        err.message(),
        format!(
            "You must be an owner or collaborator for the universe with ID {} to interact with its relationships.",
            universe.id
        )
    );
    let err = service.for_character(stranger.id, luke).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::Forbidden);

    let renamed = service.rename(owner.id, relationship.id, &rename).unwrap();
    assert_eq!(renamed.first_name, "Parent");
    assert_eq!(renamed.second_name, "Son");

    service.delete(owner.id, relationship.id).unwrap();
    let err = service.get(owner.id, relationship.id).unwrap_err();
    assert_eq!(
        err.message(),
        format!("No relationship with ID {} exists.", relationship.id)
    );
}
