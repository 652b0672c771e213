use blackbook_core::db::open_db_in_memory;
use blackbook_core::service::image_service::{ImageInput, ImageService};
use blackbook_core::service::named_service::{
    NamedResourceInput, NamedResourceService, NamedResourceUpdate,
};
use blackbook_core::service::relationship_service::{RelationshipInput, RelationshipService};
use blackbook_core::service::universe_service::UniverseService;
use blackbook_core::service::user_service::UserService;
use blackbook_core::{BlackBookError, ErrorStatus, NewUser, Page, ResourceKind, User};
use rusqlite::Connection;

fn register(conn: &Connection, name: &str) -> User {
    UserService::sqlite(conn)
        .register(&NewUser::new(name, format!("{name}@example.com")))
        .unwrap()
}

fn input(name: &str) -> NamedResourceInput {
    NamedResourceInput {
        name: name.to_string(),
        description: String::new(),
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn every_named_kind_supports_crud_for_members() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universe = UniverseService::sqlite(&conn)
        .create(owner.id, "Hyrule")
        .unwrap();

    for kind in ResourceKind::NAMED {
        let service = NamedResourceService::sqlite(&conn, kind).unwrap();
        let created = service
            .create(
                owner.id,
                universe.id,
                &NamedResourceInput {
                    name: " Thing ".to_string(),
                    description: "A thing".to_string(),
                },
            )
            .unwrap();
        assert_eq!(created.name, "Thing");
        assert_eq!(created.universe_id, universe.id);

        let listed = service.list(owner.id, universe.id, Page::default()).unwrap();
        assert_eq!(listed.total, 1);

        let updated = service
            .update(
                owner.id,
                created.id,
                Some(universe.id),
                &NamedResourceUpdate {
                    description: Some("Updated".to_string()),
                    ..NamedResourceUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Thing");
        assert_eq!(updated.description, "Updated");

        service.delete(owner.id, created.id, None).unwrap();
        let err = service.get(owner.id, created.id, None).unwrap_err();
        assert_eq!(
            err.message(),
            format!("No {} with ID {} exists.", kind.name(), created.id)
        );
    }
}

#[test]
fn only_named_kinds_have_a_named_service() {
    let conn = open_db_in_memory().unwrap();
    assert!(NamedResourceService::sqlite(&conn, ResourceKind::Image).is_err());
}

#[test]
fn outsiders_are_denied_with_the_kind_in_the_message() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let stranger = register(&conn, "stranger");
    let universe = UniverseService::sqlite(&conn)
        .create(owner.id, "Westeros")
        .unwrap();
    let items = NamedResourceService::sqlite(&conn, ResourceKind::Item).unwrap();
    let sword = items.create(owner.id, universe.id, &input("Longclaw")).unwrap();

    let err = items.get(stranger.id, sword.id, None).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::Forbidden);
    assert_eq!(
        err.message(),
        format!(
            "You must be an owner or collaborator for the universe with ID {} to interact with its items.",
            universe.id
        )
    );

    let err = items
        .create(stranger.id, universe.id, &input("Ice"))
        .unwrap_err();
    assert!(matches!(
        err,
        BlackBookError::ForbiddenUniverseResource {
            kind: ResourceKind::Item,
            ..
        }
    ));
}

#[test]
fn collaborators_have_full_resource_access() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let collaborator = register(&conn, "collaborator");
    let universes = UniverseService::sqlite(&conn);
    let universe = universes.create(owner.id, "Oz").unwrap();
    universes
        .add_collaborator(owner.id, universe.id, collaborator.id)
        .unwrap();

    let traits = NamedResourceService::sqlite(&conn, ResourceKind::Trait).unwrap();
    let brave = traits
        .create(collaborator.id, universe.id, &input("Brave"))
        .unwrap();
    traits
        .update(
            collaborator.id,
            brave.id,
            None,
            &NamedResourceUpdate {
                name: Some("Courageous".to_string()),
                ..NamedResourceUpdate::default()
            },
        )
        .unwrap();
    traits.delete(collaborator.id, brave.id, None).unwrap();
    assert_eq!(count(&conn, "traits"), 0);
}

#[test]
fn resource_requested_under_the_wrong_universe_is_not_in_universe() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universes = UniverseService::sqlite(&conn);
    let home = universes.create(owner.id, "Home").unwrap();
    let away = universes.create(owner.id, "Away").unwrap();
    let locations = NamedResourceService::sqlite(&conn, ResourceKind::Location).unwrap();
    let castle = locations.create(owner.id, home.id, &input("Castle")).unwrap();

    let err = locations.get(owner.id, castle.id, Some(away.id)).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::BadRequest);
    assert_eq!(
        err.message(),
        format!(
            "The location with ID {} does not belong to the universe with ID {}.",
            castle.id, away.id
        )
    );
}

#[test]
fn resources_of_a_discarded_universe_are_missing() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universes = UniverseService::sqlite(&conn);
    let universe = universes.create(owner.id, "Pompeii").unwrap();
    let characters = NamedResourceService::sqlite(&conn, ResourceKind::Character).unwrap();
    let pliny = characters.create(owner.id, universe.id, &input("Pliny")).unwrap();

    universes.destroy(owner.id, universe.id).unwrap();

    let err = characters.get(owner.id, pliny.id, None).unwrap_err();
    assert_eq!(
        err.message(),
        format!("No character with ID {} exists.", pliny.id)
    );
    let err = characters
        .list(owner.id, universe.id, Page::default())
        .unwrap_err();
    assert_eq!(
        err.message(),
        format!("No universe with ID {} exists.", universe.id)
    );
}

#[test]
fn names_are_validated_and_unique_per_universe() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universe = UniverseService::sqlite(&conn)
        .create(owner.id, "Arrakis")
        .unwrap();
    let characters = NamedResourceService::sqlite(&conn, ResourceKind::Character).unwrap();

    let err = characters
        .create(owner.id, universe.id, &input("   "))
        .unwrap_err();
    assert_eq!(err.messages(), vec!["Name can't be blank".to_string()]);

    characters.create(owner.id, universe.id, &input("Paul")).unwrap();
    let err = characters
        .create(owner.id, universe.id, &input("Paul"))
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::UnprocessableEntity);
    assert_eq!(err.messages(), vec!["Name has already been taken".to_string()]);
}

#[test]
fn reassignment_requires_membership_in_the_destination() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let other = register(&conn, "other");
    let universes = UniverseService::sqlite(&conn);
    let source = universes.create(owner.id, "Source").unwrap();
    let foreign = universes.create(other.id, "Foreign").unwrap();
    let items = NamedResourceService::sqlite(&conn, ResourceKind::Item).unwrap();
    let ring = items.create(owner.id, source.id, &input("Ring")).unwrap();

    let move_to = |universe_id| NamedResourceUpdate {
        universe_id: Some(universe_id),
        ..NamedResourceUpdate::default()
    };

    let err = items
        .update(owner.id, ring.id, None, &move_to(foreign.id))
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::Forbidden);
    assert_eq!(
        err.message(),
        format!(
            "You must be an owner or collaborator for the universe with ID {} to move a item into it.",
            foreign.id
        )
    );
    assert_eq!(items.get(owner.id, ring.id, None).unwrap().universe_id, source.id);

    let err = items
        .update(owner.id, ring.id, None, &move_to(9_999))
        .unwrap_err();
    assert_eq!(err.message(), "No universe with ID 9999 exists.");

    universes
        .add_collaborator(other.id, foreign.id, owner.id)
        .unwrap();
    let moved = items
        .update(owner.id, ring.id, None, &move_to(foreign.id))
        .unwrap();
    assert_eq!(moved.universe_id, foreign.id);
}

#[test]
fn moving_a_character_drops_its_cross_universe_links() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "owner");
    let universes = UniverseService::sqlite(&conn);
    let source = universes.create(owner.id, "Source").unwrap();
    let target = universes.create(owner.id, "Target").unwrap();

    let characters = NamedResourceService::sqlite(&conn, ResourceKind::Character).unwrap();
    let hero = characters.create(owner.id, source.id, &input("Hero")).unwrap();
    let mentor = characters.create(owner.id, source.id, &input("Mentor")).unwrap();

    let images = ImageService::sqlite(&conn).unwrap();
    let portrait = images
        .create_image(
            owner.id,
            source.id,
            &ImageInput {
                filename: "portrait.png".to_string(),
                caption: String::new(),
            },
        )
        .unwrap();
    images.tag_character(owner.id, portrait.id, hero.id).unwrap();
    images.tag_character(owner.id, portrait.id, mentor.id).unwrap();

    RelationshipService::sqlite(&conn)
        .unwrap()
        .create(
            owner.id,
            source.id,
            &RelationshipInput {
                first_character_id: hero.id,
                first_name: "Apprentice".to_string(),
                second_character_id: mentor.id,
                second_name: "Master".to_string(),
            },
        )
        .unwrap();

    characters
        .update(
            owner.id,
            hero.id,
            Some(source.id),
            &NamedResourceUpdate {
                universe_id: Some(target.id),
                ..NamedResourceUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(count(&conn, "image_tags"), 1);
    assert_eq!(count(&conn, "mutual_relationships"), 0);
    assert_eq!(
        characters.get(owner.id, hero.id, Some(target.id)).unwrap().universe_id,
        target.id
    );
}
