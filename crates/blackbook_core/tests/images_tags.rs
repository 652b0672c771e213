use blackbook_core::db::open_db_in_memory;
use blackbook_core::service::image_service::{ImageInput, ImageService, ImageUpdate};
use blackbook_core::service::named_service::{NamedResourceInput, NamedResourceService};
use blackbook_core::service::universe_service::UniverseService;
use blackbook_core::service::user_service::UserService;
use blackbook_core::{
    BlackBookError, ErrorStatus, NewUser, Page, ResourceId, ResourceKind, UniverseId, User,
};
use rusqlite::Connection;

struct World {
    owner: User,
    collaborator: User,
    stranger: User,
    universe_id: UniverseId,
}

fn register(conn: &Connection, name: &str) -> User {
    UserService::sqlite(conn)
        .register(&NewUser::new(name, format!("{name}@example.com")))
        .unwrap()
}

fn world(conn: &Connection) -> World {
    let owner = register(conn, "owner");
    let collaborator = register(conn, "collaborator");
    let stranger = register(conn, "stranger");
    let universes = UniverseService::sqlite(conn);
    let universe = universes.create(owner.id, "Gallery").unwrap();
    universes
        .add_collaborator(owner.id, universe.id, collaborator.id)
        .unwrap();
    World {
        owner,
        collaborator,
        stranger,
        universe_id: universe.id,
    }
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

fn image_input(filename: &str) -> ImageInput {
    ImageInput {
        filename: filename.to_string(),
        caption: "A caption".to_string(),
    }
}

fn tag_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM image_tags;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn members_upload_list_and_update_images() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let images = ImageService::sqlite(&conn).unwrap();

    let image = images
        .create_image(world.collaborator.id, world.universe_id, &image_input("map.png"))
        .unwrap();
    assert_eq!(image.filename, "map.png");
    assert_eq!(image.universe_id, world.universe_id);

    let listed = images
        .list_images(world.owner.id, world.universe_id, Page::default())
        .unwrap();
    assert_eq!(listed.total, 1);

    let updated = images
        .update_image(
            world.owner.id,
            image.id,
            Some(world.universe_id),
            &ImageUpdate {
                caption: Some("The known world".to_string()),
                ..ImageUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.caption, "The known world");
    assert_eq!(updated.filename, "map.png");
}

#[test]
fn image_filenames_reject_path_components() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let images = ImageService::sqlite(&conn).unwrap();

    let err = images
        .create_image(world.owner.id, world.universe_id, &image_input("../etc/passwd"))
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::UnprocessableEntity);
}

#[test]
fn outsiders_cannot_touch_images_or_tags() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let images = ImageService::sqlite(&conn).unwrap();
    let image = images
        .create_image(world.owner.id, world.universe_id, &image_input("map.png"))
        .unwrap();
    let hero = character(&conn, &world.owner, world.universe_id, "Hero");
    let tag = images.tag_character(world.owner.id, image.id, hero).unwrap();

    let expected = format!(
        "You must be an owner or collaborator for the universe with ID {} to interact with its images.",
        world.universe_id
    );

    let err = images.get_image(world.stranger.id, image.id, None).unwrap_err();
    assert_eq!(err.message(), expected);

    let err = images.list_tags(world.stranger.id, image.id).unwrap_err();
    assert_eq!(err.message(), expected);

    let err = images.untag(world.stranger.id, image.id, tag.id).unwrap_err();
    assert_eq!(err.status(), ErrorStatus::Forbidden);
    assert_eq!(err.message(), expected);
    assert_eq!(tag_count(&conn), 1);
}

#[test]
fn collaborator_removes_a_tag() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let images = ImageService::sqlite(&conn).unwrap();
    let image = images
        .create_image(world.owner.id, world.universe_id, &image_input("group.png"))
        .unwrap();
    let hero = character(&conn, &world.owner, world.universe_id, "Hero");
    let villain = character(&conn, &world.owner, world.universe_id, "Villain");
    let tag = images.tag_character(world.owner.id, image.id, hero).unwrap();
    images.tag_character(world.owner.id, image.id, villain).unwrap();
    assert_eq!(tag_count(&conn), 2);

    images.untag(world.collaborator.id, image.id, tag.id).unwrap();

    assert_eq!(tag_count(&conn), 1);
    let remaining = images.list_tags(world.owner.id, image.id).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].character_id, villain);
}

#[test]
fn tags_are_scoped_to_their_image() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let images = ImageService::sqlite(&conn).unwrap();
    let first = images
        .create_image(world.owner.id, world.universe_id, &image_input("one.png"))
        .unwrap();
    let second = images
        .create_image(world.owner.id, world.universe_id, &image_input("two.png"))
        .unwrap();
    let hero = character(&conn, &world.owner, world.universe_id, "Hero");
    let tag = images.tag_character(world.owner.id, first.id, hero).unwrap();

    let err = images.untag(world.owner.id, second.id, tag.id).unwrap_err();
    assert_eq!(err.message(), format!("No image tag with ID {} exists.", tag.id));
    assert_eq!(tag_count(&conn), 1);
}

#[test]
fn tagging_checks_the_character() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let elsewhere = UniverseService::sqlite(&conn)
        .create(world.owner.id, "Elsewhere")
        .unwrap();
    let images = ImageService::sqlite(&conn).unwrap();
    let image = images
        .create_image(world.owner.id, world.universe_id, &image_input("one.png"))
        .unwrap();
    let hero = character(&conn, &world.owner, world.universe_id, "Hero");
    let stranger_character = character(&conn, &world.owner, elsewhere.id, "Drifter");

    let err = images
        .tag_character(world.owner.id, image.id, 9_999)
        .unwrap_err();
    assert_eq!(err.message(), "No character with ID 9999 exists.");

    let err = images
        .tag_character(world.owner.id, image.id, stranger_character)
        .unwrap_err();
    assert!(matches!(
        err,
        BlackBookError::ResourceNotInUniverse {
            kind: ResourceKind::Character,
            ..
        }
    ));

    images.tag_character(world.owner.id, image.id, hero).unwrap();
    let err = images
        .tag_character(world.owner.id, image.id, hero)
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Character is already tagged in this image".to_string()]
    );
}

#[test]
fn moving_an_image_drops_its_tags() {
    let conn = open_db_in_memory().unwrap();
    let world = world(&conn);
    let target = UniverseService::sqlite(&conn)
        .create(world.owner.id, "Archive")
        .unwrap();
    let images = ImageService::sqlite(&conn).unwrap();
    let image = images
        .create_image(world.owner.id, world.universe_id, &image_input("one.png"))
        .unwrap();
    let hero = character(&conn, &world.owner, world.universe_id, "Hero");
    images.tag_character(world.owner.id, image.id, hero).unwrap();

    let err = images
        .update_image(
            world.collaborator.id,
            image.id,
            None,
            &ImageUpdate {
                universe_id: Some(target.id),
                ..ImageUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        BlackBookError::ForbiddenUniverseResourceReassignment { .. }
    ));
    assert_eq!(tag_count(&conn), 1);

    let moved = images
        .update_image(
            world.owner.id,
            image.id,
            None,
            &ImageUpdate {
                universe_id: Some(target.id),
                ..ImageUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(moved.universe_id, target.id);
    assert_eq!(tag_count(&conn), 0);
}
