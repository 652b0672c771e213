use blackbook_core::db::open_db_in_memory;
use blackbook_core::service::user_service::UserService;
use blackbook_core::{ErrorStatus, NewUser};

#[test]
fn registered_user_authenticates_with_issued_token() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::sqlite(&conn);

    let user = service
        .register(&NewUser::new(" Bilbo ", "Bilbo@Shire.example"))
        .unwrap();
    assert_eq!(user.display_name, "Bilbo");
    assert_eq!(user.email, "bilbo@shire.example");
    assert!(!user.api_token.is_empty());

    let found = service.authenticate(&user.api_token).unwrap().unwrap();
    assert_eq!(found.id, user.id);

    assert!(service.authenticate("not-a-token").unwrap().is_none());
    assert!(service.authenticate("   ").unwrap().is_none());
}

#[test]
fn api_token_is_not_serialized() {
    let conn = open_db_in_memory().unwrap();
    let user = UserService::sqlite(&conn)
        .register(&NewUser::new("Frodo", "frodo@shire.example"))
        .unwrap();

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["display_name"], "Frodo");
    assert!(json.get("api_token").is_none());
}

#[test]
fn registration_rejects_duplicates_and_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::sqlite(&conn);
    service
        .register(&NewUser::new("Sam", "sam@shire.example"))
        .unwrap();

    let err = service
        .register(&NewUser::new("Samwise", "SAM@shire.example"))
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::UnprocessableEntity);
    assert_eq!(err.messages(), vec!["Email has already been taken".to_string()]);

    let err = service
        .register(&NewUser::new("sam", "gamgee@shire.example"))
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Display name has already been taken".to_string()]
    );

    let err = service.register(&NewUser::new("", "nope")).unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "Display name can't be blank".to_string(),
            "Email is invalid".to_string()
        ]
    );
}
