//! Tests for #[derive(Action)]

use badgeflow::{Action, ActionCategory};

#[derive(badgeflow::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
enum TestAction {
    ApiGetData { url: String },
    ApiGetDataDidLoad(u32),
    ApiFormResultSuccess,
    #[action(category = "form")]
    FormDataPatched { form_id: String },
    FormSubmit { form_id: String },
    RouteChanged { href: String },
    ActiveActionCleared { view_id: String },
    #[action(name = "APP_WILL_MOUNT", skip_category)]
    AppWillMount,
    CloseModal,
}

#[test]
fn test_names_are_screaming_snake_case() {
    assert_eq!(
        TestAction::ApiGetData { url: "/v1/earner/badges".into() }.name(),
        "API_GET_DATA"
    );
    assert_eq!(TestAction::ApiGetDataDidLoad(1).name(), "API_GET_DATA_DID_LOAD");
    assert_eq!(TestAction::ApiFormResultSuccess.name(), "API_FORM_RESULT_SUCCESS");
    assert_eq!(TestAction::AppWillMount.name(), "APP_WILL_MOUNT");
    assert_eq!(TestAction::CloseModal.name(), "CLOSE_MODAL");
}

#[test]
fn test_inferred_categories() {
    assert_eq!(
        TestAction::ApiGetData { url: String::new() }.category(),
        Some("api")
    );
    assert_eq!(TestAction::ApiGetDataDidLoad(1).category(), Some("api"));
    assert_eq!(TestAction::ApiFormResultSuccess.category(), Some("api_form"));
    assert_eq!(
        TestAction::RouteChanged { href: "/".into() }.category(),
        Some("route")
    );
    assert_eq!(
        TestAction::ActiveActionCleared { view_id: "issuer".into() }.category(),
        Some("active_action")
    );
    assert_eq!(
        TestAction::FormSubmit { form_id: "f".into() }.category(),
        Some("form")
    );
    assert_eq!(TestAction::CloseModal.category(), None);
}

#[test]
fn test_explicit_category_and_skip() {
    let patched = TestAction::FormDataPatched { form_id: "f".into() };
    assert_eq!(patched.category(), Some("form"));
    assert_eq!(TestAction::AppWillMount.category(), None);
}

#[derive(badgeflow::Action, Clone, Debug)]
enum PlainAction {
    RouteChanged,
    #[action(category = "menu")]
    ClickCloseMenu,
}

#[test]
fn test_categories_without_inference() {
    assert_eq!(PlainAction::RouteChanged.category(), None);
    assert_eq!(PlainAction::ClickCloseMenu.category(), Some("menu"));
    assert_eq!(PlainAction::ClickCloseMenu.name(), "CLICK_CLOSE_MENU");
}
