mod common;

use common::{ACCESS_TOKEN, spawn_app, spawn_demo_app};
use devhub::{
    api::operations::{AuthOperations, ChatOperations, PostOperations, UserOperations},
    api::schema::ListQuery,
    error::ClientError,
    forms::{LoginForm, PostForm},
    router::{Navigation, Route, navigate},
    storage::{
        LocalStorage,
        keys::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY},
    },
};

fn login_form() -> LoginForm {
    LoginForm {
        email: "ada@example.com".into(),
        password: "secret-123".into(),
    }
}

#[tokio::test]
async fn test_invalid_login_form_makes_no_request() {
    let app = spawn_app().await;
    let form = LoginForm {
        email: "not-an-email".into(),
        password: "secret-123".into(),
    };

    let err = AuthOperations::login(&app.state, &form).await.unwrap_err();
    assert_eq!(err.user_message(), "Please enter a valid email address");
    assert_eq!(app.backend.recorder.hits(), 0);
    assert!(!app.state.auth.is_authenticated());
}

#[tokio::test]
async fn test_login_stores_session_and_sends_bearer() {
    let app = spawn_app().await;

    let route = AuthOperations::login(&app.state, &login_form()).await.unwrap();
    assert_eq!(route, Route::Dashboard);
    assert_eq!(
        app.storage.get_item(ACCESS_TOKEN_KEY).unwrap().as_deref(),
        Some(ACCESS_TOKEN)
    );
    assert_eq!(
        app.storage.get_item(REFRESH_TOKEN_KEY).unwrap().as_deref(),
        Some("ref-1")
    );
    // 登录请求本身不带令牌
    assert_eq!(app.backend.recorder.last_authorization(), None);

    let user = AuthOperations::me(&app.state).await.unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(
        app.backend.recorder.last_authorization(),
        Some(format!("Bearer {}", ACCESS_TOKEN))
    );
}

#[tokio::test]
async fn test_demo_login_stores_session_without_network() {
    let app = spawn_demo_app().await;
    let form = LoginForm {
        email: "grace@example.com".into(),
        password: "123456".into(),
    };

    let route = AuthOperations::login(&app.state, &form).await.unwrap();
    assert_eq!(route, Route::Dashboard);
    for key in [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
        assert!(app.storage.get_item(key).unwrap().is_some(), "{} not stored", key);
    }
    assert!(app.state.auth.is_authenticated());
    assert_eq!(app.backend.recorder.hits(), 0);
    assert_eq!(
        navigate("/login", &app.state.auth),
        Navigation::Redirect(Route::Dashboard)
    );
}

#[tokio::test]
async fn test_backend_error_message_reaches_user() {
    let app = spawn_app().await;
    let form = LoginForm {
        email: "ada@example.com".into(),
        password: "wrong-password".into(),
    };

    let err = AuthOperations::login(&app.state, &form).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 400, .. }));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!app.state.auth.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_storage_and_guards_routes() {
    let app = spawn_app().await;
    AuthOperations::login(&app.state, &login_form()).await.unwrap();
    assert_eq!(
        navigate("/dashboard", &app.state.auth),
        Navigation::Render(Route::Dashboard)
    );

    let route = AuthOperations::logout(&app.state).await.unwrap();
    assert_eq!(route, Route::Login);
    for key in [USER_KEY, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
        assert_eq!(app.storage.get_item(key).unwrap(), None);
    }
    assert!(
        app.backend
            .recorder
            .requests()
            .iter()
            .any(|(path, _)| path == "/api/auth/logout")
    );
    assert_eq!(
        navigate("/dashboard", &app.state.auth),
        Navigation::Redirect(Route::Login)
    );
    assert_eq!(
        navigate("/admin/users", &app.state.auth),
        Navigation::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_mutations_require_session_locally() {
    let app = spawn_app().await;
    let form = PostForm {
        title: "Hello".into(),
        content: "World".into(),
        ..PostForm::default()
    };

    let err = PostOperations::create(&app.state, &form).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(app.backend.recorder.hits(), 0);
}

#[tokio::test]
async fn test_post_list_get_and_create() {
    let app = spawn_app().await;

    let posts = PostOperations::list(&app.state, &ListQuery::search("rust"))
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "p-1");

    let post = PostOperations::get(&app.state, "p-9").await.unwrap();
    assert_eq!(post.title, "Bare post");

    // 路径参数按段编码，后端解码后得到原始 ID
    let post = PostOperations::get(&app.state, "draft 1/v2").await.unwrap();
    assert_eq!(post.id, "draft 1/v2");
    let (path, _) = app.backend.recorder.requests().pop().unwrap();
    assert_eq!(path, "/api/posts/draft%201%2Fv2");

    AuthOperations::login(&app.state, &login_form()).await.unwrap();
    let form = PostForm {
        title: "Lifetimes".into(),
        content: "A gentle introduction".into(),
        tags: "Rust, #rust, beginners".into(),
        ..PostForm::default()
    };
    let created = PostOperations::create(&app.state, &form).await.unwrap();
    assert_eq!(created.id, "p-new");
    assert_eq!(created.tags, vec!["rust", "beginners"]);
}

#[tokio::test]
async fn test_status_mapping_for_missing_and_unauthorized() {
    let app = spawn_app().await;

    let err = PostOperations::get(&app.state, "missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    AuthOperations::login(&app.state, &login_form()).await.unwrap();
    let err = ChatOperations::rooms(&app.state).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(err.user_message(), "Please sign in to continue.");
}

#[tokio::test]
async fn test_user_search_skips_short_queries() {
    let app = spawn_app().await;

    let users = UserOperations::search(&app.state, " a ").await.unwrap();
    assert!(users.is_empty());
    assert_eq!(app.backend.recorder.hits(), 0);

    let users = UserOperations::search(&app.state, "ada").await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "ada");
    assert_eq!(app.backend.recorder.hits(), 1);
}
