//! Route-level tests against the in-memory store.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};

use blog_server::middleware::auth::session_cookie;
use blog_server::middleware::error::error_pages;
use blog_server::observability::RequestIdMiddleware;
use blog_server::{AppState, SiteSettings, handlers};
use blogicum_core::PostQuery;
use blogicum_core::domain::{
    Category, Comment, CommentChanges, NewCategory, NewComment, NewPost, NewUser, Post,
    PostChanges, User,
};
use blogicum_infra::{InMemoryStore, JwtConfig};

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(error_pages())
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(handlers::configure_routes),
        )
        .await
    };
}

fn state() -> AppState {
    let jwt = JwtConfig {
        secret: "route-test-secret".to_string(),
        ..JwtConfig::default()
    };
    AppState::in_memory(Arc::new(InMemoryStore::new()), jwt, SiteSettings::default())
}

async fn user(state: &AppState, username: &str) -> User {
    state
        .users
        .insert(NewUser::new(username.to_string(), String::new(), "!".to_string()))
        .await
        .unwrap()
}

fn session(state: &AppState, user: &User) -> Cookie<'static> {
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    session_cookie(token, 3600, false)
}

async fn category(state: &AppState, name: &str, is_published: bool) -> Category {
    state
        .categories
        .insert(NewCategory::new(name, is_published))
        .await
        .unwrap()
}

async fn post(
    state: &AppState,
    author: &User,
    title: &str,
    category: Option<&Category>,
    is_published: bool,
    minutes_ago: i64,
) -> Post {
    let changes = PostChanges {
        title: title.to_string(),
        content: format!("{title} content"),
        pub_date: Utc::now() - TimeDelta::minutes(minutes_ago),
        is_published,
        category_id: category.map(|c| c.id),
        location_id: None,
    };
    state
        .posts
        .insert(NewPost::new(author.id, changes))
        .await
        .unwrap()
}

async fn comment(state: &AppState, post: &Post, author: &User, text: &str) -> Comment {
    state
        .comments
        .insert(NewComment::new(
            post.id,
            author.id,
            CommentChanges {
                text: text.to_string(),
            },
        ))
        .await
        .unwrap()
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_health() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_empty_feed_shows_placeholder() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("No posts yet."));
    assert!(!body.contains("class=\"pagination\""));
}

#[actix_web::test]
async fn test_index_first_page_holds_ten_newest() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    for i in 0..25 {
        post(&state, &author, &format!("Title-{i:02}"), Some(&news), true, i).await;
    }
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;

    for i in 0..10 {
        assert!(body.contains(&format!("Title-{i:02}")), "missing Title-{i:02}");
    }
    assert!(!body.contains("Title-10"));
    assert!(body.contains("Page 1 of 3"));
}

#[actix_web::test]
async fn test_page_beyond_last_shows_last_page() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    for i in 0..25 {
        post(&state, &author, &format!("Title-{i:02}"), Some(&news), true, i).await;
    }
    let app = app!(state);

    for uri in ["/?page=99", "/?page=99999999999999999999999"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;

        assert!(body.contains("Page 3 of 3"), "{uri}");
        assert!(body.contains("Title-24"));
        assert!(!body.contains("Title-19"));
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?page=abc").to_request()).await;
    assert!(body_text(resp).await.contains("Page 1 of 3"));
}

#[actix_web::test]
async fn test_index_hides_posts_failing_visibility() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    let hidden = category(&state, "hidden", false).await;

    post(&state, &author, "Visible", Some(&news), true, 5).await;
    post(&state, &author, "Draft", Some(&news), false, 5).await;
    post(&state, &author, "Scheduled", Some(&news), true, -60).await;
    post(&state, &author, "InHiddenCategory", Some(&hidden), true, 5).await;
    post(&state, &author, "Uncategorized", None, true, 5).await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let body = body_text(resp).await;

    assert!(body.contains("Visible"));
    for title in ["Draft", "Scheduled", "InHiddenCategory", "Uncategorized"] {
        assert!(!body.contains(title), "{title} should be hidden");
    }
}

#[actix_web::test]
async fn test_index_shows_comment_count() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    let p = post(&state, &author, "Discussed", Some(&news), true, 5).await;
    comment(&state, &p, &author, "one").await;
    comment(&state, &p, &author, "two").await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert!(body_text(resp).await.contains("Comments: 2"));
}

#[actix_web::test]
async fn test_category_page() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    let travel = category(&state, "travel", true).await;
    category(&state, "secret", false).await;
    post(&state, &author, "NewsPost", Some(&news), true, 5).await;
    post(&state, &author, "TravelPost", Some(&travel), true, 5).await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/categories/category/news/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("NewsPost"));
    assert!(!body.contains("TravelPost"));

    for uri in ["/categories/category/secret/", "/categories/category/missing/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_unpublished_post_is_404_for_anonymous_with_request_id() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    let draft = post(&state, &author, "Draft", Some(&news), false, 5).await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/post/{}/", draft.id))
            .insert_header(("X-Request-ID", "req-42"))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-42");
    let body = body_text(resp).await;
    assert!(body.contains("req-42"));
    assert!(!body.contains("Draft content"));
}

#[actix_web::test]
async fn test_author_sees_own_unpublished_post() {
    let state = state();
    let author = user(&state, "alice").await;
    let other = user(&state, "bob").await;
    let draft = post(&state, &author, "Draft", None, false, 5).await;
    let app = app!(state);
    let uri = format!("/posts/post/{}/", draft.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .cookie(session(&state, &author))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Draft content"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .cookie(session(&state, &other))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_post_detail_lists_comments_oldest_first() {
    let state = state();
    let author = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    let p = post(&state, &author, "Discussed", Some(&news), true, 5).await;
    comment(&state, &p, &author, "first-comment").await;
    comment(&state, &p, &author, "second-comment").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(&format!("/posts/post/{}/", p.id)).to_request(),
    )
    .await;
    let body = body_text(resp).await;

    let first = body.find("first-comment").unwrap();
    let second = body.find("second-comment").unwrap();
    assert!(first < second);
}

#[actix_web::test]
async fn test_missing_post_and_bad_key_are_404() {
    let state = state();
    let app = app!(state);

    for uri in ["/posts/post/999/", "/posts/post/abc/", "/no/such/page/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_login_required_redirects_with_next() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/create/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fposts%2Fcreate%2F");
}

#[actix_web::test]
async fn test_create_post_sets_author_and_redirects_to_profile() {
    let state = state();
    let alice = user(&state, "alice").await;
    let news = category(&state, "news", true).await;
    let app = app!(state);

    let category_id = news.id.to_string();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .cookie(session(&state, &alice))
            .set_form([
                ("title", "Fresh"),
                ("content", "Body"),
                ("pub_date", ""),
                ("is_published", "on"),
                ("category", category_id.as_str()),
            ])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/user/alice/");

    let mine = PostQuery::all().by_author(alice.id);
    assert_eq!(state.posts.count(&mine).await.unwrap(), 1);
    assert_eq!(state.posts.count(&PostQuery::public(Utc::now())).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_profile_redirect_encodes_username() {
    let state = state();
    let lev = user(&state, "Лев").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .cookie(session(&state, &lev))
            .set_form([("title", "Привет"), ("content", "Body"), ("pub_date", "")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/user/%D0%9B%D0%B5%D0%B2/");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/user/%D0%9B%D0%B5%D0%B2/")
            .cookie(session(&state, &lev))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Привет"));
}

#[actix_web::test]
async fn test_invalid_post_form_is_rerendered_without_saving() {
    let state = state();
    let alice = user(&state, "alice").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .cookie(session(&state, &alice))
            .set_form([("title", "   "), ("content", "Body"), ("category", "777")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("This field is required."));
    assert_eq!(state.posts.count(&PostQuery::all()).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_edit_post_by_other_user_changes_nothing() {
    let state = state();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let original = post(&state, &alice, "Original", None, true, 5).await;
    let app = app!(state);
    let uri = format!("/posts/post/{}/edit/", original.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .cookie(session(&state, &bob))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", original.id));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(session(&state, &bob))
            .set_form([("title", "Hijacked"), ("content", "Nope")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", original.id));

    let stored = state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored, original);
}

#[actix_web::test]
async fn test_edit_post_by_author() {
    let state = state();
    let alice = user(&state, "alice").await;
    let original = post(&state, &alice, "Original", None, true, 5).await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/post/{}/edit/", original.id))
            .cookie(session(&state, &alice))
            .set_form([
                ("title", "Renamed"),
                ("content", "New body"),
                ("pub_date", "2024-05-01T10:30"),
            ])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", original.id));

    let stored = state.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Renamed");
    assert!(!stored.is_published);
    assert_eq!(stored.pub_date.to_rfc3339(), "2024-05-01T10:30:00+00:00");
}

#[actix_web::test]
async fn test_delete_post() {
    let state = state();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let target = post(&state, &alice, "Doomed", None, true, 5).await;
    comment(&state, &target, &bob, "bye").await;
    let app = app!(state);
    let uri = format!("/posts/post/{}/delete/", target.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(session(&state, &bob))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", target.id));
    assert!(state.posts.find_by_id(target.id).await.unwrap().is_some());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(state.posts.find_by_id(target.id).await.unwrap().is_some());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(state.posts.find_by_id(target.id).await.unwrap().is_none());
    assert!(state.comments.list_for_post(target.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_add_comment() {
    let state = state();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let target = post(&state, &alice, "Post", None, true, 5).await;
    let app = app!(state);
    let uri = format!("/posts/post/{}/comment/add/", target.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(session(&state, &bob))
            .set_form([("text", "Nice post")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", target.id));

    // Blank comments are dropped but still redirect.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(session(&state, &bob))
            .set_form([("text", "  ")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let comments = state.comments.list_for_post(target.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.text, "Nice post");
    assert_eq!(comments[0].author.id, bob.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/post/999/comment/add/")
            .cookie(session(&state, &bob))
            .set_form([("text", "Into the void")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_comment_of_other_user_changes_nothing() {
    let state = state();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let target = post(&state, &alice, "Post", None, true, 5).await;
    let bobs = comment(&state, &target, &bob, "original text").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/post/{}/comment/{}/edit/", target.id, bobs.id))
            .cookie(session(&state, &alice))
            .set_form([("text", "rewritten")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", target.id));
    let stored = state.comments.find_by_id(bobs.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "original text");
}

#[actix_web::test]
async fn test_delete_comment_of_other_user_keeps_it() {
    let state = state();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let target = post(&state, &alice, "Post", None, true, 5).await;
    let bobs = comment(&state, &target, &bob, "keep me").await;
    let app = app!(state);
    let delete_url = format!("/posts/post/{}/comment/{}/delete/", target.id, bobs.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&delete_url)
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", target.id));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&delete_url)
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", target.id));
    assert!(state.comments.find_by_id(bobs.id).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_edit_and_delete_own_comment() {
    let state = state();
    let alice = user(&state, "alice").await;
    let target = post(&state, &alice, "Post", None, true, 5).await;
    let mine = comment(&state, &target, &alice, "typo").await;
    let app = app!(state);
    let base = format!("/posts/post/{}/comment/{}", target.id, mine.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("{base}/edit/"))
            .cookie(session(&state, &alice))
            .set_form([("text", "fixed")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let stored = state.comments.find_by_id(mine.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "fixed");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("{base}/delete/"))
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/post/{}/", target.id));
    assert!(state.comments.find_by_id(mine.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_comment_under_wrong_post_is_404() {
    let state = state();
    let alice = user(&state, "alice").await;
    let first = post(&state, &alice, "First", None, true, 5).await;
    let second = post(&state, &alice, "Second", None, true, 5).await;
    let c = comment(&state, &first, &alice, "on first").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/post/{}/comment/{}/edit/", second.id, c.id))
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_visibility_depends_on_viewer() {
    let state = state();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    let news = category(&state, "news", true).await;
    post(&state, &alice, "PublicOne", Some(&news), true, 5).await;
    post(&state, &alice, "PrivateDraft", Some(&news), false, 5).await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/user/alice/")
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;
    let body = body_text(resp).await;
    assert!(body.contains("PublicOne"));
    assert!(body.contains("PrivateDraft"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/user/alice/")
            .cookie(session(&state, &bob))
            .to_request(),
    )
    .await;
    let body = body_text(resp).await;
    assert!(body.contains("PublicOne"));
    assert!(!body.contains("PrivateDraft"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/profile/user/nobody/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_profile_rename() {
    let state = state();
    let alice = user(&state, "alice").await;
    user(&state, "bob").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/edit/")
            .cookie(session(&state, &alice))
            .set_form([
                ("username", "bob"),
                ("first_name", ""),
                ("last_name", ""),
                ("email", ""),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("already exists"));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/profile/edit/")
            .cookie(session(&state, &alice))
            .set_form([
                ("username", "alicia"),
                ("first_name", "Alice"),
                ("last_name", "Liddell"),
                ("email", "alice@example.com"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/user/alicia/");
    assert!(resp.response().cookies().any(|c| c.name() == "blogicum_session"));

    let stored = state.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "alicia");
    assert_eq!(stored.email, "alice@example.com");
}

#[actix_web::test]
async fn test_registration_then_login() {
    let state = state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/registration/")
            .set_form([
                ("username", "carol"),
                ("email", ""),
                ("password1", "s3cret-pass"),
                ("password2", "s3cret-pass"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(resp.response().cookies().any(|c| c.name() == "blogicum_session"));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "carol"), ("password", "wrong-pass"), ("next", "")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Please enter a correct username and password"));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "carol"),
                ("password", "s3cret-pass"),
                ("next", "/posts/create/"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/posts/create/");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "carol"),
                ("password", "s3cret-pass"),
                ("next", "https://elsewhere.example/"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(location(&resp), "/");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "carol"),
                ("password", "s3cret-pass"),
                ("next", "/\t/elsewhere.example/"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_logout_clears_session() {
    let state = state();
    let alice = user(&state, "alice").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/logout/")
            .cookie(session(&state, &alice))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == "blogicum_session")
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}
