use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::catalog::{BookForm, CatalogQuery, SortDir, SortField};
use crate::client::{ApiClient, ClientError, Role, User};
use crate::session::{Action, Applied, Effect, Session};
use crate::shell::{parse_command, ShellCommand};

const ADMIN_AUTH: &str = r#"{"token":"abc123","type":"Bearer",
    "user":{"id":1,"username":"admin","email":"admin@bookstore.com","role":"ADMIN"}}"#;

const PAGE_ONE: &str = r#"{"content":[
    {"id":7,"title":"Dune","author":"Frank Herbert","publishedDate":"1965-08-01",
     "genre":"Science Fiction","price":9.99,"isbn":"9780441013593"},
    {"id":3,"title":"Beloved","author":"Toni Morrison","publishedDate":"1987-09-02",
     "genre":null,"price":14.5,"isbn":"1400033411"}],
    "totalPages":4,"totalElements":32,"number":1,"size":10}"#;

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 2048];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            if buf.len() >= end + 4 + content_length(&head) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serve `responses` in order, one connection each, and report every raw request.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);
            let response = if status == 204 {
                "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()
            } else {
                format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
            };
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{addr}/api"), rx)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn login_keeps_token_for_catalog_requests() {
    let (url, mut requests) = serve(vec![(200, ADMIN_AUTH), (200, PAGE_ONE)]).await;
    let mut api = client(&url);

    let auth = api.login("admin", "admin123").await.unwrap();
    assert_eq!(auth.token, "abc123");
    assert_eq!(auth.user.role, Role::Admin);
    assert_eq!(api.token(), Some("abc123"));

    let login = requests.recv().await.unwrap();
    assert!(login.starts_with("POST /api/auth/login "));
    assert!(login.contains(r#""username":"admin""#));
    assert!(login.contains(r#""password":"admin123""#));

    let query = CatalogQuery {
        size: 10,
        sort_by: SortField::Price,
        sort_dir: SortDir::Asc,
    };
    let page = api.list_books(&query, 1).await.unwrap();
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.total_elements, 32);
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[1].genre, None);
    assert_eq!(page.content[0].price.to_string(), "9.99");

    let list = requests.recv().await.unwrap();
    assert!(list.starts_with("GET /api/books?page=1&size=10&sortBy=price&sortDir=asc "));
    assert!(list.to_lowercase().contains("authorization: bearer abc123"));
}

#[tokio::test]
async fn field_errors_become_validation_message() {
    let body = r#"{"status":400,"error":"Validation Failed","message":"Input validation failed",
        "path":"/api/books","timestamp":"2024-01-01T00:00:00",
        "fieldErrors":{"isbn":"ISBN must be 10 or 13 digits"}}"#;
    let (url, mut requests) = serve(vec![(400, body)]).await;
    let api = client(&url).with_token("abc123");

    let form = BookForm {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        published_date: "1965-08-01".to_string(),
        genre: String::new(),
        price: "9.99".to_string(),
        isbn: "0441013597".to_string(),
    };
    let draft = form.validate().unwrap();
    let err = api.create_book(&draft).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message("Failed to create book"),
        "Validation error: ISBN must be 10 or 13 digits"
    );

    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("POST /api/books "));
    assert!(request.contains(r#""publishedDate":"1965-08-01""#));
    assert!(request.contains(r#""genre":null"#));
}

#[tokio::test]
async fn delete_accepts_empty_no_content_response() {
    let (url, mut requests) = serve(vec![(204, "")]).await;
    let api = client(&url).with_token("abc123");
    api.delete_book(7).await.unwrap();
    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("DELETE /api/books/7 "));
}

#[tokio::test]
async fn profile_resolves_user_from_token() {
    let body = r#"{"id":2,"username":"reader","email":"reader@bookstore.com","role":"USER"}"#;
    let (url, mut requests) = serve(vec![(200, body)]).await;
    let api = client(&url).with_token("tok");
    let user = api.profile().await.unwrap();
    assert_eq!(user.username, "reader");
    assert!(!user.role.is_admin());
    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("GET /api/users/profile "));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(&format!("http://{addr}/api")).with_token("t");
    let err = api.get_book(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
    assert_eq!(err.user_message("Failed to load book"), "Network error. Please try again.");
}

#[tokio::test]
async fn session_renders_fetched_page_and_edits_retained_record() {
    let (url, _requests) = serve(vec![(200, ADMIN_AUTH), (200, PAGE_ONE)]).await;
    let mut api = client(&url);
    let auth = api.login("admin", "admin123").await.unwrap();
    let mut session = Session::from_auth(auth, CatalogQuery::default());

    let request = session.reload();
    let page = api.list_books(&request.query, request.page).await.unwrap();
    assert_eq!(session.apply_page(request.ticket, page), Applied::Rendered);
    assert_eq!(session.paginator().total_pages(), 4);
    let ids: Vec<u64> = session.books().map(|b| b.id).collect();
    assert_eq!(ids, vec![7, 3]);

    match session.dispatch(Action::EditRequested(3)) {
        Effect::OpenEditor(state) => {
            assert_eq!(state.form.title, "Beloved");
            assert_eq!(state.form.genre, "");
            assert_eq!(state.form.price, "14.5");
        }
        other => panic!("expected editor, got {other:?}"),
    }
}

fn reader() -> User {
    User {
        id: 2,
        username: "reader".to_string(),
        email: "reader@bookstore.com".to_string(),
        role: Role::User,
    }
}

#[test]
fn shell_lines_drive_session_navigation() {
    let mut session = Session::new(reader(), CatalogQuery::default());
    let first = session.reload();
    let page = serde_json::from_str(PAGE_ONE).unwrap();
    assert_eq!(session.apply_page(first.ticket, page), Applied::Rendered);

    let ShellCommand::Dispatch(actions) = parse_command("page 3").unwrap() else {
        panic!("expected dispatch");
    };
    let effects: Vec<Effect> = actions.into_iter().map(|a| session.dispatch(a)).collect();
    assert!(matches!(effects.as_slice(), [Effect::Reload(r)] if r.page == 2));

    let ShellCommand::Dispatch(actions) = parse_command("page 9").unwrap() else {
        panic!("expected dispatch");
    };
    assert_eq!(session.dispatch(actions[0].clone()), Effect::None);
    assert_eq!(session.paginator().current_page(), 2);
}

#[test]
fn sort_command_resets_and_supersedes_earlier_fetch() {
    let mut session = Session::new(reader(), CatalogQuery::default());
    let first = session.reload();
    let page = serde_json::from_str(PAGE_ONE).unwrap();
    session.apply_page(first.ticket, page);
    session.dispatch(Action::LastPage);

    let ShellCommand::Dispatch(actions) = parse_command("sort author asc").unwrap() else {
        panic!("expected dispatch");
    };
    let reloads: Vec<_> = actions
        .into_iter()
        .filter_map(|a| match session.dispatch(a) {
            Effect::Reload(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(reloads.len(), 2);
    assert!(reloads.iter().all(|r| r.page == 0));
    let last = reloads[1];
    assert_eq!(last.query.sort_by, SortField::Author);
    assert_eq!(last.query.sort_dir, SortDir::Asc);

    let page = serde_json::from_str(PAGE_ONE).unwrap();
    assert_eq!(session.apply_page(reloads[0].ticket, page), Applied::Stale);
}

#[test]
fn readers_cannot_modify_catalog() {
    let mut session = Session::new(reader(), CatalogQuery::default());
    for line in ["add", "edit 7", "delete 7"] {
        let ShellCommand::Dispatch(actions) = parse_command(line).unwrap() else {
            panic!("expected dispatch for {line}");
        };
        assert!(matches!(session.dispatch(actions[0].clone()), Effect::Denied(_)));
    }
}
