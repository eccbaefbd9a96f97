//! Full lifecycle against a live server on a real socket.
//!
//! # Design
//! Starts the server on a random port with an in-memory SQLite store, then
//! drives it over HTTP with ureq, so routing, header extraction, JSON
//! encoding and the SQL store are exercised together.

use std::sync::Arc;

use tasklist_core::{TodoPublic, TodosResponse, User};
use tasklist_server::{SqliteStore, USER_ID_HEADER};

struct Client {
    agent: ureq::Agent,
    base: String,
}

impl Client {
    fn new(base: String) -> Self {
        // 4xx/5xx come back as data so each step can assert on the status
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, base }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn get(&self, path: &str, owner: &str) -> (u16, String) {
        let response = self
            .agent
            .get(&self.url(path))
            .header(USER_ID_HEADER, owner)
            .call()
            .expect("HTTP transport error");
        read(response)
    }

    fn send(&self, method: &str, path: &str, owner: &str, body: &str) -> (u16, String) {
        let url = self.url(path);
        let response = match method {
            "POST" => self
                .agent
                .post(&url)
                .header(USER_ID_HEADER, owner)
                .content_type("application/json")
                .send(body.as_bytes()),
            "PUT" => self
                .agent
                .put(&url)
                .header(USER_ID_HEADER, owner)
                .content_type("application/json")
                .send(body.as_bytes()),
            "DELETE" => self.agent.delete(&url).header(USER_ID_HEADER, owner).call(),
            other => panic!("unsupported method: {other}"),
        }
        .expect("HTTP transport error");
        read(response)
    }
}

fn read(mut response: ureq::http::Response<ureq::Body>) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (status, body)
}

#[test]
fn crud_lifecycle() {
    // Step 1: start the server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let store = Arc::new(SqliteStore::in_memory().await.unwrap());
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            tasklist_server::run(listener, store, std::future::pending()).await
        })
        .unwrap();
    });

    let client = Client::new(format!("http://{addr}"));

    // Step 2: register and log in to learn the user id.
    let (status, body) = client.send("POST", "/user", "", r#"{"username":"grace"}"#);
    assert_eq!(status, 200);
    let user: User = serde_json::from_str(&body).unwrap();

    let (status, body) = client.send("POST", "/login?username=grace", "", "");
    assert_eq!(status, 200);
    let login: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(login["user_id"], user.id.as_str());
    let owner = user.id.as_str();

    // Step 3: list is empty.
    let (status, body) = client.get("/todo", owner);
    assert_eq!(status, 200);
    let page: TodosResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(page.todos_total, 0);

    // Step 4: create six todos.
    let mut ids = Vec::new();
    for i in 0..6 {
        let body = format!(r#"{{"task":"item {i}","deadline":"2024020{}","priority":{}}}"#, i + 1, i % 3);
        let (status, body) = client.send("POST", "/todo", owner, &body);
        assert_eq!(status, 201);
        let todo: TodoPublic = serde_json::from_str(&body).unwrap();
        ids.push(todo.id);
    }

    // Step 5: list sorted by deadline, newest first, second page.
    let (status, body) = client.get("/todo?page_index=1&sort_by=deadline&sort_order=desc", owner);
    assert_eq!(status, 200);
    let page: TodosResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(page.todos_total, 6);
    assert_eq!(page.todos_pages, 2);
    assert_eq!(page.todos.len(), 1);
    assert_eq!(page.todos[0].id, ids[0]);

    // Step 6: rejected sort.
    let (status, _) = client.get("/todo?sort_by=owner&sort_order=asc", owner);
    assert_eq!(status, 400);

    // Step 7: update and fetch.
    let path = format!("/todo/{}", ids[2]);
    let (status, body) = client.send("PUT", &path, owner, r#"{"is_done":1}"#);
    assert_eq!(status, 200);
    let updated: TodoPublic = serde_json::from_str(&body).unwrap();
    assert_eq!(updated.is_done, 1);
    assert_eq!(updated.task, "item 2");

    // Step 8: another tenant cannot see it.
    let (status, _) = client.get(&path, "someone-else");
    assert_eq!(status, 404);

    // Step 9: delete, then delete again.
    let (status, _) = client.send("DELETE", &path, owner, "");
    assert_eq!(status, 200);
    let (status, _) = client.send("DELETE", &path, owner, "");
    assert_eq!(status, 404);

    let (_, body) = client.get("/todo", owner);
    let page: TodosResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(page.todos_total, 5);
    assert_eq!(page.todos_pages, 1);
}
