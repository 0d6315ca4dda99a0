use super::*;
use serde_json::json;
use std::sync::Mutex;

/// Records every call and replays queued results in order.
#[derive(Default)]
struct MockGateway {
    calls: Mutex<Vec<(Endpoint, RequestOptions)>>,
    responses: Mutex<Vec<Result<Value, ApiError>>>,
}

impl MockGateway {
    fn with(responses: Vec<Result<Value, ApiError>>) -> Self {
        Self { calls: Mutex::new(Vec::new()), responses: Mutex::new(responses) }
    }

    fn calls(&self) -> Vec<(Endpoint, RequestOptions)> {
        self.calls.lock().expect("mock mutex should lock").clone()
    }
}

#[async_trait::async_trait]
impl ApiGateway for MockGateway {
    async fn request(&self, endpoint: Endpoint, options: RequestOptions) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .expect("mock mutex should lock")
            .push((endpoint, options));
        let mut responses = self.responses.lock().expect("mock mutex should lock");
        if responses.is_empty() {
            Ok(json!({ "success": true }))
        } else {
            responses.remove(0)
        }
    }
}

fn login_success(token: &str) -> Value {
    json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "token": token,
            "user": { "id": 1, "name": "A", "email": "a@b.com", "createdAt": "2024-01-01" }
        }
    })
}

fn login_data() -> LoginData {
    LoginData { email: "a@b.com".into(), password: "secret123".into() }
}

fn service(responses: Vec<Result<Value, ApiError>>) -> AuthService<MockGateway> {
    AuthService::new(MockGateway::with(responses), Arc::new(SessionStore::in_memory()))
}

// =============================================================================
// signup / login
// =============================================================================

#[tokio::test]
async fn login_stores_token_user_and_cookie() {
    let auth = service(vec![Ok(login_success("tok1"))]);
    let resp = auth.login(&login_data()).await.unwrap();

    assert!(resp.success);
    let session = auth.session();
    assert_eq!(session.get_token().as_deref(), Some("tok1"));
    let user = session.get_user().unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.created_at, "2024-01-01");
    assert_eq!(session.cookie_token().as_deref(), Some("tok1"));
}

#[tokio::test]
async fn login_sends_credentials_to_login_endpoint() {
    let auth = service(vec![Ok(login_success("tok1"))]);
    auth.login(&login_data()).await.unwrap();

    let calls = auth.gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Endpoint::Login);
    assert_eq!(calls[0].1.body, Some(json!({ "email": "a@b.com", "password": "secret123" })));
    assert_eq!(calls[0].1.header_value("Authorization"), None);
}

#[tokio::test]
async fn login_then_generate_carries_bearer_token() {
    let auth = service(vec![
        Ok(login_success("tok1")),
        Ok(json!({ "success": true, "data": { "chatId": 4, "code": "print(1)" } })),
    ]);
    auth.login(&login_data()).await.unwrap();
    let resp = auth.generate_code("print one", "python", None).await.unwrap();

    assert_eq!(resp.data, Some(GeneratedCode { chat_id: 4, code: "print(1)".into() }));
    let calls = auth.gateway.calls();
    assert_eq!(calls[1].0, Endpoint::Generate);
    assert_eq!(calls[1].1.header_value("Authorization"), Some("Bearer tok1"));
}

#[tokio::test]
async fn signup_stores_session_on_success() {
    let auth = service(vec![Ok(login_success("fresh"))]);
    let data = SignupData { name: "A".into(), email: "a@b.com".into(), password: "secret123".into() };
    let resp = auth.signup(&data).await.unwrap();

    assert!(resp.success);
    assert_eq!(auth.session().get_token().as_deref(), Some("fresh"));
    let calls = auth.gateway.calls();
    assert_eq!(calls[0].0, Endpoint::Signup);
    assert_eq!(calls[0].1.body.as_ref().unwrap()["name"], "A");
}

#[tokio::test]
async fn application_failure_is_returned_not_stored() {
    let auth = service(vec![Ok(json!({ "success": false, "message": "Invalid email or password" }))]);
    let resp = auth.login(&login_data()).await.unwrap();

    assert!(!resp.success);
    assert_eq!(resp.message, "Invalid email or password");
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn success_without_data_does_not_store() {
    let auth = service(vec![Ok(json!({ "success": true, "message": "ok" }))]);
    let resp = auth.login(&login_data()).await.unwrap();
    assert!(resp.success);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn transport_error_propagates_unchanged() {
    let err = ApiError::Status { status: 401, message: "Invalid credentials".into() };
    let auth = service(vec![Err(err.clone())]);
    assert_eq!(auth.login(&login_data()).await.unwrap_err(), err);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn malformed_envelope_is_decode_error() {
    let auth = service(vec![Ok(json!({ "unexpected": true }))]);
    assert!(matches!(auth.login(&login_data()).await, Err(ApiError::Decode(_))));
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_clears_session_without_network() {
    let auth = service(vec![Ok(login_success("tok1"))]);
    auth.login(&login_data()).await.unwrap();
    auth.logout();

    assert_eq!(auth.session().get_token(), None);
    assert_eq!(auth.session().get_user(), None);
    assert_eq!(auth.session().cookie_token(), None);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.gateway.calls().len(), 1);
}

// =============================================================================
// unauthenticated short-circuit
// =============================================================================

#[tokio::test]
async fn reads_without_token_skip_network() {
    let auth = service(Vec::new());

    let chats = auth.get_chats().await.unwrap();
    assert!(!chats.success);
    assert_eq!(chats.message, NOT_AUTHENTICATED);

    let chat = auth.get_chat(3).await.unwrap();
    assert!(!chat.success);
    assert_eq!(chat.message, NOT_AUTHENTICATED);

    let generated = auth.generate_code("x", "rust", Some(3)).await.unwrap();
    assert!(!generated.success);
    assert_eq!(generated.message, NOT_AUTHENTICATED);
    assert!(generated.data.is_none());

    assert!(auth.gateway.calls().is_empty());
}

#[tokio::test]
async fn reads_after_logout_skip_network() {
    let auth = service(vec![Ok(login_success("tok1"))]);
    auth.login(&login_data()).await.unwrap();
    auth.logout();

    let resp = auth.get_chats().await.unwrap();
    assert_eq!(resp.message, NOT_AUTHENTICATED);
    assert_eq!(auth.gateway.calls().len(), 1);
}

// =============================================================================
// authenticated reads
// =============================================================================

fn authed(responses: Vec<Result<Value, ApiError>>) -> AuthService<MockGateway> {
    let auth = service(responses);
    auth.session().save(
        "tok9",
        &UserProfile { id: 9, name: "N".into(), email: "n@x.com".into(), created_at: "2024-01-01".into() },
    );
    auth
}

#[tokio::test]
async fn get_chats_decodes_list() {
    let auth = authed(vec![Ok(json!({
        "success": true,
        "data": [
            { "id": 1, "title": "first", "userId": 9, "createdAt": "a", "updatedAt": "b" },
            { "id": 2, "title": "second", "userId": 9, "createdAt": "c", "updatedAt": "d" }
        ]
    }))]);
    let resp = auth.get_chats().await.unwrap();
    let chats = resp.data.unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[1].title, "second");

    let calls = auth.gateway.calls();
    assert_eq!(calls[0].0, Endpoint::ListChats);
    assert_eq!(calls[0].1.header_value("authorization"), Some("Bearer tok9"));
    assert!(calls[0].1.body.is_none());
}

#[tokio::test]
async fn get_chat_targets_detail_endpoint() {
    let auth = authed(vec![Ok(json!({
        "success": true,
        "data": {
            "chat": { "id": 5, "title": "t", "userId": 9, "createdAt": "a", "updatedAt": "b" },
            "messages": []
        }
    }))]);
    let resp = auth.get_chat(5).await.unwrap();
    assert_eq!(resp.data.unwrap().chat.id, 5);
    assert_eq!(auth.gateway.calls()[0].0, Endpoint::ChatDetail(5));
}

#[tokio::test]
async fn get_chat_with_null_messages_is_empty() {
    let auth = authed(vec![Ok(json!({
        "success": true,
        "data": {
            "chat": { "id": 5, "title": "new chat", "userId": 9, "createdAt": "a", "updatedAt": "a" },
            "messages": null
        }
    }))]);
    let resp = auth.get_chat(5).await.unwrap();
    assert!(resp.success);
    let detail = resp.data.unwrap();
    assert_eq!(detail.chat.title, "new chat");
    assert!(detail.messages.is_empty());
}

#[tokio::test]
async fn generate_includes_chat_id_when_given() {
    let auth = authed(Vec::new());
    auth.generate_code("more", "go", Some(12)).await.unwrap();
    let body = auth.gateway.calls()[0].1.body.clone().unwrap();
    assert_eq!(body, json!({ "prompt": "more", "language": "go", "chatId": 12 }));
}

#[tokio::test]
async fn generate_omits_zero_chat_id() {
    let auth = authed(Vec::new());
    auth.generate_code("new", "go", Some(0)).await.unwrap();
    let body = auth.gateway.calls()[0].1.body.clone().unwrap();
    assert_eq!(body, json!({ "prompt": "new", "language": "go" }));
}

#[tokio::test]
async fn authenticated_read_error_propagates() {
    let auth = authed(vec![Err(ApiError::Network("Network error. Please check your connection.".into()))]);
    let err = auth.get_chats().await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(auth.is_authenticated(), "transport errors do not clear the session");
}

#[tokio::test]
async fn current_user_reads_session() {
    let auth = authed(Vec::new());
    assert_eq!(auth.current_user().map(|u| u.id), Some(9));
}
