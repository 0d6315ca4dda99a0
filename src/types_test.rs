use super::*;
use serde_json::json;

#[test]
fn auth_response_parses_success_envelope() {
    let raw = json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "token": "tok1",
            "user": { "id": 1, "name": "A", "email": "a@b.com", "createdAt": "2024-01-01" }
        }
    });
    let resp: AuthResponse = serde_json::from_value(raw).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data.token, "tok1");
    assert_eq!(data.user.email, "a@b.com");
    assert_eq!(data.user.created_at, "2024-01-01");
}

#[test]
fn auth_response_parses_failure_without_data() {
    let raw = json!({ "success": false, "message": "Invalid email or password" });
    let resp: AuthResponse = serde_json::from_value(raw).unwrap();
    assert!(!resp.success);
    assert_eq!(resp.message, "Invalid email or password");
    assert!(resp.data.is_none());
}

#[test]
fn envelope_message_defaults_to_empty() {
    let resp: ApiResponse<Vec<Chat>> = serde_json::from_value(json!({ "success": true, "data": [] })).unwrap();
    assert_eq!(resp.message, "");
    assert_eq!(resp.data, Some(Vec::new()));
}

#[test]
fn failure_envelope_has_no_data() {
    let resp: ApiResponse<GeneratedCode> = ApiResponse::failure("Not authenticated");
    assert!(!resp.success);
    assert_eq!(resp.message, "Not authenticated");
    assert!(resp.data.is_none());
}

#[test]
fn user_profile_uses_camel_case() {
    let user = UserProfile { id: 3, name: "C".into(), email: "c@d.com".into(), created_at: "2024-02-02T00:00:00Z".into() };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["createdAt"], "2024-02-02T00:00:00Z");
    assert!(value.get("created_at").is_none());
}

#[test]
fn chat_detail_parses_messages_with_optional_language() {
    let raw = json!({
        "chat": { "id": 5, "title": "sort a list", "userId": 1, "createdAt": "t0", "updatedAt": "t1" },
        "messages": [
            { "id": 1, "chatId": 5, "role": "user", "content": "sort a list", "language": "python", "createdAt": "t0" },
            { "id": 2, "chatId": 5, "role": "assistant", "content": "sorted(xs)", "createdAt": "t1" }
        ]
    });
    let detail: ChatDetail = serde_json::from_value(raw).unwrap();
    assert_eq!(detail.chat.user_id, 1);
    assert_eq!(detail.messages.len(), 2);
    assert_eq!(detail.messages[0].role, Role::User);
    assert_eq!(detail.messages[0].language.as_deref(), Some("python"));
    assert_eq!(detail.messages[1].role, Role::Assistant);
    assert!(detail.messages[1].language.is_none());
}

#[test]
fn generate_request_omits_missing_chat_id() {
    let req = GenerateRequest { prompt: "hello".into(), language: "rust".into(), chat_id: None };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value, json!({ "prompt": "hello", "language": "rust" }));
}

#[test]
fn generate_request_includes_chat_id() {
    let req = GenerateRequest { prompt: "hello".into(), language: "rust".into(), chat_id: Some(9) };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["chatId"], 9);
}

#[test]
fn chat_detail_accepts_null_messages() {
    let raw = json!({
        "chat": { "id": 5, "title": "t", "userId": 9, "createdAt": "a", "updatedAt": "b" },
        "messages": null
    });
    let detail: ChatDetail = serde_json::from_value(raw).unwrap();
    assert!(detail.messages.is_empty());
}

#[test]
fn chat_detail_accepts_missing_messages() {
    let raw = json!({ "chat": { "id": 5, "title": "t", "userId": 9, "createdAt": "a", "updatedAt": "b" } });
    let detail: ChatDetail = serde_json::from_value(raw).unwrap();
    assert!(detail.messages.is_empty());
}
