mod common;

use anyhow::Result;
use reqwest::{header::SET_COOKIE, StatusCode};

use proker_tracker_api::auth::{self, Claims};
use proker_tracker_api::database::models::User;

fn sample_user(id: i64) -> User {
    User {
        id,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        organization_name: Some("Test Org".to_string()),
        role: Some("anggota".to_string()),
        profile_image: None,
    }
}

fn mint_token(secret: &str, id: i64) -> String {
    auth::issue_token(&Claims::new(&sample_user(id), 1), Some(secret)).unwrap()
}

#[tokio::test]
async fn missing_cookie_is_unauthenticated() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in ["/api/users", "/api/auth/me", "/api/departments", "/api/stats"] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {}", path);
        // No credential was presented, so nothing should be cleared
        assert!(res.headers().get(SET_COOKIE).is_none(), "path {}", path);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Tidak terautentikasi");
    }
    Ok(())
}

#[tokio::test]
async fn forged_cookie_is_rejected_and_cleared() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Signed with a different secret than the server's
    let token = mint_token("attacker-controlled-secret", 1);

    let res = client
        .get(format!("{}/api/users", server.base_url))
        .header("Cookie", format!("{}={}", auth::AUTH_COOKIE, token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let set_cookie = res
        .headers()
        .get(SET_COOKIE)
        .expect("invalid session must instruct cookie removal")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with(&format!("{}=", auth::AUTH_COOKIE)));

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Sesi tidak valid");
    Ok(())
}

#[tokio::test]
async fn malformed_cookie_is_rejected_and_cleared() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/me", server.base_url))
        .header("Cookie", format!("{}=definitely-not-a-jwt", auth::AUTH_COOKIE))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(SET_COOKIE).is_some());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Sesi tidak valid");
    Ok(())
}

#[tokio::test]
async fn valid_token_for_deleted_user_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        eprintln!("skipping: database not reachable from the test server");
        return Ok(());
    }
    let client = reqwest::Client::new();

    // Correct secret, but a subject id no fixture will ever use
    let token = mint_token(common::JWT_SECRET, i64::MAX - 7);

    let res = client
        .get(format!("{}/api/auth/me", server.base_url))
        .header("Cookie", format!("{}={}", auth::AUTH_COOKIE, token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Pengguna tidak ditemukan");
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "budi@example.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Email dan password diperlukan");
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie_without_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/logout", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res
        .headers()
        .get(SET_COOKIE)
        .expect("logout must clear the session cookie")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with(&format!("{}=", auth::AUTH_COOKIE)));

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Logout berhasil");
    Ok(())
}
