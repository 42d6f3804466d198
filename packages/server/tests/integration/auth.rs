use serde_json::json;

use crate::common::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, routes};

mod admin_login {
    use super::*;

    #[tokio::test]
    async fn admin_can_log_in_with_correct_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["username"], ADMIN_USERNAME);
        assert_eq!(res.body["role"], "admin");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": ADMIN_USERNAME, "password": "not-it"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn member_account_cannot_use_admin_login() {
        let app = TestApp::spawn().await;
        app.member_token("alice").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "anything"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn blank_username_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": " ", "password": "x"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"username": "admin"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod slack_login {
    use super::*;

    #[tokio::test]
    async fn authorize_url_is_served() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::SLACK_AUTHORIZE_URL).await;

        assert_eq!(res.status, 200);
        assert!(res.body["url"].as_str().unwrap().contains("client_id="));
    }

    #[tokio::test]
    async fn valid_code_logs_in_as_member() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SLACK_CALLBACK, &json!({"code": "alice-code"}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["role"], "user");
    }

    #[tokio::test]
    async fn same_slack_user_keeps_one_account() {
        let app = TestApp::spawn().await;
        let body = json!({"code": "alice-code"});

        let first = app.post_without_token(routes::SLACK_CALLBACK, &body).await;
        let second = app.post_without_token(routes::SLACK_CALLBACK, &body).await;

        assert_eq!(first.body["user_id"], second.body["user_id"]);
    }

    #[tokio::test]
    async fn slack_user_named_like_the_admin_is_not_admin() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SLACK_CALLBACK,
                &json!({"code": format!("{ADMIN_USERNAME}-code")}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["role"], "user");
    }

    #[tokio::test]
    async fn rejected_code_reports_provider_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SLACK_CALLBACK, &json!({"code": "bogus"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "PROVIDER_REJECTED");
        assert!(res.body["message"].as_str().unwrap().contains("invalid_code"));
    }

    #[tokio::test]
    async fn empty_code_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SLACK_CALLBACK, &json!({"code": ""}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_session() {
        let app = TestApp::spawn().await;
        let token = app.member_token("alice").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["role"], "user");
    }

    #[tokio::test]
    async fn me_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
