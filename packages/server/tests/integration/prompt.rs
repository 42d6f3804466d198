use serde_json::json;

use crate::common::{TestApp, ids, routes};

mod submission {
    use super::*;

    #[tokio::test]
    async fn submission_is_stored_as_pending() {
        let app = TestApp::spawn().await;
        let token = app.member_token("alice").await;

        let res = app
            .post_with_token(
                routes::PROMPTS,
                &json!({
                    "title": "Murmur coach",
                    "prompt_text": "Quiz me on systolic murmurs.",
                    "category": "Clinical Students",
                    "selected_tags": ["Clerkship Prep"],
                    "custom_tags": " Cardiology , ,Clerkship Prep",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "pending");
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["category"], "Clinical Students");
        assert_eq!(res.body["tags"], json!(["Cardiology", "Clerkship Prep"]));
    }

    #[tokio::test]
    async fn submission_without_tags_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.member_token("alice").await;

        let res = app
            .post_with_token(
                routes::PROMPTS,
                &json!({
                    "title": "No tags",
                    "prompt_text": "Some text",
                    "category": "Residents",
                    "selected_tags": [],
                    "custom_tags": " , ",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn predefined_tag_from_another_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.member_token("alice").await;

        let res = app
            .post_with_token(
                routes::PROMPTS,
                &json!({
                    "title": "Wrong tag",
                    "prompt_text": "Some text",
                    "category": "Residents",
                    "selected_tags": ["USMLE Step1"],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.member_token("alice").await;

        let res = app
            .post_with_token(
                routes::PROMPTS,
                &json!({
                    "title": "Where",
                    "prompt_text": "Some text",
                    "category": "Attendings",
                    "custom_tags": "x",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn anonymous_callers_cannot_submit() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::PROMPTS,
                &json!({
                    "title": "Anon",
                    "prompt_text": "Some text",
                    "category": "Miscellaneous",
                    "custom_tags": "x",
                }),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn categories_list_their_predefined_tags() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::CATEGORIES).await;

        assert_eq!(res.status, 200);
        let categories = res.body.as_array().unwrap();
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[3]["category"], "Miscellaneous");
        assert_eq!(categories[3]["predefined_tags"], json!([]));
        let residents = categories
            .iter()
            .find(|c| c["category"] == "Residents")
            .unwrap();
        assert!(
            residents["predefined_tags"]
                .as_array()
                .unwrap()
                .contains(&json!("Fellowship Coach"))
        );
    }

    #[tokio::test]
    async fn tag_list_only_covers_approved_prompts() {
        let app = TestApp::spawn().await;
        app.published_prompt("Query tuning", "PostgreSQL, Databases").await;
        let member = app.member_token("alice").await;
        app.submit_prompt(&member, "Unreviewed", "Secret").await;

        let res = app.get_without_token(routes::PROMPT_TAGS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["tags"], json!(["Databases", "PostgreSQL"]));
    }
}

mod library {
    use super::*;

    #[tokio::test]
    async fn tag_filter_matches_substrings() {
        let app = TestApp::spawn().await;
        let pg = app.published_prompt("Query tuning", "PostgreSQL").await;
        app.published_prompt("Anatomy", "Limbs").await;

        let res = app
            .get_without_token(&format!("{}?tags=SQL", routes::PROMPTS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(ids(&res), vec![pg]);
        assert_eq!(res.body["total"], 1);
    }

    #[tokio::test]
    async fn every_selected_tag_must_match() {
        let app = TestApp::spawn().await;
        let both = app.published_prompt("Both", "cardiology, pharmacology").await;
        app.published_prompt("One", "cardiology").await;

        let res = app
            .get_without_token(&format!("{}?tags=Cardiology,Pharmacology", routes::PROMPTS))
            .await;

        assert_eq!(ids(&res), vec![both]);
    }

    #[tokio::test]
    async fn search_matches_title_or_text_case_insensitively() {
        let app = TestApp::spawn().await;
        let murmur = app.published_prompt("Murmur drill", "cardiology").await;
        app.published_prompt("Fracture review", "ortho").await;

        let res = app
            .get_without_token(&format!("{}?search=MURMUR", routes::PROMPTS))
            .await;
        assert_eq!(ids(&res), vec![murmur]);

        // Text is "<title>: explain it step by step."
        let res = app
            .get_without_token(&format!("{}?search=step%20by", routes::PROMPTS))
            .await;
        assert_eq!(res.body["total"], 2);
    }

    #[tokio::test]
    async fn best_rated_prompts_come_first() {
        let app = TestApp::spawn().await;
        let low = app.published_prompt("Low", "x").await;
        let high = app.published_prompt("High", "x").await;
        let voter = app.member_token("voter").await;
        app.post_with_token(&routes::vote(low), &json!({"star": 2}), &voter)
            .await;
        app.post_with_token(&routes::vote(high), &json!({"star": 5}), &voter)
            .await;

        let res = app.get_without_token(routes::PROMPTS).await;

        assert_eq!(ids(&res), vec![high, low]);
        assert_eq!(res.body["data"][0]["avg_rating"], 5.0);
        assert_eq!(res.body["data"][0]["vote_count"], 1);
    }

    #[tokio::test]
    async fn logged_in_callers_see_their_vote() {
        let app = TestApp::spawn().await;
        let id = app.published_prompt("Rated", "x").await;
        let voter = app.member_token("voter").await;
        app.post_with_token(&routes::vote(id), &json!({"star": 4}), &voter)
            .await;

        let mine = app.get_with_token(routes::PROMPTS, &voter).await;
        assert_eq!(mine.body["data"][0]["my_vote"], 4);

        let other = app.member_token("other").await;
        let theirs = app.get_with_token(routes::PROMPTS, &other).await;
        assert_eq!(theirs.body["data"][0]["my_vote"], 0);

        let anonymous = app.get_without_token(routes::PROMPTS).await;
        assert!(anonymous.body["data"][0].get("my_vote").is_none());
    }
}
