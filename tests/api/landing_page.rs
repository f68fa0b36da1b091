use crate::helpers::{assert_is_redirected_to, spawn_app, spawn_app_without_webhook};

#[tokio::test]
async fn landing_page_has_a_form_that_works_without_javascript() {
    let app = spawn_app().await;

    let html = app.get_landing_page("").await;

    assert!(html.contains(r#"action="/api/subscribe""#));
    assert!(html.contains(r#"method="post""#));
    assert!(html.contains(r#"name="email""#));
    assert!(html.contains(r#"name="hp""#));
    assert!(html.contains(r#"<p class="signup-status" role="status" aria-live="polite"></p>"#));
    assert!(!html.contains("thank-you-note"));
}

#[tokio::test]
async fn form_round_trip_without_webhook_shows_success() {
    let app = spawn_app_without_webhook().await;

    let resp = app.post_form("email=ursula%40gmail.com&hp=").await;
    assert_is_redirected_to(&resp, "/?signup=success-static");

    let html = app.get_landing_page("?signup=success-static").await;
    assert!(html.contains(
        r#"class="signup-status success" role="status" aria-live="polite">Thank you. Your email was recorded successfully.</p>"#
    ));
    assert!(html.contains("thank-you-note"));
}

#[tokio::test]
async fn status_parameter_selects_the_message() {
    let app = spawn_app().await;
    let cases = vec![
        ("?signup=filtered", "Submission was flagged as spam. Please refresh and try again."),
        ("?signup=invalid", "Please enter a valid email address."),
        ("?signup=error", "Could not save your email. Please try again."),
        (
            "?email=ursula%40gmail.com",
            "Your browser submitted without JavaScript. Please submit one more time.",
        ),
    ];
    for (query, message) in cases {
        let html = app.get_landing_page(query).await;
        let status = format!(
            r#"class="signup-status error" role="status" aria-live="polite">{message}</p>"#
        );
        assert!(html.contains(&status), "{query} should show {message:?}");
        assert!(!html.contains("thank-you-note"), "{query} is not a success");
    }
}
