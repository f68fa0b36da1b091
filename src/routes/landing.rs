use axum::extract::{RawQuery, State};
use axum::response::Html;
use htmlescape::encode_minimal;

use crate::startup::AppState;

/// What the signup card shows when the page is loaded after a form post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStatus {
    Success,
    Filtered,
    Invalid,
    Fallback,
    Failed,
}

impl SignupStatus {
    /// `signup` wins; a bare `email` parameter means an old GET form sent the address.
    pub fn from_query(signup: Option<&str>, legacy_email: bool) -> Option<Self> {
        let tag = match signup {
            Some(tag) => tag,
            None if legacy_email => "fallback",
            None => return None,
        };
        match tag {
            "" => None,
            "success" | "success-static" => Some(Self::Success),
            "filtered" => Some(Self::Filtered),
            "invalid" => Some(Self::Invalid),
            "fallback" => Some(Self::Fallback),
            _ => Some(Self::Failed),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Thank you. Your email was recorded successfully.",
            Self::Filtered => "Submission was flagged as spam. Please refresh and try again.",
            Self::Invalid => "Please enter a valid email address.",
            Self::Fallback => {
                "Your browser submitted without JavaScript. Please submit one more time."
            }
            Self::Failed => "Could not save your email. Please try again.",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Value of `key` if it appears exactly once; repeated keys count as absent.
fn single_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str());
    match (values.next(), values.next()) {
        (Some(value), None) => Some(value),
        _ => None,
    }
}

fn status_from_query(query: Option<&str>) -> Option<SignupStatus> {
    let pairs: Vec<(String, String)> = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    SignupStatus::from_query(
        single_value(&pairs, "signup"),
        single_value(&pairs, "email").is_some(),
    )
}

const SIGNUP_SCRIPT: &str = r#"
(function () {
  var EMAIL = /^[^\s@]+@[^\s@]+\.[^\s@]+$/;
  var KEY = "figleaffits.waitlist";
  var form = document.querySelector(".signup-form");
  var status = document.querySelector(".signup-status");
  if (!form || !window.fetch) { return; }
  function show(kind, text) {
    status.className = "signup-status " + kind;
    status.textContent = text;
  }
  function keep(email) {
    try {
      var list = JSON.parse(window.localStorage.getItem(KEY) || "[]");
      if (list.indexOf(email) === -1) {
        list.push(email);
        window.localStorage.setItem(KEY, JSON.stringify(list));
      }
    } catch (e) {}
  }
  form.addEventListener("submit", function (event) {
    event.preventDefault();
    var email = form.email.value.trim().toLowerCase();
    if (!EMAIL.test(email)) { show("error", "Please enter a valid email address."); return; }
    var button = form.querySelector("button");
    button.disabled = true;
    button.textContent = "Saving...";
    fetch("/api/subscribe", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ email: email, hp: form.hp.value })
    }).then(function (response) {
      return response.json().then(function (data) {
        if (!response.ok || !data.ok) {
          show("error", data.error || "Could not save your email. Please try again.");
        } else if (data.destination === "filtered") {
          show("error", "Submission was flagged as spam. Please refresh and try again.");
        } else if (data.destination === "static") {
          keep(email);
          show("success", "Thank you. Your email was recorded on this device.");
          form.reset();
        } else {
          show("success", "Thank you. Your email was recorded successfully.");
          form.reset();
        }
      });
    }).catch(function () {
      show("error", "Network error. Please try again.");
    }).then(function () {
      button.disabled = false;
      button.textContent = "Join waitlist";
    });
  });
})();
"#;

#[tracing::instrument(name = "Rendering the landing page", skip_all)]
pub async fn landing_page(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let status = status_from_query(query.as_deref());
    let page = &state.page;

    let (status_class, status_html) = match status {
        Some(s) if s.is_success() => ("signup-status success", encode_minimal(s.message())),
        Some(s) => ("signup-status error", encode_minimal(s.message())),
        None => ("signup-status", String::new()),
    };
    let thank_you_html = if status.is_some_and(|s| s.is_success()) {
        format!(
            r#"<div class="thank-you-note" role="status">Thank you for signing up. You are officially on the {} waitlist.</div>"#,
            encode_minimal(&page.brand)
        )
    } else {
        String::new()
    };
    let brand = encode_minimal(&page.brand);
    let headline = encode_minimal(&page.headline);
    let tagline = encode_minimal(&page.tagline);
    let launch_status = encode_minimal(&page.launch_status);
    let footer = encode_minimal(&page.footer);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{brand}</title>
</head>
<body>
<main>
    <header class="brand-strip"><p class="brand-mark">{brand}</p></header>
    <section class="hero" aria-labelledby="hero-title">
        <h1 id="hero-title" class="display-title">{headline}</h1>
        <p class="hero-copy">{tagline}</p>
        <div class="coming-chip" role="status">{launch_status}</div>
    </section>
    <section class="signup-card" aria-labelledby="signup-title">
        <h2 id="signup-title">Sign up for our waitlist</h2>
        <form class="signup-form" method="post" action="/api/subscribe" novalidate>
            <label for="email" class="sr-only">Email address</label>
            <input id="email" name="email" type="email" inputmode="email" autocomplete="email"
                required placeholder="you@example.com">
            <label for="contact-check" class="sr-only">Leave this field blank</label>
            <input id="contact-check" name="hp" type="text" tabindex="-1"
                autocomplete="new-password" class="honeypot" aria-hidden="true">
            <button class="submit-button" type="submit">Join waitlist</button>
        </form>
        <p class="{status_class}" role="status" aria-live="polite">{status_html}</p>
        {thank_you_html}
    </section>
    <footer class="legal-note">{footer}</footer>
</main>
<script>{SIGNUP_SCRIPT}</script>
</body>
</html>"#
    ))
}
