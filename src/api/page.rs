//! The single-page form served at `/`.
//!
//! Everything dynamic happens in the browser against `/api/v1`; the server
//! only fills in the badge checkboxes and the model summary.

use axum::{extract::State, response::Html};

use crate::{models::Badge, services::ModelReport};

use super::AppState;

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Erranza Travel Archetype Finder</title>
<style>
body { font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }
aside { float: right; width: 14rem; padding: 0.75rem; border: 1px solid #ddd; border-radius: 6px; }
fieldset { border: none; padding: 0; columns: 2; }
label { display: block; margin: 0.2rem 0; }
.error { color: #b00020; }
.warning { color: #8a6d00; }
</style>
</head>
<body>
<aside>
<h3>Model Info</h3>
<p>Accuracy: <strong>{{accuracy}}</strong></p>
<p>Trained on {{dataset_size}} synthetic users using {{classifier}}.</p>
<h3>Account</h3>
<p id="account-status">Not logged in.</p>
<form id="login">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log In</button>
</form>
<details>
<summary>Create an account</summary>
<form id="register">
<label>Username <input type="text" name="username" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Register</button>
</form>
</details>
<button type="button" id="logout" hidden>Log Out</button>
<p id="account-message"></p>
</aside>
<h1>Erranza Travel Archetype Finder</h1>
<p>Find your travel vibe, get personalized archetype &amp; destination recommendations.</p>
<h3>Select the badges that reflect your travel preferences:</h3>
<form id="soulprint">
<fieldset>
{{badges}}
</fieldset>
<p><label>Your name <input type="text" name="name"></label></p>
<button type="submit">Get My Travel Archetype &amp; Places</button>
</form>
<div id="result"></div>
<script>
const TOKEN_KEY = "erranza_token";
const loginForm = document.getElementById("login");
const registerForm = document.getElementById("register");
const logoutButton = document.getElementById("logout");
const accountStatus = document.getElementById("account-status");
const accountMessage = document.getElementById("account-message");

function showAccount(user) {
  accountStatus.textContent = user ? "Logged in as " + user.username : "Not logged in.";
  loginForm.hidden = !!user;
  logoutButton.hidden = !user;
}

async function postJson(url, payload) {
  const response = await fetch(url, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(payload),
  });
  const body = await response.json();
  return { ok: response.ok, body };
}

async function refreshAccount() {
  const token = localStorage.getItem(TOKEN_KEY);
  if (!token) return showAccount(null);
  const response = await fetch("/api/v1/auth/me", { headers: { Authorization: "Bearer " + token } });
  if (!response.ok) {
    localStorage.removeItem(TOKEN_KEY);
    return showAccount(null);
  }
  showAccount(await response.json());
}

loginForm.addEventListener("submit", async (event) => {
  event.preventDefault();
  const { ok, body } = await postJson("/api/v1/auth/login", {
    username: loginForm.username.value,
    password: loginForm.password.value,
  });
  accountMessage.className = ok ? "" : "error";
  accountMessage.textContent = ok ? "" : body.error;
  if (ok) {
    localStorage.setItem(TOKEN_KEY, body.token);
    loginForm.reset();
    showAccount(body);
  }
});

registerForm.addEventListener("submit", async (event) => {
  event.preventDefault();
  const { ok, body } = await postJson("/api/v1/auth/register", {
    username: registerForm.username.value,
    email: registerForm.email.value,
    password: registerForm.password.value,
  });
  accountMessage.className = ok ? "" : "error";
  accountMessage.textContent = ok ? "Registered. You can log in now." : body.error;
  if (ok) registerForm.reset();
});

logoutButton.addEventListener("click", async () => {
  const token = localStorage.getItem(TOKEN_KEY);
  if (token) {
    await fetch("/api/v1/auth/logout", { method: "POST", headers: { Authorization: "Bearer " + token } });
  }
  localStorage.removeItem(TOKEN_KEY);
  accountMessage.textContent = "";
  showAccount(null);
});

refreshAccount();

const form = document.getElementById("soulprint");
const result = document.getElementById("result");
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const badges = [...form.querySelectorAll("input[name=badge]:checked")].map((b) => b.value);
  const name = form.querySelector("input[name=name]").value;
  const headers = { "Content-Type": "application/json" };
  const token = localStorage.getItem(TOKEN_KEY);
  if (token) headers["Authorization"] = "Bearer " + token;
  const response = await fetch("/api/v1/archetype", {
    method: "POST",
    headers,
    body: JSON.stringify({ badges, name: name || null }),
  });
  const body = await response.json();
  result.replaceChildren();
  if (!response.ok) {
    const p = document.createElement("p");
    p.className = "error";
    p.textContent = body.error;
    result.append(p);
    return;
  }
  const heading = document.createElement("h2");
  heading.textContent = "Your Travel Archetype: " + body.archetype;
  const list = document.createElement("ul");
  for (const place of body.recommendations) {
    const item = document.createElement("li");
    item.textContent = place;
    list.append(item);
  }
  result.append(heading, list);
  if (body.session_log.error) {
    const p = document.createElement("p");
    p.className = "warning";
    p.textContent = "Could not save your soulprint: " + body.session_log.error;
    result.append(p);
  }
});
</script>
</body>
</html>
"#;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the form for the given model
pub fn render_index(report: &ModelReport) -> String {
    let badges: Vec<String> = Badge::ALL
        .iter()
        .map(|badge| {
            let label = escape_html(badge.as_str());
            format!(
                r#"<label><input type="checkbox" name="badge" value="{0}"> {0}</label>"#,
                label
            )
        })
        .collect();

    PAGE_TEMPLATE
        .replace("{{accuracy}}", &format!("{:.2}%", report.accuracy * 100.0))
        .replace("{{dataset_size}}", &report.dataset_size.to_string())
        .replace("{{classifier}}", report.classifier)
        .replace("{{badges}}", &badges.join("\n"))
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let engine = state.engine.read().await;
    Html(render_index(engine.report()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ArchetypeEngine, EngineSettings};

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Slow & Soulful"), "Slow &amp; Soulful");
        assert_eq!(escape_html("<b>\""), "&lt;b&gt;&quot;");
    }

    #[test]
    fn test_render_lists_every_badge() {
        let engine = ArchetypeEngine::train(&EngineSettings {
            seed: Some(1),
            ..EngineSettings::default()
        })
        .unwrap();
        let html = render_index(engine.report());

        assert_eq!(html.matches(r#"name="badge""#).count(), Badge::COUNT);
        assert!(html.contains("Community &amp; Local First"));
        assert!(html.contains("Logistic Regression"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_includes_account_forms() {
        let engine = ArchetypeEngine::train(&EngineSettings {
            seed: Some(1),
            ..EngineSettings::default()
        })
        .unwrap();
        let html = render_index(engine.report());

        assert!(html.contains(r#"<form id="login">"#));
        assert!(html.contains(r#"<form id="register">"#));
        assert!(html.contains("/api/v1/auth/login"));
        assert!(html.contains("/api/v1/auth/register"));
        assert!(html.contains("/api/v1/auth/logout"));
        assert!(html.contains("localStorage.setItem(TOKEN_KEY, body.token)"));
        assert!(html.contains("localStorage.removeItem(TOKEN_KEY)"));
    }
}
