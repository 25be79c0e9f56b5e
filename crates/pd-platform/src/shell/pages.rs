//! Shell Views
//!
//! Minimal HTML for every route group. The dashboards are presentational
//! placeholders; the data views live behind the hosted backend and are not
//! part of the access core.

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - PropDeck</title>
</head>
<body>
<main>
{body}
</main>
</body>
</html>"#
    )
}

fn area_page(title: &str, blurb: &str) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
<p>{blurb}</p>
<form method="post" action="/signout"><button type="submit">Sign out</button></form>"#
    );
    layout(title, &body)
}

/// Page body for a protected route path.
pub fn page_for(path: &str) -> String {
    match path {
        "/owner/dashboard" => area_page("Owner Dashboard", "Portfolio overview and recent activity."),
        "/owner/properties" => area_page("Properties", "Your properties and their occupancy."),
        "/owner/financials" => area_page("Financials", "Income, expenses, and statements."),
        "/owner/documents" => area_page("Documents", "Leases, reports, and uploads."),
        "/owner/communications" => area_page("Communications", "Messages from your manager."),
        "/manager/dashboard" => area_page("Manager Dashboard", "Operations overview across clients."),
        "/manager/clients" => area_page("Clients", "Owners and portfolios under management."),
        "/manager/operations" => area_page("Operations", "Maintenance and task pipeline."),
        "/runner/dashboard" => area_page("Runner Dashboard", "Today's assignments."),
        "/runner/inspections" => area_page("Inspections", "Scheduled and completed inspections."),
        "/admin/dashboard" => area_page("Admin Dashboard", "Platform administration."),
        _ => not_found_page(),
    }
}

pub fn login_page(error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!("<p role=\"alert\">{message}</p>"),
        None => String::new(),
    };
    let body = format!(
        r#"<h1>Sign in</h1>
{error_html}
<form method="post" action="/auth">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>"#
    );
    layout("Sign in", &body)
}

pub fn unauthorized_page() -> String {
    layout(
        "Unauthorized",
        r#"<h1>Unauthorized</h1>
<p>Your account does not have access to that page.</p>
<p><a href="/">Back to your dashboard</a></p>"#,
    )
}

pub fn not_found_page() -> String {
    layout(
        "Not Found",
        r#"<h1>Page not found</h1>
<p><a href="/">Back to your dashboard</a></p>"#,
    )
}

/// Placeholder rendered while the session is still resolving. Refreshes
/// itself so the user lands on the resolved view without interaction.
pub fn loading_page() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="1">
<title>Loading - PropDeck</title>
</head>
<body>
<main><p>Loading...</p></main>
</body>
</html>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_area_has_a_page() {
        for path in [
            "/owner/dashboard",
            "/owner/properties",
            "/owner/financials",
            "/owner/documents",
            "/owner/communications",
            "/manager/dashboard",
            "/manager/clients",
            "/manager/operations",
            "/runner/dashboard",
            "/runner/inspections",
            "/admin/dashboard",
        ] {
            let page = page_for(path);
            assert!(page.contains("<h1>"), "missing heading for {path}");
            assert!(!page.contains("Page not found"), "fell through for {path}");
        }
    }

    #[test]
    fn test_login_page_error_rendering() {
        assert!(!login_page(None).contains("alert"));
        assert!(login_page(Some("Invalid email or password")).contains("Invalid email or password"));
    }
}
