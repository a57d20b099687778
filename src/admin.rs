//! Read-only admin dashboard.
//!
//! Renders counts and the five most recent appointments and contacts from
//! the service's read operations. Access is gated by [`AdminAccess`].

use std::fmt::Write as _;

use axum::{extract::State, response::Html};

use crate::config::BusinessInfo;
use crate::error::Result;
use crate::models::{Appointment, Contact, StoreStats};
use crate::server::{AdminAccess, AppState};

/// Rows shown per table
pub const RECENT_LIMIT: usize = 5;

/// `GET /admin`: counts plus the most recent appointments and contacts
pub async fn dashboard_handler(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Html<String>> {
    let stats = state.service.stats().await?;
    let appointments = state.service.list_appointments(Some(RECENT_LIMIT)).await?;
    let contacts = state.service.list_contacts(Some(RECENT_LIMIT)).await?;

    Ok(Html(render_dashboard(
        &state.config.business,
        state.service.active_backend(),
        stats,
        &appointments,
        &contacts,
    )))
}

/// Escape text for inclusion in HTML element content or attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render the dashboard page; every stored value is HTML-escaped
#[must_use]
pub fn render_dashboard(
    business: &BusinessInfo,
    backend: &str,
    stats: StoreStats,
    appointments: &[Appointment],
    contacts: &[Contact],
) -> String {
    let title = escape_html(&business.name);
    let mut page = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Admin - {title}</title>
<style>
body {{ font-family: sans-serif; background: #f3f4f6; margin: 0; }}
header {{ background: #eab308; color: #fff; padding: 1.5rem 2rem; }}
main {{ padding: 2rem; }}
.cards {{ display: flex; gap: 1rem; margin-bottom: 2rem; }}
.card {{ background: #fff; border-radius: 0.75rem; padding: 1.25rem; flex: 1; }}
.card strong {{ display: block; font-size: 2rem; }}
table {{ width: 100%; background: #fff; border-collapse: collapse; margin-bottom: 2rem; }}
th, td {{ text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e5e7eb; }}
</style>
</head>
<body>
<header><h1>{title} - Admin Dashboard</h1></header>
<main>
<div class="cards">
<div class="card">Total Appointments<strong>{appointment_count}</strong></div>
<div class="card">Total Contacts<strong>{contact_count}</strong></div>
<div class="card">Storage<strong>{backend}</strong></div>
</div>
"#,
        appointment_count = stats.appointments,
        contact_count = stats.contacts,
        backend = escape_html(backend),
    );

    page.push_str("<h2>Recent Appointments</h2>\n");
    if appointments.is_empty() {
        page.push_str("<p>No appointments yet.</p>\n");
    } else {
        page.push_str(
            "<table>\n<tr><th>Name</th><th>Email</th><th>Phone</th>\
             <th>Service</th><th>Status</th><th>Created</th></tr>\n",
        );
        for appointment in appointments {
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&appointment.name),
                escape_html(&appointment.email),
                escape_html(&appointment.phone),
                escape_html(&appointment.service),
                appointment.status,
                appointment.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
        page.push_str("</table>\n");
    }

    page.push_str("<h2>Recent Messages</h2>\n");
    if contacts.is_empty() {
        page.push_str("<p>No messages yet.</p>\n");
    } else {
        page.push_str(
            "<table>\n<tr><th>Name</th><th>Email</th>\
             <th>Service</th><th>Message</th><th>Created</th></tr>\n",
        );
        for contact in contacts {
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&contact.name),
                escape_html(&contact.email),
                escape_html(contact.service.as_deref().unwrap_or("-")),
                escape_html(&contact.message),
                contact.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
        page.push_str("</table>\n");
    }

    page.push_str("</main>\n</body>\n</html>\n");
    page
}
