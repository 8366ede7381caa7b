//! Admin dashboard
//!
//! Read-only HTML projection over the interaction log and subscriber
//! counts. Store errors degrade to zeros/empty so the page always renders.

use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

const RECENT_LIMIT: i64 = 50;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
}

async fn index(state: web::Data<AppState>) -> impl Responder {
    let interactions = state.db.recent_interactions(RECENT_LIMIT).unwrap_or_else(|e| {
        log::error!("Failed to load recent interactions: {}", e);
        Vec::new()
    });
    let total_users = state.db.count_interaction_users().unwrap_or(0);
    let total_interactions = state.db.count_interactions().unwrap_or(0);
    let subscribers = state.db.count_subscribers().unwrap_or(0);

    let rows: String = interactions
        .iter()
        .map(|i| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                i.created_at.to_rfc3339(),
                escape(&i.user_id),
                escape(&i.intent),
                escape(&i.message),
                escape(&i.response)
            )
        })
        .collect();

    let html = format!(
        r#"<html>
  <head>
    <title>HealthBot Dashboard</title>
    <style>
      body {{ font-family: Arial, sans-serif; margin: 20px; }}
      .cards {{ display: flex; gap: 16px; margin-bottom: 20px; }}
      .card {{ border: 1px solid #ddd; padding: 12px 16px; border-radius: 8px; }}
      table {{ width: 100%; border-collapse: collapse; }}
      th, td {{ border: 1px solid #eee; padding: 8px; font-size: 14px; }}
      th {{ background: #f7f7f7; }}
    </style>
  </head>
  <body>
    <h2>HealthBot Admin</h2>
    <div class="cards">
      <div class="card">Active users: <b>{total_users}</b></div>
      <div class="card">Total interactions: <b>{total_interactions}</b></div>
      <div class="card">Subscribers: <b>{subscribers}</b></div>
    </div>
    <h3>Recent interactions</h3>
    <table>
      <thead>
        <tr><th>Time</th><th>User</th><th>Intent</th><th>Message</th><th>Response</th></tr>
      </thead>
      <tbody>
        {rows}
      </tbody>
    </table>
  </body>
</html>"#
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_neutralizes_markup() {
        assert_eq!(escape("<script>&</script>"), "&lt;script&gt;&amp;&lt;/script&gt;");
        assert_eq!(escape("plain text"), "plain text");
    }
}
