// Minimal web form over the pipeline
//
// GET / renders an empty form; POST / with a `name` field runs the pipeline
// and renders the summary. Requests are independent pipeline runs sharing
// one immutable IceBreaker.

use crate::error::Result;
use crate::pipeline::IceBreaker;
use crate::summary::Summary;
use axum::{
    extract::{Form, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Shown after a submission that produced no summary text
pub const EMPTY_RESULT_PLACEHOLDER: &str = "No summary found.";

#[derive(Clone)]
pub struct AppState {
    pub icebreaker: Arc<IceBreaker>,
}

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub name: String,
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the page; `None` is the initial empty form
pub fn render_page(summary: Option<&Summary>) -> String {
    let (text, facts) = match summary {
        None => (String::new(), String::new()),
        Some(summary) if summary.is_empty() => {
            (EMPTY_RESULT_PLACEHOLDER.to_string(), String::new())
        }
        Some(summary) => (
            escape_html(&summary.summary),
            summary
                .facts
                .iter()
                .map(|fact| format!("<li>{}</li>", escape_html(fact)))
                .collect(),
        ),
    };

    fill_template(
        INDEX_TEMPLATE,
        &[("{{ summary }}", text.as_str()), ("{{ facts }}", facts.as_str())],
    )
}

/// Substitute placeholders in one left-to-right pass over `template`
///
/// Inserted values are never scanned again, so a value that contains a
/// placeholder is rendered literally.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(*key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, key, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

async fn index() -> Html<String> {
    Html(render_page(None))
}

async fn lookup(State(state): State<AppState>, Form(form): Form<LookupForm>) -> Html<String> {
    let summary = state.icebreaker.run(&form.name).await;
    Html(render_page(Some(&summary)))
}

pub fn router(icebreaker: Arc<IceBreaker>) -> Router {
    Router::new()
        .route("/", get(index).post(lookup))
        .with_state(AppState { icebreaker })
}

/// Bind `addr` and serve until the process stops
pub async fn serve(icebreaker: Arc<IceBreaker>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Ice breaker listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(icebreaker)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page_is_empty_form() {
        let page = render_page(None);
        assert!(page.contains("<form method=\"post\""));
        assert!(!page.contains("{{ summary }}"));
        assert!(!page.contains(EMPTY_RESULT_PLACEHOLDER));
    }

    #[test]
    fn test_summary_and_facts_are_escaped() {
        let summary = Summary::new(
            "Builds <script>alert(1)</script> & more",
            vec!["Likes \"quotes\"".to_string()],
        );
        let page = render_page(Some(&summary));

        assert!(page.contains("Builds &lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(page.contains("<li>Likes &quot;quotes&quot;</li>"));
        assert!(!page.contains("<script>alert"));
    }

    #[test]
    fn test_placeholder_text_in_values_is_rendered_literally() {
        let summary = Summary::new(
            "Writes templates like {{ facts }} for a living",
            vec!["Once typed {{ summary }} in a bio".to_string()],
        );
        let page = render_page(Some(&summary));

        assert!(page.contains("Writes templates like {{ facts }} for a living"));
        assert!(page.contains("<li>Once typed {{ summary }} in a bio</li>"));
        assert_eq!(page.matches("<li>").count(), 1);
    }

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let filled = fill_template("{{ a }}-{{ b }}-{{ a }}", &[("{{ a }}", "1"), ("{{ b }}", "{{ a }}")]);
        assert_eq!(filled, "1-{{ a }}-1");
    }

    #[test]
    fn test_empty_summary_shows_placeholder() {
        let page = render_page(Some(&Summary::default()));
        assert!(page.contains(EMPTY_RESULT_PLACEHOLDER));
    }
}
