use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::{Core, ShortUrl};

use super::error::PageError;

#[derive(Debug, Default, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

/// Renders the submission form followed by the history of shortened urls.
pub async fn index(State(core): State<Arc<Core>>) -> Result<Html<String>, PageError> {
    let items = core
        .shortener()
        .history()
        .await
        .map_err(|err| PageError::new("error getting history", err))?;
    Ok(Html(render_index(&items)))
}

/// Shortens a new url and redirects to the main page.
///
/// A body that is not a readable form counts as an empty `url`; the remote
/// API decides whether that is acceptable.
pub async fn shorten(
    State(core): State<Arc<Core>>,
    form: Result<Form<ShortenForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(message = "Unreadable form, using empty url", error = %rejection);
            ShortenForm::default()
        }
    };
    let short = core
        .shortener()
        .shorten(&form.url)
        .await
        .map_err(|err| PageError::new("error posting url", err))?;
    info!(message = "Shortened url", id = %short.id, long_url = %short.long_url);
    Ok(Redirect::to("/"))
}

pub fn render_index(items: &[ShortUrl]) -> String {
    let mut page = String::from(
        r#"<html>
<body>
<h1>Service account demo</h1>
<form action="/shorten" method="POST">
<label for="url">Enter URL:</label>
<input type="text" name="url" id="url">
<input type="submit" value="shorten!">
</form>
<h2>URLs recently shortened:</h2>
<ul>
"#,
    );
    for item in items {
        let id = escape(&item.id);
        page.push_str(&format!(
            "<li>\n<a href=\"{id}\" title=\"{id}\">{long_url}</a>\n</li>\n",
            long_url = escape(&item.long_url),
        ));
    }
    page.push_str("</ul>\n</body>\n</html>\n");
    page
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
