//! Maps a request to a static file or to the search page.

use std::convert::Infallible;

use mime::Mime;
use searchd_http::handler::Handler;
use searchd_http::protocol::{Request, Response};
use tracing::{debug, info};

use crate::file_reader::FileReader;
use crate::html::{self, LANDING_PAGE};
use crate::search::QueryProcessor;

/// URIs starting with this prefix are served from the static file root.
pub const STATIC_PREFIX: &str = "/static/";

/// Routes `/static/...` to the file reader and everything else to the search page.
#[derive(Debug)]
pub struct Router<Q> {
    files: FileReader,
    search: Q,
}

impl<Q: QueryProcessor> Router<Q> {
    pub fn new(files: FileReader, search: Q) -> Self {
        Self { files, search }
    }

    /// Produces the response for `request`. Every outcome, including a missing file, is a
    /// response.
    pub async fn process(&self, request: &Request) -> Response {
        if request.uri().starts_with(STATIC_PREFIX) {
            self.process_file(request.path()).await
        } else {
            self.process_query(request.query())
        }
    }

    async fn process_file(&self, path: &str) -> Response {
        let file_name = path.strip_prefix(STATIC_PREFIX).unwrap_or(path);

        match self.files.read_file(file_name).await {
            Ok(contents) => {
                debug!(file = file_name, bytes = contents.len(), "serving static file");
                let mut response = Response::ok().with_body(contents);
                response.set_content_type(content_type(file_name));
                response
            }
            Err(e) => {
                info!(file = file_name, cause = %e, "static file not found");
                Response::not_found().with_body(html::file_not_found(file_name))
            }
        }
    }

    fn process_query(&self, query: Option<&str>) -> Response {
        let mut page = String::from(LANDING_PAGE);

        if let Some(terms) = search_terms(query) {
            let terms = terms.to_lowercase();
            let split: Vec<String> = terms.split_whitespace().map(str::to_owned).collect();
            let results = self.search.process_query(&split);
            debug!(terms = %terms, results = results.len(), "processed query");
            html::write_results(&mut page, &terms, &results);
        }

        Response::ok().with_content_type(mime::TEXT_HTML).with_body(page)
    }
}

impl<Q: QueryProcessor> Handler for Router<Q> {
    type Error = Infallible;

    async fn call(&self, request: Request) -> Result<Response, Self::Error> {
        Ok(self.process(&request).await)
    }
}

/// Decodes the `terms` parameter; an absent, empty, or undecodable one yields `None`.
///
/// A repeated parameter keeps its last value.
fn search_terms(query: Option<&str>) -> Option<String> {
    let params: Vec<(String, String)> = match serde_urlencoded::from_str(query?) {
        Ok(params) => params,
        Err(e) => {
            debug!(cause = %e, "can't decode query string, showing the landing page");
            return None;
        }
    };
    params.into_iter().rev().find(|(name, _)| name == "terms").map(|(_, terms)| terms).filter(|terms| !terms.is_empty())
}

/// Picks the content type from the file extension, `None` for anything unrecognized.
fn content_type(file_name: &str) -> Option<Mime> {
    let extension = file_name.rsplit('.').next()?;
    let mime = match extension {
        "html" | "htm" => mime::TEXT_HTML,
        "jpeg" | "jpg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "css" => mime::TEXT_CSS,
        "js" => mime::APPLICATION_JAVASCRIPT,
        "xml" => "application/xml".parse().ok()?,
        "txt" => mime::TEXT_PLAIN,
        _ => return None,
    };
    Some(mime)
}
