use warp::http::StatusCode;
use warp::hyper::header::{HeaderValue, CONTENT_TYPE};
use warp::reply::{Reply, Response};

/// JSON body indented by two spaces, newline terminated.
pub struct PrettyJson {
    inner: Result<String, serde_json::Error>,
}

impl PrettyJson {
    pub fn encode(body: &impl serde::Serialize) -> Self {
        let inner = serde_json::to_string_pretty(body).map(|mut s| {
            s.push('\n');
            s
        });
        Self { inner }
    }
}

impl Reply for PrettyJson {
    fn into_response(self) -> Response {
        match self.inner {
            Ok(body) => {
                let mut response = Response::new(body.into());
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode JSON reply");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

pub fn text(status: StatusCode, message: &'static str) -> Response {
    let mut response = Response::new(message.into());
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    response
}

pub fn anchor(url: &url::Url) -> Response {
    warp::reply::html(format!("<a href=\"{0}\">{0}</a>", url)).into_response()
}
