pub mod error;
pub mod reply;

use warp::hyper::body::Bytes;
use warp::{Filter, Rejection};

use self::error::FlowRejection;

const MAX_FORM_BYTES: u64 = 64 * 1024;

/// `state` and `code` as they arrive on the redirect back from the
/// authorization server.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
}

impl CallbackParams {
    /// Decodes form-encoded pairs; the first occurrence of a key wins.
    pub fn parse(input: &[u8]) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(input) {
            let slot = match key.as_ref() {
                "state" => &mut params.state,
                "code" => &mut params.code,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Fills the gaps in `self` from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            state: self.state.or(fallback.state),
            code: self.code.or(fallback.code),
        }
    }

    /// Form body values take precedence over the query string.
    pub fn from_request(query: &str, content_type: Option<&str>, body: &[u8]) -> Self {
        let query = Self::parse(query.as_bytes());
        if content_type.map(is_form).unwrap_or(false) {
            Self::parse(body).or(query)
        } else {
            query
        }
    }
}

fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|m| m.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

pub fn callback_params() -> impl Filter<Extract = (CallbackParams,), Error = Rejection> + Clone {
    let query = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();
    // A declared length over the limit is refused before the body is read.
    // Bodies without a Content-Length (chunked) are read as they come.
    let body = warp::header::optional::<u64>("content-length")
        .and_then(|length: Option<u64>| async move {
            match length {
                Some(length) if length > MAX_FORM_BYTES => {
                    Err(warp::reject::custom(FlowRejection::BodyTooLarge))
                }
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes());

    query
        .and(warp::header::optional::<String>("content-type"))
        .and(body)
        .map(|query: String, content_type: Option<String>, body: Bytes| {
            CallbackParams::from_request(&query, content_type.as_deref(), &body)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let params = CallbackParams::parse(b"code=one&state=s&code=two");
        assert_eq!(params.code.as_deref(), Some("one"));
        assert_eq!(params.state.as_deref(), Some("s"));
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = CallbackParams::parse(b"state=a%2Bb+c&code=x%3Dy");
        assert_eq!(params.state.as_deref(), Some("a+b c"));
        assert_eq!(params.code.as_deref(), Some("x=y"));
    }

    #[test]
    fn form_body_overrides_query() {
        let params = CallbackParams::from_request(
            "state=from-query&code=q",
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            b"code=from-body",
        );
        assert_eq!(params.code.as_deref(), Some("from-body"));
        assert_eq!(params.state.as_deref(), Some("from-query"));
    }

    #[test]
    fn non_form_bodies_are_ignored() {
        let params = CallbackParams::from_request(
            "state=s",
            Some("application/json"),
            b"code=from-body",
        );
        assert_eq!(params.code, None);
    }

    #[tokio::test]
    async fn filter_reads_query_without_a_body() {
        let params = warp::test::request()
            .path("/?state=abc&code=XYZ")
            .filter(&callback_params())
            .await
            .unwrap();
        assert_eq!(params.state.as_deref(), Some("abc"));
        assert_eq!(params.code.as_deref(), Some("XYZ"));
    }

    #[tokio::test]
    async fn filter_reads_posted_forms() {
        let params = warp::test::request()
            .method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("state=abc&code=XYZ")
            .filter(&callback_params())
            .await
            .unwrap();
        assert_eq!(params.state.as_deref(), Some("abc"));
        assert_eq!(params.code.as_deref(), Some("XYZ"));
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let body = format!("state=abc&code={}", "x".repeat(MAX_FORM_BYTES as usize));
        let err = warp::test::request()
            .method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .filter(&callback_params())
            .await
            .unwrap_err();
        assert_eq!(err.find::<FlowRejection>(), Some(&FlowRejection::BodyTooLarge));
    }
}
