use warp::path::FullPath;
use warp::{Filter, Rejection};

pub mod authorize;
pub mod callback;

/// Matches only when the request path is exactly `path`. Unlike
/// `warp::path::end()`, a trailing slash does not match.
pub fn exact_path(path: &'static str) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and_then(move |full: FullPath| async move {
            if full.as_str() == path {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}
