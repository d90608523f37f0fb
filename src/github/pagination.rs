use std::collections::VecDeque;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::client::send;
use crate::error::{GitHubError, Result};

/// Lazily paginated listing. A page is only requested once every item of
/// the previous page has been consumed.
pub type PageStream<T> = BoxStream<'static, Result<T>>;

struct PageState<T> {
    next: Option<Url>,
    buffer: VecDeque<T>,
}

pub(crate) fn paginate<T>(client: reqwest::Client, first: Url) -> PageStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let state = PageState {
        next: Some(first),
        buffer: VecDeque::new(),
    };

    stream::try_unfold(state, move |mut state| {
        let client = client.clone();
        async move {
            loop {
                if let Some(item) = state.buffer.pop_front() {
                    return Ok::<_, GitHubError>(Some((item, state)));
                }

                let Some(url) = state.next.take() else {
                    return Ok(None);
                };

                debug!("Fetching page {}", url);
                let response = send(client.get(url)).await?;
                state.next = next_page_url(response.headers());

                let page: Vec<T> = response.json().await?;
                if page.is_empty() {
                    return Ok(None);
                }
                state.buffer.extend(page);
            }
        }
    })
    .boxed()
}

/// Consumes at most `limit` items, fetching no further pages once the limit
/// is reached.
pub async fn collect_bounded<T>(pages: PageStream<T>, limit: usize) -> Result<Vec<T>> {
    pages.take(limit).try_collect().await
}

/// Consumes every item of every page.
pub async fn collect_all<T>(pages: PageStream<T>) -> Result<Vec<T>> {
    pages.try_collect().await
}

/// Extracts the `rel="next"` target from a GitHub `Link` header.
pub(crate) fn next_page_url(headers: &HeaderMap) -> Option<Url> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;

        if parts.any(|param| param.trim() == "rel=\"next\"") {
            Url::parse(target).ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_link(link: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_str(link).unwrap());
        headers
    }

    #[test]
    fn finds_next_link() {
        let headers = headers_with_link(
            "<https://api.github.com/user/1/followers?page=2>; rel=\"next\", \
             <https://api.github.com/user/1/followers?page=5>; rel=\"last\"",
        );

        assert_eq!(
            next_page_url(&headers).unwrap().as_str(),
            "https://api.github.com/user/1/followers?page=2"
        );
    }

    #[test]
    fn last_page_has_no_next_link() {
        let headers = headers_with_link(
            "<https://api.github.com/user/1/followers?page=1>; rel=\"prev\", \
             <https://api.github.com/user/1/followers?page=1>; rel=\"first\"",
        );
        assert!(next_page_url(&headers).is_none());
        assert!(next_page_url(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn bounded_collection_truncates_without_error() {
        let items: PageStream<u32> = stream::iter((1..=7).map(Ok)).boxed();
        assert_eq!(collect_bounded(items, 3).await.unwrap(), vec![1, 2, 3]);

        let exact: PageStream<u32> = stream::iter((1..=3).map(Ok)).boxed();
        assert_eq!(collect_bounded(exact, 3).await.unwrap(), vec![1, 2, 3]);

        let none: PageStream<u32> = stream::iter((1..=3).map(Ok)).boxed();
        assert!(collect_bounded(none, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_mid_stream_discards_partial_items() {
        let items: PageStream<u32> = stream::iter(vec![
            Ok(1),
            Err(GitHubError::RemoteUnavailable("boom".to_string())),
            Ok(3),
        ])
        .boxed();

        assert!(collect_all(items).await.is_err());
    }
}
