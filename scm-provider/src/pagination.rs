//! Cursor-driven pagination shared by every paged GitHub listing.

use std::future::Future;
use tracing::warn;
use url::Url;

/// Results per page for listing calls.
pub const PER_PAGE: u8 = 100;

/// Page number the first request starts from.
pub const FIRST_PAGE: u32 = 1;

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page, in remote order.
    pub items: Vec<T>,

    /// Page number to request next, or `None` on the last page.
    pub next: Option<u32>,
}

impl<T> Page<T> {
    /// Creates the final page of a listing.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Failure of a paged listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError<E> {
    /// Fetching a page failed.
    Fetch(E),
    /// The remote reported a next page that does not advance past the current one.
    Stalled { current: u32, next: u32 },
}

impl<E> PageError<E> {
    /// Returns the fetch error, or builds one from the stalled cursor positions.
    pub fn or_stalled(self, stalled: impl FnOnce(u32, u32) -> E) -> E {
        match self {
            Self::Fetch(e) => e,
            Self::Stalled { current, next } => stalled(current, next),
        }
    }
}

/// Fetches pages starting at [`FIRST_PAGE`] until a page reports no successor.
///
/// Items are returned in page order. The listing either completes or fails as a
/// whole; a cursor that does not advance is an error rather than an early stop.
///
/// # Errors
///
/// Returns [`PageError::Fetch`] with the first error produced by `fetch`, or
/// [`PageError::Stalled`] if the cursor stops advancing.
pub async fn collect_pages<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, PageError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut cursor = FIRST_PAGE;

    loop {
        let page = fetch(cursor).await.map_err(PageError::Fetch)?;
        items.extend(page.items);

        match page.next {
            Some(next) if next > cursor => cursor = next,
            Some(next) => {
                warn!(current = cursor, next, "Next page cursor did not advance");
                return Err(PageError::Stalled {
                    current: cursor,
                    next,
                });
            }
            None => break,
        }
    }

    Ok(items)
}

/// Extracts the `page` query parameter from a `Link: rel="next"` URL.
///
/// Returns `None` when the link is not a valid URL or carries no usable page number.
pub fn page_number(link: &str) -> Option<u32> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .filter(|page| *page != 0)
}
