//! Index endpoint iteration.

use std::future::Future;

use serde::de::DeserializeOwned;
use skiff_domain::{Result, Warned, Warnings};

use super::gateway::Gateway;
use super::request::Request;

/// One page of an index response.
pub trait Page: DeserializeOwned + Send {
    type Item: Send;

    /// The page's resources and the link to the next page, if any.
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

/// Whether pagination should continue after a page was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Fetches `first`, then follows next links until they run out or `visit`
/// stops the walk. Warnings from every page fetched are kept in order.
pub(crate) async fn walk_pages<P, F, Fut>(
    first: Request,
    mut fetch: F,
    mut visit: impl FnMut(Vec<P::Item>) -> Flow,
) -> Warned<()>
where
    P: Page,
    F: FnMut(Request) -> Fut,
    Fut: Future<Output = Warned<P>>,
{
    let mut warnings = Warnings::new();
    let result = walk_steps(first, &mut fetch, &mut visit, &mut warnings).await;
    Warned::new(result, warnings)
}

async fn walk_steps<P, F, Fut>(
    first: Request,
    fetch: &mut F,
    visit: &mut impl FnMut(Vec<P::Item>) -> Flow,
    warnings: &mut Warnings,
) -> Result<()>
where
    P: Page,
    F: FnMut(Request) -> Fut,
    Fut: Future<Output = Warned<P>>,
{
    let mut request = first.clone();
    loop {
        let page = warnings.absorb(fetch(request).await)?;
        let (items, next) = page.into_parts();
        if visit(items) == Flow::Stop {
            return Ok(());
        }
        match next {
            Some(link) if !link.is_empty() => request = first.follow(link),
            _ => return Ok(()),
        }
    }
}

impl Gateway {
    /// Walks an index endpoint page by page, handing each page's resources to `visit`.
    pub async fn paginate<P: Page>(
        &self,
        request: Request,
        visit: impl FnMut(Vec<P::Item>) -> Flow,
    ) -> Warned<()> {
        walk_pages::<P, _, _>(request, |req| self.perform_request_for_json::<P>(req), visit).await
    }

    /// Collects every resource of an index endpoint in server order.
    pub async fn get_all_pages<P: Page>(&self, request: Request) -> Warned<Vec<P::Item>> {
        let mut all = Vec::new();
        let walked = self
            .paginate::<P>(request, |items| {
                all.extend(items);
                Flow::Continue
            })
            .await;
        walked.map(|()| all)
    }
}
