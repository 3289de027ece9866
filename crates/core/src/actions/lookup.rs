//! Name-to-GUID resolution
//!
//! Every name-based action goes through [`find_by_name`]: an index call
//! parameterized by a name-filter constructor, followed by the zero, one or
//! many check in [`select_unique`].

use std::future::Future;

use skiff_domain::{Error, Filter, FilterType, Named, Query, QueryKey, ResourceKind, Result, Warned};

/// Resolve `name` through `index`, which receives the query built by
/// `name_filter`.
pub async fn find_by_name<T, Q, F, Fut>(
    kind: ResourceKind,
    name: &str,
    name_filter: impl FnOnce(&str) -> Q,
    index: F,
) -> Warned<T>
where
    T: Named,
    F: FnOnce(Q) -> Fut,
    Fut: Future<Output = Warned<Vec<T>>>,
{
    let (result, warnings) = index(name_filter(name)).await.into_parts();
    Warned::new(result.and_then(|found| select_unique(kind, name, found)), warnings)
}

/// `NotFound` for no results, the entity for one, `MultipleEntitiesFound`
/// with the GUIDs in server order for more.
pub fn select_unique<T: Named>(kind: ResourceKind, name: &str, mut found: Vec<T>) -> Result<T> {
    match found.len() {
        0 => Err(Error::not_found_by_name(kind, name)),
        1 => found.pop().ok_or_else(|| Error::not_found_by_name(kind, name)),
        _ => Err(Error::MultipleEntitiesFound {
            kind,
            name: name.to_string(),
            guids: found.iter().map(|entity| entity.guid().to_string()).collect(),
        }),
    }
}

/// v2 `q=name:<name>`
pub fn v2_name_filter(name: &str) -> Vec<Filter> {
    vec![Filter::equal(FilterType::Name, name)]
}

/// v3 `names=<name>`
pub fn v3_name_query(name: &str) -> Vec<Query> {
    vec![Query::single(QueryKey::Names, name)]
}
