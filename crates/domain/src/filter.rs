//! Query predicates for index endpoints
//!
//! The v2 controller takes repeated `q=<field><op><values>` parameters, the
//! v3 controller takes one named parameter per documented field. [`Filter`]
//! models the former and [`Query`] the latter.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    Name,
    OrganizationGuid,
    SpaceGuid,
    QuotaDefinitionGuid,
    AppGuid,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::OrganizationGuid => "organization_guid",
            Self::SpaceGuid => "space_guid",
            Self::QuotaDefinitionGuid => "quota_definition_guid",
            Self::AppGuid => "app_guid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    In,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => ":",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::In => " IN ",
        }
    }
}

/// A v2 query predicate `(field, operator, values)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub filter_type: FilterType,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(filter_type: FilterType, operator: FilterOperator, values: Vec<String>) -> Self {
        Self { filter_type, operator, values }
    }

    pub fn equal(filter_type: FilterType, value: impl Into<String>) -> Self {
        Self::new(filter_type, FilterOperator::Equal, vec![value.into()])
    }

    pub fn any_of(filter_type: FilterType, values: Vec<String>) -> Self {
        Self::new(filter_type, FilterOperator::In, values)
    }

    /// The `("q", value)` pair sent on the wire.
    pub fn to_query_pair(&self) -> (String, String) {
        ("q".to_string(), self.to_string())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.filter_type.as_str(), self.operator.as_str(), self.values.join(","))
    }
}

/// Named v3 query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    Names,
    SpaceGuids,
    OrganizationGuids,
    AppGuids,
    States,
    PerPage,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::SpaceGuids => "space_guids",
            Self::OrganizationGuids => "organization_guids",
            Self::AppGuids => "app_guids",
            Self::States => "states",
            Self::PerPage => "per_page",
        }
    }
}

/// A v3 query parameter with comma-joined values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub key: QueryKey,
    pub values: Vec<String>,
}

impl Query {
    pub fn new(key: QueryKey, values: Vec<String>) -> Self {
        Self { key, values }
    }

    pub fn single(key: QueryKey, value: impl Into<String>) -> Self {
        Self::new(key, vec![value.into()])
    }

    pub fn to_query_pair(&self) -> (String, String) {
        (self.key.as_str().to_string(), self.values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_filter_format() {
        let filter = Filter::equal(FilterType::Name, "some-org");
        assert_eq!(filter.to_string(), "name:some-org");
        assert_eq!(filter.to_query_pair(), ("q".to_string(), "name:some-org".to_string()));
    }

    #[test]
    fn test_in_filter_joins_values() {
        let filter = Filter::any_of(
            FilterType::SpaceGuid,
            vec!["space-1".to_string(), "space-2".to_string()],
        );
        assert_eq!(filter.to_string(), "space_guid IN space-1,space-2");
    }

    #[test]
    fn test_comparison_operators() {
        let filter = Filter::new(
            FilterType::OrganizationGuid,
            FilterOperator::GreaterThanOrEqual,
            vec!["a".to_string()],
        );
        assert_eq!(filter.to_string(), "organization_guid>=a");
    }

    #[test]
    fn test_v3_query_pair() {
        let query = Query::new(QueryKey::Names, vec!["app-1".to_string(), "app-2".to_string()]);
        assert_eq!(query.to_query_pair(), ("names".to_string(), "app-1,app-2".to_string()));
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn filter_type() -> impl Strategy<Value = FilterType> {
            prop_oneof![
                Just(FilterType::Name),
                Just(FilterType::OrganizationGuid),
                Just(FilterType::SpaceGuid),
                Just(FilterType::QuotaDefinitionGuid),
                Just(FilterType::AppGuid),
            ]
        }

        proptest! {
            #[test]
            fn in_filter_splits_back_into_its_values(
                filter_type in filter_type(),
                values in prop::collection::vec("[a-z0-9-]{1,10}", 1..5),
            ) {
                let rendered = Filter::any_of(filter_type, values.clone()).to_string();
                let prefix = format!("{} IN ", filter_type.as_str());
                let rest = rendered.strip_prefix(prefix.as_str());
                prop_assert!(rest.is_some(), "{} lacks {}", rendered, prefix);
                let split: Vec<String> = rest.unwrap_or_default().split(',').map(String::from).collect();
                prop_assert_eq!(split, values);
            }

            #[test]
            fn query_pair_joins_values_in_order(values in prop::collection::vec("[a-z0-9-]{1,10}", 0..5)) {
                let (key, joined) = Query::new(QueryKey::Names, values.clone()).to_query_pair();
                prop_assert_eq!(key, "names");
                prop_assert_eq!(joined, values.join(","));
            }
        }
    }
}
