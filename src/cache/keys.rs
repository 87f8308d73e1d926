//! Cache key definitions.
//!
//! `QueryKey` names one cached query result. `Resource` groups keys into
//! families so a mutation can invalidate, say, every post-related query
//! without listing each post id. A mutation declares its effects as a set of
//! `Invalidation`s.

use std::fmt;

use foodable_api_types::Id;

/// Family of related query keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Groceries,
    Recipes,
    /// Post lists and post details (including their comments).
    Posts,
    /// Public profiles, which embed the user's posts and counters.
    Users,
    /// Data derived from the current bearer token.
    Session,
}

/// Identifies one cached query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Groceries,
    Grocery(Id),
    Recipes,
    Recipe(Id),
    Posts,
    Post(Id),
    UserProfile(Id),
    CurrentUser,
}

impl QueryKey {
    /// The family this key belongs to.
    pub fn resource(&self) -> Resource {
        match self {
            Self::Groceries | Self::Grocery(_) => Resource::Groceries,
            Self::Recipes | Self::Recipe(_) => Resource::Recipes,
            Self::Posts | Self::Post(_) => Resource::Posts,
            Self::UserProfile(_) => Resource::Users,
            Self::CurrentUser => Resource::Session,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groceries => f.write_str("groceries"),
            Self::Grocery(id) => write!(f, "grocery/{id}"),
            Self::Recipes => f.write_str("recipes"),
            Self::Recipe(id) => write!(f, "recipe/{id}"),
            Self::Posts => f.write_str("posts"),
            Self::Post(id) => write!(f, "post/{id}"),
            Self::UserProfile(id) => write!(f, "user/{id}"),
            Self::CurrentUser => f.write_str("me"),
        }
    }
}

/// One declared effect of a mutation on the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// Exactly this key.
    Key(QueryKey),
    /// Every key in the family.
    Resource(Resource),
}

impl Invalidation {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Self::Key(target) => target == key,
            Self::Resource(resource) => key.resource() == *resource,
        }
    }
}

impl From<QueryKey> for Invalidation {
    fn from(key: QueryKey) -> Self {
        Self::Key(key)
    }
}

impl From<Resource> for Invalidation {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}
