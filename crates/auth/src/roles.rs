use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role identifier as reported by the directory service.
///
/// Roles stay opaque strings at this layer; unknown roles are kept so they can
/// be displayed, they simply never match a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const STAFF: Role = Role(Cow::Borrowed("staff"));
    pub const SUPER_ADMIN: Role = Role(Cow::Borrowed("super_admin"));
    pub const STUDENT: Role = Role(Cow::Borrowed("student"));
    pub const GUARDIAN: Role = Role(Cow::Borrowed("guardian"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed, disjoint groupings of roles used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleBucket {
    /// `admin`, `staff`, `super_admin`.
    AdminLike,
    /// `student`, `guardian`.
    StudentLike,
}

impl RoleBucket {
    pub const fn members(self) -> &'static [&'static str] {
        match self {
            RoleBucket::AdminLike => &["admin", "staff", "super_admin"],
            RoleBucket::StudentLike => &["student", "guardian"],
        }
    }

    pub fn contains(self, role: &Role) -> bool {
        self.members().contains(&role.as_str())
    }
}

/// Set of roles held by a user.
///
/// Ordered so that labels and logs are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw strings, trimming each and dropping blanks.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|s| {
                let trimmed = s.as_ref().trim();
                (!trimmed.is_empty()).then(|| Role::new(trimmed.to_string()))
            })
            .collect()
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    /// Roles of this set that belong to `bucket`.
    pub fn hits(&self, bucket: RoleBucket) -> Vec<&Role> {
        self.0.iter().filter(|r| bucket.contains(r)).collect()
    }

    pub fn intersects(&self, bucket: RoleBucket) -> bool {
        self.0.iter().any(|r| bucket.contains(r))
    }

    pub fn is_super_admin(&self) -> bool {
        self.contains(&Role::SUPER_ADMIN)
    }

    /// Comma-separated role names, or `"Pending role"` when empty.
    pub fn label(&self) -> String {
        if self.0.is_empty() {
            return "Pending role".to_string();
        }
        self.0.iter().map(Role::as_str).collect::<Vec<_>>().join(", ")
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|r| r.as_str().to_string()).collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = std::collections::btree_set::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
