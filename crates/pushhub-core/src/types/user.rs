//! User identity value type.
//!
//! A [`UserIdentifier`] names a user inside an optional tenant partition.
//! `tenant_id = None` addresses the host (tenant-less) side. The type has a
//! compact string form used when identifier lists are persisted on a push
//! request: `user_id@tenant_id`, or a bare `user_id` for host users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Separator between the user part and the tenant part of the string form.
const TENANT_SEPARATOR: char = '@';

/// Identifies a user within an optional tenant partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentifier {
    /// Tenant the user belongs to. `None` means the host partition.
    pub tenant_id: Option<i32>,
    /// User id, unique within its tenant.
    pub user_id: i64,
}

impl UserIdentifier {
    /// Create a new identifier.
    pub fn new(tenant_id: Option<i32>, user_id: i64) -> Self {
        Self { tenant_id, user_id }
    }

    /// Create an identifier for a host (tenant-less) user.
    pub fn host(user_id: i64) -> Self {
        Self {
            tenant_id: None,
            user_id,
        }
    }

    /// Parse a comma-joined identifier list as stored on a push request.
    ///
    /// Empty input yields an empty list. Whitespace around entries is
    /// tolerated.
    pub fn parse_list(joined: &str) -> AppResult<Vec<UserIdentifier>> {
        joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(UserIdentifier::from_str)
            .collect()
    }

    /// Encode a list of identifiers into the comma-joined storage form.
    pub fn join_list(identifiers: &[UserIdentifier]) -> String {
        identifiers
            .iter()
            .map(UserIdentifier::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tenant_id {
            Some(tenant_id) => write!(f, "{}{}{}", self.user_id, TENANT_SEPARATOR, tenant_id),
            None => write!(f, "{}", self.user_id),
        }
    }
}

impl FromStr for UserIdentifier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::validation("User identifier can not be empty"));
        }

        let (user_part, tenant_part) = match s.split_once(TENANT_SEPARATOR) {
            Some((user, tenant)) => (user, Some(tenant)),
            None => (s, None),
        };

        let user_id: i64 = user_part.parse().map_err(|_| {
            AppError::validation(format!("Invalid user id in identifier '{s}'"))
        })?;

        let tenant_id = match tenant_part {
            Some(tenant) => Some(tenant.parse::<i32>().map_err(|_| {
                AppError::validation(format!("Invalid tenant id in identifier '{s}'"))
            })?),
            None => None,
        };

        Ok(Self { tenant_id, user_id })
    }
}
