use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    COLUMN_CLUSTER, COLUMN_ECR_REPO, COLUMN_ECR_TAG, COLUMN_GIT_BRANCH, COLUMN_GIT_REPO,
    COLUMN_SERVICE,
};
use crate::types::lookup::Column;

/// Identity of a reconcilable row: `cluster|service|git_repo|git_branch`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(cluster: &str, service: &str, git_repo: &str, git_branch: &str) -> Self {
        Self(format!("{cluster}|{service}|{git_repo}|{git_branch}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One service deployment row, as exported locally and as stored remotely.
///
/// Remote rows may predate the ECR columns, so those default to empty when
/// absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterServiceRecord {
    pub cluster: String,
    pub service: String,
    pub git_repo: String,
    pub git_branch: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ecr_repo: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ecr_tag: String,
}

impl ClusterServiceRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.cluster, &self.service, &self.git_repo, &self.git_branch)
    }

    /// All columns, in table order, for an upsert.
    pub fn row_columns(&self) -> Vec<Column> {
        let mut columns = self.primary_key_columns();
        columns.push(Column::new(COLUMN_ECR_REPO, &self.ecr_repo));
        columns.push(Column::new(COLUMN_ECR_TAG, &self.ecr_tag));
        columns
    }

    /// Primary-key columns only, for a delete.
    pub fn primary_key_columns(&self) -> Vec<Column> {
        vec![
            Column::new(COLUMN_CLUSTER, &self.cluster),
            Column::new(COLUMN_SERVICE, &self.service),
            Column::new(COLUMN_GIT_REPO, &self.git_repo),
            Column::new(COLUMN_GIT_BRANCH, &self.git_branch),
        ]
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
