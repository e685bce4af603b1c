// src/batch/shard.rs

//! Three-level directory tree for staged DAGs: `<first>/<second>/<i>.*`.

use std::path::PathBuf;

use crate::errors::{DagSynthError, Result};

/// DAGs per leaf directory.
pub const LEAF_CAPACITY: usize = 1000;
/// Leaf directories per first-level directory.
pub const BRANCH_CAPACITY: usize = 1000;
/// First-level directories.
pub const ROOT_CAPACITY: usize = 100;
/// Largest batch the tree can hold.
pub const MAX_DAGS: usize = LEAF_CAPACITY * BRANCH_CAPACITY * ROOT_CAPACITY;

/// Location of one DAG inside the shard tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSlot {
    pub first: usize,
    pub second: usize,
}

impl ShardSlot {
    /// Relative directory, e.g. `0/3`.
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(self.first.to_string()).join(self.second.to_string())
    }
}

/// Shard slot for the `index`-th DAG of a batch.
pub fn shard_for(index: usize) -> Result<ShardSlot> {
    if index >= MAX_DAGS {
        return Err(DagSynthError::ShardLimitExceeded(MAX_DAGS));
    }
    let leaf = index / LEAF_CAPACITY;
    Ok(ShardSlot {
        first: leaf / BRANCH_CAPACITY,
        second: leaf % BRANCH_CAPACITY,
    })
}

/// Fail before generating anything if `count` DAGs would not fit.
pub fn ensure_capacity(count: usize) -> Result<()> {
    if count > MAX_DAGS {
        return Err(DagSynthError::ShardLimitExceeded(MAX_DAGS));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_fill_before_moving_on() {
        assert_eq!(shard_for(0).unwrap(), ShardSlot { first: 0, second: 0 });
        assert_eq!(shard_for(999).unwrap(), ShardSlot { first: 0, second: 0 });
        assert_eq!(shard_for(1000).unwrap(), ShardSlot { first: 0, second: 1 });
        assert_eq!(
            shard_for(1_000_000).unwrap(),
            ShardSlot { first: 1, second: 0 }
        );
        assert_eq!(
            shard_for(MAX_DAGS - 1).unwrap(),
            ShardSlot { first: 99, second: 999 }
        );
    }

    #[test]
    fn tree_capacity_is_fatal() {
        assert!(matches!(
            shard_for(MAX_DAGS),
            Err(DagSynthError::ShardLimitExceeded(n)) if n == MAX_DAGS
        ));
        assert!(ensure_capacity(MAX_DAGS).is_ok());
        assert!(ensure_capacity(MAX_DAGS + 1).is_err());
    }

    #[test]
    fn relative_dir_joins_levels() {
        let slot = ShardSlot { first: 2, second: 17 };
        assert_eq!(slot.relative_dir(), PathBuf::from("2").join("17"));
    }
}
