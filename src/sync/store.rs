use std::future::Future;

use crate::core::link::{LinkRecord, NewLink};
use crate::error::StoreError;

/// The remote collection the board mirrors.
///
/// Every call is a single attempt; callers decide whether a failure is
/// shown to the user.
pub trait LinkStore: Send + Sync + 'static {
    /// All records, newest first.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<LinkRecord>, StoreError>> + Send;

    fn insert(&self, link: &NewLink) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), StoreError>> + Send;
}
