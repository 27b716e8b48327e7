use std::future::Future;

use super::{QueryCache, QueryKey};
use crate::error::ApiResult;

/// Awaits a server write, then invalidates `invalidates`.
///
/// Nothing in the cache changes before the server confirms, and a failed
/// write invalidates nothing.
pub async fn run_mutation<T, Fut>(
    cache: &QueryCache,
    mutation: Fut,
    invalidates: &[QueryKey],
) -> ApiResult<T>
where
    Fut: Future<Output = ApiResult<T>>,
{
    let output = mutation.await?;
    for key in invalidates {
        cache.invalidate(key);
    }
    Ok(output)
}
