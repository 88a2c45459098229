/// A macro to simplify read-through caching against a `ResponseCache`.
///
/// This macro checks if a fresh value is present in the cache.
/// If found, it returns the cached value without running the block.
/// If not found, it awaits the provided block to compute the value,
/// stores it in the cache, and then returns the computed value.
/// An `Err` from the block is returned as-is and nothing is stored.
///
/// # Arguments
/// * `$cache`: The cache instance, providing async `get` and `put` methods.
/// * `$key`: The key (`&str`) to use for caching the value.
/// * `$ttl`: The time-to-live (`Duration`) for the cached value.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let payload = cached!(self.cache, url.as_str(), self.cache_ttl, async {
///     download(url).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get($key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.put($key, ::std::clone::Clone::clone(&value), $ttl).await;
            Ok(value)
        }
    }};
}
