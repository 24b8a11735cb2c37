use anyhow::{anyhow, Result};

/// Runs blocking work (HTTP, sqlite) on tokio's blocking pool so the UI task
/// keeps rendering.
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| anyhow!("blocking task failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_closure_result() {
        let value = run_blocking(|| 21 * 2).await.expect("task should run");
        assert_eq!(value, 42);
    }
}
