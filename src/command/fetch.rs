use anyhow::Result;
use kvstore::AsyncKVDb;

use crate::glucose::GlucoseFetcher;
use crate::interfaces::kvpath;
use crate::settings;

/// One fetch, printed instead of sent. Useful for checking credentials.
pub async fn fetch() -> Result<()> {
    let kvs = AsyncKVDb::new(kvpath::SQLITE_STORE.as_path()).await?;
    let settings = settings::load(&kvs).await;

    let fetcher = GlucoseFetcher::new(settings.api_url)?;
    let message = fetcher.fetch_glucose(&settings.credentials).await?;
    println!("{}", serde_json::to_string(&message)?);
    Ok(())
}
