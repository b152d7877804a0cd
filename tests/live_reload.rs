use crate::common::bot::full_config;
use crate::common::{CHAN, TestBot};
use slirc_warden::config::{ConfigStore, ConfigWatcher};
use slirc_warden::engine::Effect;
use std::sync::Arc;
use std::time::Duration;

mod common;

const BEFORE: &str = r##"
[channels."#rust"]
voiced = ["bob"]
"##;

const AFTER: &str = r##"
[channels."#rust"]
voiced = ["bob", "dave"]
"##;

/// Long enough for the watcher's debounce window to pass and a reload to run.
const SETTLE: Duration = Duration::from_millis(1500);

/// Join `dave` until he is voiced, or give up after a few seconds.
async fn wait_for_dave_voiced(bot: &TestBot) -> anyhow::Result<()> {
    for _ in 0..100 {
        bot.join("dave", None);
        if bot.sent().await? == vec![Effect::voice(CHAN, "dave")] {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    anyhow::bail!("config change never reached the dispatcher")
}

#[tokio::test]
async fn test_file_change_reaches_policy_decisions() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("warden.toml");
    std::fs::write(&path, full_config(BEFORE))?;

    let store = Arc::new(ConfigStore::open(&path)?);
    let bot = TestBot::opped(store.current()).await?;
    let _reloads = bot.handle.follow(store.subscribe());
    let _watcher = ConfigWatcher::start(Arc::clone(&store))?;

    bot.join("dave", None);
    assert!(bot.sent().await?.is_empty());

    std::fs::write(&path, full_config(AFTER))?;
    wait_for_dave_voiced(&bot).await?;
    assert_eq!(store.current().channel(CHAN).map(|p| p.voiced.len()), Some(2));

    // A broken edit is rejected and the reloaded policy stays in force.
    std::fs::write(&path, "host = \"irc.example.net\"\nnick = [oops")?;
    tokio::time::sleep(SETTLE).await;

    assert_eq!(store.current().channel(CHAN).map(|p| p.voiced.len()), Some(2));
    bot.join("dave", None);
    bot.join("bob", None);
    assert_eq!(
        bot.sent().await?,
        vec![Effect::voice(CHAN, "dave"), Effect::voice(CHAN, "bob")]
    );

    Ok(())
}

#[tokio::test]
async fn test_other_files_in_directory_are_ignored() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("warden.toml");
    std::fs::write(&path, full_config(BEFORE))?;

    let store = Arc::new(ConfigStore::open(&path)?);
    let mut updates = store.subscribe();
    let _watcher = ConfigWatcher::start(Arc::clone(&store))?;

    std::fs::write(dir.path().join("other.toml"), full_config(AFTER))?;
    tokio::time::sleep(SETTLE).await;

    assert!(!updates.has_changed()?);
    assert_eq!(store.current().channel(CHAN).map(|p| p.voiced.len()), Some(1));

    Ok(())
}
