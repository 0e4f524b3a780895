//! End-to-end behaviour of the poll and push paths through the public API

use std::sync::Arc;
use std::time::Duration;

use jukebox::{Hub, HubConfig, Library, PlaylistConfig, PlaylistError, SelectionLog};

fn library() -> Arc<Library> {
    Arc::new(Library::from_iter([
        ("56k", "/sounds/56k.mp3"),
        ("deeper", "/sounds/deeper.mp3"),
    ]))
}

#[tokio::test]
async fn poll_path_accepts_known_and_rejects_unknown() {
    let log = SelectionLog::new(library());

    let played = log.append("56k").await.unwrap();
    assert_eq!(played.resource(), "56k");

    let rejected = log.append("airhorn").await;
    assert_eq!(
        rejected,
        Err(PlaylistError::InvalidResource("airhorn".into()))
    );

    assert_eq!(log.snapshot().await, vec![played]);
}

#[tokio::test]
async fn push_path_delivers_exactly_once_to_each_subscriber() {
    let library = library();
    let hub = Hub::new();
    let mut subscribers = Vec::new();
    for _ in 0..3 {
        subscribers.push(hub.subscribe().await);
    }

    let selection = library.select("deeper").unwrap();
    assert_eq!(hub.publish(selection).await, 3);

    for subscriber in &mut subscribers {
        assert_eq!(subscriber.try_recv().unwrap().resource(), "deeper");
        assert!(subscriber.try_recv().is_err());
    }
}

#[tokio::test]
async fn saturated_subscriber_is_dropped_while_others_keep_receiving() {
    let library = library();
    let hub = Hub::with_config(HubConfig::new().mailbox_capacity(2));
    let stuck = hub.subscribe().await;
    let mut healthy = hub.subscribe().await;

    for _ in 0..3 {
        let selection = library.select("56k").unwrap();
        tokio::time::timeout(Duration::from_millis(100), hub.publish(selection))
            .await
            .unwrap();
        healthy.recv().await.unwrap();
    }

    assert!(!hub.is_subscribed(stuck.id()).await);
    assert!(hub.is_subscribed(healthy.id()).await);
    assert_eq!(hub.stats().await.evicted, 1);
}

#[tokio::test]
async fn poll_and_push_are_independent_streams() {
    let library = library();
    let log = SelectionLog::with_config(Arc::clone(&library), PlaylistConfig::default());
    let hub = Hub::new();
    let mut subscriber = hub.subscribe().await;

    log.append("56k").await.unwrap();
    hub.publish(library.select("deeper").unwrap()).await;

    let polled: Vec<_> = log
        .snapshot()
        .await
        .iter()
        .map(|s| s.resource().to_owned())
        .collect();
    assert_eq!(polled, vec!["56k"]);
    assert_eq!(subscriber.try_recv().unwrap().resource(), "deeper");
    assert!(subscriber.try_recv().is_err());
}
