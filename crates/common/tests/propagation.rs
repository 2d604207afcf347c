//! Inheritance on asset creation and rule regeneration after writes

mod gate_support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::prelude::*;
use common::rules::UploadsUrlResolver;
use gate_support::{setup_gate, SITE, UPLOADS};
use tokio::sync::Notify;
use url::Url;

#[tokio::test]
async fn test_private_parent_makes_asset_private() {
    let (gate, provider, sink) = setup_gate();
    provider
        .insert_content_item(ContentItem::new(1, "post").with_status(ContentStatus::Private))
        .unwrap();
    provider
        .insert_asset(Asset::new(10, "image/png", "a.png").with_parent(1))
        .unwrap();

    assert_eq!(gate.on_asset_created(10).await, Some(Visibility::Private));

    let asset = provider.asset(10).await.unwrap().unwrap();
    assert_eq!(asset.visibility, Visibility::Private);
    assert_eq!(sink.count(), 1);
    assert_eq!(sink.last().unwrap().rules()[0].asset_id, 10);
}

#[tokio::test]
async fn test_parent_password_makes_asset_inherit() {
    let (gate, provider, _) = setup_gate();
    // a password outranks the private status
    provider
        .insert_content_item(
            ContentItem::new(1, "post")
                .with_status(ContentStatus::Private)
                .with_password("x"),
        )
        .unwrap();
    provider
        .insert_asset(Asset::new(10, "image/png", "a.png").with_parent(1))
        .unwrap();

    assert_eq!(gate.on_asset_created(10).await, Some(Visibility::Password));

    let asset = provider.asset(10).await.unwrap().unwrap();
    assert_eq!(asset.visibility, Visibility::Password);
    assert_eq!(asset.own_password(), None);
    assert!(matches!(
        gate.deliver(10, &Requester::anonymous().with_password("x")).await,
        Delivery::File(_)
    ));
}

#[tokio::test]
async fn test_no_inheritance_without_protected_parent() {
    let (gate, provider, sink) = setup_gate();
    provider
        .insert_content_item(ContentItem::new(1, "post"))
        .unwrap();
    provider
        .insert_asset(Asset::new(10, "image/png", "a.png").with_parent(1))
        .unwrap();
    provider
        .insert_asset(Asset::new(11, "image/png", "b.png"))
        .unwrap();
    provider
        .insert_asset(Asset::new(12, "image/png", "c.png").with_parent(404))
        .unwrap();

    assert_eq!(gate.on_asset_created(10).await, None);
    assert_eq!(gate.on_asset_created(11).await, None);
    assert_eq!(gate.on_asset_created(12).await, None);
    assert_eq!(gate.on_asset_created(13).await, None);

    // rules are regenerated after every trigger regardless
    assert_eq!(sink.count(), 4);
    assert!(sink.last().unwrap().is_empty());
}

#[tokio::test]
async fn test_explicit_visibility_is_never_overwritten() {
    let (gate, provider, _) = setup_gate();
    provider
        .insert_content_item(ContentItem::new(1, "post").with_password("x"))
        .unwrap();
    provider
        .insert_asset(
            Asset::new(10, "image/png", "a.png")
                .with_parent(1)
                .with_visibility(Visibility::Private),
        )
        .unwrap();

    assert_eq!(gate.on_asset_created(10).await, None);
    let asset = provider.asset(10).await.unwrap().unwrap();
    assert_eq!(asset.visibility, Visibility::Private);
}

#[tokio::test]
async fn test_edits_regenerate_rules() {
    let (gate, provider, sink) = setup_gate();
    provider
        .insert_asset(Asset::new(10, "image/png", "a.png"))
        .unwrap();

    provider
        .set_visibility(10, Visibility::Private)
        .await
        .unwrap();
    gate.on_asset_edited(10).await;
    assert_eq!(sink.last().unwrap().len(), 1);

    provider
        .set_visibility(10, Visibility::Public)
        .await
        .unwrap();
    gate.on_content_item_edited(1).await;
    assert!(sink.last().unwrap().is_empty());
    assert_eq!(sink.count(), 2);
}

#[tokio::test]
async fn test_generation_is_idempotent() {
    let (gate, provider, _) = setup_gate();
    for id in 1..=5 {
        let visibility = match id % 3 {
            0 => Visibility::Public,
            1 => Visibility::Private,
            _ => Visibility::Password,
        };
        provider
            .insert_asset(
                Asset::new(id, "image/png", format!("2024/{}.png", id)).with_visibility(visibility),
            )
            .unwrap();
    }

    let first = gate.generate_rules().await.unwrap();
    let second = gate.generate_rules().await.unwrap();
    assert_eq!(first, second);

    let ids: Vec<_> = first.rules().iter().map(|r| r.asset_id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);
}

/// Records persisted asset ids; the first persist stalls until released
#[derive(Clone, Default)]
struct StallingSink {
    calls: Arc<AtomicUsize>,
    entered: Arc<Notify>,
    persisted: Arc<Mutex<Vec<Vec<u64>>>>,
}

#[async_trait]
impl RuleSink for StallingSink {
    async fn persist(&self, rules: &RuleSet) -> Result<(), RuleSinkError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let ids = rules.rules().iter().map(|r| r.asset_id).collect();
        self.persisted.lock().unwrap().push(ids);
        Ok(())
    }
}

#[tokio::test]
async fn test_overlapping_edits_persist_latest_rules() {
    let provider = MemoryContentProvider::new();
    let sink = StallingSink::default();
    let gate = MediaGate::new(
        provider.clone(),
        Url::parse(SITE).unwrap(),
        UploadsUrlResolver::new(Url::parse(UPLOADS).unwrap()),
    )
    .with_sink(sink.clone());

    provider
        .insert_asset(Asset::new(1, "image/png", "a.png").with_visibility(Visibility::Private))
        .unwrap();
    provider
        .insert_asset(Asset::new(2, "image/png", "b.png"))
        .unwrap();

    // first edit lists [1] and stalls inside the sink
    let first = tokio::spawn({
        let gate = gate.clone();
        async move { gate.on_asset_edited(1).await }
    });
    sink.entered.notified().await;

    // second edit lands while the first is still writing
    provider
        .set_visibility(2, Visibility::Private)
        .await
        .unwrap();
    gate.on_asset_edited(2).await;
    first.await.unwrap();

    let persisted = sink.persisted.lock().unwrap().clone();
    assert_eq!(persisted, vec![vec![1], vec![1, 2]]);
}
