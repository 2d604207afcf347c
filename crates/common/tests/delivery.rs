//! Gated endpoint decisions, end to end through the in-memory store

mod gate_support;

use common::prelude::*;
use gate_support::{gated, setup_gate};

fn requesters() -> Vec<Requester> {
    vec![
        Requester::anonymous(),
        Requester::anonymous().with_password("guess"),
        Requester::elevated(),
    ]
}

#[tokio::test]
async fn test_public_asset_is_delivered_to_everyone() {
    let (gate, provider, _) = setup_gate();
    provider
        .insert_asset(Asset::new(42, "image/png", "2024/05/cat.png"))
        .unwrap();

    for requester in requesters() {
        match gate.deliver(42, &requester).await {
            Delivery::File(asset) => {
                assert_eq!(asset.mime_type, "image/png");
                assert_eq!(asset.storage_path, "2024/05/cat.png");
            }
            other => panic!("expected file, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_private_asset_requires_capability() {
    let (gate, provider, _) = setup_gate();
    provider
        .insert_asset(Asset::new(1, "image/png", "a.png").with_visibility(Visibility::Private))
        .unwrap();

    assert!(matches!(
        gate.deliver(1, &Requester::anonymous()).await,
        Delivery::Refused(Refusal::Unauthorized { .. })
    ));
    assert!(matches!(
        gate.deliver(1, &Requester::elevated()).await,
        Delivery::File(_)
    ));
}

#[tokio::test]
async fn test_inherited_password() {
    let (gate, provider, _) = setup_gate();
    provider
        .insert_content_item(ContentItem::new(5, "post").with_password("abc"))
        .unwrap();
    provider
        .insert_asset(
            Asset::new(1, "application/pdf", "doc.pdf")
                .with_parent(5)
                .with_visibility(Visibility::Password),
        )
        .unwrap();

    match gate.deliver(1, &Requester::anonymous().with_password("nope")).await {
        Delivery::Refused(Refusal::Unauthorized { classification, .. }) => {
            assert_eq!(classification.password(), Some("abc"));
        }
        other => panic!("expected refusal, got {:?}", other),
    }
    assert!(matches!(
        gate.deliver(1, &Requester::anonymous().with_password("abc")).await,
        Delivery::File(_)
    ));
}

#[tokio::test]
async fn test_password_without_any_credential_is_open() {
    let (gate, provider, _) = setup_gate();
    provider
        .insert_content_item(ContentItem::new(5, "post"))
        .unwrap();
    provider
        .insert_asset(Asset::new(1, "image/png", "a.png").with_visibility(Visibility::Password))
        .unwrap();
    provider
        .insert_asset(
            Asset::new(2, "image/png", "b.png")
                .with_parent(5)
                .with_visibility(Visibility::Password)
                .with_password(""),
        )
        .unwrap();

    for requester in requesters() {
        assert!(matches!(gate.deliver(1, &requester).await, Delivery::File(_)));
        assert!(matches!(gate.deliver(2, &requester).await, Delivery::File(_)));
    }
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let (gate, _, _) = setup_gate();

    assert_eq!(
        gate.deliver(99, &Requester::elevated()).await,
        Delivery::Refused(Refusal::NotFound)
    );
    assert_eq!(
        gate.deliver_request(&gated(99), &Requester::anonymous()).await,
        Some(Delivery::Refused(Refusal::NotFound))
    );

    let malformed = Request::from_query("hl_download=1&attachment_id=../../etc");
    assert_eq!(
        gate.deliver_request(&malformed, &Requester::anonymous()).await,
        Some(Delivery::Refused(Refusal::NotFound))
    );

    let plain = Request::from_query("p=12");
    assert_eq!(gate.deliver_request(&plain, &Requester::anonymous()).await, None);
}
