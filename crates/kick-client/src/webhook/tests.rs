use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderMap, HeaderValue};
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};

use super::*;

const TEST_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/webhook_test_private.pem");
const TEST_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/webhook_test_public.pem");

const MESSAGE_ID: &str = "msg-1";
const TIMESTAMP: &str = "2025-03-01T12:00:00Z";
const BODY: &str = r#"{"message_id":"abc","content":"hi"}"#;

/// Produced with `openssl dgst -sha256 -sign webhook_test_private.pem` over
/// `"{MESSAGE_ID}.{TIMESTAMP}.{BODY}"`.
const OPENSSL_SIGNATURE: &str = "ApSBYbQJUoMWDmlccE1wW34L8dJ2EkUNAL0JYQOKHkPIOsahsQNakCxBNaWvpAfM0TiCx4CSRdn37+pyp2q6Bqdm1eZc4OUIe4rOti9eOOeOFalkpafEzbGAotWV4+sB8GD9HRIvn8LClQCy8yknFTTOEbsf6a02/QOTcPXqy3taHszS4xGlW3dbIvxhWiOrmmj2oDvB4Lg/JUZgqqRgLy2QaHLFD6AMCUbDmUtJA4wBfCCOMXbkdFBIDeheMHvVb4hhMXY617fyAQO0mgw9NpjmzFcOJmmS/G9FPpLSTSaOj/1bAlJTdgjmWj5AGjchuST/1wKrGJljMeBpMkXJbg==";

fn test_verifier() -> WebhookVerifier {
    WebhookVerifier::new(WebhookVerifierOptions::default().with_public_key(TEST_PUBLIC_KEY))
        .unwrap()
}

fn sign(message_id: &str, timestamp: &str, body: &str) -> String {
    let block = pem::parse(TEST_PRIVATE_KEY).unwrap();
    let key_pair = RsaKeyPair::from_pkcs8(block.contents()).unwrap();

    let message = format!("{message_id}.{timestamp}.{body}");
    let mut signature = vec![0; key_pair.public().modulus_len()];
    key_pair
        .sign(&RSA_PKCS1_SHA256, &SystemRandom::new(), message.as_bytes(), &mut signature)
        .unwrap();
    STANDARD.encode(signature)
}

/// Replace the byte at `index` with a different ASCII character.
fn mutate(input: &str, index: usize) -> String {
    let mut bytes = input.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}

fn assert_signature_invalid(result: Result<(), KickError>) {
    assert!(
        matches!(result, Err(KickError::SignatureInvalid(_))),
        "expected SignatureInvalid, got {result:?}"
    );
}

#[test]
fn embedded_platform_key_parses() {
    let verifier = WebhookVerifier::kick().unwrap();
    assert!(verifier.verify_signatures);
}

#[test]
fn ring_signature_verifies() {
    let signature = sign(MESSAGE_ID, TIMESTAMP, BODY);
    test_verifier()
        .verify(MESSAGE_ID, TIMESTAMP, BODY, &signature)
        .unwrap();
}

#[test]
fn openssl_signature_verifies() {
    test_verifier()
        .verify(MESSAGE_ID, TIMESTAMP, BODY, OPENSSL_SIGNATURE)
        .unwrap();
}

#[test]
fn signature_from_other_key_is_rejected() {
    let verifier = WebhookVerifier::kick().unwrap();
    assert_signature_invalid(verifier.verify(MESSAGE_ID, TIMESTAMP, BODY, OPENSSL_SIGNATURE));
}

#[test]
fn any_single_byte_mutation_is_rejected() {
    let verifier = test_verifier();
    let signature = sign(MESSAGE_ID, TIMESTAMP, BODY);

    for i in 0..MESSAGE_ID.len() {
        assert_signature_invalid(verifier.verify(&mutate(MESSAGE_ID, i), TIMESTAMP, BODY, &signature));
    }
    for i in 0..TIMESTAMP.len() {
        assert_signature_invalid(verifier.verify(MESSAGE_ID, &mutate(TIMESTAMP, i), BODY, &signature));
    }
    for i in 0..BODY.len() {
        assert_signature_invalid(verifier.verify(MESSAGE_ID, TIMESTAMP, &mutate(BODY, i), &signature));
    }

    let raw = STANDARD.decode(&signature).unwrap();
    for i in 0..raw.len() {
        let mut tampered = raw.clone();
        tampered[i] ^= 0x01;
        assert_signature_invalid(verifier.verify(
            MESSAGE_ID,
            TIMESTAMP,
            BODY,
            &STANDARD.encode(tampered),
        ));
    }
}

#[test]
fn separators_are_part_of_the_signed_message() {
    let verifier = test_verifier();
    let signature = sign("msg", "1", BODY);
    assert_signature_invalid(verifier.verify("msg.1", "", BODY, &signature));
}

#[test]
fn malformed_signature_is_rejected() {
    let result = test_verifier().verify(MESSAGE_ID, TIMESTAMP, BODY, "not base64!");
    assert_signature_invalid(result);
}

#[test]
fn malformed_key_is_rejected_at_construction() {
    let err = WebhookVerifier::new(WebhookVerifierOptions::default().with_public_key("garbage"))
        .unwrap_err();
    assert!(matches!(err, KickError::SignatureInvalid(_)));
}

#[test]
fn verified_chat_message_decodes_typed() {
    let body = r#"{
        "message_id": "abc",
        "broadcaster": {"is_anonymous": false, "user_id": 42, "username": "streamer", "is_verified": true, "profile_picture": "p", "channel_slug": "streamer"},
        "sender": {"is_anonymous": false, "user_id": 7, "username": "viewer", "is_verified": false, "profile_picture": "q", "channel_slug": "viewer"},
        "content": "hi [emote:37226:KEKW]",
        "emotes": [{"emote_id": "37226", "positions": [{"s": 3, "e": 20}]}]
    }"#;
    let signature = sign(MESSAGE_ID, TIMESTAMP, body);

    let event = test_verifier()
        .verify_and_parse(
            SubscriptionName::ChatMessage,
            1,
            &signature,
            MESSAGE_ID,
            TIMESTAMP,
            body,
        )
        .unwrap();

    let WebhookEvent::ChatMessage(message) = event else {
        panic!("expected chat message, got {event:?}");
    };
    assert_eq!(message.message_id, "abc");
    assert_eq!(message.broadcaster.user_id, Some(42));
    assert!(message.broadcaster.is_verified);
    assert_eq!(message.sender.username, "viewer");
    assert_eq!(message.emotes[0].emote_id, "37226");
    assert_eq!(message.emotes[0].positions, vec![EmotePosition { start: 3, end: 20 }]);
}

#[test]
fn numeric_emote_ids_are_accepted() {
    let verifier = WebhookVerifier::new(
        WebhookVerifierOptions::default().with_verify_signatures(false),
    )
    .unwrap();
    let body = r#"{"emotes": [{"emote_id": 37226, "positions": []}]}"#;

    let event = verifier
        .verify_and_parse(SubscriptionName::ChatMessage, 1, "", "id", "ts", body)
        .unwrap();
    let WebhookEvent::ChatMessage(message) = event else {
        panic!("expected chat message, got {event:?}");
    };
    assert_eq!(message.emotes[0].emote_id, "37226");
}

#[test]
fn every_registered_event_decodes_to_its_type() {
    let verifier = WebhookVerifier::new(
        WebhookVerifierOptions::default().with_verify_signatures(false),
    )
    .unwrap();
    let parse = |name, body: &str| {
        verifier
            .verify_and_parse(name, 1, "", "id", "ts", body)
            .unwrap()
    };

    let follow = parse(
        SubscriptionName::ChannelFollow,
        r#"{"broadcaster": {"username": "s"}, "follower": {"username": "f", "user_id": 3}}"#,
    );
    assert!(matches!(follow, WebhookEvent::ChannelFollow(ref e) if e.follower.user_id == Some(3)));

    let renewal = parse(
        SubscriptionName::ChannelSubscriptionRenewal,
        r#"{"subscriber": {"username": "sub"}, "duration": 3, "created_at": "2025-01-14T16:08:06Z"}"#,
    );
    assert!(matches!(renewal, WebhookEvent::SubscriptionRenewal(ref e) if e.duration == 3));

    let gifts = parse(
        SubscriptionName::ChannelSubscriptionGifts,
        r#"{"gifter": {"is_anonymous": true, "user_id": null}, "giftees": [{"username": "a"}, {"username": "b"}]}"#,
    );
    let WebhookEvent::SubscriptionGifts(gifts) = gifts else {
        panic!("expected gifts, got {gifts:?}");
    };
    assert!(gifts.gifter.is_anonymous);
    assert_eq!(gifts.gifter.user_id, None);
    assert_eq!(gifts.giftees.len(), 2);

    let created = parse(
        SubscriptionName::ChannelSubscriptionCreated,
        r#"{"subscriber": {"username": "new"}, "duration": 1}"#,
    );
    assert!(matches!(created, WebhookEvent::SubscriptionCreated(ref e) if e.subscriber.username == "new"));
}

#[test]
fn unregistered_type_or_version_decodes_untyped() {
    let verifier = test_verifier();
    let body = r#"{"broadcaster": {"username": "s"}, "is_live": true}"#;
    let signature = sign(MESSAGE_ID, TIMESTAMP, body);

    let event = verifier
        .verify_and_parse(
            SubscriptionName::LivestreamStatusUpdated,
            1,
            &signature,
            MESSAGE_ID,
            TIMESTAMP,
            body,
        )
        .unwrap();
    assert_eq!(
        event,
        WebhookEvent::Unknown(serde_json::json!({"broadcaster": {"username": "s"}, "is_live": true}))
    );

    let event = verifier
        .verify_and_parse(SubscriptionName::ChatMessage, 2, &signature, MESSAGE_ID, TIMESTAMP, body)
        .unwrap();
    assert!(matches!(event, WebhookEvent::Unknown(_)));
}

#[test]
fn invalid_signature_wins_over_decoding() {
    let err = test_verifier()
        .verify_and_parse(
            SubscriptionName::ChatMessage,
            1,
            OPENSSL_SIGNATURE,
            MESSAGE_ID,
            TIMESTAMP,
            "not json",
        )
        .unwrap_err();
    assert!(matches!(err, KickError::SignatureInvalid(_)));
}

#[test]
fn undecodable_body_after_verification() {
    let body = r#"{"message_id": 12"#;
    let signature = sign(MESSAGE_ID, TIMESTAMP, body);

    let err = test_verifier()
        .verify_and_parse(SubscriptionName::ChatMessage, 1, &signature, MESSAGE_ID, TIMESTAMP, body)
        .unwrap_err();
    assert!(matches!(err, KickError::EventUndecodable(_)));
    assert!(err.to_string().starts_with("failed to unmarshal event"));
}

#[test]
fn disabled_verification_skips_signature_check() {
    let verifier = WebhookVerifier::new(
        WebhookVerifierOptions::default()
            .with_public_key(TEST_PUBLIC_KEY)
            .with_verify_signatures(false),
    )
    .unwrap();

    let event = verifier
        .verify_and_parse(SubscriptionName::ChatMessage, 1, "bogus", MESSAGE_ID, TIMESTAMP, BODY)
        .unwrap();
    assert!(matches!(event, WebhookEvent::ChatMessage(ref m) if m.content == "hi"));

    // Direct verification still checks.
    assert_signature_invalid(verifier.verify(MESSAGE_ID, TIMESTAMP, BODY, "bogus"));
}

fn delivery_headers(signature: &str, event_type: &str, version: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut insert = |name: &'static str, value: &str| {
        headers.insert(name, HeaderValue::from_str(value).unwrap());
    };
    insert("kick-event-message-id", MESSAGE_ID);
    insert("kick-event-subscription-id", "sub-1");
    insert("kick-event-signature", signature);
    insert("kick-event-message-timestamp", TIMESTAMP);
    insert("kick-event-type", event_type);
    insert("kick-event-version", version);
    headers
}

#[test]
fn headers_are_extracted() {
    let headers = delivery_headers("sig", "channel.followed", "1");
    let parsed = WebhookHeaders::from_header_map(&headers).unwrap();
    assert_eq!(
        parsed,
        WebhookHeaders {
            message_id: MESSAGE_ID.into(),
            subscription_id: "sub-1".into(),
            signature: "sig".into(),
            timestamp: TIMESTAMP.into(),
            event_type: SubscriptionName::ChannelFollow,
            event_version: 1,
        }
    );
}

#[test]
fn missing_header_names_it() {
    let mut headers = delivery_headers("sig", "channel.followed", "1");
    headers.remove(SIGNATURE_HEADER);

    let err = WebhookHeaders::from_header_map(&headers).unwrap_err();
    assert!(matches!(err, KickError::RequestConstruction(_)));
    assert!(err.to_string().contains("Kick-Event-Signature"));
}

#[test]
fn unknown_event_type_header_fails_closed() {
    let headers = delivery_headers("sig", "channel.raided", "1");
    let err = WebhookHeaders::from_header_map(&headers).unwrap_err();
    assert!(matches!(
        err,
        KickError::UnknownEnumValue { kind: "subscription name", ref value } if value == "channel.raided"
    ));
}

#[test]
fn event_version_header_is_numeric() {
    let headers = delivery_headers("sig", "channel.followed", "01");
    let parsed = WebhookHeaders::from_header_map(&headers).unwrap();
    assert_eq!(parsed.event_version, 1);

    let headers = delivery_headers("sig", "channel.followed", "v1");
    let err = WebhookHeaders::from_header_map(&headers).unwrap_err();
    assert!(matches!(
        err,
        KickError::UnknownEnumValue { kind: "event version", ref value } if value == "v1"
    ));
}

#[test]
fn verify_and_parse_headers_end_to_end() {
    let signature = sign(MESSAGE_ID, TIMESTAMP, BODY);
    let headers = delivery_headers(&signature, "chat.message.sent", "1");

    let event = test_verifier()
        .verify_and_parse_headers(&headers, BODY)
        .unwrap();
    assert!(matches!(event, WebhookEvent::ChatMessage(ref m) if m.message_id == "abc"));

    let tampered = delivery_headers(&signature, "chat.message.sent", "1");
    let err = test_verifier()
        .verify_and_parse_headers(&tampered, r#"{"message_id":"abd","content":"hi"}"#)
        .unwrap_err();
    assert!(matches!(err, KickError::SignatureInvalid(_)));
}
