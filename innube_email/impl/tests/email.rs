use innube_email_contracts::{ContentType, Email, EmailService};
use innube_email_impl::{EmailServiceConfig, EmailServiceImpl};
use innube_testing::resend::{self, Mailbox, FAILING_RECIPIENT};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const API_KEY: &str = "re_test";
const FROM: &str = "Innube Contacto <onboarding@resend.dev>";

#[tokio::test]
async fn send_html_email() {
    let (sut, mailbox) = setup(Some(API_KEY)).await;

    let result = sut
        .send(Email {
            recipient: "test@example.com".into(),
            subject: "The Subject".into(),
            body: "<h1>Hello World!</h1>".into(),
            content_type: ContentType::Html,
            reply_to: Some("replyto@example.com".into()),
        })
        .await
        .unwrap();

    assert!(result.get("id").is_some_and(Value::is_string));

    let emails = mailbox.emails().await;
    assert_eq!(
        emails,
        [json!({
            "from": FROM,
            "to": ["test@example.com"],
            "subject": "The Subject",
            "html": "<h1>Hello World!</h1>",
            "reply_to": "replyto@example.com",
        })]
    );
}

#[tokio::test]
async fn send_text_email_without_reply_to() {
    let (sut, mailbox) = setup(Some(API_KEY)).await;

    sut.send(Email {
        recipient: "test@example.com".into(),
        subject: "Email Deliverability Test".into(),
        body: "Email deliverability seems to be working!".into(),
        content_type: ContentType::Text,
        reply_to: None,
    })
    .await
    .unwrap();

    let emails = mailbox.emails().await;
    assert_eq!(
        emails,
        [json!({
            "from": FROM,
            "to": ["test@example.com"],
            "subject": "Email Deliverability Test",
            "text": "Email deliverability seems to be working!",
        })]
    );
}

#[tokio::test]
async fn provider_error() {
    let (sut, mailbox) = setup(Some(API_KEY)).await;

    let result = sut
        .send(Email {
            recipient: FAILING_RECIPIENT.into(),
            subject: "The Subject".into(),
            body: "Hello".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("500"), "{err:#}");
    assert!(mailbox.emails().await.is_empty());
}

#[tokio::test]
async fn invalid_api_key() {
    let (sut, mailbox) = setup(Some("re_wrong")).await;

    let result = sut
        .send(Email {
            recipient: "test@example.com".into(),
            subject: "The Subject".into(),
            body: "Hello".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("403"), "{err:#}");
    assert!(mailbox.emails().await.is_empty());
}

#[tokio::test]
async fn missing_api_key() {
    let (sut, mailbox) = setup(None).await;

    assert!(!sut.is_configured());

    let result = sut
        .send(Email {
            recipient: "test@example.com".into(),
            subject: "The Subject".into(),
            body: "Hello".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await;

    result.unwrap_err();
    assert!(mailbox.emails().await.is_empty());
}

async fn setup(api_key: Option<&str>) -> (EmailServiceImpl, Mailbox) {
    let (addr, mailbox) = resend::spawn(API_KEY).await.unwrap();

    let endpoint = format!("http://{addr}").parse().unwrap();
    let config =
        EmailServiceConfig::new(&endpoint, FROM.into(), api_key.map(Into::into)).unwrap();

    (EmailServiceImpl::new(config).unwrap(), mailbox)
}
