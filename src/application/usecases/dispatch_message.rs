use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    application::services::{
        gateway::{DeliveryGateway, EmailRecipient, strip_tags},
        recipient_resolver::{DirectRecipient, RecipientResolver},
    },
    domain::{
        errors::DispatchError,
        models::{BatchOutcome, Channel, Message, NewMessage},
        repositories::MessageRepository,
    },
};

pub struct DispatchMessageRequest {
    pub user_id: Uuid,
    pub channel: Channel,
    pub content: String,
    pub subject: Option<String>,
    pub contact_ids: Vec<Uuid>,
    pub direct_recipients: Vec<DirectRecipient>,
    pub schedule: Option<DateTime<Utc>>,
}

/// Owns the message lifecycle end to end: validate, resolve recipients,
/// persist the pending message, submit one batch per message to the
/// gateway, reconcile the outcome, persist the terminal state.
///
/// Validation failures are returned to the caller; once a message exists,
/// gateway failures are recorded on it and the call still succeeds with
/// the message payload.
pub struct DispatchMessageUseCase {
    message_repo: Arc<dyn MessageRepository>,
    resolver: RecipientResolver,
    gateway: Arc<dyn DeliveryGateway>,
    sms_sender_id: String,
}

impl DispatchMessageUseCase {
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        resolver: RecipientResolver,
        gateway: Arc<dyn DeliveryGateway>,
        sms_sender_id: String,
    ) -> Self {
        Self {
            message_repo,
            resolver,
            gateway,
            sms_sender_id,
        }
    }

    pub async fn execute(
        &self,
        request: DispatchMessageRequest,
    ) -> Result<Message, DispatchError> {
        if request.content.trim().is_empty() {
            return Err(DispatchError::InvalidRequest);
        }
        if request.contact_ids.is_empty() && request.direct_recipients.is_empty() {
            return Err(DispatchError::InvalidRequest);
        }

        let recipients = self
            .resolver
            .resolve(
                request.user_id,
                request.channel,
                &request.contact_ids,
                &request.direct_recipients,
            )
            .await?;

        let mut message = self
            .message_repo
            .create(NewMessage {
                user_id: request.user_id,
                channel: request.channel,
                content: request.content,
                subject: request.subject,
                recipients,
                scheduled_for: request.schedule,
            })
            .await?;

        tracing::info!(
            message_id = %message.id,
            channel = message.channel.as_str(),
            recipients = message.total_recipients,
            "message created"
        );

        // Immediate-send rule: only a strictly future schedule defers the
        // dispatch. Deferred messages stay pending; no worker revisits them.
        let due = request.schedule.map_or(true, |at| at <= Utc::now());
        if due {
            self.process_sending(&mut message).await?;
        }

        Ok(message)
    }

    async fn process_sending(&self, message: &mut Message) -> Result<(), DispatchError> {
        let outcome = match message.channel {
            Channel::Sms => self.dispatch_bulk_sms(message).await,
            Channel::Email => self.dispatch_bulk_email(message).await,
        };

        match &outcome {
            BatchOutcome::Accepted { correlation_id } => tracing::info!(
                message_id = %message.id,
                correlation_id = correlation_id.as_deref().unwrap_or(""),
                "batch accepted by provider"
            ),
            BatchOutcome::Rejected { reason } => tracing::error!(
                message_id = %message.id,
                reason = %reason,
                "batch rejected by provider"
            ),
        }

        message.apply_outcome(&outcome, Utc::now());
        *message = self.message_repo.save(message).await?;
        Ok(())
    }

    async fn dispatch_bulk_sms(&self, message: &Message) -> BatchOutcome {
        let numbers: Vec<String> = message
            .recipients
            .iter()
            .filter(|r| r.eligible_for(Channel::Sms))
            .filter_map(|r| r.phone_number.clone())
            .collect();

        match self
            .gateway
            .send_bulk_sms(&numbers, &message.content, &self.sms_sender_id)
            .await
        {
            Ok(receipt) if receipt.accepted => BatchOutcome::Accepted {
                correlation_id: receipt.correlation_id,
            },
            Ok(_) => BatchOutcome::Rejected {
                reason: "SMS send returned unsuccessful status".to_string(),
            },
            Err(err) => BatchOutcome::Rejected {
                reason: err.to_string(),
            },
        }
    }

    async fn dispatch_bulk_email(&self, message: &Message) -> BatchOutcome {
        let recipients: Vec<EmailRecipient> = message
            .recipients
            .iter()
            .filter(|r| r.eligible_for(Channel::Email))
            .map(|r| EmailRecipient {
                address: r.email.clone().unwrap_or_default(),
                display_name: if r.name.is_empty() {
                    "Recipient".to_string()
                } else {
                    r.name.clone()
                },
            })
            .collect();

        let subject = message
            .subject
            .clone()
            .unwrap_or_else(|| "No Subject".to_string());
        let text_body = strip_tags(&message.content);

        match self
            .gateway
            .send_bulk_email(&recipients, &subject, &message.content, &text_body)
            .await
        {
            Ok(receipt) if receipt.accepted => BatchOutcome::Accepted {
                correlation_id: receipt.correlation_id,
            },
            Ok(_) => BatchOutcome::Rejected {
                reason: "Email send returned unsuccessful status".to_string(),
            },
            Err(err) => BatchOutcome::Rejected {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{
        application::services::gateway::{DeliveryReceipt, GatewayError},
        domain::models::{Contact, MessageStatus},
        infrastructure::repositories::in_memory::{
            InMemoryContactRepository, InMemoryMessageRepository,
        },
    };

    enum StubBehavior {
        Accept(Option<&'static str>),
        Decline,
        Fail(&'static str),
    }

    struct StubGateway {
        behavior: StubBehavior,
        calls: AtomicUsize,
    }

    impl StubGateway {
        fn new(behavior: StubBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn receipt(&self) -> Result<DeliveryReceipt, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                StubBehavior::Accept(correlation_id) => Ok(DeliveryReceipt {
                    accepted: true,
                    correlation_id: correlation_id.map(str::to_string),
                }),
                StubBehavior::Decline => Ok(DeliveryReceipt {
                    accepted: false,
                    correlation_id: None,
                }),
                StubBehavior::Fail(reason) => Err(GatewayError::Provider(reason.to_string())),
            }
        }
    }

    #[async_trait]
    impl DeliveryGateway for StubGateway {
        async fn send_bulk_sms(
            &self,
            _numbers: &[String],
            _body: &str,
            _sender_label: &str,
        ) -> Result<DeliveryReceipt, GatewayError> {
            self.receipt()
        }

        async fn send_bulk_email(
            &self,
            _recipients: &[EmailRecipient],
            _subject: &str,
            _html_body: &str,
            _text_body: &str,
        ) -> Result<DeliveryReceipt, GatewayError> {
            self.receipt()
        }
    }

    struct Fixture {
        usecase: DispatchMessageUseCase,
        message_repo: Arc<InMemoryMessageRepository>,
        contact_repo: Arc<InMemoryContactRepository>,
        gateway: Arc<StubGateway>,
    }

    fn fixture(behavior: StubBehavior) -> Fixture {
        let message_repo = Arc::new(InMemoryMessageRepository::new());
        let contact_repo = Arc::new(InMemoryContactRepository::new());
        let gateway = StubGateway::new(behavior);
        let usecase = DispatchMessageUseCase::new(
            message_repo.clone(),
            RecipientResolver::new(contact_repo.clone()),
            gateway.clone(),
            "BulkMsgApp".to_string(),
        );
        Fixture {
            usecase,
            message_repo,
            contact_repo,
            gateway,
        }
    }

    async fn seed_contact(
        fixture: &Fixture,
        user_id: Uuid,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Uuid {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            phone_number: phone.map(str::to_string),
            email: email.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        let id = contact.id;
        fixture.contact_repo.insert(contact).await;
        id
    }

    fn request(user_id: Uuid, channel: Channel) -> DispatchMessageRequest {
        DispatchMessageRequest {
            user_id,
            channel,
            content: "hello there".to_string(),
            subject: None,
            contact_ids: vec![],
            direct_recipients: vec![],
            schedule: None,
        }
    }

    fn direct(phone: Option<&str>, email: Option<&str>) -> DirectRecipient {
        DirectRecipient {
            name: None,
            phone_number: phone.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn sms_batch_accepted_marks_all_recipients_sent() {
        let fixture = fixture(StubBehavior::Accept(Some("m1")));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.contact_ids = vec![
            seed_contact(&fixture, user_id, "A", Some("+111"), None).await,
            seed_contact(&fixture, user_id, "B", Some("+222"), None).await,
            seed_contact(&fixture, user_id, "C", Some("+333"), None).await,
        ];

        let message = fixture.usecase.execute(req).await.unwrap();

        assert_eq!(message.status, MessageStatus::Sent);
        assert_eq!(message.total_recipients, 3);
        assert_eq!(message.successful_sends, 3);
        assert_eq!(message.failed_sends, 0);
        assert!((message.cost - 0.03).abs() < 1e-9);
        assert!(message.sent_at.is_some());
        for recipient in &message.recipients {
            assert_eq!(recipient.status, MessageStatus::Sent);
            assert_eq!(recipient.message_id.as_deref(), Some("m1"));
        }

        // the terminal state is what got persisted
        let stored = fixture
            .message_repo
            .find_by_id(message.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MessageStatus::Sent);
    }

    #[tokio::test]
    async fn gateway_error_is_recorded_not_raised() {
        let fixture = fixture(StubBehavior::Fail("rate limited"));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Email);
        req.direct_recipients = vec![
            direct(None, Some("a@example.com")),
            direct(None, Some("b@example.com")),
        ];

        let message = fixture.usecase.execute(req).await.unwrap();

        assert_eq!(message.status, MessageStatus::Failed);
        assert_eq!(message.failed_sends, 2);
        assert_eq!(message.successful_sends, 0);
        assert_eq!(message.cost, 0.0);
        assert!(message.sent_at.is_none());
        for recipient in &message.recipients {
            assert_eq!(recipient.status, MessageStatus::Failed);
            assert_eq!(recipient.error.as_deref(), Some("rate limited"));
        }
    }

    #[tokio::test]
    async fn unsuccessful_receipt_is_equivalent_to_gateway_error() {
        let fixture = fixture(StubBehavior::Decline);
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.direct_recipients = vec![direct(Some("+111"), None)];

        let message = fixture.usecase.execute(req).await.unwrap();

        assert_eq!(message.status, MessageStatus::Failed);
        assert_eq!(
            message.recipients[0].error.as_deref(),
            Some("SMS send returned unsuccessful status")
        );
    }

    #[tokio::test]
    async fn mixed_sources_filter_to_channel_eligible_set() {
        let fixture = fixture(StubBehavior::Accept(None));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.contact_ids = vec![
            seed_contact(&fixture, user_id, "Phone", Some("+111"), None).await,
            seed_contact(&fixture, user_id, "EmailOnly", None, Some("x@example.com")).await,
        ];
        req.direct_recipients = vec![direct(Some("+222"), None)];

        let message = fixture.usecase.execute(req).await.unwrap();

        assert_eq!(message.total_recipients, 2);
        assert_eq!(message.successful_sends + message.failed_sends, 2);
    }

    #[tokio::test]
    async fn past_schedule_dispatches_immediately() {
        let fixture = fixture(StubBehavior::Accept(None));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.direct_recipients = vec![direct(Some("+111"), None)];
        req.schedule = Some(Utc::now() - Duration::hours(1));

        let message = fixture.usecase.execute(req).await.unwrap();

        assert_eq!(fixture.gateway.calls(), 1);
        assert_eq!(message.status, MessageStatus::Sent);
    }

    #[tokio::test]
    async fn future_schedule_stays_pending_without_gateway_call() {
        let fixture = fixture(StubBehavior::Accept(None));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.direct_recipients = vec![direct(Some("+111"), None)];
        req.schedule = Some(Utc::now() + Duration::hours(1));

        let message = fixture.usecase.execute(req).await.unwrap();

        assert_eq!(fixture.gateway.calls(), 0);
        assert_eq!(message.status, MessageStatus::Pending);
        assert!(message.recipients.iter().all(|r| r.status == MessageStatus::Pending));
        assert!(message.scheduled_for.is_some());

        let stored = fixture
            .message_repo
            .find_by_id(message.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MessageStatus::Pending);
    }

    #[tokio::test]
    async fn missing_recipient_sources_reject_before_persistence() {
        let fixture = fixture(StubBehavior::Accept(None));
        let req = request(Uuid::new_v4(), Channel::Sms);

        let result = fixture.usecase.execute(req).await;

        assert!(matches!(result, Err(DispatchError::InvalidRequest)));
        assert_eq!(fixture.message_repo.len().await, 0);
        assert_eq!(fixture.gateway.calls(), 0);
    }

    #[tokio::test]
    async fn blank_content_rejects_before_persistence() {
        let fixture = fixture(StubBehavior::Accept(None));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.content = "   ".to_string();
        req.direct_recipients = vec![direct(Some("+111"), None)];

        let result = fixture.usecase.execute(req).await;

        assert!(matches!(result, Err(DispatchError::InvalidRequest)));
        assert_eq!(fixture.message_repo.len().await, 0);
    }

    #[tokio::test]
    async fn no_eligible_recipients_reject_before_persistence() {
        let fixture = fixture(StubBehavior::Accept(None));
        let user_id = Uuid::new_v4();
        let mut req = request(user_id, Channel::Sms);
        req.direct_recipients = vec![direct(None, Some("a@example.com"))];

        let result = fixture.usecase.execute(req).await;

        assert!(matches!(result, Err(DispatchError::NoValidRecipients)));
        assert_eq!(fixture.message_repo.len().await, 0);
    }
}
