use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Query, payload::Json};

use crate::{
    application::{
        services::recipient_resolver::DirectRecipient,
        usecases::dispatch_message::DispatchMessageRequest,
    },
    domain::{errors::DispatchError, repositories::MessageFilter},
    presentation::{
        http::{
            endpoints::root::{ApiState, EndpointsTags},
            mappers::{map_message, map_stats},
            requests::SendMessageRequestDto,
            responses::{MessageDto, MessageStatsDto, PaginatedMessagesDto, PaginationDto},
            security::JwtAuth,
        },
        models::{ChannelKind, MessageStatusDto},
    },
};

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    /// Dispatch one message to a batch of recipients. Validation problems
    /// are request errors; once the message is persisted, delivery failure
    /// is reported through the returned payload's status and per-recipient
    /// error fields, not as an HTTP failure.
    #[oai(
        path = "/messages/send",
        method = "post",
        tag = EndpointsTags::Messages,
    )]
    pub async fn send_message(
        &self,
        auth: JwtAuth,
        request: Json<SendMessageRequestDto>,
    ) -> PoemResult<Json<MessageDto>> {
        let user = auth.into_user(&self.state.jwt_config)?;

        let payload = DispatchMessageRequest {
            user_id: user.user_id,
            channel: request.channel.into(),
            content: request.content.clone(),
            subject: request.subject.clone(),
            contact_ids: request.recipient_ids.clone(),
            direct_recipients: request
                .direct_recipients
                .iter()
                .map(|recipient| DirectRecipient {
                    name: recipient.name.clone(),
                    phone_number: recipient.phone_number.clone(),
                    email: recipient.email.clone(),
                })
                .collect(),
            schedule: request.schedule,
        };

        let message = self
            .state
            .dispatch_message_usecase
            .execute(payload)
            .await
            .map_err(map_dispatch_error)?;

        Ok(Json(map_message(&message)))
    }

    #[oai(
        path = "/messages",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn list_messages(
        &self,
        auth: JwtAuth,
        page: Query<Option<u32>>,
        limit: Query<Option<u32>>,
        channel: Query<Option<ChannelKind>>,
        status: Query<Option<MessageStatusDto>>,
    ) -> PoemResult<Json<PaginatedMessagesDto>> {
        let user = auth.into_user(&self.state.jwt_config)?;

        let filter = MessageFilter {
            channel: channel.0.map(Into::into),
            status: status.0.map(Into::into),
        };

        let result = self
            .state
            .list_messages_usecase
            .execute(user.user_id, filter, page.0, limit.0)
            .await
            .map_err(internal_error)?;

        Ok(Json(PaginatedMessagesDto {
            messages: result.messages.iter().map(map_message).collect(),
            pagination: PaginationDto {
                page: result.page,
                limit: result.limit,
                total: result.total,
                pages: result.pages,
            },
        }))
    }

    #[oai(
        path = "/messages/stats",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn message_stats(&self, auth: JwtAuth) -> PoemResult<Json<MessageStatsDto>> {
        let user = auth.into_user(&self.state.jwt_config)?;

        let stats = self
            .state
            .message_stats_usecase
            .execute(user.user_id)
            .await
            .map_err(internal_error)?;

        Ok(Json(map_stats(&stats)))
    }

    #[oai(
        path = "/messages/:message_id",
        method = "get",
        tag = EndpointsTags::Messages,
    )]
    pub async fn get_message(
        &self,
        auth: JwtAuth,
        message_id: poem_openapi::param::Path<uuid::Uuid>,
    ) -> PoemResult<Json<MessageDto>> {
        let user = auth.into_user(&self.state.jwt_config)?;

        let message = self
            .state
            .get_message_usecase
            .execute(message_id.0, user.user_id)
            .await
            .map_err(|e| {
                if e.to_string().contains("forbidden") {
                    poem::Error::from_string("forbidden", poem::http::StatusCode::FORBIDDEN)
                } else if e.to_string().contains("not found") {
                    poem::Error::from_string("message not found", poem::http::StatusCode::NOT_FOUND)
                } else {
                    internal_error(e)
                }
            })?;

        Ok(Json(map_message(&message)))
    }
}

fn map_dispatch_error(err: DispatchError) -> poem::Error {
    if err.is_validation() {
        poem::Error::from_string(err.to_string(), poem::http::StatusCode::BAD_REQUEST)
    } else {
        poem::Error::from_string(
            err.to_string(),
            poem::http::StatusCode::INTERNAL_SERVER_ERROR,
        )
    }
}

fn internal_error(err: anyhow::Error) -> poem::Error {
    poem::Error::from_string(
        err.to_string(),
        poem::http::StatusCode::INTERNAL_SERVER_ERROR,
    )
}
