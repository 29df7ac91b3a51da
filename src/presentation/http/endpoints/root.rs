use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::services::jwt::JwtServiceConfig;
use crate::application::usecases::{
    dispatch_message::DispatchMessageUseCase, get_message::GetMessageUseCase,
    list_messages::ListMessagesUseCase, message_stats::MessageStatsUseCase,
};

#[derive(Clone)]
pub struct ApiState {
    pub dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    pub list_messages_usecase: Arc<ListMessagesUseCase>,
    pub get_message_usecase: Arc<GetMessageUseCase>,
    pub message_stats_usecase: Arc<MessageStatsUseCase>,
    pub jwt_config: JwtServiceConfig,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Messages,
}
